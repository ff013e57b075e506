//! SAMD20 Xplained Pro + OLED1 Xplained Pro module
//!
//! The OLED1 module carries a UG-2832HSWEG04 panel driven by an SSD1306
//! controller over 4-wire SPI. It plugs into either extension header:
//!
//! | Signal        | EXT1              | EXT2              |
//! |---------------|-------------------|-------------------|
//! | DISPLAY_RESET | PB05              | PB15              |
//! | DATA_CMD_SEL  | PB06              | PA20              |
//! | DISPLAY_SS    | PA05 (SERCOM0 SS) | PA17 (SERCOM1 SS) |
//! | SPI_MOSI      | PA06 (SERCOM0)    | PA18 (SERCOM1)    |
//! | SPI_SCK       | PA07 (SERCOM0)    | PA19 (SERCOM1)    |
//!
//! DISPLAY_RESET is active low. DATA_CMD_SEL is high for display RAM data and
//! low for controller commands. DISPLAY_SS is held low for the duration of a
//! transfer; the SPI driver owns it.

use embedded_hal::delay::DelayNs;

use crate::bus::{BusIndex, BusProvisioner};
use crate::config::{BringUpConfig, BusCapabilities, RESET_SETTLE_MS};
use crate::controller::{ControllerBinder, DeviceIndex, PowerLevel};
use crate::error::BringUpError;
use crate::reset::{PinId, ResetLine, ResetLineConfig};
use crate::sequencer::BringUpSequencer;

/// PORT group B.
const PORT_B: u8 = 1;

/// Power level used to switch the SSD1306 panel on.
pub const OLED1_MAX_POWER: PowerLevel = PowerLevel::new(1);

/// Extension header the OLED1 module is plugged into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oled1Header {
    /// EXT1 — SPI on SERCOM0.
    Ext1,
    /// EXT2 — SPI on SERCOM1.
    Ext2,
}

impl Oled1Header {
    /// DISPLAY_RESET pin for this header.
    pub const fn reset_pin(self) -> PinId {
        match self {
            Self::Ext1 => PinId::port_pin(PORT_B, 5),
            Self::Ext2 => PinId::port_pin(PORT_B, 15),
        }
    }

    /// SERCOM instance carrying the display SPI.
    pub const fn sercom(self) -> BusIndex {
        match self {
            Self::Ext1 => BusIndex::new(0),
            Self::Ext2 => BusIndex::new(1),
        }
    }
}

/// Bring-up configuration for an OLED1 module on `header`.
///
/// The SERCOM SPI driver on this board supports command/data select and
/// drives DISPLAY_SS itself.
pub const fn oled1_config(header: Oled1Header) -> BringUpConfig {
    BringUpConfig::new(ResetLineConfig::active_low(header.reset_pin()), header.sercom())
        .with_settle_delay_ms(RESET_SETTLE_MS)
        .with_max_power(OLED1_MAX_POWER)
        .with_capabilities(BusCapabilities::full())
}

/// Board graphics entry point: bring OLED `devno` up and hand back its
/// device handle.
///
/// Called once per display by the graphics subsystem at startup.
pub fn graphics_setup<R, D, P, C>(
    sequencer: &mut BringUpSequencer<R, D, P, C>,
    devno: u32,
) -> Result<C::Device, BringUpError>
where
    R: ResetLine,
    D: DelayNs,
    P: BusProvisioner,
    C: ControllerBinder<P::Bus>,
{
    let device = DeviceIndex::new(devno);
    let handle = sequencer.bring_up(device)?;
    info!(
        "OLED {} up on SERCOM{} (reset {})",
        device,
        sequencer.config().bus,
        sequencer.config().reset.pin
    );
    Ok(handle)
}
