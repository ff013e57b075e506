//! Bring-up configuration
//!
//! Board wiring and timing passed explicitly into the sequencer, and the
//! startup checks that replace "refuse to build" capability guards.

use crate::bus::BusIndex;
use crate::controller::PowerLevel;
use crate::reset::ResetLineConfig;

/// Minimum time the reset line is held asserted, in milliseconds.
pub const RESET_SETTLE_MS: u32 = 20;

/// Default wait between releasing reset and the first bus traffic, in
/// milliseconds. Unverified against controller datasheets; override per board.
pub const POST_RESET_DELAY_MS: u32 = 0;

/// Default power level for power-on.
pub const DEFAULT_MAX_POWER: PowerLevel = PowerLevel::new(1);

/// Bus features the display wiring depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct BusCapabilities {
    /// The selected bus peripheral is present on this part.
    pub bus_present: bool,
    /// The bus driver can drive a command/data select line.
    pub cmd_data_select: bool,
    /// The bus driver controls chip-select for this device.
    pub chip_select: bool,
}

impl BusCapabilities {
    /// Everything the display needs.
    pub const fn full() -> Self {
        Self {
            bus_present: true,
            cmd_data_select: true,
            chip_select: true,
        }
    }
}

/// Why a configuration cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The bus peripheral is not present.
    BusNotPresent(BusIndex),
    /// Command/data select is not available on the bus.
    CmdDataSelectUnavailable(BusIndex),
    /// Chip-select control is not available on the bus.
    ChipSelectUnavailable(BusIndex),
    /// A zero settle delay cannot satisfy the minimum reset pulse width.
    SettleDelayZero,
    /// Power-on level is zero, which would leave the panel off.
    PowerLevelZero,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BusNotPresent(bus) => write!(f, "bus {bus} is not present"),
            Self::CmdDataSelectUnavailable(bus) => {
                write!(f, "bus {bus} has no command/data select")
            }
            Self::ChipSelectUnavailable(bus) => write!(f, "bus {bus} has no chip-select control"),
            Self::SettleDelayZero => write!(f, "reset settle delay must be non-zero"),
            Self::PowerLevelZero => write!(f, "power-on level must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Wiring and timing for one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUpConfig {
    /// Reset line wiring.
    pub reset: ResetLineConfig,
    /// Bus instance the display sits on.
    pub bus: BusIndex,
    /// Reset hold time in milliseconds.
    pub settle_delay_ms: u32,
    /// Wait after releasing reset, in milliseconds (`0` = none).
    pub post_reset_delay_ms: u32,
    /// Level passed to `set_power` at the end of bring-up.
    pub max_power: PowerLevel,
    /// Bus features available on this board.
    pub capabilities: BusCapabilities,
}

impl BringUpConfig {
    /// Configuration with default timing and power, and no declared bus
    /// capabilities.
    pub const fn new(reset: ResetLineConfig, bus: BusIndex) -> Self {
        Self {
            reset,
            bus,
            settle_delay_ms: RESET_SETTLE_MS,
            post_reset_delay_ms: POST_RESET_DELAY_MS,
            max_power: DEFAULT_MAX_POWER,
            capabilities: BusCapabilities {
                bus_present: false,
                cmd_data_select: false,
                chip_select: false,
            },
        }
    }

    /// Override the reset hold time.
    #[must_use]
    pub const fn with_settle_delay_ms(mut self, ms: u32) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Override the post-reset wait.
    #[must_use]
    pub const fn with_post_reset_delay_ms(mut self, ms: u32) -> Self {
        self.post_reset_delay_ms = ms;
        self
    }

    /// Override the power-on level.
    #[must_use]
    pub const fn with_max_power(mut self, level: PowerLevel) -> Self {
        self.max_power = level;
        self
    }

    /// Declare the bus capabilities.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: BusCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Check the configuration before any hardware is touched.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.capabilities.bus_present {
            return Err(ConfigError::BusNotPresent(self.bus));
        }
        if !self.capabilities.cmd_data_select {
            return Err(ConfigError::CmdDataSelectUnavailable(self.bus));
        }
        if !self.capabilities.chip_select {
            return Err(ConfigError::ChipSelectUnavailable(self.bus));
        }
        if self.settle_delay_ms == 0 {
            return Err(ConfigError::SettleDelayZero);
        }
        if self.max_power.is_off() {
            return Err(ConfigError::PowerLevelZero);
        }
        Ok(())
    }
}
