//! Reset-line control
//!
//! The reset line is platform wiring referenced by [`PinId`]; the sequencer
//! never owns it beyond a single bring-up call. [`ResetLine`] is the
//! collaborator boundary, [`GpioResetLine`] adapts any embedded-hal
//! [`OutputPin`] to it.

use embedded_hal::digital::OutputPin;

/// Logical pin identifier.
///
/// Encoded as `port * 32 + pin`, matching the 32-pin port groups of the
/// SAMD2x/L2x PORT controller and most Cortex-M GPIO blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PinId(u16);

impl PinId {
    /// Pins per port group.
    pub const PINS_PER_PORT: u16 = 32;

    /// Create a pin identifier from its raw encoding.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Create a pin identifier from a port number (`0` = PA, `1` = PB, ...)
    /// and a pin number within that port.
    ///
    /// `pin` is masked to the port width.
    // port <= 255, so port * 32 + 31 <= 8191 and fits in u16.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn port_pin(port: u8, pin: u8) -> Self {
        Self((port as u16) * Self::PINS_PER_PORT + (pin as u16 & (Self::PINS_PER_PORT - 1)))
    }

    /// Raw encoded value.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Port number (`0` = PA).
    ///
    /// Wider than the `port_pin` argument: a raw value from [`PinId::new`]
    /// can name ports up to 2047.
    pub const fn port(self) -> u16 {
        self.0 / Self::PINS_PER_PORT
    }

    /// Pin number within the port.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn pin(self) -> u8 {
        (self.0 % Self::PINS_PER_PORT) as u8
    }
}

impl core::fmt::Display for PinId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let port = self.port();
        match u8::try_from(port) {
            // port < 26, so b'A' + port <= b'Z'.
            #[allow(clippy::arithmetic_side_effects)]
            Ok(group) if group < 26 => {
                write!(f, "P{}{:02}", char::from(b'A' + group), self.pin())
            }
            _ => write!(f, "P{port}.{:02}", self.pin()),
        }
    }
}

/// Logic level on a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

impl core::fmt::Display for PinState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Which level holds the peripheral in reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Reset is asserted while the line is low.
    #[default]
    ActiveLow,
    /// Reset is asserted while the line is high.
    ActiveHigh,
}

impl Polarity {
    /// Level that holds the peripheral in reset.
    pub const fn asserted(self) -> PinState {
        match self {
            Self::ActiveLow => PinState::Low,
            Self::ActiveHigh => PinState::High,
        }
    }

    /// Level that releases the peripheral from reset.
    pub const fn released(self) -> PinState {
        match self {
            Self::ActiveLow => PinState::High,
            Self::ActiveHigh => PinState::Low,
        }
    }
}

/// Reset line wiring: which pin, and which level asserts reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResetLineConfig {
    /// Pin tied to the peripheral's reset input.
    pub pin: PinId,
    /// Active level of the reset input.
    pub polarity: Polarity,
}

impl ResetLineConfig {
    /// Active-low reset on `pin`.
    pub const fn active_low(pin: PinId) -> Self {
        Self {
            pin,
            polarity: Polarity::ActiveLow,
        }
    }

    /// Active-high reset on `pin`.
    pub const fn active_high(pin: PinId) -> Self {
        Self {
            pin,
            polarity: Polarity::ActiveHigh,
        }
    }
}

/// Pin configuration and level control for a reset line.
pub trait ResetLine {
    /// Error type
    type Error;

    /// Configure `pin` as a push-pull output whose initial level is `initial`.
    fn configure(&mut self, pin: PinId, initial: PinState) -> Result<(), Self::Error>;

    /// Drive `pin` to `level`.
    fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), Self::Error>;
}

impl<T: ResetLine + ?Sized> ResetLine for &mut T {
    type Error = T::Error;

    fn configure(&mut self, pin: PinId, initial: PinState) -> Result<(), Self::Error> {
        T::configure(self, pin, initial)
    }

    fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), Self::Error> {
        T::set_level(self, pin, level)
    }
}

/// Errors from [`GpioResetLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioResetError {
    /// The request named a pin this adapter does not drive.
    WrongPin {
        /// Pin this adapter owns.
        expected: PinId,
        /// Pin named by the request.
        requested: PinId,
    },
    /// The underlying pin driver reported an error.
    Pin,
}

impl core::fmt::Display for GpioResetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongPin {
                expected,
                requested,
            } => write!(f, "reset line drives {expected}, not {requested}"),
            Self::Pin => write!(f, "GPIO error on reset line"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GpioResetError {}

/// [`ResetLine`] over a single embedded-hal output pin.
///
/// The HAL's typestate has already put the pin in output mode, so
/// `configure` only drives the initial level.
pub struct GpioResetLine<P> {
    id: PinId,
    pin: P,
}

impl<P: OutputPin> GpioResetLine<P> {
    /// Wrap `pin`, which is wired as `id`.
    pub fn new(id: PinId, pin: P) -> Self {
        Self { id, pin }
    }

    /// Identifier of the wrapped pin.
    pub fn id(&self) -> PinId {
        self.id
    }

    /// Give back the wrapped pin.
    pub fn release(self) -> P {
        self.pin
    }

    fn check(&self, requested: PinId) -> Result<(), GpioResetError> {
        if requested == self.id {
            Ok(())
        } else {
            Err(GpioResetError::WrongPin {
                expected: self.id,
                requested,
            })
        }
    }

    fn drive(&mut self, level: PinState) -> Result<(), GpioResetError> {
        match level {
            PinState::High => self.pin.set_high(),
            PinState::Low => self.pin.set_low(),
        }
        .map_err(|_| GpioResetError::Pin)
    }
}

impl<P: OutputPin> ResetLine for GpioResetLine<P> {
    type Error = GpioResetError;

    fn configure(&mut self, pin: PinId, initial: PinState) -> Result<(), Self::Error> {
        self.check(pin)?;
        self.drive(initial)
    }

    fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), Self::Error> {
        self.check(pin)?;
        self.drive(level)
    }
}
