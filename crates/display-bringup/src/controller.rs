//! Display-controller binding and power control
//!
//! The controller driver itself (command protocol, framebuffer) lives outside
//! this crate. The sequencer only needs two things from it: a constructor that
//! binds a bus handle to a display instance, and a power switch on the result.

/// Caller-supplied display instance number.
///
/// No range is validated here; the controller binder rejects values it does
/// not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct DeviceIndex(u32);

impl DeviceIndex {
    /// Create a device index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Panel power level.
///
/// `0` is off; the meaning of higher levels (on/off only, or a brightness /
/// contrast scale) is defined by the controller driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct PowerLevel(u8);

impl PowerLevel {
    /// Panel off.
    pub const OFF: Self = Self(0);

    /// Create a power level.
    pub const fn new(level: u8) -> Self {
        Self(level)
    }

    /// Raw level.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether this level turns the panel off.
    pub const fn is_off(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for PowerLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Power control exposed by a bound display.
pub trait PowerControl {
    /// Error type
    type Error;

    /// Set the panel power level.
    fn set_power(&mut self, level: PowerLevel) -> Result<(), Self::Error>;
}

/// Binds a bus handle to a display controller instance.
pub trait ControllerBinder<B> {
    /// Bound display handle
    type Device: PowerControl;

    /// Bind `bus` (plus an optional bus-specific secondary handle) to the
    /// display numbered `device`.
    ///
    /// `None` means the controller rejected the bus or the device index.
    /// Ownership of `bus` passes to the binder either way.
    fn bind(&mut self, bus: B, aux: Option<B>, device: DeviceIndex) -> Option<Self::Device>;
}

/// Driver constructors plug in directly.
impl<B, D, F> ControllerBinder<B> for F
where
    F: FnMut(B, Option<B>, DeviceIndex) -> Option<D>,
    D: PowerControl,
{
    type Device = D;

    fn bind(&mut self, bus: B, aux: Option<B>, device: DeviceIndex) -> Option<D> {
        self(bus, aux, device)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Panel {
        bus: u8,
        level: PowerLevel,
    }

    impl PowerControl for Panel {
        type Error = ();

        fn set_power(&mut self, level: PowerLevel) -> Result<(), ()> {
            self.level = level;
            Ok(())
        }
    }

    #[test]
    fn closure_binder() {
        let mut binder = |bus: u8, aux: Option<u8>, device: DeviceIndex| {
            (aux.is_none() && device.get() < 2).then_some(Panel {
                bus,
                level: PowerLevel::OFF,
            })
        };

        let mut panel = binder.bind(3, None, DeviceIndex::new(1)).unwrap();
        assert_eq!(panel.bus, 3);
        panel.set_power(PowerLevel::new(1)).unwrap();
        assert_eq!(panel.level, PowerLevel::new(1));

        assert!(binder.bind(3, None, DeviceIndex::new(2)).is_none());
        assert!(binder.bind(3, Some(4), DeviceIndex::new(0)).is_none());
    }

    #[test]
    fn power_level_off() {
        assert!(PowerLevel::OFF.is_off());
        assert!(!PowerLevel::new(1).is_off());
        assert_eq!(PowerLevel::new(255).to_string(), "255");
    }
}
