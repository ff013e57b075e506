//! Recording fakes for every bring-up collaborator.
//!
//! All fakes append to one shared [`EventLog`], so tests can assert the exact
//! interleaving of reset-line, delay, bus, bind and power calls. No hardware
//! and no allocator needed: the log is a fixed-capacity `heapless::Vec`
//! behind a `RefCell`.
//!
//! Host-only: built for unit tests and with the `std` feature, which the
//! integration tests enable.

#![cfg(any(test, feature = "std"))]

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;

use crate::bus::{BusIndex, BusProvisioner};
use crate::controller::{ControllerBinder, DeviceIndex, PowerControl, PowerLevel};
use crate::reset::{PinId, PinState, ResetLine};

/// Events kept per log; recording past it panics.
pub const LOG_CAPACITY: usize = 64;

/// One collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// `ResetLine::configure`
    Configure {
        /// Pin configured.
        pin: PinId,
        /// Initial level.
        initial: PinState,
    },
    /// `ResetLine::set_level`
    SetLevel {
        /// Pin driven.
        pin: PinId,
        /// Level driven.
        level: PinState,
    },
    /// `DelayNs::delay_ms`
    DelayMs(u32),
    /// `DelayNs::delay_ns`
    DelayNs(u32),
    /// `BusProvisioner::acquire_bus`
    AcquireBus {
        /// Bus requested.
        bus: BusIndex,
        /// Whether a handle was returned.
        granted: bool,
    },
    /// `ControllerBinder::bind`
    Bind {
        /// Bus the handle belongs to.
        bus: BusIndex,
        /// Whether a secondary handle was passed.
        aux: bool,
        /// Display requested.
        device: DeviceIndex,
        /// Whether a device handle was returned.
        accepted: bool,
    },
    /// `PowerControl::set_power`
    SetPower {
        /// Display powered.
        device: DeviceIndex,
        /// Level requested.
        level: PowerLevel,
    },
}

/// Error returned by fakes configured to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InjectedFault;

/// Shared, ordered record of collaborator calls.
pub struct EventLog {
    events: RefCell<heapless::Vec<Event, LOG_CAPACITY>>,
}

impl EventLog {
    /// Empty log.
    pub const fn new() -> Self {
        Self {
            events: RefCell::new(heapless::Vec::new()),
        }
    }

    /// Append `event`.
    ///
    /// # Panics
    ///
    /// If the log already holds [`LOG_CAPACITY`] events, so a test never
    /// asserts against a truncated trace.
    pub fn record(&self, event: Event) {
        let pushed = self.events.borrow_mut().push(event).is_ok();
        assert!(pushed, "event log full ({LOG_CAPACITY} events)");
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> heapless::Vec<Event, LOG_CAPACITY> {
        self.events.borrow().clone()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

// ── Reset line ───────────────────────────────────────────────────────────────

/// Reset line that records every call, optionally failing the n-th one.
pub struct RecordingResetLine<'a> {
    log: &'a EventLog,
    calls: u8,
    fail_at: Option<u8>,
}

impl<'a> RecordingResetLine<'a> {
    /// Reset line that always succeeds.
    pub fn new(log: &'a EventLog) -> Self {
        Self {
            log,
            calls: 0,
            fail_at: None,
        }
    }

    /// Reset line whose `call`-th operation (0-based, counting `configure`
    /// and `set_level` together) fails without being recorded.
    pub fn failing_at(log: &'a EventLog, call: u8) -> Self {
        Self {
            log,
            calls: 0,
            fail_at: Some(call),
        }
    }

    fn next_call(&mut self) -> Result<(), InjectedFault> {
        let n = self.calls;
        self.calls = n.saturating_add(1);
        if self.fail_at == Some(n) {
            Err(InjectedFault)
        } else {
            Ok(())
        }
    }
}

impl ResetLine for RecordingResetLine<'_> {
    type Error = InjectedFault;

    fn configure(&mut self, pin: PinId, initial: PinState) -> Result<(), InjectedFault> {
        self.next_call()?;
        self.log.record(Event::Configure { pin, initial });
        Ok(())
    }

    fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), InjectedFault> {
        self.next_call()?;
        self.log.record(Event::SetLevel { pin, level });
        Ok(())
    }
}

// ── Delay ────────────────────────────────────────────────────────────────────

/// Delay that returns immediately and records the requested duration.
pub struct RecordingDelay<'a> {
    log: &'a EventLog,
}

impl<'a> RecordingDelay<'a> {
    /// Delay recording into `log`.
    pub fn new(log: &'a EventLog) -> Self {
        Self { log }
    }
}

impl DelayNs for RecordingDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.log.record(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.record(Event::DelayMs(ms));
    }
}

// ── Bus ──────────────────────────────────────────────────────────────────────

/// Bus handle produced by [`FakeBuses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FakeBus(pub BusIndex);

/// Bus provisioner that grants or refuses every request.
pub struct FakeBuses<'a> {
    log: &'a EventLog,
    only: Option<BusIndex>,
    grant: bool,
}

impl<'a> FakeBuses<'a> {
    /// Every bus index is available.
    pub fn available(log: &'a EventLog) -> Self {
        Self {
            log,
            only: None,
            grant: true,
        }
    }

    /// No bus index is available.
    pub fn unavailable(log: &'a EventLog) -> Self {
        Self {
            log,
            only: None,
            grant: false,
        }
    }

    /// Only `bus` is available.
    pub fn only(log: &'a EventLog, bus: BusIndex) -> Self {
        Self {
            log,
            only: Some(bus),
            grant: true,
        }
    }
}

impl BusProvisioner for FakeBuses<'_> {
    type Bus = FakeBus;

    fn acquire_bus(&mut self, bus: BusIndex) -> Option<FakeBus> {
        let granted = self.grant && self.only.map_or(true, |only| only == bus);
        self.log.record(Event::AcquireBus { bus, granted });
        granted.then_some(FakeBus(bus))
    }
}

// ── Controller ───────────────────────────────────────────────────────────────

/// Controller binder with scripted bind and power outcomes.
pub struct FakeBinder<'a> {
    log: &'a EventLog,
    accept: bool,
    power_ok: bool,
}

impl<'a> FakeBinder<'a> {
    /// Binds every request; power-on succeeds.
    pub fn accepting(log: &'a EventLog) -> Self {
        Self {
            log,
            accept: true,
            power_ok: true,
        }
    }

    /// Rejects every request.
    pub fn rejecting(log: &'a EventLog) -> Self {
        Self {
            log,
            accept: false,
            power_ok: true,
        }
    }

    /// Binds every request; the bound display rejects power-on.
    pub fn accepting_power_fails(log: &'a EventLog) -> Self {
        Self {
            log,
            accept: true,
            power_ok: false,
        }
    }
}

impl<'a> ControllerBinder<FakeBus> for FakeBinder<'a> {
    type Device = FakeDisplay<'a>;

    fn bind(
        &mut self,
        bus: FakeBus,
        aux: Option<FakeBus>,
        device: DeviceIndex,
    ) -> Option<FakeDisplay<'a>> {
        self.log.record(Event::Bind {
            bus: bus.0,
            aux: aux.is_some(),
            device,
            accepted: self.accept,
        });
        self.accept.then_some(FakeDisplay {
            log: self.log,
            bus,
            device,
            power_ok: self.power_ok,
            level: PowerLevel::OFF,
        })
    }
}

/// Device handle produced by [`FakeBinder`].
#[derive(Debug)]
pub struct FakeDisplay<'a> {
    log: &'a EventLog,
    bus: FakeBus,
    device: DeviceIndex,
    power_ok: bool,
    level: PowerLevel,
}

impl FakeDisplay<'_> {
    /// Display index this handle was bound for.
    pub fn device(&self) -> DeviceIndex {
        self.device
    }

    /// Bus handle owned by this display.
    pub fn bus(&self) -> FakeBus {
        self.bus
    }

    /// Last power level accepted.
    pub fn power(&self) -> PowerLevel {
        self.level
    }
}

impl PowerControl for FakeDisplay<'_> {
    type Error = InjectedFault;

    fn set_power(&mut self, level: PowerLevel) -> Result<(), InjectedFault> {
        self.log.record(Event::SetPower {
            device: self.device,
            level,
        });
        if self.power_ok {
            self.level = level;
            Ok(())
        } else {
            Err(InjectedFault)
        }
    }
}

impl core::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.events.borrow().iter()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_call_order_across_fakes() {
        let log = EventLog::new();
        let pin = PinId::port_pin(1, 5);

        let mut reset = RecordingResetLine::new(&log);
        let mut delay = RecordingDelay::new(&log);
        reset.configure(pin, PinState::Low).unwrap();
        delay.delay_ms(20);
        reset.set_level(pin, PinState::High).unwrap();

        assert_eq!(
            log.events().as_slice(),
            &[
                Event::Configure {
                    pin,
                    initial: PinState::Low
                },
                Event::DelayMs(20),
                Event::SetLevel {
                    pin,
                    level: PinState::High
                },
            ]
        );
    }

    #[test]
    fn failing_reset_call_is_not_recorded() {
        let log = EventLog::new();
        let pin = PinId::new(0);
        let mut reset = RecordingResetLine::failing_at(&log, 1);

        assert!(reset.configure(pin, PinState::Low).is_ok());
        assert_eq!(reset.set_level(pin, PinState::Low), Err(InjectedFault));
        assert!(reset.set_level(pin, PinState::High).is_ok());
        assert_eq!(log.count(|e| matches!(e, Event::SetLevel { .. })), 1);
    }

    #[test]
    fn only_bus_grants_one_index() {
        let log = EventLog::new();
        let mut buses = FakeBuses::only(&log, BusIndex::new(1));
        assert_eq!(buses.acquire_bus(BusIndex::new(1)), Some(FakeBus(BusIndex::new(1))));
        assert_eq!(buses.acquire_bus(BusIndex::new(0)), None);
        assert_eq!(
            log.count(|e| matches!(e, Event::AcquireBus { granted: true, .. })),
            1
        );
    }

    #[test]
    fn display_rejecting_power_keeps_level_off() {
        let log = EventLog::new();
        let mut binder = FakeBinder::accepting_power_fails(&log);
        let mut display = binder
            .bind(FakeBus(BusIndex::new(0)), None, DeviceIndex::new(2))
            .unwrap();

        assert_eq!(display.set_power(PowerLevel::new(1)), Err(InjectedFault));
        assert_eq!(display.power(), PowerLevel::OFF);
        assert_eq!(display.device(), DeviceIndex::new(2));
    }

    #[test]
    fn log_holds_capacity_and_clears() {
        let log = EventLog::new();
        for ms in 0..LOG_CAPACITY {
            log.record(Event::DelayMs(u32::try_from(ms).unwrap()));
        }
        assert_eq!(log.events().len(), LOG_CAPACITY);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    #[should_panic(expected = "event log full")]
    fn overflowing_log_panics() {
        let log = EventLog::new();
        for ms in 0..=LOG_CAPACITY {
            log.record(Event::DelayMs(u32::try_from(ms).unwrap()));
        }
    }
}
