//! Bring-up sequencing tests.
//!
//! Every collaborator is a recording fake sharing one event log, so each test
//! asserts the exact order in which the sequencer touched the hardware and
//! which stages it never reached.
//!
//! Run with: cargo test -p display-bringup --test bring_up_sequence

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)] // Tests index into known-length traces

use display_bringup::mocks::{
    Event, EventLog, FakeBinder, FakeBus, FakeBuses, RecordingDelay, RecordingResetLine,
};
use display_bringup::{
    BringUpConfig, BringUpError, BringUpSequencer, BusCapabilities, BusIndex, DeviceIndex, PinId,
    PinState, PowerLevel, ResetLineConfig, Stage,
};

const RST: PinId = PinId::port_pin(1, 5);
const BUS: BusIndex = BusIndex::new(1);
const DEV: DeviceIndex = DeviceIndex::new(0);

fn config() -> BringUpConfig {
    BringUpConfig::new(ResetLineConfig::active_low(RST), BUS)
        .with_capabilities(BusCapabilities::full())
}

/// The four reset-line events every bring-up starts with.
fn reset_sequence() -> [Event; 4] {
    [
        Event::Configure {
            pin: RST,
            initial: PinState::Low,
        },
        Event::SetLevel {
            pin: RST,
            level: PinState::Low,
        },
        Event::DelayMs(20),
        Event::SetLevel {
            pin: RST,
            level: PinState::High,
        },
    ]
}

fn is_bind(e: &Event) -> bool {
    matches!(e, Event::Bind { .. })
}

fn is_set_power(e: &Event) -> bool {
    matches!(e, Event::SetPower { .. })
}

// ---------------------------------------------------------------------------
// Scenario A: everything succeeds
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_returns_powered_handle() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config(),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::only(&log, BUS),
        FakeBinder::accepting(&log),
    )
    .unwrap();

    let display = seq.bring_up(DEV).unwrap();
    assert_eq!(display.device(), DEV);
    assert_eq!(display.bus(), FakeBus(BUS));
    assert_eq!(display.power(), PowerLevel::new(1));

    let events = log.events();
    let mut expected = reset_sequence().to_vec();
    expected.extend([
        Event::AcquireBus {
            bus: BUS,
            granted: true,
        },
        Event::Bind {
            bus: BUS,
            aux: false,
            device: DEV,
            accepted: true,
        },
        Event::SetPower {
            device: DEV,
            level: PowerLevel::new(1),
        },
    ]);
    assert_eq!(events.as_slice(), expected.as_slice());
}

// ---------------------------------------------------------------------------
// Scenario B: bus unavailable
// ---------------------------------------------------------------------------

#[test]
fn scenario_b_bus_unavailable() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config(),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::unavailable(&log),
        FakeBinder::accepting(&log),
    )
    .unwrap();

    let err = seq.bring_up(DEV).unwrap_err();
    assert_eq!(err, BringUpError::BusUnavailable { bus: BUS, device: DEV });
    assert_eq!(err.stage(), Stage::BusAcquisition);

    // Reset is sequenced in full regardless of the bus outcome.
    let events = log.events();
    assert_eq!(&events[..4], &reset_sequence());
    assert_eq!(
        events[4],
        Event::AcquireBus {
            bus: BUS,
            granted: false
        }
    );
    assert_eq!(events.len(), 5, "bind and power must never be invoked");
}

// ---------------------------------------------------------------------------
// Scenario C: controller rejects the bind
// ---------------------------------------------------------------------------

#[test]
fn scenario_c_bind_failed() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config(),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::available(&log),
        FakeBinder::rejecting(&log),
    )
    .unwrap();

    let err = seq.bring_up(DEV).unwrap_err();
    assert_eq!(err, BringUpError::BindFailed { bus: BUS, device: DEV });
    assert_eq!(err.stage(), Stage::Bind);
    assert_eq!(log.count(is_bind), 1);
    assert_eq!(log.count(is_set_power), 0, "no power call after a failed bind");
}

// ---------------------------------------------------------------------------
// Power activation failure
// ---------------------------------------------------------------------------

#[test]
fn power_failure_is_reported_not_swallowed() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config(),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::available(&log),
        FakeBinder::accepting_power_fails(&log),
    )
    .unwrap();

    let err = seq.bring_up(DEV).unwrap_err();
    assert_eq!(
        err,
        BringUpError::PowerActivationFailed {
            device: DEV,
            level: PowerLevel::new(1),
        }
    );
    assert_eq!(err.stage(), Stage::PowerOn);
    assert_eq!(log.count(is_set_power), 1, "power-on is attempted exactly once");
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn reset_completes_before_bus_acquisition() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config().with_settle_delay_ms(35),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::available(&log),
        FakeBinder::accepting(&log),
    )
    .unwrap();

    seq.bring_up(DEV).unwrap();

    let events = log.events();
    let acquire = events
        .iter()
        .position(|e| matches!(e, Event::AcquireBus { .. }))
        .unwrap();
    let before = &events[..acquire];

    assert_eq!(
        before.iter().filter(|e| matches!(e, Event::Configure { .. })).count(),
        1
    );
    assert_eq!(
        before
            .iter()
            .filter(|e| matches!(e, Event::SetLevel { level: PinState::Low, .. }))
            .count(),
        1,
        "exactly one assert"
    );
    assert_eq!(
        before
            .iter()
            .filter(|e| matches!(e, Event::SetLevel { level: PinState::High, .. }))
            .count(),
        1,
        "exactly one deassert"
    );
    assert_eq!(before.iter().filter(|e| matches!(e, Event::DelayMs(_))).count(), 1);
    assert_eq!(before[2], Event::DelayMs(35), "settle delay sits between assert and deassert");
}

// ---------------------------------------------------------------------------
// No hidden state between calls
// ---------------------------------------------------------------------------

#[test]
fn repeated_bring_up_gives_same_outcome() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config(),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::available(&log),
        FakeBinder::accepting(&log),
    )
    .unwrap();

    let first = seq.bring_up(DEV).unwrap();
    drop(first);
    let first_run = log.events();
    log.clear();

    let second = seq.bring_up(DEV).unwrap();
    assert_eq!(second.power(), PowerLevel::new(1));
    assert_eq!(log.events(), first_run);
}

#[test]
fn repeated_failure_gives_same_outcome() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config(),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::available(&log),
        FakeBinder::rejecting(&log),
    )
    .unwrap();

    let first = seq.bring_up(DEV).unwrap_err();
    let second = seq.bring_up(DEV).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(log.count(is_bind), 2);
}

// ---------------------------------------------------------------------------
// Device index passthrough
// ---------------------------------------------------------------------------

#[test]
fn device_index_reaches_binder_unvalidated() {
    let log = EventLog::new();
    let mut seq = BringUpSequencer::new(
        config(),
        RecordingResetLine::new(&log),
        RecordingDelay::new(&log),
        FakeBuses::available(&log),
        FakeBinder::accepting(&log),
    )
    .unwrap();

    let device = DeviceIndex::new(u32::MAX);
    let display = seq.bring_up(device).unwrap();
    assert_eq!(display.device(), device);
    assert_eq!(
        log.count(|e| matches!(e, Event::Bind { device: d, aux: false, .. } if *d == device)),
        1
    );
}
