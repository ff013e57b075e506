//! Bring-up state machine.
//!
//! Enforces the ordering that takes a display from held-in-reset to a bound,
//! powered handle:
//!
//! ```text
//! assert_reset() --> [ResetHeld] --release_reset()--> [ResetReleased]
//!     --acquire_bus()--> [BusAcquired] --bind()--> [Bound] --power_on()--> [Powered]
//! ```
//!
//! Each stage consumes the token produced by the stage before it, so the
//! ordering cannot be rearranged without a compile error. Any stage failure
//! ends the sequence; tokens (and any bus or device they carry) are dropped,
//! so no partial handle escapes.
//!
//! ## Ordering constraints
//! - The reset line is driven to its asserted level as part of configuring
//!   it, before any bus wiring is touched, so the controller cannot contend
//!   for the bus while clocks settle.
//! - Reset stays asserted for at least `settle_delay_ms` (minimum reset pulse
//!   width) and is released before bus acquisition.
//! - The binder only ever sees a bus handle that the provisioner returned.
//! - `set_power` only runs on a handle the binder returned, and its result
//!   decides the outcome of the whole sequence.

use embedded_hal::delay::DelayNs;

use crate::bus::BusProvisioner;
use crate::config::{BringUpConfig, ConfigError};
use crate::controller::{ControllerBinder, DeviceIndex, PowerControl};
use crate::error::{BringUpError, ResetStep};
use crate::reset::ResetLine;

// ── Stage tokens ─────────────────────────────────────────────────────────────

/// Reset line configured and asserted.
struct ResetHeld(());

/// Reset held for the settle time, then released.
struct ResetReleased(());

/// Bus handle obtained from the provisioner.
struct BusAcquired<B>(B);

/// Controller bound to the bus.
struct Bound<Dev>(Dev);

/// Controller accepted the power-on level.
struct Powered<Dev>(Dev);

impl<Dev> Powered<Dev> {
    fn into_device(self) -> Dev {
        self.0
    }
}

// ── Sequencer ────────────────────────────────────────────────────────────────

/// Brings one display up over its collaborators.
///
/// - `R` drives the reset line.
/// - `D` provides the blocking settle delay.
/// - `P` hands out bus handles.
/// - `C` binds a bus handle to the display controller.
///
/// The configuration is validated once, in [`BringUpSequencer::new`]; a
/// sequencer never exists with a configuration that failed validation.
/// `bring_up` keeps no state between calls.
pub struct BringUpSequencer<R, D, P, C> {
    config: BringUpConfig,
    reset: R,
    delay: D,
    buses: P,
    binder: C,
}

impl<R, D, P, C> BringUpSequencer<R, D, P, C>
where
    R: ResetLine,
    D: DelayNs,
    P: BusProvisioner,
    C: ControllerBinder<P::Bus>,
{
    /// Validate `config` and assemble a sequencer.
    pub fn new(
        config: BringUpConfig,
        reset: R,
        delay: D,
        buses: P,
        binder: C,
    ) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            error!("invalid bring-up configuration: {}", err);
            return Err(err);
        }
        Ok(Self {
            config,
            reset,
            delay,
            buses,
            binder,
        })
    }

    /// Configuration this sequencer runs with.
    pub fn config(&self) -> &BringUpConfig {
        &self.config
    }

    /// Give back the collaborators.
    pub fn into_parts(self) -> (R, D, P, C) {
        (self.reset, self.delay, self.buses, self.binder)
    }

    /// Run the full sequence for display `device`.
    ///
    /// Single attempt: nothing is retried and nothing is released on
    /// failure. The caller decides whether to run the sequence again.
    pub fn bring_up(&mut self, device: DeviceIndex) -> Result<C::Device, BringUpError> {
        let held = self.assert_reset(device)?;
        let released = self.release_reset(held, device)?;
        let bus = self.acquire_bus(released, device)?;
        let bound = self.bind(bus, device)?;
        let powered = self.power_on(bound, device)?;
        Ok(powered.into_device())
    }

    // ── Stages ───────────────────────────────────────────────────────────────

    fn reset_failed(&self, step: ResetStep, device: DeviceIndex) -> BringUpError {
        error!(
            "reset line {} {} failed for display {}",
            self.config.reset.pin,
            step,
            device
        );
        BringUpError::ResetLine { step, device }
    }

    /// Configure the reset pin with the asserted level as its initial state,
    /// then drive the asserted level explicitly.
    fn assert_reset(&mut self, device: DeviceIndex) -> Result<ResetHeld, BringUpError> {
        let pin = self.config.reset.pin;
        let asserted = self.config.reset.polarity.asserted();

        if self.reset.configure(pin, asserted).is_err() {
            return Err(self.reset_failed(ResetStep::Configure, device));
        }
        if self.reset.set_level(pin, asserted).is_err() {
            return Err(self.reset_failed(ResetStep::Assert, device));
        }
        debug!("display {}: reset {} asserted ({})", device, pin, asserted);
        Ok(ResetHeld(()))
    }

    /// Hold reset for the settle time, release it, then wait out the
    /// post-reset delay if one is configured.
    fn release_reset(
        &mut self,
        _held: ResetHeld,
        device: DeviceIndex,
    ) -> Result<ResetReleased, BringUpError> {
        let pin = self.config.reset.pin;

        self.delay.delay_ms(self.config.settle_delay_ms);
        if self
            .reset
            .set_level(pin, self.config.reset.polarity.released())
            .is_err()
        {
            return Err(self.reset_failed(ResetStep::Deassert, device));
        }
        if self.config.post_reset_delay_ms > 0 {
            self.delay.delay_ms(self.config.post_reset_delay_ms);
        }
        debug!(
            "display {}: reset {} released after {} ms",
            device,
            pin,
            self.config.settle_delay_ms
        );
        Ok(ResetReleased(()))
    }

    fn acquire_bus(
        &mut self,
        _released: ResetReleased,
        device: DeviceIndex,
    ) -> Result<BusAcquired<P::Bus>, BringUpError> {
        let bus = self.config.bus;
        let Some(handle) = self.buses.acquire_bus(bus) else {
            error!("failed to initialise bus {} for display {}", bus, device);
            return Err(BringUpError::BusUnavailable { bus, device });
        };
        debug!("display {}: acquired bus {}", device, bus);
        Ok(BusAcquired(handle))
    }

    fn bind(
        &mut self,
        acquired: BusAcquired<P::Bus>,
        device: DeviceIndex,
    ) -> Result<Bound<C::Device>, BringUpError> {
        let bus = self.config.bus;
        let Some(handle) = self.binder.bind(acquired.0, None, device) else {
            error!("failed to bind bus {} to display {}", bus, device);
            return Err(BringUpError::BindFailed { bus, device });
        };
        info!("bound bus {} to display {}", bus, device);
        Ok(Bound(handle))
    }

    fn power_on(
        &mut self,
        bound: Bound<C::Device>,
        device: DeviceIndex,
    ) -> Result<Powered<C::Device>, BringUpError> {
        let level = self.config.max_power;
        let mut handle = bound.0;
        if handle.set_power(level).is_err() {
            error!("display {} rejected power level {}", device, level);
            return Err(BringUpError::PowerActivationFailed { device, level });
        }
        info!("display {} powered on at level {}", device, level);
        Ok(Powered(handle))
    }
}
