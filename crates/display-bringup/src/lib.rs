//! Display bring-up sequencer
//!
//! Takes a display controller from power-applied / held-in-reset to a bound,
//! powered device handle over a shared serial bus.
//!
//! # Sequence
//!
//! ```text
//! configure reset pin (asserted)
//!         ↓
//! hold for settle delay
//!         ↓
//! release reset (optional post-reset delay)
//!         ↓
//! acquire bus ──────────── None → BusUnavailable
//!         ↓
//! bind controller ──────── None → BindFailed
//!         ↓
//! set_power(max_power) ─── Err  → PowerActivationFailed
//!         ↓
//! device handle
//! ```
//!
//! Every stage is a one-shot call into an external collaborator. The
//! collaborators are traits ([`ResetLine`], [`BusProvisioner`],
//! [`ControllerBinder`], [`PowerControl`]) plus
//! [`embedded_hal::delay::DelayNs`] for the settle wait, so host tests can
//! inject the recording fakes from `mocks` (built with the `std` feature).
//!
//! # Features
//!
//! - `std`: implement `std::error::Error` for the error types and build the
//!   `mocks` module
//! - `defmt`: `defmt::Format` derives and defmt log output (hardware)
//! - `tracing`: log output through `tracing` (desktop / simulator)
//!
//! # Example
//!
//! ```no_run
//! use display_bringup::{
//!     board::samd20_xplained::{oled1_config, Oled1Header},
//!     BringUpSequencer, BusProvisioner, ControllerBinder, DeviceIndex, ResetLine,
//! };
//! use embedded_hal::delay::DelayNs;
//!
//! fn start<R, D, P, C>(reset: R, delay: D, buses: P, binder: C)
//! where
//!     R: ResetLine,
//!     D: DelayNs,
//!     P: BusProvisioner,
//!     C: ControllerBinder<P::Bus>,
//! {
//!     let config = oled1_config(Oled1Header::Ext1);
//!     let Ok(mut sequencer) = BringUpSequencer::new(config, reset, delay, buses, binder) else {
//!         return;
//!     };
//!     let _display = sequencer.bring_up(DeviceIndex::new(0));
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // pin and chip names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod log;

pub mod board;
pub mod bus;
pub mod config;
pub mod controller;
pub mod error;
pub mod mocks;
pub mod reset;
pub mod sequencer;

pub use bus::{BusIndex, BusProvisioner, BusSlots};
pub use config::{
    BringUpConfig, BusCapabilities, ConfigError, POST_RESET_DELAY_MS, RESET_SETTLE_MS,
};
pub use controller::{ControllerBinder, DeviceIndex, PowerControl, PowerLevel};
pub use error::{BringUpError, ResetStep, Stage};
pub use reset::{GpioResetError, GpioResetLine, PinId, PinState, Polarity, ResetLine, ResetLineConfig};
pub use sequencer::BringUpSequencer;
