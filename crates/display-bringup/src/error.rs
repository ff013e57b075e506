//! Bring-up errors
//!
//! Every variant is terminal for the call that produced it and names the
//! stage that failed and the display it was bringing up. Collaborator error
//! payloads are not carried; the collaborator is expected to have logged its
//! own detail.

use crate::bus::BusIndex;
use crate::config::ConfigError;
use crate::controller::{DeviceIndex, PowerLevel};

/// Reset-line operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetStep {
    /// Configuring the pin with its asserted initial level.
    Configure,
    /// Driving the line to the asserted level.
    Assert,
    /// Driving the line to the released level.
    Deassert,
}

impl core::fmt::Display for ResetStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Configure => write!(f, "configure"),
            Self::Assert => write!(f, "assert"),
            Self::Deassert => write!(f, "deassert"),
        }
    }
}

/// Bring-up stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Startup-configuration validation.
    Configuration,
    /// Reset-line sequencing (assert, hold, release).
    Reset,
    /// Bus acquisition.
    BusAcquisition,
    /// Controller binding.
    Bind,
    /// Power activation.
    PowerOn,
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Reset => write!(f, "reset"),
            Self::BusAcquisition => write!(f, "bus acquisition"),
            Self::Bind => write!(f, "controller bind"),
            Self::PowerOn => write!(f, "power activation"),
        }
    }
}

/// Why a bring-up did not produce a device handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError {
    /// The startup configuration failed validation.
    InvalidConfig(ConfigError),
    /// The reset-line controller reported an error.
    ResetLine {
        /// Operation that failed.
        step: ResetStep,
        /// Display being brought up.
        device: DeviceIndex,
    },
    /// The bus provisioner could not supply a handle.
    BusUnavailable {
        /// Bus requested.
        bus: BusIndex,
        /// Display being brought up.
        device: DeviceIndex,
    },
    /// The controller rejected the bus handle or device index.
    BindFailed {
        /// Bus handed to the binder.
        bus: BusIndex,
        /// Display being brought up.
        device: DeviceIndex,
    },
    /// The bound display rejected the power-on request.
    PowerActivationFailed {
        /// Display being brought up.
        device: DeviceIndex,
        /// Level requested.
        level: PowerLevel,
    },
}

impl BringUpError {
    /// Stage that failed.
    pub const fn stage(&self) -> Stage {
        match self {
            Self::InvalidConfig(_) => Stage::Configuration,
            Self::ResetLine { .. } => Stage::Reset,
            Self::BusUnavailable { .. } => Stage::BusAcquisition,
            Self::BindFailed { .. } => Stage::Bind,
            Self::PowerActivationFailed { .. } => Stage::PowerOn,
        }
    }

    /// Display the failure belongs to, if the sequence got that far.
    pub const fn device(&self) -> Option<DeviceIndex> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::ResetLine { device, .. }
            | Self::BusUnavailable { device, .. }
            | Self::BindFailed { device, .. }
            | Self::PowerActivationFailed { device, .. } => Some(*device),
        }
    }
}

impl From<ConfigError> for BringUpError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

impl core::fmt::Display for BringUpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "invalid bring-up configuration: {err}"),
            Self::ResetLine { step, device } => {
                write!(f, "reset line {step} failed for display {device}")
            }
            Self::BusUnavailable { bus, device } => {
                write!(f, "bus {bus} unavailable for display {device}")
            }
            Self::BindFailed { bus, device } => {
                write!(f, "failed to bind bus {bus} to display {device}")
            }
            Self::PowerActivationFailed { device, level } => {
                write!(f, "display {device} rejected power level {level}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BringUpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}
