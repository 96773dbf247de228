//! Per-evaluation control channel values.

use serde::{Deserialize, Serialize};

/// What the controller senses from the plant at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    /// Ground reaction force from the leg spring [N], zero in flight.
    pub normal_force: f64,
    /// Contact condition `x <= l`.
    pub in_contact: bool,
}

impl ContactSample {
    pub fn flight() -> Self {
        Self {
            normal_force: 0.0,
            in_contact: false,
        }
    }
}

/// Actuator force and oscillator feedback for one right-hand-side evaluation.
///
/// Both values are pure functions of the current state and parameters.
/// They are returned by value and never written back into shared config.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlChannels {
    /// Actuator force `Fa` [N].
    pub fa: f64,
    /// Oscillator feedback `Fo` [rad/s].
    pub fo: f64,
}

impl ControlChannels {
    /// Both channels off.
    pub const IDLE: Self = Self { fa: 0.0, fo: 0.0 };
}
