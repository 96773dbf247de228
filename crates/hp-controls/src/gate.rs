//! Phase-windowed actuator.

use core::f64::consts::TAU;

use hp_core::{ensure_finite, wrap_phase};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Constant-thrust actuator gated by an oscillator phase window.
///
/// Fires `amplitude` newtons while `phase <= (phi mod 2π) < phase + duration`
/// and the leg is on the ground. Only `phi` is wrapped: `phase` and
/// `duration` are compared literally, so a window whose upper bound exceeds
/// `2π` is never re-wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorGate {
    /// Thrust while active [N].
    pub amplitude: f64,
    /// Window width in phase radians, `0 <= duration < 2π`.
    pub duration: f64,
    /// Window start [rad].
    pub phase: f64,
}

impl ActuatorGate {
    pub fn new(amplitude: f64, duration: f64, phase: f64) -> ControlResult<Self> {
        ensure_finite(amplitude, "actuator amplitude")?;
        ensure_finite(duration, "actuator duration")?;
        ensure_finite(phase, "actuator phase")?;
        if duration < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "actuator duration must be non-negative",
            });
        }
        if duration >= TAU {
            return Err(ControlError::InvalidArg {
                what: "actuator duration must be less than 2π",
            });
        }
        Ok(Self {
            amplitude,
            duration,
            phase,
        })
    }

    /// Half-open window test on the wrapped oscillator phase.
    pub fn is_active(&self, phi: f64) -> bool {
        let wrapped = wrap_phase(phi);
        self.phase <= wrapped && wrapped < self.phase + self.duration
    }

    /// Actuator force for the given phase and contact condition.
    pub fn force(&self, phi: f64, in_contact: bool) -> f64 {
        if in_contact && self.is_active(phi) {
            self.amplitude
        } else {
            0.0
        }
    }
}
