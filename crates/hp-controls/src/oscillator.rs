//! Phase oscillator (CPG) dynamics.

use hp_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::ControlResult;

/// First-order phase oscillator: `dphi/dt = omega + Fo`.
///
/// The state vector carries a second phase slot (`dphi`) so both
/// subsystems share a uniform 4-wide layout. That slot is a derived
/// copy of the phase rate, not an integrated quantity: its derivative
/// is identically zero and it is never read as angular acceleration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseOscillator {
    /// Intrinsic angular frequency [rad/s].
    pub omega: f64,
}

impl PhaseOscillator {
    pub fn new(omega: f64) -> ControlResult<Self> {
        ensure_finite(omega, "omega")?;
        Ok(Self { omega })
    }

    /// Instantaneous phase rate under feedback `fo`.
    #[inline]
    pub fn phase_rate(&self, fo: f64) -> f64 {
        self.omega + fo
    }

    /// `(dphi/dt, d(dphi)/dt)`; the second entry is always zero.
    pub fn derivatives(&self, fo: f64) -> (f64, f64) {
        (self.phase_rate(fo), 0.0)
    }

    /// Time for `cycles` free-running revolutions.
    pub fn period(&self, cycles: f64) -> f64 {
        cycles * core::f64::consts::TAU / self.omega
    }
}
