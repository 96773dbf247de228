//! TEGOTAE (reaction-force) phase feedback.
//!
//! The feedback is the phase derivative of the tegotae function
//! `T(phi) = N * (-sin phi)`, where `N` is the ground reaction force:
//!
//! ```text
//! dT/dphi = N * (-cos phi)
//! Fo      = sigma * dT/dphi      (in contact)
//! Fo      = 0                    (in flight)
//! ```

use hp_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::ControlResult;

/// Reaction-force feedback with gain `sigma` [rad/(N·s)].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TegotaeFeedback {
    pub sigma: f64,
}

impl TegotaeFeedback {
    pub fn new(sigma: f64) -> ControlResult<Self> {
        ensure_finite(sigma, "feedback gain")?;
        Ok(Self { sigma })
    }

    /// Un-gained feedback signal `N * (-cos phi)`.
    pub fn raw(normal_force: f64, phi: f64) -> f64 {
        normal_force * (-phi.cos())
    }

    /// Feedback injected into the oscillator.
    pub fn applied(&self, normal_force: f64, phi: f64, in_contact: bool) -> f64 {
        if in_contact {
            self.sigma * Self::raw(normal_force, phi)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    #[test]
    fn zero_force_gives_zero_feedback() {
        let fb = TegotaeFeedback::new(2.753).unwrap();
        for phi in [0.0, 0.5, PI, 4.0] {
            assert_eq!(TegotaeFeedback::raw(0.0, phi).abs(), 0.0);
            assert_eq!(fb.applied(0.0, phi, true).abs(), 0.0);
        }
    }

    #[test]
    fn flight_suppresses_feedback() {
        let fb = TegotaeFeedback::new(2.753).unwrap();
        assert_eq!(fb.applied(3.0, PI, false), 0.0);
    }

    #[test]
    fn gain_scales_raw_signal() {
        let fb = TegotaeFeedback::new(2.0).unwrap();
        // -cos(pi) = 1
        assert!((fb.applied(1.5, PI, true) - 3.0).abs() < 1e-12);
        assert!((fb.applied(1.5, 0.0, true) + 3.0).abs() < 1e-12);
    }
}
