//! TEGOTAE controller: actuator gate + feedback + oscillator.

use serde::{Deserialize, Serialize};

use crate::channels::{ContactSample, ControlChannels};
use crate::gate::ActuatorGate;
use crate::oscillator::PhaseOscillator;
use crate::tegotae::TegotaeFeedback;

/// Full control law for one leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TegotaeController {
    pub gate: ActuatorGate,
    pub feedback: TegotaeFeedback,
    pub oscillator: PhaseOscillator,
}

impl TegotaeController {
    pub fn new(gate: ActuatorGate, feedback: TegotaeFeedback, oscillator: PhaseOscillator) -> Self {
        Self {
            gate,
            feedback,
            oscillator,
        }
    }

    /// Compute both channels from the current phase and contact sample.
    ///
    /// Feedback first, then actuation, both from the same `phi`.
    pub fn channels(&self, phi: f64, contact: ContactSample) -> ControlChannels {
        let fo = self
            .feedback
            .applied(contact.normal_force, phi, contact.in_contact);
        let fa = self.gate.force(phi, contact.in_contact);
        ControlChannels { fa, fo }
    }

    /// `(dphi/dt, 0)` for the given channel values.
    pub fn phase_derivatives(&self, channels: ControlChannels) -> (f64, f64) {
        self.oscillator.derivatives(channels.fo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn controller() -> TegotaeController {
        TegotaeController::new(
            ActuatorGate::new(4.0, 0.1 * PI, 1.6 * PI).unwrap(),
            TegotaeFeedback::new(2.753).unwrap(),
            PhaseOscillator::new(5.0).unwrap(),
        )
    }

    #[test]
    fn idle_in_flight_regardless_of_phase() {
        let ctrl = controller();
        for phi in [0.0, 1.6 * PI, 1.65 * PI, 3.0] {
            assert_eq!(ctrl.channels(phi, ContactSample::flight()), ControlChannels::IDLE);
        }
    }

    #[test]
    fn stance_inside_window() {
        let ctrl = controller();
        let phi = 1.6 * PI;
        let ch = ctrl.channels(
            phi,
            ContactSample {
                normal_force: 1.0,
                in_contact: true,
            },
        );
        assert_eq!(ch.fa, 4.0);
        assert!((ch.fo - 2.753 * (-phi.cos())).abs() < 1e-12);
    }

    #[test]
    fn channels_are_stateless() {
        let ctrl = controller();
        let sample = ContactSample {
            normal_force: 2.0,
            in_contact: true,
        };
        let a = ctrl.channels(1.0, sample);
        let _ = ctrl.channels(1.6 * PI, sample);
        let b = ctrl.channels(1.0, sample);
        assert_eq!(a, b);
    }
}
