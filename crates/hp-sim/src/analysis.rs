//! Trajectory analysis: channel series, height statistics, energy cost.
//!
//! Channel values are re-derived from each sample's `x` and `phi`, never
//! pulled from integration internals. Summary statistics use the second
//! half of the run to skip the start-up transient.

use hp_controls::PhaseOscillator;
use hp_core::mean;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::params::SimulationParameters;
use crate::system::CoupledSystem;
use crate::trajectory::Trajectory;

/// Per-sample series plus steady-state summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Actuator force per sample [N].
    pub force: Vec<f64>,
    /// Applied oscillator feedback per sample [rad/s].
    pub feedback: Vec<f64>,
    /// Actuator power `force * y` per sample [W].
    pub power: Vec<f64>,
    /// Mean height over the second half [m].
    pub ave_height: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// Mean actuator power over one window of `6π/omega` seconds,
    /// starting at the midpoint [W].
    pub energy_cost: f64,
}

impl AnalysisResult {
    /// Hop amplitude `max - min` over the second half [m].
    pub fn amplitude(&self) -> f64 {
        self.max_height - self.min_height
    }

    /// Amplitude per unit energy cost; `None` when no power was spent.
    pub fn efficiency(&self) -> Option<f64> {
        if self.energy_cost == 0.0 {
            None
        } else {
            Some(self.amplitude() / self.energy_cost)
        }
    }
}

/// Energy-cost window `6π/omega` [s]: three free-running oscillator cycles.
pub fn energy_window(omega: f64) -> f64 {
    PhaseOscillator { omega }.period(3.0)
}

/// Analyze `trajectory` sampled every `dt` seconds.
pub fn analyze(
    trajectory: &Trajectory,
    dt: f64,
    params: &SimulationParameters,
) -> SimResult<AnalysisResult> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SimError::Configuration {
            field: "dt",
            reason: "dt must be positive and finite",
        });
    }
    let system = CoupledSystem::new(params.clone())?;

    let samples = trajectory.samples();
    let mut force = Vec::with_capacity(samples.len());
    let mut feedback = Vec::with_capacity(samples.len());
    let mut power = Vec::with_capacity(samples.len());
    for s in samples {
        let ch = system.channels(s);
        force.push(ch.fa);
        feedback.push(ch.fo);
        power.push(ch.fa * s.y);
    }

    let len = samples.len();
    let half = len / 2;
    let heights: Vec<f64> = samples[half..].iter().map(|s| s.x).collect();
    let ave_height = mean(&heights).ok_or(SimError::InsufficientSamples {
        what: "height statistics",
        available: 0,
        required: 1,
    })?;
    let min_height = heights.iter().copied().fold(f64::INFINITY, f64::min);
    let max_height = heights.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let window = energy_window(params.omega);
    if !window.is_finite() || window <= 0.0 {
        return Err(SimError::Configuration {
            field: "omega",
            reason: "omega must be positive to define the energy-cost window",
        });
    }
    // truncating, same as the sample count the dashboard used
    let window_samples = (window / dt) as usize;
    let available = len - half;
    if window_samples == 0 || window_samples > available {
        return Err(SimError::InsufficientSamples {
            what: "energy-cost window",
            available,
            required: window_samples.max(1),
        });
    }
    let energy_cost =
        power[half..half + window_samples].iter().sum::<f64>() / window_samples as f64;

    Ok(AnalysisResult {
        force,
        feedback,
        power,
        ave_height,
        min_height,
        max_height,
        energy_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterField;
    use crate::state::HopperState;

    fn constant(x: f64, y: f64, phi: f64, n: usize, dt: f64) -> Trajectory {
        Trajectory::new(0.0, dt, vec![HopperState::new(x, y, phi, 0.0); n])
    }

    #[test]
    fn channels_rederived_per_sample() {
        let params = SimulationParameters::default();
        let phi = params.phase + 0.01;
        let traj = constant(0.9, -0.5, phi, 2000, 0.01);
        let res = analyze(&traj, 0.01, &params).unwrap();
        assert!(res.force.iter().all(|&f| f == 4.0));
        assert!(res.power.iter().all(|&p| (p + 2.0).abs() < 1e-12));
        let expected_fb = 2.753 * 5.0 * (1.0 - 0.9) * (-phi.cos());
        assert!((res.feedback[0] - expected_fb).abs() < 1e-12);
        assert!((res.energy_cost + 2.0).abs() < 1e-12);
    }

    #[test]
    fn flight_samples_read_zero() {
        let params = SimulationParameters::default();
        let traj = constant(1.2, 1.0, params.phase + 0.01, 2000, 0.01);
        let res = analyze(&traj, 0.01, &params).unwrap();
        assert!(res.force.iter().all(|&f| f == 0.0));
        assert!(res.feedback.iter().all(|&f| f == 0.0));
        assert_eq!(res.energy_cost, 0.0);
        assert_eq!(res.efficiency(), None);
    }

    #[test]
    fn heights_use_second_half() {
        let params = SimulationParameters::default();
        let samples: Vec<HopperState> = (0..1000)
            .map(|i| {
                let x = if i < 500 {
                    5.0
                } else {
                    0.5 + (i % 2) as f64 * 0.2
                };
                HopperState::new(x, 0.0, 0.0, 0.0)
            })
            .collect();
        let traj = Trajectory::new(0.0, 0.01, samples);
        let res = analyze(&traj, 0.01, &params).unwrap();
        assert!((res.ave_height - 0.6).abs() < 1e-12);
        assert_eq!(res.min_height, 0.5);
        assert!((res.max_height - 0.7).abs() < 1e-12);
        assert!((res.amplitude() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn empty_trajectory_is_insufficient() {
        let params = SimulationParameters::default();
        let traj = Trajectory::new(0.0, 0.01, Vec::new());
        let err = analyze(&traj, 0.01, &params).unwrap_err();
        assert!(matches!(
            err,
            SimError::InsufficientSamples {
                what: "height statistics",
                ..
            }
        ));
    }

    #[test]
    fn short_run_cannot_cover_energy_window() {
        let params = SimulationParameters::default();
        // window 6π/5 ≈ 3.77 s needs 376 samples at dt = 0.01; only 50 available
        let traj = constant(0.9, 0.0, 0.0, 100, 0.01);
        let err = analyze(&traj, 0.01, &params).unwrap_err();
        match err {
            SimError::InsufficientSamples {
                available, required, ..
            } => {
                assert_eq!(available, 50);
                assert_eq!(required, 376);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_omega() {
        let params = SimulationParameters::default().with(ParameterField::Omega, 0.0);
        let traj = constant(0.9, 0.0, 0.0, 1000, 0.01);
        assert!(matches!(
            analyze(&traj, 0.01, &params),
            Err(SimError::Configuration { field: "omega", .. })
        ));
    }
}
