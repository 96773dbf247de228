//! Simulation runner.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult};
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;
use crate::params::SimulationParameters;
use crate::state::HopperState;
use crate::system::CoupledSystem;
use crate::trajectory::Trajectory;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate, 4 rhs calls per step).
    #[default]
    #[serde(rename = "rk4")]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    #[serde(rename = "euler", alias = "forward_euler")]
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Final simulation time (seconds), exclusive
    pub max_t: f64,
    /// Keep every N-th sample for playback
    pub stride: usize,
    /// Maximum number of dense samples (safety limit)
    pub max_steps: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1.0e-4,
            max_t: 15.0,
            stride: 100,
            max_steps: 50_000_000,
            integrator: IntegratorType::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimError::Configuration {
                field: "dt",
                reason: "dt must be positive and finite",
            });
        }
        if !self.max_t.is_finite() || self.max_t < 0.0 {
            return Err(SimError::Configuration {
                field: "max_t",
                reason: "max_t must be non-negative and finite",
            });
        }
        if self.stride == 0 {
            return Err(SimError::Configuration {
                field: "stride",
                reason: "stride must be at least 1",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::Configuration {
                field: "max_steps",
                reason: "max_steps must be positive",
            });
        }
        if sample_count(self.max_t, self.dt) > self.max_steps {
            return Err(SimError::Configuration {
                field: "max_t",
                reason: "run needs more samples than max_steps allows",
            });
        }
        Ok(())
    }

    /// Spacing of the decimated trajectory.
    pub fn playback_dt(&self) -> f64 {
        self.dt * self.stride as f64
    }
}

/// Dense sample count on the grid `[0, max_t)` with step `dt`: `ceil(max_t/dt)`.
pub fn sample_count(max_t: f64, dt: f64) -> usize {
    let n = (max_t / dt).ceil();
    // Saturates to usize::MAX when the ratio overflows.
    if n > 0.0 { n as usize } else { 0 }
}

/// Progress report passed to the integration callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProgress {
    /// Samples produced so far.
    pub step: usize,
    /// Samples the run will produce.
    pub total: usize,
    /// Simulation time of the latest sample [s].
    pub t: f64,
}

impl StepProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.step as f64 / self.total as f64
        }
    }
}

/// Integrate from `t = 0` to `max_t` with fixed-step RK4.
pub fn integrate(
    initial: HopperState,
    max_t: f64,
    dt: f64,
    params: &SimulationParameters,
) -> SimResult<Trajectory> {
    let opts = SimOptions {
        dt,
        max_t,
        ..SimOptions::default()
    };
    integrate_with(initial, params, &opts)
}

/// Integrate with explicit options.
pub fn integrate_with(
    initial: HopperState,
    params: &SimulationParameters,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    integrate_with_progress(initial, params, opts, None)
}

/// Integrate, reporting progress roughly every 1% of samples.
///
/// On a non-finite state the run stops with
/// [`SimError::NumericalInstability`] carrying the finite prefix.
pub fn integrate_with_progress(
    initial: HopperState,
    params: &SimulationParameters,
    opts: &SimOptions,
    mut progress: Option<&mut dyn FnMut(StepProgress)>,
) -> SimResult<Trajectory> {
    opts.validate()?;
    let system = CoupledSystem::new(params.clone())?;
    if !initial.is_finite() {
        return Err(SimError::Configuration {
            field: "initial_state",
            reason: "initial state must be finite",
        });
    }

    let total = sample_count(opts.max_t, opts.dt);
    debug!(
        samples = total,
        dt = opts.dt,
        max_t = opts.max_t,
        integrator = ?opts.integrator,
        "starting integration"
    );

    let mut trajectory = Trajectory::try_with_capacity(0.0, opts.dt, total)?;
    if total == 0 {
        return Ok(trajectory);
    }

    let report_every = (total / 100).max(1);
    let mut x = system.project(initial);
    trajectory.push(x);

    for step in 1..total {
        let t = trajectory.time_at(step - 1);
        let next = match opts.integrator {
            IntegratorType::RK4 => RK4.step(&system, t, &x, opts.dt)?,
            IntegratorType::ForwardEuler => ForwardEuler.step(&system, t, &x, opts.dt)?,
        };

        if !next.is_finite() {
            let time = trajectory.time_at(step);
            warn!(step, time, "non-finite state, aborting run");
            return Err(SimError::NumericalInstability {
                step,
                time,
                partial: Box::new(trajectory),
            });
        }

        x = system.project(next);
        trajectory.push(x);

        if step % report_every == 0 {
            if let Some(cb) = progress.as_mut() {
                cb(StepProgress {
                    step: step + 1,
                    total,
                    t: trajectory.time_at(step),
                });
            }
        }
    }

    if let Some(cb) = progress.as_mut() {
        cb(StepProgress {
            step: total,
            total,
            t: trajectory.time_at(total - 1),
        });
    }

    Ok(trajectory)
}
