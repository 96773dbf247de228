//! Hopping-leg simulation: plant, coupled dynamics, integration, analysis.
//!
//! Provides:
//! - Unilateral spring contact and vertical body dynamics
//! - The coupled right-hand side (body + TEGOTAE phase oscillator)
//! - Fixed-step RK4 / forward Euler integrators
//! - Dense trajectories with stride decimation for playback
//! - Trajectory analysis (force, feedback, power, height stats, energy cost)

pub mod analysis;
pub mod body;
pub mod contact;
pub mod error;
pub mod integrator;
pub mod model;
pub mod params;
pub mod sim;
pub mod state;
pub mod system;
pub mod trajectory;

pub use analysis::{AnalysisResult, analyze};
pub use body::{BodyDynamics, mechanical_energy};
pub use contact::{SpringContact, spring_force};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::TransientModel;
pub use params::{ParameterField, ParametersBuilder, SimulationParameters};
pub use sim::{
    IntegratorType, SimOptions, StepProgress, integrate, integrate_with, integrate_with_progress,
    sample_count,
};
pub use state::{HopperState, StateDerivative};
pub use system::{CoupledSystem, RhsEvaluation, evaluate_rhs};
pub use trajectory::{Trajectory, decimate};
