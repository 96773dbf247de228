//! Shared application service layer for hopflow.
//!
//! Turns scenarios into runs (validate, integrate, decimate, analyze),
//! fans parameter sweeps out over rayon, and produces serializable
//! summaries for the CLI.

pub mod error;
pub mod progress;
pub mod run_service;
pub mod summary;
pub mod sweep;

pub use error::{AppError, AppResult};
pub use progress::{IntegrationProgress, RunProgressEvent, RunStage};
pub use run_service::{
    RunOutput, RunRequest, RunTimingSummary, load_scenario, run, run_scenario,
    run_scenario_with_progress, run_with_progress, save_scenario,
};
pub use summary::RunSummary;
pub use sweep::{SweepDefinition, SweepPoint, SweepResult, SweepType, run_sweep};
