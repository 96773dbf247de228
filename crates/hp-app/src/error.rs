//! Error types for the hp-app service layer.

use std::path::PathBuf;

/// Unified error for the CLI and any other frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to load scenario {path}: {source}")]
    ScenarioLoad {
        path: PathBuf,
        source: hp_project::ProjectError,
    },

    #[error("Failed to save scenario {path}: {source}")]
    ScenarioSave {
        path: PathBuf,
        source: hp_project::ProjectError,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(#[from] hp_project::ValidationError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] hp_sim::SimError),

    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for hp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Finite prefix of a run that aborted on a non-finite state.
    pub fn partial_trajectory(&self) -> Option<&hp_sim::Trajectory> {
        match self {
            AppError::Simulation(e) => e.partial_trajectory(),
            _ => None,
        }
    }
}
