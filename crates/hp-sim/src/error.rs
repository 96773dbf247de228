//! Error types for simulation operations.

use thiserror::Error;

use crate::trajectory::Trajectory;

/// Errors encountered while configuring, integrating or analyzing a run.
#[derive(Error, Debug)]
pub enum SimError {
    /// Rejected before integration starts; names the offending field.
    #[error("Invalid configuration for `{field}`: {reason}")]
    Configuration {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Insufficient samples for {what}: have {available}, need {required}")]
    InsufficientSamples {
        what: &'static str,
        available: usize,
        required: usize,
    },

    /// A non-finite state appeared at `step`. `partial` holds every
    /// finite sample produced before it.
    #[error("Numerical instability at step {step} (t = {time} s)")]
    NumericalInstability {
        step: usize,
        time: f64,
        partial: Box<Trajectory>,
    },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn config(field: &'static str, reason: &'static str) -> Self {
        SimError::Configuration { field, reason }
    }

    /// Partial trajectory attached to an instability error, if any.
    pub fn partial_trajectory(&self) -> Option<&Trajectory> {
        match self {
            SimError::NumericalInstability { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
