//! Parameter sweeps.
//!
//! One named parameter is stepped over a linear or logarithmic grid. Each
//! point runs on its own copy of the base request, in parallel; a failing
//! point is recorded and the rest of the sweep continues.

use std::fmt;

use hp_core::{Tolerances, nearly_equal};
use hp_sim::ParameterField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::run_service::{RunRequest, run};
use crate::summary::RunSummary;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepType {
    /// Uniformly spaced points
    Linear,
    /// Logarithmically spaced points; both bounds must be positive
    Logarithmic,
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Logarithmic => write!(f, "log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub field: ParameterField,
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    pub fn new(
        field: ParameterField,
        start: f64,
        end: f64,
        num_points: usize,
        sweep_type: SweepType,
    ) -> AppResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(AppError::InvalidSweep(
                "bounds must be finite".to_string(),
            ));
        }
        if num_points == 0 {
            return Err(AppError::InvalidSweep(
                "sweep must have at least 1 point".to_string(),
            ));
        }
        if num_points > 1 && nearly_equal(start, end, Tolerances::default()) {
            return Err(AppError::InvalidSweep(
                "start and end must differ".to_string(),
            ));
        }
        if sweep_type == SweepType::Logarithmic && (start <= 0.0 || end <= 0.0) {
            return Err(AppError::InvalidSweep(
                "logarithmic sweep needs positive bounds".to_string(),
            ));
        }
        Ok(Self {
            field,
            start,
            end,
            num_points,
            sweep_type,
        })
    }

    pub fn generate_points(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }
        let n = self.num_points;
        let mut points: Vec<f64> = match self.sweep_type {
            SweepType::Linear => {
                let delta = (self.end - self.start) / (n - 1) as f64;
                (0..n).map(|i| self.start + i as f64 * delta).collect()
            }
            SweepType::Logarithmic => {
                let log_start = self.start.ln();
                let log_delta = (self.end.ln() - log_start) / (n - 1) as f64;
                (0..n)
                    .map(|i| (log_start + i as f64 * log_delta).exp())
                    .collect()
            }
        };
        // exact endpoint
        points[n - 1] = self.end;
        points
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep {} from {} to {} ({} points, {})",
            self.field, self.start, self.end, self.num_points, self.sweep_type
        )
    }
}

/// Outcome of one sweep point; exactly one of `summary` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub index: usize,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SweepPoint {
    pub fn is_ok(&self) -> bool {
        self.summary.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub definition: SweepDefinition,
    /// In grid order.
    pub points: Vec<SweepPoint>,
    pub num_successful: usize,
    pub num_failed: usize,
}

impl SweepResult {
    /// Swept values of the points that completed.
    pub fn successful_values(&self) -> Vec<f64> {
        self.points
            .iter()
            .filter(|p| p.is_ok())
            .map(|p| p.value)
            .collect()
    }

    /// Completed point with the largest efficiency, if any.
    pub fn most_efficient(&self) -> Option<&SweepPoint> {
        self.points
            .iter()
            .filter_map(|p| {
                p.summary
                    .as_ref()
                    .and_then(|s| s.efficiency)
                    .map(|e| (p, e))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)
    }
}

/// Run `base` once per grid point with `definition.field` replaced.
pub fn run_sweep(base: &RunRequest, definition: &SweepDefinition) -> SweepResult {
    let values = definition.generate_points();
    info!(%definition, "starting sweep");

    let points: Vec<SweepPoint> = values
        .par_iter()
        .enumerate()
        .map(|(index, &value)| {
            let request = RunRequest {
                name: format!("{}={value}", definition.field),
                params: base.params.with(definition.field, value),
                ..base.clone()
            };
            match run(&request) {
                Ok(output) => SweepPoint {
                    index,
                    value,
                    summary: Some(RunSummary::from_output(&output)),
                    error: None,
                },
                Err(e) => {
                    warn!(field = %definition.field, value, error = %e, "sweep point failed");
                    SweepPoint {
                        index,
                        value,
                        summary: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    let num_successful = points.iter().filter(|p| p.is_ok()).count();
    let num_failed = points.len() - num_successful;
    info!(num_successful, num_failed, "sweep complete");

    SweepResult {
        definition: definition.clone(),
        points,
        num_successful,
        num_failed,
    }
}
