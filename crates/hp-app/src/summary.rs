//! Compact, serializable run summaries for printing and export.

use serde::{Deserialize, Serialize};

use crate::run_service::RunOutput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub dense_samples: usize,
    pub playback_samples: usize,
    pub playback_dt: f64,
    pub ave_height: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub amplitude: f64,
    pub energy_cost: f64,
    pub efficiency: Option<f64>,
    /// Share of playback samples spent in flight (`x > l`).
    pub flight_fraction: f64,
}

impl RunSummary {
    pub fn from_output(output: &RunOutput) -> Self {
        let a = &output.analysis;
        let l = output.request.params.l;
        let playback = output.playback.samples();
        let airborne = playback.iter().filter(|s| s.x > l).count();
        let flight_fraction = if playback.is_empty() {
            0.0
        } else {
            airborne as f64 / playback.len() as f64
        };
        Self {
            name: output.request.name.clone(),
            dense_samples: output.dense.len(),
            playback_samples: output.playback.len(),
            playback_dt: output.playback.dt(),
            ave_height: a.ave_height,
            min_height: a.min_height,
            max_height: a.max_height,
            amplitude: a.amplitude(),
            energy_cost: a.energy_cost,
            efficiency: a.efficiency(),
            flight_fraction,
        }
    }

    /// Whether the leg left the ground during the second half of the run.
    pub fn hops(&self, natural_length: f64) -> bool {
        self.max_height > natural_length
    }
}
