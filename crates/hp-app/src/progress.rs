use std::time::Instant;

use hp_sim::StepProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Validating,
    Integrating,
    Decimating,
    Analyzing,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::Validating => "Validating",
            RunStage::Integrating => "Integrating",
            RunStage::Decimating => "Decimating",
            RunStage::Analyzing => "Analyzing",
            RunStage::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntegrationProgress {
    pub sim_time_s: f64,
    pub max_t_s: f64,
    pub fraction_complete: f64,
    pub step: usize,
    pub total_steps: usize,
}

impl From<StepProgress> for IntegrationProgress {
    fn from(p: StepProgress) -> Self {
        Self {
            sim_time_s: p.t,
            max_t_s: 0.0,
            fraction_complete: p.fraction(),
            step: p.step,
            total_steps: p.total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub integration: Option<IntegrationProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            integration: None,
        }
    }
}

pub(crate) fn emit(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}
