//! Run execution service: validate, integrate, decimate, analyze.

use std::path::Path;
use std::time::Instant;

use hp_project::Scenario;
use hp_sim::{
    AnalysisResult, HopperState, SimOptions, SimulationParameters, StepProgress, Trajectory,
    analyze, decimate, integrate_with_progress,
};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::progress::{IntegrationProgress, RunProgressEvent, RunStage, emit};

/// Everything needed to execute one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub name: String,
    pub params: SimulationParameters,
    pub initial: HopperState,
    pub options: SimOptions,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            params: SimulationParameters::default(),
            initial: HopperState::standing(SimulationParameters::default().l),
            options: SimOptions::default(),
        }
    }
}

impl RunRequest {
    /// Resolve a scenario into a request. The scenario is validated first.
    pub fn from_scenario(scenario: &Scenario) -> AppResult<Self> {
        hp_project::validate_scenario(scenario)?;
        let params = hp_project::resolve_parameters(&scenario.parameters)?;
        Ok(Self {
            name: scenario.name.clone(),
            params,
            initial: scenario.initial_state.into(),
            options: SimOptions::from(&scenario.run),
        })
    }
}

/// Wall-clock breakdown of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub integrate_time_s: f64,
    pub analyze_time_s: f64,
    pub total_time_s: f64,
}

/// Output of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub request: RunRequest,
    /// Every integration sample, spaced `dt`.
    pub dense: Trajectory,
    /// Every `stride`-th sample, spaced `dt * stride`.
    pub playback: Trajectory,
    /// Analysis of `playback` with the playback step.
    pub analysis: AnalysisResult,
    pub timing: RunTimingSummary,
}

/// Load a scenario file and run it.
pub fn run_scenario(path: &Path) -> AppResult<RunOutput> {
    run_scenario_with_progress(path, None)
}

pub fn run_scenario_with_progress(
    path: &Path,
    progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunOutput> {
    let scenario = load_scenario(path)?;
    let request = RunRequest::from_scenario(&scenario)?;
    run_with_progress(&request, progress_cb)
}

pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    hp_project::load(path).map_err(|source| AppError::ScenarioLoad {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    let result = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => hp_project::save_json(path, scenario),
        _ => hp_project::save_yaml(path, scenario),
    };
    result.map_err(|source| AppError::ScenarioSave {
        path: path.to_path_buf(),
        source,
    })
}

/// Execute a run.
pub fn run(request: &RunRequest) -> AppResult<RunOutput> {
    run_with_progress(request, None)
}

/// Execute a run and stream stage and integration progress events.
pub fn run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunOutput> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();
    let opts = &request.options;

    emit(
        &mut progress_cb,
        RunStage::Validating,
        started,
        "Validating parameters",
    );
    request.params.validate()?;
    opts.validate()?;

    emit(
        &mut progress_cb,
        RunStage::Integrating,
        started,
        "Integrating",
    );
    info!(
        name = %request.name,
        dt = opts.dt,
        max_t = opts.max_t,
        integrator = ?opts.integrator,
        "running simulation"
    );
    let integrate_start = Instant::now();
    let max_t = opts.max_t;
    let mut forward = |p: StepProgress| {
        if let Some(cb) = progress_cb.as_deref_mut() {
            cb(RunProgressEvent {
                stage: RunStage::Integrating,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
                message: None,
                integration: Some(IntegrationProgress {
                    max_t_s: max_t,
                    ..IntegrationProgress::from(p)
                }),
            });
        }
    };
    let dense =
        integrate_with_progress(request.initial, &request.params, opts, Some(&mut forward))?;
    timing.integrate_time_s = integrate_start.elapsed().as_secs_f64();

    emit(
        &mut progress_cb,
        RunStage::Decimating,
        started,
        "Decimating for playback",
    );
    let playback = decimate(&dense, opts.stride)?;
    debug!(
        dense = dense.len(),
        playback = playback.len(),
        stride = opts.stride,
        "decimated trajectory"
    );

    emit(
        &mut progress_cb,
        RunStage::Analyzing,
        started,
        "Analyzing trajectory",
    );
    let analyze_start = Instant::now();
    let analysis = analyze(&playback, opts.playback_dt(), &request.params)?;
    timing.analyze_time_s = analyze_start.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    info!(
        ave_height = analysis.ave_height,
        min_height = analysis.min_height,
        max_height = analysis.max_height,
        energy_cost = analysis.energy_cost,
        wall_s = timing.total_time_s,
        "run complete"
    );
    emit(&mut progress_cb, RunStage::Completed, started, "Run complete");

    Ok(RunOutput {
        request: request.clone(),
        dense,
        playback,
        analysis,
        timing,
    })
}
