use clap::{Parser, Subcommand, ValueEnum};
use hp_app::{
    AppError, AppResult, RunOutput, RunProgressEvent, RunRequest, RunStage, RunSummary,
    SweepDefinition, SweepResult, SweepType,
};
use hp_project::Scenario;
use hp_sim::{IntegratorType, ParameterField, SimulationParameters, params::DERIVED_SLOTS};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hp-cli")]
#[command(about = "hopflow CLI - TEGOTAE hopping-leg simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and print its summary
    Run {
        #[command(flatten)]
        run: RunArgs,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sweep one parameter and print a summary row per point
    Sweep {
        #[command(flatten)]
        run: RunArgs,
        /// Parameter to sweep (m, c, k, l, g, omega, amp, dur, sigma, phase)
        #[arg(long)]
        param: String,
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
        /// Number of grid points
        #[arg(long, default_value_t = 5)]
        points: usize,
        /// Logarithmic spacing instead of linear
        #[arg(long)]
        log: bool,
        /// Print the sweep as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
    },
    /// Write the default scenario to a file
    Init {
        /// Output path (.yaml or .json)
        scenario_path: PathBuf,
    },
    /// Print the positional parameter table with defaults
    Params,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Scenario file to start from (defaults otherwise)
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Feedback gain override [rad/(N·s)]
    #[arg(long)]
    sigma: Option<f64>,
    /// Actuator thrust override [N]
    #[arg(long)]
    amp: Option<f64>,
    /// Final time [s]
    #[arg(long)]
    max_t: Option<f64>,
    /// Time step [s]
    #[arg(long)]
    dt: Option<f64>,
    /// Playback stride
    #[arg(long)]
    stride: Option<usize>,
    #[arg(long, value_enum)]
    integrator: Option<IntegratorArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum IntegratorArg {
    Rk4,
    Euler,
}

impl From<IntegratorArg> for IntegratorType {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Rk4 => IntegratorType::RK4,
            IntegratorArg::Euler => IntegratorType::ForwardEuler,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { run, json } => cmd_run(&run, json),
        Commands::Sweep {
            run,
            param,
            start,
            end,
            points,
            log,
            json,
        } => cmd_sweep(&run, &param, start, end, points, log, json),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Init { scenario_path } => cmd_init(&scenario_path),
        Commands::Params => cmd_params(),
    }
}

fn build_request(args: &RunArgs) -> AppResult<RunRequest> {
    let mut request = match &args.scenario {
        Some(path) => RunRequest::from_scenario(&hp_app::load_scenario(path)?)?,
        None => RunRequest::default(),
    };
    if let Some(sigma) = args.sigma {
        request.params.sigma = sigma;
    }
    if let Some(amp) = args.amp {
        request.params.amp = amp;
    }
    if let Some(max_t) = args.max_t {
        request.options.max_t = max_t;
    }
    if let Some(dt) = args.dt {
        request.options.dt = dt;
    }
    if let Some(stride) = args.stride {
        request.options.stride = stride;
    }
    if let Some(integrator) = args.integrator {
        request.options.integrator = integrator.into();
    }
    Ok(request)
}

fn cmd_run(args: &RunArgs, json: bool) -> AppResult<()> {
    let request = build_request(args)?;

    let output = if json {
        hp_app::run(&request)?
    } else {
        println!("Running scenario: {}", request.name);
        println!(
            "  dt = {} s, max_t = {:.3} s, stride = {}, integrator = {:?}",
            request.options.dt,
            request.options.max_t,
            request.options.stride,
            request.options.integrator
        );
        let mut last_emit = Instant::now();
        let mut last_stage = None;
        let result = hp_app::run_with_progress(
            &request,
            Some(&mut |event| {
                let emit_now =
                    last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
                if emit_now {
                    render_cli_progress(&event);
                    last_stage = Some(event.stage);
                    last_emit = Instant::now();
                }
            }),
        );
        clear_progress_line();
        result?
    };

    let summary = RunSummary::from_output(&output);
    if json {
        println!("{}", to_json(&summary)?);
    } else {
        print_summary(&summary, &output);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_sweep(
    args: &RunArgs,
    param: &str,
    start: f64,
    end: f64,
    points: usize,
    log: bool,
    json: bool,
) -> AppResult<()> {
    let field: ParameterField = param
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("unknown parameter `{param}`")))?;
    let sweep_type = if log {
        SweepType::Logarithmic
    } else {
        SweepType::Linear
    };
    let definition = SweepDefinition::new(field, start, end, points, sweep_type)?;
    let request = build_request(args)?;

    if !json {
        println!("{definition}");
    }
    let result = hp_app::run_sweep(&request, &definition);
    if json {
        println!("{}", to_json(&result)?);
    } else {
        print_sweep(&result);
    }
    Ok(())
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = hp_app::load_scenario(scenario_path)?;
    let request = RunRequest::from_scenario(&scenario)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    println!(
        "  {} samples at dt = {} s",
        hp_sim::sample_count(request.options.max_t, request.options.dt),
        request.options.dt
    );
    Ok(())
}

fn cmd_init(scenario_path: &Path) -> AppResult<()> {
    let name = scenario_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("default");
    hp_app::save_scenario(scenario_path, &Scenario::named(name))?;
    println!("✓ Wrote default scenario to {}", scenario_path.display());
    Ok(())
}

fn cmd_params() -> AppResult<()> {
    let defaults = SimulationParameters::default();
    let positional = defaults.to_positional();
    println!("{:>3}  {:<6} {:>12}  unit", "idx", "field", "default");
    for (idx, value) in positional.iter().enumerate() {
        let row = ParameterField::ALL.into_iter().find(|f| f.index() == idx);
        match row {
            Some(field) => println!(
                "{:>3}  {:<6} {:>12.6}  {}",
                idx,
                field.name(),
                value,
                field.unit()
            ),
            None if DERIVED_SLOTS.contains(&idx) => {
                let (name, unit) = if idx == 5 { ("Fa", "N") } else { ("Fo", "rad/s") };
                println!("{:>3}  {:<6} {:>12}  {} (derived)", idx, name, "-", unit);
            }
            None => {}
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InvalidInput(format!("failed to encode JSON: {e}")))
}

fn print_summary(summary: &RunSummary, output: &RunOutput) {
    println!("✓ Simulation completed: {}", summary.name);
    println!(
        "  Samples: {} dense, {} playback (every {:.3} s)",
        summary.dense_samples, summary.playback_samples, summary.playback_dt
    );
    println!("  Average height: {:.4} m", summary.ave_height);
    println!(
        "  Height range:   {:.4} .. {:.4} m (amplitude {:.4} m)",
        summary.min_height, summary.max_height, summary.amplitude
    );
    println!("  Energy cost:    {:.4} W", summary.energy_cost);
    match summary.efficiency {
        Some(eff) => println!("  Efficiency:     {:.4} m/W", eff),
        None => println!("  Efficiency:     n/a (no actuator power)"),
    }
    println!(
        "  Flight:         {:.1}% of playback samples",
        100.0 * summary.flight_fraction
    );

    let timing = &output.timing;
    println!("\nTiming summary:");
    println!("  Integrate: {:.3}s", timing.integrate_time_s);
    println!("  Analyze:   {:.3}s", timing.analyze_time_s);
    println!("  Total:     {:.3}s", timing.total_time_s);
}

fn print_sweep(result: &SweepResult) {
    println!(
        "{:>4}  {:>12}  {:>10}  {:>10}  {:>10}  {:>10}",
        "#", result.definition.field.name(), "ave", "min", "max", "Ec"
    );
    for p in &result.points {
        match (&p.summary, &p.error) {
            (Some(s), _) => println!(
                "{:>4}  {:>12.6}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}",
                p.index, p.value, s.ave_height, s.min_height, s.max_height, s.energy_cost
            ),
            (None, Some(e)) => println!("{:>4}  {:>12.6}  failed: {}", p.index, p.value, e),
            (None, None) => {}
        }
    }
    println!(
        "{} succeeded, {} failed",
        result.num_successful, result.num_failed
    );
    if let Some(best) = result.most_efficient() {
        println!(
            "Most efficient: {} = {:.6}",
            result.definition.field, best.value
        );
    }
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(100));
    let _ = io::stderr().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.integration) {
        (RunStage::Integrating, Some(p)) => {
            let width = 28usize;
            let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            eprint!(
                "\r[{}] {:>6.2}%  t={:.3}/{:.3}s  step={}  elapsed={:.1}s",
                bar,
                p.fraction_complete * 100.0,
                p.sim_time_s,
                p.max_t_s,
                p.step,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            eprint!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
        }
    }
    let _ = io::stderr().flush();
}
