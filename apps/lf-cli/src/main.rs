use clap::{Parser, Subcommand, ValueEnum};
use lf_expr::{GuessOutcome, GuessSession, Target, TargetCatalog};
use lf_project::{ScenarioOutcome, load, run_scenario, validate_scenario};
use lf_sim::{
    DEFAULT_BAND_FRACTION, PidConfig, PidRun, PlantSolver, TankConfig, TankRun, TankValidation,
    Trajectory, simulate_pid, simulate_tank,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uom::si::length::meter;
use uom::si::volume::cubic_meter;

type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error(transparent)]
    Sim(#[from] lf_sim::SimError),

    #[error(transparent)]
    Expr(#[from] lf_expr::ExprError),

    #[error(transparent)]
    Project(#[from] lf_project::ProjectError),

    #[error("Validation failed: {0}")]
    Validation(#[from] lf_project::ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser)]
#[command(name = "lf-cli")]
#[command(about = "LevelFlow CLI - control loop demos and the guess-the-function game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the proportional tank-level loop
    Tank(TankArgs),
    /// Simulate a PID loop around a first-order plant
    Pid(PidArgs),
    /// Grade a guess against a hidden function
    Guess {
        /// Guessed expression in x, e.g. "x^2 - 3"
        expr: String,
        /// Hidden function to compare against (random builtin if omitted)
        #[arg(long)]
        target: Option<String>,
        /// Seed for picking the hidden function
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a scenario file (YAML or JSON)
    Run {
        scenario_path: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a scenario file
    Validate { scenario_path: PathBuf },
}

#[derive(clap::Args)]
struct TankArgs {
    /// Simulated time span
    #[arg(long, default_value_t = 50.0)]
    duration: f64,
    /// Number of samples including t = 0
    #[arg(long, default_value_t = 500)]
    samples: usize,
    /// Target level in metres
    #[arg(long, default_value_t = 1.0)]
    setpoint: f64,
    /// Proportional gain; 0 switches to manual inflow
    #[arg(long, default_value_t = 0.2)]
    kp: f64,
    #[arg(long, default_value_t = 0.2)]
    manual_inflow: f64,
    #[arg(long, default_value_t = 0.1)]
    outflow: f64,
    #[arg(long, default_value_t = 0.0)]
    initial_height: f64,
    #[arg(long, default_value_t = 1.0)]
    surface_area: f64,
    /// Accept negative gains, flows and heights
    #[arg(long)]
    permissive: bool,
    /// Let the level go negative instead of clamping at zero
    #[arg(long)]
    no_clamp: bool,
    /// Output CSV file path (optional, defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SolverArg {
    Exact,
    Rk4,
    Euler,
}

#[derive(clap::Args)]
struct PidArgs {
    #[arg(long, default_value_t = 2.0)]
    kp: f64,
    #[arg(long, default_value_t = 0.0)]
    ki: f64,
    #[arg(long, default_value_t = 0.0)]
    kd: f64,
    #[arg(long, default_value_t = 1.0)]
    setpoint: f64,
    #[arg(long, default_value_t = 50.0)]
    duration: f64,
    /// Time step in seconds
    #[arg(long, default_value_t = 0.1)]
    dt: f64,
    /// Plant time constant in seconds
    #[arg(long, default_value_t = 5.0)]
    tau: f64,
    #[arg(long, value_enum, default_value_t = SolverArg::Exact)]
    solver: SolverArg,
    /// Output CSV file path (optional, defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl From<&TankArgs> for TankConfig {
    fn from(args: &TankArgs) -> Self {
        TankConfig {
            duration: args.duration,
            sample_count: args.samples,
            setpoint: args.setpoint,
            surface_area: args.surface_area,
            kp: args.kp,
            manual_inflow: args.manual_inflow,
            outflow: args.outflow,
            initial_height: args.initial_height,
            clamp_level: !args.no_clamp,
            validation: if args.permissive {
                TankValidation::Permissive
            } else {
                TankValidation::Strict
            },
        }
    }
}

impl From<&PidArgs> for PidConfig {
    fn from(args: &PidArgs) -> Self {
        PidConfig {
            kp: args.kp,
            ki: args.ki,
            kd: args.kd,
            setpoint: args.setpoint,
            duration: args.duration,
            dt: args.dt,
            time_constant: args.tau,
            plant_solver: match args.solver {
                SolverArg::Exact => PlantSolver::Exact,
                SolverArg::Rk4 => PlantSolver::rk4(),
                SolverArg::Euler => PlantSolver::euler(),
            },
            ..PidConfig::default()
        }
    }
}

fn main() -> AppResult<()> {
    // Logs go to stderr so CSV on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tank(args) => cmd_tank(&args),
        Commands::Pid(args) => cmd_pid(&args),
        Commands::Guess { expr, target, seed } => cmd_guess(&expr, target.as_deref(), seed),
        Commands::Run {
            scenario_path,
            output,
        } => cmd_run(&scenario_path, output.as_deref()),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
    }
}

fn cmd_tank(args: &TankArgs) -> AppResult<()> {
    info!(
        duration = args.duration,
        samples = args.samples,
        kp = args.kp,
        "running tank loop"
    );
    let run = simulate_tank(&TankConfig::from(args))?;
    let mut report = Report::new(args.output.is_none());
    tank_summary(&mut report, &run);
    report.flush();
    export(&run.trajectory, args.output.as_deref())
}

fn cmd_pid(args: &PidArgs) -> AppResult<()> {
    info!(
        kp = args.kp,
        ki = args.ki,
        kd = args.kd,
        duration = args.duration,
        dt = args.dt,
        "running PID loop"
    );
    let run = simulate_pid(&PidConfig::from(args))?;
    let mut report = Report::new(args.output.is_none());
    pid_summary(&mut report, &run);
    report.flush();
    export(&run.trajectory, args.output.as_deref())
}

fn cmd_guess(input: &str, target: Option<&str>, seed: Option<u64>) -> AppResult<()> {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let catalog = TargetCatalog::builtin()?;
    let mut session = match target {
        Some(source) => GuessSession::with_target(catalog, Target::parse(source)?),
        None => GuessSession::new(catalog),
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let outcome = session.guess(input, &mut rng)?;
    info!(guess = input, score = outcome.score, "graded guess");
    let mut report = Report::new(false);
    guess_line(&mut report, input, &outcome);
    report.flush();
    Ok(())
}

fn cmd_run(scenario_path: &Path, output: Option<&Path>) -> AppResult<()> {
    info!(path = %scenario_path.display(), "loading scenario");
    let scenario = load(scenario_path)?;
    let outcome = run_scenario(&scenario)?;
    let trajectory = outcome.trajectory();

    let mut report = Report::new(trajectory.is_some() && output.is_none());
    report.line(format!("Scenario: {}", scenario.name));
    match &outcome {
        ScenarioOutcome::Tank(run) => tank_summary(&mut report, run),
        ScenarioOutcome::Pid(run) => pid_summary(&mut report, run),
        ScenarioOutcome::Guess { target, reports } => {
            report.line(format!("Target: {}", target));
            for guess in reports {
                match &guess.result {
                    Ok(outcome) => guess_line(&mut report, &guess.input, outcome),
                    Err(e) => report.line(format!("  {}: {}", guess.input, e)),
                }
            }
        }
    }
    report.flush();

    match trajectory {
        Some(trajectory) => export(trajectory, output),
        None => Ok(()),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    info!(path = %scenario_path.display(), "validating scenario");
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load(scenario_path)?;
    validate_scenario(&scenario)?;
    println!("✓ Scenario is valid ({})", scenario.kind.label());
    Ok(())
}

/// Summary lines. They go to stderr when the CSV is written to stdout.
struct Report {
    to_stderr: bool,
    lines: Vec<String>,
}

impl Report {
    fn new(to_stderr: bool) -> Self {
        Self {
            to_stderr,
            lines: Vec::new(),
        }
    }

    fn line(&mut self, line: String) {
        self.lines.push(line);
    }

    fn flush(&self) {
        for line in &self.lines {
            if self.to_stderr {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }
}

fn tank_summary(report: &mut Report, run: &TankRun) {
    report.line(format!("Samples: {}", run.trajectory.len()));
    report.line(format!(
        "Final level: {:.4} m ({:.4} m3)",
        run.final_height().get::<meter>(),
        run.final_volume().get::<cubic_meter>()
    ));
    if let Some(i) = run.emptied_at {
        let time = run.trajectory.get(i).map_or(0.0, |s| s.time);
        report.line(format!(
            "⚠ Tank emptied at t = {:.3}; level clamped to zero from then on",
            time
        ));
    }
}

fn pid_summary(report: &mut Report, run: &PidRun) {
    report.line(format!("Samples: {}", run.trajectory.len()));
    let Some(m) = run.metrics(DEFAULT_BAND_FRACTION) else {
        return;
    };
    report.line(format!(
        "Band: [{:.4}, {:.4}]  peak: {:.4}  overshoot: {:.1}%",
        m.band.0,
        m.band.1,
        m.peak,
        m.overshoot * 100.0
    ));
    match m.settling_time {
        Some(t) => report.line(format!("Settled at t = {:.3} s", t)),
        None => report.line("Did not settle within the band".to_string()),
    }
    report.line(format!("Steady-state error: {:.4}", m.steady_state_error));
}

fn guess_line(report: &mut Report, input: &str, outcome: &GuessOutcome) {
    report.line(format!(
        "  {} -> score {:.4}: {}",
        input,
        outcome.score,
        outcome.verdict.message()
    ));
}

fn export(trajectory: &Trajectory, output: Option<&Path>) -> AppResult<()> {
    match output {
        Some(path) => {
            info!(path = %path.display(), samples = trajectory.len(), "writing CSV");
            trajectory.write_csv(io::BufWriter::new(std::fs::File::create(path)?))?;
            println!(
                "✓ Exported {} samples to {}",
                trajectory.len(),
                path.display()
            );
        }
        None => trajectory.write_csv(io::stdout().lock())?,
    }
    Ok(())
}
