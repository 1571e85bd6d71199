use clap::{Parser, Subcommand};
use springbed_core::diagnostics::format_diagnostic;
use springbed_core::{
    linspace, run_simulation, run_simulation_checked, run_sweep, source_for_path,
    SimulationConstants, SweepOptions,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "springbed")]
#[command(
    about = "Energy lost by a projectile striking a bed of springs",
    long_about = None,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Initial vertical velocity of the projectile (m/s)
    #[arg(long, required = true, allow_negative_numbers = true)]
    vy: Option<f64>,

    /// Path to the constants file (`.json` for the JSON format)
    #[arg(long, default_value = "constants.txt")]
    constants: PathBuf,

    /// Fail instead of printing a value when the state stops being finite
    #[arg(long)]
    check_divergence: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation per velocity in an evenly spaced range
    Sweep {
        /// First initial vertical velocity
        #[arg(long, allow_negative_numbers = true)]
        from: f64,
        /// Last initial vertical velocity
        #[arg(long, allow_negative_numbers = true)]
        to: f64,
        /// Number of samples
        #[arg(long, default_value_t = 150)]
        points: usize,
        /// Path to the constants file
        #[arg(long, default_value = "constants.txt")]
        constants: PathBuf,
        /// Per-sample wall-clock limit in seconds
        #[arg(long)]
        timeout_secs: Option<f64>,
        /// Worker threads
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Validate a constants file and print its diagnostics
    Check {
        /// Path to the constants file
        #[arg(long, default_value = "constants.txt")]
        constants: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Some(Commands::Sweep {
            from,
            to,
            points,
            constants,
            timeout_secs,
            threads,
        }) => run_sweep_command(&constants, from, to, points, timeout_secs, threads),
        Some(Commands::Check { constants }) => check_file(&constants),
        None => match cli.vy {
            Some(vy) => run_single(&cli.constants, vy, cli.check_divergence),
            None => Err("--vy is required".into()),
        },
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load(path: &Path) -> Result<SimulationConstants, Box<dyn std::error::Error>> {
    let report = source_for_path(path).load_report()?;
    for diagnostic in report.diagnostics.warnings() {
        log::warn!("{}: {}", path.display(), diagnostic);
    }
    Ok(report.into_constants()?)
}

fn run_single(
    path: &Path,
    vy: f64,
    check_divergence: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let constants = load(path)?;

    let result = if check_divergence {
        run_simulation_checked(&constants, vy)?
    } else {
        run_simulation(&constants, vy)
    };

    // Only the value goes to stdout so a driver can parse it as a float
    println!("{:?}", result.energy_loss());
    Ok(())
}

fn run_sweep_command(
    path: &Path,
    from: f64,
    to: f64,
    points: usize,
    timeout_secs: Option<f64>,
    threads: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let constants = load(path)?;
    let timeout = timeout_secs.map(Duration::try_from_secs_f64).transpose()?;
    let options = SweepOptions { timeout, threads };

    let velocities = linspace(from, to, points);
    let samples = run_sweep(&constants, &velocities, &options)?;

    let mut completed = 0;
    for sample in &samples {
        if let Some(loss) = sample.energy_loss() {
            println!("{:?},{:?}", sample.initial_vy, loss);
            completed += 1;
        }
    }
    log::info!("{} of {} samples completed", completed, samples.len());

    if completed == 0 && !samples.is_empty() {
        return Err("no sample completed".into());
    }
    Ok(())
}

fn check_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let report = source_for_path(path).load_report()?;

    for diagnostic in report.diagnostics.iter() {
        eprintln!("{}", format_diagnostic(diagnostic, &source));
    }

    if report.diagnostics.has_errors() {
        return Err(format!("{} is not a usable constants file", path.display()).into());
    }
    println!(
        "{}: ok ({} springs, {} steps)",
        path.display(),
        report.constants.n_springs,
        report.constants.timesteps
    );
    Ok(())
}
