//! Staffing sweep: simulate one workday per staffing level and report each.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use callcenter::{sweep, Config, RunResult};
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "callcenter")]
#[command(about = "Compare call-center staffing levels by simulation")]
#[command(version)]
struct Cli {
    /// TOML file overriding the default parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Staffing levels to simulate (comma-separated)
    #[arg(short, long, value_delimiter = ',', default_value = "1,2,3,4,5")]
    staff: Vec<usize>,

    /// Random seed, overriding the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Horizon in minutes, overriding the config file
    #[arg(long)]
    sim_time: Option<f64>,

    /// Also write every result as a CSV row to this file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, callcenter::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(sim_time) = cli.sim_time {
        config.sim_time = sim_time;
    }
    config.validate()?;
    Ok(config)
}

fn print_report(result: &RunResult) {
    println!("-- Results for {} staff --", result.num_staff);
    println!("Customers served: {}", result.customers_served);
    println!("Customers who left the queue: {}", result.customers_reneged);
    println!("Throughput rate: {:.2} customers per minute.", result.throughput_rate);
    println!("Average wait time: {:.2} minutes.", result.avg_wait_time);
    println!("Maximum wait time: {:.2} minutes.", result.max_wait_time);
    println!("Maximum queue length: {}", result.max_queue_length);
    println!("Average queue length: {:.2}", result.avg_queue_length);
    println!("Utilization: {:.2}%.", result.utilization);
    println!("------------------------------\n");
}

fn write_csv(path: &Path, results: &[RunResult]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let results = match sweep(&config, &cli.staff) {
        Ok(results) => results,
        Err(e) => {
            error!("simulation failed: {e}");
            return ExitCode::FAILURE;
        },
    };
    for result in &results {
        print_report(result);
    }

    if let Some(path) = &cli.csv {
        if let Err(e) = write_csv(path, &results) {
            error!("failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
