//! Muster binary entry point: argument parsing and subscriber setup.

use clap::{Parser, Subcommand, ValueEnum};
use muster::cli::{self, CliError};
use muster_core::{
    DEFAULT_CONFIRMATION_PROBABILITY, DEFAULT_GESTATION_DAYS, Granularity, LifecycleConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "muster", version, about = "Livestock lifecycle staging and forecasting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the stage registry (codes and display names).
    Stages,

    /// Classify each record in a JSON file at a reference date.
    Classify {
        /// JSON file holding an array of animal records.
        #[arg(long)]
        input: PathBuf,

        /// Reference date; defaults to today.
        #[arg(long)]
        at: Option<String>,
    },

    /// Project each record's stage changes across a future horizon.
    Simulate {
        /// JSON file holding an array of animal records.
        #[arg(long)]
        input: PathBuf,

        /// End of the projection horizon (inclusive).
        #[arg(long)]
        until: String,

        /// Start of the horizon; defaults to today.
        #[arg(long)]
        start: Option<String>,

        /// Sampling granularity of the projection.
        #[arg(long, value_enum, default_value = "daily")]
        granularity: GranularityArg,

        /// Seed for the probability draws; omit for a random seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Gestation length in days.
        #[arg(long, default_value_t = DEFAULT_GESTATION_DAYS)]
        gestation_days: u32,

        /// Probability that a pregnancy confirmation test succeeds.
        #[arg(long, default_value_t = DEFAULT_CONFIRMATION_PROBABILITY)]
        confirmation_probability: f64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GranularityArg {
    Daily,
    Monthly,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Daily => Self::Daily,
            GranularityArg::Monthly => Self::Monthly,
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let now = chrono::Local::now().naive_local();

    match cli.command {
        Command::Stages => cli::cmd_stages(),

        Command::Classify { input, at } => {
            let at = match at {
                Some(raw) => cli::parse_cli_date(&raw)?.and_time(chrono::NaiveTime::MIN),
                None => now,
            };
            cli::cmd_classify(&input, at, &LifecycleConfig::default())
        }

        Command::Simulate {
            input,
            until,
            start,
            granularity,
            seed,
            gestation_days,
            confirmation_probability,
        } => {
            let end = cli::parse_cli_date(&until)?;
            let start = match start {
                Some(raw) => cli::parse_cli_date(&raw)?,
                None => now.date(),
            };
            let config = LifecycleConfig::new()
                .with_gestation_days(gestation_days)
                .with_confirmation_probability(confirmation_probability)
                .with_granularity(granularity.into());

            cli::cmd_simulate(&input, start, end, now, &config, seed)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
