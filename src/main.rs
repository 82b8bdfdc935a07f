use std::path::PathBuf;

use category_summary::{Outcome, Result, ToolError};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level)?;

    match category_summary::process(&cli.input, &cli.output)? {
        Outcome::Summarised {
            categories,
            rows_used,
            rows_dropped,
        } => info!(
            categories,
            rows_used,
            rows_dropped,
            output = %cli.output.display(),
            "summary complete"
        ),
        Outcome::Empty { reason } => info!(
            ?reason,
            output = %cli.output.display(),
            "summary complete with no data"
        ),
    }
    Ok(())
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over the
/// `--log-level` flag.
fn init_logging(level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Total spreadsheet values per category and publish them as JSON."
)]
struct Cli {
    /// Spreadsheet to read; only the first worksheet is used.
    #[arg(long, short, default_value = "data.xlsx")]
    input: PathBuf,

    /// JSON file to write. Replaced on every successful run.
    #[arg(long, short, default_value = "result.json")]
    output: PathBuf,

    /// Log verbosity used when `RUST_LOG` is not set.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
