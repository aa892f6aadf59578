//! Wind fetch command-line tool.
//!
//! - `fetch`: per-bearing fetch (or summary statistics) for an ESRI ASCII
//!   land/water grid
//! - `weight`: weighted mean of previously written per-bearing bands

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use windfetch::commands::{run_fetch, run_weight, FetchArgs, WeightArgs};

#[derive(Parser, Debug)]
#[command(name = "windfetch")]
#[command(about = "Wind fetch over gridded land/water classifications")]
struct Cli {
    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute fetch for a set of bearings
    Fetch(FetchArgs),
    /// Collapse per-bearing bands into one weighted grid
    Weight(WeightArgs),
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs)?;

    match &cli.command {
        Command::Fetch(args) => {
            info!(input = %args.input.display(), directions = ?args.directions, "Starting fetch");
            run_fetch(args)?;
        }
        Command::Weight(args) => {
            info!(bands = args.input.len(), "Starting weighting");
            run_weight(args)?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .with_thread_ids(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_minor_flags_required_together() {
        let base = ["windfetch", "fetch", "-i", "in.asc", "-o", "out", "--water-id", "1", "-d", "0,90"];
        assert!(Cli::try_parse_from(base).is_ok());

        let mut only_count = base.to_vec();
        only_count.extend(["--minor-directions", "3"]);
        assert!(Cli::try_parse_from(only_count).is_err());

        let mut both = base.to_vec();
        both.extend(["--minor-directions", "3", "--minor-interval", "5"]);
        let cli = Cli::try_parse_from(both).unwrap();
        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.directions, vec![0.0, 90.0]);
                assert_eq!(args.minor_directions, Some(3));
                assert_eq!(args.nodata, -9999.0);
            }
            Command::Weight(_) => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_weight_parses_lists() {
        let cli = Cli::try_parse_from([
            "windfetch", "weight", "-i", "a.asc,b.asc", "-o", "w.asc", "-w", "0.25,0.75",
        ])
        .unwrap();
        match cli.command {
            Command::Weight(args) => {
                assert_eq!(args.input.len(), 2);
                assert_eq!(args.weights, vec![0.25, 0.75]);
            }
            Command::Fetch(_) => panic!("expected weight"),
        }
    }
}
