pub mod aggregator;
pub mod cache;
pub mod commands;
pub mod config;
pub mod fetcher;
pub mod logging;
pub mod resolver;
pub mod types;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::LogFormat;

#[derive(Parser)]
#[command(
    name = "workorders",
    version,
    about = "Read-only work order aggregator",
    long_about = "Rebuilds each work order of a site with its applicable task groups and per-task analysis outcomes, fetching every shared resource only once."
)]
struct Cli {
    /// Config file (default: nearest workorders.config.yaml, then ~/.config/workorders/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log format on stderr: pretty or json
    #[arg(long, global = true, env = "WORKORDERS_LOG_FORMAT")]
    log_format: Option<String>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stream every work order with its task groups and task outcomes
    List {
        /// Output: json (one per line), pretty, or summary
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print a single enriched work order
    Show {
        /// Work order ID
        work_order_id: String,
    },

    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let parsed = cli.log_format.as_deref().map(str::parse::<LogFormat>).transpose();
    let log_format = match parsed {
        Ok(format) => format.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    logging::init_logging(log_format, cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Command::List { format } => {
            if let Err(e) = commands::list::run(config_path, format.as_deref()) {
                eprintln!("List error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Show { work_order_id } => {
            if let Err(e) = commands::show::run(config_path, &work_order_id) {
                eprintln!("Show error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Config => {
            if let Err(e) = commands::config::run(config_path) {
                eprintln!("Config error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_global_flags() {
        let cli = Cli::try_parse_from([
            "workorders",
            "list",
            "--format",
            "summary",
            "--config",
            "/tmp/wo.yaml",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/wo.yaml")));
        match cli.command {
            Command::List { format } => assert_eq!(format.as_deref(), Some("summary")),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_show_requires_id() {
        assert!(Cli::try_parse_from(["workorders", "show"]).is_err());
        let cli = Cli::try_parse_from(["workorders", "show", "WO1"]).unwrap();
        assert!(matches!(cli.command, Command::Show { work_order_id } if work_order_id == "WO1"));
    }
}
