//! # Backoffice Console Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line (`--config <path>`)
//! 2. Load configuration (file, then `BACKOFFICE_*` environment), falling
//!    back to defaults if it cannot be loaded
//! 3. Initialize tracing with the configured filter
//! 4. Create AppState (stores are created on first use)
//! 5. Run the shell on stdin / stdout until `quit` or end of input
//!
//! ```text
//! $ BACKOFFICE_LATENCY_MS=0 backoffice
//! == Users ===================================================
//! Ready
//! 5 total | 4 active | 2 admins
//! ...
//! > filter admin
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};

use backoffice_console::{init_tracing, with_startup_logging, AppState, ConsoleConfig, Shell};

#[derive(Parser, Debug)]
#[command(name = "backoffice")]
#[command(about = "Back office for users and products")]
struct Args {
    /// Path to the TOML config file (default: platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = with_startup_logging(|| ConsoleConfig::load_or_default(args.config));
    init_tracing(&config.logging.filter);

    info!(
        start_route = %config.start_route(),
        get_all_ms = config.latency.get_all_ms,
        "Starting backoffice console"
    );

    let mut shell = Shell::new(AppState::new(config), std::io::stdout());
    match shell.run(BufReader::new(tokio::io::stdin())).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Shell I/O failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_config_flag() {
        let args = Args::try_parse_from(["backoffice", "--config", "/tmp/console.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/console.toml")));

        let args = Args::try_parse_from(["backoffice", "-c", "local.toml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("local.toml")));

        let args = Args::try_parse_from(["backoffice"]).unwrap();
        assert!(args.config.is_none());
    }

    #[test]
    fn test_bad_arguments_are_rejected() {
        assert!(Args::try_parse_from(["backoffice", "--config"]).is_err());
        assert!(Args::try_parse_from(["backoffice", "--verbose"]).is_err());
    }
}
