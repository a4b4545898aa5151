//! # Backoffice Console Library
//!
//! The back-office application: stores, page commands, rendering and the
//! interactive shell. The `backoffice` binary is a thin wrapper around
//! [`shell::Shell`].
//!
//! ## Module Organization
//! ```text
//! backoffice_console/
//! ├── lib.rs          ◄─── You are here (module exports, logging setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState: lazily created, app-scoped stores
//! │   ├── store.rs    ◄─── EntityStore<R>: the generic reactive store
//! │   ├── users.rs    ◄─── UsersStore (role filter, admin count)
//! │   ├── products.rs ◄─── ProductsStore (category filter, low stock)
//! │   └── config.rs   ◄─── ConsoleConfig (TOML + env overrides)
//! ├── commands/
//! │   ├── mod.rs      ◄─── search / filter / select / toggle / remove / retry
//! │   ├── users.rs    ◄─── Users page DTO, create user
//! │   └── products.rs ◄─── Products page DTO, detail panel, create product
//! ├── forms.rs        ◄─── key=value form parsing and validation
//! ├── router.rs       ◄─── /users, /products, / → /users
//! ├── render.rs       ◄─── Plain-text page rendering
//! ├── shell.rs        ◄─── Input loop, dispatch, redraw on store change
//! └── error.rs        ◄─── ApiError for commands, ConfigError
//! ```
//!
//! ## Store Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Application-Scoped Stores                            │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │   UsersStore     │ │  ProductsStore   │ │    ConsoleConfig     │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Users         │ │  • Products      │ │  • Service latency   │   │
//! │  │  • Search/filter │ │  • Search/filter │ │  • Start route       │   │
//! │  │  • Selection     │ │  • Selection     │ │  • Log filter        │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  Each store is created on first use and lives as long as AppState.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod forms;
pub mod render;
pub mod router;
pub mod shell;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ConfigError, ErrorCode};
pub use router::{Route, Router};
pub use shell::{Command, Reply, Shell};
pub use state::{AppState, ConsoleConfig};

fn stderr_subscriber(default_filter: &str) -> impl tracing::Subscriber + Send + Sync {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they do not interleave with the page on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=backoffice=trace` - Show trace for backoffice crates only
/// - Default: `default_filter`, normally from the config file
pub fn init_tracing(default_filter: &str) {
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(stderr_subscriber(default_filter));
}

/// Runs `f` with logging at the default filter, before the configured
/// subscriber exists. Config loading reports through this.
pub fn with_startup_logging<T>(f: impl FnOnce() -> T) -> T {
    let filter = state::LoggingSettings::default().filter;
    tracing::subscriber::with_default(stderr_subscriber(&filter), f)
}
