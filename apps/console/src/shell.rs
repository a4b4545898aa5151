//! # Interactive Shell
//!
//! Reads command lines, dispatches them to the current page and prints the
//! re-rendered page.
//!
//! ## Event Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Shell Event Loop                                     │
//! │                                                                         │
//! │   input lines ──────────┐          ┌────────── page store revision      │
//! │   (stdin / script)      ▼          ▼           (watch channel)          │
//! │                    ┌──────────────────────┐                             │
//! │                    │    tokio::select!    │                             │
//! │                    └──────────┬───────────┘                             │
//! │               line            │            revision moved               │
//! │        ┌──────────────────────┴────────────────────┐                    │
//! │        ▼                                           ▼                    │
//! │  dispatch(line)                            an async request             │
//! │   ├─ sync commands mutate the store        finished (load, create):     │
//! │   ├─ add / retry spawn the request         redraw the page              │
//! │   └─ reply is printed, revision marked                                  │
//! │      seen so it does not redraw twice                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::{self, Write};
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use backoffice_core::Record;

use crate::commands::{self, products, users};
use crate::error::ApiError;
use crate::forms::FormInput;
use crate::render;
use crate::router::{Route, Router};
use crate::state::{AppState, EntityStore, Outcome};

// =============================================================================
// Commands
// =============================================================================

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    /// Empty text clears the search.
    Search(String),
    Filter(String),
    Select(String),
    Toggle(String),
    Remove(String),
    /// The raw `key=value` arguments.
    Add(String),
    Retry,
    /// Redraw; `show json` prints the page data instead.
    Show { json: bool },
    Help,
    Quit,
}

fn required(verb: &str, arg: &str, usage: &str) -> Result<String, ApiError> {
    if arg.is_empty() {
        Err(ApiError::validation(format!("Usage: {verb} {usage}")))
    } else {
        Ok(arg.to_string())
    }
}

impl FromStr for Command {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "go" => required(verb, arg, "<path>").map(Command::Go),
            "search" => Ok(Command::Search(arg.to_string())),
            "filter" => required(verb, arg, "<name|all>").map(Command::Filter),
            "select" => required(verb, arg, "<id>").map(Command::Select),
            "toggle" => required(verb, arg, "<id>").map(Command::Toggle),
            "remove" => required(verb, arg, "<id>").map(Command::Remove),
            "add" => required(verb, arg, "key=value ...").map(Command::Add),
            "retry" => Ok(Command::Retry),
            "show" => match arg {
                "" => Ok(Command::Show { json: false }),
                "json" => Ok(Command::Show { json: true }),
                _ => Err(ApiError::validation("Usage: show [json]")),
            },
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(ApiError::validation(format!(
                "Unknown command '{verb}'. Type `help`."
            ))),
        }
    }
}

// =============================================================================
// Reply
// =============================================================================

/// What a dispatched line produced.
#[derive(Debug, Default)]
pub struct Reply {
    /// Printed before the page.
    pub message: Option<String>,

    /// Redraw the current page.
    pub page: bool,

    /// The request a command started, if any.
    pub pending: Option<JoinHandle<Outcome>>,

    pub quit: bool,
}

impl Reply {
    fn page() -> Self {
        Reply {
            page: true,
            ..Default::default()
        }
    }

    fn message(message: impl Into<String>) -> Self {
        Reply {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    fn error(err: ApiError) -> Self {
        Reply::message(format!("Error: {}", err.message))
    }
}

// =============================================================================
// Shell
// =============================================================================

/// The interactive shell: app state, router and output.
pub struct Shell<W: Write> {
    app: AppState,
    router: Router,
    out: W,
}

impl<W: Write> Shell<W> {
    /// Starts on the configured start page.
    pub fn new(app: AppState, out: W) -> Self {
        let router = Router::new(app.config().start_route());
        Shell { app, router, out }
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    /// Hands back the output, e.g. the buffer a test wrote into.
    pub fn into_output(self) -> W {
        self.out
    }

    /// The current page as text. Opening a page creates its store.
    pub fn render(&self) -> String {
        match self.router.current() {
            Route::Users => render::users_page(&users::list_users(self.app.users())),
            Route::Products => render::products_page(&products::list_products(self.app.products())),
        }
    }

    /// The current page data as pretty JSON.
    pub fn page_json(&self) -> Result<String, ApiError> {
        let json = match self.router.current() {
            Route::Users => serde_json::to_string_pretty(&users::list_users(self.app.users())),
            Route::Products => {
                serde_json::to_string_pretty(&products::list_products(self.app.products()))
            }
        };
        json.map_err(|e| ApiError::internal(format!("Failed to serialize page: {e}")))
    }

    /// Creates the current page's store if this is its first visit.
    fn open_page(&self) {
        match self.router.current() {
            Route::Users => {
                self.app.users();
            }
            Route::Products => {
                self.app.products();
            }
        }
    }

    fn page_revision(&self) -> watch::Receiver<u64> {
        match self.router.current() {
            Route::Users => self.app.users().subscribe(),
            Route::Products => self.app.products().subscribe(),
        }
    }

    /// Runs one line against the current page.
    pub fn dispatch(&mut self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::default();
        }
        debug!(line = %line.trim(), "dispatch");

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => return Reply::error(err),
        };

        match command {
            Command::Go(path) => match self.router.navigate(&path) {
                Ok(_) => {
                    self.open_page();
                    Reply::page()
                }
                Err(err) => Reply::error(err),
            },
            Command::Show { json: false } => Reply::page(),
            Command::Show { json: true } => match self.page_json() {
                Ok(json) => Reply::message(json),
                Err(err) => Reply::error(err),
            },
            Command::Help => Reply::message(render::HELP),
            Command::Quit => Reply {
                quit: true,
                ..Default::default()
            },
            Command::Retry => {
                let pending = match self.router.current() {
                    Route::Users => tokio::spawn(commands::retry(self.app.users())),
                    Route::Products => tokio::spawn(commands::retry(self.app.products())),
                };
                Reply {
                    pending: Some(pending),
                    ..Reply::page()
                }
            }
            Command::Add(args) => match self.submit_form(&args) {
                Ok(pending) => Reply {
                    pending: Some(pending),
                    ..Reply::page()
                },
                Err(err) => Reply::error(err),
            },
            command => {
                let result = match self.router.current() {
                    Route::Users => page_command(self.app.users(), command),
                    Route::Products => page_command(self.app.products(), command),
                };
                match result {
                    Ok(message) => Reply::page().with_message(message),
                    Err(err) => Reply::error(err),
                }
            }
        }
    }

    fn submit_form(&self, args: &str) -> Result<JoinHandle<Outcome>, ApiError> {
        let form = FormInput::parse(args)?;
        let pending = match self.router.current() {
            Route::Users => tokio::spawn(users::create_user(self.app.users(), &form)?),
            Route::Products => tokio::spawn(products::create_product(self.app.products(), &form)?),
        };
        Ok(pending)
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn emit_reply(&mut self, reply: &Reply) -> io::Result<()> {
        if let Some(message) = &reply.message {
            self.emit(message)?;
        }
        if reply.page {
            let page = self.render();
            self.emit(&page)?;
        }
        Ok(())
    }

    /// Reads lines until `quit` or end of input.
    ///
    /// Besides answering each line, the page is redrawn whenever its store
    /// changes on its own, i.e. when a load or create finishes.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut revision = self.page_revision();
        revision.borrow_and_update();
        let page = self.render();
        self.emit(&page)?;

        info!(route = %self.router.current(), "Shell started");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("End of input");
                        break;
                    };
                    let reply = self.dispatch(&line);
                    if reply.quit {
                        break;
                    }
                    // The page may have changed, and the reply already shows
                    // the command's own effect.
                    revision = self.page_revision();
                    revision.borrow_and_update();
                    self.emit_reply(&reply)?;
                }
                Ok(()) = revision.changed() => {
                    revision.borrow_and_update();
                    let page = self.render();
                    self.emit(&page)?;
                }
            }
        }

        info!("Shell stopped");
        Ok(())
    }
}

/// Commands every page handles the same way.
fn page_command<R: Record>(
    store: &EntityStore<R>,
    command: Command,
) -> Result<Option<String>, ApiError> {
    match command {
        Command::Search(query) => {
            commands::search(store, &query)?;
            Ok(None)
        }
        Command::Filter(input) => {
            commands::filter(store, &input)?;
            Ok(None)
        }
        Command::Select(id) => Ok(Some(match commands::select(store, &id) {
            Some(id) => format!("Selected {id}"),
            None => "Selection cleared".to_string(),
        })),
        Command::Toggle(id) => {
            let record = commands::toggle(store, &id)?;
            let state = if record.is_active() { "active" } else { "inactive" };
            Ok(Some(format!("{} is now {state}", record.id())))
        }
        Command::Remove(id) => {
            let record = commands::remove(store, &id)?;
            Ok(Some(format!("Removed {}", record.id())))
        }
        other => Err(ApiError::internal(format!(
            "{other:?} is not a page command"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConsoleConfig;

    fn shell() -> Shell<Vec<u8>> {
        let mut config = ConsoleConfig::default();
        config.apply_overrides(|key| (key == "BACKOFFICE_LATENCY_MS").then(|| "0".to_string()));
        Shell::new(AppState::new(config), Vec::new())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("go /products".parse::<Command>().unwrap(), Command::Go("/products".into()));
        assert_eq!("search".parse::<Command>().unwrap(), Command::Search(String::new()));
        assert_eq!(
            "SEARCH  Sarah Connor ".parse::<Command>().unwrap(),
            Command::Search("Sarah Connor".into())
        );
        assert_eq!(
            "add name=\"A B\" x=1".parse::<Command>().unwrap(),
            Command::Add("name=\"A B\" x=1".into())
        );
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!(
            "show json".parse::<Command>().unwrap(),
            Command::Show { json: true }
        );
        assert!("show xml".parse::<Command>().is_err());
        assert!("toggle".parse::<Command>().is_err());
        assert!("launch".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_page_commands() {
        let mut shell = shell();
        shell.app().users().settled().await;

        let reply = shell.dispatch("toggle u2");
        assert_eq!(reply.message.as_deref(), Some("u2 is now inactive"));
        assert!(reply.page);

        let reply = shell.dispatch("toggle u9");
        assert_eq!(reply.message.as_deref(), Some("Error: User not found: u9"));
        assert!(!reply.page);

        let reply = shell.dispatch("select u1");
        assert_eq!(reply.message.as_deref(), Some("Selected u1"));
        let reply = shell.dispatch("select u1");
        assert_eq!(reply.message.as_deref(), Some("Selection cleared"));
    }

    #[tokio::test]
    async fn test_unknown_route_keeps_page() {
        let mut shell = shell();
        let reply = shell.dispatch("go /orders");
        assert_eq!(reply.message.as_deref(), Some("Error: No page at '/orders'"));
        assert_eq!(shell.current_route(), Route::Users);

        shell.dispatch("go /products");
        assert_eq!(shell.current_route(), Route::Products);
        assert!(shell.app().products_initialized());
    }

    #[tokio::test]
    async fn test_add_returns_pending_request() {
        let mut shell = shell();
        shell.app().users().settled().await;

        let reply = shell.dispatch("add name=Ann email=ann@example.com");
        let outcome = reply.pending.unwrap().await.unwrap();
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(shell.app().users().count(), 6);

        let reply = shell.dispatch("add name=Ann");
        assert!(reply.pending.is_none());
        assert!(reply.message.unwrap().starts_with("Error:"));
        assert_eq!(shell.app().users().count(), 6);
    }

    #[tokio::test]
    async fn test_show_json_is_camel_case() {
        let mut shell = shell();
        shell.app().users().settled().await;
        let reply = shell.dispatch("show json");
        let json: serde_json::Value = serde_json::from_str(&reply.message.unwrap()).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["admins"], 2);
        assert_eq!(json["rows"][0]["createdAt"], "2024-01-15");
    }

    #[tokio::test]
    async fn test_run_quits_and_renders() {
        let mut shell = shell();
        shell.app().users().settled().await;
        shell
            .run(&b"filter admin\nsearch sarah\nquit\nshow\n"[..])
            .await
            .unwrap();

        let output = String::from_utf8(shell.into_output()).unwrap();
        assert!(output.contains("== Users"));
        assert!(output.contains("Sarah Connor"));
        assert!(output.contains("filter: admin"));
        // Nothing after quit is answered.
        assert_eq!(output.matches("== Users").count(), 3);
    }
}
