//! Command dispatch for the `nimbus` binary.
//!
//! [`App`] owns one [`Console`] per process. Every run restores the stored
//! session and loads that user's theme before the requested command executes,
//! so commands always see the same state the dashboard would.

pub mod cli;
pub mod commands;
pub mod view;

pub use cli::{Cli, Command, GlobalArgs};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult, NOT_LOGGED_IN};
use nimbus_client::Console;
use nimbus_client::api::{ConsoleApi, HttpConsoleApi};
use nimbus_client::auth::{FileSessionStore, MemorySessionStore, SessionStore};
use nimbus_client::model::UserRecord;
use nimbus_client::theme::DerivedStyles;
use serde::Serialize;
use std::sync::Arc;

/// Writes command results as text or, with `--json`, as pretty JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    json: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Formats `value` with `render` in text mode, or serializes it in JSON mode.
    pub fn format<T, F>(&self, value: &T, render: F) -> AppResult<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        if self.json {
            serde_json::to_string_pretty(value)
                .map_err(|e| AppError::Input(format!("Failed to encode output: {e}")))
        } else {
            Ok(render(value))
        }
    }

    pub fn emit<T, F>(&self, value: &T, render: F) -> AppResult<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        println!("{}", self.format(value, render)?);
        Ok(())
    }

    pub fn message(&self, text: &str) -> AppResult<()> {
        self.emit(&Message { message: text }, |m| m.message.to_string())
    }
}

pub struct App {
    console: Console,
    styles: Arc<DerivedStyles>,
    output: Output,
}

impl App {
    /// Wires the HTTP client and session store chosen by configuration and flags.
    pub fn new(config: &AppConfig, global: &GlobalArgs) -> AppResult<Self> {
        let base_url = global
            .api_url
            .as_deref()
            .unwrap_or_else(|| config.api().base_url());
        let api = HttpConsoleApi::new(base_url, config.api().timeout())?;
        log::info!("Using backend {}", api.base_url());

        let store: Arc<dyn SessionStore> = if global.ephemeral {
            Arc::new(MemorySessionStore::new())
        } else {
            match config.session_file() {
                Some(path) => {
                    log::debug!("Session file: {}", path.display());
                    Arc::new(FileSessionStore::new(path))
                }
                None => {
                    return Err(AppError::Storage(
                        "Could not determine where to keep the session. Set storage.session_file in config.toml or use --ephemeral.".to_string(),
                    ));
                }
            }
        };

        Ok(Self::with_parts(
            Arc::new(api),
            store,
            Output::new(global.json),
        ))
    }

    pub fn with_parts(
        api: Arc<dyn ConsoleApi>,
        store: Arc<dyn SessionStore>,
        output: Output,
    ) -> Self {
        let styles = Arc::new(DerivedStyles::new());
        let console = Console::new(api, store, styles.clone());
        Self {
            console,
            styles,
            output,
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn styles(&self) -> &DerivedStyles {
        &self.styles
    }

    pub fn output(&self) -> Output {
        self.output
    }

    /// The signed-in user, or an authentication error.
    pub async fn require_user(&self) -> AppResult<UserRecord> {
        self.console
            .session
            .current_user()
            .await
            .ok_or_else(|| AppError::Auth(NOT_LOGGED_IN.to_string()))
    }

    /// Restores the session, then runs `command`.
    pub async fn run(&self, command: Command) -> AppResult<()> {
        match self.console.start().await {
            Some(user) => log::info!("Session restored for user {}", user.id),
            None => log::info!("No active session"),
        }

        match command {
            Command::Login { email } => commands::auth::login(self, email).await,
            Command::Register {
                email,
                display_name,
            } => commands::auth::register(self, email, display_name).await,
            Command::Logout => commands::auth::logout(self).await,
            Command::Whoami => commands::auth::whoami(self).await,
            Command::Profile(args) => commands::auth::profile(self, args).await,
            Command::Dashboard => commands::resources::dashboard(self).await,
            Command::Resources(command) => commands::resources::run(self, command).await,
            Command::Users(command) => commands::users::run(self, command).await,
            Command::Theme(command) => commands::theme::run(self, command).await,
            Command::Config(_) => Err(AppError::Input(
                "Configuration commands run without a backend session".to_string(),
            )),
        }
    }
}
