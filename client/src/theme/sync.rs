use super::config::{ThemeConfig, ThemeMode, merge_for_save};
use super::palette::{self, Palette};
use super::style::{StyleSink, apply_theme_styles, clear_theme_styles};
use crate::api::ConsoleApi;
use crate::auth::{SessionManager, SignOutListener};
use crate::common::errors::{ClientError, ClientResult};
use crate::model::UserRecord;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

/// Load phase of the theme, keyed on the user it belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ThemePhase {
    /// No authenticated user
    #[default]
    Idle,
    /// Fetching the saved theme for `user_id`
    Loading { user_id: String },
    /// The saved theme for `user_id` is loaded and mode changes are persisted
    Ready { user_id: String },
}

impl ThemePhase {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            ThemePhase::Idle => None,
            ThemePhase::Loading { user_id } | ThemePhase::Ready { user_id } => Some(user_id),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ThemePhase::Ready { .. })
    }
}

/// Outcome of [`ThemeSynchronizer::set_mode`] and [`ThemeSynchronizer::toggle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeChange {
    /// The requested mode was already active
    Unchanged,
    /// Applied locally; no theme is loaded so nothing was saved
    LocalOnly,
    /// Applied locally and saved
    Persisted,
    /// Applied locally but the save failed. The mode is not rolled back.
    PersistFailed(String),
}

struct ThemeState {
    phase: ThemePhase,
    mode: ThemeMode,
    remote: Option<ThemeConfig>,
    // Bumped on every identity change; responses from older generations are dropped.
    generation: u64,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            phase: ThemePhase::Idle,
            mode: ThemeMode::Light,
            remote: None,
            generation: 0,
        }
    }
}

/// Keeps the display theme in step with the authenticated user.
///
/// The synchronizer loads the user's saved theme once per identity, derives
/// style slots from it, and persists explicit mode and palette changes.
///
/// Ordering guarantees:
///
/// - The transition from `Loading` to `Ready` happens under a single lock
///   together with the mode and remote config updates, so nothing observes a
///   half-applied load.
/// - Loading a theme never writes one back. Mode changes made while the
///   phase is `Idle` or `Loading` stay local.
/// - Responses started under an older identity are discarded.
pub struct ThemeSynchronizer {
    session: Arc<SessionManager>,
    api: Arc<dyn ConsoleApi>,
    styles: Arc<dyn StyleSink>,
    state: Mutex<ThemeState>,
    phase_tx: watch::Sender<ThemePhase>,
}

impl ThemeSynchronizer {
    pub fn new(
        session: Arc<SessionManager>,
        api: Arc<dyn ConsoleApi>,
        styles: Arc<dyn StyleSink>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(ThemePhase::Idle);
        Self {
            session,
            api,
            styles,
            state: Mutex::new(ThemeState::default()),
            phase_tx,
        }
    }

    pub async fn phase(&self) -> ThemePhase {
        self.state.lock().await.phase.clone()
    }

    pub async fn mode(&self) -> ThemeMode {
        self.state.lock().await.mode
    }

    /// Last config loaded from or saved to the backend.
    pub async fn remote(&self) -> Option<ThemeConfig> {
        self.state.lock().await.remote.clone()
    }

    pub async fn selected_palette(&self) -> &'static Palette {
        palette::selected_palette(self.state.lock().await.remote.as_ref())
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<ThemePhase> {
        self.phase_tx.subscribe()
    }

    /// Resolves once no load is in flight.
    pub async fn wait_until_settled(&self) {
        let mut rx = self.phase_tx.subscribe();
        let _ = rx
            .wait_for(|phase| !matches!(phase, ThemePhase::Loading { .. }))
            .await;
    }

    /// Aligns the theme with `user`.
    ///
    /// `None` resets to `Idle`. A new identity loads that user's saved theme.
    /// The same identity again is a no-op.
    pub async fn sync_user(&self, user: Option<&UserRecord>) {
        let Some(user) = user else {
            self.reset().await;
            return;
        };

        let generation = {
            let mut state = self.state.lock().await;
            if state.phase.user_id() == Some(user.id.as_str()) {
                return;
            }
            state.generation += 1;
            state.phase = ThemePhase::Loading {
                user_id: user.id.clone(),
            };
            state.remote = None;
            clear_theme_styles(self.styles.as_ref());
            self.phase_tx.send_replace(state.phase.clone());
            state.generation
        };

        log::debug!("Loading theme for user {}", user.id);
        let api = self.api.clone();
        let loaded = match self
            .session
            .authorized(|token| async move { api.fetch_theme(&token).await })
            .await
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load theme, using defaults: {e}");
                None
            }
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            log::debug!("Discarding theme loaded for a previous user");
            return;
        }
        let still_signed_in = self
            .session
            .current_user()
            .await
            .is_some_and(|current| current.id == user.id);
        if !still_signed_in {
            log::debug!("User {} signed out while the theme was loading", user.id);
            self.reset_state(&mut state);
            return;
        }

        match loaded {
            Some(config) => {
                state.mode = config.mode().unwrap_or_default();
                apply_theme_styles(self.styles.as_ref(), &config);
                state.remote = Some(config);
                log::info!("Theme loaded for user {} ({})", user.id, state.mode);
            }
            None => {
                state.mode = ThemeMode::Light;
                state.remote = None;
                log::info!("No saved theme for user {}, using defaults", user.id);
            }
        }
        self.styles.set_mode(state.mode);
        state.phase = ThemePhase::Ready {
            user_id: user.id.clone(),
        };
        self.phase_tx.send_replace(state.phase.clone());
    }

    async fn reset(&self) {
        let mut state = self.state.lock().await;
        self.reset_state(&mut state);
    }

    fn reset_state(&self, state: &mut ThemeState) {
        state.generation += 1;
        state.phase = ThemePhase::Idle;
        state.mode = ThemeMode::Light;
        state.remote = None;
        self.styles.set_mode(ThemeMode::Light);
        clear_theme_styles(self.styles.as_ref());
        self.phase_tx.send_replace(ThemePhase::Idle);
    }

    /// Sets the display mode.
    ///
    /// The local mode changes immediately. The change is saved only when it
    /// actually differs and a theme is loaded.
    pub async fn set_mode(&self, mode: ThemeMode) -> ModeChange {
        {
            let mut state = self.state.lock().await;
            if state.mode == mode {
                return ModeChange::Unchanged;
            }
            state.mode = mode;
            self.styles.set_mode(mode);
            if !state.phase.is_ready() {
                log::debug!("Mode set to {mode} locally, theme not loaded");
                return ModeChange::LocalOnly;
            }
        }

        match self.save_theme(&ThemeConfig::new().with_mode(mode)).await {
            Ok(_) => ModeChange::Persisted,
            Err(e) => {
                log::error!("Failed to save theme mode: {e}");
                ModeChange::PersistFailed(e.user_message())
            }
        }
    }

    pub async fn toggle(&self) -> ModeChange {
        let next = self.state.lock().await.mode.toggled();
        self.set_mode(next).await
    }

    /// Merges `partial` over the remote config and saves the result.
    ///
    /// Waits for an in-flight load first so the merge starts from the loaded
    /// config. On success the saved document becomes the remote config and
    /// styles are re-derived from it.
    pub async fn save_theme(&self, partial: &ThemeConfig) -> ClientResult<ThemeConfig> {
        self.wait_until_settled().await;

        let (payload, generation) = {
            let state = self.state.lock().await;
            if state.phase == ThemePhase::Idle {
                return Err(ClientError::NotAuthenticated);
            }
            (
                merge_for_save(state.remote.as_ref(), partial, state.mode),
                state.generation,
            )
        };

        let api = self.api.clone();
        let body = payload.clone();
        self.session
            .authorized(|token| async move { api.save_theme(&token, &body).await })
            .await?;

        let mut state = self.state.lock().await;
        if state.generation == generation {
            apply_theme_styles(self.styles.as_ref(), &payload);
            state.remote = Some(payload.clone());
        } else {
            log::debug!("Theme saved for a previous user, not applying locally");
        }
        Ok(payload)
    }

    /// Saves the colours and id of a predefined palette.
    pub async fn apply_palette(&self, id: &str) -> ClientResult<ThemeConfig> {
        let palette = palette::find(id).ok_or_else(|| ClientError::UnknownPalette(id.to_string()))?;
        log::info!("Applying palette {}", palette.id);
        self.save_theme(&palette.as_partial()).await
    }

    /// Follows the session's user in a background task, including sign-ins
    /// made directly on the session. Abort the handle to stop.
    pub fn follow(self: Arc<Self>) -> JoinHandle<()> {
        let mut users = self.session.subscribe();
        tokio::spawn(async move {
            loop {
                let user = users.borrow_and_update().clone();
                self.sync_user(user.as_ref()).await;
                if users.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

#[async_trait]
impl SignOutListener for ThemeSynchronizer {
    async fn signed_out(&self) {
        log::debug!("Session ended, resetting theme");
        self.reset().await;
    }
}
