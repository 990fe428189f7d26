use super::errors::LoginError;
use super::store::SessionStore;
use crate::api::ConsoleApi;
use crate::common::errors::{ApiError, ClientError, ClientResult};
use crate::model::{ProfileUpdate, UserRecord};
use async_trait::async_trait;
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::{RwLock, watch};

/// Runs after the session ends, whether by logout, failed login or a `401`.
#[async_trait]
pub trait SignOutListener: Send + Sync {
    async fn signed_out(&self);
}

/// Authentication state of the current session.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    /// No credential is held
    #[default]
    Unauthenticated,
    /// A persisted credential is being validated against the backend
    Restoring,
    /// The credential was accepted and the profile is loaded
    Authenticated {
        /// Profile returned by `GET /api/users/me`
        user: UserRecord,
    },
    /// The last login attempt failed. Holds the message to display.
    Failed(String),
}

impl SessionState {
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            SessionState::Authenticated { user } => Some(user),
            _ => None,
        }
    }
}

#[derive(Default)]
struct SessionInner {
    state: SessionState,
    token: Option<String>,
    // Bumped whenever the token changes so in-flight profile fetches can detect staleness.
    generation: u64,
}

/// Owns the session credential and the cached profile.
///
/// The manager is the only writer of the durable [`SessionStore`]. Every
/// token or user change is persisted, and every transition to an
/// unauthenticated state purges both keys. User changes are published on a
/// `watch` channel so dependants such as the theme synchronizer can follow
/// the current identity.
///
/// A `401` observed through [`authorized`](Self::authorized) forces logout,
/// but only if the rejected token is still the current one.
///
/// # Examples
///
/// ```no_run
/// use client::auth::{MemorySessionStore, SessionManager};
/// use client::api::HttpConsoleApi;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = Arc::new(HttpConsoleApi::new("http://localhost:8000", Duration::from_secs(30))?);
/// let session = SessionManager::new(api, Arc::new(MemorySessionStore::new()));
///
/// if session.initialize().await.is_none() {
///     session.login("ada@example.com", "secret").await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct SessionManager {
    api: Arc<dyn ConsoleApi>,
    store: Arc<dyn SessionStore>,
    inner: Arc<RwLock<SessionInner>>,
    user_tx: watch::Sender<Option<UserRecord>>,
    listeners: Mutex<Vec<Weak<dyn SignOutListener>>>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn ConsoleApi>, store: Arc<dyn SessionStore>) -> Self {
        let (user_tx, _) = watch::channel(None);
        Self {
            api,
            store,
            inner: Arc::new(RwLock::new(SessionInner::default())),
            user_tx,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Registers `listener` to run after every purge, before the call that
    /// caused it returns. Dropped listeners are skipped.
    pub fn on_sign_out(&self, listener: Weak<dyn SignOutListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }

    pub async fn state(&self) -> SessionState {
        self.inner.read().await.state.clone()
    }

    pub async fn current_user(&self) -> Option<UserRecord> {
        self.inner.read().await.state.user().cloned()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        matches!(
            self.inner.read().await.state,
            SessionState::Authenticated { .. }
        )
    }

    pub async fn is_admin(&self) -> bool {
        self.current_user()
            .await
            .map(|user| user.is_admin())
            .unwrap_or(false)
    }

    /// Receiver that observes every change of the authenticated user.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserRecord>> {
        self.user_tx.subscribe()
    }

    /// Restores a persisted session.
    ///
    /// A stored token is validated with `GET /api/users/me`. Any failure,
    /// including transport errors, discards the token and the cached user.
    ///
    /// # Returns
    ///
    /// The validated profile, or `None` when the session is unauthenticated afterwards.
    pub async fn initialize(&self) -> Option<UserRecord> {
        let token = match self.store.load_token() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read persisted session, starting signed out: {e}");
                self.purge_store();
                return None;
            }
        };

        if let Ok(Some(cached)) = self.store.load_user() {
            log::debug!("Restoring session for {}", cached.email);
        }

        let generation = {
            let mut inner = self.inner.write().await;
            inner.state = SessionState::Restoring;
            inner.token = Some(token.clone());
            inner.generation += 1;
            inner.generation
        };

        match self.api.fetch_profile(&token).await {
            Ok(user) => {
                if self.apply_profile(generation, user.clone()).await {
                    log::info!("Session restored for {}", user.email);
                    Some(user)
                } else {
                    None
                }
            }
            Err(e) => {
                log::info!("Persisted session rejected, signing out: {e}");
                self.clear_if_generation(generation, SessionState::Unauthenticated)
                    .await;
                None
            }
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// On any failure the session ends up in [`SessionState::Failed`] with
    /// no credential held.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, LoginError> {
        log::info!("Logging in as {email}");

        let issued = match self.api.login(email, password).await {
            Ok(issued) => issued,
            Err(e) => {
                let error = LoginError::classify(&e);
                log::warn!("Login failed: {e}");
                self.fail(error.to_string()).await;
                return Err(error);
            }
        };

        let generation = self.install_token(&issued.access_token).await;

        match self.api.fetch_profile(&issued.access_token).await {
            Ok(user) => {
                if self.apply_profile(generation, user.clone()).await {
                    log::info!("Logged in as {}", user.email);
                    Ok(user)
                } else {
                    log::debug!("Login superseded by another session change");
                    Err(LoginError::Generic)
                }
            }
            Err(e) => {
                log::error!("Profile fetch after login failed: {e}");
                let error = LoginError::ProfileUnavailable;
                self.clear_if_generation(generation, SessionState::Failed(error.to_string()))
                    .await;
                Err(error)
            }
        }
    }

    /// Creates an account and signs in with the issued token.
    ///
    /// Backend errors are returned unchanged. There is no client-side
    /// password policy at this layer.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> ClientResult<UserRecord> {
        log::info!("Registering {email}");
        let issued = self.api.signup(email, password, display_name).await?;
        let generation = self.install_token(&issued.access_token).await;

        match self.api.fetch_profile(&issued.access_token).await {
            Ok(user) => {
                if self.apply_profile(generation, user.clone()).await {
                    log::info!("Registered and logged in as {}", user.email);
                    Ok(user)
                } else {
                    Err(ClientError::NotAuthenticated)
                }
            }
            Err(e) => {
                log::error!("Profile fetch after registration failed: {e}");
                self.clear_if_generation(generation, SessionState::Unauthenticated)
                    .await;
                Err(e.into())
            }
        }
    }

    /// Ends the session. Never fails and is idempotent.
    ///
    /// The server is told about the token on a best-effort basis, then local
    /// state is purged whatever the server answered.
    pub async fn logout(&self) {
        if let Some(token) = self.token().await {
            if let Err(e) = self.api.logout(&token).await {
                log::warn!("Server logout failed, clearing local session anyway: {e}");
            }
        }

        if self.clear(SessionState::Unauthenticated).await.is_some() {
            log::info!("Logged out");
        }
    }

    /// Ends the session without contacting the server.
    pub async fn force_logout(&self) {
        if self.clear(SessionState::Unauthenticated).await.is_some() {
            log::warn!("Session invalidated by the server, signed out");
        }
    }

    /// Reloads the cached profile. Failures are logged, not returned.
    ///
    /// The result is applied only if the same token is still authenticated.
    /// A `401` forces logout.
    pub async fn refresh_profile(&self) {
        let (token, generation) = {
            let inner = self.inner.read().await;
            match (&inner.token, &inner.state) {
                (Some(token), SessionState::Authenticated { .. }) => {
                    (token.clone(), inner.generation)
                }
                _ => return,
            }
        };

        match self.api.fetch_profile(&token).await {
            Ok(user) => {
                if !self.apply_profile(generation, user).await {
                    log::debug!("Discarding stale profile refresh");
                }
            }
            Err(e) if e.is_unauthorized() => {
                self.invalidate(&token).await;
            }
            Err(e) => {
                log::error!("Failed to refresh profile: {e}");
            }
        }
    }

    /// Sends a partial profile update and caches the returned profile, then
    /// refreshes it.
    ///
    /// A failed refresh keeps the cached update. A `401` during the refresh
    /// ends the session and the call fails with
    /// [`ClientError::NotAuthenticated`].
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserRecord> {
        let generation = self.inner.read().await.generation;
        let updated = self
            .authorized(|token| async move { self.api.update_profile(&token, update).await })
            .await?;
        if !self.apply_profile(generation, updated).await {
            log::debug!("Session changed during profile update, discarding response");
            return Err(ClientError::NotAuthenticated);
        }

        self.refresh_profile().await;
        self.current_user()
            .await
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Runs an authenticated request with the current token.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotAuthenticated`] when no session is active
    /// - [`ClientError::Api`] with the request's error otherwise. An
    ///   [`ApiError::Unauthorized`] also ends the session if the rejected
    ///   token is still current.
    pub async fn authorized<T, F, Fut>(&self, request: F) -> ClientResult<T>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = {
            let inner = self.inner.read().await;
            match (&inner.token, &inner.state) {
                (Some(token), SessionState::Authenticated { .. }) => token.clone(),
                _ => return Err(ClientError::NotAuthenticated),
            }
        };

        match request(token.clone()).await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_unauthorized() {
                    self.invalidate(&token).await;
                }
                Err(e.into())
            }
        }
    }

    /// Forced logout triggered by a `401` for `token`. Ignored if the token was already replaced.
    async fn invalidate(&self, token: &str) {
        let generation = {
            let inner = self.inner.read().await;
            if inner.token.as_deref() != Some(token) {
                log::debug!("Ignoring 401 for a token that is no longer current");
                return;
            }
            inner.generation
        };
        if self
            .clear_if_generation(generation, SessionState::Unauthenticated)
            .await
        {
            log::warn!("Session invalidated by the server, signed out");
        }
    }

    async fn install_token(&self, token: &str) -> u64 {
        let mut inner = self.inner.write().await;
        inner.token = Some(token.to_string());
        inner.generation += 1;
        if let Err(e) = self.store.save_token(token) {
            log::error!("Failed to persist session token: {e}");
        }
        inner.generation
    }

    /// Caches `user` if `generation` is still current. Returns whether it was applied.
    async fn apply_profile(&self, generation: u64, user: UserRecord) -> bool {
        let mut inner = self.inner.write().await;
        if inner.generation != generation || inner.token.is_none() {
            return false;
        }
        if let Err(e) = self.store.save_user(&user) {
            log::error!("Failed to persist user profile: {e}");
        }
        inner.state = SessionState::Authenticated { user: user.clone() };
        self.user_tx.send_replace(Some(user));
        true
    }

    async fn fail(&self, reason: String) {
        self.clear(SessionState::Failed(reason)).await;
    }

    /// Purges everything and moves to `next`. Returns the discarded token.
    async fn clear(&self, next: SessionState) -> Option<String> {
        let token = {
            let mut inner = self.inner.write().await;
            let token = inner.token.take();
            inner.generation += 1;
            inner.state = next;
            self.purge_store();
            self.user_tx.send_replace(None);
            token
        };
        self.notify_signed_out().await;
        token
    }

    async fn clear_if_generation(&self, generation: u64, next: SessionState) -> bool {
        {
            let mut inner = self.inner.write().await;
            if inner.generation != generation {
                return false;
            }
            inner.token = None;
            inner.generation += 1;
            inner.state = next;
            self.purge_store();
            self.user_tx.send_replace(None);
        }
        self.notify_signed_out().await;
        true
    }

    // Called with the session lock released; listeners may read the session.
    async fn notify_signed_out(&self) {
        let listeners: Vec<Arc<dyn SignOutListener>> = {
            let mut listeners = self
                .listeners
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in listeners {
            listener.signed_out().await;
        }
    }

    fn purge_store(&self) {
        if let Err(e) = self.store.purge() {
            log::error!("Failed to purge persisted session: {e}");
        }
    }
}
