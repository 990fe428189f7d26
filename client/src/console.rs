use crate::api::ConsoleApi;
use crate::auth::{LoginError, SessionManager, SessionStore, SignOutListener};
use crate::common::errors::ClientResult;
use crate::model::UserRecord;
use crate::resources::ResourceService;
use crate::theme::{StyleSink, ThemeSynchronizer};
use crate::users::UserAdminService;
use std::sync::{Arc, Weak};

/// Composition root: one session shared by the theme synchronizer and services.
///
/// Sign-ins made through the console resync the theme before the call
/// returns. Every sign-out, including one forced by a `401` from any request,
/// resets the theme before the failing call returns.
pub struct Console {
    pub session: Arc<SessionManager>,
    pub theme: Arc<ThemeSynchronizer>,
    pub resources: ResourceService,
    pub users: UserAdminService,
}

impl Console {
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        store: Arc<dyn SessionStore>,
        styles: Arc<dyn StyleSink>,
    ) -> Self {
        let session = Arc::new(SessionManager::new(api.clone(), store));
        let theme = Arc::new(ThemeSynchronizer::new(
            session.clone(),
            api.clone(),
            styles,
        ));
        let listener: Weak<dyn SignOutListener> = Arc::downgrade(&theme) as Weak<ThemeSynchronizer>;
        session.on_sign_out(listener);
        Self {
            resources: ResourceService::new(session.clone(), api.clone()),
            users: UserAdminService::new(session.clone(), api),
            session,
            theme,
        }
    }

    /// Restores the persisted session, then loads the theme for whoever it resolved to.
    pub async fn start(&self) -> Option<UserRecord> {
        let user = self.session.initialize().await;
        self.theme.sync_user(user.as_ref()).await;
        user
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, LoginError> {
        let result = self.session.login(email, password).await;
        self.resync_theme().await;
        result
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> ClientResult<UserRecord> {
        let result = self.session.register(email, password, display_name).await;
        self.resync_theme().await;
        result
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    /// Brings the theme in line with the session, e.g. after a request forced logout.
    pub async fn resync_theme(&self) {
        let user = self.session.current_user().await;
        self.theme.sync_user(user.as_ref()).await;
    }
}
