//! REST contract of the dashboard backend.
//!
//! [`ConsoleApi`] is the seam between the state machines and the network:
//! the session manager, theme synchronizer and services only ever talk to
//! this trait. [`http::HttpConsoleApi`] is the production implementation.

pub mod http;
pub mod types;

use crate::common::errors::ApiError;
use crate::model::{
    AdminUserRecord, ProfileUpdate, ResourceDraft, ResourceRecord, ResourceTemplate, Role,
    UserRecord,
};
use crate::theme::config::ThemeConfig;
use async_trait::async_trait;

pub use http::HttpConsoleApi;

/// Credential issued by the login and signup endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: Option<String>,
    /// Profile echoed by the backend, if it sent one. Never trusted on its own.
    pub user: Option<UserRecord>,
}

impl From<types::AuthResponse> for IssuedToken {
    fn from(response: types::AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            user: response.user.map(UserRecord::from),
        }
    }
}

/// One method per backend endpoint.
///
/// Authenticated methods take the bearer token explicitly so that callers
/// decide which credential a request runs under. A `401` surfaces as
/// [`ApiError::Unauthorized`]; reacting to it is the caller's job.
///
/// # Examples
///
/// ```no_run
/// use client::api::{ConsoleApi, HttpConsoleApi};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), client::ApiError> {
/// let api = HttpConsoleApi::new("http://localhost:8000", Duration::from_secs(30))?;
/// let issued = api.login("ada@example.com", "secret").await?;
/// let profile = api.fetch_profile(&issued.access_token).await?;
/// println!("signed in as {}", profile.email);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// `POST /api/auth/login`
    async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, ApiError>;

    /// `POST /api/auth/signup`
    async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IssuedToken, ApiError>;

    /// `POST /api/auth/logout`. The response body is ignored.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    /// `GET /api/users/me`
    async fn fetch_profile(&self, token: &str) -> Result<UserRecord, ApiError>;

    /// `PATCH /api/users/me`
    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserRecord, ApiError>;

    /// `GET /api/theme/`. `None` when the user has no saved theme.
    async fn fetch_theme(&self, token: &str) -> Result<Option<ThemeConfig>, ApiError>;

    /// `PUT /api/theme/`
    async fn save_theme(&self, token: &str, config: &ThemeConfig) -> Result<(), ApiError>;

    async fn list_resources(&self, token: &str) -> Result<Vec<ResourceRecord>, ApiError>;

    async fn create_resource(
        &self,
        token: &str,
        draft: &ResourceDraft,
    ) -> Result<ResourceRecord, ApiError>;

    async fn update_resource(
        &self,
        token: &str,
        id: i64,
        draft: &ResourceDraft,
    ) -> Result<ResourceRecord, ApiError>;

    async fn delete_resource(&self, token: &str, id: i64) -> Result<(), ApiError>;

    async fn list_templates(&self, token: &str) -> Result<Vec<ResourceTemplate>, ApiError>;

    /// Imports the given templates as resources. The body is a bare JSON array of ids.
    async fn import_templates(&self, token: &str, template_ids: &[i64]) -> Result<(), ApiError>;

    async fn seed_templates(&self, token: &str) -> Result<(), ApiError>;

    /// `GET /api/admin/users`
    async fn list_users(&self, token: &str) -> Result<Vec<AdminUserRecord>, ApiError>;

    async fn update_user_role(&self, token: &str, user_id: &str, role: Role)
    -> Result<(), ApiError>;

    async fn delete_user(&self, token: &str, user_id: &str) -> Result<(), ApiError>;

    async fn reset_user_password(
        &self,
        token: &str,
        user_id: &str,
        new_password: &str,
    ) -> Result<(), ApiError>;
}
