use crate::auth::errors::LoginError;
use crate::auth::store::StorageError;
use thiserror::Error;

/// HTTP-level errors raised while talking to the dashboard backend.
///
/// Every request made through [`ConsoleApi`](crate::api::ConsoleApi) fails with
/// one of these variants. Status-bearing variants keep the backend's `detail`
/// message when the error body carried one, so callers can surface it verbatim.
///
/// # Error Categories
///
/// ## Client Configuration Errors
/// - [`ClientCreation`] - HTTP client initialization failures
///
/// ## Status Errors
/// - [`Unauthorized`] - HTTP 401, the bearer token was rejected
/// - [`NotFound`] - HTTP 404
/// - [`Status`] - any other non-success status
///
/// ## Transport Errors
/// - [`Transport`] - connection, TLS or I/O failures
/// - [`Timeout`] - the request exceeded the configured timeout
/// - [`Decode`] - the response body did not match the expected shape
///
/// # Examples
///
/// ```no_run
/// use client::common::errors::ApiError;
///
/// fn describe(error: &ApiError) -> String {
///     match error {
///         ApiError::Unauthorized { .. } => "session expired".to_string(),
///         other => other.detail().unwrap_or("request failed").to_string(),
///     }
/// }
/// ```
///
/// [`ClientCreation`]: ApiError::ClientCreation
/// [`Unauthorized`]: ApiError::Unauthorized
/// [`NotFound`]: ApiError::NotFound
/// [`Status`]: ApiError::Status
/// [`Transport`]: ApiError::Transport
/// [`Timeout`]: ApiError::Timeout
/// [`Decode`]: ApiError::Decode
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// HTTP client initialization failed.
    #[error("HTTP client creation failed: {reason}")]
    ClientCreation { reason: String },

    /// The backend answered 401 Unauthorized.
    #[error("Unauthorized: {url}")]
    Unauthorized { url: String, detail: Option<String> },

    /// The backend answered 404 Not Found.
    #[error("Not found: {url}")]
    NotFound { url: String, detail: Option<String> },

    /// The backend answered with another non-success status.
    #[error("Request to {url} failed with status {status}")]
    Status {
        url: String,
        status: u16,
        detail: Option<String>,
    },

    /// The request never produced a response.
    #[error("Request failed: {url} - {reason}")]
    Transport { url: String, reason: String },

    /// The request exceeded the configured timeout.
    #[error("Request timeout after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },

    /// The response body could not be decoded.
    #[error("Invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl ApiError {
    /// HTTP status carried by this error, if the backend produced a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied `detail` message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail, .. }
            | ApiError::NotFound { detail, .. }
            | ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Message suitable for showing to a user: the backend detail when present,
    /// otherwise the error's own description.
    pub fn user_message(&self) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Crate-level error returned by session, theme, resource and user operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation needs an authenticated session and none is active.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The target user is protected; role changes, deletion and password resets are refused.
    #[error("User {user_id} is protected and cannot be modified")]
    ProtectedUser { user_id: String },

    #[error("Admin privileges are required for this operation")]
    AdminRequired,

    #[error("Invalid colour value: {0}")]
    InvalidColor(String),

    #[error("Unknown colour scheme: {0}")]
    UnknownPalette(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl ClientError {
    /// Message suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
