use crate::utils::password::PasswordError;
use nimbus_client::auth::{LoginError, StorageError};
use nimbus_client::{ApiError, ClientError};
use std::fmt::Display;

/// Errors surfaced by the `nimbus` command line.
///
/// Library errors are folded into these categories so every command reports
/// failures the same way: a category prefix followed by a message meant for
/// the person at the terminal. Technical details go to the log file.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The backend rejected or failed a request.
    Api(String),

    /// Missing, expired or rejected credentials.
    ///
    /// The session has already been cleared when this is produced from a 401.
    Auth(String),

    /// The signed-in user may not perform the operation.
    Permission(String),

    /// Configuration could not be loaded or failed validation.
    Config(String),

    /// Local session storage failed.
    Storage(String),

    /// The command line arguments or prompted input were unusable.
    Input(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Api(msg) => write!(f, "API Error: {msg}"),
            AppError::Auth(msg) => write!(f, "Authentication Error: {msg}"),
            AppError::Permission(msg) => write!(f, "Permission Error: {msg}"),
            AppError::Config(msg) => write!(f, "Configuration Error: {msg}"),
            AppError::Storage(msg) => write!(f, "Storage Error: {msg}"),
            AppError::Input(msg) => write!(f, "Input Error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

pub const NOT_LOGGED_IN: &str = "Not logged in. Run `nimbus login` first.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            AppError::Auth(SESSION_EXPIRED.to_string())
        } else {
            AppError::Api(err.user_message())
        }
    }
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        AppError::Auth(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(e) => e.into(),
            ClientError::Login(e) => e.into(),
            ClientError::Storage(e) => e.into(),
            ClientError::NotAuthenticated => AppError::Auth(NOT_LOGGED_IN.to_string()),
            ClientError::ProtectedUser { .. } | ClientError::AdminRequired => {
                AppError::Permission(err.user_message())
            }
            ClientError::InvalidColor(_)
            | ClientError::UnknownPalette(_)
            | ClientError::NotFound { .. } => AppError::Input(err.user_message()),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Input(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_becomes_session_expired() {
        let err = AppError::from(ClientError::Api(ApiError::Unauthorized {
            url: "http://localhost:8000/api/resources/".to_string(),
            detail: Some("Token revoked".to_string()),
        }));
        assert_eq!(err, AppError::Auth(SESSION_EXPIRED.to_string()));
    }

    #[test]
    fn test_backend_detail_is_kept() {
        let err = AppError::from(ClientError::Api(ApiError::Status {
            url: "http://localhost:8000/api/resources/7".to_string(),
            status: 422,
            detail: Some("Region is required".to_string()),
        }));
        assert_eq!(err.to_string(), "API Error: Region is required");
    }

    #[test]
    fn test_guard_errors_are_permission_errors() {
        let err = AppError::from(ClientError::ProtectedUser {
            user_id: "root".to_string(),
        });
        assert!(matches!(err, AppError::Permission(ref msg) if msg.contains("root")));
        assert!(matches!(
            AppError::from(ClientError::AdminRequired),
            AppError::Permission(_)
        ));
    }

    #[test]
    fn test_login_error_keeps_its_wording() {
        let err = AppError::from(LoginError::AccountNotFound);
        assert_eq!(
            err.to_string(),
            "Authentication Error: Account not found. Please check your email."
        );
    }
}
