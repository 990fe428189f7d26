use crate::common::errors::ApiError;
use thiserror::Error;

/// Classified login failure, ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Invalid email or password. Please check and try again.")]
    InvalidCredentials,

    #[error("Account not found. Please check your email.")]
    AccountNotFound,

    /// Message supplied by the backend in the error body.
    #[error("{0}")]
    Detail(String),

    /// Transport-level failure message.
    #[error("{0}")]
    Other(String),

    #[error("Login failed. Please try again.")]
    Generic,

    /// Credentials were accepted but the profile could not be loaded.
    #[error("Failed to fetch user profile")]
    ProfileUnavailable,
}

impl LoginError {
    /// Maps a failed login request onto the user-facing categories.
    ///
    /// Priority: 401, then 404, then a backend `detail`, then the error's own
    /// message, then the generic fallback.
    pub fn classify(error: &ApiError) -> Self {
        match error.status() {
            Some(401) => return LoginError::InvalidCredentials,
            Some(404) => return LoginError::AccountNotFound,
            _ => {}
        }

        if let Some(detail) = error.detail() {
            return LoginError::Detail(detail.to_string());
        }

        match error {
            ApiError::Transport { reason, .. } if !reason.trim().is_empty() => {
                LoginError::Other(reason.clone())
            }
            ApiError::Timeout { .. } | ApiError::Decode { .. } | ApiError::ClientCreation { .. } => {
                LoginError::Other(error.to_string())
            }
            _ => LoginError::Generic,
        }
    }
}
