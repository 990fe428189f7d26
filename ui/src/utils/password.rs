use rpassword::read_password;
use std::io::{self, Write};
use zeroize::ZeroizeOnDrop;

/// Environment variable consulted before prompting for the login password
pub const PASSWORD_ENV_VAR: &str = "NIMBUS_PASSWORD";

/// Minimum length for passwords set by an admin
pub const MIN_NEW_PASSWORD_LEN: usize = 6;

/// Password container that clears its memory on drop
#[derive(ZeroizeOnDrop)]
pub struct SecurePassword(String);

impl SecurePassword {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecurePassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecurePassword(***)")
    }
}

/// Password input errors
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to read password: {0}")]
    ReadError(#[from] io::Error),
    #[error("Empty password provided")]
    EmptyPassword,
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },
    #[error("Passwords do not match")]
    Mismatch,
    #[error("Maximum password attempts exceeded")]
    MaxAttemptsExceeded,
}

impl PasswordError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            PasswordError::EmptyPassword | PasswordError::TooShort { .. } | PasswordError::Mismatch
        )
    }
}

/// Rejects passwords shorter than `min` characters.
pub fn validate_new_password(password: &str, min: usize) -> Result<(), PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::EmptyPassword);
    }
    if password.chars().count() < min {
        return Err(PasswordError::TooShort { min });
    }
    Ok(())
}

/// Prompts for a password without echoing it
pub fn prompt_password(prompt: &str) -> Result<SecurePassword, PasswordError> {
    print!("{prompt}");
    io::stdout().flush()?;

    let password = SecurePassword::new(read_password()?);

    if password.as_str().trim().is_empty() {
        return Err(PasswordError::EmptyPassword);
    }

    Ok(password)
}

fn with_retry<F>(max_attempts: u32, mut attempt: F) -> Result<SecurePassword, PasswordError>
where
    F: FnMut() -> Result<SecurePassword, PasswordError>,
{
    let mut attempts = 0;

    loop {
        attempts += 1;

        match attempt() {
            Ok(password) => return Ok(password),
            Err(e) if e.is_retryable() => {
                eprintln!("{e}. Please try again.");
                if attempts >= max_attempts {
                    return Err(PasswordError::MaxAttemptsExceeded);
                }
            }
            Err(e) => return Err(e),
        }
    }
}

/// Prompts for a password with retry logic
pub fn prompt_password_with_retry(
    prompt: &str,
    max_attempts: u32,
) -> Result<SecurePassword, PasswordError> {
    with_retry(max_attempts, || prompt_password(prompt))
}

/// Prompts twice for a new password and checks both entries agree.
pub fn prompt_new_password(min: usize, max_attempts: u32) -> Result<SecurePassword, PasswordError> {
    with_retry(max_attempts, || {
        let first = prompt_password("New password: ")?;
        validate_new_password(first.as_str(), min)?;
        let second = prompt_password("Confirm password: ")?;
        if first.as_str() != second.as_str() {
            return Err(PasswordError::Mismatch);
        }
        Ok(first)
    })
}

/// Gets the password from an environment variable or prompts the user
pub fn get_password_from_env_or_prompt(
    env_var: &str,
    prompt: &str,
    max_attempts: u32,
) -> Result<SecurePassword, PasswordError> {
    if let Ok(password) = std::env::var(env_var) {
        if !password.trim().is_empty() {
            return Ok(SecurePassword::new(password));
        }
    }

    prompt_password_with_retry(prompt, max_attempts)
}
