use crate::app::App;
use crate::app::cli::ProfileArgs;
use crate::app::view;
use crate::error::{AppError, AppResult};
use crate::utils::password::{
    MIN_NEW_PASSWORD_LEN, PASSWORD_ENV_VAR, SecurePassword, get_password_from_env_or_prompt,
    prompt_new_password, validate_new_password,
};
use crate::utils::prompt::read_line;
use nimbus_client::model::ProfileUpdate;

const PASSWORD_ATTEMPTS: u32 = 3;

fn email_or_prompt(email: Option<String>) -> AppResult<String> {
    let email = match email {
        Some(email) => email,
        None => read_line("Email: ")
            .map_err(|e| AppError::Input(format!("Failed to read email: {e}")))?,
    };
    normalize_email(&email)
}

/// Trims the address and rejects values that cannot be an email.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(AppError::Input(format!("'{email}' is not an email address"))),
    }
}

/// Password for a new account: taken from the environment when set, otherwise
/// prompted twice. Either way it must meet the minimum length.
fn new_account_password() -> AppResult<SecurePassword> {
    if let Ok(password) = std::env::var(PASSWORD_ENV_VAR) {
        let password = SecurePassword::new(password);
        validate_new_password(password.as_str(), MIN_NEW_PASSWORD_LEN)?;
        return Ok(password);
    }
    Ok(prompt_new_password(MIN_NEW_PASSWORD_LEN, PASSWORD_ATTEMPTS)?)
}

pub async fn login(app: &App, email: Option<String>) -> AppResult<()> {
    let email = email_or_prompt(email)?;
    let password = get_password_from_env_or_prompt(PASSWORD_ENV_VAR, "Password: ", PASSWORD_ATTEMPTS)?;

    let user = app.console().login(&email, password.as_str()).await?;

    let output = app.output();
    if output.is_json() {
        output.emit(&user, view::user_summary)
    } else {
        output.message(&format!("Signed in as {}", user.label()))
    }
}

pub async fn register(
    app: &App,
    email: Option<String>,
    display_name: Option<String>,
) -> AppResult<()> {
    let email = email_or_prompt(email)?;
    let display_name = display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    let password = new_account_password()?;

    let user = app
        .console()
        .register(&email, password.as_str(), display_name.as_deref())
        .await?;

    let output = app.output();
    if output.is_json() {
        output.emit(&user, view::user_summary)
    } else {
        output.message(&format!(
            "Account created successfully! Signed in as {}",
            user.label()
        ))
    }
}

pub async fn logout(app: &App) -> AppResult<()> {
    let was_signed_in = app.console().session.is_authenticated().await;
    app.console().logout().await;

    app.output().message(if was_signed_in {
        "Signed out."
    } else {
        "Not signed in."
    })
}

pub async fn whoami(app: &App) -> AppResult<()> {
    let user = app.require_user().await?;
    app.output().emit(&user, view::user_summary)
}

impl From<ProfileArgs> for ProfileUpdate {
    fn from(args: ProfileArgs) -> Self {
        ProfileUpdate {
            display_name: args.display_name,
            bio: args.bio,
            avatar_url: args.avatar_url,
            tagline: args.tagline,
        }
    }
}

/// Without any field flags the current profile is shown.
pub async fn profile(app: &App, args: ProfileArgs) -> AppResult<()> {
    let update = ProfileUpdate::from(args);
    if update.is_empty() {
        return whoami(app).await;
    }

    app.require_user().await?;
    let user = app.console().session.update_profile(&update).await?;
    app.output().emit(&user, |user| {
        format!("Profile updated.\n{}", view::user_summary(user))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_trimmed_and_checked() {
        assert_eq!(normalize_email("  ada@example.com ").unwrap(), "ada@example.com");
        assert!(normalize_email("ada").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("ada@").is_err());
    }

    #[test]
    fn test_profile_args_map_onto_update() {
        let update = ProfileUpdate::from(ProfileArgs {
            tagline: Some("Analytical".to_string()),
            ..Default::default()
        });
        assert_eq!(update.tagline.as_deref(), Some("Analytical"));
        assert!(update.display_name.is_none());
        assert!(!update.is_empty());
        assert!(ProfileUpdate::from(ProfileArgs::default()).is_empty());
    }
}
