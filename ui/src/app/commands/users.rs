use crate::app::App;
use crate::app::cli::UserCommand;
use crate::app::view;
use crate::error::{AppError, AppResult};
use crate::utils::password::{MIN_NEW_PASSWORD_LEN, prompt_new_password};
use crate::utils::prompt::confirm;
use nimbus_client::users::ensure_manageable;

const PASSWORD_ATTEMPTS: u32 = 3;

pub async fn run(app: &App, command: UserCommand) -> AppResult<()> {
    let actor = app.require_user().await?;
    let users = &app.console().users;
    let output = app.output();

    match command {
        UserCommand::List => {
            let list = users.list().await?;
            output.emit(&list, |list| view::users_table(list, &actor))
        }
        UserCommand::SetRole { user_id, role } => {
            let target = users.update_role_by_id(&user_id, role).await?;
            output.message(&format!("{} is now {role}.", target.email))
        }
        UserCommand::Delete { user_id, yes } => {
            let target = users.find(&user_id).await?;
            // Refuse before asking, so a protected account never gets a prompt.
            ensure_manageable(&actor, &target)?;

            let question = format!("Delete user {} ({})?", target.email, target.id);
            if !yes
                && !confirm(&question)
                    .map_err(|e| AppError::Input(format!("Failed to read answer: {e}")))?
            {
                return output.message("Cancelled.");
            }
            users.delete(&target).await?;
            output.message(&format!("Deleted user {}.", target.email))
        }
        UserCommand::ResetPassword { user_id } => {
            let target = users.find(&user_id).await?;
            ensure_manageable(&actor, &target)?;

            let password = prompt_new_password(MIN_NEW_PASSWORD_LEN, PASSWORD_ATTEMPTS)?;
            users.reset_password(&target, password.as_str()).await?;
            output.message(&format!("Password reset for {}.", target.email))
        }
    }
}
