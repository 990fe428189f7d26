//! Admin user management.
//!
//! Every mutating call is checked by [`ensure_manageable`] before a request
//! is built, so protected accounts never see a role change, deletion or
//! password reset from this client.

use crate::api::ConsoleApi;
use crate::auth::SessionManager;
use crate::common::errors::{ClientError, ClientResult};
use crate::model::{AdminUserRecord, Role, UserRecord};
use std::sync::Arc;

/// Checks that `actor` may modify `target`.
///
/// A protected target is refused whatever the actor's role. Otherwise the
/// actor must be an admin.
pub fn ensure_manageable(actor: &UserRecord, target: &AdminUserRecord) -> ClientResult<()> {
    if target.is_protected {
        return Err(ClientError::ProtectedUser {
            user_id: target.id.clone(),
        });
    }
    if !actor.is_admin() {
        return Err(ClientError::AdminRequired);
    }
    Ok(())
}

pub fn can_manage(actor: &UserRecord, target: &AdminUserRecord) -> bool {
    ensure_manageable(actor, target).is_ok()
}

pub struct UserAdminService {
    session: Arc<SessionManager>,
    api: Arc<dyn ConsoleApi>,
}

impl UserAdminService {
    pub fn new(session: Arc<SessionManager>, api: Arc<dyn ConsoleApi>) -> Self {
        Self { session, api }
    }

    async fn actor(&self) -> ClientResult<UserRecord> {
        self.session
            .current_user()
            .await
            .ok_or(ClientError::NotAuthenticated)
    }

    async fn admin(&self) -> ClientResult<UserRecord> {
        let actor = self.actor().await?;
        if !actor.is_admin() {
            return Err(ClientError::AdminRequired);
        }
        Ok(actor)
    }

    /// All accounts. Only admins may list them.
    pub async fn list(&self) -> ClientResult<Vec<AdminUserRecord>> {
        self.admin().await?;
        let api = self.api.clone();
        self.session
            .authorized(|token| async move { api.list_users(&token).await })
            .await
    }

    pub async fn find(&self, user_id: &str) -> ClientResult<AdminUserRecord> {
        self.list()
            .await?
            .into_iter()
            .find(|user| user.id == user_id)
            .ok_or_else(|| ClientError::NotFound {
                kind: "User",
                id: user_id.to_string(),
            })
    }

    pub async fn update_role(&self, target: &AdminUserRecord, role: Role) -> ClientResult<()> {
        ensure_manageable(&self.actor().await?, target)?;
        let api = self.api.clone();
        let user_id = target.id.as_str();
        self.session
            .authorized(|token| async move { api.update_user_role(&token, user_id, role).await })
            .await?;
        log::info!("Changed role of {} to {}", target.email, role);
        Ok(())
    }

    pub async fn delete(&self, target: &AdminUserRecord) -> ClientResult<()> {
        ensure_manageable(&self.actor().await?, target)?;
        let api = self.api.clone();
        let user_id = target.id.as_str();
        self.session
            .authorized(|token| async move { api.delete_user(&token, user_id).await })
            .await?;
        log::info!("Deleted user {}", target.email);
        Ok(())
    }

    pub async fn reset_password(
        &self,
        target: &AdminUserRecord,
        new_password: &str,
    ) -> ClientResult<()> {
        ensure_manageable(&self.actor().await?, target)?;
        let api = self.api.clone();
        let user_id = target.id.as_str();
        self.session
            .authorized(|token| async move {
                api.reset_user_password(&token, user_id, new_password).await
            })
            .await?;
        log::info!("Reset password of {}", target.email);
        Ok(())
    }

    /// Looks the target up by id, then applies [`update_role`](Self::update_role).
    pub async fn update_role_by_id(&self, user_id: &str, role: Role) -> ClientResult<AdminUserRecord> {
        let target = self.find(user_id).await?;
        self.update_role(&target, role).await?;
        Ok(target)
    }

    pub async fn delete_by_id(&self, user_id: &str) -> ClientResult<AdminUserRecord> {
        let target = self.find(user_id).await?;
        self.delete(&target).await?;
        Ok(target)
    }

    pub async fn reset_password_by_id(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> ClientResult<AdminUserRecord> {
        let target = self.find(user_id).await?;
        self.reset_password(&target, new_password).await?;
        Ok(target)
    }
}
