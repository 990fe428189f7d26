#![allow(dead_code)]

use async_trait::async_trait;
use client::ApiError;
use client::api::{ConsoleApi, IssuedToken};
use client::auth::{MemorySessionStore, SessionStore};
use client::model::{
    AdminUserRecord, ProfileUpdate, ResourceDraft, ResourceRecord, ResourceTemplate, Role,
    UserRecord,
};
use client::theme::{DerivedStyles, ThemeConfig};
use client::Console;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const PASSWORD: &str = "correct-horse";

struct Account {
    password: String,
    token: String,
    user: UserRecord,
}

/// Scripted in-memory backend.
///
/// Accounts are registered up front. Every token issued for an account stays
/// valid until [`revoke`](Self::revoke) is called. Counters record how many
/// requests reached each endpoint.
#[derive(Default)]
pub struct MockConsoleApi {
    accounts: Mutex<Vec<Account>>,
    revoked: Mutex<Vec<String>>,
    themes: Mutex<HashMap<String, ThemeConfig>>,
    saved_themes: Mutex<Vec<ThemeConfig>>,
    resources: Mutex<Vec<ResourceRecord>>,
    templates: Mutex<Vec<ResourceTemplate>>,
    imported: Mutex<Vec<Vec<i64>>>,
    admin_users: Mutex<Vec<AdminUserRecord>>,
    next_resource_id: AtomicI64,
    theme_gate: Mutex<Option<Arc<Notify>>>,
    pub theme_fetch_started: Notify,
    logout_gate: Mutex<Option<Arc<Notify>>>,
    pub logout_started: Notify,

    pub fail_profile: AtomicBool,
    pub fail_logout: AtomicBool,
    pub fail_theme_fetch: AtomicBool,
    pub fail_theme_save: AtomicBool,

    pub login_calls: AtomicU32,
    pub logout_calls: AtomicU32,
    pub profile_calls: AtomicU32,
    pub profile_updates: AtomicU32,
    pub theme_fetches: AtomicU32,
    pub theme_saves: AtomicU32,
    pub role_updates: AtomicU32,
    pub user_deletes: AtomicU32,
    pub password_resets: AtomicU32,
}

pub fn user(id: &str, email: &str, role: Option<Role>) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        email: email.to_string(),
        display_name: None,
        role,
        bio: None,
        tagline: None,
        avatar_url: None,
    }
}

pub fn admin_record(id: &str, role: Role, is_protected: bool) -> AdminUserRecord {
    AdminUserRecord {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        display_name: None,
        role,
        is_protected,
        created_at: "2024-05-01T10:00:00".to_string(),
    }
}

pub fn theme(value: serde_json::Value) -> ThemeConfig {
    serde_json::from_value(value).expect("theme fixture must be a JSON object")
}

fn unauthorized(path: &str) -> ApiError {
    ApiError::Unauthorized {
        url: path.to_string(),
        detail: Some("Could not validate credentials".to_string()),
    }
}

fn transport(path: &str) -> ApiError {
    ApiError::Transport {
        url: path.to_string(),
        reason: "connection refused".to_string(),
    }
}

impl MockConsoleApi {
    pub fn new() -> Self {
        Self {
            next_resource_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    pub fn with_account(self, user: UserRecord) -> Self {
        let token = format!("token-{}", user.id);
        self.accounts.lock().unwrap().push(Account {
            password: PASSWORD.to_string(),
            token,
            user,
        });
        self
    }

    pub fn with_theme(self, user_id: &str, config: ThemeConfig) -> Self {
        self.themes
            .lock()
            .unwrap()
            .insert(user_id.to_string(), config);
        self
    }

    pub fn with_admin_users(self, users: Vec<AdminUserRecord>) -> Self {
        *self.admin_users.lock().unwrap() = users;
        self
    }

    pub fn with_templates(self, templates: Vec<ResourceTemplate>) -> Self {
        *self.templates.lock().unwrap() = templates;
        self
    }

    pub fn token_for(&self, user_id: &str) -> String {
        format!("token-{user_id}")
    }

    pub fn revoke(&self, token: &str) {
        self.revoked.lock().unwrap().push(token.to_string());
    }

    /// Holds every theme fetch until the returned gate is notified.
    pub fn gate_theme_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.theme_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Holds every server logout until the returned gate is notified.
    pub fn gate_logouts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.logout_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn saved_themes(&self) -> Vec<ThemeConfig> {
        self.saved_themes.lock().unwrap().clone()
    }

    pub fn stored_theme(&self, user_id: &str) -> Option<ThemeConfig> {
        self.themes.lock().unwrap().get(user_id).cloned()
    }

    pub fn imported(&self) -> Vec<Vec<i64>> {
        self.imported.lock().unwrap().clone()
    }

    pub fn admin_user(&self, id: &str) -> Option<AdminUserRecord> {
        self.admin_users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    pub fn count(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }

    fn user_for(&self, token: &str, path: &str) -> Result<UserRecord, ApiError> {
        if self.revoked.lock().unwrap().iter().any(|t| t == token) {
            return Err(unauthorized(path));
        }
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|account| account.token == token)
            .map(|account| account.user.clone())
            .ok_or_else(|| unauthorized(path))
    }
}

#[async_trait]
impl ConsoleApi for MockConsoleApi {
    async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, ApiError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter()
            .find(|account| account.user.email == email)
            .ok_or_else(|| ApiError::NotFound {
                url: "/api/auth/login".to_string(),
                detail: Some("User not found".to_string()),
            })?;
        if account.password != password {
            return Err(unauthorized("/api/auth/login"));
        }
        Ok(IssuedToken {
            access_token: account.token.clone(),
            token_type: Some("bearer".to_string()),
            user: Some(account.user.clone()),
        })
    }

    async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IssuedToken, ApiError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|account| account.user.email == email) {
            return Err(ApiError::Status {
                url: "/api/auth/signup".to_string(),
                status: 400,
                detail: Some("Email already registered".to_string()),
            });
        }
        let id = format!("u{}", accounts.len() + 1);
        let mut new_user = user(&id, email, Some(Role::User));
        new_user.display_name = display_name.map(str::to_string);
        let token = format!("token-{id}");
        accounts.push(Account {
            password: password.to_string(),
            token: token.clone(),
            user: new_user.clone(),
        });
        Ok(IssuedToken {
            access_token: token,
            token_type: None,
            user: Some(new_user),
        })
    }

    async fn logout(&self, _token: &str) -> Result<(), ApiError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.logout_gate.lock().unwrap().clone();
        self.logout_started.notify_one();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(transport("/api/auth/logout"));
        }
        Ok(())
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserRecord, ApiError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile.load(Ordering::SeqCst) {
            return Err(transport("/api/users/me"));
        }
        self.user_for(token, "/api/users/me")
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserRecord, ApiError> {
        self.profile_updates.fetch_add(1, Ordering::SeqCst);
        let current = self.user_for(token, "/api/users/me")?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|account| account.user.id == current.id)
            .ok_or_else(|| unauthorized("/api/users/me"))?;
        if let Some(name) = &update.display_name {
            account.user.display_name = Some(name.clone());
        }
        if let Some(bio) = &update.bio {
            account.user.bio = Some(bio.clone());
        }
        if let Some(tagline) = &update.tagline {
            account.user.tagline = Some(tagline.clone());
        }
        if let Some(avatar) = &update.avatar_url {
            account.user.avatar_url = Some(avatar.clone());
        }
        Ok(account.user.clone())
    }

    async fn fetch_theme(&self, token: &str) -> Result<Option<ThemeConfig>, ApiError> {
        self.theme_fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.theme_gate.lock().unwrap().clone();
        self.theme_fetch_started.notify_one();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let user = self.user_for(token, "/api/theme/")?;
        if self.fail_theme_fetch.load(Ordering::SeqCst) {
            return Err(transport("/api/theme/"));
        }
        Ok(self
            .themes
            .lock()
            .unwrap()
            .get(&user.id)
            .filter(|config| !config.is_empty())
            .cloned())
    }

    async fn save_theme(&self, token: &str, config: &ThemeConfig) -> Result<(), ApiError> {
        self.theme_saves.fetch_add(1, Ordering::SeqCst);
        let user = self.user_for(token, "/api/theme/")?;
        if self.fail_theme_save.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                url: "/api/theme/".to_string(),
                status: 500,
                detail: None,
            });
        }
        self.saved_themes.lock().unwrap().push(config.clone());
        self.themes.lock().unwrap().insert(user.id, config.clone());
        Ok(())
    }

    async fn list_resources(&self, token: &str) -> Result<Vec<ResourceRecord>, ApiError> {
        self.user_for(token, "/api/resources/")?;
        Ok(self.resources.lock().unwrap().clone())
    }

    async fn create_resource(
        &self,
        token: &str,
        draft: &ResourceDraft,
    ) -> Result<ResourceRecord, ApiError> {
        self.user_for(token, "/api/resources/")?;
        let record = ResourceRecord {
            id: self.next_resource_id.fetch_add(1, Ordering::SeqCst),
            icon: draft.icon.clone(),
            title: draft.title.clone(),
            resource_name: draft.resource_name.clone(),
            description: draft.description.clone(),
            status: draft.status.clone(),
            region: draft.region.clone(),
            created_at: draft.created_at.clone(),
        };
        self.resources.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_resource(
        &self,
        token: &str,
        id: i64,
        draft: &ResourceDraft,
    ) -> Result<ResourceRecord, ApiError> {
        let path = format!("/api/resources/{id}");
        self.user_for(token, &path)?;
        let mut resources = self.resources.lock().unwrap();
        let record = resources
            .iter_mut()
            .find(|resource| resource.id == id)
            .ok_or_else(|| ApiError::NotFound {
                url: path.clone(),
                detail: Some("Resource not found".to_string()),
            })?;
        record.icon = draft.icon.clone();
        record.title = draft.title.clone();
        record.resource_name = draft.resource_name.clone();
        record.description = draft.description.clone();
        record.status = draft.status.clone();
        record.region = draft.region.clone();
        record.created_at = draft.created_at.clone();
        Ok(record.clone())
    }

    async fn delete_resource(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/resources/{id}");
        self.user_for(token, &path)?;
        let mut resources = self.resources.lock().unwrap();
        let before = resources.len();
        resources.retain(|resource| resource.id != id);
        if resources.len() == before {
            return Err(ApiError::NotFound {
                url: path,
                detail: Some("Resource not found".to_string()),
            });
        }
        Ok(())
    }

    async fn list_templates(&self, token: &str) -> Result<Vec<ResourceTemplate>, ApiError> {
        self.user_for(token, "/api/resources/templates")?;
        Ok(self.templates.lock().unwrap().clone())
    }

    async fn import_templates(&self, token: &str, template_ids: &[i64]) -> Result<(), ApiError> {
        self.user_for(token, "/api/resources/import-templates")?;
        self.imported.lock().unwrap().push(template_ids.to_vec());
        let templates = self.templates.lock().unwrap().clone();
        let mut resources = self.resources.lock().unwrap();
        for template in templates.iter().filter(|t| template_ids.contains(&t.id)) {
            resources.push(ResourceRecord {
                id: self.next_resource_id.fetch_add(1, Ordering::SeqCst),
                icon: template.icon.clone(),
                title: template.title.clone(),
                resource_name: template.resource_name.clone(),
                description: template.description.clone(),
                status: template.status.clone(),
                region: template.region.clone(),
                created_at: "2024-05-01T10:00".to_string(),
            });
        }
        Ok(())
    }

    async fn seed_templates(&self, token: &str) -> Result<(), ApiError> {
        self.user_for(token, "/api/resources/seed/templates")?;
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<AdminUserRecord>, ApiError> {
        self.user_for(token, "/api/admin/users")?;
        Ok(self.admin_users.lock().unwrap().clone())
    }

    async fn update_user_role(
        &self,
        token: &str,
        user_id: &str,
        role: Role,
    ) -> Result<(), ApiError> {
        self.role_updates.fetch_add(1, Ordering::SeqCst);
        self.user_for(token, "/api/admin/users")?;
        if let Some(user) = self
            .admin_users
            .lock()
            .unwrap()
            .iter_mut()
            .find(|user| user.id == user_id)
        {
            user.role = role;
        }
        Ok(())
    }

    async fn delete_user(&self, token: &str, user_id: &str) -> Result<(), ApiError> {
        self.user_deletes.fetch_add(1, Ordering::SeqCst);
        self.user_for(token, "/api/admin/users")?;
        self.admin_users
            .lock()
            .unwrap()
            .retain(|user| user.id != user_id);
        Ok(())
    }

    async fn reset_user_password(
        &self,
        token: &str,
        _user_id: &str,
        _new_password: &str,
    ) -> Result<(), ApiError> {
        self.password_resets.fetch_add(1, Ordering::SeqCst);
        self.user_for(token, "/api/users/reset-password")?;
        Ok(())
    }
}

/// Console wired to `api` with an in-memory store and style sink.
pub struct Harness {
    pub api: Arc<MockConsoleApi>,
    pub store: Arc<MemorySessionStore>,
    pub styles: Arc<DerivedStyles>,
    pub console: Console,
}

impl Harness {
    pub fn new(api: MockConsoleApi) -> Self {
        Self::with_store(api, MemorySessionStore::new())
    }

    pub fn with_store(api: MockConsoleApi, store: MemorySessionStore) -> Self {
        let api = Arc::new(api);
        let store = Arc::new(store);
        let styles = Arc::new(DerivedStyles::new());
        let console = Console::new(api.clone(), store.clone(), styles.clone());
        Self {
            api,
            store,
            styles,
            console,
        }
    }

    pub fn stored_token(&self) -> Option<String> {
        self.store.load_token().unwrap()
    }

    pub fn stored_user(&self) -> Option<UserRecord> {
        self.store.load_user().unwrap()
    }
}
