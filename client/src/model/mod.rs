use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format used for resource creation timestamps entered or defaulted client-side.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Role of a dashboard account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{other}', expected 'admin' or 'user'")),
        }
    }
}

/// Profile of the signed-in account.
///
/// This is the shape cached in memory and persisted under the `user` key of
/// the session store. Wire variations are normalized in [`crate::api::types`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Display name when set, otherwise the email address.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Account as listed by the admin user-management endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserRecord {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    /// Protected accounts are never modified or deleted by this client.
    pub is_protected: bool,
    pub created_at: String,
}

impl AdminUserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A cloud resource shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: i64,
    pub icon: String,
    pub title: String,
    pub resource_name: String,
    pub description: String,
    pub status: String,
    pub region: String,
    pub created_at: String,
}

/// Predefined resource that an admin can import into the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTemplate {
    pub id: i64,
    pub title: String,
    pub resource_name: String,
    pub description: String,
    pub icon: String,
    pub status: String,
    pub region: String,
}

/// Body sent when creating or updating a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDraft {
    pub icon: String,
    pub title: String,
    pub resource_name: String,
    pub description: String,
    pub status: String,
    pub region: String,
    pub created_at: String,
}

impl Default for ResourceDraft {
    fn default() -> Self {
        Self {
            icon: "server".to_string(),
            title: String::new(),
            resource_name: String::new(),
            description: String::new(),
            status: "Running".to_string(),
            region: "East US".to_string(),
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

impl From<&ResourceRecord> for ResourceDraft {
    /// Starts an edit from an existing record. The timestamp is cut to minute precision.
    fn from(record: &ResourceRecord) -> Self {
        Self {
            icon: record.icon.clone(),
            title: record.title.clone(),
            resource_name: record.resource_name.clone(),
            description: record.description.clone(),
            status: record.status.clone(),
            region: record.region.clone(),
            created_at: record.created_at.chars().take(16).collect(),
        }
    }
}

/// Partial profile update. Absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
            && self.tagline.is_none()
    }
}
