//! Wire shapes of the dashboard backend and their normalization into domain records.
//!
//! The backend answers in snake_case but some deployments emit camelCase
//! aliases and numeric ids. Everything is folded into the records in
//! [`crate::model`] here so no other module sees the wire format.

use crate::model::{AdminUserRecord, ResourceRecord, ResourceTemplate, Role, UserRecord};
use crate::theme::config::ThemeConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier that may arrive as a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: WireId,
    pub email: String,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default, alias = "avatarUrl")]
    pub avatar_url: Option<String>,
}

impl From<UserDto> for UserRecord {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id.into(),
            email: dto.email,
            display_name: dto.display_name,
            // Unrecognised roles carry no privileges.
            role: dto.role.and_then(|role| role.parse().ok()),
            bio: dto.bio,
            tagline: dto.tagline,
            avatar_url: dto.avatar_url,
        }
    }
}

/// Response of the login and signup endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(email: &'a str, password: &'a str) -> Self {
        Self {
            email,
            username: email,
            password,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<&'a str>,
}

impl<'a> SignupRequest<'a> {
    pub fn new(email: &'a str, password: &'a str, display_name: Option<&'a str>) -> Self {
        Self {
            email,
            username: email,
            password,
            display_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminUserDto {
    pub id: WireId,
    pub email: String,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_protected: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<AdminUserDto> for AdminUserRecord {
    fn from(dto: AdminUserDto) -> Self {
        Self {
            id: dto.id.into(),
            email: dto.email,
            display_name: dto.display_name,
            role: dto
                .role
                .and_then(|role| role.parse().ok())
                .unwrap_or(Role::User),
            is_protected: dto.is_protected,
            created_at: dto.created_at.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDto {
    pub id: i64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<ResourceDto> for ResourceRecord {
    fn from(dto: ResourceDto) -> Self {
        Self {
            id: dto.id,
            icon: dto.icon.unwrap_or_else(|| "server".to_string()),
            title: dto.title.unwrap_or_default(),
            resource_name: dto.resource_name.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            status: dto.status.unwrap_or_default(),
            region: dto.region.unwrap_or_default(),
            created_at: dto.created_at.unwrap_or_default(),
        }
    }
}

impl From<ResourceDto> for ResourceTemplate {
    fn from(dto: ResourceDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title.unwrap_or_default(),
            resource_name: dto.resource_name.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            icon: dto.icon.unwrap_or_else(|| "server".to_string()),
            status: dto.status.unwrap_or_default(),
            region: dto.region.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub new_password: &'a str,
}

/// Decodes a list body. Anything other than a JSON array is an empty list,
/// and elements that do not match the expected shape are skipped.
pub fn list_from_value<D, T>(value: Value) -> Vec<T>
where
    D: for<'de> Deserialize<'de>,
    T: From<D>,
{
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<D>(item) {
                Ok(dto) => Some(T::from(dto)),
                Err(e) => {
                    log::warn!("Skipping malformed list entry: {e}");
                    None
                }
            })
            .collect(),
        other => {
            log::debug!("Expected a JSON array, got {}", json_kind(&other));
            Vec::new()
        }
    }
}

/// Decodes the theme body. `null`, `{}` and non-object bodies mean no saved theme.
pub fn theme_from_value(value: Value) -> Option<ThemeConfig> {
    match value {
        Value::Object(map) if !map.is_empty() => Some(ThemeConfig::from_map(map)),
        _ => None,
    }
}

/// Pulls a string `detail` out of an error body, if the body is JSON and has one.
pub fn detail_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_normalization_accepts_aliases_and_numeric_ids() {
        let dto: UserDto = serde_json::from_value(json!({
            "id": 42,
            "email": "grace@example.com",
            "displayName": "Grace",
            "avatarUrl": "https://cdn.example.com/g.png",
            "role": "ADMIN"
        }))
        .unwrap();
        let user = UserRecord::from(dto);
        assert_eq!(user.id, "42");
        assert_eq!(user.display_name.as_deref(), Some("Grace"));
        assert_eq!(user.avatar_url.as_deref(), Some("https://cdn.example.com/g.png"));
        assert!(user.is_admin());
    }

    #[test]
    fn test_unknown_role_is_dropped() {
        let dto: UserDto = serde_json::from_value(json!({
            "id": "u-1",
            "email": "x@example.com",
            "role": "superuser"
        }))
        .unwrap();
        assert_eq!(UserRecord::from(dto).role, None);
    }

    #[test]
    fn test_login_request_duplicates_email_as_username() {
        let body = serde_json::to_value(LoginRequest::new("a@b.io", "pw")).unwrap();
        assert_eq!(
            body,
            json!({ "email": "a@b.io", "username": "a@b.io", "password": "pw" })
        );

        let signup = serde_json::to_value(SignupRequest::new("a@b.io", "pw", None)).unwrap();
        assert!(signup.get("display_name").is_none());
    }

    #[test]
    fn test_non_array_list_is_empty() {
        let resources: Vec<ResourceRecord> =
            list_from_value::<ResourceDto, _>(json!({ "detail": "oops" }));
        assert!(resources.is_empty());

        let resources: Vec<ResourceRecord> = list_from_value::<ResourceDto, _>(json!([
            { "id": 1, "title": "VM", "status": "Running" },
            { "title": "missing id" }
        ]));
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].icon, "server");
    }

    #[test]
    fn test_empty_theme_bodies_are_absent() {
        assert!(theme_from_value(Value::Null).is_none());
        assert!(theme_from_value(json!({})).is_none());
        assert!(theme_from_value(json!([1, 2])).is_none());
        assert!(theme_from_value(json!({ "mode": "dark" })).is_some());
    }

    #[test]
    fn test_detail_extraction() {
        assert_eq!(
            detail_from_body(r#"{"detail":"Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
        assert_eq!(detail_from_body(r#"{"detail":[{"loc":["body"]}]}"#), None);
        assert_eq!(detail_from_body("Internal Server Error"), None);
    }
}
