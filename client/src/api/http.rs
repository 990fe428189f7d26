use super::types::{
    self, AdminUserDto, AuthResponse, LoginRequest, ResetPasswordRequest, ResourceDto,
    RoleRequest, SignupRequest, UserDto,
};
use super::{ConsoleApi, IssuedToken};
use crate::common::errors::ApiError;
use crate::model::{
    AdminUserRecord, ProfileUpdate, ResourceDraft, ResourceRecord, ResourceTemplate, Role,
    UserRecord,
};
use crate::theme::config::ThemeConfig;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// reqwest-backed [`ConsoleApi`] talking to a single backend base URL.
#[derive(Debug, Clone)]
pub struct HttpConsoleApi {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpConsoleApi {
    /// Creates a client for `base_url` with the given per-request timeout.
    ///
    /// A trailing slash on `base_url` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientCreation`] if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> (RequestBuilder, String) {
        let url = self.url(path);
        let mut builder = self.client.request(method, &url);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        (builder, url)
    }

    /// Sends the request and maps transport failures and non-success statuses.
    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    url: url.to_string(),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                ApiError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        let detail = types::detail_from_body(&error_text);
        log::debug!("{} returned {}: {}", url, status, error_text);

        Err(match status.as_u16() {
            401 => ApiError::Unauthorized {
                url: url.to_string(),
                detail,
            },
            404 => ApiError::NotFound {
                url: url.to_string(),
                detail,
            },
            code => ApiError::Status {
                url: url.to_string(),
                status: code,
                detail,
            },
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
        let body = response.text().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Like [`decode`](Self::decode) but an empty body reads as JSON `null`.
    async fn decode_value(response: Response, url: &str) -> Result<Value, ApiError> {
        let body = response.text().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Response, ApiError> {
        let (builder, url) = self.request(method, path, token);
        self.execute(builder.json(body), &url).await
    }

    async fn send_empty(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let (builder, url) = self.request(method, path, token);
        self.execute(builder, &url).await
    }
}

fn user_path(user_id: &str) -> String {
    urlencoding::encode(user_id).into_owned()
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, ApiError> {
        let path = "/api/auth/login";
        let response = self
            .send_json(Method::POST, path, None, &LoginRequest::new(email, password))
            .await?;
        let body: AuthResponse = Self::decode(response, &self.url(path)).await?;
        Ok(body.into())
    }

    async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<IssuedToken, ApiError> {
        let path = "/api/auth/signup";
        let request = SignupRequest::new(email, password, display_name);
        let response = self.send_json(Method::POST, path, None, &request).await?;
        let body: AuthResponse = Self::decode(response, &self.url(path)).await?;
        Ok(body.into())
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.send_empty(Method::POST, "/api/auth/logout", Some(token))
            .await?;
        Ok(())
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserRecord, ApiError> {
        let path = "/api/users/me";
        let response = self.send_empty(Method::GET, path, Some(token)).await?;
        let dto: UserDto = Self::decode(response, &self.url(path)).await?;
        Ok(dto.into())
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserRecord, ApiError> {
        let path = "/api/users/me";
        let response = self
            .send_json(Method::PATCH, path, Some(token), update)
            .await?;
        let dto: UserDto = Self::decode(response, &self.url(path)).await?;
        Ok(dto.into())
    }

    async fn fetch_theme(&self, token: &str) -> Result<Option<ThemeConfig>, ApiError> {
        let path = "/api/theme/";
        let response = self.send_empty(Method::GET, path, Some(token)).await?;
        let value = Self::decode_value(response, &self.url(path)).await?;
        Ok(types::theme_from_value(value))
    }

    async fn save_theme(&self, token: &str, config: &ThemeConfig) -> Result<(), ApiError> {
        self.send_json(Method::PUT, "/api/theme/", Some(token), config)
            .await?;
        Ok(())
    }

    async fn list_resources(&self, token: &str) -> Result<Vec<ResourceRecord>, ApiError> {
        let path = "/api/resources/";
        let response = self.send_empty(Method::GET, path, Some(token)).await?;
        let value = Self::decode_value(response, &self.url(path)).await?;
        Ok(types::list_from_value::<ResourceDto, _>(value))
    }

    async fn create_resource(
        &self,
        token: &str,
        draft: &ResourceDraft,
    ) -> Result<ResourceRecord, ApiError> {
        let path = "/api/resources/";
        let response = self
            .send_json(Method::POST, path, Some(token), draft)
            .await?;
        let dto: ResourceDto = Self::decode(response, &self.url(path)).await?;
        Ok(dto.into())
    }

    async fn update_resource(
        &self,
        token: &str,
        id: i64,
        draft: &ResourceDraft,
    ) -> Result<ResourceRecord, ApiError> {
        let path = format!("/api/resources/{}", id);
        let response = self
            .send_json(Method::PUT, &path, Some(token), draft)
            .await?;
        let dto: ResourceDto = Self::decode(response, &self.url(&path)).await?;
        Ok(dto.into())
    }

    async fn delete_resource(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/resources/{}", id);
        self.send_empty(Method::DELETE, &path, Some(token)).await?;
        Ok(())
    }

    async fn list_templates(&self, token: &str) -> Result<Vec<ResourceTemplate>, ApiError> {
        let path = "/api/resources/templates";
        let response = self.send_empty(Method::GET, path, Some(token)).await?;
        let value = Self::decode_value(response, &self.url(path)).await?;
        Ok(types::list_from_value::<ResourceDto, _>(value))
    }

    async fn import_templates(&self, token: &str, template_ids: &[i64]) -> Result<(), ApiError> {
        self.send_json(
            Method::POST,
            "/api/resources/import-templates",
            Some(token),
            template_ids,
        )
        .await?;
        Ok(())
    }

    async fn seed_templates(&self, token: &str) -> Result<(), ApiError> {
        self.send_empty(Method::POST, "/api/resources/seed/templates", Some(token))
            .await?;
        Ok(())
    }

    async fn list_users(&self, token: &str) -> Result<Vec<AdminUserRecord>, ApiError> {
        let path = "/api/admin/users";
        let response = self.send_empty(Method::GET, path, Some(token)).await?;
        let value = Self::decode_value(response, &self.url(path)).await?;
        Ok(types::list_from_value::<AdminUserDto, _>(value))
    }

    async fn update_user_role(
        &self,
        token: &str,
        user_id: &str,
        role: Role,
    ) -> Result<(), ApiError> {
        let path = format!("/api/admin/users/{}/role", user_path(user_id));
        self.send_json(Method::PATCH, &path, Some(token), &RoleRequest { role })
            .await?;
        Ok(())
    }

    async fn delete_user(&self, token: &str, user_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/admin/users/{}", user_path(user_id));
        self.send_empty(Method::DELETE, &path, Some(token)).await?;
        Ok(())
    }

    async fn reset_user_password(
        &self,
        token: &str,
        user_id: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/api/users/{}/reset-password", user_path(user_id));
        self.send_json(
            Method::POST,
            &path,
            Some(token),
            &ResetPasswordRequest { new_password },
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpConsoleApi::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/api/theme/"), "http://localhost:8000/api/theme/");
    }

    #[test]
    fn test_user_ids_are_path_encoded() {
        assert_eq!(user_path("abc-123"), "abc-123");
        assert_eq!(user_path("a/b c"), "a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on loopback is not expected to accept HTTP.
        let api = HttpConsoleApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let error = api.fetch_profile("token").await.unwrap_err();
        assert!(matches!(
            error,
            ApiError::Transport { .. } | ApiError::Timeout { .. }
        ));
        assert_eq!(error.status(), None);
    }
}
