//! Backend auth client
//!
//! Thin HTTP client for the TeamNest backend's `/auth` endpoints. The
//! session lives in cookies set by the backend, so one [`AuthClient`]
//! instance is one session.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::ApiErrorDetails;
use crate::config::AuthConfig;
use crate::error::{Error, Result};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    pub organization_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Organization sign-up: a tenant plus its owner account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub tenant_info: TenantInfo,
    pub owner_info: OwnerInfo,
}

/// Tokens issued on login; the backend also sets them as cookies
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub tenant_id: u64,
    pub organization_name: String,
    pub owner_id: u64,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email: String,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub tenant_id: Uuid,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Backend success envelope
#[derive(Debug, Deserialize)]
struct SuccessBody<T> {
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Cookie-session client for the auth endpoints
#[derive(Debug, Clone)]
pub struct AuthClient {
    http_client: HttpClient,
    base_url: String,
}

impl AuthClient {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http_client = HttpClient::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign in; the session cookies are kept for later calls
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http_client
            .post(self.url("/auth/login"))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let body: SuccessBody<AuthTokens> = parse(response).await?;
        info!(email, message = %body.message, "Logged in");
        required(body.data, "login")
    }

    /// Register a new organization and its owner
    pub async fn register(&self, request: &RegisterRequest) -> Result<Registration> {
        let response = self
            .http_client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        let body: SuccessBody<Registration> = parse(response).await?;
        info!(
            organization = %request.tenant_info.organization_name,
            "Registered organization"
        );
        required(body.data, "register")
    }

    /// Current user of the session
    pub async fn me(&self) -> Result<UserInfo> {
        let response = self
            .http_client
            .get(self.url("/auth/me"))
            .send()
            .await
            .map_err(network_error)?;

        let body: SuccessBody<UserInfo> = parse(response).await?;
        required(body.data, "me")
    }

    /// End the session; the backend clears the cookies
    pub async fn logout(&self) -> Result<()> {
        let response = self
            .http_client
            .post(self.url("/auth/logout"))
            .send()
            .await
            .map_err(network_error)?;

        let body: SuccessBody<Value> = parse(response).await?;
        info!(message = %body.message, "Logged out");
        Ok(())
    }
}

fn network_error(error: reqwest::Error) -> Error {
    warn!(error = %error, "Backend unreachable");
    Error::NetworkError {
        message: ApiErrorDetails::network().message,
        source: error,
    }
}

fn required<T>(data: Option<T>, endpoint: &str) -> Result<T> {
    data.ok_or_else(|| Error::Other(format!("{} response carried no data", endpoint)))
}

/// Decode a success body, or normalize a failure into [`Error::ApiError`]
async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<SuccessBody<T>> {
    let status = response.status();
    let text = response.text().await.map_err(network_error)?;

    if status.is_success() {
        return Ok(serde_json::from_str(&text)?);
    }

    let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
    let details = ApiErrorDetails::from_response(status.as_u16(), &body, None);
    debug!(
        status = status.as_u16(),
        api_path = %details.api_path,
        fields = details.validation_map.len(),
        "Backend returned an error"
    );
    Err(details.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::NETWORK_ERROR_MESSAGE;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_info() -> Value {
        json!({
            "message": "User info retrieved",
            "timestamp": "2026-02-13T10:30:00Z",
            "data": {
                "id": 1,
                "name": "Harshal Ganbote",
                "email": "harshal@teamnest.app",
                "tenantId": "550e8400-e29b-41d4-a716-446655440000",
                "roles": ["OWNER"]
            }
        })
    }

    #[tokio::test]
    async fn test_login_keeps_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "access_token=abc; Path=/")
                    .set_body_json(json!({
                        "message": "Login successful",
                        "data": {
                            "accessToken": "abc",
                            "refreshToken": "def",
                            "tokenType": "Bearer",
                            "expiresIn": 900,
                            "refreshExpiresIn": 604800
                        }
                    })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("cookie", "access_token=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_info()))
            .mount(&server)
            .await;

        let client = AuthClient::with_base_url(format!("{}/api/", server.uri())).unwrap();
        let tokens = client.login("harshal@teamnest.app", "secret").await.unwrap();
        assert_eq!(tokens.token_type, "Bearer");

        let me = client.me().await.unwrap();
        assert_eq!(me.name, "Harshal Ganbote");
        assert_eq!(me.roles, vec!["OWNER".to_string()]);
    }

    #[tokio::test]
    async fn test_validation_failure_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "apiPath": "uri=/api/auth/register",
                "message": "Validation failed",
                "validationErrors": {"tenantInfo.organizationName": "Organization name is required"}
            })))
            .mount(&server)
            .await;

        let client = AuthClient::with_base_url(format!("{}/api", server.uri())).unwrap();
        let request = RegisterRequest {
            tenant_info: TenantInfo {
                organization_name: String::new(),
            },
            owner_info: OwnerInfo {
                first_name: "Sarah".into(),
                last_name: "Chen".into(),
                email: "sarah@teamnest.app".into(),
                password: "secret".into(),
            },
        };

        let err = client.register(&request).await.unwrap_err();
        match err {
            Error::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Validation failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_uses_status_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = AuthClient::with_base_url(format!("{}/api", server.uri())).unwrap();
        let err = client.me().await.unwrap_err();
        assert!(err.to_string().contains("Unauthorized - Please log in again."));
    }

    #[tokio::test]
    async fn test_logout_accepts_null_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "Logout successful", "data": null})),
            )
            .mount(&server)
            .await;

        let client = AuthClient::with_base_url(format!("{}/api", server.uri())).unwrap();
        client.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_backend_reports_network_message() {
        // Nothing listens on port 1
        let client = AuthClient::with_base_url("http://127.0.0.1:1/api").unwrap();
        let err = client.me().await.unwrap_err();

        assert_eq!(err.code(), "E200");
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert!(std::error::Error::source(&err).is_some());
    }
}
