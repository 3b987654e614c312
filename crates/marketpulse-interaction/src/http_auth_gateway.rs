//! HttpAuthGateway - REST client for the authentication service.
//!
//! Talks to `POST /auth/login` and `POST /auth/signup` with JSON bodies and
//! maps every outcome onto [`GatewayError`]: non-success statuses become
//! `Rejected` (with the server's `detail` string when there is one),
//! connection problems become `Transport`, and unparseable success bodies
//! become `MalformedResponse`.

use async_trait::async_trait;
use marketpulse_core::auth::{
    AuthGateway, AuthResponse, ErrorBody, GatewayError, LoginRequest, SignupRequest,
};
use marketpulse_core::config::ClientConfig;
use reqwest::Client;
use serde::Serialize;

const LOGIN_PATH: &str = "/auth/login";
const SIGNUP_PATH: &str = "/auth/signup";

/// Gateway implementation backed by `reqwest`.
#[derive(Clone)]
pub struct HttpAuthGateway {
    client: Client,
    base_url: String,
}

impl HttpAuthGateway {
    /// Creates a gateway using the HTTP client's default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Builds a gateway from configuration, applying the optional timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config.normalized_base_url()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<AuthResponse, GatewayError>
    where
        B: Serialize + Sync,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "Sending auth request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Auth request rejected");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                detail: extract_detail(&text),
            });
        }

        parse_success_body(&text)
    }
}

/// Pulls a string `detail` out of an error body.
///
/// Validation failures from the service carry a list under `detail`; only a
/// plain string is considered displayable.
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body).ok()?.detail
}

fn parse_success_body(body: &str) -> Result<AuthResponse, GatewayError> {
    if body.trim().is_empty() {
        return Ok(AuthResponse::default());
    }
    serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(format!("Failed to parse auth response: {}", e)))
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, GatewayError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError> {
        self.post(SIGNUP_PATH, request).await
    }
}
