//! AuthGateway trait.

use async_trait::async_trait;
use thiserror::Error;

use super::model::{AuthResponse, LoginRequest, SignupRequest};

/// Failure talking to the authentication service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The service answered with a non-success status.
    #[error("Authentication rejected (status {status})")]
    Rejected { status: u16, detail: Option<String> },

    /// The request never completed (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success status whose body could not be interpreted.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Server-provided, user-displayable detail, if any.
    ///
    /// Only rejections carry one; transport and parse failures are collapsed
    /// into the caller's generic message.
    pub fn detail(&self) -> Option<&str> {
        match self {
            GatewayError::Rejected { detail, .. } => detail
                .as_deref()
                .map(str::trim)
                .filter(|detail| !detail.is_empty()),
            _ => None,
        }
    }
}

/// Remote authentication operations consumed by the session controller.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /auth/login`.
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, GatewayError>;

    /// `POST /auth/signup`.
    async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, GatewayError>;
}
