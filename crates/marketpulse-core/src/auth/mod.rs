//! Authentication gateway contract.
//!
//! # Module Structure
//!
//! - `model`: Wire-level request and response bodies
//! - `gateway`: The `AuthGateway` trait and its error type
//!
//! # Usage
//!
//! ```ignore
//! use marketpulse_core::auth::{AuthGateway, LoginRequest};
//! ```

mod gateway;
mod model;

pub use gateway::{AuthGateway, GatewayError};
pub use model::{AuthResponse, AuthUser, ErrorBody, LoginRequest, SignupRequest};
