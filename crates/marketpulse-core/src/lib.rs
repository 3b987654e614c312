//! Domain layer for the MarketPulse client.
//!
//! Holds the session and theme models, the preference store and auth gateway
//! contracts, form validation rules, and client configuration. Concrete
//! storage and HTTP implementations live in the infrastructure and
//! interaction crates.

pub mod auth;
pub mod config;
pub mod error;
pub mod preference;
pub mod session;
pub mod theme;
pub mod validation;

// Re-export common error type
pub use error::PulseError;
