//! Remote service clients for MarketPulse.

pub mod http_auth_gateway;

pub use http_auth_gateway::HttpAuthGateway;
