//! Infrastructure layer for MarketPulse.
//!
//! Disk-backed and in-memory preference stores, path resolution, and
//! configuration loading.

pub mod config_service;
pub mod paths;
pub mod preference_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::PulsePaths;
pub use crate::preference_store::{FilePreferenceStore, MemoryPreferenceStore};
