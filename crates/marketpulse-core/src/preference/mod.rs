//! Preference store contract.
//!
//! # Module Structure
//!
//! - `keys`: Stable key names and the session write order
//! - `store`: The `PreferenceStore` trait

pub mod keys;
mod store;

pub use store::PreferenceStore;
