//! Theme domain module.
//!
//! # Module Structure
//!
//! - `model`: The `ThemePreference` value and its string encoding

mod model;

pub use model::ThemePreference;
