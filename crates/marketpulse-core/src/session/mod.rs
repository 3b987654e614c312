//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: `SessionState` snapshot and its persisted field layout

mod model;

pub use model::SessionState;
