//! Application layer for MarketPulse.
//!
//! Controllers that own the client's live state: the theme preference, the
//! authenticated session, and the password-reset form. They are constructed
//! explicitly, shared by reference (`Arc`), and write through to a
//! [`PreferenceStore`](marketpulse_core::preference::PreferenceStore).

pub mod password_reset;
pub mod session_controller;
pub mod theme_controller;

pub use password_reset::{PasswordResetFlow, ResetState};
pub use session_controller::{AuthOutcome, SessionController};
pub use theme_controller::{ThemeController, ThemeSubscription};
