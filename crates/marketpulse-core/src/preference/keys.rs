//! Stable preference store keys.
//!
//! These names are the only durable artifacts the client produces, so they
//! must not change between releases.

pub const THEME: &str = "theme";
pub const IS_AUTHENTICATED: &str = "isAuthenticated";
pub const USER_NAME: &str = "userName";
pub const USER_EMAIL: &str = "userEmail";
pub const USER_DOB: &str = "userDob";

/// Value stored under [`IS_AUTHENTICATED`] for a signed-in session.
pub const AUTHENTICATED_FLAG: &str = "true";

/// Order in which session fields are written.
///
/// The flag comes last so a crash between writes can never leave it set
/// without the profile fields it vouches for.
pub const SESSION_WRITE_ORDER: [&str; 4] = [USER_NAME, USER_EMAIL, USER_DOB, IS_AUTHENTICATED];

/// Order in which session fields are removed on logout (flag first).
pub const SESSION_REMOVE_ORDER: [&str; 4] = [IS_AUTHENTICATED, USER_DOB, USER_EMAIL, USER_NAME];
