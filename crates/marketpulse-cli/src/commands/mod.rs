pub mod context;
pub mod reset;
pub mod session;
pub mod theme;
