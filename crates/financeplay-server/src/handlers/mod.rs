//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod auth;
pub mod coach;
pub mod records;
pub mod reports;
pub mod views;

// Re-export all handlers for use in router
pub use auth::*;
pub use coach::*;
pub use records::*;
pub use reports::*;
pub use views::*;
