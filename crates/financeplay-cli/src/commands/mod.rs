//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init, users and shared utilities (open_db, resolve_user)
//! - `records` - Transactions, income, savings, goals, diary, budget, bursaries
//! - `reports` - Snapshot, dashboard and weekly report
//! - `coach` - Coach prompt preview and replies
//! - `prompts` - Prompt library listing and overrides
//! - `serve` - Web server command

pub mod coach;
pub mod core;
pub mod prompts;
pub mod records;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use coach::*;
pub use core::*;
pub use prompts::*;
pub use records::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
