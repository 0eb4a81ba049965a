//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_user` - Pick the user the command acts as
//! - `cmd_init` - Initialize the database
//! - `cmd_users_*` - User management

use std::path::Path;

use anyhow::{Context, Result};
use financeplay_core::db::Database;
use financeplay_core::models::User;
use financeplay_server::LOCAL_USER_EMAIL;

/// Open (and migrate) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// The user a command acts as: the named user, or the local single user
pub fn resolve_user(db: &Database, email: Option<&str>) -> Result<User> {
    match email {
        Some(email) => db.get_user_by_email(email)?.with_context(|| {
            format!(
                "User {} not found. Create it with: financeplay users add {}",
                email, email
            )
        }),
        None => Ok(db.get_or_create_user(LOCAL_USER_EMAIL, Some("Local user"))?),
    }
}

pub fn cmd_init(db: &Database) -> Result<()> {
    println!("🔧 Initializing database at {}...", db.path());

    let user = resolve_user(db, None)?;
    println!("   Local user: {}", user.email);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record spending: financeplay tx add 120 food");
    println!("  2. Set a goal:      financeplay goals add \"Emergency Fund\" 2000");
    println!("  3. Start web UI:    financeplay serve --no-auth");

    Ok(())
}

pub fn cmd_users_add(db: &Database, email: &str, name: Option<&str>) -> Result<User> {
    let user = db.create_user(email, name)?;
    println!("✅ Created user {} (id {})", user.email, user.id);
    Ok(user)
}

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Add one with:");
        println!("  financeplay users add you@example.com");
        return Ok(());
    }

    println!();
    println!("👥 Users");
    println!("   ─────────────────────────────────────────");
    for user in users {
        println!(
            "   [{}] {} {}",
            user.id,
            user.email,
            user.name.map(|n| format!("({})", n)).unwrap_or_default()
        );
    }

    Ok(())
}
