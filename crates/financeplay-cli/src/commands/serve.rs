//! Server command implementation

use anyhow::Result;
use financeplay_core::config::Settings;
use financeplay_core::db::Database;
use financeplay_server::{ServerConfig, TOKEN_SECRET_ENV};

pub async fn cmd_serve(
    db: Database,
    settings: &Settings,
    host: Option<&str>,
    port: Option<u16>,
    no_auth: bool,
) -> Result<()> {
    let host = host.unwrap_or(settings.server.host.as_str());
    let port = port.unwrap_or(settings.server.port);

    let mut config = ServerConfig::from_settings(settings);
    if no_auth {
        config.require_auth = false;
    }

    println!("🚀 Starting FinancePlay web server...");
    println!("   Database: {}", db.path());
    println!("   Listening: http://{}:{}", host, port);

    if config.require_auth {
        println!("   🔒 Authentication: bearer tokens ({})", TOKEN_SECRET_ENV);
    } else {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    }
    if !config.allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", config.allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    financeplay_server::serve_with_config(db, host, port, config).await
}
