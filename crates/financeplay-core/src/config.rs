//! Application settings
//!
//! ## Resolution
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/financeplay/settings.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! An override only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::coach::FALLBACK_REPLY;
use crate::error::{Error, Result};

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/settings.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct CoachSettings {
    pub timeout: Duration,
    pub fallback_reply: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub require_auth: bool,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub coach: CoachSettings,
    pub server: ServerSettings,
    /// Database file; None means [`default_database_path`]
    pub database_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coach: CoachSettings {
                timeout: Duration::from_secs(30),
                fallback_reply: FALLBACK_REPLY.to_string(),
            },
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
                allowed_origins: Vec::new(),
                require_auth: true,
                token_ttl_hours: 24 * 30,
            },
            database_path: None,
        }
    }
}

impl Settings {
    /// Load from the default override location, or the embedded defaults
    pub fn load() -> Result<Self> {
        Self::load_from(default_settings_path().as_deref())
    }

    /// Load with an explicit override file (ignored when it does not exist)
    pub fn load_from(override_path: Option<&Path>) -> Result<Self> {
        let mut settings = parse_settings(DEFAULT_SETTINGS)?;

        if let Some(path) = override_path.filter(|p| p.exists()) {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
            let raw: RawSettings = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))?;
            raw.apply(&mut settings);
            tracing::debug!(path = %path.display(), "Applied settings override");
        }

        Ok(settings)
    }

    /// Database path, resolving the default location when unset
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

/// Default settings override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("financeplay").join("settings.toml"))
}

/// Default database location (falls back to the working directory)
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("financeplay").join("financeplay.db"))
        .unwrap_or_else(|| PathBuf::from("financeplay.db"))
}

/// Raw settings structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    coach: Option<RawCoach>,
    server: Option<RawServer>,
    database: Option<RawDatabase>,
}

#[derive(Debug, Deserialize)]
struct RawCoach {
    timeout_secs: Option<u64>,
    fallback_reply: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
    require_auth: Option<bool>,
    token_ttl_hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    path: Option<String>,
}

impl RawSettings {
    fn apply(self, settings: &mut Settings) {
        if let Some(coach) = self.coach {
            if let Some(secs) = coach.timeout_secs {
                settings.coach.timeout = Duration::from_secs(secs);
            }
            if let Some(reply) = coach.fallback_reply.filter(|r| !r.trim().is_empty()) {
                settings.coach.fallback_reply = reply;
            }
        }

        if let Some(server) = self.server {
            if let Some(host) = server.host {
                settings.server.host = host;
            }
            if let Some(port) = server.port {
                settings.server.port = port;
            }
            if let Some(origins) = server.allowed_origins {
                settings.server.allowed_origins = origins;
            }
            if let Some(require_auth) = server.require_auth {
                settings.server.require_auth = require_auth;
            }
            if let Some(ttl) = server.token_ttl_hours.filter(|h| *h > 0) {
                settings.server.token_ttl_hours = ttl;
            }
        }

        if let Some(database) = self.database {
            if let Some(path) = database.path {
                settings.database_path = if path.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(path))
                };
            }
        }
    }
}

/// Parse settings from TOML content on top of the built-in defaults
fn parse_settings(content: &str) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))?;
    let mut settings = Settings::default();
    raw.apply(&mut settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults_parse() {
        let settings = parse_settings(DEFAULT_SETTINGS).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8080\nrequire_auth = false").unwrap();

        let settings = Settings::load_from(Some(file.path())).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(!settings.server.require_auth);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.coach.fallback_reply, FALLBACK_REPLY);
    }

    #[test]
    fn test_missing_override_uses_defaults() {
        let settings = Settings::load_from(Some(Path::new("/nonexistent/settings.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_database_path_override() {
        let settings = parse_settings("[database]\npath = \"/tmp/fp.db\"").unwrap();
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/fp.db"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(parse_settings("[server\nport="), Err(Error::Config(_))));
    }
}
