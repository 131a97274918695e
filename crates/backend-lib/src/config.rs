// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Seconds an invitation stays pending before it times out
    pub invite_timeout_secs: u64,
}

impl Settings {
    pub fn invite_timeout(&self) -> Duration {
        Duration::from_secs(self.invite_timeout_secs)
    }

    /// Load settings from `config/default.toml` layered under
    /// `CONSULT_`-prefixed environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    /// Load settings from an explicit TOML path, still honoring the
    /// environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("CONSULT_"))
            .extract()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_level: "info".to_string(),
            invite_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let settings = Settings::default();
        assert_eq!(settings.invite_timeout(), Duration::from_secs(30));
        assert_eq!(settings.bind_addr.port(), 3000);
    }

    #[test]
    fn missing_file_falls_back_to_env_only() {
        // Figment treats a missing TOML file as an empty layer; extraction
        // then fails on the required fields rather than on IO.
        let result = Settings::load_from("does/not/exist.toml");
        assert!(result.is_err());
    }
}
