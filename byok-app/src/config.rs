//! Gateway configuration loader.
//!
//! The gateway holds no provider credentials of its own (BYOK), so a missing
//! config file is fine: defaults apply, then env overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
    #[serde(default = "default_http_max_in_flight")]
    pub http_max_in_flight: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8001".to_string()
}

fn default_http_timeout_seconds() -> u64 {
    60
}

fn default_http_max_in_flight() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            http_timeout_seconds: default_http_timeout_seconds(),
            http_max_in_flight: default_http_max_in_flight(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// `["*"]` allows any origin (without credentials). Anything else is an
    /// explicit origin allowlist.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Path to the status-check sqlite database.
    /// Default: `~/.cyberai/data/cyberai.db`
    #[serde(default)]
    pub db_path: Option<String>,
}

impl GatewayConfig {
    pub async fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let path = path.unwrap_or_else(default_config_path);
        let mut cfg = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| anyhow::anyhow!("read config {}: {e}", path.display()))?;
            toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("parse config {}: {e}", path.display()))?
        } else {
            GatewayConfig::default()
        };

        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CYBERAI_BIND_ADDR") {
            if !v.trim().is_empty() {
                self.server.bind_addr = v;
            }
        }
        if let Ok(v) = std::env::var("CYBERAI_DB_PATH") {
            if !v.trim().is_empty() {
                self.storage.db_path = Some(v);
            }
        }
        if let Ok(v) = std::env::var("CYBERAI_CORS_ALLOWED_ORIGINS") {
            let origins: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !origins.is_empty() {
                self.cors.allowed_origins = origins;
            }
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.server.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(anyhow::anyhow!(
                "server.bind_addr is not a valid socket address: {}",
                self.server.bind_addr
            ));
        }
        if self.server.http_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("server.http_timeout_seconds must be > 0"));
        }
        if self.server.http_max_in_flight == 0 {
            return Err(anyhow::anyhow!("server.http_max_in_flight must be > 0"));
        }
        if self.cors.allowed_origins.is_empty() {
            return Err(anyhow::anyhow!("cors.allowed_origins must not be empty"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> std::net::SocketAddr {
        // validate() already checked this parses.
        self.server
            .bind_addr
            .parse()
            .unwrap_or_else(|_| ([127, 0, 0, 1], 8001).into())
    }

    pub fn db_path(&self) -> PathBuf {
        match &self.storage.db_path {
            Some(p) => PathBuf::from(p),
            None => default_data_dir().join("cyberai.db"),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors.allowed_origins.iter().any(|o| o == "*")
    }
}

pub fn default_config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".cyberai").join("config.toml")
}

pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".cyberai").join("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = GatewayConfig::default();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8001");
        assert_eq!(cfg.server.http_timeout_seconds, 60);
        assert!(cfg.allows_any_origin());
        cfg.validate().expect("defaults must validate");
    }

    #[test]
    fn toml_overrides_defaults() {
        let cfg: GatewayConfig = toml::from_str(
            r#"
            [server]
            bind_addr = "0.0.0.0:9000"

            [cors]
            allowed_origins = ["https://app.example.com"]
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
        assert!(!cfg.allows_any_origin());
        assert_eq!(cfg.server.http_max_in_flight, 256);
        cfg.validate().expect("validate");
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let mut cfg = GatewayConfig::default();
        cfg.server.bind_addr = "not-an-addr".to_string();
        assert!(cfg.validate().is_err());
    }
}
