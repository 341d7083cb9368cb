//! Server configuration loaded from environment variables.
//!
//! All settings have defaults so the gateway can start with zero
//! configuration for local development. A `.env` file in the working
//! directory is loaded first by `main`.

use std::net::SocketAddr;
use std::path::PathBuf;

use lawpoint_shared::constants::DEFAULT_HTTP_PORT;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`, or `PORT` to bind `0.0.0.0:<PORT>`
    /// Default: `0.0.0.0:5000`
    pub http_addr: SocketAddr,

    /// SQLite file backing the document store.
    /// Env: `DATABASE_PATH`
    /// Default: `./lawpoint.db`
    pub database_path: PathBuf,

    /// Directory holding the built frontend. Unknown paths fall back to its
    /// `index.html`.
    /// Env: `STATIC_DIR`
    /// Default: unset (no static serving)
    pub static_dir: Option<PathBuf>,

    /// Maximum accepted request body in bytes.
    /// Env: `MAX_BODY_BYTES`
    /// Default: 10 MiB
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./lawpoint.db"),
            static_dir: None,
            max_body_bytes: 10 * 1024 * 1024, // 10 MiB
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        } else if let Some(port) = var("PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.http_addr.set_port(port),
                Err(_) => tracing::warn!(value = %port, "Invalid PORT, using default"),
            }
        }

        if let Some(path) = var("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(dir) = var("STATIC_DIR") {
            if !dir.is_empty() {
                config.static_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(val) = var("MAX_BODY_BYTES") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.max_body_bytes = n,
                _ => tracing::warn!(value = %val, "Invalid MAX_BODY_BYTES, using default"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 5000).into());
        assert_eq!(config.database_path, PathBuf::from("./lawpoint.db"));
        assert!(config.static_dir.is_none());
    }

    #[test]
    fn test_port_sets_bind_port() {
        let config = lookup(&[("PORT", "8081")]);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8081).into());
    }

    #[test]
    fn test_http_addr_wins_over_port() {
        let config = lookup(&[("HTTP_ADDR", "127.0.0.1:9000"), ("PORT", "8081")]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = lookup(&[("PORT", "eighty"), ("MAX_BODY_BYTES", "0")]);
        assert_eq!(config.http_addr.port(), 5000);
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_static_dir() {
        let config = lookup(&[("STATIC_DIR", "dist"), ("DATABASE_PATH", "/tmp/lp.db")]);
        assert_eq!(config.static_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.database_path, PathBuf::from("/tmp/lp.db"));
    }
}
