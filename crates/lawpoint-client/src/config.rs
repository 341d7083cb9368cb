//! Client configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use lawpoint_shared::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the gateway API, including the `/api` prefix.
    /// Env: `LAWPOINT_API_URL`
    pub api_url: String,

    /// File where the signed-in user is cached between runs. `None` when no
    /// platform data directory exists and nothing was configured.
    /// Env: `LAWPOINT_SESSION_PATH`
    pub session_path: Option<PathBuf>,

    /// Per-request timeout of the gateway client.
    /// Env: `LAWPOINT_HTTP_TIMEOUT_SECS`
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_path: default_session_path(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = var("LAWPOINT_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }

        if let Some(path) = var("LAWPOINT_SESSION_PATH") {
            config.session_path = Some(PathBuf::from(path));
        }

        if let Some(val) = var("LAWPOINT_HTTP_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %val, "Invalid LAWPOINT_HTTP_TIMEOUT_SECS, using default"),
            }
        }

        config
    }
}

/// `session.json` under the platform data directory:
/// - Linux:   `~/.local/share/lawpoint/session.json`
/// - macOS:   `~/Library/Application Support/com.lawpoint.lawpoint/session.json`
/// - Windows: `{FOLDERID_RoamingAppData}\lawpoint\lawpoint\data\session.json`
fn default_session_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "lawpoint", "lawpoint").map(|dirs| dirs.data_dir().join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> ClientConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = lookup(&[]);
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert_eq!(config.http_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_overrides() {
        let config = lookup(&[
            ("LAWPOINT_API_URL", "https://lawpoint.example/api/"),
            ("LAWPOINT_SESSION_PATH", "/tmp/lp-session.json"),
            ("LAWPOINT_HTTP_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.api_url, "https://lawpoint.example/api");
        assert_eq!(config.session_path, Some(PathBuf::from("/tmp/lp-session.json")));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = lookup(&[("LAWPOINT_HTTP_TIMEOUT_SECS", "soon")]);
        assert_eq!(config.http_timeout, Duration::from_secs(20));
    }
}
