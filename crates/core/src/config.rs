use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{FrostsightError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOKEN: &str = "local-dev-token";

/// Connection settings for the metrics API. Built once at startup and handed
/// to the client by value; nothing reads the environment after that.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: DEFAULT_TOKEN.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: None,
        }
    }

    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        let config_path = config_file_path();
        if let Some(file_overrides) = load_file_overrides(&config_path)? {
            apply_overrides(&mut cfg, file_overrides, "config file")?;
        }
        apply_overrides(&mut cfg, load_env_overrides(), "environment")?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        apply_overrides(&mut cfg, load_env_overrides(), "environment")?;
        Ok(cfg)
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Result<Self> {
        if let Some(v) = api_url {
            self.api_url = checked_api_url(v, "command line")?;
        }
        Ok(self)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(v) = token {
            self.token = v;
        }
        self
    }

    /// `api_url` joined with an absolute API path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigOverrides {
    api_url: Option<String>,
    token: Option<String>,
    timeout: Option<String>,
}

fn config_file_path() -> PathBuf {
    if let Ok(path) = env::var("FROSTSIGHT_CONFIG") {
        return PathBuf::from(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let config_home = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(home).join(".config"));
    config_home.join("frostsight/config.toml")
}

fn load_file_overrides(path: &Path) -> Result<Option<ConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|e| {
        FrostsightError::Config(format!("failed reading {}: {e}", path.display()))
    })?;
    let parsed: ConfigOverrides = toml::from_str(&raw).map_err(|e| {
        FrostsightError::Config(format!("failed parsing {}: {e}", path.display()))
    })?;
    Ok(Some(parsed))
}

// The VITE_* names are what the web build reads, so a shared .env keeps working.
fn load_env_overrides() -> ConfigOverrides {
    ConfigOverrides {
        api_url: env::var("FROSTSIGHT_API_URL")
            .or_else(|_| env::var("VITE_API_URL"))
            .ok(),
        token: env::var("FROSTSIGHT_TOKEN")
            .or_else(|_| env::var("VITE_LOCAL_TOKEN"))
            .ok(),
        timeout: env::var("FROSTSIGHT_TIMEOUT").ok(),
    }
}

fn apply_overrides(cfg: &mut ClientConfig, overrides: ConfigOverrides, source: &str) -> Result<()> {
    if let Some(v) = overrides.api_url {
        cfg.api_url = checked_api_url(v, source)?;
    }
    if let Some(v) = overrides.token {
        cfg.token = v;
    }
    if let Some(v) = overrides.timeout {
        cfg.timeout = Some(humantime::parse_duration(&v).map_err(|e| {
            FrostsightError::Config(format!("bad timeout in {source}: {e} (value={v})"))
        })?);
    }
    Ok(())
}

fn checked_api_url(v: String, source: &str) -> Result<String> {
    if v.starts_with("http://") || v.starts_with("https://") {
        Ok(v)
    } else {
        Err(FrostsightError::Config(format!(
            "bad api_url in {source}: expected http:// or https:// (value={v})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    const ENV_KEYS: [&str; 6] = [
        "FROSTSIGHT_CONFIG",
        "FROSTSIGHT_API_URL",
        "FROSTSIGHT_TOKEN",
        "FROSTSIGHT_TIMEOUT",
        "VITE_API_URL",
        "VITE_LOCAL_TOKEN",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            // SAFETY: tests touching the environment are serialized.
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    fn default_points_at_local_backend() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.api_url, "http://localhost:8000");
        assert_eq!(cfg.token, "local-dev-token");
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn url_for_joins_without_double_slash() {
        let cfg = ClientConfig::new("http://api.local:9000/", "t");
        assert_eq!(
            cfg.url_for("/api/v1/overview"),
            "http://api.local:9000/api/v1/overview"
        );
    }

    #[test]
    fn cli_values_win_over_loaded_ones() {
        let cfg = ClientConfig::default()
            .with_api_url(Some("http://10.0.0.5:8000".to_string()))
            .unwrap()
            .with_token(None);
        assert_eq!(cfg.api_url, "http://10.0.0.5:8000");
        assert_eq!(cfg.token, DEFAULT_TOKEN);
    }

    #[test]
    fn cli_api_url_needs_a_scheme() {
        let err = ClientConfig::default()
            .with_api_url(Some("localhost:8000".to_string()))
            .unwrap_err();
        assert!(matches!(err, FrostsightError::Config(_)));
        assert!(err.to_string().contains("bad api_url in command line"));

        let unchanged = ClientConfig::default().with_api_url(None).unwrap();
        assert_eq!(unchanged.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn apply_overrides_parses_timeout() {
        let mut cfg = ClientConfig::default();
        let file = ConfigOverrides {
            timeout: Some("3s".to_string()),
            ..ConfigOverrides::default()
        };
        apply_overrides(&mut cfg, file, "config file").unwrap();
        assert_eq!(cfg.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn apply_overrides_rejects_bad_values() {
        let mut cfg = ClientConfig::default();
        let bad_timeout = ConfigOverrides {
            timeout: Some("soon".to_string()),
            ..ConfigOverrides::default()
        };
        let err = apply_overrides(&mut cfg, bad_timeout, "environment").unwrap_err();
        assert!(err.to_string().contains("bad timeout in environment"));

        let bad_url = ConfigOverrides {
            api_url: Some("localhost:8000".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(apply_overrides(&mut cfg, bad_url, "config file").is_err());
    }

    #[test]
    #[serial]
    fn from_env_reads_vite_fallbacks() {
        clear_env();
        unsafe {
            env::set_var("VITE_API_URL", "http://vite.local:8000");
            env::set_var("VITE_LOCAL_TOKEN", "vite-token");
        }
        let cfg = ClientConfig::from_env().unwrap();
        assert_eq!(cfg.api_url, "http://vite.local:8000");
        assert_eq!(cfg.token, "vite-token");

        unsafe { env::set_var("FROSTSIGHT_TOKEN", "primary-token") };
        let cfg = ClientConfig::from_env().unwrap();
        assert_eq!(cfg.token, "primary-token");
        clear_env();
    }

    #[test]
    #[serial]
    fn load_layers_env_over_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "api_url = \"http://file.local:8000\"").unwrap();
        writeln!(file, "token = \"file-token\"").unwrap();
        writeln!(file, "timeout = \"250ms\"").unwrap();

        unsafe {
            env::set_var("FROSTSIGHT_CONFIG", &path);
            env::set_var("FROSTSIGHT_TOKEN", "env-token");
        }
        let cfg = ClientConfig::load().unwrap();
        assert_eq!(cfg.api_url, "http://file.local:8000");
        assert_eq!(cfg.token, "env-token");
        assert_eq!(cfg.timeout, Some(Duration::from_millis(250)));
        clear_env();
    }

    #[test]
    #[serial]
    fn load_reports_unparseable_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = [").unwrap();
        unsafe { env::set_var("FROSTSIGHT_CONFIG", &path) };

        let err = ClientConfig::load().unwrap_err();
        assert!(matches!(err, FrostsightError::Config(_)));
        clear_env();
    }
}
