//! Client settings: defaults, then `tts.toml`, then environment variables.

use std::{collections::HashMap, fs, path::Path};

use shared::protocol::DEFAULT_API_PREFIX;
use thiserror::Error;
use url::Url;

pub const CLIENT_CONFIG_FILE: &str = "tts.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL requests are sent to: the development proxy or the backend itself.
    pub server_url: String,
    /// Path prefix the proxy strips; empty when talking to the backend directly.
    pub api_prefix: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5173".into(),
            api_prefix: DEFAULT_API_PREFIX.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(CLIENT_CONFIG_FILE), |name| std::env::var(name).ok())
}

/// Same as [`load_settings`], reading the file at `path` and variables through `env`.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("server_url") {
                    settings.server_url = v.clone();
                }
                if let Some(v) = file_cfg.get("api_prefix") {
                    settings.api_prefix = v.clone();
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable client config");
            }
        }
    }

    if let Some(v) = env("TTS_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("TTS_API_PREFIX") {
        settings.api_prefix = v;
    }
    if let Some(v) = env("APP__API_PREFIX") {
        settings.api_prefix = v;
    }

    settings
}

/// Checks that `raw` is an absolute http(s) URL and returns it trimmed.
pub fn validate_server_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| SettingsError::InvalidServerUrl {
        url: trimmed.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_point_at_the_development_proxy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings_from(&dir.path().join("missing.toml"), no_env);
        assert_eq!(settings, ClientSettings::default());
        assert_eq!(settings.api_prefix, "/api");
    }

    #[test]
    fn file_values_override_defaults_and_env_overrides_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tts.toml");
        fs::write(
            &path,
            "server_url = \"http://10.0.0.2:8000\"\napi_prefix = \"\"\n",
        )
        .expect("write config");

        let from_file = load_settings_from(&path, no_env);
        assert_eq!(from_file.server_url, "http://10.0.0.2:8000");
        assert_eq!(from_file.api_prefix, "");

        let from_env = load_settings_from(&path, |name| {
            (name == "APP__SERVER_URL").then(|| "http://gpu-box:5173".to_string())
        });
        assert_eq!(from_env.server_url, "http://gpu-box:5173");
        assert_eq!(from_env.api_prefix, "");
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tts.toml");
        fs::write(&path, "server_url = [").expect("write config");
        assert_eq!(load_settings_from(&path, no_env), ClientSettings::default());
    }

    #[test]
    fn server_url_validation() {
        assert_eq!(
            validate_server_url(" http://127.0.0.1:5173/ ").expect("valid"),
            "http://127.0.0.1:5173"
        );
        assert!(validate_server_url("ftp://example.com").is_err());
        assert!(validate_server_url("not a url").is_err());
    }
}
