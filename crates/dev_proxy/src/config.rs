use std::{collections::HashMap, fs, net::SocketAddr, path::Path};

use anyhow::{bail, Context};
use shared::protocol::DEFAULT_API_PREFIX;
use url::Url;

pub const PROXY_CONFIG_FILE: &str = "proxy.toml";
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub backend_url: String,
    pub strip_prefix: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5173".into(),
            backend_url: "http://127.0.0.1:8000".into(),
            strip_prefix: DEFAULT_API_PREFIX.into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Settings {
    pub fn bind_socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.bind_addr))
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(PROXY_CONFIG_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Some(file_cfg) = parse_flat_toml(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.bind_addr = v.clone();
            }
            if let Some(v) = file_cfg.get("backend_url") {
                settings.backend_url = v.clone();
            }
            if let Some(v) = file_cfg.get("strip_prefix") {
                settings.strip_prefix = v.clone();
            }
            if let Some(parsed) = file_cfg
                .get("max_body_bytes")
                .and_then(|v| v.parse::<usize>().ok())
            {
                settings.max_body_bytes = parsed;
            }
        }
    }

    if let Some(v) = env("PROXY_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = env("PROXY_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = env("APP__STRIP_PREFIX") {
        settings.strip_prefix = v;
    }

    if let Some(v) = env("APP__MAX_BODY_BYTES") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_body_bytes = parsed;
        }
    }

    settings
}

/// Reads a table of scalar keys; integers and booleans are kept in their
/// textual form so every key can be parsed the same way as its env variable.
fn parse_flat_toml(raw: &str) -> Option<HashMap<String, String>> {
    let table = match raw.parse::<toml::Table>() {
        Ok(table) => table,
        Err(err) => {
            tracing::warn!(%err, "ignoring unreadable proxy config");
            return None;
        }
    };

    Some(
        table
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    _ => return None,
                };
                Some((key, value))
            })
            .collect(),
    )
}

/// Normalizes the backend base URL: absolute http(s), no trailing slash.
pub fn prepare_backend_url(raw_backend_url: &str) -> anyhow::Result<String> {
    let raw_backend_url = raw_backend_url.trim();
    let url = Url::parse(raw_backend_url)
        .with_context(|| format!("invalid backend url '{raw_backend_url}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "backend url '{raw_backend_url}' must use http or https, not '{}'",
            url.scheme()
        );
    }
    Ok(raw_backend_url.trim_end_matches('/').to_string())
}

/// Normalizes the stripped prefix to `/segment` form, or empty to forward everything.
pub fn normalize_prefix(raw_prefix: &str) -> String {
    let trimmed = raw_prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
