use reqwest::Client;

use crate::config::{normalize_prefix, prepare_backend_url, Settings};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) http: Client,
    pub(crate) backend_url: String,
    pub(crate) strip_prefix: String,
}

impl AppState {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::new(),
            backend_url: prepare_backend_url(&settings.backend_url)?,
            strip_prefix: normalize_prefix(&settings.strip_prefix),
        })
    }
}
