use std::error::Error as StdError;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::{ReferenceAudio, SynthesisRequest},
    error::SynthesisError,
    protocol::{
        endpoint_url, text_fields, BackendStatus, FIELD_REFERENCE_AUDIO, GENERATE_TTS_PATH,
        STATUS_PATH,
    },
};
use tracing::{debug, info};

pub mod audio;
pub mod session;
pub mod settings;
pub mod view;

pub use audio::{AudioClip, AudioClipView, ClipId};
pub use session::{GenerationSnapshot, RequestTicket, SessionEvent, SynthesisSession};
pub use settings::{load_settings, ClientSettings};
pub use view::{OutputView, ViewState};

/// Anything that can turn a request into WAV bytes.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError>;
}

/// HTTP client for the synthesis backend, optionally reached through the
/// development proxy.
#[derive(Debug, Clone)]
pub struct TtsClient {
    http: Client,
    server_url: String,
    api_prefix: String,
}

impl TtsClient {
    pub fn new(server_url: impl Into<String>, api_prefix: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
            api_prefix: api_prefix.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.server_url.clone(), settings.api_prefix.clone())
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn generate_url(&self) -> String {
        endpoint_url(&self.server_url, &self.api_prefix, GENERATE_TTS_PATH)
    }

    pub fn status_url(&self) -> String {
        endpoint_url(&self.server_url, &self.api_prefix, STATUS_PATH)
    }

    pub async fn backend_status(&self) -> Result<BackendStatus> {
        let url = self.status_url();
        let status = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach backend at {url}"))?
            .error_for_status()?
            .json::<BackendStatus>()
            .await
            .context("backend returned an unexpected status document")?;
        Ok(status)
    }

    async fn build_form(&self, request: &SynthesisRequest) -> Result<Form, SynthesisError> {
        let mut form = Form::new();
        for (name, value) in text_fields(request) {
            form = form.text(name, value);
        }
        if let Some(audio) = request.reference_audio() {
            form = form.part(FIELD_REFERENCE_AUDIO, reference_audio_part(audio).await?);
        }
        Ok(form)
    }
}

async fn reference_audio_part(audio: &ReferenceAudio) -> Result<Part, SynthesisError> {
    let read_failure = |reason: String| SynthesisError::ReferenceAudio {
        path: audio.path().display().to_string(),
        reason,
    };

    let bytes = tokio::fs::read(audio.path())
        .await
        .map_err(|err| read_failure(err.to_string()))?;
    let mime = mime_guess::from_path(audio.path()).first_or_octet_stream();
    debug!(
        file = audio.file_name(),
        size_bytes = bytes.len(),
        mime = mime.essence_str(),
        "attaching reference audio"
    );

    Part::bytes(bytes)
        .file_name(audio.file_name().to_string())
        .mime_str(mime.essence_str())
        .map_err(|err| read_failure(err.to_string()))
}

#[async_trait]
impl SynthesisBackend for TtsClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        let form = self.build_form(request).await?;
        let url = self.generate_url();
        info!(
            %url,
            language = request.language().code(),
            text_chars = request.text().chars().count(),
            has_reference = request.reference_audio().is_some(),
            "requesting synthesis"
        );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(transport_failure)?;
            return Err(SynthesisError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await.map_err(transport_failure)?;
        info!(size_bytes = audio.len(), "synthesis succeeded");
        Ok(audio.to_vec())
    }
}

fn transport_failure(err: reqwest::Error) -> SynthesisError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    SynthesisError::Transport(message)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
