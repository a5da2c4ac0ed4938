//! Wire contract of the synthesis backend.

use serde::{Deserialize, Serialize};

use crate::domain::SynthesisRequest;

/// Prefix the development proxy strips before forwarding to the backend.
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const GENERATE_TTS_PATH: &str = "/generate-tts";
pub const STATUS_PATH: &str = "/";

pub const FIELD_TEXT: &str = "text_input";
pub const FIELD_LANGUAGE: &str = "language_id";
pub const FIELD_REFERENCE_AUDIO: &str = "audio_prompt_path_input";
pub const FIELD_EXAGGERATION: &str = "exaggeration_input";
pub const FIELD_CFG_WEIGHT: &str = "cfgw_input";
pub const FIELD_TEMPERATURE: &str = "temperature_input";
pub const FIELD_SEED: &str = "seed_num_input";

/// Suggested file name when saving a synthesized clip.
pub const OUTPUT_FILE_NAME: &str = "chatterbox_output.wav";

/// Body of `GET /` on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub status: String,
    pub model_loaded: bool,
    pub device: String,
}

impl BackendStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "running" && self.model_loaded
    }
}

/// The plain-text form fields of a request, in submission order. The
/// reference audio travels separately as a file part.
pub fn text_fields(request: &SynthesisRequest) -> Vec<(&'static str, String)> {
    vec![
        (FIELD_TEXT, request.text().to_string()),
        (FIELD_LANGUAGE, request.language().code().to_string()),
        (FIELD_EXAGGERATION, request.exaggeration().to_string()),
        (FIELD_CFG_WEIGHT, request.cfg_weight().to_string()),
        (FIELD_TEMPERATURE, request.temperature().to_string()),
        (FIELD_SEED, request.seed().to_string()),
    ]
}

/// Joins a server base URL, an API prefix, and an endpoint path without
/// doubling or dropping slashes.
pub fn endpoint_url(server_url: &str, api_prefix: &str, path: &str) -> String {
    let base = server_url.trim_end_matches('/');
    let prefix = api_prefix.trim_matches('/');
    let path = path.trim_start_matches('/');

    let mut url = base.to_string();
    if !prefix.is_empty() {
        url.push('/');
        url.push_str(prefix);
    }
    url.push('/');
    url.push_str(path);
    url
}
