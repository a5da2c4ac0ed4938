use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    settings::validate_server_url, load_settings, ClientSettings, SynthesisSession, TtsClient,
};
use shared::{domain::Language, form::SynthesisForm, protocol::OUTPUT_FILE_NAME};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tts", about = "Command-line client for the speech synthesis backend")]
struct Cli {
    /// Overrides `server_url` from tts.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    api_prefix: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize speech and write it as a WAV file.
    Synthesize(SynthesizeArgs),
    /// List the supported languages.
    Languages,
    /// Ask the backend whether the model is loaded.
    Status {
        /// Print the raw JSON document.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct SynthesizeArgs {
    #[arg(long)]
    text: String,
    #[arg(long, default_value = "it")]
    language: Language,
    /// Voice sample to clone.
    #[arg(long)]
    reference: Option<PathBuf>,
    #[arg(long)]
    exaggeration: Option<f64>,
    #[arg(long)]
    cfg_weight: Option<f64>,
    #[arg(long)]
    temperature: Option<f64>,
    /// 0 picks a random seed; anything that is not a number counts as 0.
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<String>,
    #[arg(long, default_value = OUTPUT_FILE_NAME)]
    out: PathBuf,
}

impl SynthesizeArgs {
    fn to_form(&self) -> SynthesisForm {
        let mut form = SynthesisForm::default();
        form.set_text(self.text.as_str());
        form.set_language(self.language);
        form.set_reference_audio(self.reference.clone());
        if let Some(value) = self.exaggeration {
            form.set_exaggeration(value);
        }
        if let Some(value) = self.cfg_weight {
            form.set_cfg_weight(value);
        }
        if let Some(value) = self.temperature {
            form.set_temperature(value);
        }
        if let Some(seed) = &self.seed {
            form.set_seed_text(seed);
        }
        form
    }
}

fn resolve_settings(cli: &Cli, mut settings: ClientSettings) -> Result<ClientSettings> {
    if let Some(url) = &cli.server_url {
        settings.server_url = url.clone();
    }
    if let Some(prefix) = &cli.api_prefix {
        settings.api_prefix = prefix.clone();
    }
    settings.server_url = validate_server_url(&settings.server_url)?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Languages => {
            for language in Language::ALL {
                println!("{}\t{}", language.code(), language.display_name());
            }
        }
        Command::Status { json } => {
            let settings = resolve_settings(&cli, load_settings())?;
            let client = TtsClient::from_settings(&settings);
            let status = client.backend_status().await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!(
                    "{}: status={} model_loaded={} device={}",
                    client.server_url(),
                    status.status,
                    status.model_loaded,
                    status.device
                );
            }
        }
        Command::Synthesize(args) => {
            let settings = resolve_settings(&cli, load_settings())?;
            let form = args.to_form();
            if form.text_chars() < args.text.chars().count() {
                eprintln!(
                    "text truncated to {} characters",
                    shared::domain::MAX_TEXT_CHARS
                );
            }

            let session = SynthesisSession::new(Arc::new(TtsClient::from_settings(&settings)));
            let snapshot = session.generate(form.snapshot()).await;
            if let Some(message) = snapshot.error {
                bail!(message);
            }
            let Some(audio) = snapshot.audio else {
                bail!("backend returned no audio");
            };
            audio
                .save_as(&args.out)
                .with_context(|| format!("failed to write {}", args.out.display()))?;
            info!(out = %args.out.display(), size_bytes = audio.size_bytes(), "saved synthesized audio");
            println!("{} ({} bytes)", args.out.display(), audio.size_bytes());
            session.clear();
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
