//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, SessionEvent, SynthesisSession, TtsClient};
use crossbeam_channel::{bounded, Receiver, Sender};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the worker thread. The returned receiver yields once the worker
/// has released its session, i.e. after the command queue closes.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
) -> Receiver<()> {
    let (done_tx, done_rx) = bounded(1);
    thread::spawn(move || {
        let _done = DoneSignal(done_tx);
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = TtsClient::from_settings(&settings);
            let session = Arc::new(SynthesisSession::new(Arc::new(client.clone())));
            let forwarder = tokio::spawn(forward_session_events(session.subscribe(), ui_tx.clone()));

            tracing::info!(server_url = client.server_url(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Ready; sending requests to {}",
                client.server_url()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Generate(request) => {
                        let ticket = session.spawn_generate(request);
                        tracing::debug!(ticket = ticket.0, "generation queued");
                    }
                    BackendCommand::CheckBackend => {
                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match client.backend_status().await {
                                Ok(status) => UiEvent::BackendStatus(status),
                                Err(err) => UiEvent::Error(UiError::from_message(
                                    UiErrorContext::BackendStatus,
                                    format!("{err:#}"),
                                )),
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                    BackendCommand::ClearOutput => session.clear(),
                }
            }

            tracing::info!("ui command queue closed; shutting down backend worker");
            session.clear();
            forwarder.abort();
        });
    });
    done_rx
}

/// Signals completion however the worker thread ends.
struct DoneSignal(Sender<()>);

impl Drop for DoneSignal {
    fn drop(&mut self) {
        let _ = self.0.try_send(());
    }
}

async fn forward_session_events(
    mut events: broadcast::Receiver<SessionEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::StateChanged(snapshot)) => {
                if ui_tx.try_send(UiEvent::Generation(snapshot)).is_err() {
                    tracing::warn!("dropping generation update; ui queue unavailable");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui fell behind session events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
