use std::time::Duration;

use client_core::{AudioClipView, GenerationSnapshot, ViewState};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{form::SynthesisForm, protocol::BackendStatus, protocol::OUTPUT_FILE_NAME};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::media::AudioPlayer;

use super::{
    audio_output::{self, OutputAction},
    control_panel::{self, ControlPanelAction, SeedInput},
    navbar,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

/// Root of the GUI. Owns the form, the active view and the player; the
/// generation state itself lives in the worker's session and arrives here as
/// snapshots.
pub struct TtsGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    form: SynthesisForm,
    seed: SeedInput,
    view_state: ViewState,
    generation: GenerationSnapshot,
    backend: Option<BackendStatus>,
    status: String,
    status_banner: Option<StatusBanner>,
    player: AudioPlayer,
    shutdown_sent: bool,
}

impl TtsGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let form = SynthesisForm::default();
        let seed = SeedInput::new(form.seed());
        let mut app = Self {
            cmd_tx,
            ui_rx,
            form,
            seed,
            view_state: ViewState::default(),
            generation: GenerationSnapshot::default(),
            backend: None,
            status: "Starting...".to_string(),
            status_banner: None,
            player: AudioPlayer::default(),
            shutdown_sent: false,
        };
        app.queue(BackendCommand::CheckBackend);
        app
    }

    fn queue(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status)
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Generation(snapshot) => self.apply_generation(snapshot),
                UiEvent::BackendStatus(status) => {
                    self.status = if status.is_ready() {
                        format!("Backend {} with model loaded on {}", status.status, status.device)
                    } else {
                        format!("Backend {}; model not loaded yet", status.status)
                    };
                    self.backend = Some(status);
                }
                UiEvent::Error(err) => self.show_error(err),
            }
        }
    }

    fn apply_generation(&mut self, snapshot: GenerationSnapshot) {
        // Snapshots from the same generation can arrive out of order with
        // respect to newer ones; never step backwards.
        if snapshot.generation < self.generation.generation {
            return;
        }
        self.player.retain(snapshot.audio.as_ref().map(|clip| clip.id));
        if snapshot.generation > self.generation.generation && snapshot.loading {
            self.status = "Synthesizing...".to_string();
        } else if let Some(error) = &snapshot.error {
            self.status = format!("Generation failed: {error}");
        } else if let Some(clip) = &snapshot.audio {
            self.status = format!("Audio ready ({})", clip.id);
        }
        self.generation = snapshot;
    }

    fn show_error(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
        self.status = err.message().to_string();
        self.status_banner = Some(StatusBanner {
            severity: StatusBannerSeverity::Error,
            message: err.banner_text(),
        });
    }

    fn submit(&mut self) {
        if !control_panel::can_submit(&self.form, self.generation.loading) {
            return;
        }
        let request = self.form.snapshot();
        tracing::info!(
            language = request.language().code(),
            text_chars = request.text().chars().count(),
            "submitting synthesis request"
        );
        self.queue(BackendCommand::Generate(request));
    }

    fn handle_output_action(&mut self, action: OutputAction) {
        match action {
            OutputAction::None => {}
            OutputAction::TogglePlayback(clip) => self.toggle_playback(&clip),
            OutputAction::Save(clip) => self.save_clip(&clip),
        }
    }

    fn toggle_playback(&mut self, clip: &AudioClipView) {
        if self.player.is_playing(clip.id) {
            self.player.stop();
            return;
        }
        if let Err(message) = self.player.play(clip) {
            self.show_error(UiError::from_message(UiErrorContext::Playback, message));
        }
    }

    fn save_clip(&mut self, clip: &AudioClipView) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(OUTPUT_FILE_NAME)
            .add_filter("WAV audio", &["wav"])
            .save_file()
        else {
            return;
        };
        match clip.save_as(&path) {
            Ok(()) => {
                tracing::info!(clip = %clip.id, path = %path.display(), "saved audio");
                self.status = format!("Saved {}", path.display());
            }
            Err(err) => self.show_error(UiError::from_message(
                UiErrorContext::SaveAudio,
                format!("failed to save {}: {err}", path.display()),
            )),
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.weak(&self.status);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Refresh backend status").clicked() {
                    self.queue(BackendCommand::CheckBackend);
                }
            });
        });
    }
}

impl eframe::App for TtsGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if ctx.input(|i| i.viewport().close_requested()) && !self.shutdown_sent {
            self.player.stop();
            self.shutdown_sent = self.queue(BackendCommand::ClearOutput);
        }

        egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
            ui.add_space(6.0);
            navbar::show(ui, &mut self.view_state, self.backend.as_ref());
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_max_width(720.0);
                match self.view_state {
                    ViewState::Tts => {
                        let action = control_panel::show(
                            ui,
                            &mut self.form,
                            &mut self.seed,
                            self.generation.loading,
                        );
                        if action == ControlPanelAction::Submit {
                            self.submit();
                        }
                    }
                    ViewState::Output => {
                        let playing = self
                            .generation
                            .audio
                            .as_ref()
                            .is_some_and(|clip| self.player.is_playing(clip.id));
                        let action = audio_output::show(ui, &self.generation, playing);
                        self.handle_output_action(action);
                    }
                }
            });
        });

        let repaint_after = if self.generation.loading {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };
        ctx.request_repaint_after(repaint_after);
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
