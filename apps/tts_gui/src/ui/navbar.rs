use client_core::ViewState;
use eframe::egui;
use shared::protocol::BackendStatus;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(96, 165, 250);

/// Title block plus one entry per [`ViewState::NAV_ITEMS`]; clicking an entry
/// switches `current`.
pub fn show(ui: &mut egui::Ui, current: &mut ViewState, backend: Option<&BackendStatus>) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(
                egui::RichText::new("Text to Speech")
                    .strong()
                    .size(18.0)
                    .color(ACCENT),
            );
            ui.weak("Multilingual TTS Interface");
        });

        ui.add_space(24.0);
        for item in ViewState::NAV_ITEMS {
            let label = if *current == item {
                egui::RichText::new(item.label()).strong().color(ACCENT)
            } else {
                egui::RichText::new(item.label())
            };
            ui.selectable_value(&mut *current, item, label);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            match backend {
                Some(status) if status.is_ready() => {
                    ui.label(
                        egui::RichText::new(format!("● model ready on {}", status.device))
                            .color(egui::Color32::from_rgb(74, 222, 128)),
                    );
                }
                Some(status) => {
                    ui.label(
                        egui::RichText::new(format!("● backend {} (model not loaded)", status.status))
                            .color(egui::Color32::from_rgb(250, 204, 21)),
                    );
                }
                None => {
                    ui.weak("● backend status unknown");
                }
            }
        });
    });
}
