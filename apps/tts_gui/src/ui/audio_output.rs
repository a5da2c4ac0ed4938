use client_core::{AudioClipView, GenerationSnapshot, OutputView};
use eframe::egui;

use super::navbar::ACCENT;

pub enum OutputAction {
    None,
    TogglePlayback(AudioClipView),
    Save(AudioClipView),
}

pub fn show(ui: &mut egui::Ui, snapshot: &GenerationSnapshot, playing: bool) -> OutputAction {
    ui.heading(egui::RichText::new("Output audio").color(ACCENT));
    ui.add_space(8.0);

    let mut action = OutputAction::None;
    egui::Frame::NONE
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(16, 16))
        .show(ui, |ui| {
            ui.set_min_height(200.0);
            ui.vertical_centered(|ui| match snapshot.output() {
                OutputView::Error(message) => show_error(ui, message),
                OutputView::Loading => {
                    ui.spinner();
                    ui.label(egui::RichText::new("Synthesizing... please wait.").color(ACCENT));
                }
                OutputView::Ready(clip) => action = show_clip(ui, clip, playing),
                OutputView::Placeholder => {
                    ui.label(
                        egui::RichText::new("The synthesized speech will appear here.")
                            .italics()
                            .weak(),
                    );
                }
            });
        });
    action
}

fn show_error(ui: &mut egui::Ui, message: &str) {
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(111, 53, 53))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new("Generation error")
                    .strong()
                    .color(egui::Color32::from_rgb(248, 113, 113)),
            );
            ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(252, 165, 165)));
        });
}

fn show_clip(ui: &mut egui::Ui, clip: &AudioClipView, playing: bool) -> OutputAction {
    let mut action = OutputAction::None;
    ui.horizontal(|ui| {
        let label = if playing { "⏹ Stop" } else { "▶ Play" };
        if ui.button(label).clicked() {
            action = OutputAction::TogglePlayback(clip.clone());
        }
        ui.weak(format!(
            "{} · {}",
            human_readable_bytes(clip.size_bytes() as u64),
            clip.created_at.format("%H:%M:%S")
        ));
    });
    ui.add_space(6.0);
    if ui.link("Download audio (.wav)").clicked() {
        action = OutputAction::Save(clip.clone());
    }
    action
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    format_scaled_unit(bytes, MB, "MB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}

#[cfg(test)]
mod tests {
    use super::human_readable_bytes;

    #[test]
    fn formats_clip_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(3 * 1024 * 1024), "3 MB");
    }
}
