use std::path::PathBuf;

use eframe::egui;
use shared::{
    domain::{Language, ParamRange, CFG_WEIGHT, EXAGGERATION, MAX_TEXT_CHARS, TEMPERATURE},
    form::SynthesisForm,
};

use super::navbar::ACCENT;

const REFERENCE_AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "m4a", "aac", "webm"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Submit,
}

/// Draft of the seed field; the form only ever holds the parsed value.
#[derive(Debug, Clone)]
pub struct SeedInput {
    text: String,
}

impl SeedInput {
    pub fn new(seed: u64) -> Self {
        Self {
            text: seed.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Stores the raw edit and pushes its parsed value into `form`.
    pub fn edit(&mut self, raw: String, form: &mut SynthesisForm) {
        form.set_seed_text(&raw);
        self.text = raw;
    }

    /// Replaces the draft with what the form actually holds.
    pub fn normalize(&mut self, form: &SynthesisForm) {
        self.text = form.seed().to_string();
    }
}

pub fn can_submit(form: &SynthesisForm, loading: bool) -> bool {
    !loading && !form.text().trim().is_empty()
}

pub fn show(
    ui: &mut egui::Ui,
    form: &mut SynthesisForm,
    seed: &mut SeedInput,
    loading: bool,
) -> ControlPanelAction {
    ui.heading(egui::RichText::new("Synthesis controls").color(ACCENT));
    ui.add_space(8.0);

    ui.label(
        egui::RichText::new(format!("Text to synthesize (max {MAX_TEXT_CHARS} characters)"))
            .strong(),
    );
    let mut text = form.text().to_string();
    let response = ui.add(
        egui::TextEdit::multiline(&mut text)
            .char_limit(MAX_TEXT_CHARS)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        form.set_text(text);
    }
    ui.weak(format!("{}/{MAX_TEXT_CHARS}", form.text_chars()));
    ui.add_space(6.0);

    ui.label(egui::RichText::new("Language").strong());
    let mut language = form.language();
    egui::ComboBox::from_id_salt("language")
        .selected_text(language.to_string())
        .width(ui.available_width().min(320.0))
        .show_ui(ui, |ui| {
            for &option in Language::ALL {
                ui.selectable_value(&mut language, option, option.to_string());
            }
        });
    if language != form.language() {
        form.set_language(language);
    }
    ui.add_space(6.0);

    show_reference_audio(ui, form);
    ui.add_space(6.0);

    if let Some(value) = param_slider(ui, "Exaggeration", EXAGGERATION, form.exaggeration()) {
        form.set_exaggeration(value);
    }
    if let Some(value) = param_slider(ui, "CFG/Pace", CFG_WEIGHT, form.cfg_weight()) {
        form.set_cfg_weight(value);
    }

    egui::CollapsingHeader::new("Advanced options")
        .id_salt("advanced_options")
        .show(ui, |ui| {
            if let Some(value) = param_slider(ui, "Temperature", TEMPERATURE, form.temperature()) {
                form.set_temperature(value);
            }
            ui.label("Random seed (0 for random)");
            let mut draft = seed.text().to_string();
            let response = ui.add(egui::TextEdit::singleline(&mut draft).desired_width(160.0));
            if response.changed() {
                seed.edit(draft, form);
            }
            if response.lost_focus() {
                seed.normalize(form);
            }
        });

    ui.add_space(10.0);
    let label = if loading {
        "Generating..."
    } else {
        "Generate audio"
    };
    let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
        .min_size(egui::vec2(ui.available_width(), 36.0));
    if ui.add_enabled(can_submit(form, loading), button).clicked() {
        ControlPanelAction::Submit
    } else {
        ControlPanelAction::None
    }
}

fn show_reference_audio(ui: &mut egui::Ui, form: &mut SynthesisForm) {
    ui.label(egui::RichText::new("Reference audio (target voice, optional)").strong());
    ui.horizontal(|ui| {
        if ui.button("Choose file...").clicked() {
            if let Some(path) = pick_reference_audio() {
                form.set_reference_audio(Some(path));
            }
        }
        let selected = form.reference_audio().map(|audio| audio.file_name().to_string());
        match selected {
            Some(name) => {
                ui.label("Selected file:");
                ui.monospace(name);
                if ui.small_button("✕").on_hover_text("Remove").clicked() {
                    form.set_reference_audio(None);
                }
            }
            None => {
                ui.weak("No file selected");
            }
        }
    });
    ui.weak("Lower CFG/Pace to reduce accent transfer from the reference voice.");
}

fn pick_reference_audio() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Choose reference audio")
        .add_filter("Audio", REFERENCE_AUDIO_EXTENSIONS)
        .pick_file()
}

/// Returns the new value when the user moved the slider.
fn param_slider(ui: &mut egui::Ui, label: &str, range: ParamRange, current: f64) -> Option<f64> {
    let mut value = current;
    ui.label(format!(
        "{label}: {value:.2} ({} - {})",
        range.min, range.max
    ));
    let response = ui.add(
        egui::Slider::new(&mut value, range.min..=range.max)
            .step_by(range.step)
            .fixed_decimals(2)
            .show_value(false),
    );
    response.changed().then_some(value)
}
