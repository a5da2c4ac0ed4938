//! Editable state behind the synthesis controls.
//!
//! Every setter enforces its field's constraint at edit time, so
//! [`SynthesisForm::snapshot`] never has anything left to validate.

use std::path::PathBuf;

use crate::domain::{
    Language, ReferenceAudio, SynthesisRequest, CFG_WEIGHT, EXAGGERATION, MAX_TEXT_CHARS,
    TEMPERATURE,
};

pub const DEFAULT_TEXT: &str = "Il mese scorso abbiamo raggiunto un nuovo traguardo: due miliardi di visualizzazioni sul nostro canale YouTube.";

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisForm {
    text: String,
    language: Language,
    reference_audio: Option<ReferenceAudio>,
    exaggeration: f64,
    cfg_weight: f64,
    temperature: f64,
    seed: u64,
}

impl Default for SynthesisForm {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            language: Language::default(),
            reference_audio: None,
            exaggeration: EXAGGERATION.default,
            cfg_weight: CFG_WEIGHT.default,
            temperature: TEMPERATURE.default,
            seed: 0,
        }
    }
}

impl SynthesisForm {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Stores at most the first [`MAX_TEXT_CHARS`] characters of `text`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = truncate_chars(text.into(), MAX_TEXT_CHARS);
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn reference_audio(&self) -> Option<&ReferenceAudio> {
        self.reference_audio.as_ref()
    }

    /// A new selection replaces the previous one; `None` clears it.
    pub fn set_reference_audio(&mut self, path: Option<PathBuf>) {
        self.reference_audio = path.map(ReferenceAudio::from_path);
    }

    pub fn exaggeration(&self) -> f64 {
        self.exaggeration
    }

    pub fn set_exaggeration(&mut self, value: f64) {
        self.exaggeration = EXAGGERATION.clamp(value);
    }

    pub fn cfg_weight(&self) -> f64 {
        self.cfg_weight
    }

    pub fn set_cfg_weight(&mut self, value: f64) {
        self.cfg_weight = CFG_WEIGHT.clamp(value);
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = TEMPERATURE.clamp(value);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Parses the leading digits of `raw`; anything unparseable (including a
    /// negative sign) becomes `0`, i.e. a random seed.
    pub fn set_seed_text(&mut self, raw: &str) {
        let digits: String = raw
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        self.seed = digits.parse().unwrap_or(0);
    }

    pub fn snapshot(&self) -> SynthesisRequest {
        SynthesisRequest {
            text: self.text.clone(),
            language: self.language,
            reference_audio: self.reference_audio.clone(),
            exaggeration: self.exaggeration,
            cfg_weight: self.cfg_weight,
            temperature: self.temperature,
            seed: self.seed,
        }
    }
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParamRange;

    fn within(range: ParamRange, value: f64) -> bool {
        (range.min..=range.max).contains(&value)
    }

    #[test]
    fn overlong_text_keeps_exactly_the_first_800_characters() {
        let mut form = SynthesisForm::default();
        let input: String = (0..1000).map(|i| if i % 2 == 0 { 'a' } else { 'é' }).collect();
        form.set_text(input.clone());

        let expected: String = input.chars().take(MAX_TEXT_CHARS).collect();
        assert_eq!(form.text(), expected);
        assert_eq!(form.text_chars(), MAX_TEXT_CHARS);
    }

    #[test]
    fn text_within_the_limit_is_stored_unchanged() {
        let mut form = SynthesisForm::default();
        form.set_text("ciao");
        assert_eq!(form.text(), "ciao");

        let exact = "x".repeat(MAX_TEXT_CHARS);
        form.set_text(exact.clone());
        assert_eq!(form.text(), exact);
    }

    #[test]
    fn slider_setters_stay_within_bounds() {
        let mut form = SynthesisForm::default();
        for value in [-100.0, -0.0, 0.1, 0.7, 3.3, 1e9, f64::NAN, f64::INFINITY] {
            form.set_exaggeration(value);
            form.set_cfg_weight(value);
            form.set_temperature(value);
            assert!(within(EXAGGERATION, form.exaggeration()), "{value}");
            assert!(within(CFG_WEIGHT, form.cfg_weight()), "{value}");
            assert!(within(TEMPERATURE, form.temperature()), "{value}");
        }
    }

    #[test]
    fn seed_text_is_coerced_to_an_unsigned_integer() {
        let mut form = SynthesisForm::default();
        form.set_seed_text("42");
        assert_eq!(form.seed(), 42);
        form.set_seed_text("  17abc");
        assert_eq!(form.seed(), 17);
        form.set_seed_text("abc");
        assert_eq!(form.seed(), 0);
        form.set_seed_text("-5");
        assert_eq!(form.seed(), 0);
        form.set_seed_text("99999999999999999999999");
        assert_eq!(form.seed(), 0);
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut form = SynthesisForm::default();
        form.set_reference_audio(Some(PathBuf::from("/tmp/a.wav")));
        form.set_reference_audio(Some(PathBuf::from("/tmp/b.wav")));
        form.set_language(Language::English);
        form.set_seed(7);

        let request = form.snapshot();
        form.set_text("changed");
        form.set_reference_audio(None);

        assert_eq!(request.text(), DEFAULT_TEXT);
        assert_eq!(request.language(), Language::English);
        assert_eq!(request.seed(), 7);
        assert_eq!(
            request.reference_audio().map(ReferenceAudio::file_name),
            Some("b.wav")
        );
        assert_eq!(request.exaggeration(), 0.5);
        assert_eq!(request.cfg_weight(), 0.5);
        assert_eq!(request.temperature(), 0.8);
    }
}
