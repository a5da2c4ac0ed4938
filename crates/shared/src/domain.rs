use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::UnknownLanguage;

/// Hard cap on the number of characters sent as `text_input`.
pub const MAX_TEXT_CHARS: usize = 800;

macro_rules! languages {
    ($($variant:ident => ($code:literal, $name:literal)),+ $(,)?) => {
        /// Languages the multilingual backend model accepts.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Language {
            $($variant,)+
        }

        impl Language {
            pub const ALL: &'static [Language] = &[$(Language::$variant),+];

            pub fn code(self) -> &'static str {
                match self {
                    $(Language::$variant => $code,)+
                }
            }

            pub fn display_name(self) -> &'static str {
                match self {
                    $(Language::$variant => $name,)+
                }
            }
        }

        impl FromStr for Language {
            type Err = UnknownLanguage;

            fn from_str(code: &str) -> Result<Self, Self::Err> {
                match code.trim().to_ascii_lowercase().as_str() {
                    $($code => Ok(Language::$variant),)+
                    _ => Err(UnknownLanguage(code.to_string())),
                }
            }
        }
    };
}

languages! {
    Arabic => ("ar", "Arabic"),
    Danish => ("da", "Danish"),
    German => ("de", "German"),
    Greek => ("el", "Greek"),
    English => ("en", "English"),
    Spanish => ("es", "Spanish"),
    Finnish => ("fi", "Finnish"),
    French => ("fr", "French"),
    Hebrew => ("he", "Hebrew"),
    Hindi => ("hi", "Hindi"),
    Italian => ("it", "Italian"),
    Japanese => ("ja", "Japanese"),
    Korean => ("ko", "Korean"),
    Malay => ("ms", "Malay"),
    Dutch => ("nl", "Dutch"),
    Norwegian => ("no", "Norwegian"),
    Polish => ("pl", "Polish"),
    Portuguese => ("pt", "Portuguese"),
    Russian => ("ru", "Russian"),
    Swedish => ("sv", "Swedish"),
    Swahili => ("sw", "Swahili"),
    Turkish => ("tr", "Turkish"),
    Chinese => ("zh", "Chinese"),
}

impl Default for Language {
    fn default() -> Self {
        Language::Italian
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

/// Inclusive bounds of a slider-backed synthesis parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ParamRange {
    /// Clamps `value` into `[min, max]`. NaN collapses to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

pub const EXAGGERATION: ParamRange = ParamRange {
    min: 0.25,
    max: 2.0,
    step: 0.05,
    default: 0.5,
};

pub const CFG_WEIGHT: ParamRange = ParamRange {
    min: 0.2,
    max: 1.0,
    step: 0.05,
    default: 0.5,
};

pub const TEMPERATURE: ParamRange = ParamRange {
    min: 0.05,
    max: 5.0,
    step: 0.05,
    default: 0.8,
};

/// Voice sample used to condition the synthesized voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAudio {
    file_name: String,
    path: PathBuf,
}

impl ReferenceAudio {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "reference.wav".to_string());
        Self { file_name, path }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One frozen set of synthesis parameters, produced by
/// [`SynthesisForm::snapshot`](crate::form::SynthesisForm::snapshot).
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub(crate) text: String,
    pub(crate) language: Language,
    pub(crate) reference_audio: Option<ReferenceAudio>,
    pub(crate) exaggeration: f64,
    pub(crate) cfg_weight: f64,
    pub(crate) temperature: f64,
    pub(crate) seed: u64,
}

impl SynthesisRequest {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn reference_audio(&self) -> Option<&ReferenceAudio> {
        self.reference_audio.as_ref()
    }

    pub fn exaggeration(&self) -> f64 {
        self.exaggeration
    }

    pub fn cfg_weight(&self) -> f64 {
        self.cfg_weight
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// `0` asks the backend for a random seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_round_trip_through_from_str() {
        for language in Language::ALL {
            assert_eq!(language.code().parse::<Language>().ok(), Some(*language));
        }
        assert_eq!(Language::ALL.len(), 23);
        assert_eq!(" IT ".parse::<Language>().ok(), Some(Language::Italian));
        assert!("xx".parse::<Language>().is_err());
    }

    #[test]
    fn language_displays_name_and_code() {
        assert_eq!(Language::Japanese.code(), "ja");
        assert_eq!(Language::Japanese.to_string(), "Japanese (ja)");
    }

    #[test]
    fn param_range_clamps_out_of_range_and_nan_values() {
        assert_eq!(EXAGGERATION.clamp(9.0), 2.0);
        assert_eq!(EXAGGERATION.clamp(-1.0), 0.25);
        assert_eq!(CFG_WEIGHT.clamp(f64::NAN), 0.2);
        assert_eq!(TEMPERATURE.clamp(f64::INFINITY), 5.0);
        assert_eq!(TEMPERATURE.clamp(f64::NEG_INFINITY), 0.05);
        assert_eq!(TEMPERATURE.clamp(1.25), 1.25);
    }

    #[test]
    fn reference_audio_takes_file_name_from_path() {
        let audio = ReferenceAudio::from_path("/tmp/voices/me.wav");
        assert_eq!(audio.file_name(), "me.wav");
        assert_eq!(ReferenceAudio::from_path("/").file_name(), "reference.wav");
    }
}
