use crate::audio::AudioClipView;

/// Which top-level panel is visible. Independent of what the panels show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Tts,
    Output,
}

impl ViewState {
    /// Menu entries, in display order.
    pub const NAV_ITEMS: [ViewState; 2] = [ViewState::Tts, ViewState::Output];

    pub fn label(self) -> &'static str {
        match self {
            ViewState::Tts => "TTS",
            ViewState::Output => "Output",
        }
    }
}

/// The one rendering the result panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputView<'a> {
    Error(&'a str),
    Loading,
    Ready(&'a AudioClipView),
    Placeholder,
}

impl<'a> OutputView<'a> {
    /// Error beats loading, loading beats a finished clip, and a clip beats
    /// the placeholder.
    pub fn derive(
        error: Option<&'a str>,
        loading: bool,
        audio: Option<&'a AudioClipView>,
    ) -> Self {
        match (error, loading, audio) {
            (Some(message), _, _) => OutputView::Error(message),
            (None, true, _) => OutputView::Loading,
            (None, false, Some(clip)) => OutputView::Ready(clip),
            (None, false, None) => OutputView::Placeholder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioClip;

    #[test]
    fn nav_items_are_tts_then_output() {
        let labels: Vec<_> = ViewState::NAV_ITEMS.iter().map(|v| v.label()).collect();
        assert_eq!(labels, ["TTS", "Output"]);
        assert_eq!(ViewState::default(), ViewState::Tts);
    }

    #[test]
    fn error_wins_over_loading_and_audio() {
        let clip = AudioClip::store(b"wav".to_vec()).expect("store");
        let view = clip.view();
        assert_eq!(
            OutputView::derive(Some("x"), true, Some(&view)),
            OutputView::Error("x")
        );
        assert_eq!(
            OutputView::derive(Some("x"), false, None),
            OutputView::Error("x")
        );
    }

    #[test]
    fn loading_wins_over_audio() {
        let clip = AudioClip::store(b"wav".to_vec()).expect("store");
        let view = clip.view();
        assert_eq!(OutputView::derive(None, true, Some(&view)), OutputView::Loading);
        assert_eq!(OutputView::derive(None, true, None), OutputView::Loading);
    }

    #[test]
    fn audio_wins_over_placeholder() {
        let clip = AudioClip::store(b"wav".to_vec()).expect("store");
        let view = clip.view();
        assert_eq!(
            OutputView::derive(None, false, Some(&view)),
            OutputView::Ready(&view)
        );
        assert_eq!(OutputView::derive(None, false, None), OutputView::Placeholder);
    }
}
