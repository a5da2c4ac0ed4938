use super::*;

#[test]
fn unreachable_backend_is_a_transport_error() {
    let err = UiError::from_message(
        UiErrorContext::BackendStatus,
        "failed to reach backend at http://127.0.0.1:5173/api/: connection refused",
    );
    assert_eq!(err.category(), UiErrorCategory::Transport);
    assert_eq!(err.context(), UiErrorContext::BackendStatus);
    assert!(err.banner_text().starts_with("Transport error: "));
}

#[test]
fn undecodable_clip_is_an_audio_error() {
    let err = UiError::from_message(
        UiErrorContext::Playback,
        "failed to decode clip-3: unrecognized format",
    );
    assert_eq!(err.category(), UiErrorCategory::Audio);
}

#[test]
fn bad_status_document_is_a_validation_error() {
    let err = UiError::from_message(
        UiErrorContext::BackendStatus,
        "backend returned an unexpected status document",
    );
    assert_eq!(err.category(), UiErrorCategory::Validation);
}

#[test]
fn anything_else_is_unexpected() {
    let err = UiError::from_message(UiErrorContext::SaveAudio, "permission denied");
    assert_eq!(err.category(), UiErrorCategory::Unknown);
    assert_eq!(err.message(), "permission denied");
    assert_eq!(err.banner_text(), "Unexpected error: permission denied");
}
