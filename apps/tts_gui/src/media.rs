//! Clip playback through `rodio`.
//!
//! The output stream is opened on first use and kept for the life of the
//! app; `rodio::OutputStream` is not `Send`, so the player stays on the UI
//! thread.

use std::io::Cursor;

use client_core::{AudioClipView, ClipId};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

#[derive(Default)]
pub struct AudioPlayer {
    output: Option<Output>,
    sink: Option<Sink>,
    current: Option<ClipId>,
}

impl AudioPlayer {
    pub fn play(&mut self, clip: &AudioClipView) -> Result<(), String> {
        self.stop();

        if self.output.is_none() {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|err| format!("no audio output device available: {err}"))?;
            tracing::info!("audio output stream opened");
            self.output = Some(Output {
                _stream: stream,
                handle,
            });
        }
        let Some(output) = self.output.as_ref() else {
            return Err("audio output stream unavailable".to_string());
        };

        let source = Decoder::new(Cursor::new(clip.bytes.clone()))
            .map_err(|err| format!("failed to decode {}: {err}", clip.id))?;
        let sink = Sink::try_new(&output.handle)
            .map_err(|err| format!("failed to open audio stream sink: {err}"))?;
        sink.append(source);

        tracing::debug!(clip = %clip.id, size_bytes = clip.size_bytes(), "playback started");
        self.sink = Some(sink);
        self.current = Some(clip.id);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.current = None;
    }

    /// Whether `clip` is the one currently audible.
    pub fn is_playing(&self, clip: ClipId) -> bool {
        self.current == Some(clip) && self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    /// Stops playback unless it belongs to `clip`; used when the shown clip changes.
    pub fn retain(&mut self, clip: Option<ClipId>) {
        if self.current.is_some() && self.current != clip {
            self.stop();
        }
    }
}
