//! Local handle for synthesized audio.
//!
//! An [`AudioClip`] is the desktop counterpart of a browser object URL: the
//! WAV payload lives in a temporary file for as long as the clip is alive, and
//! dropping the clip revokes it by deleting that file.

use std::{
    fmt,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::debug;

static NEXT_CLIP_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(pub u64);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip-{}", self.0)
    }
}

pub struct AudioClip {
    id: ClipId,
    bytes: Arc<[u8]>,
    file: NamedTempFile,
    created_at: DateTime<Utc>,
}

impl AudioClip {
    /// Writes `bytes` to a fresh temporary `.wav` file and takes ownership of it.
    pub fn store(bytes: Vec<u8>) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("tts-output-")
            .suffix(".wav")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;

        let id = ClipId(NEXT_CLIP_ID.fetch_add(1, Ordering::Relaxed));
        debug!(clip = %id, path = %file.path().display(), size_bytes = bytes.len(), "stored audio clip");
        Ok(Self {
            id,
            bytes: bytes.into(),
            file,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A cheap, render-only view of this clip.
    pub fn view(&self) -> AudioClipView {
        AudioClipView {
            id: self.id,
            bytes: Arc::clone(&self.bytes),
            path: self.file.path().to_path_buf(),
            created_at: self.created_at,
        }
    }

    /// Revokes the clip now instead of waiting for it to go out of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for AudioClip {
    fn drop(&mut self) {
        debug!(clip = %self.id, path = %self.file.path().display(), "released audio clip");
    }
}

impl fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClip")
            .field("id", &self.id)
            .field("size_bytes", &self.bytes.len())
            .field("path", &self.file.path())
            .finish()
    }
}

/// Snapshot of a clip handed to the UI for one render pass. The path stops
/// resolving once the owning [`AudioClip`] is released.
#[derive(Clone)]
pub struct AudioClipView {
    pub id: ClipId,
    pub bytes: Arc<[u8]>,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl AudioClipView {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Writes the clip bytes to `destination`.
    pub fn save_as(&self, destination: &Path) -> io::Result<()> {
        std::fs::write(destination, &self.bytes)
    }
}

impl fmt::Debug for AudioClipView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioClipView")
            .field("id", &self.id)
            .field("size_bytes", &self.bytes.len())
            .field("path", &self.path)
            .finish()
    }
}

impl PartialEq for AudioClipView {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_clip_is_backed_by_a_wav_file_until_released() {
        let clip = AudioClip::store(b"RIFF0000WAVE".to_vec()).expect("store");
        let path = clip.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("wav"));
        assert_eq!(std::fs::read(&path).expect("read"), b"RIFF0000WAVE");
        assert_eq!(clip.len(), 12);

        clip.release();
        assert!(!path.exists());
    }

    #[test]
    fn clip_ids_are_unique() {
        let a = AudioClip::store(Vec::new()).expect("store");
        let b = AudioClip::store(Vec::new()).expect("store");
        assert_ne!(a.id(), b.id());
        assert!(a.is_empty());
    }

    #[test]
    fn view_keeps_bytes_after_the_clip_is_released() {
        let clip = AudioClip::store(b"wav-bytes".to_vec()).expect("store");
        let view = clip.view();
        drop(clip);

        assert!(!view.path.exists());
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("out.wav");
        view.save_as(&destination).expect("save");
        assert_eq!(std::fs::read(destination).expect("read"), b"wav-bytes");
    }
}
