//! UI layer: app shell, navigation bar, and the two panels it switches between.

pub mod app;
pub mod audio_output;
pub mod control_panel;
pub mod navbar;

pub use app::TtsGuiApp;
