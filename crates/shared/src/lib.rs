//! Types shared by the TTS client, its command-line front end, and the development proxy.

pub mod domain;
pub mod error;
pub mod form;
pub mod protocol;
