//! Worker side of the GUI: commands in, `UiEvent`s out.

pub mod commands;
pub mod runtime;
