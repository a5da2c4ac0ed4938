//! Backend commands queued from UI to backend worker.

use shared::domain::SynthesisRequest;

#[derive(Debug)]
pub enum BackendCommand {
    /// Start a synthesis, superseding whatever is still in flight.
    Generate(SynthesisRequest),
    CheckBackend,
    /// Drop the current clip and cancel any request.
    ClearOutput,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Generate(_) => "generate",
            BackendCommand::CheckBackend => "check_backend",
            BackendCommand::ClearOutput => "clear_output",
        }
    }
}
