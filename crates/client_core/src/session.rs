//! Generation state and the one operation that mutates it.
//!
//! A [`SynthesisSession`] owns the loading flag, the current clip, and the
//! current error. Every request gets a [`RequestTicket`]; only the newest
//! ticket may write results or clear the loading flag, so a late answer to a
//! superseded request is dropped on arrival.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::{domain::SynthesisRequest, error::SynthesisError};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, error, info};

use crate::{
    audio::{AudioClip, AudioClipView},
    view::OutputView,
    SynthesisBackend,
};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(pub u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationSnapshot {
    pub generation: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub audio: Option<AudioClipView>,
}

impl GenerationSnapshot {
    pub fn output(&self) -> OutputView<'_> {
        OutputView::derive(self.error.as_deref(), self.loading, self.audio.as_ref())
    }
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(GenerationSnapshot),
}

#[derive(Debug, Default)]
struct GenerationState {
    generation: u64,
    loading: bool,
    audio: Option<AudioClip>,
    error: Option<String>,
}

impl GenerationState {
    fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        if let Some(previous) = self.audio.take() {
            previous.release();
        }
        RequestTicket(self.generation)
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        self.generation == ticket.0
    }

    /// Stores the outcome and clears the loading flag in one step. Returns the
    /// resulting snapshot, or `None` when `ticket` has been superseded.
    fn finish(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<AudioClip, SynthesisError>,
    ) -> Option<GenerationSnapshot> {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding result of superseded generation"
            );
            return None;
        }

        match outcome {
            Ok(clip) => {
                self.audio = Some(clip);
                self.error = None;
            }
            Err(err) => {
                self.audio = None;
                self.error = Some(err.user_message());
            }
        }
        self.loading = false;
        Some(self.snapshot())
    }

    fn settle(&mut self, ticket: RequestTicket) -> bool {
        if self.is_current(ticket) && self.loading {
            self.loading = false;
            true
        } else {
            false
        }
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.error = None;
        if let Some(previous) = self.audio.take() {
            previous.release();
        }
    }

    fn snapshot(&self) -> GenerationSnapshot {
        GenerationSnapshot {
            generation: self.generation,
            loading: self.loading,
            error: self.error.clone(),
            audio: self.audio.as_ref().map(AudioClip::view),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the loading flag when a request exits without finishing, e.g. when
/// its task is aborted. A finished request has already cleared it.
struct SettleGuard {
    state: Arc<Mutex<GenerationState>>,
    events: broadcast::Sender<SessionEvent>,
    ticket: RequestTicket,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        let snapshot = {
            let mut state = lock(&self.state);
            if !state.settle(self.ticket) {
                return;
            }
            state.snapshot()
        };
        let _ = self.events.send(SessionEvent::StateChanged(snapshot));
    }
}

pub struct SynthesisSession {
    backend: Arc<dyn SynthesisBackend>,
    state: Arc<Mutex<GenerationState>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SynthesisSession {
    pub fn new(backend: Arc<dyn SynthesisBackend>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            state: Arc::new(Mutex::new(GenerationState::default())),
            in_flight: Mutex::new(None),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> GenerationSnapshot {
        lock(&self.state).snapshot()
    }

    /// Runs one request to completion and returns the resulting state.
    ///
    /// Never fails: server and transport errors end up in the snapshot's
    /// `error` field. If another request starts before this one resolves,
    /// this one's result is discarded.
    pub async fn generate(&self, request: SynthesisRequest) -> GenerationSnapshot {
        let ticket = self.begin();
        self.run(ticket, request).await;
        self.snapshot()
    }

    /// Starts a request in the background, cancelling whichever request was
    /// still in flight. Must be called from within a tokio runtime.
    pub fn spawn_generate(self: &Arc<Self>, request: SynthesisRequest) -> RequestTicket {
        let mut in_flight = lock(&self.in_flight);
        if let Some(task) = in_flight.take() {
            if !task.is_finished() {
                info!("cancelling superseded generation");
            }
            task.abort();
        }

        let ticket = self.begin();
        let session = Arc::clone(self);
        *in_flight = Some(tokio::spawn(async move {
            session.run(ticket, request).await;
        }));
        ticket
    }

    /// Cancels any in-flight request and releases the current clip.
    pub fn clear(&self) {
        if let Some(task) = lock(&self.in_flight).take() {
            task.abort();
        }
        let snapshot = {
            let mut state = lock(&self.state);
            state.reset();
            state.snapshot()
        };
        self.publish(snapshot);
    }

    fn begin(&self) -> RequestTicket {
        let (ticket, snapshot) = {
            let mut state = lock(&self.state);
            let ticket = state.begin();
            (ticket, state.snapshot())
        };
        debug!(ticket = ticket.0, "generation started");
        self.publish(snapshot);
        ticket
    }

    async fn run(&self, ticket: RequestTicket, request: SynthesisRequest) {
        let _settle = SettleGuard {
            state: Arc::clone(&self.state),
            events: self.events.clone(),
            ticket,
        };

        let outcome = match self.backend.synthesize(&request).await {
            Ok(bytes) => store_clip(bytes).await,
            Err(err) => Err(err),
        };
        if let Err(err) = &outcome {
            error!(ticket = ticket.0, status = ?err.status(), error = %err, "generation failed");
        }

        let finished = lock(&self.state).finish(ticket, outcome);
        if let Some(snapshot) = finished {
            self.publish(snapshot);
        }
    }

    fn publish(&self, snapshot: GenerationSnapshot) {
        let _ = self.events.send(SessionEvent::StateChanged(snapshot));
    }
}

/// Writes the clip's temporary file on the blocking pool.
async fn store_clip(bytes: Vec<u8>) -> Result<AudioClip, SynthesisError> {
    tokio::task::spawn_blocking(move || AudioClip::store(bytes))
        .await
        .map_err(|err| SynthesisError::Storage(err.to_string()))?
        .map_err(|err| SynthesisError::Storage(err.to_string()))
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
