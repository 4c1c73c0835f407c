use std::future::Future;

use tokio::sync::watch;
use tracing::warn;

use crate::error::Failure;

use super::feedback::{Feedback, LOAD_FAILED};
use super::phase::{Phase, ViewState};

/// Read-only collection view: fetch, show, refetch.
#[derive(Debug)]
pub struct Listing<T> {
    items: Vec<T>,
    phase: Phase,
    feedback: Feedback,
    last_failure: Option<Failure>,
    state: watch::Sender<ViewState>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Listing<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            items: Vec::new(),
            phase: Phase::Idle,
            feedback: Feedback::default(),
            last_failure: None,
            state,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn error_message(&self) -> &str {
        self.feedback.error_message()
    }

    pub fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Replace the items with a fresh fetch. On failure the previous items
    /// are dropped too, so stale data is never shown as current.
    pub async fn load<E, Fut>(&mut self, fetch: impl FnOnce() -> Fut) -> bool
    where
        Fut: Future<Output = Result<Vec<T>, E>>,
        Failure: From<E>,
    {
        self.load_page(fetch, std::mem::take).await.is_some()
    }

    /// Like [`load`](Self::load) for responses that wrap the items (paged
    /// listings). `items` moves the items out; the rest of the response is
    /// returned.
    pub async fn load_page<P, E, Fut>(
        &mut self,
        fetch: impl FnOnce() -> Fut,
        items: impl FnOnce(&mut P) -> Vec<T>,
    ) -> Option<P>
    where
        Fut: Future<Output = Result<P, E>>,
        Failure: From<E>,
    {
        self.feedback.clear();
        self.last_failure = None;
        self.set_phase(Phase::Loading);

        match fetch().await {
            Ok(mut response) => {
                self.items = items(&mut response);
                self.set_phase(Phase::Viewing);
                Some(response)
            }
            Err(e) => {
                let failure = Failure::from(e);
                warn!(message = %failure.message(LOAD_FAILED), "listing load failed");
                self.items.clear();
                self.feedback.set_error(failure.message(LOAD_FAILED));
                self.last_failure = Some(failure);
                self.set_phase(Phase::LoadFailed);
                None
            }
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.state.send_replace(ViewState {
            phase,
            loading: phase == Phase::Loading,
            feedback: self.feedback.clone(),
        });
    }
}
