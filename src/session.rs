//! Async driver around the pure controller.
//!
//! A [`Session`] owns the [`FeedState`], runs every [`Effect::Fetch`] on its
//! own tokio task, and hands the remaining effects (notices, scroll-to-top)
//! back to the caller to present. Completed fetches arrive over a channel and
//! are reduced in arrival order; the controller's sequence check decides
//! which of them still count.

use crate::api::PageSource;
use crate::controller::{Action, Effect, FeedState, reduce};
use crate::error::FetchError;
use crate::models::{PageResult, Query};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

type Completion = (u64, Result<PageResult, FetchError>);

pub struct Session<S> {
    state: FeedState,
    source: Arc<S>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<S: PageSource> Session<S> {
    pub fn new(source: S, query: Query) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: FeedState::new(query),
            source: Arc::new(source),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Number of fetches issued whose completion has not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a user action, start any fetch it triggers, and return the
    /// effects the UI has to present.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let effects = self.apply(action);
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Fetch { seq, query } => {
                    self.spawn_fetch(seq, query);
                    None
                }
                other => Some(other),
            })
            .collect()
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Pends forever while nothing is in flight, which makes it suitable as
    /// a `tokio::select!` branch next to user input.
    pub async fn next_completion(&mut self) -> Vec<Effect> {
        let Some((seq, outcome)) = self.rx.recv().await else {
            return Vec::new();
        };
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dispatch(Action::Resolved { seq, outcome })
    }

    /// Wait until the latest fetch has settled, returning every effect
    /// produced on the way.
    pub async fn settle(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while self.state.is_loading() && self.in_flight > 0 {
            effects.extend(self.next_completion().await);
        }
        effects
    }

    fn apply(&mut self, action: Action) -> Vec<Effect> {
        let (state, effects) = reduce(std::mem::take(&mut self.state), action);
        self.state = state;
        effects
    }

    #[instrument(level = "debug", skip(self, query), fields(page = query.page))]
    fn spawn_fetch(&mut self, seq: u64, query: Query) {
        self.in_flight += 1;
        debug!(in_flight = self.in_flight, "Issuing fetch");
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_page(&query).await;
            // The receiver lives as long as the session; a send error only
            // means the session was dropped.
            let _ = tx.send((seq, outcome));
        });
    }
}
