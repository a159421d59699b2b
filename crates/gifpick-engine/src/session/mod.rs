//! Picker session: runs queries and broadcasts state.
//!
//! Every issued query carries the generation it was issued at. When the
//! response arrives the generation is compared under the state lock, so a
//! slow reply to an old query can never overwrite a newer result set.

mod state;

pub use state::{PickerPhase, PickerState, QueryTicket};

use std::sync::Arc;

use gifpick_core::{EmptyQueryPolicy, Query, SearchResult};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backend::{SearchBackend, SearchOutcome};

/// Invoked with the item the user picked.
pub type SelectionCallback = Arc<dyn Fn(&SearchResult) + Send + Sync>;

/// Invoked when the user asks to dismiss the picker.
pub type CloseCallback = Arc<dyn Fn() + Send + Sync>;

/// What an escape key press did.
#[derive(Debug)]
pub enum EscapeOutcome {
    /// Input text was cleared. `pending` is the follow-up query, if any.
    Cleared { pending: Option<JoinHandle<()>> },
    /// Input was already empty and the host was asked to close.
    CloseRequested,
    /// Input was empty and no close handler is wired.
    Ignored,
}

struct Shared {
    state: Mutex<PickerState>,
    tx: watch::Sender<PickerState>,
}

impl Shared {
    /// Mutate and publish inside one critical section so snapshots stay ordered.
    fn update<R>(&self, f: impl FnOnce(&mut PickerState) -> R) -> R {
        let mut state = self.state.lock();
        let result = f(&mut state);
        self.tx.send_replace(state.clone());
        result
    }

    /// Apply a finished query. Returns false when the response was stale.
    fn complete(&self, ticket: QueryTicket, outcome: SearchOutcome) -> bool {
        let mut state = self.state.lock();
        let failure = outcome.as_ref().err().map(ToString::to_string);

        if !state.apply(ticket.generation, outcome) {
            tracing::debug!(
                generation = ticket.generation,
                current = state.generation(),
                error = ?failure,
                "discarded stale search response"
            );
            return false;
        }

        match failure {
            Some(error) => tracing::warn!(query = %ticket.query, "search failed: {}", error),
            None => tracing::debug!(
                generation = ticket.generation,
                results = state.results().len(),
                "applied search response"
            ),
        }
        self.tx.send_replace(state.clone());
        true
    }
}

/// One mounted picker.
///
/// Cheap to clone; clones share state and callbacks.
#[derive(Clone)]
pub struct PickerSession {
    shared: Arc<Shared>,
    backend: Arc<dyn SearchBackend>,
    policy: EmptyQueryPolicy,
    on_selected: SelectionCallback,
    on_request_close: Option<CloseCallback>,
    runtime: Handle,
}

impl PickerSession {
    /// Create a session. Queries run on `runtime`.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        policy: EmptyQueryPolicy,
        on_selected: SelectionCallback,
        runtime: Handle,
    ) -> Self {
        let state = PickerState::new();
        let (tx, _) = watch::channel(state.clone());

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                tx,
            }),
            backend,
            policy,
            on_selected,
            on_request_close: None,
            runtime,
        }
    }

    /// Wire the close handler.
    pub fn with_request_close(mut self, on_request_close: CloseCallback) -> Self {
        self.on_request_close = Some(on_request_close);
        self
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Load the trending set. Call once when the picker is shown.
    pub fn mount(&self) -> JoinHandle<()> {
        let ticket = self.shared.update(|state| state.begin(Query::Trending));
        self.dispatch(ticket)
    }

    /// React to new input text.
    ///
    /// Returns the spawned query, or `None` when the empty-input policy
    /// cleared the results instead.
    pub fn on_search_change(&self, text: &str) -> Option<JoinHandle<()>> {
        let ticket = self
            .shared
            .update(|state| state.set_query_text(text, self.policy))?;
        Some(self.dispatch(ticket))
    }

    /// Hand a picked item to the host.
    pub fn on_select(&self, item: &SearchResult) {
        tracing::debug!(id = ?item.id(), "gif selected");
        (self.on_selected)(item);
    }

    /// Select the item under the keyboard cursor.
    pub fn submit(&self) -> Option<SearchResult> {
        let item = self.shared.state.lock().cursor_item().cloned()?;
        self.on_select(&item);
        Some(item)
    }

    pub fn move_cursor(&self, delta: isize) {
        self.shared.update(|state| state.move_cursor(delta));
    }

    /// Escape clears non-empty input first, then asks the host to close.
    pub fn on_escape(&self) -> EscapeOutcome {
        let has_text = !self.shared.state.lock().query_text().is_empty();

        if has_text {
            EscapeOutcome::Cleared {
                pending: self.on_search_change(""),
            }
        } else if self.request_close() {
            EscapeOutcome::CloseRequested
        } else {
            EscapeOutcome::Ignored
        }
    }

    /// Close button. Returns false when no close handler is wired.
    pub fn request_close(&self) -> bool {
        match &self.on_request_close {
            Some(on_request_close) => {
                on_request_close();
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Observation
    // -------------------------------------------------------------------------

    /// Current state.
    pub fn snapshot(&self) -> PickerState {
        self.shared.state.lock().clone()
    }

    /// Receive a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<PickerState> {
        self.shared.tx.subscribe()
    }

    pub fn policy(&self) -> EmptyQueryPolicy {
        self.policy
    }

    fn dispatch(&self, ticket: QueryTicket) -> JoinHandle<()> {
        tracing::debug!(generation = ticket.generation, query = %ticket.query, "issuing query");

        let request = self.backend.search(ticket.query.clone());
        let shared = self.shared.clone();
        self.runtime.spawn(async move {
            let outcome = request.await;
            shared.complete(ticket, outcome);
        })
    }
}
