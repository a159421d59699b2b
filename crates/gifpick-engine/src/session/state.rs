//! Picker state model.
//!
//! Plain data with no runtime or UI dependency. `PickerSession` wraps it in a
//! lock and publishes a clone after every mutation.

use std::sync::Arc;

use gifpick_core::{EmptyQueryPolicy, Query, SearchError, SearchResult};

use crate::backend::SearchOutcome;

// =============================================================================
// Phase
// =============================================================================

/// What the picker is doing right now.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PickerPhase {
    /// Nothing in flight. Results are whatever the last query produced.
    #[default]
    Idle,
    /// Waiting for the query issued at `generation`.
    Searching { generation: u64 },
    /// The current query failed. Results are empty.
    Failed { error: SearchError },
}

/// A query that has been issued and still needs a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: u64,
    pub query: Query,
}

// =============================================================================
// State
// =============================================================================

/// Input text, results and the stale-response guard.
#[derive(Debug, Clone)]
pub struct PickerState {
    query_text: String,
    results: Arc<[SearchResult]>,
    last_query: Option<Query>,
    phase: PickerPhase,
    cursor: usize,
    generation: u64,
}

impl Default for PickerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PickerState {
    pub fn new() -> Self {
        Self {
            query_text: String::new(),
            results: Arc::from(Vec::new()),
            last_query: None,
            phase: PickerPhase::Idle,
            cursor: 0,
            generation: 0,
        }
    }

    /// Issue a query. Supersedes anything in flight.
    pub fn begin(&mut self, query: Query) -> QueryTicket {
        self.generation += 1;
        self.clear_results();
        self.last_query = Some(query.clone());
        self.phase = PickerPhase::Searching {
            generation: self.generation,
        };
        QueryTicket {
            generation: self.generation,
            query,
        }
    }

    /// Record new input text and decide what to query.
    ///
    /// Whitespace-only text is empty input. Returns `None` when nothing
    /// should be sent.
    pub fn set_query_text(&mut self, text: &str, policy: EmptyQueryPolicy) -> Option<QueryTicket> {
        self.query_text = text.to_string();

        match Query::from_input(text) {
            Some(query) => Some(self.begin(query)),
            None => match policy {
                EmptyQueryPolicy::Trending => Some(self.begin(Query::Trending)),
                EmptyQueryPolicy::Clear => {
                    self.generation += 1;
                    self.clear_results();
                    self.last_query = None;
                    self.phase = PickerPhase::Idle;
                    None
                }
            },
        }
    }

    /// Apply a response if it belongs to the current generation.
    ///
    /// Returns false for stale responses, which leave the state untouched.
    pub fn apply(&mut self, generation: u64, outcome: SearchOutcome) -> bool {
        if generation != self.generation {
            return false;
        }

        match outcome {
            Ok(results) => {
                self.results = results.into();
                self.cursor = 0;
                self.phase = PickerPhase::Idle;
            }
            Err(error) => {
                self.clear_results();
                self.phase = PickerPhase::Failed { error };
            }
        }
        true
    }

    /// Move the keyboard cursor by `delta`, clamped to the results.
    pub fn move_cursor(&mut self, delta: isize) {
        let Some(last) = self.results.len().checked_sub(1) else {
            self.cursor = 0;
            return;
        };
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    /// The result under the keyboard cursor.
    pub fn cursor_item(&self) -> Option<&SearchResult> {
        self.results.get(self.cursor)
    }

    fn clear_results(&mut self) {
        self.results = Arc::from(Vec::new());
        self.cursor = 0;
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Shared handle to the result list, cheap to clone into views.
    pub fn results_arc(&self) -> Arc<[SearchResult]> {
        self.results.clone()
    }

    /// The most recently issued query, `None` before mount or after a clear.
    pub fn last_query(&self) -> Option<&Query> {
        self.last_query.as_ref()
    }

    pub fn phase(&self) -> &PickerPhase {
        &self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, PickerPhase::Searching { .. })
    }

    pub fn error(&self) -> Option<&SearchError> {
        match &self.phase {
            PickerPhase::Failed { error } => Some(error),
            _ => None,
        }
    }
}
