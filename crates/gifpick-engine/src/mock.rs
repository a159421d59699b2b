//! Test doubles for the search backend.

use futures::future::BoxFuture;
use gifpick_core::{Query, SearchError, SearchResult};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::backend::{SearchBackend, SearchOutcome};

/// Build a minimal result whose thumbnail is `url`.
pub fn gif(url: &str) -> SearchResult {
    SearchResult::try_from(serde_json::json!({
        "id": url,
        "images": {"fixed_width": {"url": url}}
    }))
    .unwrap()
}

/// Backend whose responses are released by the test, in any order.
///
/// Each call parks a gate. `resolve` opens the oldest gate for a query.
/// Dropping the backend fails every parked request with a transport error.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<Query>>,
    gates: Mutex<Vec<(Query, oneshot::Sender<SearchOutcome>)>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query received so far, in call order.
    pub fn calls(&self) -> Vec<Query> {
        self.calls.lock().clone()
    }

    /// Number of requests still waiting for a response.
    pub fn pending(&self) -> usize {
        self.gates.lock().len()
    }

    /// Release the oldest parked request for `query`.
    ///
    /// Returns false if no such request is parked.
    pub fn resolve(&self, query: &Query, outcome: SearchOutcome) -> bool {
        let gate = {
            let mut gates = self.gates.lock();
            match gates.iter().position(|(q, _)| q == query) {
                Some(index) => gates.remove(index).1,
                None => return false,
            }
        };
        gate.send(outcome).is_ok()
    }
}

impl SearchBackend for ScriptedBackend {
    fn search(&self, query: Query) -> BoxFuture<'static, SearchOutcome> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().push(query.clone());
        self.gates.lock().push((query, tx));

        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(SearchError::Transport("request dropped".into())))
        })
    }
}
