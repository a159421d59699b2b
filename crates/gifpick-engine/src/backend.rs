//! Backend seam between the picker and the remote search API.
//!
//! The `SearchBackend` trait returns futures so the caller decides where they
//! run. The session calls `search` synchronously and only spawns the returned
//! future, which keeps request order observable in tests.

use futures::future::BoxFuture;
use gifpick_core::{Query, SearchError, SearchResult};

/// Results of one query, in response order.
pub type SearchOutcome = Result<Vec<SearchResult>, SearchError>;

/// Trait for remote search operations.
#[cfg_attr(test, mockall::automock)]
pub trait SearchBackend: Send + Sync {
    /// Run a trending or keyword query.
    fn search(&self, query: Query) -> BoxFuture<'static, SearchOutcome>;
}
