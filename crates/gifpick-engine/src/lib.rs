//! Search backend and picker session for gifpick.
//!
//! This crate is UI-toolkit independent:
//! - `SearchBackend`: the seam to the remote search API (Giphy over HTTP)
//! - `PickerState`: the picker state machine with its stale-response guard
//! - `PickerSession`: drives queries on a tokio runtime and broadcasts state
//! - `PickerView`: pure render model derived from a state snapshot

pub mod backend;
pub mod giphy;
pub mod session;
pub mod view;

#[cfg(test)]
pub mod mock;

pub use backend::SearchBackend;
pub use giphy::GiphyBackend;
pub use session::{
    CloseCallback, EscapeOutcome, PickerPhase, PickerSession, PickerState, QueryTicket,
    SelectionCallback,
};
pub use view::{PickerView, Tile, ViewStatus, NO_RESULTS_MESSAGE};
