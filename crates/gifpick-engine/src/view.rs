//! Render model.
//!
//! `PickerView::build` is a pure function of a state snapshot. The UI layer
//! only turns it into elements.

use std::sync::Arc;

use gifpick_core::SearchResult;

use crate::session::{PickerPhase, PickerState};

/// Message shown when a completed query returned nothing.
pub const NO_RESULTS_MESSAGE: &str = "No GIFs found";

/// One thumbnail in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Position in the result list.
    pub index: usize,
    /// Thumbnail image URL.
    pub src: String,
    /// Pixel size, when the API reported it.
    pub size: Option<(u32, u32)>,
    pub title: Option<String>,
    pub is_cursor: bool,
}

/// What the body of the picker shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    /// A query is in flight.
    Loading,
    /// Input is empty and results were cleared. Nothing to show.
    Blank,
    /// The last query completed with no results.
    Empty,
    /// The last query failed.
    Error(String),
    /// Tiles are available.
    Results,
}

#[derive(Debug, Clone)]
pub struct PickerView {
    pub status: ViewStatus,
    pub tiles: Vec<Tile>,
    pub visible: bool,
    pub modal: bool,
    results: Arc<[SearchResult]>,
}

impl PickerView {
    pub fn build(state: &PickerState, visible: bool, modal: bool) -> Self {
        let tiles = state
            .results()
            .iter()
            .enumerate()
            .map(|(index, result)| Tile {
                index,
                src: result.thumbnail_url().to_string(),
                size: result.thumbnail_size(),
                title: result.title().map(str::to_string),
                is_cursor: index == state.cursor(),
            })
            .collect::<Vec<_>>();

        let status = match state.phase() {
            PickerPhase::Searching { .. } => ViewStatus::Loading,
            PickerPhase::Failed { error } => ViewStatus::Error(error.to_string()),
            PickerPhase::Idle if !tiles.is_empty() => ViewStatus::Results,
            PickerPhase::Idle if state.last_query().is_none() => ViewStatus::Blank,
            PickerPhase::Idle => ViewStatus::Empty,
        };

        Self {
            status,
            tiles,
            visible,
            modal,
            results: state.results_arc(),
        }
    }

    /// The result behind a tile.
    pub fn item(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    /// Text for the status line, if the status has one.
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            ViewStatus::Empty => Some(NO_RESULTS_MESSAGE),
            ViewStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::gif;
    use gifpick_core::{EmptyQueryPolicy, Query, SearchError};

    fn loaded(urls: &[&str]) -> PickerState {
        let mut state = PickerState::new();
        let ticket = state.begin(Query::Trending);
        state.apply(ticket.generation, Ok(urls.iter().map(|u| gif(u)).collect()));
        state
    }

    #[test]
    fn test_tiles_follow_result_order() {
        let mut state = loaded(&["a.gif", "b.gif", "c.gif"]);
        state.move_cursor(1);

        let view = PickerView::build(&state, true, false);
        assert_eq!(view.status, ViewStatus::Results);

        let srcs: Vec<_> = view.tiles.iter().map(|t| t.src.as_str()).collect();
        assert_eq!(srcs, vec!["a.gif", "b.gif", "c.gif"]);

        let cursor: Vec<_> = view.tiles.iter().map(|t| t.is_cursor).collect();
        assert_eq!(cursor, vec![false, true, false]);

        assert_eq!(view.item(2).unwrap().thumbnail_url(), "c.gif");
        assert!(view.item(3).is_none());
    }

    #[test]
    fn test_rendered_items_outlive_newer_results() {
        let mut state = loaded(&["old.gif"]);
        let rendered = PickerView::build(&state, true, false);

        let ticket = state.begin(Query::Search("new".into()));
        state.apply(ticket.generation, Ok(vec![gif("new.gif")]));
        let current = PickerView::build(&state, true, false);

        assert_eq!(rendered.item(0).unwrap().thumbnail_url(), "old.gif");
        assert_eq!(current.item(0).unwrap().thumbnail_url(), "new.gif");
    }

    #[test]
    fn test_tile_size_and_title() {
        let mut state = PickerState::new();
        let ticket = state.begin(Query::Trending);
        let item = SearchResult::try_from(serde_json::json!({
            "title": "Waving Cat",
            "images": {"fixed_width": {"url": "w.gif", "width": "200", "height": "113"}}
        }))
        .unwrap();
        state.apply(ticket.generation, Ok(vec![item]));

        let view = PickerView::build(&state, true, true);
        assert_eq!(view.tiles[0].size, Some((200, 113)));
        assert_eq!(view.tiles[0].title.as_deref(), Some("Waving Cat"));
        assert!(view.modal);
    }

    #[test]
    fn test_status_transitions() {
        let mut state = PickerState::new();
        assert_eq!(PickerView::build(&state, true, false).status, ViewStatus::Blank);

        let ticket = state.set_query_text("zzz", EmptyQueryPolicy::Clear).unwrap();
        assert_eq!(PickerView::build(&state, true, false).status, ViewStatus::Loading);

        state.apply(ticket.generation, Ok(Vec::new()));
        let view = PickerView::build(&state, true, false);
        assert_eq!(view.status, ViewStatus::Empty);
        assert_eq!(view.message(), Some(NO_RESULTS_MESSAGE));

        state.set_query_text("", EmptyQueryPolicy::Clear);
        let view = PickerView::build(&state, true, false);
        assert_eq!(view.status, ViewStatus::Blank);
        assert_eq!(view.message(), None);
    }

    #[test]
    fn test_error_distinct_from_empty() {
        let mut state = PickerState::new();
        let ticket = state.begin(Query::Search("cat".into()));
        state.apply(ticket.generation, Err(SearchError::Transport("connection refused".into())));

        let view = PickerView::build(&state, true, false);
        assert!(view.tiles.is_empty());
        match &view.status {
            ViewStatus::Error(message) => assert!(message.contains("connection refused")),
            other => panic!("expected error status, got {other:?}"),
        }
        assert_ne!(view.message(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn test_hidden_view_keeps_model() {
        let state = loaded(&["a.gif"]);
        let view = PickerView::build(&state, false, false);
        assert!(!view.visible);
        assert_eq!(view.tiles.len(), 1);
    }
}
