//! Picker views.

mod grid;
mod picker_panel;
mod search_input;

pub use grid::{row_of, rows, scroll_to_cursor};
pub use picker_panel::PickerPanel;
pub use search_input::{SearchInput, SearchInputEvent, TextBuffer};
