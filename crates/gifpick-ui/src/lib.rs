//! GPUI frontend for the gifpick GIF picker.
//!
//! This crate provides:
//! - PickerWindow for window management
//! - PickerPanel, the search box and thumbnail grid
//! - Configurable keybindings

pub mod actions;
pub mod keymap;
pub mod theme;
pub mod views;
pub mod window;

pub use theme::{Appearance, Theme, ThemeExt, ThemeSettings};
pub use views::{scroll_to_cursor, PickerPanel, SearchInput, SearchInputEvent, TextBuffer};
pub use window::{run_picker, PickerWindow};
