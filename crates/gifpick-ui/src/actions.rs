//! GPUI actions for the picker.
//!
//! Actions are dispatched by the key binding system. `action_from_name` maps
//! the names used in the `[keys]` config table to actions.

use gpui::actions;

// =============================================================================
// Grid Navigation
// =============================================================================

actions!(gifpick, [CursorUp, CursorDown, NextTile, PrevTile]);

// =============================================================================
// Picker Actions
// =============================================================================

actions!(gifpick, [Submit, Dismiss]);

// =============================================================================
// Text Editing
// =============================================================================

actions!(
    gifpick,
    [
        Backspace,
        Delete,
        MoveLeft,
        MoveRight,
        SelectLeft,
        SelectRight,
        TextSelectAll,
        Home,
        End,
        Copy,
        Paste,
        Cut,
    ]
);

// =============================================================================
// Action Lookup
// =============================================================================

/// Look up an action by config name.
pub fn action_from_name(name: &str) -> Option<Box<dyn gpui::Action>> {
    match name {
        "cursor_up" => Some(Box::new(CursorUp)),
        "cursor_down" => Some(Box::new(CursorDown)),
        "next_tile" => Some(Box::new(NextTile)),
        "prev_tile" => Some(Box::new(PrevTile)),

        "submit" => Some(Box::new(Submit)),
        "dismiss" => Some(Box::new(Dismiss)),

        "backspace" => Some(Box::new(Backspace)),
        "delete" => Some(Box::new(Delete)),
        "move_left" => Some(Box::new(MoveLeft)),
        "move_right" => Some(Box::new(MoveRight)),
        "select_left" => Some(Box::new(SelectLeft)),
        "select_right" => Some(Box::new(SelectRight)),
        "text_select_all" => Some(Box::new(TextSelectAll)),
        "home" => Some(Box::new(Home)),
        "end" => Some(Box::new(End)),
        "copy" => Some(Box::new(Copy)),
        "paste" => Some(Box::new(Paste)),
        "cut" => Some(Box::new(Cut)),

        _ => None,
    }
}

/// Key context an action belongs to.
///
/// Text editing actions only make sense while the search input has focus.
pub fn context_for(name: &str) -> &'static str {
    match name {
        "cursor_up" | "cursor_down" | "next_tile" | "prev_tile" | "dismiss" => "Picker",
        _ => "SearchInput",
    }
}
