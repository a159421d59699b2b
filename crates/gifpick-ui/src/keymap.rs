//! GPUI keybinding registration.
//!
//! Defaults are registered first and `[keys]` overrides from the config file
//! after them. GPUI uses last-wins semantics at the same context depth, so
//! user bindings take precedence.

use std::rc::Rc;

#[cfg(test)]
use gpui::Keystroke;
use gpui::{App, DummyKeyboardMapper, KeyBinding, KeyBindingContextPredicate};

use gifpick_core::KeyBindingConfig;

use crate::actions::{action_from_name, context_for};

/// Built-in bindings: (keystroke, action name).
const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    // Picker
    ("up", "cursor_up"),
    ("down", "cursor_down"),
    ("tab", "next_tile"),
    ("shift-tab", "prev_tile"),
    ("escape", "dismiss"),
    // Search input
    ("enter", "submit"),
    ("backspace", "backspace"),
    ("delete", "delete"),
    ("left", "move_left"),
    ("right", "move_right"),
    ("shift-left", "select_left"),
    ("shift-right", "select_right"),
    ("cmd-a", "text_select_all"),
    ("home", "home"),
    ("end", "end"),
    ("cmd-c", "copy"),
    ("cmd-v", "paste"),
    ("cmd-x", "cut"),
];

/// One binding ready for registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSpec {
    pub keystroke: String,
    pub action: String,
    pub context: &'static str,
}

// =============================================================================
// Keystroke Parsing
// =============================================================================

/// Accept "ctrl+n" as well as GPUI's "ctrl-n".
fn normalize_keystroke(s: &str) -> String {
    s.replace('+', "-")
}

#[cfg(test)]
fn parse_keystroke(s: &str) -> Result<Keystroke, String> {
    let normalized = normalize_keystroke(s);
    Keystroke::parse(&normalized).map_err(|e| format!("Invalid keystroke '{}': {:?}", s, e))
}

// =============================================================================
// Binding Resolution
// =============================================================================

/// Defaults followed by user overrides, in registration order.
///
/// Overrides naming an unknown action are dropped with a warning.
pub fn binding_specs(overrides: &KeyBindingConfig) -> Vec<BindingSpec> {
    let defaults = DEFAULT_BINDINGS.iter().map(|(key, action)| BindingSpec {
        keystroke: key.to_string(),
        action: action.to_string(),
        context: context_for(action),
    });

    let user = overrides.iter().filter_map(|(key, action)| {
        if action_from_name(action).is_none() {
            tracing::warn!("Unknown action '{}' bound to '{}', skipping", action, key);
            return None;
        }
        Some(BindingSpec {
            keystroke: normalize_keystroke(key),
            action: action.clone(),
            context: context_for(action),
        })
    });

    defaults.chain(user).collect()
}

/// Register defaults plus overrides with GPUI.
pub fn apply_keybindings(overrides: &KeyBindingConfig, cx: &mut App) {
    let specs = binding_specs(overrides);
    let count = specs.len();

    for spec in specs {
        apply_binding(&spec, cx);
    }

    tracing::debug!("Registered {} key bindings", count);
}

fn apply_binding(spec: &BindingSpec, cx: &mut App) {
    let Some(action) = action_from_name(&spec.action) else {
        return;
    };
    let context = KeyBindingContextPredicate::parse(spec.context)
        .ok()
        .map(Rc::new);

    match KeyBinding::load(
        &spec.keystroke,
        action,
        context,
        false, // use_key_equivalents
        None,  // action_input
        &DummyKeyboardMapper,
    ) {
        Ok(binding) => {
            cx.bind_keys([binding]);
            tracing::debug!(
                "Registered binding: {} -> {} ({})",
                spec.keystroke,
                spec.action,
                spec.context
            );
        }
        Err(e) => {
            tracing::warn!("Failed to create binding for '{}': {:?}", spec.keystroke, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keystroke() {
        assert_eq!(normalize_keystroke("ctrl+w"), "ctrl-w");
        assert_eq!(normalize_keystroke("cmd-shift-z"), "cmd-shift-z");
    }

    #[test]
    fn test_default_bindings_parse() {
        for (key, action) in DEFAULT_BINDINGS {
            assert!(parse_keystroke(key).is_ok(), "bad keystroke {key}");
            assert!(action_from_name(action).is_some(), "unknown action {action}");
        }
    }

    #[test]
    fn test_overrides_follow_defaults() {
        let mut overrides = KeyBindingConfig::new();
        overrides.insert("ctrl+w".into(), "dismiss".into());
        overrides.insert("ctrl-j".into(), "launch_rockets".into());

        let specs = binding_specs(&overrides);
        assert_eq!(specs.len(), DEFAULT_BINDINGS.len() + 1);

        let last = specs.last().unwrap();
        assert_eq!(
            last,
            &BindingSpec {
                keystroke: "ctrl-w".into(),
                action: "dismiss".into(),
                context: "Picker",
            }
        );
    }
}
