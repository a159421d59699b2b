//! Picker theme.
//!
//! `ThemeSettings` holds the user-facing knobs; `Theme` is the resolved set of
//! colors and metrics the views read through `cx.theme()`.

use gpui::{hsla, px, App, Global, Hsla, Pixels, SharedString};

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Clone)]
pub struct ThemeSettings {
    pub appearance: Appearance,
    /// Accent hue in 0.0-1.0. Defaults to violet.
    pub accent_hue: f32,
    pub font_family: SharedString,
    pub font_size: Pixels,
    /// Thumbnails per grid row.
    pub columns: usize,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            appearance: Appearance::System,
            accent_hue: 265.0 / 360.0,
            font_family: "Inter".into(),
            font_size: px(14.0),
            columns: 3,
        }
    }
}

impl Global for ThemeSettings {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
    #[default]
    System,
}

// =============================================================================
// Theme
// =============================================================================

/// Resolved colors and grid metrics.
#[derive(Debug, Clone)]
pub struct Theme {
    pub is_dark: bool,

    // -------------------------------------------------------------------------
    // Surfaces
    // -------------------------------------------------------------------------
    pub background: Hsla,
    /// Search box and tile placeholder fill.
    pub surface: Hsla,
    pub surface_hover: Hsla,
    /// Scrim behind the picker in modal layout.
    pub backdrop: Hsla,

    // -------------------------------------------------------------------------
    // Text
    // -------------------------------------------------------------------------
    pub text: Hsla,
    pub text_muted: Hsla,
    pub text_placeholder: Hsla,
    pub error: Hsla,

    // -------------------------------------------------------------------------
    // Interactive
    // -------------------------------------------------------------------------
    /// Ring around the keyboard-highlighted tile.
    pub cursor: Hsla,
    /// Text selection in the search box.
    pub selection: Hsla,
    pub accent: Hsla,
    pub border: Hsla,
    pub border_focused: Hsla,

    // -------------------------------------------------------------------------
    // Typography
    // -------------------------------------------------------------------------
    pub font_family: SharedString,
    pub font_size: Pixels,
    pub font_size_small: Pixels,

    // -------------------------------------------------------------------------
    // Grid
    // -------------------------------------------------------------------------
    pub columns: usize,
    pub tile_width: Pixels,
    pub tile_gap: Pixels,
    /// Height used for tiles whose size the API did not report.
    pub tile_fallback_height: Pixels,
    pub radius: Pixels,
}

impl Theme {
    pub fn from_settings(settings: &ThemeSettings, system_is_dark: bool) -> Self {
        let is_dark = match settings.appearance {
            Appearance::Dark => true,
            Appearance::Light => false,
            Appearance::System => system_is_dark,
        };

        let palette = if is_dark {
            Palette::dark(settings.accent_hue)
        } else {
            Palette::light(settings.accent_hue)
        };

        let base_size: f32 = settings.font_size.into();

        Self {
            is_dark,

            background: palette.bg_base,
            surface: palette.bg_elevated,
            surface_hover: palette.bg_hover,
            backdrop: palette.scrim,

            text: palette.fg_primary,
            text_muted: palette.fg_secondary,
            text_placeholder: palette.fg_tertiary,
            error: palette.error,

            cursor: palette.accent,
            selection: palette.accent.with_alpha(if is_dark { 0.3 } else { 0.2 }),
            accent: palette.accent,
            border: palette.border,
            border_focused: palette.accent,

            font_family: settings.font_family.clone(),
            font_size: settings.font_size,
            font_size_small: px(base_size - 2.0),

            columns: settings.columns.max(1),
            tile_width: px(200.0),
            tile_gap: px(6.0),
            tile_fallback_height: px(150.0),
            radius: px(8.0),
        }
    }

    pub fn dark() -> Self {
        Self::from_settings(&ThemeSettings::default(), true)
    }

    pub fn light() -> Self {
        Self::from_settings(&ThemeSettings::default(), false)
    }

    /// Rendered height of a tile, keeping the thumbnail's aspect ratio.
    pub fn tile_height(&self, size: Option<(u32, u32)>) -> Pixels {
        match size {
            Some((w, h)) if w > 0 && h > 0 => {
                let width: f32 = self.tile_width.into();
                px((width * h as f32 / w as f32).round())
            }
            _ => self.tile_fallback_height,
        }
    }

    /// Total width of a full grid row.
    pub fn grid_width(&self) -> Pixels {
        let width: f32 = self.tile_width.into();
        let gap: f32 = self.tile_gap.into();
        let columns = self.columns as f32;
        px(width * columns + gap * (columns - 1.0))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Global for Theme {}

// =============================================================================
// Palette
// =============================================================================

struct Palette {
    bg_base: Hsla,
    bg_elevated: Hsla,
    bg_hover: Hsla,
    scrim: Hsla,
    fg_primary: Hsla,
    fg_secondary: Hsla,
    fg_tertiary: Hsla,
    accent: Hsla,
    border: Hsla,
    error: Hsla,
}

impl Palette {
    fn dark(accent_hue: f32) -> Self {
        Self {
            bg_base: hsla(0.0, 0.0, 0.09, 0.95),
            bg_elevated: hsla(0.0, 0.0, 1.0, 0.08),
            bg_hover: hsla(0.0, 0.0, 1.0, 0.14),
            scrim: hsla(0.0, 0.0, 0.0, 0.55),
            fg_primary: hsla(0.0, 0.0, 0.95, 0.90),
            fg_secondary: hsla(0.0, 0.0, 0.60, 0.90),
            fg_tertiary: hsla(0.0, 0.0, 0.40, 0.90),
            accent: hsla(accent_hue, 0.80, 0.65, 1.0),
            border: hsla(0.0, 0.0, 1.0, 0.15),
            error: hsla(0.0, 0.80, 0.60, 1.0),
        }
    }

    fn light(accent_hue: f32) -> Self {
        Self {
            bg_base: hsla(0.0, 0.0, 0.99, 0.97),
            bg_elevated: hsla(0.0, 0.0, 0.0, 0.05),
            bg_hover: hsla(0.0, 0.0, 0.0, 0.10),
            scrim: hsla(0.0, 0.0, 0.0, 0.35),
            fg_primary: hsla(0.0, 0.0, 0.10, 1.0),
            fg_secondary: hsla(0.0, 0.0, 0.45, 1.0),
            fg_tertiary: hsla(0.0, 0.0, 0.60, 1.0),
            accent: hsla(accent_hue, 0.75, 0.50, 1.0),
            border: hsla(0.0, 0.0, 0.0, 0.15),
            error: hsla(0.0, 0.75, 0.45, 1.0),
        }
    }
}

trait HslaExt {
    fn with_alpha(self, a: f32) -> Hsla;
}

impl HslaExt for Hsla {
    fn with_alpha(self, a: f32) -> Hsla {
        Hsla { a, ..self }
    }
}

// =============================================================================
// Theme Access
// =============================================================================

pub trait ThemeExt {
    fn theme(&self) -> &Theme;
}

impl ThemeExt for App {
    fn theme(&self) -> &Theme {
        self.global::<Theme>()
    }
}
