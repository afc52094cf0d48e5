//! Token sections computed from the base palette.
use designdb_core::tokens::{
    BaseColors, DarkColors, DerivedTokens, InteractiveStates, OnColors, DEFAULT_ACCENT, DEFAULT_BACKGROUND, DEFAULT_PRIMARY,
    DEFAULT_SECONDARY, DEFAULT_SURFACE,
};

use crate::color::{on_color, Hsl, Rgb};

pub const HOVER_DARKEN: f64 = 0.08;
pub const ACTIVE_DARKEN: f64 = 0.16;
pub const DISABLED_SATURATION: f64 = 0.3;
pub const DISABLED_LIGHTEN: f64 = 0.25;
pub const DARK_ACCENT_LIGHTEN: f64 = 0.10;

/// Parse `hex`, falling back to `default` for invalid input.
pub(crate) fn rgb_or(hex: &str, default: &str) -> Rgb {
    Rgb::parse(hex).or_else(|| Rgb::parse(default)).unwrap_or(Rgb { r: 0, g: 0, b: 0 })
}

pub fn on_colors(colors: &BaseColors) -> OnColors {
    let on = |hex: &str, default: &str| on_color(rgb_or(hex, default)).to_string();
    OnColors {
        primary: on(&colors.primary, DEFAULT_PRIMARY),
        secondary: on(&colors.secondary, DEFAULT_SECONDARY),
        accent: on(&colors.accent, DEFAULT_ACCENT),
        background: on(&colors.background, DEFAULT_BACKGROUND),
        surface: on(&colors.surface, DEFAULT_SURFACE),
    }
}

/// Dark palette keyed off the primary hue.
pub fn dark_palette(colors: &BaseColors) -> DarkColors {
    let primary = rgb_or(&colors.primary, DEFAULT_PRIMARY).to_hsl();
    let tinted = |s: f64, l: f64| Hsl { h: primary.h, s: primary.s * s, l }.to_hex();
    let lift = |hex: &str, default: &str| {
        let hsl = rgb_or(hex, default).to_hsl();
        hsl.lighten(DARK_ACCENT_LIGHTEN).to_hex()
    };
    DarkColors {
        background: tinted(0.3, 0.08),
        surface: tinted(0.3, 0.14),
        text: tinted(0.1, 0.94),
        primary: lift(&colors.primary, DEFAULT_PRIMARY),
        secondary: lift(&colors.secondary, DEFAULT_SECONDARY),
        accent: lift(&colors.accent, DEFAULT_ACCENT),
    }
}

fn state_triplet(hex: &str, default: &str) -> (String, String, String) {
    let hsl = rgb_or(hex, default).to_hsl();
    (
        hsl.darken(HOVER_DARKEN).to_hex(),
        hsl.darken(ACTIVE_DARKEN).to_hex(),
        hsl.saturate(DISABLED_SATURATION).lighten(DISABLED_LIGHTEN).to_hex(),
    )
}

pub fn interactive_states(colors: &BaseColors) -> InteractiveStates {
    let (primary_hover, primary_active, primary_disabled) = state_triplet(&colors.primary, DEFAULT_PRIMARY);
    let (secondary_hover, secondary_active, secondary_disabled) = state_triplet(&colors.secondary, DEFAULT_SECONDARY);
    let (accent_hover, accent_active, accent_disabled) = state_triplet(&colors.accent, DEFAULT_ACCENT);
    InteractiveStates {
        primary_hover,
        primary_active,
        primary_disabled,
        secondary_hover,
        secondary_active,
        secondary_disabled,
        accent_hover,
        accent_active,
        accent_disabled,
    }
}

pub fn derive(colors: &BaseColors) -> DerivedTokens {
    DerivedTokens { on_colors: on_colors(colors), dark: dark_palette(colors), states: interactive_states(colors) }
}
