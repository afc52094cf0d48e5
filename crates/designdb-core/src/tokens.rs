//! Design token model.
//!
//! `BaseTokens` is what the foundation and the remote adaptation produce.
//! `DesignTokens` adds the sections that are always derived from the base
//! colors (on-colors, dark palette, interactive states).

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRIMARY: &str = "#2563EB";
pub const DEFAULT_SECONDARY: &str = "#64748B";
pub const DEFAULT_ACCENT: &str = "#F59E0B";
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";
pub const DEFAULT_SURFACE: &str = "#F8FAFC";
pub const DEFAULT_TEXT: &str = "#0F172A";
pub const DEFAULT_MUTED: &str = "#94A3B8";
pub const DEFAULT_BORDER: &str = "#E2E8F0";
pub const DEFAULT_HEADING_FONT: &str = "Inter";
pub const DEFAULT_BODY_FONT: &str = "Inter";
pub const DEFAULT_MONO_FONT: &str = "JetBrains Mono";
pub const DEFAULT_SPACING_UNIT: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub muted: String,
    pub border: String,
}

impl Default for BaseColors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.into(),
            secondary: DEFAULT_SECONDARY.into(),
            accent: DEFAULT_ACCENT.into(),
            background: DEFAULT_BACKGROUND.into(),
            surface: DEFAULT_SURFACE.into(),
            text: DEFAULT_TEXT.into(),
            muted: DEFAULT_MUTED.into(),
            border: DEFAULT_BORDER.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFamily {
    pub heading: String,
    pub body: String,
    pub mono: String,
}

impl Default for FontFamily {
    fn default() -> Self {
        Self { heading: DEFAULT_HEADING_FONT.into(), body: DEFAULT_BODY_FONT.into(), mono: DEFAULT_MONO_FONT.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontWeights {
    pub regular: u16,
    pub medium: u16,
    pub bold: u16,
}

impl Default for FontWeights {
    fn default() -> Self { Self { regular: 400, medium: 500, bold: 700 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    #[serde(alias = "fontFamily")]
    pub font_family: FontFamily,
    #[serde(alias = "baseSize")]
    pub base_size: String,
    #[serde(alias = "scaleRatio")]
    pub scale_ratio: f64,
    #[serde(alias = "lineHeight")]
    pub line_height: f64,
    pub weights: FontWeights,
}

impl Default for Typography {
    fn default() -> Self {
        Self { font_family: FontFamily::default(), base_size: "16px".into(), scale_ratio: 1.25, line_height: 1.5, weights: FontWeights::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    pub unit: String,
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
    pub xxl: String,
}

impl Spacing {
    /// Scale of 1/2/4/6/8/12 units.
    pub fn from_unit(unit: u32) -> Self {
        let px = |n: u32| format!("{}px", unit.saturating_mul(n));
        Self { unit: px(1), xs: px(1), sm: px(2), md: px(4), lg: px(6), xl: px(8), xxl: px(12) }
    }
}

impl Default for Spacing {
    fn default() -> Self { Self::from_unit(DEFAULT_SPACING_UNIT) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radius {
    pub none: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub full: String,
}

impl Radius {
    /// `sm` and `lg` are half and double of `md`. Non-pixel values are used as-is.
    pub fn from_md(md: &str) -> Self {
        match md.trim().trim_end_matches("px").parse::<u32>() {
            Ok(n) => Self { none: "0px".into(), sm: format!("{}px", (n / 2).max(1)), md: format!("{n}px"), lg: format!("{}px", n.saturating_mul(2)), full: "9999px".into() },
            Err(_) => Self { md: md.to_string(), ..Self::default() },
        }
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self { none: "0px".into(), sm: "4px".into(), md: "8px".into(), lg: "16px".into(), full: "9999px".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shadows {
    pub sm: String,
    pub md: String,
    pub lg: String,
}

impl Default for Shadows {
    fn default() -> Self {
        Self {
            sm: "0 1px 2px rgba(0, 0, 0, 0.05)".into(),
            md: "0 4px 6px rgba(0, 0, 0, 0.1)".into(),
            lg: "0 10px 15px rgba(0, 0, 0, 0.1)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BaseTokens {
    pub colors: BaseColors,
    pub typography: Typography,
    pub spacing: Spacing,
    pub radius: Radius,
    pub shadows: Shadows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarkColors {
    pub background: String,
    pub surface: String,
    pub text: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractiveStates {
    #[serde(alias = "primaryHover")]
    pub primary_hover: String,
    #[serde(alias = "primaryActive")]
    pub primary_active: String,
    #[serde(alias = "primaryDisabled")]
    pub primary_disabled: String,
    #[serde(alias = "secondaryHover")]
    pub secondary_hover: String,
    #[serde(alias = "secondaryActive")]
    pub secondary_active: String,
    #[serde(alias = "secondaryDisabled")]
    pub secondary_disabled: String,
    #[serde(alias = "accentHover")]
    pub accent_hover: String,
    #[serde(alias = "accentActive")]
    pub accent_active: String,
    #[serde(alias = "accentDisabled")]
    pub accent_disabled: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTokens {
    #[serde(alias = "onColors")]
    pub on_colors: OnColors,
    pub dark: DarkColors,
    pub states: InteractiveStates,
}

/// A complete token set. Every field always has a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignTokens {
    pub colors: BaseColors,
    #[serde(alias = "onColors")]
    pub on_colors: OnColors,
    pub dark: DarkColors,
    pub states: InteractiveStates,
    pub typography: Typography,
    pub spacing: Spacing,
    pub radius: Radius,
    pub shadows: Shadows,
}

impl DesignTokens {
    pub fn assemble(base: BaseTokens, derived: DerivedTokens) -> Self {
        Self {
            colors: base.colors,
            on_colors: derived.on_colors,
            dark: derived.dark,
            states: derived.states,
            typography: base.typography,
            spacing: base.spacing,
            radius: base.radius,
            shadows: base.shadows,
        }
    }

    /// Top-level sections that are computed from the base colors.
    pub const DERIVED_SECTIONS: [&'static str; 3] = ["on_colors", "dark", "states"];
}
