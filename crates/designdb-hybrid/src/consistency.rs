//! Post-merge validation with automatic repairs.
//!
//! Every finding is recorded as an `Issue`. Nothing here fails a request.
use designdb_core::tokens::{BaseColors, DesignTokens, FontFamily};
use designdb_core::types::Issue;
use tracing::warn;

use crate::color::{contrast_ratio, is_valid_hex, on_color, same_color, MIN_TEXT_CONTRAST};
use crate::derive::{derive, rgb_or};

#[derive(Debug, Clone, Copy)]
pub struct ConsistencyEngine {
    pub min_text_contrast: f64,
}

impl Default for ConsistencyEngine {
    fn default() -> Self { Self { min_text_contrast: MIN_TEXT_CONTRAST } }
}

impl ConsistencyEngine {
    pub fn new() -> Self { Self::default() }

    /// Repair `tokens` in place and report what was changed.
    pub fn check(&self, tokens: &mut DesignTokens) -> Vec<Issue> {
        let mut issues = Vec::new();
        self.fix_invalid_colors(tokens, &mut issues);
        self.fix_text_contrast(tokens, &mut issues);
        self.fix_on_colors(tokens, &mut issues);
        self.fix_font_families(tokens, &mut issues);
        for issue in &issues {
            warn!(component = %issue.component, "auto-fixed: {}", issue.message);
        }
        issues
    }

    fn fix_invalid_colors(&self, tokens: &mut DesignTokens, issues: &mut Vec<Issue>) {
        let defaults = BaseColors::default();
        let c = &mut tokens.colors;
        for (name, value, default) in [
            ("primary", &mut c.primary, &defaults.primary),
            ("secondary", &mut c.secondary, &defaults.secondary),
            ("accent", &mut c.accent, &defaults.accent),
            ("background", &mut c.background, &defaults.background),
            ("surface", &mut c.surface, &defaults.surface),
            ("text", &mut c.text, &defaults.text),
            ("muted", &mut c.muted, &defaults.muted),
            ("border", &mut c.border, &defaults.border),
        ] {
            replace_invalid(&format!("colors.{name}"), value, default, issues);
        }

        // dark and state values fall back to what the (now valid) palette derives
        let derived = derive(&tokens.colors);
        let d = &mut tokens.dark;
        for (name, value, fallback) in [
            ("background", &mut d.background, &derived.dark.background),
            ("surface", &mut d.surface, &derived.dark.surface),
            ("text", &mut d.text, &derived.dark.text),
            ("primary", &mut d.primary, &derived.dark.primary),
            ("secondary", &mut d.secondary, &derived.dark.secondary),
            ("accent", &mut d.accent, &derived.dark.accent),
        ] {
            replace_invalid(&format!("dark.{name}"), value, fallback, issues);
        }
        let s = &mut tokens.states;
        let f = &derived.states;
        for (name, value, fallback) in [
            ("primary_hover", &mut s.primary_hover, &f.primary_hover),
            ("primary_active", &mut s.primary_active, &f.primary_active),
            ("primary_disabled", &mut s.primary_disabled, &f.primary_disabled),
            ("secondary_hover", &mut s.secondary_hover, &f.secondary_hover),
            ("secondary_active", &mut s.secondary_active, &f.secondary_active),
            ("secondary_disabled", &mut s.secondary_disabled, &f.secondary_disabled),
            ("accent_hover", &mut s.accent_hover, &f.accent_hover),
            ("accent_active", &mut s.accent_active, &f.accent_active),
            ("accent_disabled", &mut s.accent_disabled, &f.accent_disabled),
        ] {
            replace_invalid(&format!("states.{name}"), value, fallback, issues);
        }
    }

    fn fix_text_contrast(&self, tokens: &mut DesignTokens, issues: &mut Vec<Issue>) {
        let background = rgb_or(&tokens.colors.background, "#FFFFFF");
        let ratio = contrast_ratio(rgb_or(&tokens.colors.text, "#000000"), background);
        if ratio < self.min_text_contrast {
            let safe = on_color(background);
            issues.push(Issue::fixed(
                "colors.text",
                format!("text {} on background {} has contrast {:.2}, below {:.1}; replaced with {}", tokens.colors.text, tokens.colors.background, ratio, self.min_text_contrast, safe),
            ));
            tokens.colors.text = safe.to_string();
        }
    }

    fn fix_on_colors(&self, tokens: &mut DesignTokens, issues: &mut Vec<Issue>) {
        let c = &tokens.colors;
        let o = &mut tokens.on_colors;
        for (role, base, on) in [
            ("primary", &c.primary, &mut o.primary),
            ("secondary", &c.secondary, &mut o.secondary),
            ("accent", &c.accent, &mut o.accent),
            ("background", &c.background, &mut o.background),
            ("surface", &c.surface, &mut o.surface),
        ] {
            let expected = on_color(rgb_or(base, "#FFFFFF"));
            if !same_color(on, expected) {
                issues.push(Issue::fixed(&format!("on_colors.{role}"), format!("{on} is not the contrast-safe foreground for {base}; replaced with {expected}")));
                *on = expected.to_string();
            }
        }
    }

    fn fix_font_families(&self, tokens: &mut DesignTokens, issues: &mut Vec<Issue>) {
        let defaults = FontFamily::default();
        let f = &mut tokens.typography.font_family;
        for (name, value, default) in [("heading", &mut f.heading, defaults.heading), ("body", &mut f.body, defaults.body), ("mono", &mut f.mono, defaults.mono)] {
            if value.trim().is_empty() {
                issues.push(Issue::fixed(&format!("typography.font_family.{name}"), format!("empty font family replaced with {default}")));
                *value = default;
            }
        }
    }
}

fn replace_invalid(component: &str, value: &mut String, fallback: &str, issues: &mut Vec<Issue>) {
    if !is_valid_hex(value) {
        issues.push(Issue::fixed(component, format!("invalid color {value:?} replaced with {fallback}")));
        *value = fallback.to_string();
    }
}
