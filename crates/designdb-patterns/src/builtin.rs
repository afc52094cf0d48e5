//! Static patterns registered at startup.
use designdb_core::types::{
    ColorPattern, ComponentPattern, Pattern, PatternData, PatternMetadata, SpacingPattern, TypographyPattern,
};

pub const COLOR: &str = "color";
pub const TYPOGRAPHY: &str = "typography";
pub const SPACING: &str = "spacing";
pub const COMPONENT: &str = "component";

fn tags(list: &[&str]) -> Vec<String> { list.iter().map(|t| t.to_string()).collect() }

fn pattern(id: &str, category: &str, name: &str, data: PatternData) -> Pattern {
    Pattern { id: id.into(), category: category.into(), name: name.into(), data, metadata: PatternMetadata::now("static") }
}

fn color(id: &str, name: &str, [primary, secondary, accent, background, text]: [&str; 5], t: &[&str]) -> Pattern {
    pattern(id, COLOR, name, PatternData::Color(ColorPattern {
        primary: primary.into(),
        secondary: Some(secondary.into()),
        accent: Some(accent.into()),
        background: Some(background.into()),
        text: Some(text.into()),
        tags: tags(t),
        ..ColorPattern::default()
    }))
}

fn typography(id: &str, name: &str, heading: &str, body: &str, ratio: f64, t: &[&str]) -> Pattern {
    pattern(id, TYPOGRAPHY, name, PatternData::Typography(TypographyPattern {
        heading: heading.into(),
        body: body.into(),
        scale_ratio: Some(ratio),
        tags: tags(t),
        ..TypographyPattern::default()
    }))
}

fn spacing(id: &str, name: &str, unit: u32, radius: &str, t: &[&str]) -> Pattern {
    pattern(id, SPACING, name, PatternData::Spacing(SpacingPattern { unit, radius: Some(radius.into()), tags: tags(t), ..SpacingPattern::default() }))
}

fn component(id: &str, name: &str, component: &str, variant: &str, t: &[&str]) -> Pattern {
    pattern(id, COMPONENT, name, PatternData::Component(ComponentPattern { component: component.into(), variant: Some(variant.into()), tags: tags(t), ..ComponentPattern::default() }))
}

pub fn builtin_patterns() -> Vec<Pattern> {
    vec![
        color("color-trust-blue", "Trust Blue", ["#1D4ED8", "#475569", "#F97316", "#FFFFFF", "#0F172A"], &["trustworthy", "professional", "corporate", "saas", "fintech"]),
        color("color-calm-teal", "Calm Teal", ["#0F766E", "#5EEAD4", "#F59E0B", "#F0FDFA", "#134E4A"], &["calm", "natural", "healthcare", "wellness", "fintech"]),
        color("color-bold-magenta", "Bold Magenta", ["#BE185D", "#7C3AED", "#FACC15", "#FFFFFF", "#1F2937"], &["bold", "energetic", "playful", "ecommerce"]),
        color("color-luxe-noir", "Luxe Noir", ["#111827", "#374151", "#D4AF37", "#FAFAF9", "#0C0A09"], &["elegant", "luxury", "sophisticated", "premium", "fashion"]),
        color("color-friendly-violet", "Friendly Violet", ["#7C3AED", "#EC4899", "#FBBF24", "#FFFBEB", "#1E1B4B"], &["friendly", "playful", "education", "creative"]),
        color("color-dev-indigo", "Developer Indigo", ["#4F46E5", "#0EA5E9", "#10B981", "#0B1120", "#E2E8F0"], &["technical", "minimal", "modern", "developer tools", "gaming"]),
        color("color-sunset-travel", "Sunset Coast", ["#0369A1", "#0EA5E9", "#F97316", "#F0F9FF", "#0C4A6E"], &["adventure", "vibrant", "travel", "hospitality"]),
        typography("type-modern-pro", "Modern Professional", "Poppins", "Open Sans", 1.25, &["modern", "professional", "trustworthy", "saas", "fintech"]),
        typography("type-elegant-serif", "Elegant Serif", "Playfair Display", "Inter", 1.333, &["elegant", "luxury", "sophisticated", "editorial"]),
        typography("type-friendly-round", "Friendly Rounded", "Nunito", "Nunito Sans", 1.2, &["friendly", "playful", "education", "food"]),
        typography("type-tech-grotesk", "Tech Grotesk", "Space Grotesk", "Inter", 1.25, &["technical", "minimal", "modern", "developer tools", "gaming"]),
        typography("type-calm-humanist", "Calm Humanist", "Lora", "Source Sans 3", 1.2, &["calm", "caring", "natural", "healthcare", "wellness"]),
        typography("type-bold-display", "Bold Display", "Archivo Black", "Roboto", 1.5, &["bold", "energetic", "ecommerce", "sports"]),
        spacing("spacing-compact", "Compact Grid", 4, "6px", &["technical", "minimal", "developer tools", "fintech", "saas"]),
        spacing("spacing-comfortable", "Comfortable Grid", 8, "12px", &["calm", "friendly", "wellness", "healthcare", "education"]),
        spacing("spacing-airy", "Airy Editorial", 8, "2px", &["elegant", "luxury", "sophisticated"]),
        spacing("spacing-playful", "Playful Rounded", 6, "16px", &["playful", "bold", "energetic", "ecommerce"]),
        component("button-pill", "Pill Button", "button", "pill", &["friendly", "playful", "modern"]),
        component("card-elevated", "Elevated Card", "card", "elevated", &["calm", "professional", "saas"]),
        component("input-underlined", "Underlined Input", "input", "underlined", &["elegant", "minimal", "luxury"]),
    ]
}
