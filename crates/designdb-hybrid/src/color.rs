//! Hex parsing, HSL conversion and WCAG contrast.

pub const WHITE: &str = "#FFFFFF";
pub const BLACK: &str = "#000000";
/// WCAG AA for body text.
pub const MIN_TEXT_CONTRAST: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Degrees in `[0, 360)`.
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    /// Accepts `#RGB` and `#RRGGBB`, case-insensitive.
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) { return None; }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Some(Self { r: expand(0)?, g: expand(1)?, b: expand(2)? })
            }
            6 => Some(Self { r: channel(&digits[0..2])?, g: channel(&digits[2..4])?, b: channel(&digits[4..6])? }),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String { format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b) }

    pub fn relative_luminance(self) -> f64 {
        let lin = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        };
        0.2126 * lin(self.r) + 0.7152 * lin(self.g) + 0.0722 * lin(self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        let (r, g, b) = (self.r as f64 / 255.0, self.g as f64 / 255.0, self.b as f64 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let d = max - min;
        if d <= f64::EPSILON { return Hsl { h: 0.0, s: 0.0, l }; }
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        Hsl { h: h * 60.0, s, l }
    }
}

impl Hsl {
    pub fn to_rgb(self) -> Rgb {
        let (h, s, l) = (self.h.rem_euclid(360.0) / 360.0, self.s.clamp(0.0, 1.0), self.l.clamp(0.0, 1.0));
        let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        if s <= f64::EPSILON {
            let v = to_u8(l);
            return Rgb { r: v, g: v, b: v };
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hue = |mut t: f64| {
            if t < 0.0 { t += 1.0; }
            if t > 1.0 { t -= 1.0; }
            if t < 1.0 / 6.0 { p + (q - p) * 6.0 * t }
            else if t < 0.5 { q }
            else if t < 2.0 / 3.0 { p + (q - p) * (2.0 / 3.0 - t) * 6.0 }
            else { p }
        };
        Rgb { r: to_u8(hue(h + 1.0 / 3.0)), g: to_u8(hue(h)), b: to_u8(hue(h - 1.0 / 3.0)) }
    }

    pub fn to_hex(self) -> String { self.to_rgb().to_hex() }

    pub fn lighten(self, amount: f64) -> Self { Self { l: (self.l + amount).clamp(0.0, 1.0), ..self } }

    pub fn darken(self, amount: f64) -> Self { self.lighten(-amount) }

    pub fn saturate(self, factor: f64) -> Self { Self { s: (self.s * factor).clamp(0.0, 1.0), ..self } }
}

pub fn is_valid_hex(hex: &str) -> bool { Rgb::parse(hex).is_some() }

pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (a.relative_luminance(), b.relative_luminance());
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// White or black, whichever contrasts more with `background`. Ties go to white.
pub fn on_color(background: Rgb) -> &'static str {
    let white = Rgb { r: 255, g: 255, b: 255 };
    let black = Rgb { r: 0, g: 0, b: 0 };
    if contrast_ratio(background, white) >= contrast_ratio(background, black) { WHITE } else { BLACK }
}

/// Both hex values parse to the same color.
pub fn same_color(a: &str, b: &str) -> bool {
    matches!((Rgb::parse(a), Rgb::parse(b)), (Some(x), Some(y)) if x == y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Rgb::parse("#fff"), Some(Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!(Rgb::parse("#2563eb").map(Rgb::to_hex).as_deref(), Some("#2563EB"));
        for bad in ["2563EB", "#12345", "#GGGGGG", "", "#"] {
            assert!(Rgb::parse(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn contrast_extremes() {
        let white = Rgb::parse(WHITE).unwrap();
        let black = Rgb::parse(BLACK).unwrap();
        assert!((contrast_ratio(white, black) - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(white, white) - 1.0).abs() < 1e-9);
        assert_eq!(on_color(black), WHITE);
        assert_eq!(on_color(white), BLACK);
        assert_eq!(on_color(Rgb::parse("#F59E0B").unwrap()), BLACK);
        assert_eq!(on_color(Rgb::parse("#1D4ED8").unwrap()), WHITE);
    }

    #[test]
    fn hsl_round_trips_within_rounding() {
        for hex in ["#2563EB", "#0F766E", "#BE185D", "#808080", "#F59E0B"] {
            let rgb = Rgb::parse(hex).unwrap();
            let back = rgb.to_hsl().to_rgb();
            assert!((rgb.r as i16 - back.r as i16).abs() <= 1, "{hex}");
            assert!((rgb.g as i16 - back.g as i16).abs() <= 1, "{hex}");
            assert!((rgb.b as i16 - back.b as i16).abs() <= 1, "{hex}");
        }
    }

    #[test]
    fn darken_lowers_luminance() {
        let base = Rgb::parse("#2563EB").unwrap().to_hsl();
        assert!(base.darken(0.08).to_rgb().relative_luminance() < base.to_rgb().relative_luminance());
    }
}
