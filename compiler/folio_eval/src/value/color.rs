//! RGBA colors.

use std::fmt;

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const GRAY: Color = Color::rgb(0xaa, 0xaa, 0xaa);
    pub const SILVER: Color = Color::rgb(0xdd, 0xdd, 0xdd);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const NAVY: Color = Color::rgb(0x00, 0x1f, 0x3f);
    pub const BLUE: Color = Color::rgb(0x00, 0x74, 0xd9);
    pub const AQUA: Color = Color::rgb(0x7f, 0xdb, 0xff);
    pub const TEAL: Color = Color::rgb(0x39, 0xcc, 0xcc);
    pub const EASTERN: Color = Color::rgb(0x23, 0x9d, 0xad);
    pub const PURPLE: Color = Color::rgb(0xb1, 0x0d, 0xc9);
    pub const FUCHSIA: Color = Color::rgb(0xf0, 0x12, 0xbe);
    pub const MAROON: Color = Color::rgb(0x85, 0x14, 0x4b);
    pub const RED: Color = Color::rgb(0xff, 0x41, 0x36);
    pub const ORANGE: Color = Color::rgb(0xff, 0x85, 0x1b);
    pub const YELLOW: Color = Color::rgb(0xff, 0xdc, 0x00);
    pub const OLIVE: Color = Color::rgb(0x3d, 0x99, 0x70);
    pub const GREEN: Color = Color::rgb(0x2e, 0xcc, 0x40);
    pub const LIME: Color = Color::rgb(0x01, 0xff, 0x70);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// A shade of gray.
    pub const fn luma(l: u8) -> Self {
        Color::rgb(l, l, l)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let nibbles: Option<Vec<u8>> = digits
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect();
        let Some(nibbles) = nibbles else {
            return Err("color string contains non-hexadecimal letters".into());
        };
        let channels: Vec<u8> = match nibbles.len() {
            3 | 4 => nibbles.iter().map(|n| n * 17).collect(),
            6 | 8 => nibbles.chunks(2).map(|p| p[0] * 16 + p[1]).collect(),
            _ => return Err("color string has wrong length".into()),
        };
        Ok(Color {
            r: channels[0],
            g: channels[1],
            b: channels[2],
            a: channels.get(3).copied().unwrap_or(0xff),
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Mix with white by `factor` (0 to 1).
    #[must_use]
    pub fn lighten(self, factor: f64) -> Color {
        let mix = |c: u8| (f64::from(c) + (255.0 - f64::from(c)) * factor).round() as u8;
        Color::rgba(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    /// Mix with black by `factor` (0 to 1).
    #[must_use]
    pub fn darken(self, factor: f64) -> Color {
        let mix = |c: u8| (f64::from(c) * (1.0 - factor)).round() as u8;
        Color::rgba(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    #[must_use]
    pub fn negate(self) -> Color {
        Color::rgba(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb(\"{}\")", self.to_hex())
    }
}
