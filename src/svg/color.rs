//! CSS colour values for fill/stroke interpolation

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Parse a CSS colour (hex, `rgb()`/`rgba()`, `hsl()`, named); `none`
    /// paints transparent, paint servers such as `url(#grad)` are not colours
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s == "none" {
            return Some(Self::rgba(0, 0, 0, 0));
        }
        s.parse::<svgtypes::Color>()
            .ok()
            .map(|c| Self::rgba(c.red, c.green, c.blue, c.alpha))
    }

    /// Channel-wise blend toward `other`; `t` is clamped to 0..1
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgba(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b), mix(self.a, other.a))
    }

    /// `#rrggbb`, or `rgba(...)` when not fully opaque
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, (self.a as f64 / 255.0 * 1000.0).round() / 1000.0)
        }
    }
}
