use ratatui::style::Color;

/// 24-bit color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build from a packed 0xRRGGBB value
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Parse "#rrggbb" or "rrggbb"
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Linear per-channel interpolation; t = 0 gives `self`, t = 1 gives `other`
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Composite this color at `alpha` over `backdrop`
    pub fn over(self, backdrop: Rgb, alpha: f64) -> Rgb {
        backdrop.lerp(self, alpha)
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb(c.0, c.1, c.2)
    }
}

/// Fixed map colors
pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb::from_hex(0x020617);
    /// Region fill with no severity / outside the hotspot set
    pub const BASELINE: Rgb = Rgb::from_hex(0x0f172a);
    /// Heatmap fill at severity 100
    pub const ALERT: Rgb = Rgb::from_hex(0x7f1d1d);
    pub const HOTSPOT: Rgb = Rgb::from_hex(0x1e1b4b);
    pub const HOVER_FILL: Rgb = Rgb::from_hex(0x334155);
    pub const REGION_STROKE: Rgb = Rgb::from_hex(0x1e293b);
    pub const HOVER_STROKE: Rgb = Rgb::from_hex(0x00ffff);
    pub const GLOW: Rgb = Rgb::from_hex(0xef4444);
    pub const CLUSTER: Rgb = Rgb::from_hex(0x0ea5e9);
    pub const WHITE: Rgb = Rgb::from_hex(0xffffff);
    pub const TIER_1: Rgb = WHITE;
    pub const TIER_2: Rgb = Rgb::from_hex(0x06b6d4);
    pub const TIER_3: Rgb = Rgb::from_hex(0x94a3b8);
    pub const HIGHLIGHT: Rgb = HOVER_STROKE;
}
