//! Map symbology: what each fill, glyph and line on the map stands for.
//!
//! Built from the same palette, tier glyphs and category styles the composer
//! draws with, so the key cannot drift from the map.

use crate::map::cluster::{GlyphShape, Tier};
use crate::map::color::{palette, Rgb};
use crate::map::composer::GLOW_THRESHOLD;
use crate::map::edges::CATEGORY_STYLES;
use crate::map::region::FillMode;

/// One swatch and its meaning
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub symbol: &'static str,
    pub color: Rgb,
    pub label: String,
}

impl LegendEntry {
    fn new(symbol: &'static str, color: Rgb, label: impl Into<String>) -> Self {
        Self {
            symbol,
            color,
            label: label.into(),
        }
    }
}

/// A titled group of entries
#[derive(Clone, Debug, PartialEq)]
pub struct LegendSection {
    pub title: &'static str,
    pub entries: Vec<LegendEntry>,
}

/// Legend for the current fill mode
pub fn legend(mode: FillMode) -> Vec<LegendSection> {
    vec![region_section(mode), asset_section(), relationship_section()]
}

fn region_section(mode: FillMode) -> LegendSection {
    let entries = match mode {
        FillMode::Categorical => vec![
            LegendEntry::new("██", palette::HOTSPOT, "Monitored hotspot"),
            LegendEntry::new("██", palette::BASELINE, "Other region"),
        ],
        FillMode::Heatmap => vec![
            LegendEntry::new("██", palette::BASELINE, "Severity 0"),
            LegendEntry::new("██", palette::BASELINE.lerp(palette::ALERT, 0.5), "Severity 50"),
            LegendEntry::new("██", palette::ALERT, "Severity 100"),
            LegendEntry::new("░░", palette::GLOW, format!("Glow above {GLOW_THRESHOLD:.0}")),
        ],
    };
    LegendSection {
        title: "Regions",
        entries,
    }
}

fn asset_section() -> LegendSection {
    let mut entries = vec![LegendEntry::new("⬤", palette::CLUSTER, "Asset cluster (count)")];
    entries.extend([Tier::Capital, Tier::Hub, Tier::Node].into_iter().map(|tier| {
        let glyph = tier.glyph();
        let name = match tier {
            Tier::Capital => "capital",
            Tier::Hub => "strategic hub",
            Tier::Node => "tactical node",
        };
        LegendEntry::new(shape_symbol(glyph.shape), glyph.color, format!("Tier {} {name}", tier.number()))
    }));
    LegendSection {
        title: "Assets",
        entries,
    }
}

fn relationship_section() -> LegendSection {
    let entries = CATEGORY_STYLES
        .iter()
        .map(|(_, style)| {
            let symbol = if style.is_dashed() { "╍╍" } else { "━━" };
            LegendEntry::new(symbol, style.color, style.label)
        })
        .collect();
    LegendSection {
        title: "Relationships",
        entries,
    }
}

fn shape_symbol(shape: GlyphShape) -> &'static str {
    match shape {
        GlyphShape::Diamond => "◆",
        GlyphShape::Square => "■",
        GlyphShape::Dot => "•",
    }
}
