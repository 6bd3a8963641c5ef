use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use geo::{BoundingRect, Centroid, Contains, Coord, LineString, MapCoords, MultiPolygon, Point, Polygon};

use crate::coords::{GeoPoint, ScreenPoint};
use crate::map::color::{palette, Rgb};
use crate::map::lod::scaled;
use crate::map::projection::ProjectionParams;

/// Stroke width of an idle region outline (screen pixels)
pub const BASE_STROKE_WIDTH: f64 = 0.5;
/// Stroke width of the hovered region outline (screen pixels)
pub const HOVER_STROKE_WIDTH: f64 = 1.5;

/// Region ids shown as kinetic hotspots in categorical mode
pub const DEFAULT_HOTSPOTS: [&str; 12] = [
    "UKR", "SDN", "COD", "MMR", "YEM", "SYR", "AFG", "ETH", "PSE", "ISR", "RUS", "TWN",
];

/// A country polygon with a cached centroid
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// ISO-3166 alpha-3 code
    pub id: String,
    pub name: String,
    pub boundary: MultiPolygon<f64>,
    /// Computed once at load time
    pub centroid: GeoPoint,
}

impl Region {
    /// Build a region. Returns `None` when the boundary has no area to take a centroid of.
    pub fn new(id: impl Into<String>, name: impl Into<String>, boundary: MultiPolygon<f64>) -> Option<Self> {
        let c = boundary.centroid()?;
        if !c.x().is_finite() || !c.y().is_finite() {
            return None;
        }
        Some(Self {
            id: id.into(),
            name: name.into(),
            boundary,
            centroid: GeoPoint::new(c.x(), c.y()),
        })
    }

    /// Build from exterior rings given as (lon, lat) pairs
    pub fn from_rings(id: &str, name: &str, rings: Vec<Vec<(f64, f64)>>) -> Option<Self> {
        let polygons: Vec<Polygon<f64>> = rings
            .into_iter()
            .filter(|ring| ring.len() >= 3)
            .map(|ring| Polygon::new(LineString::from(ring), Vec::new()))
            .collect();
        Self::new(id, name, MultiPolygon::new(polygons))
    }
}

/// A region's boundary projected to screen space (at k = 1)
#[derive(Clone, Debug)]
pub struct RegionShape {
    /// Every ring (exteriors and holes) as screen points
    pub rings: Arc<Vec<Vec<ScreenPoint>>>,
    /// Projected polygon for containment tests
    outline: MultiPolygon<f64>,
    /// (min_x, min_y, max_x, max_y)
    pub bbox: (f64, f64, f64, f64),
}

impl RegionShape {
    pub fn project(region: &Region, projection: &ProjectionParams) -> Self {
        let outline: MultiPolygon<f64> = region.boundary.map_coords(|c| {
            let s = projection.project(GeoPoint::new(c.x, c.y));
            Coord { x: s.x, y: s.y }
        });

        let rings = outline
            .iter()
            .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
            .map(|ring| ring.coords().map(|c| ScreenPoint::new(c.x, c.y)).collect())
            .collect();

        let bbox = outline
            .bounding_rect()
            .map(|r| (r.min().x, r.min().y, r.max().x, r.max().y))
            .unwrap_or((0.0, 0.0, 0.0, 0.0));

        Self {
            rings: Arc::new(rings),
            outline,
            bbox,
        }
    }

    /// Whether a projected point falls inside the region
    pub fn contains(&self, p: ScreenPoint) -> bool {
        self.outline.contains(&Point::new(p.x, p.y))
    }
}

/// How region fills are chosen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Hotspot set vs everything else
    #[default]
    Categorical,
    /// Baseline-to-alert ramp by severity score
    Heatmap,
}

impl FillMode {
    pub fn toggled(self) -> Self {
        match self {
            FillMode::Categorical => FillMode::Heatmap,
            FillMode::Heatmap => FillMode::Categorical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FillMode::Categorical => "Hotspots",
            FillMode::Heatmap => "Heatmap",
        }
    }
}

/// Region id -> conflict severity in [0, 100]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeverityIndex(HashMap<String, f64>);

impl SeverityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a score, clamped into [0, 100]. Non-finite scores are ignored.
    pub fn insert(&mut self, region_id: impl Into<String>, score: f64) {
        if score.is_finite() {
            self.0.insert(region_id.into(), score.clamp(0.0, 100.0));
        }
    }

    /// Score for a region; unknown regions score 0
    pub fn score(&self, region_id: &str) -> f64 {
        self.0.get(region_id).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, score)| (id.as_str(), *score))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SeverityIndex {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (id, score) in iter {
            index.insert(id, score);
        }
        index
    }
}

/// Curated set of hotspot region ids
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotSet(HashSet<String>);

impl HotspotSet {
    pub fn contains(&self, region_id: &str) -> bool {
        self.0.contains(region_id)
    }
}

impl Default for HotspotSet {
    fn default() -> Self {
        DEFAULT_HOTSPOTS.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for HotspotSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Resolved paint for one region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionStyle {
    pub fill: Rgb,
    pub stroke: Rgb,
    /// Projected-space width; renders as a constant number of pixels
    pub stroke_width: f64,
    /// Drawn above its neighbours
    pub raised: bool,
}

/// Colors regions by mode, severity and hover state
#[derive(Clone, Debug, Default)]
pub struct RegionLayer {
    pub hotspots: HotspotSet,
    pub severity: SeverityIndex,
}

impl RegionLayer {
    pub fn new(hotspots: HotspotSet, severity: SeverityIndex) -> Self {
        Self { hotspots, severity }
    }

    /// Idle fill for a region in the given mode
    pub fn fill_color_for(&self, region_id: &str, mode: FillMode) -> Rgb {
        match mode {
            FillMode::Categorical => {
                if self.hotspots.contains(region_id) {
                    palette::HOTSPOT
                } else {
                    palette::BASELINE
                }
            }
            FillMode::Heatmap => {
                let score = self.severity.score(region_id);
                palette::BASELINE.lerp(palette::ALERT, score / 100.0)
            }
        }
    }

    /// Full style including hover highlight, with stroke scaled for zoom `k`
    pub fn style_for(&self, region_id: &str, mode: FillMode, hovered: bool, k: f64) -> RegionStyle {
        if hovered {
            RegionStyle {
                fill: palette::HOVER_FILL,
                stroke: palette::HOVER_STROKE,
                stroke_width: scaled(HOVER_STROKE_WIDTH, k),
                raised: true,
            }
        } else {
            RegionStyle {
                fill: self.fill_color_for(region_id, mode),
                stroke: palette::REGION_STROKE,
                stroke_width: scaled(BASE_STROKE_WIDTH, k),
                raised: false,
            }
        }
    }
}
