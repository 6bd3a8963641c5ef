use std::collections::{BTreeSet, HashMap};
use std::f64::consts::FRAC_PI_3;

use serde::Deserialize;

use crate::coords::ScreenPoint;
use crate::map::color::{palette, Rgb};

/// Segments used to approximate one arc
pub const ARC_SEGMENTS: usize = 32;

/// A directed, categorized link between two regions
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Relationship {
    pub id: String,
    /// Source region id (ISO alpha-3)
    #[serde(rename = "source")]
    pub source_region_id: String,
    /// Target region id (ISO alpha-3)
    #[serde(rename = "target")]
    pub target_region_id: String,
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl Relationship {
    pub fn new(id: &str, source: &str, target: &str, category: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            source_region_id: source.to_string(),
            target_region_id: target.to_string(),
            category: category.to_string(),
            description: description.to_string(),
        }
    }
}

/// How an edge moves
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Animation {
    /// Dash offset runs from `DASH_TRAVEL` to 0 once per period, suggesting flow
    DashFlow { period: f64 },
    /// Opacity pulses 0.3 -> 0.8 -> 0.3 once per period
    Pulse { period: f64 },
}

/// Dash offset distance covered per animation period (pixels)
pub const DASH_TRAVEL: f64 = 100.0;
/// Opacity of dashed edges (they animate offset, not opacity)
pub const DASHED_OPACITY: f64 = 0.6;
const PULSE_LOW: f64 = 0.3;
const PULSE_HIGH: f64 = 0.8;

impl Animation {
    /// Fraction of the current period elapsed at `t` seconds, in [0, 1)
    fn phase(period: f64, t: f64) -> f64 {
        if period <= 0.0 {
            return 0.0;
        }
        (t / period).rem_euclid(1.0)
    }

    pub fn dash_offset(&self, t: f64) -> f64 {
        match *self {
            Animation::DashFlow { period } => DASH_TRAVEL * (1.0 - Self::phase(period, t)),
            Animation::Pulse { .. } => 0.0,
        }
    }

    pub fn opacity(&self, t: f64) -> f64 {
        match *self {
            Animation::DashFlow { .. } => DASHED_OPACITY,
            Animation::Pulse { period } => {
                let p = Self::phase(period, t);
                let swing = PULSE_HIGH - PULSE_LOW;
                if p < 0.5 {
                    PULSE_LOW + swing * (p / 0.5)
                } else {
                    PULSE_HIGH - swing * ((p - 0.5) / 0.5)
                }
            }
        }
    }
}

/// Paint and motion for one relationship category
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryStyle {
    pub color: Rgb,
    /// Alternating on/off lengths in pixels; empty means solid
    pub dash_pattern: &'static [f64],
    /// Seconds per animation loop
    pub animation_period: f64,
    /// Screen-space stroke width in pixels
    pub stroke_width: f64,
    pub label: &'static str,
}

impl CategoryStyle {
    pub fn is_dashed(&self) -> bool {
        !self.dash_pattern.is_empty()
    }

    pub fn animation(&self) -> Animation {
        if self.is_dashed() {
            Animation::DashFlow {
                period: self.animation_period,
            }
        } else {
            Animation::Pulse {
                period: self.animation_period,
            }
        }
    }
}

/// Style for categories not in [`CATEGORY_STYLES`]
pub static DEFAULT_STYLE: CategoryStyle = CategoryStyle {
    color: palette::WHITE,
    dash_pattern: &[],
    animation_period: 3.0,
    stroke_width: 1.0,
    label: "Unclassified Link",
};

/// Known relationship categories, in legend order
pub static CATEGORY_STYLES: [(&str, CategoryStyle); 5] = [
    (
        "PROXY_WAR",
        CategoryStyle {
            color: Rgb::from_hex(0xf59e0b),
            dash_pattern: &[4.0, 4.0],
            animation_period: 2.0,
            stroke_width: 1.5,
            label: "Proxy Intervention",
        },
    ),
    (
        "ARMS_FLOW",
        CategoryStyle {
            color: Rgb::from_hex(0x06b6d4),
            dash_pattern: &[10.0, 5.0],
            animation_period: 1.5,
            stroke_width: 1.2,
            label: "Logistics / Arms Flow",
        },
    ),
    (
        "ALLIANCE",
        CategoryStyle {
            color: Rgb::from_hex(0x10b981),
            dash_pattern: &[],
            animation_period: 3.0,
            stroke_width: 2.0,
            label: "Strategic Alliance",
        },
    ),
    (
        "CYBER",
        CategoryStyle {
            color: Rgb::from_hex(0xa855f7),
            dash_pattern: &[2.0, 1.0],
            animation_period: 0.5,
            stroke_width: 1.0,
            label: "Cyber Operation",
        },
    ),
    (
        "SPILLOVER",
        CategoryStyle {
            color: Rgb::from_hex(0xef4444),
            dash_pattern: &[15.0, 3.0],
            animation_period: 4.0,
            stroke_width: 2.5,
            label: "Regional Spillover",
        },
    ),
];

/// Style for a category, falling back to [`DEFAULT_STYLE`]
pub fn style_for(category: &str) -> &'static CategoryStyle {
    CATEGORY_STYLES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, style)| style)
        .unwrap_or(&DEFAULT_STYLE)
}

/// Known category names in legend order
pub fn known_categories() -> impl Iterator<Item = &'static str> {
    CATEGORY_STYLES.iter().map(|(name, _)| *name)
}

/// The set of categories whose edges are drawn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFilter(BTreeSet<String>);

impl CategoryFilter {
    /// Every known category enabled
    pub fn all() -> Self {
        known_categories().collect()
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }

    /// Flip one category; returns whether it is now enabled
    pub fn toggle(&mut self, category: &str) -> bool {
        if self.0.remove(category) {
            false
        } else {
            self.0.insert(category.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Circular arc from `start` to `end` with radius equal to the chord length.
///
/// Always the short arc, always swept with increasing angle (clockwise on a
/// y-down screen), so a given (start, end) pair bends the same way every time
/// and swapping the endpoints bends it to the other side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeArc {
    pub start: ScreenPoint,
    pub end: ScreenPoint,
    pub center: ScreenPoint,
    pub radius: f64,
    start_angle: f64,
}

impl EdgeArc {
    /// Sweep of every arc: a chord equal to the radius subtends 60 degrees
    pub const SWEEP: f64 = FRAC_PI_3;

    /// `None` when the endpoints coincide (no arc to draw)
    pub fn between(start: ScreenPoint, end: ScreenPoint) -> Option<Self> {
        let chord = end - start;
        let radius = chord.length();
        if !radius.is_finite() || radius < 1e-9 {
            return None;
        }

        // Center sits on the chord's perpendicular bisector at sqrt(3)/2 * chord
        let half = (start - end) / 2.0;
        let center = (start + end) / 2.0 + ScreenPoint::new(half.y, -half.x) * 3f64.sqrt();
        let offset = start - center;

        Some(Self {
            start,
            end,
            center,
            radius,
            start_angle: offset.y.atan2(offset.x),
        })
    }

    /// Point at parameter t in [0, 1] along the arc
    pub fn point_at(&self, t: f64) -> ScreenPoint {
        let angle = self.start_angle + Self::SWEEP * t;
        self.center + ScreenPoint::new(angle.cos(), angle.sin()) * self.radius
    }

    /// Polyline approximation with `segments` segments (endpoints exact)
    pub fn sample(&self, segments: usize) -> Vec<ScreenPoint> {
        let segments = segments.max(1);
        let mut points: Vec<ScreenPoint> = (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect();
        points[0] = self.start;
        points[segments] = self.end;
        points
    }

    /// Unit direction of travel at the end of the arc
    pub fn end_direction(&self) -> ScreenPoint {
        let angle = self.start_angle + Self::SWEEP;
        ScreenPoint::new(-angle.sin(), angle.cos())
    }

    /// Arrowhead triangle at the end: (left barb, tip, right barb)
    pub fn arrowhead(&self, length: f64) -> [ScreenPoint; 3] {
        let dir = self.end_direction();
        let normal = ScreenPoint::new(-dir.y, dir.x);
        let back = self.end - dir * length;
        [
            back + normal * (length * 0.5),
            self.end,
            back - normal * (length * 0.5),
        ]
    }
}

/// A relationship that passed filtering and resolved both endpoints
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEdge<'a> {
    pub relationship: &'a Relationship,
    /// Earlier relationships in the feed carrying the same id
    pub occurrence: usize,
    pub style: &'static CategoryStyle,
    pub arc: EdgeArc,
}

/// Edges to draw: category enabled AND both endpoints known.
/// Anything else is dropped without error. Ids are not assumed unique;
/// `(id, occurrence)` identifies an edge.
pub fn resolve_edges<'a>(
    relationships: &'a [Relationship],
    filter: &CategoryFilter,
    centroids: &HashMap<String, ScreenPoint>,
) -> Vec<ResolvedEdge<'a>> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    relationships
        .iter()
        .map(|r| {
            let count = seen.entry(r.id.as_str()).or_default();
            let occurrence = *count;
            *count += 1;
            (r, occurrence)
        })
        .filter(|(r, _)| filter.contains(&r.category))
        .filter_map(|(r, occurrence)| {
            let source = centroids.get(&r.source_region_id)?;
            let target = centroids.get(&r.target_region_id)?;
            let arc = EdgeArc::between(*source, *target)?;
            Some(ResolvedEdge {
                relationship: r,
                occurrence,
                style: style_for(&r.category),
                arc,
            })
        })
        .collect()
}

/// Shortest distance from `p` to a polyline
pub fn distance_to_polyline(p: ScreenPoint, points: &[ScreenPoint]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => p.distance(*only),
        _ => points
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn distance_to_segment(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn centroids() -> HashMap<String, ScreenPoint> {
        HashMap::from([
            ("UKR".to_string(), ScreenPoint::new(100.0, 50.0)),
            ("RUS".to_string(), ScreenPoint::new(160.0, 30.0)),
        ])
    }

    #[test]
    fn test_filter_and_resolution() {
        let relationships = vec![
            Relationship::new("1", "UKR", "RUS", "PROXY_WAR", "front line"),
            Relationship::new("2", "UKR", "USA", "ARMS_FLOW", "aid"),
            Relationship::new("3", "XYZ", "RUS", "PROXY_WAR", "unknown source"),
        ];
        let filter: CategoryFilter = ["PROXY_WAR"].into_iter().collect();

        let edges = resolve_edges(&relationships, &filter, &centroids());
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].relationship.id, "1");
    }

    #[test]
    fn test_repeated_ids_are_told_apart() {
        let relationships = vec![
            Relationship::new("c1", "UKR", "RUS", "PROXY_WAR", ""),
            Relationship::new("c1", "XYZ", "RUS", "PROXY_WAR", ""),
            Relationship::new("c1", "RUS", "UKR", "ARMS_FLOW", ""),
        ];
        let edges = resolve_edges(&relationships, &CategoryFilter::all(), &centroids());
        let keys: Vec<_> = edges
            .iter()
            .map(|e| (e.relationship.id.as_str(), e.occurrence))
            .collect();
        assert_eq!(keys, vec![("c1", 0), ("c1", 2)]);
    }

    #[test]
    fn test_empty_filter_draws_nothing() {
        let relationships = vec![Relationship::new("1", "UKR", "RUS", "ALLIANCE", "")];
        assert!(resolve_edges(&relationships, &CategoryFilter::none(), &centroids()).is_empty());
    }

    #[test]
    fn test_unknown_category_uses_default_style() {
        let style = style_for("PSYOPS");
        assert_eq!(style, &DEFAULT_STYLE);
        assert_eq!(style.color, palette::WHITE);
        assert!(!style.is_dashed());
        assert_eq!(style.stroke_width, 1.0);
    }

    #[test]
    fn test_arc_hits_both_endpoints() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(2.0, 0.0);
        let arc = EdgeArc::between(a, b).unwrap();

        assert_abs_diff_eq!(arc.radius, 2.0, epsilon = 1e-12);
        let end = arc.point_at(1.0);
        assert_abs_diff_eq!(end.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(end.y, b.y, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.center.distance(a), 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.center.distance(b), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_bends_consistently() {
        let a = ScreenPoint::new(0.0, 0.0);
        let b = ScreenPoint::new(2.0, 0.0);

        // Same pair, same curve
        assert_eq!(EdgeArc::between(a, b), EdgeArc::between(a, b));

        // Left-to-right arcs bow upward on a y-down screen; reversed ones bow downward
        let forward = EdgeArc::between(a, b).unwrap().point_at(0.5);
        let backward = EdgeArc::between(b, a).unwrap().point_at(0.5);
        assert!(forward.y < 0.0);
        assert!(backward.y > 0.0);
    }

    #[test]
    fn test_coincident_endpoints_have_no_arc() {
        let p = ScreenPoint::new(5.0, 5.0);
        assert!(EdgeArc::between(p, p).is_none());
    }

    #[test]
    fn test_arrowhead_points_at_target() {
        let arc = EdgeArc::between(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 0.0)).unwrap();
        let [left, tip, right] = arc.arrowhead(2.0);
        assert_eq!(tip, arc.end);
        assert_abs_diff_eq!(left.distance(tip), right.distance(tip), epsilon = 1e-9);
    }

    #[test]
    fn test_dash_animation_loops() {
        let anim = style_for("PROXY_WAR").animation();
        assert_eq!(anim, Animation::DashFlow { period: 2.0 });
        assert_abs_diff_eq!(anim.dash_offset(0.0), 100.0);
        assert_abs_diff_eq!(anim.dash_offset(1.0), 50.0);
        assert_abs_diff_eq!(anim.dash_offset(2.0), 100.0);
        assert_eq!(anim.opacity(0.7), DASHED_OPACITY);
    }

    #[test]
    fn test_pulse_animation() {
        let anim = style_for("ALLIANCE").animation();
        assert_eq!(anim, Animation::Pulse { period: 3.0 });
        assert_abs_diff_eq!(anim.opacity(0.0), 0.3);
        assert_abs_diff_eq!(anim.opacity(1.5), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(anim.opacity(3.0), 0.3, epsilon = 1e-12);
        assert_eq!(anim.dash_offset(1.0), 0.0);
    }

    #[test]
    fn test_filter_toggle() {
        let mut filter = CategoryFilter::all();
        assert_eq!(filter.len(), 5);
        assert!(!filter.toggle("CYBER"));
        assert!(!filter.contains("CYBER"));
        assert!(filter.toggle("CYBER"));
        assert!(filter.contains("CYBER"));
    }

    #[test]
    fn test_polyline_distance() {
        let line = [ScreenPoint::new(0.0, 0.0), ScreenPoint::new(10.0, 0.0)];
        assert_abs_diff_eq!(distance_to_polyline(ScreenPoint::new(5.0, 3.0), &line), 3.0);
        assert_abs_diff_eq!(distance_to_polyline(ScreenPoint::new(-4.0, 3.0), &line), 5.0);
        assert_eq!(distance_to_polyline(ScreenPoint::ZERO, &[]), f64::INFINITY);
    }

    #[test]
    fn test_relationship_payload_shape() {
        let mut bytes = br#"{"id":"c1","source":"IRN","target":"YEM","type":"ARMS_FLOW","description":"drones"}"#.to_vec();
        let r: Relationship = simd_json::serde::from_slice(&mut bytes).unwrap();
        assert_eq!(r, Relationship::new("c1", "IRN", "YEM", "ARMS_FLOW", "drones"));
    }
}
