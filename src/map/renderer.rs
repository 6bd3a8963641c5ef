use crate::braille::BrailleCanvas;
use crate::coords::ScreenPoint;
use crate::map::camera::CameraTransform;
use crate::map::cluster::{GlyphShape, Tier};
use crate::map::color::{palette, Rgb};
use crate::map::edges::Animation;
use crate::map::geometry::{
    draw_annulus, draw_circle, draw_dashed_polyline, draw_diamond, draw_square, fill_polygon_cells, stroke_segment,
};
use crate::map::projection::Viewport;
use crate::map::scene::{Drawable, LayerKind, Scene};

/// Text placed over the braille map (character coordinates)
#[derive(Clone, Debug, PartialEq)]
pub struct MapLabel {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub color: Rgb,
    pub bold: bool,
}

/// Tooltip box anchored at a character cell
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipBox {
    pub col: u16,
    pub row: u16,
    pub lines: Vec<String>,
}

/// One rendered frame of the map
pub struct RenderedMap {
    pub canvas: BrailleCanvas,
    pub labels: Vec<MapLabel>,
    pub tooltip: Option<TooltipBox>,
}

/// Display settings that only affect the terminal backend
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { show_labels: true }
    }
}

/// Rasterizes a [`Scene`] onto a Braille canvas
#[derive(Default)]
pub struct MapRenderer {
    pub settings: DisplaySettings,
}

/// A label waiting for placement, lower priority places first
struct PendingLabel {
    priority: u8,
    label: MapLabel,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle asset labels
    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }

    /// Render the scene into a `cols` x `rows` character canvas.
    ///
    /// `t` is seconds since the shared animation epoch.
    pub fn render(
        &self,
        scene: &Scene,
        transform: CameraTransform,
        cols: usize,
        rows: usize,
        t: f64,
    ) -> RenderedMap {
        let mut canvas = BrailleCanvas::new(cols, rows);
        let viewport = Viewport::new(canvas.pixel_width(), canvas.pixel_height());
        let k = transform.k;
        let mut pending = Vec::new();
        let mut tooltip = None;

        for layer in LayerKind::ALL {
            for node in scene.layer(layer) {
                match &node.drawable {
                    Drawable::Fill { color } => canvas.fill_paper(*color),
                    Drawable::Region {
                        rings,
                        fill,
                        stroke,
                        stroke_width,
                    } => {
                        let view: Vec<Vec<ScreenPoint>> = rings
                            .iter()
                            .map(|ring| ring.iter().map(|&p| transform.apply(p)).collect())
                            .collect();
                        if !view.iter().any(|ring| ring_might_be_visible(ring, &viewport)) {
                            continue;
                        }
                        fill_polygon_cells(&mut canvas, &view, *fill);
                        canvas.set_pen(*stroke);
                        for ring in &view {
                            self.draw_ring(&mut canvas, ring, stroke_width * k, &viewport);
                        }
                    }
                    Drawable::Glow {
                        center,
                        radius,
                        color,
                        opacity,
                    } => draw_glow(&mut canvas, transform.apply(*center), radius * k, *color, *opacity),
                    Drawable::ClusterMarker {
                        anchor,
                        radius,
                        count,
                        fill,
                        stroke_width,
                    } => {
                        let p = transform.apply(*anchor);
                        if !viewport.is_visible(p) {
                            continue;
                        }
                        let (x, y) = (p.x.round() as i32, p.y.round() as i32);
                        let r = (radius * k).round().max(1.0) as i32;
                        canvas.set_pen(*fill);
                        draw_circle(&mut canvas, x, y, r);
                        // White outline around the disc
                        canvas.set_pen(palette::WHITE);
                        let ring = (stroke_width * k).round().max(1.0) as i32;
                        draw_annulus(&mut canvas, x, y, r, r + ring);
                        let text = count.to_string();
                        if let Some((col, row)) = cell_of(p) {
                            pending.push(PendingLabel {
                                priority: 0,
                                label: MapLabel {
                                    col: col.saturating_sub(text.len() as u16 / 2),
                                    row,
                                    text,
                                    color: palette::WHITE,
                                    bold: true,
                                },
                            });
                        }
                    }
                    Drawable::AssetGlyph {
                        position,
                        tier,
                        shape,
                        size,
                        color,
                        label,
                        ..
                    } => {
                        let p = transform.apply(*position);
                        if !viewport.is_visible(p) {
                            continue;
                        }
                        let (x, y) = (p.x.round() as i32, p.y.round() as i32);
                        let r = (size * k / 2.0).floor() as i32;
                        canvas.set_pen(*color);
                        match shape {
                            GlyphShape::Diamond => draw_diamond(&mut canvas, x, y, r.max(1)),
                            GlyphShape::Square => draw_square(&mut canvas, x, y, r.max(1)),
                            GlyphShape::Dot => draw_circle(&mut canvas, x, y, r),
                        }
                        if self.settings.show_labels && !label.is_empty() {
                            if let Some((col, row)) = cell_of(p) {
                                pending.push(PendingLabel {
                                    priority: tier.number(),
                                    label: MapLabel {
                                        col: col.saturating_add(2),
                                        row,
                                        text: label.clone(),
                                        color: *color,
                                        bold: *tier == Tier::Capital,
                                    },
                                });
                            }
                        }
                    }
                    Drawable::Edge {
                        points,
                        arrow,
                        color,
                        stroke_width,
                        dash_pattern,
                        animation,
                    } => {
                        let view: Vec<ScreenPoint> = points.iter().map(|&p| transform.apply(p)).collect();
                        if !ring_might_be_visible(&view, &viewport) {
                            continue;
                        }
                        let ink = edge_ink(*color, animation, t);
                        let width = stroke_width * k;
                        canvas.set_pen(ink);
                        draw_dashed_polyline(&mut canvas, &view, dash_pattern, animation.dash_offset(t), width);
                        let [left, tip, right] = arrow.map(|p| transform.apply(p));
                        canvas.set_pen(*color);
                        stroke_segment(&mut canvas, left, tip, 1.0);
                        stroke_segment(&mut canvas, right, tip, 1.0);
                        stroke_segment(&mut canvas, left, right, 1.0);
                    }
                    Drawable::Tooltip { anchor, lines } => {
                        if let Some((col, row)) = cell_of(*anchor) {
                            tooltip = Some(TooltipBox {
                                col: col.saturating_add(2),
                                row: row.saturating_add(1),
                                lines: lines.clone(),
                            });
                        }
                    }
                }
            }
        }

        let labels = place_labels(pending, cols);
        RenderedMap {
            canvas,
            labels,
            tooltip,
        }
    }

    /// Stroke a closed ring with viewport culling
    fn draw_ring(&self, canvas: &mut BrailleCanvas, ring: &[ScreenPoint], width: f64, viewport: &Viewport) {
        for w in ring.windows(2) {
            let (a, b) = (w[0], w[1]);
            let dist = (b.x - a.x).abs() + (b.y - a.y).abs();
            // Long jumps are ring seams across the antimeridian, not borders
            if dist < viewport.width as f64 && viewport.segment_might_be_visible(a, b) {
                stroke_segment(canvas, a, b, width);
            }
        }
    }
}

/// Edge color after applying the animation's opacity over the background
fn edge_ink(color: Rgb, animation: &Animation, t: f64) -> Rgb {
    color.over(palette::BACKGROUND, animation.opacity(t))
}

/// Radial glow: full `opacity` at the center, fading to 0 at `radius`
fn draw_glow(canvas: &mut BrailleCanvas, center: ScreenPoint, radius: f64, color: Rgb, opacity: f64) {
    if radius <= 0.0 {
        return;
    }
    let min_col = ((center.x - radius) / 2.0).floor().max(0.0) as usize;
    let max_col = ((center.x + radius) / 2.0).ceil().max(0.0) as usize;
    let min_row = ((center.y - radius) / 4.0).floor().max(0.0) as usize;
    let max_row = ((center.y + radius) / 4.0).ceil().max(0.0) as usize;

    for row in min_row..max_row.min(canvas.height()) {
        for col in min_col..max_col.min(canvas.width()) {
            let cell_center = ScreenPoint::new(col as f64 * 2.0 + 1.0, row as f64 * 4.0 + 2.0);
            let d = cell_center.distance(center);
            if d < radius {
                canvas.blend_paper(col, row, color, opacity * (1.0 - d / radius), palette::BACKGROUND);
            }
        }
    }
}

fn ring_might_be_visible(ring: &[ScreenPoint], viewport: &Viewport) -> bool {
    let mut iter = ring.iter();
    let Some(&first) = iter.next() else {
        return false;
    };
    let (min, max) = iter.fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    viewport.segment_might_be_visible(min, max)
}

/// Character cell containing a pixel, if on screen
fn cell_of(p: ScreenPoint) -> Option<(u16, u16)> {
    if p.x < 0.0 || p.y < 0.0 || !p.x.is_finite() || !p.y.is_finite() {
        return None;
    }
    let col = (p.x / 2.0) as u64;
    let row = (p.y / 4.0) as u64;
    Some((u16::try_from(col).ok()?, u16::try_from(row).ok()?))
}

/// Place labels by priority, dropping any that would overlap one already placed
fn place_labels(mut pending: Vec<PendingLabel>, cols: usize) -> Vec<MapLabel> {
    pending.sort_by_key(|p| p.priority);
    let mut placed: Vec<MapLabel> = Vec::new();

    for PendingLabel { label, .. } in pending {
        let start = label.col as usize;
        if start >= cols {
            continue;
        }
        let end = (start + label.text.chars().count()).min(cols);
        let overlaps = placed.iter().any(|other| {
            let other_start = other.col as usize;
            let other_end = other_start + other.text.chars().count();
            other.row == label.row && start < other_end && other_start < end
        });
        if !overlaps {
            placed.push(label);
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::scene::{NodeKey, SceneNode};
    use std::sync::Arc;

    fn label(col: u16, row: u16, text: &str) -> MapLabel {
        MapLabel {
            col,
            row,
            text: text.to_string(),
            color: palette::WHITE,
            bold: false,
        }
    }

    #[test]
    fn test_overlapping_labels_keep_higher_priority() {
        let pending = vec![
            PendingLabel {
                priority: 3,
                label: label(4, 1, "Lyon"),
            },
            PendingLabel {
                priority: 1,
                label: label(2, 1, "Paris"),
            },
            PendingLabel {
                priority: 2,
                label: label(2, 2, "Brest"),
            },
        ];
        let placed = place_labels(pending, 80);
        let texts: Vec<_> = placed.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Paris", "Brest"]);
    }

    #[test]
    fn test_region_fill_and_background() {
        let mut scene = Scene::new();
        scene.sync_layer(
            LayerKind::Background,
            vec![SceneNode::new(
                NodeKey::Background,
                Drawable::Fill {
                    color: palette::BACKGROUND,
                },
            )],
        );
        let ring = vec![
            ScreenPoint::new(2.0, 2.0),
            ScreenPoint::new(10.0, 2.0),
            ScreenPoint::new(10.0, 10.0),
            ScreenPoint::new(2.0, 10.0),
            ScreenPoint::new(2.0, 2.0),
        ];
        scene.sync_layer(
            LayerKind::Regions,
            vec![SceneNode::new(
                NodeKey::Region("SQR".into()),
                Drawable::Region {
                    rings: Arc::new(vec![ring]),
                    fill: palette::HOTSPOT,
                    stroke: palette::REGION_STROKE,
                    stroke_width: 0.5,
                },
            )],
        );

        let out = MapRenderer::new().render(&scene, CameraTransform::IDENTITY, 10, 5, 0.0);
        assert_eq!(out.canvas.paper(9, 4), Some(palette::BACKGROUND));
        assert_eq!(out.canvas.paper(2, 1), Some(palette::HOTSPOT));
        assert_eq!(out.canvas.ink(1, 0), Some(palette::REGION_STROKE));

        // Zooming in pushes the square's corner away from the origin
        assert_eq!(out.canvas.paper(1, 0), Some(palette::HOTSPOT));
        let zoomed = CameraTransform { k: 2.0, tx: 0.0, ty: 0.0 };
        let out = MapRenderer::new().render(&scene, zoomed, 10, 5, 0.0);
        assert_eq!(out.canvas.paper(1, 0), Some(palette::BACKGROUND));
        assert_eq!(out.canvas.paper(5, 2), Some(palette::HOTSPOT));
    }

    #[test]
    fn test_glow_fades_outward() {
        let mut canvas = BrailleCanvas::new(20, 10);
        canvas.fill_paper(palette::BACKGROUND);
        draw_glow(&mut canvas, ScreenPoint::new(21.0, 22.0), 16.0, palette::GLOW, 0.4);
        let center = canvas.paper(10, 5).unwrap();
        let edge = canvas.paper(16, 5).unwrap();
        assert_ne!(center, palette::BACKGROUND);
        assert!(center.0 > edge.0);
        assert_eq!(canvas.paper(0, 0), Some(palette::BACKGROUND));
    }

    #[test]
    fn test_cluster_marker_has_white_outline() {
        let mut scene = Scene::new();
        scene.sync_layer(
            LayerKind::Assets,
            vec![SceneNode::new(
                NodeKey::Cluster((1, 1)),
                Drawable::ClusterMarker {
                    anchor: ScreenPoint::new(20.0, 20.0),
                    radius: 6.0,
                    count: 3,
                    fill: palette::CLUSTER,
                    stroke_width: 1.0,
                },
            )],
        );

        let out = MapRenderer::new().render(&scene, CameraTransform::IDENTITY, 20, 10, 0.0);
        // Disc interior keeps the fill, the rim cell at x = 27 is outlined
        assert_eq!(out.canvas.ink(10, 5), Some(palette::CLUSTER));
        assert_eq!(out.canvas.ink(13, 5), Some(palette::WHITE));
        assert_eq!(out.canvas.ink(15, 5), None);
        assert_eq!(out.labels[0].text, "3");
    }

    #[test]
    fn test_pulse_changes_edge_ink() {
        let pulse = Animation::Pulse { period: 3.0 };
        let dim = edge_ink(palette::WHITE, &pulse, 0.0);
        let bright = edge_ink(palette::WHITE, &pulse, 1.5);
        assert!(bright.0 > dim.0);
    }
}
