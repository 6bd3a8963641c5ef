//! Scene composer: owns the map state and turns it into a [`Scene`].
//!
//! Base geometry (projected region rings, centroids, asset positions) is
//! rebuilt only when the viewport or dataset changes. Everything else (zoom,
//! fill mode, filters, hover, relationships, severity) flows through
//! [`SceneComposer::update`], which diffs against the previous scene.

use std::cell::Cell;
use std::collections::HashMap;

use rayon::prelude::*;

use crate::coords::ScreenPoint;
use crate::map::camera::CameraTransform;
use crate::map::cluster::{cluster_projected, Asset, Cluster};
use crate::map::color::palette;
use crate::map::edges::{
    distance_to_polyline, resolve_edges, style_for, CategoryFilter, Relationship, ARC_SEGMENTS,
};
use crate::map::lod::{scaled, AssetDisplay, LodPolicy};
use crate::map::projection::{ProjectionParams, Viewport};
use crate::map::region::{FillMode, HotspotSet, Region, RegionLayer, RegionShape, SeverityIndex};
use crate::map::scene::{Drawable, LayerKind, NodeKey, Scene, SceneDiff, SceneNode};
use crate::map::spatial::{CellKey, FeatureGrid};

/// Severity above which a region gets a heatmap glow
pub const GLOW_THRESHOLD: f64 = 70.0;
/// Glow radius in screen pixels
pub const GLOW_RADIUS: f64 = 30.0;
/// Opacity at the center of a glow
pub const GLOW_OPACITY: f64 = 0.4;
/// Radius of a numbered cluster marker in screen pixels (braille dots)
pub const CLUSTER_RADIUS: f64 = 6.0;
/// Arrowhead length in screen pixels
pub const ARROW_LENGTH: f64 = 4.0;
/// Pointer distance (pixels) within which an edge counts as hovered
pub const EDGE_PICK_TOLERANCE: f64 = 3.0;
/// Extra pixels around a glyph that still count as a hit
const ASSET_PICK_SLOP: f64 = 2.0;
/// Cell size of the region hit-test grid (base pixels)
const REGION_INDEX_CELL: f64 = 16.0;

/// Base data whose replacement forces a full rebuild
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub regions: Vec<Region>,
    pub assets: Vec<Asset>,
}

impl Dataset {
    pub fn new(regions: Vec<Region>, assets: Vec<Asset>) -> Self {
        Self { regions, assets }
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// Relationships and severity scores from the intel feed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntelFeed {
    pub relationships: Vec<Relationship>,
    pub severity: SeverityIndex,
}

/// What sits under the pointer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoverTarget {
    Region { id: String },
    Asset { name: String },
    Cluster { cell_key: CellKey },
    /// `occurrence` tells apart relationships that share an id
    Edge { id: String, occurrence: usize },
}

/// Geometry derived from the viewport and dataset
struct SceneState {
    viewport: Viewport,
    projection: ProjectionParams,
    /// `shapes[i]` belongs to `dataset.regions[i]`
    shapes: Vec<RegionShape>,
    /// Projected region centroids by id
    centroids: HashMap<String, ScreenPoint>,
    region_index: FeatureGrid,
    /// `asset_positions[i]` belongs to `dataset.assets[i]`
    asset_positions: Vec<ScreenPoint>,
}

impl SceneState {
    fn build(viewport: Viewport, dataset: &Dataset) -> Self {
        let projection = ProjectionParams::for_viewport(viewport);

        let shapes: Vec<RegionShape> = dataset
            .regions
            .par_iter()
            .map(|region| RegionShape::project(region, &projection))
            .collect();

        let centroids = dataset
            .regions
            .iter()
            .map(|region| (region.id.clone(), projection.project(region.centroid)))
            .collect();

        let region_index = FeatureGrid::build(shapes.iter().map(|s| s.bbox), REGION_INDEX_CELL);

        let asset_positions = dataset
            .assets
            .iter()
            .map(|asset| projection.project(asset.location))
            .collect();

        Self {
            viewport,
            projection,
            shapes,
            centroids,
            region_index,
            asset_positions,
        }
    }
}

/// Builds and incrementally updates the map scene
pub struct SceneComposer {
    dataset: Dataset,
    state: SceneState,
    scene: Scene,
    lod: LodPolicy,
    regions: RegionLayer,
    relationships: Vec<Relationship>,
    filter: CategoryFilter,
    transform: CameraTransform,
    mode: FillMode,
    show_edges: bool,
    hover: Option<HoverTarget>,
    /// Pointer in view space
    pointer: Option<ScreenPoint>,
    needs_rebuild: bool,
    cluster_passes: Cell<u64>,
}

impl SceneComposer {
    pub fn new(viewport: Viewport, dataset: Dataset) -> Self {
        let state = SceneState::build(viewport, &dataset);
        Self {
            dataset,
            state,
            scene: Scene::new(),
            lod: LodPolicy::default(),
            regions: RegionLayer::default(),
            relationships: Vec::new(),
            filter: CategoryFilter::all(),
            transform: CameraTransform::IDENTITY,
            mode: FillMode::default(),
            show_edges: true,
            hover: None,
            pointer: None,
            needs_rebuild: true,
            cluster_passes: Cell::new(0),
        }
    }

    pub fn with_lod(mut self, lod: LodPolicy) -> Self {
        self.lod = lod;
        self
    }

    pub fn with_hotspots(mut self, hotspots: HotspotSet) -> Self {
        self.regions.hotspots = hotspots;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn projection(&self) -> &ProjectionParams {
        &self.state.projection
    }

    pub fn lod(&self) -> &LodPolicy {
        &self.lod
    }

    pub fn transform(&self) -> CameraTransform {
        self.transform
    }

    pub fn mode(&self) -> FillMode {
        self.mode
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn show_edges(&self) -> bool {
        self.show_edges
    }

    pub fn severity(&self) -> &SeverityIndex {
        &self.regions.severity
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Target under the pointer, as of the last update
    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    /// Projected centroid of a region, if it was loaded
    pub fn centroid(&self, region_id: &str) -> Option<ScreenPoint> {
        self.state.centroids.get(region_id).copied()
    }

    /// New surface size; rebuilds base geometry and tears the scene down
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.state.viewport {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.state = SceneState::build(viewport, &self.dataset);
        self.needs_rebuild = true;
    }

    /// Replace regions and assets; full rebuild
    pub fn load_dataset(&mut self, dataset: Dataset) {
        tracing::info!(
            regions = dataset.regions.len(),
            assets = dataset.assets.len(),
            "dataset loaded"
        );
        self.state = SceneState::build(self.state.viewport, &dataset);
        self.dataset = dataset;
        self.needs_rebuild = true;
    }

    pub fn set_relationships(&mut self, relationships: Vec<Relationship>) {
        self.relationships = relationships;
    }

    pub fn set_severity(&mut self, severity: SeverityIndex) {
        self.regions.severity = severity;
    }

    /// Apply an intel feed (relationships and severity together)
    pub fn apply_intel(&mut self, feed: IntelFeed) {
        tracing::info!(
            relationships = feed.relationships.len(),
            scored_regions = feed.severity.len(),
            "intel feed applied"
        );
        self.regions.severity = feed.severity;
        self.set_relationships(feed.relationships);
    }

    pub fn set_transform(&mut self, transform: CameraTransform) {
        self.transform = transform;
    }

    pub fn set_mode(&mut self, mode: FillMode) {
        self.mode = mode;
    }

    /// Flip one relationship category; returns whether it is now enabled
    pub fn toggle_category(&mut self, category: &str) -> bool {
        self.filter.toggle(category)
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    pub fn set_show_edges(&mut self, show: bool) {
        self.show_edges = show;
    }

    /// Move the pointer (view space); `None` when it leaves the map.
    /// The hover target under it is resolved by the next [`update`](Self::update).
    pub fn set_pointer(&mut self, pointer: Option<ScreenPoint>) {
        self.pointer = pointer;
        if pointer.is_none() {
            self.hover = None;
        }
    }

    /// Clustering passes run so far
    pub fn cluster_passes(&self) -> u64 {
        self.cluster_passes.get()
    }

    /// Bring the scene in line with the current state.
    ///
    /// Hover is resolved here, against the same clustering the asset layer
    /// uses, so a burst of gestures costs one clustering pass per update.
    /// Calling this again without changing any input returns an empty diff.
    pub fn update(&mut self) -> SceneDiff {
        let mut diff = if self.needs_rebuild {
            self.needs_rebuild = false;
            self.scene.clear()
        } else {
            SceneDiff::default()
        };

        let (hover, layers) = {
            let clusters = self.visible_clusters();
            let clusters = clusters.as_deref();
            let hover = self.pointer.and_then(|p| self.pick_among(p, clusters));
            let layers = [
                (LayerKind::Background, self.background_nodes()),
                (LayerKind::Regions, self.region_nodes(hover.as_ref())),
                (LayerKind::HeatmapGlow, self.glow_nodes()),
                (LayerKind::Assets, self.asset_nodes(clusters, hover.as_ref())),
                (LayerKind::Edges, self.edge_nodes(hover.as_ref())),
                (LayerKind::Tooltips, self.tooltip_nodes(hover.as_ref(), clusters)),
            ];
            (hover, layers)
        };
        self.hover = hover;

        for (layer, nodes) in layers {
            diff.merge(self.scene.sync_layer(layer, nodes));
        }

        if !diff.is_empty() {
            tracing::trace!(
                added = diff.added.len(),
                updated = diff.updated.len(),
                removed = diff.removed.len(),
                "scene updated"
            );
        }
        diff
    }

    fn background_nodes(&self) -> Vec<SceneNode> {
        vec![SceneNode::new(
            NodeKey::Background,
            Drawable::Fill {
                color: palette::BACKGROUND,
            },
        )]
    }

    fn region_nodes(&self, hover: Option<&HoverTarget>) -> Vec<SceneNode> {
        let k = self.transform.k;
        self.dataset
            .regions
            .iter()
            .zip(&self.state.shapes)
            .map(|(region, shape)| {
                let hovered = matches!(hover, Some(HoverTarget::Region { id }) if *id == region.id);
                let style = self.regions.style_for(&region.id, self.mode, hovered, k);
                SceneNode::new(
                    NodeKey::Region(region.id.clone()),
                    Drawable::Region {
                        rings: shape.rings.clone(),
                        fill: style.fill,
                        stroke: style.stroke,
                        stroke_width: style.stroke_width,
                    },
                )
                .with_z(i32::from(style.raised))
            })
            .collect()
    }

    fn glow_nodes(&self) -> Vec<SceneNode> {
        if self.mode != FillMode::Heatmap {
            return Vec::new();
        }
        let radius = scaled(GLOW_RADIUS, self.transform.k);
        self.dataset
            .regions
            .iter()
            .filter(|region| self.regions.severity.score(&region.id) > GLOW_THRESHOLD)
            .filter_map(|region| {
                let center = self.state.centroids.get(&region.id)?;
                Some(SceneNode::new(
                    NodeKey::Glow(region.id.clone()),
                    Drawable::Glow {
                        center: *center,
                        radius,
                        color: palette::GLOW,
                        opacity: GLOW_OPACITY,
                    },
                ))
            })
            .collect()
    }

    /// `clusters` is `Some` below the cluster cutoff
    fn asset_nodes(
        &self,
        clusters: Option<&[Cluster<'_>]>,
        hover: Option<&HoverTarget>,
    ) -> Vec<SceneNode> {
        let k = self.transform.k;
        let Some(clusters) = clusters else {
            return self
                .dataset
                .assets
                .iter()
                .map(|asset| self.glyph_node(asset, true, hover))
                .collect();
        };
        clusters
            .iter()
            .map(|c| match c.members.as_slice() {
                [only] => self.glyph_node(only, false, hover),
                _ => {
                    let hovered = hover == Some(&HoverTarget::Cluster { cell_key: c.cell_key });
                    SceneNode::new(
                        NodeKey::Cluster(c.cell_key),
                        Drawable::ClusterMarker {
                            anchor: c.anchor,
                            radius: scaled(CLUSTER_RADIUS, k),
                            count: c.len(),
                            fill: if hovered { palette::HIGHLIGHT } else { palette::CLUSTER },
                            stroke_width: scaled(1.0, k),
                        },
                    )
                    .with_z(i32::from(hovered))
                }
            })
            .collect()
    }

    fn glyph_node(&self, asset: &Asset, labelled: bool, hover: Option<&HoverTarget>) -> SceneNode {
        let k = self.transform.k;
        let glyph = asset.tier.glyph();
        let hovered = matches!(hover, Some(HoverTarget::Asset { name }) if *name == asset.name);
        SceneNode::new(
            NodeKey::Asset(asset.name.clone()),
            Drawable::AssetGlyph {
                position: self.state.projection.project(asset.location),
                tier: asset.tier,
                shape: glyph.shape,
                size: scaled(glyph.size, k),
                color: if hovered { palette::HIGHLIGHT } else { glyph.color },
                label: if labelled { asset.name.clone() } else { String::new() },
                label_size: scaled(glyph.label_size, k),
            },
        )
        .with_z(i32::from(hovered))
    }

    fn clusters(&self) -> Vec<Cluster<'_>> {
        self.cluster_passes.set(self.cluster_passes.get() + 1);
        let lod = self.lod.for_viewport(self.state.viewport);
        cluster_projected(
            &self.dataset.assets,
            &self.state.asset_positions,
            lod.grid_size(self.transform.k),
        )
    }

    /// Clusters on screen at the current zoom, `None` once glyphs take over
    fn visible_clusters(&self) -> Option<Vec<Cluster<'_>>> {
        match self.lod.asset_display(self.transform.k) {
            AssetDisplay::Clusters => Some(self.clusters()),
            AssetDisplay::Individual => None,
        }
    }

    fn edge_nodes(&self, hover: Option<&HoverTarget>) -> Vec<SceneNode> {
        if !self.show_edges {
            return Vec::new();
        }
        let k = self.transform.k;
        resolve_edges(&self.relationships, &self.filter, &self.state.centroids)
            .into_iter()
            .map(|edge| {
                let hovered = matches!(
                    hover,
                    Some(HoverTarget::Edge { id, occurrence })
                        if *id == edge.relationship.id && *occurrence == edge.occurrence
                );
                let width = if hovered {
                    edge.style.stroke_width * 2.0
                } else {
                    edge.style.stroke_width
                };
                SceneNode::new(
                    NodeKey::Edge(edge.relationship.id.clone(), edge.occurrence),
                    Drawable::Edge {
                        points: edge.arc.sample(ARC_SEGMENTS),
                        arrow: edge.arc.arrowhead(scaled(ARROW_LENGTH, k)),
                        color: edge.style.color,
                        stroke_width: scaled(width, k),
                        dash_pattern: edge.style.dash_pattern,
                        animation: edge.style.animation(),
                    },
                )
                .with_z(i32::from(hovered))
            })
            .collect()
    }

    fn tooltip_nodes(
        &self,
        hover: Option<&HoverTarget>,
        clusters: Option<&[Cluster<'_>]>,
    ) -> Vec<SceneNode> {
        let (Some(target), Some(anchor)) = (hover, self.pointer) else {
            return Vec::new();
        };
        let lines = self.describe_among(target, clusters.unwrap_or_default());
        if lines.is_empty() {
            return Vec::new();
        }
        vec![SceneNode::new(NodeKey::Tooltip, Drawable::Tooltip { anchor, lines })]
    }

    /// Tooltip text of the hover target, as of the last update
    pub fn hover_lines(&self) -> &[String] {
        match self.scene.get(&NodeKey::Tooltip).map(|node| &node.drawable) {
            Some(Drawable::Tooltip { lines, .. }) => lines,
            _ => &[],
        }
    }

    /// Tooltip text for a hover target
    pub fn describe(&self, target: &HoverTarget) -> Vec<String> {
        match target {
            HoverTarget::Cluster { .. } => self.describe_among(target, &self.clusters()),
            _ => self.describe_among(target, &[]),
        }
    }

    fn describe_among(&self, target: &HoverTarget, clusters: &[Cluster<'_>]) -> Vec<String> {
        match target {
            HoverTarget::Region { id } => match self.dataset.region(id) {
                Some(region) => vec![
                    region.name.clone(),
                    format!("{}  severity {:.0}", region.id, self.regions.severity.score(id)),
                ],
                None => Vec::new(),
            },
            HoverTarget::Asset { name } => match self.dataset.asset(name) {
                Some(asset) => vec![
                    asset.name.clone(),
                    format!("Tier {} {}", asset.tier.number(), asset.category),
                    asset.location.to_compass_string(),
                ],
                None => Vec::new(),
            },
            HoverTarget::Cluster { cell_key } => {
                let Some(cluster) = clusters.iter().find(|c| c.cell_key == *cell_key) else {
                    return Vec::new();
                };
                let mut lines = vec![format!("{} assets", cluster.len())];
                lines.extend(cluster.members.iter().take(4).map(|a| a.name.clone()));
                if cluster.len() > 4 {
                    lines.push(format!("+{} more", cluster.len() - 4));
                }
                lines
            }
            HoverTarget::Edge { id, occurrence } => {
                match self.relationships.iter().filter(|r| r.id == *id).nth(*occurrence) {
                    Some(r) => {
                        let mut lines = vec![
                            style_for(&r.category).label.to_string(),
                            format!("{} -> {}", r.source_region_id, r.target_region_id),
                        ];
                        if !r.description.is_empty() {
                            lines.push(r.description.clone());
                        }
                        lines
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    /// Topmost interactive thing at a view-space point.
    /// Edges win over assets, assets over regions (reverse draw order).
    pub fn pick(&self, view: ScreenPoint) -> Option<HoverTarget> {
        let clusters = self.visible_clusters();
        self.pick_among(view, clusters.as_deref())
    }

    fn pick_among(
        &self,
        view: ScreenPoint,
        clusters: Option<&[Cluster<'_>]>,
    ) -> Option<HoverTarget> {
        let k = self.transform.k;
        let base = self.transform.invert(view);
        self.pick_edge(base, k)
            .or_else(|| self.pick_asset(base, k, clusters))
            .or_else(|| self.pick_region(base))
    }

    fn pick_edge(&self, base: ScreenPoint, k: f64) -> Option<HoverTarget> {
        if !self.show_edges {
            return None;
        }
        let tolerance = scaled(EDGE_PICK_TOLERANCE, k);
        resolve_edges(&self.relationships, &self.filter, &self.state.centroids)
            .into_iter()
            .map(|edge| (distance_to_polyline(base, &edge.arc.sample(ARC_SEGMENTS)), edge))
            .filter(|(d, _)| *d <= tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, edge)| HoverTarget::Edge {
                id: edge.relationship.id.clone(),
                occurrence: edge.occurrence,
            })
    }

    fn pick_asset(
        &self,
        base: ScreenPoint,
        k: f64,
        clusters: Option<&[Cluster<'_>]>,
    ) -> Option<HoverTarget> {
        let candidates: Vec<(ScreenPoint, f64, HoverTarget)> = match clusters {
            Some(clusters) => clusters
                .iter()
                .map(|c| match c.members.as_slice() {
                    [only] => (
                        self.state.projection.project(only.location),
                        only.tier.glyph().size,
                        HoverTarget::Asset {
                            name: only.name.clone(),
                        },
                    ),
                    _ => (
                        c.anchor,
                        CLUSTER_RADIUS,
                        HoverTarget::Cluster { cell_key: c.cell_key },
                    ),
                })
                .collect(),
            None => self
                .dataset
                .assets
                .iter()
                .zip(&self.state.asset_positions)
                .map(|(asset, &p)| {
                    (
                        p,
                        asset.tier.glyph().size,
                        HoverTarget::Asset {
                            name: asset.name.clone(),
                        },
                    )
                })
                .collect(),
        };

        candidates
            .into_iter()
            .map(|(p, size, target)| (base.distance(p), size, target))
            .filter(|(d, size, _)| *d <= scaled(size + ASSET_PICK_SLOP, k))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, _, target)| target)
    }

    fn pick_region(&self, base: ScreenPoint) -> Option<HoverTarget> {
        self.state
            .region_index
            .query_point(base)
            .iter()
            .copied()
            .find(|&i| self.state.shapes.get(i).is_some_and(|s| s.contains(base)))
            .and_then(|i| self.dataset.regions.get(i))
            .map(|region| HoverTarget::Region {
                id: region.id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::GeoPoint;
    use crate::map::cluster::Tier;

    fn square(id: &str, lon: f64, lat: f64, size: f64) -> Region {
        Region::from_rings(
            id,
            id,
            vec![vec![
                (lon, lat),
                (lon + size, lat),
                (lon + size, lat + size),
                (lon, lat + size),
                (lon, lat),
            ]],
        )
        .unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                square("UKR", 24.0, 45.0, 10.0),
                square("RUS", 40.0, 50.0, 20.0),
                square("FRA", -2.0, 43.0, 8.0),
            ],
            vec![
                Asset::new("Kyiv", 30.5234, 50.4501, Tier::Capital, "Capital"),
                Asset::new("Minsk", 27.5615, 53.9045, Tier::Capital, "Capital"),
                Asset::new("Paris", 2.3522, 48.8566, Tier::Capital, "Capital"),
                Asset::new("Lyon", 4.8357, 45.764, Tier::Node, "Logistics"),
            ],
        )
    }

    fn intel() -> IntelFeed {
        IntelFeed {
            relationships: vec![
                Relationship::new("1", "UKR", "RUS", "PROXY_WAR", "front line"),
                Relationship::new("2", "UKR", "USA", "ARMS_FLOW", "aid"),
                Relationship::new("3", "XYZ", "RUS", "PROXY_WAR", "unknown source"),
                Relationship::new("4", "FRA", "UKR", "ALLIANCE", "support"),
            ],
            severity: [("UKR", 96.0), ("RUS", 88.0), ("FRA", 10.0)].into_iter().collect(),
        }
    }

    fn composer() -> SceneComposer {
        let mut composer = SceneComposer::new(Viewport::new(1300, 800), dataset());
        composer.apply_intel(intel());
        composer
    }

    fn zoom_to(composer: &mut SceneComposer, k: f64) {
        composer.set_transform(CameraTransform { k, tx: 0.0, ty: 0.0 });
    }

    #[test]
    fn test_first_update_builds_every_layer() {
        let mut composer = composer();
        let diff = composer.update();
        assert!(diff.removed.is_empty());
        let scene = composer.scene();
        assert_eq!(scene.node_count(LayerKind::Background), 1);
        assert_eq!(scene.node_count(LayerKind::Regions), 3);
        assert_eq!(scene.node_count(LayerKind::HeatmapGlow), 0);
        assert!(scene.node_count(LayerKind::Assets) > 0);
        assert_eq!(scene.node_count(LayerKind::Tooltips), 0);
        assert_eq!(diff.added.len(), scene.total_nodes());
    }

    #[test]
    fn test_idempotent_redraw() {
        let mut composer = composer();
        composer.update();
        let counts: Vec<usize> = LayerKind::ALL
            .iter()
            .map(|&l| composer.scene().node_count(l))
            .collect();

        let diff = composer.update();
        assert!(diff.is_empty());
        let again: Vec<usize> = LayerKind::ALL
            .iter()
            .map(|&l| composer.scene().node_count(l))
            .collect();
        assert_eq!(counts, again);
    }

    #[test]
    fn test_edges_follow_filter_and_resolution() {
        let mut composer = composer();
        composer.set_filter(["PROXY_WAR"].into_iter().collect());
        composer.update();
        let scene = composer.scene();
        assert_eq!(scene.node_count(LayerKind::Edges), 1);
        assert!(scene.get(&NodeKey::Edge("1".into(), 0)).is_some());

        composer.toggle_category("ALLIANCE");
        let diff = composer.update();
        assert_eq!(diff.added, vec![NodeKey::Edge("4".into(), 0)]);
        assert!(diff.updated.is_empty());
        assert!(diff.removed.is_empty());

        composer.set_show_edges(false);
        composer.update();
        assert_eq!(composer.scene().node_count(LayerKind::Edges), 0);
    }

    #[test]
    fn test_glow_only_in_heatmap_mode() {
        let mut composer = composer();
        composer.set_mode(FillMode::Heatmap);
        composer.update();
        let scene = composer.scene();
        assert_eq!(scene.node_count(LayerKind::HeatmapGlow), 2);
        assert!(scene.get(&NodeKey::Glow("FRA".into())).is_none());

        composer.set_mode(FillMode::Categorical);
        let diff = composer.update();
        assert_eq!(diff.removed.len(), 2);
        assert_eq!(composer.scene().node_count(LayerKind::HeatmapGlow), 0);
    }

    #[test]
    fn test_heatmap_fill_reaches_scene() {
        let mut composer = composer();
        composer.set_mode(FillMode::Heatmap);
        composer.update();
        match &composer.scene().get(&NodeKey::Region("UKR".into())).unwrap().drawable {
            Drawable::Region { fill, .. } => {
                assert_eq!(*fill, palette::BASELINE.lerp(palette::ALERT, 0.96));
            }
            other => panic!("unexpected drawable {other:?}"),
        }
    }

    #[test]
    fn test_zoom_switches_asset_representation() {
        let mut composer = composer();
        composer.update();
        let overview = composer.scene().layer(LayerKind::Assets).len();
        assert!(overview < composer.dataset().assets.len());

        zoom_to(&mut composer, 5.0);
        composer.update();
        let assets = composer.scene().layer(LayerKind::Assets);
        assert_eq!(assets.len(), composer.dataset().assets.len());
        assert!(assets.iter().all(|n| matches!(n.key, NodeKey::Asset(_))));
        assert!(assets.iter().all(|n| matches!(
            &n.drawable,
            Drawable::AssetGlyph { label, .. } if !label.is_empty()
        )));
    }

    #[test]
    fn test_ink_width_is_constant_across_zoom() {
        let mut composer = composer();
        let width_at = |composer: &mut SceneComposer, k: f64| {
            zoom_to(composer, k);
            composer.update();
            match &composer.scene().get(&NodeKey::Region("FRA".into())).unwrap().drawable {
                Drawable::Region { stroke_width, .. } => stroke_width * k,
                other => panic!("unexpected drawable {other:?}"),
            }
        };
        let a = width_at(&mut composer, 2.0);
        let b = width_at(&mut composer, 40.0);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_resize_tears_down_and_rebuilds() {
        let mut composer = composer();
        composer.update();
        let before = composer.scene().total_nodes();

        composer.resize(Viewport::new(1300, 800));
        assert!(composer.update().is_empty());

        composer.resize(Viewport::new(650, 400));
        let diff = composer.update();
        assert_eq!(diff.removed.len(), before);
        assert_eq!(diff.added.len(), composer.scene().total_nodes());
    }

    #[test]
    fn test_centroids_rebuilt_on_dataset_load() {
        let mut composer = composer();
        assert!(composer.centroid("FRA").is_some());
        composer.load_dataset(Dataset::new(vec![square("DEU", 6.0, 47.0, 8.0)], Vec::new()));
        assert!(composer.centroid("FRA").is_none());
        assert!(composer.centroid("DEU").is_some());
    }

    #[test]
    fn test_pick_region_and_hover_tooltip() {
        let mut composer = composer();
        let inside = composer.projection().project(GeoPoint::new(-1.0, 50.0));
        assert_eq!(
            composer.pick(inside),
            Some(HoverTarget::Region { id: "FRA".into() })
        );
        assert_eq!(composer.pick(ScreenPoint::new(-500.0, -500.0)), None);

        composer.set_pointer(Some(inside));
        composer.update();
        match &composer.scene().get(&NodeKey::Tooltip).unwrap().drawable {
            Drawable::Tooltip { lines, .. } => assert_eq!(lines[0], "FRA"),
            other => panic!("unexpected drawable {other:?}"),
        }
        let hovered = composer.scene().get(&NodeKey::Region("FRA".into())).unwrap();
        assert_eq!(hovered.z, 1);

        composer.set_pointer(None);
        composer.update();
        assert_eq!(composer.scene().node_count(LayerKind::Tooltips), 0);
    }

    #[test]
    fn test_pick_asset_at_tactical_zoom() {
        let mut composer = composer();
        let paris = composer.projection().project(GeoPoint::new(2.3522, 48.8566));
        let transform = CameraTransform { k: 10.0, tx: 0.0, ty: 0.0 };
        composer.set_transform(transform);
        assert_eq!(
            composer.pick(transform.apply(paris)),
            Some(HoverTarget::Asset { name: "Paris".into() })
        );
    }

    #[test]
    fn test_pick_prefers_edges() {
        let mut composer = composer();
        let start = composer.centroid("UKR").unwrap();
        let end = composer.centroid("RUS").unwrap();
        let mid = crate::map::edges::EdgeArc::between(start, end).unwrap().point_at(0.5);
        let edge = HoverTarget::Edge {
            id: "1".into(),
            occurrence: 0,
        };
        assert_eq!(composer.pick(mid), Some(edge.clone()));

        composer.set_show_edges(false);
        assert_ne!(composer.pick(mid), Some(edge));
    }

    #[test]
    fn test_repeated_relationship_ids_each_get_an_edge() {
        let mut composer = composer();
        composer.set_relationships(vec![
            Relationship::new("c1", "UKR", "RUS", "PROXY_WAR", ""),
            Relationship::new("c1", "FRA", "RUS", "ARMS_FLOW", ""),
        ]);
        composer.update();
        let scene = composer.scene();
        assert_eq!(scene.node_count(LayerKind::Edges), 2);
        assert!(scene.get(&NodeKey::Edge("c1".into(), 0)).is_some());
        assert!(scene.get(&NodeKey::Edge("c1".into(), 1)).is_some());

        let second = HoverTarget::Edge {
            id: "c1".into(),
            occurrence: 1,
        };
        assert_eq!(composer.describe(&second)[1], "FRA -> RUS");
    }

    #[test]
    fn test_gesture_burst_clusters_once_per_update() {
        let mut composer = composer();
        composer.update();
        let before = composer.cluster_passes();

        let kyiv = composer.projection().project(GeoPoint::new(30.5234, 50.4501));
        for step in 0..20 {
            let k = 1.0 + step as f64 * 0.1;
            zoom_to(&mut composer, k);
            composer.set_pointer(Some(kyiv * k));
        }
        assert_eq!(composer.cluster_passes(), before);
        assert!(composer.hover().is_none());

        composer.update();
        assert_eq!(composer.cluster_passes(), before + 1);
        assert!(composer.hover().is_some());
        assert!(!composer.hover_lines().is_empty());
    }
}
