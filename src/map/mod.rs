mod camera;
mod cluster;
mod color;
mod composer;
mod edges;
mod geometry;
mod legend;
mod lod;
mod projection;
mod region;
mod renderer;
mod scene;
mod spatial;

pub use camera::{Camera, CameraTransform, TransformChanged, K_MAX, K_MIN, ZOOM_STEP};
pub use cluster::{cluster, cluster_projected, Asset, Cluster, GlyphShape, Tier, TierGlyph};
pub use color::{palette, Rgb};
pub use composer::{
    Dataset, HoverTarget, IntelFeed, SceneComposer, ARROW_LENGTH, CLUSTER_RADIUS,
    EDGE_PICK_TOLERANCE, GLOW_OPACITY, GLOW_RADIUS, GLOW_THRESHOLD,
};
pub use edges::{
    distance_to_polyline, known_categories, resolve_edges, style_for, Animation, CategoryFilter,
    CategoryStyle, EdgeArc, Relationship, ResolvedEdge, ARC_SEGMENTS,
};
pub use legend::{legend, LegendEntry, LegendSection};
pub use lod::{scaled, AssetDisplay, LodPolicy, REFERENCE_WIDTH};
pub use projection::{ProjectionParams, Viewport, MAX_LATITUDE};
pub use region::{
    FillMode, HotspotSet, Region, RegionLayer, RegionShape, RegionStyle, SeverityIndex,
    DEFAULT_HOTSPOTS,
};
pub use renderer::{DisplaySettings, MapLabel, MapRenderer, RenderedMap, TooltipBox};
pub use scene::{Drawable, LayerKind, NodeKey, Scene, SceneDiff, SceneNode};
pub use spatial::{CellKey, FeatureGrid, ScreenGrid};
