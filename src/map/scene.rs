//! Retained scene graph: drawable nodes per layer, keyed by stable ids.
//!
//! Coordinates are in projected space (before the camera transform). Sizes
//! are already divided by the zoom factor, so a backend that multiplies
//! everything by `k` gets constant on-screen ink.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::coords::ScreenPoint;
use crate::map::cluster::{GlyphShape, Tier};
use crate::map::color::Rgb;
use crate::map::edges::Animation;
use crate::map::spatial::CellKey;

/// Draw layers, declared bottom to top
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Background,
    Regions,
    HeatmapGlow,
    Assets,
    Edges,
    Tooltips,
}

impl LayerKind {
    /// Every layer in draw order
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Background,
        LayerKind::Regions,
        LayerKind::HeatmapGlow,
        LayerKind::Assets,
        LayerKind::Edges,
        LayerKind::Tooltips,
    ];
}

/// Stable identity of a node across updates
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKey {
    Background,
    Region(String),
    Glow(String),
    Cluster(CellKey),
    Asset(String),
    /// Relationship id and its occurrence among relationships sharing that id
    Edge(String, usize),
    Tooltip,
}

impl NodeKey {
    pub fn layer(&self) -> LayerKind {
        match self {
            NodeKey::Background => LayerKind::Background,
            NodeKey::Region(_) => LayerKind::Regions,
            NodeKey::Glow(_) => LayerKind::HeatmapGlow,
            NodeKey::Cluster(_) | NodeKey::Asset(_) => LayerKind::Assets,
            NodeKey::Edge(..) => LayerKind::Edges,
            NodeKey::Tooltip => LayerKind::Tooltips,
        }
    }
}

/// Something a backend knows how to draw
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable {
    /// Solid fill of the whole surface
    Fill { color: Rgb },
    Region {
        rings: Arc<Vec<Vec<ScreenPoint>>>,
        fill: Rgb,
        stroke: Rgb,
        stroke_width: f64,
    },
    /// Radial glow fading from `opacity` at the center to 0 at `radius`
    Glow {
        center: ScreenPoint,
        radius: f64,
        color: Rgb,
        opacity: f64,
    },
    /// Numbered aggregate marker for several assets
    ClusterMarker {
        anchor: ScreenPoint,
        radius: f64,
        count: usize,
        fill: Rgb,
        stroke_width: f64,
    },
    /// A single asset drawn by tier
    AssetGlyph {
        position: ScreenPoint,
        tier: Tier,
        shape: GlyphShape,
        size: f64,
        color: Rgb,
        label: String,
        label_size: f64,
    },
    Edge {
        points: Vec<ScreenPoint>,
        arrow: [ScreenPoint; 3],
        color: Rgb,
        stroke_width: f64,
        dash_pattern: &'static [f64],
        animation: Animation,
    },
    /// Screen-space text box (already in view coordinates)
    Tooltip { anchor: ScreenPoint, lines: Vec<String> },
}

/// A drawable with its key and in-layer order
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub key: NodeKey,
    /// Higher draws later within the layer
    pub z: i32,
    pub drawable: Drawable,
}

impl SceneNode {
    pub fn new(key: NodeKey, drawable: Drawable) -> Self {
        Self { key, z: 0, drawable }
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }
}

/// Keys touched by a scene update
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDiff {
    pub added: Vec<NodeKey>,
    pub updated: Vec<NodeKey>,
    pub removed: Vec<NodeKey>,
}

impl SceneDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn merge(&mut self, other: SceneDiff) {
        self.added.extend(other.added);
        self.updated.extend(other.updated);
        self.removed.extend(other.removed);
    }

    /// Total number of touched keys
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

/// All layers of the map
#[derive(Clone, Debug, Default)]
pub struct Scene {
    layers: BTreeMap<LayerKind, BTreeMap<NodeKey, SceneNode>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node; returns the removed keys
    pub fn clear(&mut self) -> SceneDiff {
        let removed = self
            .layers
            .values()
            .flat_map(|nodes| nodes.keys().cloned())
            .collect();
        self.layers.clear();
        SceneDiff {
            removed,
            ..SceneDiff::default()
        }
    }

    /// Make `layer` hold exactly `desired`, touching only nodes that changed.
    ///
    /// Nodes whose key belongs to another layer are ignored. If `desired`
    /// repeats a key, the last node wins.
    pub fn sync_layer(&mut self, layer: LayerKind, desired: Vec<SceneNode>) -> SceneDiff {
        let mut next: BTreeMap<NodeKey, SceneNode> = BTreeMap::new();
        for node in desired {
            if node.key.layer() == layer {
                next.insert(node.key.clone(), node);
            }
        }

        let current = self.layers.entry(layer).or_default();
        let mut diff = SceneDiff::default();

        for key in current.keys() {
            if !next.contains_key(key) {
                diff.removed.push(key.clone());
            }
        }
        for (key, node) in &next {
            match current.get(key) {
                None => diff.added.push(key.clone()),
                Some(existing) if existing != node => diff.updated.push(key.clone()),
                Some(_) => {}
            }
        }

        if !diff.is_empty() {
            *current = next;
        }
        diff
    }

    /// Nodes of a layer in draw order (z, then key)
    pub fn layer(&self, layer: LayerKind) -> Vec<&SceneNode> {
        let mut nodes: Vec<&SceneNode> = self
            .layers
            .get(&layer)
            .map(|nodes| nodes.values().collect())
            .unwrap_or_default();
        // Stable sort keeps key order within equal z
        nodes.sort_by_key(|node| node.z);
        nodes
    }

    pub fn get(&self, key: &NodeKey) -> Option<&SceneNode> {
        self.layers.get(&key.layer())?.get(key)
    }

    pub fn node_count(&self, layer: LayerKind) -> usize {
        self.layers.get(&layer).map_or(0, BTreeMap::len)
    }

    pub fn total_nodes(&self) -> usize {
        self.layers.values().map(BTreeMap::len).sum()
    }
}
