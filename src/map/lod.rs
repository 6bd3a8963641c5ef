//! Level-of-detail policy. Every zoom threshold in the map is defined here.

use crate::map::projection::Viewport;

/// Surface width the default grid constants are tuned for
pub const REFERENCE_WIDTH: f64 = 1300.0;

/// Which representation of the asset layer is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetDisplay {
    /// Grid clusters with counts; individual glyphs hidden
    Clusters,
    /// Tiered glyphs with labels; clusters hidden
    Individual,
}

/// Zoom thresholds and grid constants.
///
/// The asset layer uses a hard switch at `cluster_cutoff`: below it only
/// clusters are drawn, at or above it only individual glyphs. There is no
/// cross-fade, so an asset is never drawn twice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodPolicy {
    /// Zoom at which clusters dissolve into individual glyphs
    pub cluster_cutoff: f64,
    /// Cluster grid cell size in pixels at k = 1 on a
    /// [`REFERENCE_WIDTH`]-wide surface
    pub base_cell_size: f64,
    /// How quickly cells shrink with zoom
    pub cell_decay: f64,
}

impl Default for LodPolicy {
    fn default() -> Self {
        Self {
            cluster_cutoff: 5.0,
            base_cell_size: 40.0,
            cell_decay: 0.2,
        }
    }
}

impl LodPolicy {
    /// Same policy with the grid scaled to a surface.
    ///
    /// Projected distances grow linearly with the viewport width, so the cell
    /// must too or a small terminal would merge far more than a browser-sized
    /// surface at the same zoom.
    pub fn for_viewport(self, viewport: Viewport) -> Self {
        let width = viewport.width.max(1) as f64;
        Self {
            base_cell_size: self.base_cell_size * width / REFERENCE_WIDTH,
            ..self
        }
    }

    /// Select the asset representation for a zoom level
    pub fn asset_display(&self, k: f64) -> AssetDisplay {
        if k < self.cluster_cutoff {
            AssetDisplay::Clusters
        } else {
            AssetDisplay::Individual
        }
    }

    /// Cluster grid cell size for a zoom level (shrinks as k grows)
    pub fn grid_size(&self, k: f64) -> f64 {
        self.base_cell_size / (k * self.cell_decay).max(1.0)
    }

    /// Human-readable detail level for the status bar
    pub fn detail_label(&self, k: f64) -> &'static str {
        match self.asset_display(k) {
            AssetDisplay::Clusters => "Strategic Overview",
            AssetDisplay::Individual => "Tactical Hub Recon",
        }
    }
}

/// Size in projected space that renders as `base_size` pixels at zoom `k`.
///
/// Stroke widths, marker radii and label sizes all go through this so the
/// apparent ink width stays constant while zooming.
#[inline(always)]
pub fn scaled(base_size: f64, k: f64) -> f64 {
    base_size / k.max(f64::MIN_POSITIVE)
}
