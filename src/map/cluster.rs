use serde::Deserialize;

use crate::coords::{GeoPoint, ScreenPoint};
use crate::map::color::{palette, Rgb};
use crate::map::lod::LodPolicy;
use crate::map::projection::ProjectionParams;
use crate::map::spatial::{CellKey, ScreenGrid};

/// Visibility priority of an asset; also decides its glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum Tier {
    /// Major capital
    Capital = 1,
    /// Strategic hub
    Hub = 2,
    /// Minor city / tactical node
    Node = 3,
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::Capital),
            2 => Ok(Tier::Hub),
            3 => Ok(Tier::Node),
            other => Err(format!("asset tier must be 1, 2 or 3 (got {other})")),
        }
    }
}

/// Shape drawn for an individual asset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphShape {
    Diamond,
    Square,
    Dot,
}

/// Screen-space glyph metrics for a tier (pixels at any zoom)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierGlyph {
    pub shape: GlyphShape,
    pub size: f64,
    pub color: Rgb,
    pub label_size: f64,
}

impl Tier {
    pub fn glyph(self) -> TierGlyph {
        match self {
            Tier::Capital => TierGlyph {
                shape: GlyphShape::Diamond,
                size: 5.0,
                color: palette::TIER_1,
                label_size: 6.0,
            },
            Tier::Hub => TierGlyph {
                shape: GlyphShape::Square,
                size: 4.0,
                color: palette::TIER_2,
                label_size: 5.0,
            },
            Tier::Node => TierGlyph {
                shape: GlyphShape::Dot,
                size: 1.5,
                color: palette::TIER_3,
                label_size: 4.0,
            },
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

/// A point of interest (capital, hub, node)
#[derive(Clone, Debug, PartialEq)]
pub struct Asset {
    pub name: String,
    pub location: GeoPoint,
    pub tier: Tier,
    pub category: String,
}

impl Asset {
    pub fn new(name: &str, lon: f64, lat: f64, tier: Tier, category: &str) -> Self {
        Self {
            name: name.to_string(),
            location: GeoPoint::new(lon, lat),
            tier,
            category: category.to_string(),
        }
    }
}

/// Assets sharing a grid cell at the current zoom
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster<'a> {
    pub cell_key: CellKey,
    /// Center of the cell in projected space
    pub anchor: ScreenPoint,
    /// Members in asset-table order
    pub members: Vec<&'a Asset>,
}

impl Cluster<'_> {
    /// A lone asset renders as its own glyph rather than a numbered marker
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Group assets into grid clusters at zoom `k`.
///
/// Output is sorted by cell key, so identical inputs give identical results.
pub fn cluster<'a>(
    assets: &'a [Asset],
    projection: &ProjectionParams,
    k: f64,
    policy: &LodPolicy,
) -> Vec<Cluster<'a>> {
    let positions: Vec<ScreenPoint> = assets
        .iter()
        .map(|a| projection.project(a.location))
        .collect();
    cluster_projected(assets, &positions, policy.grid_size(k))
}

/// Cluster with positions already projected (`positions[i]` belongs to `assets[i]`)
pub fn cluster_projected<'a>(
    assets: &'a [Asset],
    positions: &[ScreenPoint],
    grid_size: f64,
) -> Vec<Cluster<'a>> {
    let mut grid = ScreenGrid::new(grid_size);
    for (idx, &p) in positions.iter().enumerate().take(assets.len()) {
        grid.insert(p, idx);
    }

    let anchor_grid = ScreenGrid::new(grid_size);
    grid.into_sorted_cells()
        .into_iter()
        .map(|(cell_key, indices)| Cluster {
            cell_key,
            anchor: anchor_grid.anchor(cell_key),
            members: indices.into_iter().map(|i| &assets[i]).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::camera::K_MAX;
    use crate::map::projection::Viewport;

    fn capitals() -> Vec<Asset> {
        vec![
            Asset::new("Kyiv", 30.5234, 50.4501, Tier::Capital, "Capital"),
            Asset::new("Minsk", 27.5615, 53.9045, Tier::Capital, "Capital"),
            Asset::new("Vienna", 16.3738, 48.2082, Tier::Capital, "Capital"),
            Asset::new("Prague", 14.4378, 50.0755, Tier::Capital, "Capital"),
            Asset::new("Cairo", 31.2357, 30.0444, Tier::Capital, "Capital"),
            Asset::new("Sana'a", 44.2075, 15.3694, Tier::Capital, "Capital"),
            Asset::new("Kabul", 69.2075, 34.5553, Tier::Capital, "Capital"),
            Asset::new("Beijing", 116.4074, 39.9042, Tier::Capital, "Capital"),
            Asset::new("Ottawa", -75.6972, 45.4215, Tier::Capital, "Capital"),
            Asset::new("Washington D.C.", -77.0369, 38.9072, Tier::Capital, "Capital"),
        ]
    }

    fn projection() -> ProjectionParams {
        ProjectionParams::for_viewport(Viewport::new(1300, 800))
    }

    #[test]
    fn test_cluster_is_deterministic() {
        let assets = capitals();
        let policy = LodPolicy::default();
        let a = cluster(&assets, &projection(), 1.0, &policy);
        let b = cluster(&assets, &projection(), 1.0, &policy);
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_asset_lands_in_exactly_one_cluster() {
        let assets = capitals();
        let clusters = cluster(&assets, &projection(), 1.0, &LodPolicy::default());
        let total: usize = clusters.iter().map(Cluster::len).sum();
        assert_eq!(total, assets.len());
    }

    #[test]
    fn test_low_zoom_merges_neighbors() {
        let assets = capitals();
        let clusters = cluster(&assets, &projection(), 1.0, &LodPolicy::default());
        assert!(clusters.len() < assets.len());
        assert!(clusters.iter().any(|c| !c.is_single()));
    }

    #[test]
    fn test_converges_to_one_cluster_per_asset() {
        let assets = capitals();
        let policy = LodPolicy::default();
        let overview = cluster(&assets, &projection(), 1.0, &policy);
        let closest = cluster(&assets, &projection(), K_MAX, &policy);
        assert!(overview.len() < assets.len());
        assert_eq!(closest.len(), assets.len());
        assert!(closest.iter().all(Cluster::is_single));
    }

    #[test]
    fn test_builtin_assets_separate_at_max_zoom_on_small_terminal() {
        // Map area of a 120x40 terminal
        let viewport = Viewport::new(236, 148);
        let assets = crate::data::builtin::assets();
        let projection = ProjectionParams::for_viewport(viewport);
        let policy = LodPolicy::default().for_viewport(viewport);

        let overview = cluster(&assets, &projection, 1.0, &policy);
        assert!(overview.len() < assets.len());

        let closest = cluster(&assets, &projection, K_MAX, &policy);
        let merged: Vec<Vec<&str>> = closest
            .iter()
            .filter(|c| !c.is_single())
            .map(|c| c.members.iter().map(|a| a.name.as_str()).collect())
            .collect();
        assert!(merged.is_empty(), "still merged at max zoom: {merged:?}");
        assert_eq!(closest.len(), assets.len());
    }

    #[test]
    fn test_anchor_is_cell_center() {
        let assets = capitals();
        let policy = LodPolicy::default();
        let grid = policy.grid_size(1.0);
        for c in cluster(&assets, &projection(), 1.0, &policy) {
            assert_eq!(c.anchor.x, c.cell_key.0 as f64 * grid);
            assert_eq!(c.anchor.y, c.cell_key.1 as f64 * grid);
            for member in &c.members {
                let p = projection().project(member.location);
                assert!((p.x - c.anchor.x).abs() <= grid / 2.0 + 1e-9);
                assert!((p.y - c.anchor.y).abs() <= grid / 2.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_tier_from_number() {
        assert_eq!(Tier::try_from(2u8), Ok(Tier::Hub));
        assert!(Tier::try_from(4u8).is_err());
        assert_eq!(Tier::Node.number(), 3);
    }
}
