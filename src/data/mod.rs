pub mod builtin;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use geo::{LineString, MultiPolygon, Polygon};
use geojson::feature::Id;
use geojson::{Feature, GeoJson, Value};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AtlasError, Result};
use crate::map::{Asset, Dataset, IntelFeed, Region, Relationship, Tier};

/// Boundary files searched for in the data directory, in order
pub const BOUNDARY_FILES: [&str; 3] = [
    "world.geojson",
    "countries.geojson",
    "ne_110m_admin_0_countries.geojson",
];

/// Property keys that may carry a region id when the feature has none
const ID_KEYS: [&str; 4] = ["ISO_A3", "iso_a3", "ADM0_A3", "id"];
/// Property keys that may carry a region name
const NAME_KEYS: [&str; 4] = ["name", "NAME", "ADMIN", "admin"];

/// Natural Earth marks missing codes with "-99"
const MISSING_CODE: &str = "-99";

/// Load country boundaries from a GeoJSON file
pub fn load_regions(path: &Path) -> Result<Vec<Region>> {
    let content = fs::read_to_string(path)?;
    parse_regions(&content)
}

/// Parse country boundaries from GeoJSON text.
///
/// Features without an id, or without Polygon/MultiPolygon geometry, are skipped.
pub fn parse_regions(content: &str) -> Result<Vec<Region>> {
    let geojson: GeoJson = content.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(AtlasError::Payload(
                "expected features, found a bare geometry".to_string(),
            ))
        }
    };

    let mut skipped = 0usize;
    let regions: Vec<Region> = features
        .iter()
        .filter_map(|feature| {
            let region = region_from_feature(feature);
            if region.is_none() {
                skipped += 1;
            }
            region
        })
        .collect();

    if skipped > 0 {
        warn!(skipped, "boundary features without usable id or polygon");
    }
    Ok(regions)
}

fn region_from_feature(feature: &Feature) -> Option<Region> {
    let id = feature_id(feature)?;
    let name = property_str(feature, &NAME_KEYS)
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());

    let boundary = match &feature.geometry.as_ref()?.value {
        Value::Polygon(rings) => MultiPolygon::new(vec![polygon_from_rings(rings)?]),
        Value::MultiPolygon(polygons) => {
            MultiPolygon::new(polygons.iter().filter_map(|rings| polygon_from_rings(rings)).collect())
        }
        _ => return None,
    };

    Region::new(id, name, boundary)
}

fn feature_id(feature: &Feature) -> Option<String> {
    let from_feature = match &feature.id {
        Some(Id::String(s)) => Some(s.clone()),
        Some(Id::Number(n)) => Some(n.to_string()),
        None => None,
    };
    from_feature
        .filter(|id| !id.is_empty() && id != MISSING_CODE)
        .or_else(|| {
            ID_KEYS.iter().find_map(|key| {
                property_str(feature, &[*key])
                    .filter(|id| !id.is_empty() && *id != MISSING_CODE)
                    .map(str::to_string)
            })
        })
}

fn property_str<'a>(feature: &'a Feature, keys: &[&str]) -> Option<&'a str> {
    let props = feature.properties.as_ref()?;
    keys.iter().find_map(|key| props.get(*key).and_then(|v| v.as_str()))
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        LineString::from(
            ring.iter()
                .filter(|c| c.len() >= 2)
                .map(|c| (c[0], c[1]))
                .collect::<Vec<_>>(),
        )
    });
    let exterior = rings.next()?;
    if exterior.0.len() < 3 {
        return None;
    }
    Some(Polygon::new(exterior, rings.collect()))
}

#[derive(Deserialize)]
struct AssetRecord {
    name: String,
    coords: [f64; 2],
    tier: Tier,
    #[serde(rename = "type", default)]
    category: String,
}

/// Load an asset table (`[{name, coords: [lon, lat], tier, type}]`)
pub fn load_assets(path: &Path) -> Result<Vec<Asset>> {
    let mut bytes = fs::read(path)?;
    parse_assets(&mut bytes)
}

/// simd-json parses in place, so the buffer is mutated
pub fn parse_assets(bytes: &mut [u8]) -> Result<Vec<Asset>> {
    let records: Vec<AssetRecord> = simd_json::serde::from_slice(bytes)?;
    Ok(records
        .into_iter()
        .map(|r| Asset::new(&r.name, r.coords[0], r.coords[1], r.tier, &r.category))
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntelPayload {
    Connections(Vec<Relationship>),
    Feed {
        #[serde(default)]
        connections: Vec<Relationship>,
        #[serde(default)]
        severity: HashMap<String, f64>,
    },
}

/// Load an intel feed
pub fn load_intel(path: &Path) -> Result<IntelFeed> {
    let mut bytes = fs::read(path)?;
    parse_intel(&mut bytes)
}

/// Parse an intel feed: either `{connections, severity}` (both optional)
/// or a bare array of connections.
pub fn parse_intel(bytes: &mut [u8]) -> Result<IntelFeed> {
    let payload: IntelPayload = simd_json::serde::from_slice(bytes)?;
    Ok(match payload {
        IntelPayload::Connections(relationships) => IntelFeed {
            relationships,
            ..IntelFeed::default()
        },
        IntelPayload::Feed {
            connections,
            severity,
        } => IntelFeed {
            relationships: connections,
            severity: severity.into_iter().collect(),
        },
    })
}

/// Run a loader on its own thread and give up after `timeout`.
///
/// A loader that outlives the timeout is left to finish on its own; its
/// result is dropped.
pub fn load_with_timeout<T, F>(label: &str, timeout: Duration, load: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name(format!("load-{label}"))
        .spawn(move || {
            let _ = tx.send(load());
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(AtlasError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(AtlasError::Disconnected),
    }
}

/// First boundary file present in the data directory
pub fn find_boundary_file(data_dir: &Path) -> Option<PathBuf> {
    BOUNDARY_FILES
        .iter()
        .map(|name| data_dir.join(name))
        .find(|path| path.exists())
}

/// Built-in regions and assets
pub fn builtin_dataset() -> Dataset {
    Dataset::new(builtin::regions(), builtin::assets())
}

/// Built-in relationships and severity scores
pub fn builtin_intel() -> IntelFeed {
    IntelFeed {
        relationships: builtin::relationships(),
        severity: builtin::severity(),
    }
}

/// Load regions and assets, falling back to the built-in data for
/// whichever part is missing or fails to load.
pub fn load_dataset(data_dir: &Path, assets: Option<&Path>, timeout: Duration) -> Dataset {
    let regions = match find_boundary_file(data_dir) {
        Some(path) => {
            let source = path.clone();
            match load_with_timeout("regions", timeout, move || load_regions(&path)) {
                Ok(regions) if !regions.is_empty() => {
                    info!(path = %source.display(), count = regions.len(), "boundaries loaded");
                    regions
                }
                Ok(_) => {
                    warn!(path = %source.display(), "boundary file has no regions, using built-in outlines");
                    builtin::regions()
                }
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "failed to load boundaries, using built-in outlines");
                    builtin::regions()
                }
            }
        }
        None => builtin::regions(),
    };

    let assets = match assets {
        Some(path) => {
            let owned = path.to_path_buf();
            match load_with_timeout("assets", timeout, move || load_assets(&owned)) {
                Ok(assets) => assets,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load assets, using built-in table");
                    builtin::assets()
                }
            }
        }
        None => builtin::assets(),
    };

    Dataset::new(regions, assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "UKR",
                "properties": { "name": "Ukraine" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[22, 45], [40, 45], [40, 52], [22, 52], [22, 45]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ISO_A3": "-99", "ADM0_A3": "FRA", "ADMIN": "France" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-5, 42], [8, 42], [8, 51], [-5, 51], [-5, 42]]],
                        [[[8.5, 41.4], [9.5, 41.4], [9.5, 43], [8.5, 43], [8.5, 41.4]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Nowhere" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }
            },
            {
                "type": "Feature",
                "id": "PNT",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [1, 1] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_regions_extracts_ids_and_names() {
        let regions = parse_regions(WORLD).unwrap();
        assert_eq!(regions.len(), 2);

        assert_eq!(regions[0].id, "UKR");
        assert_eq!(regions[0].name, "Ukraine");
        assert!((regions[0].centroid.lon - 31.0).abs() < 1e-9);

        assert_eq!(regions[1].id, "FRA");
        assert_eq!(regions[1].name, "France");
        assert_eq!(regions[1].boundary.0.len(), 2);
    }

    #[test]
    fn test_parse_regions_rejects_bad_json() {
        assert!(matches!(parse_regions("{ not json"), Err(AtlasError::GeoJson(_))));
    }

    #[test]
    fn test_parse_assets() {
        let mut bytes = br#"[
            {"name": "Kyiv", "coords": [30.5234, 50.4501], "tier": 1, "type": "Capital"},
            {"name": "Odesa", "coords": [30.72, 46.48], "tier": 2}
        ]"#
        .to_vec();
        let assets = parse_assets(&mut bytes).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].tier, Tier::Capital);
        assert_eq!(assets[1].tier, Tier::Hub);
        assert_eq!(assets[1].category, "");
        assert_eq!(assets[1].location.lat, 46.48);
    }

    #[test]
    fn test_parse_assets_rejects_unknown_tier() {
        let mut bytes = br#"[{"name": "X", "coords": [0, 0], "tier": 7}]"#.to_vec();
        assert!(matches!(parse_assets(&mut bytes), Err(AtlasError::Payload(_))));
    }

    #[test]
    fn test_parse_intel_object() {
        let mut bytes = br#"{
            "connections": [
                {"id": "1", "source": "IRN", "target": "YEM", "type": "ARMS_FLOW", "description": "drones"}
            ],
            "severity": {"YEM": 82, "UKR": 140}
        }"#
        .to_vec();
        let feed = parse_intel(&mut bytes).unwrap();
        assert_eq!(feed.relationships.len(), 1);
        assert_eq!(feed.relationships[0].source_region_id, "IRN");
        assert_eq!(feed.relationships[0].category, "ARMS_FLOW");
        assert_eq!(feed.severity.score("YEM"), 82.0);
        assert_eq!(feed.severity.score("UKR"), 100.0);
    }

    #[test]
    fn test_parse_intel_partial_and_bare() {
        let mut only_severity = br#"{"severity": {"SDN": 92}}"#.to_vec();
        let feed = parse_intel(&mut only_severity).unwrap();
        assert!(feed.relationships.is_empty());
        assert_eq!(feed.severity.score("SDN"), 92.0);

        let mut bare = br#"[{"id": "7", "source": "CHN", "target": "TWN", "type": "CYBER"}]"#.to_vec();
        let feed = parse_intel(&mut bare).unwrap();
        assert_eq!(feed.relationships.len(), 1);
        assert_eq!(feed.relationships[0].description, "");
        assert!(feed.severity.is_empty());
    }

    #[test]
    fn test_parse_intel_malformed() {
        let mut bytes = br#"{"connections": "nope"}"#.to_vec();
        assert!(matches!(parse_intel(&mut bytes), Err(AtlasError::Payload(_))));

        let mut truncated = br#"[{"id": "1", "source""#.to_vec();
        assert!(parse_intel(&mut truncated).is_err());
    }

    #[test]
    fn test_load_with_timeout() {
        let fast = load_with_timeout("fast", Duration::from_secs(5), || Ok(42));
        assert_eq!(fast.unwrap(), 42);

        let slow = load_with_timeout("slow", Duration::from_millis(20), || {
            thread::sleep(Duration::from_millis(500));
            Ok(())
        });
        assert!(matches!(slow, Err(AtlasError::Timeout(d)) if d == Duration::from_millis(20)));

        let failing: Result<()> = load_with_timeout("failing", Duration::from_secs(5), || {
            Err(AtlasError::Payload("bad".into()))
        });
        assert!(matches!(failing, Err(AtlasError::Payload(_))));
    }

    #[test]
    fn test_load_dataset_falls_back_to_builtin() {
        let missing = Path::new("/nonexistent/conflict-atlas");
        let assets = missing.join("assets.json");
        let dataset = load_dataset(missing, Some(assets.as_path()), Duration::from_secs(1));
        assert_eq!(dataset.regions.len(), builtin::regions().len());
        assert_eq!(dataset.assets.len(), builtin::assets().len());
    }
}
