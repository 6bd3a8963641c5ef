//! Error types for dataset and intel feed loading.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while loading map data.
///
/// A failed load only affects the data it was loading; the map keeps
/// whatever was loaded before.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Boundary file is not valid GeoJSON
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON payload did not match the expected shape
    #[error("Malformed payload: {0}")]
    Payload(String),

    /// Load did not finish in time
    #[error("Load timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Loader thread exited without reporting a result
    #[error("Loader disconnected")]
    Disconnected,
}

impl From<simd_json::Error> for AtlasError {
    fn from(e: simd_json::Error) -> Self {
        Self::Payload(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
