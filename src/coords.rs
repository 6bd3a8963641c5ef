use glam::DVec2;

/// A position on the render surface, in pixels
pub type ScreenPoint = DVec2;

/// A geographic position in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Longitude (-180 to 180)
    pub lon: f64,
    /// Latitude (-90 to 90)
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Format as "12.34N, 56.78E" for tooltips
    pub fn to_compass_string(&self) -> String {
        format!(
            "{:.2}{}, {:.2}{}",
            self.lat.abs(),
            if self.lat >= 0.0 { "N" } else { "S" },
            self.lon.abs(),
            if self.lon >= 0.0 { "E" } else { "W" }
        )
    }
}

impl From<(f64, f64)> for GeoPoint {
    #[inline(always)]
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for GeoPoint {
    #[inline(always)]
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}
