use std::f64::consts::FRAC_PI_4;

use crate::coords::{GeoPoint, ScreenPoint};

/// Latitude beyond which Web Mercator diverges; inputs are clamped here
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Size of the render surface in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Center of the surface in pixels
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Check if a point is on (or just outside) the surface
    pub fn is_visible(&self, p: ScreenPoint) -> bool {
        p.x >= -10.0
            && p.x < self.width as f64 + 10.0
            && p.y >= -10.0
            && p.y < self.height as f64 + 10.0
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn segment_might_be_visible(&self, a: ScreenPoint, b: ScreenPoint) -> bool {
        let min = a.min(b);
        let max = a.max(b);

        max.x >= 0.0 && min.x < self.width as f64 && max.y >= 0.0 && min.y < self.height as f64
    }
}

/// Spherical Web Mercator parameters.
///
/// These are derived from the viewport once and only change on resize. Zoom
/// and pan live in [`CameraTransform`](crate::map::CameraTransform), which is
/// composed on top of the projected coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionParams {
    /// Pixels per radian of longitude (always > 0)
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ProjectionParams {
    /// Build parameters, rejecting a non-positive or non-finite scale
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Option<Self> {
        if scale.is_finite() && scale > 0.0 {
            Some(Self {
                scale,
                translate_x,
                translate_y,
            })
        } else {
            None
        }
    }

    /// World framing for a surface: the whole map fits the width, with the
    /// equator two thirds of the way down so the northern hemisphere gets room
    pub fn for_viewport(viewport: Viewport) -> Self {
        let width = viewport.width.max(1) as f64;
        let height = viewport.height.max(1) as f64;
        Self {
            scale: width / 6.5,
            translate_x: width / 2.1,
            translate_y: height / 1.5,
        }
    }

    /// Project a geographic coordinate to surface pixels
    #[inline]
    pub fn project(&self, p: GeoPoint) -> ScreenPoint {
        let lambda = p.lon.to_radians();
        let phi = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let x = self.scale * lambda + self.translate_x;
        let y = self.translate_y - self.scale * (FRAC_PI_4 + phi / 2.0).tan().ln();

        ScreenPoint::new(x, y)
    }

    /// Unproject surface pixels back to a geographic coordinate
    #[inline]
    pub fn unproject(&self, s: ScreenPoint) -> GeoPoint {
        let lambda = (s.x - self.translate_x) / self.scale;
        let phi = 2.0 * ((self.translate_y - s.y) / self.scale).exp().atan() - 2.0 * FRAC_PI_4;

        GeoPoint::new(lambda.to_degrees(), phi.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn params() -> ProjectionParams {
        ProjectionParams::for_viewport(Viewport::new(1300, 800))
    }

    #[test]
    fn test_origin_lands_on_translate() {
        let p = params();
        let s = p.project(GeoPoint::new(0.0, 0.0));
        assert_abs_diff_eq!(s.x, p.translate_x, epsilon = 1e-9);
        assert_abs_diff_eq!(s.y, p.translate_y, epsilon = 1e-9);
    }

    #[test]
    fn test_north_is_up_east_is_right() {
        let p = params();
        let origin = p.project(GeoPoint::new(0.0, 0.0));
        let north_east = p.project(GeoPoint::new(10.0, 10.0));
        assert!(north_east.x > origin.x);
        assert!(north_east.y < origin.y);
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert!(ProjectionParams::new(0.0, 0.0, 0.0).is_none());
        assert!(ProjectionParams::new(-1.0, 0.0, 0.0).is_none());
        assert!(ProjectionParams::new(f64::NAN, 0.0, 0.0).is_none());
        assert!(ProjectionParams::new(200.0, 10.0, 10.0).is_some());
    }

    #[test]
    fn test_poles_are_clamped() {
        let p = params();
        let pole = p.project(GeoPoint::new(0.0, 90.0));
        assert!(pole.y.is_finite());
        let back = p.unproject(pole);
        assert_abs_diff_eq!(back.lat, MAX_LATITUDE, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_viewport_still_projects() {
        let p = ProjectionParams::for_viewport(Viewport::new(0, 0));
        assert!(p.scale > 0.0);
    }

    #[test]
    fn test_segment_visibility() {
        let vp = Viewport::new(100, 100);
        assert!(vp.segment_might_be_visible(
            ScreenPoint::new(-50.0, 50.0),
            ScreenPoint::new(150.0, 50.0)
        ));
        assert!(!vp.segment_might_be_visible(
            ScreenPoint::new(-50.0, -5.0),
            ScreenPoint::new(-10.0, -50.0)
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn unproject_inverts_project(lon in -179.999f64..179.999, lat in -85.0f64..85.0) {
            let p = params();
            let back = p.unproject(p.project(GeoPoint::new(lon, lat)));
            prop_assert!((back.lon - lon).abs() < 1e-6);
            prop_assert!((back.lat - lat).abs() < 1e-6);
        }
    }
}
