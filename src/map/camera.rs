use crate::coords::ScreenPoint;
use crate::map::projection::Viewport;

/// Smallest allowed zoom factor (whole world)
pub const K_MIN: f64 = 1.0;
/// Largest allowed zoom factor
pub const K_MAX: f64 = 100.0;
/// Zoom factor applied per wheel notch or keypress
pub const ZOOM_STEP: f64 = 1.5;

/// Pan/zoom state applied on top of the projected map.
///
/// A projected point `p` lands on screen at `p * k + (tx, ty)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    /// Zoom factor
    pub k: f64,
    /// Horizontal pan offset in pixels
    pub tx: f64,
    /// Vertical pan offset in pixels
    pub ty: f64,
}

impl CameraTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Map a projected (base) point to the screen
    #[inline(always)]
    pub fn apply(&self, base: ScreenPoint) -> ScreenPoint {
        base * self.k + ScreenPoint::new(self.tx, self.ty)
    }

    /// Map a screen point back to projected (base) space
    #[inline(always)]
    pub fn invert(&self, view: ScreenPoint) -> ScreenPoint {
        (view - ScreenPoint::new(self.tx, self.ty)) / self.k
    }
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Notification emitted by every gesture that moved the camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformChanged {
    pub previous: CameraTransform,
    pub current: CameraTransform,
}

impl TransformChanged {
    /// Whether the zoom factor moved (as opposed to a pure pan)
    pub fn zoom_changed(&self) -> bool {
        self.previous.k != self.current.k
    }
}

/// Owns the camera transform and applies gestures to it
#[derive(Clone, Debug)]
pub struct Camera {
    transform: CameraTransform,
    k_min: f64,
    k_max: f64,
}

impl Camera {
    pub fn new() -> Self {
        Self::with_zoom_range(K_MIN, K_MAX)
    }

    pub fn with_zoom_range(k_min: f64, k_max: f64) -> Self {
        let k_min = k_min.max(f64::MIN_POSITIVE);
        Self {
            transform: CameraTransform::IDENTITY,
            k_min,
            k_max: k_max.max(k_min),
        }
    }

    pub fn transform(&self) -> CameraTransform {
        self.transform
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f64 {
        self.transform.k
    }

    /// Pan by a pixel delta (drag). Pan is unbounded.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Option<TransformChanged> {
        let mut next = self.transform;
        next.tx += dx;
        next.ty += dy;
        self.commit(next)
    }

    /// Zoom by `factor` keeping the screen point `anchor` fixed (wheel/pinch)
    pub fn zoom_at(&mut self, anchor: ScreenPoint, factor: f64) -> Option<TransformChanged> {
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }

        let current = self.transform;
        let k = (current.k * factor).clamp(self.k_min, self.k_max);

        // Keep whatever projected point sits under the anchor in place
        let base = current.invert(anchor);
        let next = CameraTransform {
            k,
            tx: anchor.x - base.x * k,
            ty: anchor.y - base.y * k,
        };
        self.commit(next)
    }

    /// Zoom about the center of the viewport (keyboard)
    pub fn zoom_by(&mut self, factor: f64, viewport: Viewport) -> Option<TransformChanged> {
        self.zoom_at(viewport.center(), factor)
    }

    /// Zoom in one step towards a screen position
    pub fn zoom_in_at(&mut self, anchor: ScreenPoint) -> Option<TransformChanged> {
        self.zoom_at(anchor, ZOOM_STEP)
    }

    /// Zoom out one step from a screen position
    pub fn zoom_out_at(&mut self, anchor: ScreenPoint) -> Option<TransformChanged> {
        self.zoom_at(anchor, 1.0 / ZOOM_STEP)
    }

    /// Back to the identity transform
    pub fn reset(&mut self) -> Option<TransformChanged> {
        self.commit(CameraTransform::IDENTITY)
    }

    fn commit(&mut self, next: CameraTransform) -> Option<TransformChanged> {
        if next == self.transform {
            return None;
        }
        let previous = std::mem::replace(&mut self.transform, next);
        Some(TransformChanged {
            previous,
            current: next,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_starts_at_identity() {
        let camera = Camera::new();
        assert_eq!(camera.transform(), CameraTransform::IDENTITY);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new();
        for _ in 0..50 {
            camera.zoom_at(ScreenPoint::new(10.0, 10.0), 2.0);
        }
        assert_eq!(camera.zoom(), K_MAX);

        for _ in 0..50 {
            camera.zoom_at(ScreenPoint::new(10.0, 10.0), 0.5);
        }
        assert_eq!(camera.zoom(), K_MIN);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut camera = Camera::new();
        camera.pan(37.0, -12.0);
        let anchor = ScreenPoint::new(120.0, 80.0);
        let base_before = camera.transform().invert(anchor);

        camera.zoom_at(anchor, 3.0);
        let base_after = camera.transform().invert(anchor);

        assert_abs_diff_eq!(base_before.x, base_after.x, epsilon = 1e-9);
        assert_abs_diff_eq!(base_before.y, base_after.y, epsilon = 1e-9);
    }

    #[test]
    fn test_pan_is_unbounded() {
        let mut camera = Camera::new();
        camera.pan(-1.0e6, 1.0e6);
        assert_eq!(camera.transform().tx, -1.0e6);
        assert_eq!(camera.transform().ty, 1.0e6);
    }

    #[test]
    fn test_every_change_notifies() {
        let mut camera = Camera::new();
        let event = camera.pan(5.0, 0.0).expect("pan moves the camera");
        assert_eq!(event.previous, CameraTransform::IDENTITY);
        assert!(!event.zoom_changed());

        let event = camera.zoom_in_at(ScreenPoint::ZERO).expect("zoom moves the camera");
        assert!(event.zoom_changed());
        assert_eq!(event.current, camera.transform());
    }

    #[test]
    fn test_no_op_does_not_notify() {
        let mut camera = Camera::new();
        assert!(camera.pan(0.0, 0.0).is_none());
        // Already at K_MIN with the anchor at the origin, zooming out changes nothing
        assert!(camera.zoom_out_at(ScreenPoint::ZERO).is_none());
        assert!(camera.reset().is_none());
        assert!(camera.zoom_at(ScreenPoint::ZERO, f64::NAN).is_none());
    }

    #[test]
    fn test_apply_invert_round_trip() {
        let t = CameraTransform {
            k: 4.0,
            tx: -30.0,
            ty: 12.5,
        };
        let p = ScreenPoint::new(17.0, -3.0);
        let back = t.invert(t.apply(p));
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-12);
    }
}
