use std::time::{Duration, Instant};

use conflict_atlas::coords::ScreenPoint;
use conflict_atlas::frame::{AnimationClock, FrameGate};
use conflict_atlas::map::{
    known_categories, Camera, CategoryFilter, Dataset, HoverTarget, IntelFeed, MapRenderer,
    SceneComposer, TransformChanged, Viewport, GLOW_THRESHOLD, ZOOM_STEP,
};
use tracing::{debug, info};

/// Keyboard pan step in braille pixels
const PAN_STEP: f64 = 20.0;
/// Severity at or above which a region counts as critical
const CRITICAL_SEVERITY: f64 = 90.0;

/// Application state
pub struct App {
    pub camera: Camera,
    pub composer: SceneComposer,
    pub map_renderer: MapRenderer,
    pub gate: FrameGate,
    pub clock: AnimationClock,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    /// Last clicked target
    pub selected: Option<HoverTarget>,
    /// Transient message shown in the status bar
    pub notice: Option<String>,
    /// Symbology overlay visible
    pub show_legend: bool,
    inner: (u16, u16),
}

impl App {
    pub fn new(width: usize, height: usize, dataset: Dataset, frame_interval: Duration) -> Self {
        let (inner, viewport) = layout_for(width, height);
        Self {
            camera: Camera::new(),
            composer: SceneComposer::new(viewport, dataset),
            map_renderer: MapRenderer::new(),
            gate: FrameGate::new(frame_interval),
            clock: AnimationClock::new(),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            selected: None,
            notice: None,
            show_legend: false,
            inner,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (inner, viewport) = layout_for(width, height);
        self.inner = inner;
        self.composer.resize(viewport);
        self.gate.request();
    }

    pub fn viewport(&self) -> Viewport {
        self.composer.viewport()
    }

    /// Replace the regions and assets
    pub fn load_dataset(&mut self, dataset: Dataset) {
        self.composer.load_dataset(dataset);
        self.gate.request();
    }

    /// Apply a freshly loaded intel feed
    pub fn apply_intel(&mut self, feed: IntelFeed) {
        self.composer.apply_intel(feed);
        self.gate.request();
    }

    /// Run one scene update if a frame is due
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.gate.take(now) {
            return false;
        }
        self.composer.update();
        true
    }

    /// Seconds on the animation clock
    pub fn animation_time(&self) -> f64 {
        self.clock.seconds()
    }

    fn apply(&mut self, change: Option<TransformChanged>) {
        let Some(change) = change else {
            return;
        };
        if change.zoom_changed() {
            debug!(from = change.previous.k, to = change.current.k, "zoom");
        }
        self.composer.set_transform(change.current);
        self.gate.request();
    }

    /// Pan the view; positive `dx` looks further east
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let change = self.camera.pan(-dx, -dy);
        self.apply(change);
    }

    pub fn pan_left(&mut self) {
        self.pan(-PAN_STEP, 0.0);
    }

    pub fn pan_right(&mut self) {
        self.pan(PAN_STEP, 0.0);
    }

    pub fn pan_up(&mut self) {
        self.pan(0.0, -PAN_STEP);
    }

    pub fn pan_down(&mut self) {
        self.pan(0.0, PAN_STEP);
    }

    /// Zoom in about the viewport center
    pub fn zoom_in(&mut self) {
        let change = self.camera.zoom_by(ZOOM_STEP, self.viewport());
        self.apply(change);
    }

    /// Zoom out about the viewport center
    pub fn zoom_out(&mut self) {
        let change = self.camera.zoom_by(1.0 / ZOOM_STEP, self.viewport());
        self.apply(change);
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let change = self.camera.zoom_in_at(to_pixel(col, row));
        self.apply(change);
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let change = self.camera.zoom_out_at(to_pixel(col, row));
        self.apply(change);
    }

    /// Back to the identity transform
    pub fn reset_view(&mut self) {
        let change = self.camera.reset();
        self.apply(change);
    }

    /// Drag the map with the mouse
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = (col as f64 - last_col as f64) * 2.0;
            let dy = (row as f64 - last_row as f64) * 4.0;
            let change = self.camera.pan(dx, dy);
            self.apply(change);
        }
        self.last_mouse = Some((col, row));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Update mouse cursor position and the hover target under it
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        let pointer = self.mouse_cell().map(|_| to_pixel(col, row));
        self.composer.set_pointer(pointer);
        self.gate.request();
    }

    /// Mouse position in map cells, if it is over the map
    pub fn mouse_cell(&self) -> Option<(u16, u16)> {
        let (col, row) = self.mouse_pos?;
        let (cx, cy) = (col.checked_sub(1)?, row.checked_sub(1)?);
        (cx < self.inner.0 && cy < self.inner.1).then_some((cx, cy))
    }

    /// Select whatever sits under a screen position
    pub fn select_at(&mut self, col: u16, row: u16) {
        let target = self.composer.pick(to_pixel(col, row));
        match &target {
            Some(target) => {
                let summary = self.composer.describe(target).join(" / ");
                info!(%summary, "selected");
                self.notice = Some(summary);
            }
            None => self.notice = None,
        }
        self.selected = target;
    }

    /// Flip between categorical and heatmap fill
    pub fn toggle_mode(&mut self) {
        let mode = self.composer.mode().toggled();
        self.composer.set_mode(mode);
        self.gate.request();
    }

    pub fn toggle_edges(&mut self) {
        let show = !self.composer.show_edges();
        self.composer.set_show_edges(show);
        self.gate.request();
    }

    /// Toggle the n-th relationship category (1-based)
    pub fn toggle_category(&mut self, n: usize) {
        let Some(category) = n.checked_sub(1).and_then(|i| known_categories().nth(i)) else {
            return;
        };
        let enabled = self.composer.toggle_category(category);
        self.notice = Some(format!("{category} {}", if enabled { "on" } else { "off" }));
        self.gate.request();
    }

    /// Enable every category, or clear them if all are already on
    pub fn toggle_all_categories(&mut self) {
        let filter = if *self.composer.filter() == CategoryFilter::all() {
            CategoryFilter::none()
        } else {
            CategoryFilter::all()
        };
        self.composer.set_filter(filter);
        self.gate.request();
    }

    pub fn toggle_legend(&mut self) {
        self.show_legend = !self.show_legend;
    }

    pub fn toggle_labels(&mut self) {
        self.map_renderer.toggle_labels();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.camera.zoom())
    }

    /// Nominal ground resolution shown next to the zoom factor
    pub fn resolution(&self) -> String {
        format!("{:.0}km", self.camera.zoom() * 12.5)
    }

    pub fn detail_level(&self) -> &'static str {
        self.composer.lod().detail_label(self.camera.zoom())
    }

    /// Number of regions above the heatmap glow threshold
    pub fn active_conflicts(&self) -> usize {
        self.composer
            .severity()
            .iter()
            .filter(|(_, score)| *score > GLOW_THRESHOLD)
            .count()
    }

    /// Number of regions at critical severity
    pub fn critical_regions(&self) -> usize {
        self.composer
            .severity()
            .iter()
            .filter(|(_, score)| *score >= CRITICAL_SEVERITY)
            .count()
    }

    /// Label for the current hover target
    pub fn hover_label(&self) -> Option<String> {
        self.composer.hover_lines().first().cloned()
    }
}

/// Inner map size in cells and the braille viewport for a terminal size.
/// Accounts for the border (2 cells each way) and the status bar.
fn layout_for(width: usize, height: usize) -> ((u16, u16), Viewport) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    let inner = (
        u16::try_from(inner_width).unwrap_or(u16::MAX),
        u16::try_from(inner_height).unwrap_or(u16::MAX),
    );
    (inner, Viewport::new(inner_width * 2, inner_height * 4))
}

/// Terminal column/row to the braille pixel at the center of that cell.
/// Accounts for the border (1 cell offset).
fn to_pixel(col: u16, row: u16) -> ScreenPoint {
    ScreenPoint::new(
        col.saturating_sub(1) as f64 * 2.0 + 1.0,
        row.saturating_sub(1) as f64 * 4.0 + 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflict_atlas::data;
    use conflict_atlas::map::FillMode;

    fn app() -> App {
        let mut app = App::new(120, 40, data::builtin_dataset(), Duration::from_millis(16));
        app.apply_intel(data::builtin_intel());
        app
    }

    #[test]
    fn test_layout_accounts_for_border_and_status_bar() {
        let app = app();
        assert_eq!(app.viewport(), Viewport::new(236, 148));
    }

    #[test]
    fn test_zoom_and_reset() {
        let mut app = app();
        app.zoom_in();
        assert_eq!(app.zoom_level(), "1.5x");
        assert_eq!(app.resolution(), "19km");
        app.reset_view();
        assert_eq!(app.zoom_level(), "1.0x");
        assert_eq!(app.detail_level(), "Strategic Overview");
    }

    #[test]
    fn test_drag_moves_camera() {
        let mut app = app();
        app.last_mouse = Some((10, 10));
        app.handle_drag(12, 11);
        let t = app.camera.transform();
        assert_eq!((t.tx, t.ty), (4.0, 4.0));
        app.end_drag();
        assert!(app.last_mouse.is_none());
    }

    #[test]
    fn test_mouse_outside_map_clears_pointer() {
        let mut app = app();
        app.set_mouse_pos(0, 0);
        assert_eq!(app.mouse_cell(), None);
        assert!(app.composer.hover().is_none());
        app.set_mouse_pos(5, 5);
        assert_eq!(app.mouse_cell(), Some((4, 4)));
    }

    #[test]
    fn test_toggles() {
        let mut app = app();
        app.toggle_mode();
        assert_eq!(app.composer.mode(), FillMode::Heatmap);

        app.toggle_category(1);
        assert_eq!(app.composer.filter().len(), known_categories().count() - 1);
        app.toggle_all_categories();
        assert_eq!(*app.composer.filter(), CategoryFilter::all());
        app.toggle_all_categories();
        assert!(app.composer.filter().is_empty());

        app.toggle_category(99);
        assert!(app.composer.filter().is_empty());

        assert!(!app.show_legend);
        app.toggle_legend();
        assert!(app.show_legend);
    }

    #[test]
    fn test_summary_counts() {
        let app = app();
        assert_eq!(app.active_conflicts(), 11);
        assert_eq!(app.critical_regions(), 4);
    }

    #[test]
    fn test_tick_coalesces_updates() {
        let mut app = app();
        let now = Instant::now();
        assert!(app.tick(now));
        app.pan_left();
        app.pan_left();
        assert!(!app.tick(now));
        assert!(app.tick(now + Duration::from_millis(16)));
        assert!(!app.tick(now + Duration::from_millis(40)));
    }
}
