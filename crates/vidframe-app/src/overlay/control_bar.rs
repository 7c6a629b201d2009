use super::canvas::GeometryEvent;
use super::geometry::{project, ControlBarLayout, LayoutConfig, ObjectGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Style applied to the floating control bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlBarStyle {
    /// `None` until an object has been placed.
    pub layout: Option<ControlBarLayout>,
    pub visibility: Visibility,
}

impl ControlBarStyle {
    pub fn is_shown(&self) -> bool {
        self.visibility == Visibility::Visible && self.layout.is_some()
    }
}

/// Visibility state machine plus placement tracking.
///
/// Hidden while a gesture is in progress so a stale bar never shows mid-drag;
/// visible again on pointer release.
#[derive(Debug, Clone)]
pub struct ControlBar {
    config: LayoutConfig,
    style: ControlBarStyle,
}

impl ControlBar {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            style: ControlBarStyle {
                layout: None,
                visibility: Visibility::Visible,
            },
        }
    }

    pub fn style(&self) -> &ControlBarStyle {
        &self.style
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Swap layout constants and re-place against the given geometry.
    pub fn set_config(&mut self, config: LayoutConfig, geometry: Option<&ObjectGeometry>) {
        self.config = config;
        self.relayout(geometry);
    }

    /// Initial state after setup: visible, placed once against the object.
    pub fn show_initial(&mut self, geometry: Option<&ObjectGeometry>) {
        self.style.visibility = Visibility::Visible;
        self.relayout(geometry);
    }

    pub fn on_geometry_event(&mut self, event: GeometryEvent, geometry: Option<&ObjectGeometry>) {
        match event {
            GeometryEvent::Moving(_) | GeometryEvent::Scaling(_) | GeometryEvent::Rotating(_) => {
                self.style.visibility = Visibility::Hidden;
                self.relayout(geometry);
            }
            GeometryEvent::PointerUp => {
                self.relayout(geometry);
                self.style.visibility = Visibility::Visible;
            }
        }
    }

    /// Recompute placement. No-op when there is no object to follow.
    pub fn relayout(&mut self, geometry: Option<&ObjectGeometry>) {
        let Some(geometry) = geometry else {
            return;
        };
        self.style.layout = Some(project(geometry, &self.config));
    }

    /// Forget placement (object removed).
    pub fn detach(&mut self) {
        self.style.layout = None;
    }
}

/// Fill state of the scrubber track, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scrubber {
    fill_percent: f32,
}

impl Scrubber {
    pub fn fill_percent(&self) -> f32 {
        self.fill_percent
    }

    /// Non-finite input is ignored so a NaN never reaches the gradient.
    pub fn set_fill(&mut self, percent: f32) {
        if percent.is_finite() {
            self.fill_percent = percent.clamp(0.0, 100.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::canvas::ObjectId;
    use crate::overlay::geometry::LayoutMode;

    fn geom(left: f32, top: f32) -> ObjectGeometry {
        ObjectGeometry {
            left,
            top,
            width: 1280.0,
            height: 720.0,
            scale_x: 0.5,
            scale_y: 0.5,
            angle: 0.0,
        }
    }

    fn raw_bar() -> ControlBar {
        ControlBar::new(LayoutConfig {
            mode: LayoutMode::Raw,
            ..Default::default()
        })
    }

    #[test]
    fn initial_state_is_visible_and_placed() {
        let mut bar = raw_bar();
        assert!(bar.style().layout.is_none());
        bar.show_initial(Some(&geom(10.0, 20.0)));
        assert_eq!(bar.style().visibility, Visibility::Visible);
        let layout = bar.style().layout.unwrap();
        assert_eq!(layout.left, 10.0);
        assert_eq!(layout.top, 20.0 + 360.0 + 5.0);
        assert!(bar.style().is_shown());
    }

    #[test]
    fn moving_hides_then_pointer_up_shows_post_move_layout() {
        let id = ObjectId(1);
        let mut bar = raw_bar();
        bar.show_initial(Some(&geom(0.0, 0.0)));
        let before = bar.style().layout.unwrap();

        let moved = geom(200.0, 150.0);
        bar.on_geometry_event(GeometryEvent::Moving(id), Some(&moved));
        assert_eq!(bar.style().visibility, Visibility::Hidden);
        assert!(!bar.style().is_shown());

        bar.on_geometry_event(GeometryEvent::PointerUp, Some(&moved));
        assert_eq!(bar.style().visibility, Visibility::Visible);
        let after = bar.style().layout.unwrap();
        assert_ne!(after, before);
        assert_eq!(after.left, 200.0);
        assert_eq!(after.top, 150.0 + 360.0 + 5.0);
    }

    #[test]
    fn every_gesture_kind_hides() {
        let id = ObjectId(7);
        for event in [
            GeometryEvent::Moving(id),
            GeometryEvent::Scaling(id),
            GeometryEvent::Rotating(id),
        ] {
            let mut bar = ControlBar::new(LayoutConfig::default());
            bar.show_initial(Some(&geom(0.0, 0.0)));
            bar.on_geometry_event(event, Some(&geom(5.0, 5.0)));
            assert_eq!(bar.style().visibility, Visibility::Hidden);
        }
    }

    #[test]
    fn handlers_are_idempotent() {
        let id = ObjectId(1);
        let g = geom(42.0, 17.0);
        let mut bar = ControlBar::new(LayoutConfig::default());
        bar.on_geometry_event(GeometryEvent::Scaling(id), Some(&g));
        let once = *bar.style();
        bar.on_geometry_event(GeometryEvent::Scaling(id), Some(&g));
        assert_eq!(*bar.style(), once);
    }

    #[test]
    fn missing_object_leaves_layout_untouched() {
        let mut bar = raw_bar();
        bar.on_geometry_event(GeometryEvent::Moving(ObjectId(1)), None);
        assert_eq!(bar.style().visibility, Visibility::Hidden);
        assert!(bar.style().layout.is_none());
        bar.on_geometry_event(GeometryEvent::PointerUp, None);
        assert_eq!(bar.style().visibility, Visibility::Visible);
        assert!(!bar.style().is_shown());
    }

    #[test]
    fn config_change_replaces_layout() {
        let g = geom(100.0, 100.0);
        let mut bar = raw_bar();
        bar.show_initial(Some(&g));
        let raw = bar.style().layout.unwrap();
        bar.set_config(LayoutConfig::default(), Some(&g));
        let centered = bar.style().layout.unwrap();
        assert_eq!(raw.top, centered.top);
        assert_ne!(raw.left, centered.left);
    }

    #[test]
    fn scrubber_fill_rejects_nan_and_clamps() {
        let mut s = Scrubber::default();
        s.set_fill(42.0);
        assert_eq!(s.fill_percent(), 42.0);
        s.set_fill(f32::NAN);
        assert_eq!(s.fill_percent(), 42.0);
        s.set_fill(140.0);
        assert_eq!(s.fill_percent(), 100.0);
        s.set_fill(-1.0);
        assert_eq!(s.fill_percent(), 0.0);
    }
}
