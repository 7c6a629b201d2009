use clap::ValueEnum;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Snapshot of the canvas object's transform, in logical points.
///
/// `left`/`top` is the top-left corner of the scaled, unrotated box.
/// `angle` is in degrees, clockwise on screen, applied about the box center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub angle: f32,
}

impl ObjectGeometry {
    /// On-screen size after scaling, before rotation.
    pub fn scaled_size(&self) -> Vec2 {
        Vec2::new(self.width * self.scale_x, self.height * self.scale_y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left, self.top) + self.scaled_size() * 0.5
    }

    /// Rotated corners in screen space: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.scaled_size() * 0.5;
        let center = self.center();
        let rot = Vec2::from_angle(self.angle.to_radians());
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|c| center + rot.rotate(c))
    }

    /// Axis-aligned box enclosing the rotated object.
    pub fn bounding_rect(&self) -> BoundingRect {
        let corners = self.corners();
        let min = corners.iter().copied().fold(Vec2::splat(f32::INFINITY), Vec2::min);
        let max = corners
            .iter()
            .copied()
            .fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max);
        BoundingRect {
            left: min.x,
            top: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    /// Map a screen point into the object's unrotated frame, relative to its top-left corner.
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        let center = self.center();
        let unrot = Vec2::from_angle(-self.angle.to_radians()).rotate(point - center);
        unrot + self.scaled_size() * 0.5
    }

    /// Map a point in the object's unrotated frame back to screen space.
    pub fn to_screen(&self, local: Vec2) -> Vec2 {
        let rel = local - self.scaled_size() * 0.5;
        self.center() + Vec2::from_angle(self.angle.to_radians()).rotate(rel)
    }
}

/// Axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Which placement formula the control bar follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Left-aligned to the raw object position. Ignores rotation.
    Raw,
    /// Centered under the rotated bounding rectangle.
    #[default]
    #[value(alias = "center")]
    Centered,
}

impl LayoutMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            LayoutMode::Raw => "Raw",
            LayoutMode::Centered => "Centered",
        }
    }
}

/// Fixed constants feeding the projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    /// Keeps the transport controls from wrapping.
    pub min_width: f32,
    /// Subtracted from the object's scaled width.
    pub padding: f32,
    /// Vertical gap between the object's bottom edge and the bar.
    pub offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Centered,
            min_width: 340.0,
            padding: 5.0,
            offset: 5.0,
        }
    }
}

/// Placement of the control bar in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlBarLayout {
    pub width: f32,
    pub left: f32,
    pub top: f32,
}

/// Derive the control bar placement from an object snapshot. Pure.
pub fn project(geometry: &ObjectGeometry, config: &LayoutConfig) -> ControlBarLayout {
    let scaled = geometry.scaled_size();
    let width = (scaled.x - config.padding).max(config.min_width);

    match config.mode {
        LayoutMode::Raw => ControlBarLayout {
            width,
            left: geometry.left,
            top: geometry.top + scaled.y + config.offset,
        },
        LayoutMode::Centered => {
            let rect = geometry.bounding_rect();
            ControlBarLayout {
                width,
                left: rect.left + (rect.width / 2.0 - width / 2.0),
                top: rect.top + rect.height + config.offset,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(left: f32, top: f32, w: f32, h: f32, scale: f32, angle: f32) -> ObjectGeometry {
        ObjectGeometry {
            left,
            top,
            width: w,
            height: h,
            scale_x: scale,
            scale_y: scale,
            angle,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn raw_layout_reference_values() {
        let config = LayoutConfig {
            mode: LayoutMode::Raw,
            ..Default::default()
        };
        let layout = project(&geom(100.0, 100.0, 500.0, 500.0, 0.3, 0.0), &config);
        // 500 * 0.3 - 5 = 145, clamped up to the minimum
        assert!(approx(layout.width, 340.0));
        assert!(approx(layout.top, 255.0));
        assert!(approx(layout.left, 100.0));
    }

    #[test]
    fn raw_layout_wide_object_keeps_scaled_width() {
        let config = LayoutConfig {
            mode: LayoutMode::Raw,
            ..Default::default()
        };
        let layout = project(&geom(0.0, 0.0, 1280.0, 720.0, 0.5, 0.0), &config);
        assert!(approx(layout.width, 635.0));
        assert!(approx(layout.top, 365.0));
    }

    #[test]
    fn centered_layout_reference_values() {
        let layout = project(
            &geom(100.0, 100.0, 500.0, 500.0, 0.3, 0.0),
            &LayoutConfig::default(),
        );
        assert!(approx(layout.width, 340.0));
        // bounding box is 150 wide at x=100, bar of 340 centered under it
        assert!(approx(layout.left, 5.0));
        assert!(approx(layout.top, 255.0));
    }

    #[test]
    fn centered_layout_follows_rotation() {
        let g = geom(0.0, 0.0, 800.0, 400.0, 1.0, 90.0);
        let rect = g.bounding_rect();
        assert!(approx(rect.left, 200.0));
        assert!(approx(rect.top, -200.0));
        assert!(approx(rect.width, 400.0));
        assert!(approx(rect.height, 800.0));

        let layout = project(&g, &LayoutConfig::default());
        // width still comes from the unrotated scaled width
        assert!(approx(layout.width, 795.0));
        assert!(approx(layout.left, 400.0 - 795.0 / 2.0));
        assert!(approx(layout.top, 605.0));
    }

    #[test]
    fn raw_layout_ignores_rotation() {
        let config = LayoutConfig {
            mode: LayoutMode::Raw,
            ..Default::default()
        };
        let a = project(&geom(10.0, 20.0, 800.0, 400.0, 1.0, 0.0), &config);
        let b = project(&geom(10.0, 20.0, 800.0, 400.0, 1.0, 45.0), &config);
        assert_eq!(a, b);
    }

    #[test]
    fn width_never_below_minimum() {
        for mode in [LayoutMode::Raw, LayoutMode::Centered] {
            let config = LayoutConfig {
                mode,
                ..Default::default()
            };
            for w in [0.0, 1.0, 100.0, 344.0, 345.0, 2000.0] {
                for scale in [0.01, 0.3, 1.0, 3.0] {
                    for angle in [0.0, 30.0, 90.0, 181.0] {
                        let layout = project(&geom(-50.0, 40.0, w, 300.0, scale, angle), &config);
                        assert!(layout.width >= config.min_width);
                    }
                }
            }
        }
    }

    #[test]
    fn projection_is_idempotent() {
        let g = geom(33.0, 71.0, 640.0, 360.0, 0.75, 12.5);
        let config = LayoutConfig::default();
        assert_eq!(project(&g, &config), project(&g, &config));
    }

    #[test]
    fn local_screen_roundtrip_under_rotation() {
        let g = geom(40.0, 60.0, 300.0, 200.0, 1.5, 37.0);
        let p = Vec2::new(123.0, 456.0);
        let back = g.to_screen(g.to_local(p));
        assert!(approx(back.x, p.x) && approx(back.y, p.y));
        // the top-left corner maps to local origin
        let tl = g.corners()[0];
        let local = g.to_local(tl);
        assert!(approx(local.x, 0.0) && approx(local.y, 0.0));
    }

    #[test]
    fn layout_mode_values() {
        assert_eq!(LayoutMode::from_str("RAW", true), Ok(LayoutMode::Raw));
        assert_eq!(LayoutMode::from_str("center", false), Ok(LayoutMode::Centered));
        assert!(LayoutMode::from_str("diagonal", true).is_err());
        assert_eq!(LayoutMode::default(), LayoutMode::Centered);
    }
}
