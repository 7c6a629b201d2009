use glam::Vec2;

use crate::overlay::ObjectGeometry;

/// Distance of the rotation handle above the object's top edge, in points.
pub const ROTATE_HANDLE_OFFSET: f32 = 24.0;
/// Hit radius of the corner and rotation handles.
pub const HANDLE_RADIUS: f32 = 10.0;
pub const MIN_SCALE: f32 = 0.05;
pub const MAX_SCALE: f32 = 20.0;
/// Rotation step while snapping.
pub const ROTATION_SNAP_DEG: f32 = 15.0;

/// Part of an object under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Body,
    /// Corner index: top-left, top-right, bottom-right, bottom-left.
    Corner(usize),
    Rotate,
}

/// A drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Move { grab_offset: Vec2 },
    Scale { start_scale: Vec2, start_distance: f32 },
    Rotate,
}

pub fn rotate_handle_position(geometry: &ObjectGeometry) -> Vec2 {
    let size = geometry.scaled_size();
    geometry.to_screen(Vec2::new(size.x * 0.5, -ROTATE_HANDLE_OFFSET))
}

/// Topmost handle under `point`. Handles win over the body.
pub fn hit_test(geometry: &ObjectGeometry, point: Vec2) -> Option<Handle> {
    if point.distance(rotate_handle_position(geometry)) <= HANDLE_RADIUS {
        return Some(Handle::Rotate);
    }
    if let Some(corner) = geometry
        .corners()
        .iter()
        .position(|c| point.distance(*c) <= HANDLE_RADIUS)
    {
        return Some(Handle::Corner(corner));
    }
    let local = geometry.to_local(point);
    let size = geometry.scaled_size();
    if local.x >= 0.0 && local.y >= 0.0 && local.x <= size.x && local.y <= size.y {
        return Some(Handle::Body);
    }
    None
}

impl Gesture {
    pub fn begin(handle: Handle, geometry: &ObjectGeometry, point: Vec2) -> Self {
        match handle {
            Handle::Body => Gesture::Move {
                grab_offset: point - Vec2::new(geometry.left, geometry.top),
            },
            Handle::Corner(_) => Gesture::Scale {
                start_scale: Vec2::new(geometry.scale_x, geometry.scale_y),
                start_distance: point.distance(geometry.center()).max(1.0),
            },
            Handle::Rotate => Gesture::Rotate,
        }
    }

    /// Update `geometry` for the pointer now at `point`.
    pub fn apply(&self, geometry: &mut ObjectGeometry, point: Vec2, snap: bool) {
        match *self {
            Gesture::Move { grab_offset } => {
                let top_left = point - grab_offset;
                geometry.left = top_left.x;
                geometry.top = top_left.y;
            }
            Gesture::Scale {
                start_scale,
                start_distance,
            } => {
                let center = geometry.center();
                let factor = point.distance(center) / start_distance;
                let scale = (start_scale * factor).clamp(Vec2::splat(MIN_SCALE), Vec2::splat(MAX_SCALE));
                geometry.scale_x = scale.x;
                geometry.scale_y = scale.y;
                let half = geometry.scaled_size() * 0.5;
                geometry.left = center.x - half.x;
                geometry.top = center.y - half.y;
            }
            Gesture::Rotate => {
                let d = point - geometry.center();
                if d.length_squared() < f32::EPSILON {
                    return;
                }
                let mut angle = d.y.atan2(d.x).to_degrees() + 90.0;
                if snap {
                    angle = (angle / ROTATION_SNAP_DEG).round() * ROTATION_SNAP_DEG;
                }
                geometry.angle = angle.rem_euclid(360.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> ObjectGeometry {
        ObjectGeometry {
            left: 100.0,
            top: 100.0,
            width: 400.0,
            height: 200.0,
            scale_x: 0.5,
            scale_y: 0.5,
            angle: 0.0,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn hit_priorities() {
        let g = geom();
        // 200x100 box from (100,100)
        assert_eq!(hit_test(&g, Vec2::new(200.0, 150.0)), Some(Handle::Body));
        assert_eq!(hit_test(&g, Vec2::new(102.0, 101.0)), Some(Handle::Corner(0)));
        assert_eq!(hit_test(&g, Vec2::new(300.0, 200.0)), Some(Handle::Corner(2)));
        assert_eq!(hit_test(&g, Vec2::new(200.0, 76.0)), Some(Handle::Rotate));
        assert_eq!(hit_test(&g, Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn hit_test_respects_rotation() {
        let mut g = geom();
        g.angle = 90.0;
        // rotated box spans x 150..250, y 50..250
        assert_eq!(hit_test(&g, Vec2::new(200.0, 60.0)), Some(Handle::Body));
        assert_eq!(hit_test(&g, Vec2::new(120.0, 150.0)), None);
    }

    #[test]
    fn move_keeps_grab_offset() {
        let mut g = geom();
        let gesture = Gesture::begin(Handle::Body, &g, Vec2::new(150.0, 120.0));
        gesture.apply(&mut g, Vec2::new(250.0, 320.0), false);
        assert!(approx(g.left, 200.0));
        assert!(approx(g.top, 300.0));
    }

    #[test]
    fn scale_is_uniform_about_center() {
        let mut g = geom();
        let center = g.center();
        let corner = g.corners()[2];
        let gesture = Gesture::begin(Handle::Corner(2), &g, corner);
        let further = center + (corner - center) * 2.0;
        gesture.apply(&mut g, further, false);
        assert!(approx(g.scale_x, 1.0));
        assert!(approx(g.scale_y, 1.0));
        assert!(approx(g.center().x, center.x));
        assert!(approx(g.center().y, center.y));
    }

    #[test]
    fn scale_is_clamped() {
        let mut g = geom();
        let gesture = Gesture::begin(Handle::Corner(0), &g, g.corners()[0]);
        let center = g.center();
        gesture.apply(&mut g, center, false);
        assert!(approx(g.scale_x, MIN_SCALE));
    }

    #[test]
    fn rotation_follows_pointer_and_snaps() {
        let mut g = geom();
        let center = g.center();
        let gesture = Gesture::begin(Handle::Rotate, &g, rotate_handle_position(&g));
        gesture.apply(&mut g, center + Vec2::new(50.0, 0.0), false);
        assert!(approx(g.angle, 90.0));
        gesture.apply(&mut g, center + Vec2::new(50.0, -45.0), true);
        assert!(approx(g.angle % ROTATION_SNAP_DEG, 0.0));
        gesture.apply(&mut g, center + Vec2::new(-50.0, 0.0), false);
        assert!(approx(g.angle, 270.0));
    }
}
