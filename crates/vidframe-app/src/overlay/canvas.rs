use crossbeam_channel::Receiver;

use super::geometry::ObjectGeometry;

/// Identifies an object placed on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u32);

/// Geometry notifications emitted while the user manipulates an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryEvent {
    Moving(ObjectId),
    Scaling(ObjectId),
    Rotating(ObjectId),
    /// Pointer released, whether or not a gesture was active.
    PointerUp,
}

/// The drawing surface hosting the video object.
///
/// The canvas owns write access to geometry; callers only read snapshots.
pub trait Canvas {
    /// What `set_object_source` accepts as frame data.
    type Source;

    fn add_object(&mut self, geometry: ObjectGeometry) -> ObjectId;
    /// Current geometry, or `None` if the object is gone.
    fn geometry(&self, id: ObjectId) -> Option<ObjectGeometry>;
    /// Change the intrinsic (unscaled) size, keeping position and scale.
    fn resize_object(&mut self, id: ObjectId, width: f32, height: f32);
    fn set_object_source(&mut self, id: ObjectId, source: Self::Source);
    fn request_repaint(&mut self);
    /// Register a listener for geometry events.
    fn subscribe(&mut self) -> Receiver<GeometryEvent>;
    /// Drop all objects and listeners.
    fn dispose(&mut self);
}
