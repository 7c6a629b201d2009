//! The interactive surface the video object lives on.
//!
//! Pointer input arrives in logical points. Drags move, scale or rotate the
//! object and are reported to subscribers as [`GeometryEvent`]s.

pub mod gesture;
pub mod renderer;

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::Vec2;

use crate::media::FrameHandle;
use crate::overlay::{Canvas, GeometryEvent, ObjectGeometry, ObjectId};
use gesture::{hit_test, Gesture, Handle};

pub use renderer::ObjectRenderer;

struct StageObject {
    id: ObjectId,
    geometry: ObjectGeometry,
    source: Option<FrameHandle>,
    source_dirty: bool,
}

#[derive(Default)]
pub struct Stage {
    objects: Vec<StageObject>,
    next_id: u32,
    listeners: Vec<Sender<GeometryEvent>>,
    active: Option<(ObjectId, Gesture)>,
    selected: Option<ObjectId>,
    repaint_requested: bool,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    fn object(&self, id: ObjectId) -> Option<&StageObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut StageObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn emit(&mut self, event: GeometryEvent) {
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }

    /// Topmost object and handle under `point`.
    pub fn hit(&self, point: Vec2) -> Option<(ObjectId, Handle)> {
        self.objects
            .iter()
            .rev()
            .find_map(|o| hit_test(&o.geometry, point).map(|h| (o.id, h)))
    }

    /// Returns true if the press landed on an object.
    pub fn pointer_down(&mut self, point: Vec2) -> bool {
        match self.hit(point) {
            Some((id, handle)) => {
                let Some(object) = self.object(id) else {
                    return false;
                };
                let gesture = Gesture::begin(handle, &object.geometry, point);
                log::trace!("gesture start on {id:?}: {gesture:?}");
                self.active = Some((id, gesture));
                self.selected = Some(id);
                self.repaint_requested = true;
                true
            }
            None => {
                self.selected = None;
                false
            }
        }
    }

    pub fn pointer_move(&mut self, point: Vec2, snap: bool) {
        let Some((id, gesture)) = self.active else {
            return;
        };
        let Some(object) = self.object_mut(id) else {
            self.active = None;
            return;
        };
        gesture.apply(&mut object.geometry, point, snap);
        self.repaint_requested = true;
        self.emit(match gesture {
            Gesture::Move { .. } => GeometryEvent::Moving(id),
            Gesture::Scale { .. } => GeometryEvent::Scaling(id),
            Gesture::Rotate => GeometryEvent::Rotating(id),
        });
    }

    /// Ends any gesture. Fires `PointerUp` on every release.
    pub fn pointer_up(&mut self) {
        if let Some((id, _)) = self.active.take() {
            log::trace!("gesture end on {id:?}");
        }
        self.emit(GeometryEvent::PointerUp);
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Consume the pending repaint request.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    /// Latest source for `id` if it changed since the last call.
    pub fn take_new_source(&mut self, id: ObjectId) -> Option<FrameHandle> {
        let object = self.object_mut(id)?;
        if !object.source_dirty {
            return None;
        }
        object.source_dirty = false;
        object.source.clone()
    }
}

impl Canvas for Stage {
    type Source = FrameHandle;

    fn add_object(&mut self, geometry: ObjectGeometry) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.push(StageObject {
            id,
            geometry,
            source: None,
            source_dirty: false,
        });
        self.repaint_requested = true;
        id
    }

    fn geometry(&self, id: ObjectId) -> Option<ObjectGeometry> {
        self.object(id).map(|o| o.geometry)
    }

    fn resize_object(&mut self, id: ObjectId, width: f32, height: f32) {
        if let Some(object) = self.object_mut(id) {
            object.geometry.width = width;
            object.geometry.height = height;
            self.repaint_requested = true;
        }
    }

    fn set_object_source(&mut self, id: ObjectId, source: FrameHandle) {
        if let Some(object) = self.object_mut(id) {
            // the same decoded frame is pushed every tick until playback moves on
            if object
                .source
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &source))
            {
                return;
            }
            object.source = Some(source);
            object.source_dirty = true;
        }
    }

    fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }

    fn subscribe(&mut self) -> Receiver<GeometryEvent> {
        let (tx, rx) = unbounded();
        self.listeners.push(tx);
        rx
    }

    fn dispose(&mut self) {
        log::debug!(
            "Disposing stage: {} objects, {} listeners",
            self.objects.len(),
            self.listeners.len()
        );
        self.objects.clear();
        self.listeners.clear();
        self.active = None;
        self.selected = None;
        self.repaint_requested = true;
    }
}
