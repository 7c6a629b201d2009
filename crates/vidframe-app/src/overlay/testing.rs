//! In-memory collaborators for overlay tests.

use std::collections::VecDeque;

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::bridge::FrameScheduler;
use super::canvas::{Canvas, GeometryEvent, ObjectId};
use super::geometry::ObjectGeometry;
use super::playback::{PlaybackElement, PlaybackEvent};

/// Playback element with a hand-driven clock. Frames are the frame time in ms.
pub struct FakeElement {
    pub time: f64,
    pub duration: f64,
    pub is_paused: bool,
    pub is_looping: bool,
    pub muted: bool,
    pub has_frames: bool,
    pub events: VecDeque<PlaybackEvent>,
}

impl FakeElement {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            time: 0.0,
            duration,
            is_paused: true,
            is_looping: false,
            muted: false,
            has_frames: true,
            events: VecDeque::new(),
        }
    }
}

impl PlaybackElement for FakeElement {
    type Frame = u64;

    fn play(&mut self) {
        self.is_paused = false;
    }

    fn pause(&mut self) {
        self.is_paused = true;
    }

    fn paused(&self) -> bool {
        self.is_paused
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = if self.duration > 0.0 {
            seconds.clamp(0.0, self.duration)
        } else {
            seconds.max(0.0)
        };
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn looping(&self) -> bool {
        self.is_looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.is_looping = looping;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn current_frame(&self) -> Option<u64> {
        self.has_frames.then(|| (self.time * 1000.0) as u64)
    }

    fn poll_event(&mut self) -> Option<PlaybackEvent> {
        self.events.pop_front()
    }
}

/// Canvas that records what was asked of it.
#[derive(Default)]
pub struct FakeCanvas {
    pub geometry: Option<(ObjectId, ObjectGeometry)>,
    pub last_source: Option<u64>,
    pub pushed_frames: usize,
    pub repaints: usize,
    pub disposed: bool,
    listeners: Vec<Sender<GeometryEvent>>,
}

impl FakeCanvas {
    pub fn sample_geometry() -> ObjectGeometry {
        ObjectGeometry {
            left: 100.0,
            top: 100.0,
            width: 500.0,
            height: 500.0,
            scale_x: 0.3,
            scale_y: 0.3,
            angle: 0.0,
        }
    }

    /// Mutate geometry the way a drag would, then notify listeners.
    pub fn drag_to(&mut self, left: f32, top: f32) {
        if let Some((id, g)) = self.geometry.as_mut() {
            g.left = left;
            g.top = top;
            let id = *id;
            self.emit(GeometryEvent::Moving(id));
        }
    }

    pub fn emit(&mut self, event: GeometryEvent) {
        self.listeners.retain(|tx| tx.send(event).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Canvas for FakeCanvas {
    type Source = u64;

    fn add_object(&mut self, geometry: ObjectGeometry) -> ObjectId {
        let id = ObjectId(1);
        self.geometry = Some((id, geometry));
        id
    }

    fn geometry(&self, id: ObjectId) -> Option<ObjectGeometry> {
        self.geometry
            .filter(|(object, _)| *object == id)
            .map(|(_, g)| g)
    }

    fn resize_object(&mut self, id: ObjectId, width: f32, height: f32) {
        if let Some((object, g)) = self.geometry.as_mut() {
            if *object == id {
                g.width = width;
                g.height = height;
            }
        }
    }

    fn set_object_source(&mut self, _id: ObjectId, source: u64) {
        self.last_source = Some(source);
        self.pushed_frames += 1;
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn subscribe(&mut self) -> Receiver<GeometryEvent> {
        let (tx, rx) = unbounded();
        self.listeners.push(tx);
        rx
    }

    fn dispose(&mut self) {
        self.listeners.clear();
        self.geometry = None;
        self.disposed = true;
    }
}

#[derive(Default)]
pub struct CountingScheduler {
    pub requests: usize,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}
