//! Per-frame task that keeps the canvas, scrubber and elapsed label in step
//! with playback.
//!
//! The task reschedules itself through a [`FrameScheduler`] on every tick,
//! playing or not, so a later `play()` is picked up without restarting it.
//! Only a flipped [`CancelToken`] stops the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::canvas::{Canvas, ObjectId};
use super::control_bar::Scrubber;
use super::playback::{DisplayLabels, PlaybackElement, PlaybackState};

/// Host primitive that runs the next tick on the next frame boundary.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Disposed-flag shared between the overlay and its frame task.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Playing: frame pushed (if decoded), repaint requested, label refreshed.
    Rendered,
    /// Paused: rescheduled only.
    Idle,
    /// Cancelled: nothing done, not rescheduled.
    Cancelled,
}

/// State slices one tick reads and writes.
pub struct TickTargets<'a, P: PlaybackElement, C: Canvas<Source = P::Frame>> {
    pub playback: &'a P,
    pub canvas: &'a mut C,
    pub object: Option<ObjectId>,
    pub state: &'a mut PlaybackState,
    pub labels: &'a mut DisplayLabels,
    pub scrubber: &'a mut Scrubber,
}

#[derive(Debug)]
pub struct RenderBridge {
    cancel: CancelToken,
    rendered_ticks: u64,
    idle_ticks: u64,
}

impl RenderBridge {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            rendered_ticks: 0,
            idle_ticks: 0,
        }
    }

    /// Schedule the first tick.
    pub fn start(&self, scheduler: &mut dyn FrameScheduler) {
        if !self.cancel.is_cancelled() {
            scheduler.request_frame();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn rendered_ticks(&self) -> u64 {
        self.rendered_ticks
    }

    pub fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }

    pub fn tick<P, C>(
        &mut self,
        targets: TickTargets<'_, P, C>,
        scheduler: &mut dyn FrameScheduler,
    ) -> TickOutcome
    where
        P: PlaybackElement,
        C: Canvas<Source = P::Frame>,
    {
        if self.cancel.is_cancelled() {
            return TickOutcome::Cancelled;
        }

        if !targets.state.is_playing {
            self.idle_ticks += 1;
            scheduler.request_frame();
            return TickOutcome::Idle;
        }

        let TickTargets {
            playback,
            canvas,
            object,
            state,
            labels,
            scrubber,
        } = targets;

        if let Some(id) = object {
            if let Some(frame) = playback.current_frame() {
                canvas.set_object_source(id, frame);
            }
        }

        state.set_time(playback.current_time());
        if let Some(percent) = state.fill_percent() {
            scrubber.set_fill(percent);
        }

        if object.is_some() {
            canvas.request_repaint();
        }

        labels.refresh_current(state);
        self.rendered_ticks += 1;
        log::trace!(
            "bridge tick: t={:.3}s fill={:.1}%",
            state.current_time,
            scrubber.fill_percent()
        );

        scheduler.request_frame();
        TickOutcome::Rendered
    }
}
