use super::canvas::{Canvas, ObjectId};
use super::control_bar::Scrubber;
use super::playback::{DisplayLabels, PlaybackElement, PlaybackState};

/// Discrete user intents posted by the control bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportIntent {
    TogglePlayPause,
    ToggleLoop,
    /// Scrubber moved to `value` on a track of length `max`.
    Scrub { value: f64, max: f64 },
}

/// One-shot transport commands over borrowed overlay state.
///
/// Each command refreshes the affected UI state immediately instead of
/// waiting for the frame task, which does nothing while paused.
pub struct TransportCommands<'a, P: PlaybackElement, C: Canvas<Source = P::Frame>> {
    pub playback: &'a mut P,
    pub canvas: &'a mut C,
    pub object: Option<ObjectId>,
    pub state: &'a mut PlaybackState,
    pub labels: &'a mut DisplayLabels,
    pub scrubber: &'a mut Scrubber,
}

impl<P, C> TransportCommands<'_, P, C>
where
    P: PlaybackElement,
    C: Canvas<Source = P::Frame>,
{
    pub fn apply(&mut self, intent: TransportIntent) {
        match intent {
            TransportIntent::TogglePlayPause => self.toggle_play_pause(),
            TransportIntent::ToggleLoop => self.toggle_loop(),
            TransportIntent::Scrub { value, max } => self.on_scrubber_change(value, max),
        }
    }

    /// Start or stop playback. The frame task picks the new state up on its
    /// next tick, so time is never advanced here.
    pub fn toggle_play_pause(&mut self) {
        if self.playback.paused() {
            self.playback.play();
            self.state.is_playing = true;
        } else {
            self.playback.pause();
            self.state.is_playing = false;
        }
        log::debug!("transport: playing={}", self.state.is_playing);
    }

    pub fn toggle_loop(&mut self) {
        let looping = !self.playback.looping();
        self.playback.set_looping(looping);
        self.state.looping = looping;
        if self.object.is_some() {
            self.canvas.request_repaint();
        }
        log::debug!("transport: loop={looping}");
    }

    /// Seek from a scrubber position, updating fill and label right away.
    pub fn on_scrubber_change(&mut self, raw_value: f64, raw_max: f64) {
        let percent = if raw_max.is_finite() && raw_max > 0.0 && raw_value.is_finite() {
            raw_value / raw_max * 100.0
        } else {
            0.0
        };
        self.scrubber.set_fill(percent as f32);

        if raw_value.is_finite() {
            self.playback.set_current_time(raw_value);
        }
        self.state.set_time(self.playback.current_time());
        self.labels.refresh_current(self.state);

        if let Some(id) = self.object {
            if let Some(frame) = self.playback.current_frame() {
                self.canvas.set_object_source(id, frame);
            }
            self.canvas.request_repaint();
        }
    }
}
