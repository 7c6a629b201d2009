use super::clock::format_clock;

/// Notifications raised by a playback element, drained by the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Duration and intrinsic size are now known.
    MetadataLoaded {
        duration: f64,
        width: u32,
        height: u32,
    },
    /// The first frame is decoded and can be shown while paused.
    FramesReady,
    /// Playback reached the end with looping off.
    Ended,
    /// The source could not be opened or decoded.
    LoadFailed(String),
}

/// The video decode/transport primitive the overlay drives.
///
/// Mirrors a media element: the element owns its own clock and clamps seeks.
pub trait PlaybackElement {
    /// Handle to a decoded frame, pushed into the canvas object as-is.
    type Frame;

    fn play(&mut self);
    fn pause(&mut self);
    fn paused(&self) -> bool;
    fn current_time(&self) -> f64;
    /// Seek. Implementations clamp to `[0, duration]`.
    fn set_current_time(&mut self, seconds: f64);
    /// Zero until metadata has loaded.
    fn duration(&self) -> f64;
    fn looping(&self) -> bool;
    fn set_looping(&mut self, looping: bool);
    fn set_muted(&mut self, muted: bool);
    /// Frame at the current playback position, if one has been decoded.
    fn current_frame(&self) -> Option<Self::Frame>;
    fn poll_event(&mut self) -> Option<PlaybackEvent>;
}

/// Transport state owned by the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Seconds, within `[0, duration]` once duration is known.
    pub current_time: f64,
    /// Seconds, zero until metadata loads.
    pub duration: f64,
    pub looping: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            looping: false,
        }
    }
}

impl PlaybackState {
    pub fn has_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// Store a time read from the element, holding the range invariant.
    pub fn set_time(&mut self, seconds: f64) {
        let t = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.current_time = if self.has_duration() {
            t.min(self.duration)
        } else {
            t
        };
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        let t = self.current_time;
        self.set_time(t);
    }

    /// Progress in percent, or `None` while duration is unknown.
    pub fn fill_percent(&self) -> Option<f32> {
        if !self.has_duration() {
            return None;
        }
        Some((self.current_time / self.duration * 100.0) as f32)
    }
}

/// Clock strings bound by the control bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLabels {
    pub current_time_label: String,
    pub duration_label: String,
}

impl Default for DisplayLabels {
    fn default() -> Self {
        Self {
            current_time_label: format_clock(0.0),
            duration_label: format_clock(0.0),
        }
    }
}

impl DisplayLabels {
    pub fn refresh_current(&mut self, state: &PlaybackState) {
        self.current_time_label = format_clock(state.current_time);
    }

    pub fn refresh_duration(&mut self, state: &PlaybackState) {
        self.duration_label = format_clock(state.duration);
    }
}
