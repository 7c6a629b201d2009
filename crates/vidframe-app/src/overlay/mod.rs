//! Video-on-canvas overlay: keeps playback time, object geometry and the
//! floating control bar in sync.
//!
//! The overlay is toolkit-agnostic. It drives a [`PlaybackElement`], reads
//! geometry from a [`Canvas`], and is ticked through a [`FrameScheduler`].
//! Everything runs on one thread; handlers run to completion before the next
//! tick.

pub mod bridge;
pub mod canvas;
pub mod clock;
pub mod control_bar;
pub mod geometry;
pub mod playback;
pub mod transport;

#[cfg(test)]
mod testing;

use crossbeam_channel::{Receiver, TryRecvError};

pub use bridge::{CancelToken, FrameScheduler, RenderBridge, TickOutcome, TickTargets};
pub use canvas::{Canvas, GeometryEvent, ObjectId};
pub use control_bar::{ControlBar, ControlBarStyle, Scrubber, Visibility};
pub use geometry::{LayoutConfig, LayoutMode, ObjectGeometry};
pub use playback::{DisplayLabels, PlaybackElement, PlaybackEvent, PlaybackState};
pub use transport::{TransportCommands, TransportIntent};

/// Setup parameters for one overlay instance.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    pub layout: LayoutConfig,
    pub muted: bool,
    pub looping: bool,
    /// Where the object is placed before the video's size is known.
    pub initial_geometry: ObjectGeometry,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            muted: true,
            looping: false,
            initial_geometry: ObjectGeometry {
                left: 100.0,
                top: 100.0,
                width: 1280.0,
                height: 720.0,
                scale_x: 0.5,
                scale_y: 0.5,
                angle: 0.0,
            },
        }
    }
}

/// One video object, its control bar, and the frame task tying them together.
pub struct VideoOverlay<P: PlaybackElement, C: Canvas<Source = P::Frame>> {
    playback: P,
    canvas: C,
    object: Option<ObjectId>,
    geometry_rx: Option<Receiver<GeometryEvent>>,
    state: PlaybackState,
    labels: DisplayLabels,
    control_bar: ControlBar,
    scrubber: Scrubber,
    bridge: RenderBridge,
    cancel: CancelToken,
    load_error: Option<String>,
}

impl<P, C> VideoOverlay<P, C>
where
    P: PlaybackElement,
    C: Canvas<Source = P::Frame>,
{
    /// Place the object, subscribe to its geometry, show the bar and start
    /// the frame task.
    pub fn setup(
        mut playback: P,
        mut canvas: C,
        config: &OverlayConfig,
        scheduler: &mut dyn FrameScheduler,
    ) -> Self {
        playback.set_muted(config.muted);
        playback.set_looping(config.looping);

        let object = canvas.add_object(config.initial_geometry);
        let geometry_rx = canvas.subscribe();

        let mut state = PlaybackState {
            is_playing: !playback.paused(),
            looping: playback.looping(),
            ..Default::default()
        };
        state.set_duration(playback.duration());
        state.set_time(playback.current_time());

        let mut labels = DisplayLabels::default();
        labels.refresh_current(&state);
        labels.refresh_duration(&state);

        let mut control_bar = ControlBar::new(config.layout);
        control_bar.show_initial(canvas.geometry(object).as_ref());

        let cancel = CancelToken::new();
        let bridge = RenderBridge::new(cancel.clone());
        bridge.start(scheduler);

        log::info!(
            "Overlay set up: object {:?}, layout {}, muted={}",
            object,
            config.layout.mode.display_name(),
            config.muted
        );

        Self {
            playback,
            canvas,
            object: Some(object),
            geometry_rx: Some(geometry_rx),
            state,
            labels,
            control_bar,
            scrubber: Scrubber::default(),
            bridge,
            cancel,
            load_error: None,
        }
    }

    /// Drain pending playback notifications and geometry events.
    /// Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;

        while let Some(event) = self.playback.poll_event() {
            self.handle_playback_event(event);
            handled += 1;
        }

        loop {
            let Some(rx) = self.geometry_rx.as_ref() else {
                break;
            };
            match rx.try_recv() {
                Ok(event) => {
                    self.handle_geometry_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Geometry event source disconnected");
                    self.geometry_rx = None;
                    break;
                }
            }
        }

        handled
    }

    pub fn handle_playback_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::MetadataLoaded {
                duration,
                width,
                height,
            } => {
                self.state.set_duration(duration);
                self.labels.refresh_duration(&self.state);
                if let Some(id) = self.object {
                    if width > 0 && height > 0 {
                        self.canvas.resize_object(id, width as f32, height as f32);
                    }
                    self.control_bar.relayout(self.canvas.geometry(id).as_ref());
                    self.canvas.request_repaint();
                }
                log::info!("Metadata loaded: {width}x{height}, {duration:.2}s");
            }
            PlaybackEvent::FramesReady => {
                if let Some(id) = self.object {
                    if let Some(frame) = self.playback.current_frame() {
                        self.canvas.set_object_source(id, frame);
                    }
                    self.canvas.request_repaint();
                }
            }
            PlaybackEvent::Ended => {
                self.state.is_playing = false;
                self.state.set_time(self.playback.current_time());
                self.labels.refresh_current(&self.state);
                if let Some(percent) = self.state.fill_percent() {
                    self.scrubber.set_fill(percent);
                }
                log::debug!("Playback ended");
            }
            PlaybackEvent::LoadFailed(message) => {
                log::warn!("Video failed to load: {message}");
                self.state.is_playing = false;
                self.load_error = Some(message);
            }
        }
    }

    /// React to a geometry event. Only the control bar style changes.
    pub fn handle_geometry_event(&mut self, event: GeometryEvent) {
        let Some(id) = self.object else {
            return;
        };
        let ours = match event {
            GeometryEvent::Moving(target)
            | GeometryEvent::Scaling(target)
            | GeometryEvent::Rotating(target) => target == id,
            GeometryEvent::PointerUp => true,
        };
        if !ours {
            return;
        }
        let geometry = self.canvas.geometry(id);
        self.control_bar.on_geometry_event(event, geometry.as_ref());
        log::trace!("geometry event {event:?} -> {:?}", self.control_bar.style());
    }

    /// Run one frame of the render bridge.
    pub fn tick(&mut self, scheduler: &mut dyn FrameScheduler) -> TickOutcome {
        let targets = TickTargets {
            playback: &self.playback,
            canvas: &mut self.canvas,
            object: self.object,
            state: &mut self.state,
            labels: &mut self.labels,
            scrubber: &mut self.scrubber,
        };
        self.bridge.tick(targets, scheduler)
    }

    /// Borrow the transport command handler.
    pub fn transport(&mut self) -> TransportCommands<'_, P, C> {
        TransportCommands {
            playback: &mut self.playback,
            canvas: &mut self.canvas,
            object: self.object,
            state: &mut self.state,
            labels: &mut self.labels,
            scrubber: &mut self.scrubber,
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.transport().toggle_play_pause();
    }

    pub fn toggle_loop(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.transport().toggle_loop();
    }

    pub fn on_scrubber_change(&mut self, raw_value: f64, raw_max: f64) {
        if self.is_torn_down() {
            return;
        }
        self.transport().on_scrubber_change(raw_value, raw_max);
    }

    pub fn apply_intent(&mut self, intent: TransportIntent) {
        if self.is_torn_down() {
            return;
        }
        self.transport().apply(intent);
    }

    /// Switch layout constants, re-placing the bar immediately.
    pub fn set_layout_config(&mut self, config: LayoutConfig) {
        let geometry = self.object.and_then(|id| self.canvas.geometry(id));
        self.control_bar.set_config(config, geometry.as_ref());
    }

    /// Stop the frame task, pause playback and release canvas listeners.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        self.playback.pause();
        self.state.is_playing = false;
        self.geometry_rx = None;
        self.canvas.dispose();
        self.object = None;
        self.control_bar.detach();
        log::info!(
            "Overlay torn down after {} rendered / {} idle ticks",
            self.bridge.rendered_ticks(),
            self.bridge.idle_ticks()
        );
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn looping(&self) -> bool {
        self.state.looping
    }

    pub fn current_time_label(&self) -> &str {
        &self.labels.current_time_label
    }

    pub fn duration_label(&self) -> &str {
        &self.labels.duration_label
    }

    pub fn fill_percent(&self) -> f32 {
        self.scrubber.fill_percent()
    }

    pub fn control_bar_style(&self) -> &ControlBarStyle {
        self.control_bar.style()
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        self.control_bar.config()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn object(&self) -> Option<ObjectId> {
        self.object
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Mutable canvas access for the host's input routing and rendering.
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    /// Mutable element access for the host's clock.
    pub fn playback_mut(&mut self) -> &mut P {
        &mut self.playback
    }
}
