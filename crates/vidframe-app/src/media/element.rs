use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use super::decoder::{self, MediaError, SourceKind};
use super::types::{FrameHandle, LoadMessage, VideoMeta};
use crate::overlay::{PlaybackElement, PlaybackEvent};

/// Pre-decoded clip with its own playback clock.
///
/// Frames arrive from a background load thread and are shown as soon as the
/// first one lands. The clock only moves in [`VideoElement::advance`].
pub struct VideoElement {
    load_rx: Option<Receiver<LoadMessage>>,
    frames: Vec<FrameHandle>,
    /// Start time of each frame in milliseconds.
    starts_ms: Vec<f64>,
    decoded_ms: f64,
    duration: f64,
    time: f64,
    paused: bool,
    looping: bool,
    muted: bool,
    metadata_sent: bool,
    events: VecDeque<PlaybackEvent>,
}

impl VideoElement {
    fn blank() -> Self {
        Self {
            load_rx: None,
            frames: Vec::new(),
            starts_ms: Vec::new(),
            decoded_ms: 0.0,
            duration: 0.0,
            time: 0.0,
            paused: true,
            looping: false,
            muted: false,
            metadata_sent: false,
            events: VecDeque::new(),
        }
    }

    /// An element with no source. Duration stays zero.
    #[cfg(test)]
    fn empty() -> Self {
        Self::blank()
    }

    /// Start loading `path` in the background.
    pub fn open(path: &Path) -> Result<Self, MediaError> {
        let kind = SourceKind::from_path(path)?;
        let (tx, rx) = unbounded();
        let thread_path = path.to_path_buf();

        thread::Builder::new()
            .name("vidframe-loader".into())
            .spawn(move || load_thread(&thread_path, kind, &tx))
            .map_err(|e| MediaError::Decode(format!("failed to spawn loader: {e}")))?;

        log::info!("Loading {}", path.display());
        let mut element = Self::blank();
        element.load_rx = Some(rx);
        Ok(element)
    }

    /// Build from frames already in memory.
    #[cfg(test)]
    fn from_frames(frames: Vec<super::types::DecodedFrame>, delays_ms: &[u32]) -> Self {
        let mut element = Self::blank();
        let (width, height) = frames.first().map_or((0, 0), |f| (f.width, f.height));
        let total_ms: f64 = delays_ms.iter().map(|&d| d as f64).sum();
        element.handle_load_message(LoadMessage::Metadata(VideoMeta {
            width,
            height,
            fps: if total_ms > 0.0 {
                frames.len() as f64 * 1000.0 / total_ms
            } else {
                0.0
            },
            duration_secs: total_ms / 1000.0,
        }));
        for (frame, &delay_ms) in frames.into_iter().zip(delays_ms) {
            element.handle_load_message(LoadMessage::Frame { frame, delay_ms });
        }
        element.handle_load_message(LoadMessage::Finished);
        element
    }

    #[cfg(test)]
    fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }

    #[cfg(test)]
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[cfg(test)]
    fn muted(&self) -> bool {
        self.muted
    }

    /// Drain whatever the load thread has produced so far.
    pub fn pump_loader(&mut self) {
        loop {
            let Some(rx) = self.load_rx.as_ref() else {
                return;
            };
            match rx.try_recv() {
                Ok(message) => self.handle_load_message(message),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Loader thread exited");
                    self.load_rx = None;
                    return;
                }
            }
        }
    }

    fn handle_load_message(&mut self, message: LoadMessage) {
        match message {
            LoadMessage::Metadata(meta) => {
                self.duration = meta.duration_secs.max(0.0);
                self.metadata_sent = true;
                self.events.push_back(PlaybackEvent::MetadataLoaded {
                    duration: self.duration,
                    width: meta.width,
                    height: meta.height,
                });
            }
            LoadMessage::Frame { frame, delay_ms } => {
                self.starts_ms.push(self.decoded_ms);
                self.decoded_ms += delay_ms as f64;
                self.frames.push(Arc::new(frame));
                if self.frames.len() == 1 {
                    self.events.push_back(PlaybackEvent::FramesReady);
                }
            }
            LoadMessage::Finished => {
                self.load_rx = None;
                let decoded = self.decoded_ms / 1000.0;
                // container durations are often a little off from the frame count
                if (decoded - self.duration).abs() > 0.05 {
                    log::debug!(
                        "Duration corrected from {:.3}s to {:.3}s",
                        self.duration,
                        decoded
                    );
                    self.duration = decoded;
                    self.time = self.time.min(decoded);
                    let (width, height) = self
                        .frames
                        .first()
                        .map_or((0, 0), |f| (f.width, f.height));
                    self.events.push_back(PlaybackEvent::MetadataLoaded {
                        duration: decoded,
                        width,
                        height,
                    });
                }
                log::info!(
                    "Load finished: {} frames, {:.2}s",
                    self.frames.len(),
                    self.duration
                );
            }
            LoadMessage::Failed(error) => {
                self.load_rx = None;
                self.events.push_back(PlaybackEvent::LoadFailed(error));
            }
        }
    }

    /// Move the clock forward by `dt_secs` of wall time.
    pub fn advance(&mut self, dt_secs: f64) {
        self.pump_loader();
        if self.paused || !dt_secs.is_finite() || dt_secs <= 0.0 {
            return;
        }

        self.time += dt_secs;
        let end = self.duration;
        if end > 0.0 && self.time >= end {
            if self.looping {
                self.time %= end;
            } else {
                self.time = end;
                self.paused = true;
                self.events.push_back(PlaybackEvent::Ended);
            }
        }
    }

    /// Index of the frame on screen at `seconds`.
    pub fn frame_index_at(&self, seconds: f64) -> Option<usize> {
        if self.frames.is_empty() {
            return None;
        }
        let t_ms = seconds * 1000.0;
        let idx = self.starts_ms.partition_point(|&s| s <= t_ms);
        Some(idx.saturating_sub(1).min(self.frames.len() - 1))
    }
}

impl PlaybackElement for VideoElement {
    type Frame = FrameHandle;

    fn play(&mut self) {
        if self.duration > 0.0 && self.time >= self.duration {
            self.time = 0.0;
        }
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
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
        self.looping
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn set_muted(&mut self, muted: bool) {
        // frames only, no audio track is decoded
        self.muted = muted;
    }

    fn current_frame(&self) -> Option<FrameHandle> {
        self.frame_index_at(self.time)
            .map(|idx| Arc::clone(&self.frames[idx]))
    }

    fn poll_event(&mut self) -> Option<PlaybackEvent> {
        self.events.pop_front()
    }
}

fn load_thread(path: &Path, kind: SourceKind, tx: &Sender<LoadMessage>) {
    let result = match kind {
        SourceKind::Gif => decoder::load_gif(path).map(|(frames, delays_ms)| {
            let total_ms: f64 = delays_ms.iter().map(|&d| d as f64).sum();
            let (width, height) = frames.first().map_or((0, 0), |f| (f.width, f.height));
            let _ = tx.send(LoadMessage::Metadata(VideoMeta {
                width,
                height,
                fps: frames.len() as f64 * 1000.0 / total_ms.max(1.0),
                duration_secs: total_ms / 1000.0,
            }));
            for (frame, delay_ms) in frames.into_iter().zip(delays_ms) {
                if tx.send(LoadMessage::Frame { frame, delay_ms }).is_err() {
                    break;
                }
            }
        }),
        SourceKind::Video => decoder::probe_video(path).and_then(|meta| {
            if meta.duration_secs > decoder::MAX_PREDECODE_SECS {
                return Err(MediaError::TooLong(meta.duration_secs));
            }
            let _ = tx.send(LoadMessage::Metadata(meta));
            decoder::decode_video_frames(path, &meta, |frame, delay_ms| {
                tx.send(LoadMessage::Frame { frame, delay_ms }).is_ok()
            })
            .map(|_| ())
        }),
    };

    let message = match result {
        Ok(()) => LoadMessage::Finished,
        Err(e) => {
            log::warn!("Failed to load {}: {e}", path.display());
            LoadMessage::Failed(e.to_string())
        }
    };
    let _ = tx.send(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::DecodedFrame;
    use std::time::{Duration, Instant};

    fn three_frames() -> VideoElement {
        let frames = (0..3)
            .map(|i| DecodedFrame::solid(2, 2, [i * 80, 0, 0, 255]))
            .collect();
        VideoElement::from_frames(frames, &[100, 100, 100])
    }

    fn drain(element: &mut VideoElement) -> Vec<PlaybackEvent> {
        std::iter::from_fn(|| element.poll_event()).collect()
    }

    #[test]
    fn in_memory_clip_reports_metadata_then_first_frame() {
        let mut e = three_frames();
        assert!((e.duration() - 0.3).abs() < 1e-9);
        let events = drain(&mut e);
        assert_eq!(
            events,
            vec![
                PlaybackEvent::MetadataLoaded {
                    duration: 0.3,
                    width: 2,
                    height: 2
                },
                PlaybackEvent::FramesReady,
            ]
        );
        assert!(e.paused());
        assert!(!e.is_loading());
    }

    #[test]
    fn paused_clock_does_not_move() {
        let mut e = three_frames();
        e.advance(1.0);
        assert_eq!(e.current_time(), 0.0);
    }

    #[test]
    fn frame_lookup_follows_clock() {
        let mut e = three_frames();
        e.play();
        e.advance(0.15);
        assert_eq!(e.frame_index_at(e.current_time()), Some(1));
        let frame = e.current_frame().unwrap();
        assert_eq!(frame.data[0], 80);
        assert_eq!(e.frame_index_at(0.0), Some(0));
        assert_eq!(e.frame_index_at(0.2999), Some(2));
    }

    #[test]
    fn end_without_loop_pauses_and_notifies() {
        let mut e = three_frames();
        drain(&mut e);
        e.play();
        e.advance(0.5);
        assert!(e.paused());
        assert!((e.current_time() - 0.3).abs() < 1e-9);
        assert_eq!(drain(&mut e), vec![PlaybackEvent::Ended]);

        // play at the end restarts
        e.play();
        assert_eq!(e.current_time(), 0.0);
    }

    #[test]
    fn loop_wraps_clock() {
        let mut e = three_frames();
        drain(&mut e);
        e.set_looping(true);
        e.play();
        e.advance(0.35);
        assert!(!e.paused());
        assert!((e.current_time() - 0.05).abs() < 1e-9);
        assert!(drain(&mut e).is_empty());
    }

    #[test]
    fn seek_clamps_to_duration() {
        let mut e = three_frames();
        e.set_current_time(10.0);
        assert!((e.current_time() - 0.3).abs() < 1e-9);
        e.set_current_time(-1.0);
        assert_eq!(e.current_time(), 0.0);
        e.set_current_time(f64::NAN);
        assert_eq!(e.current_time(), 0.0);
    }

    #[test]
    fn empty_element_has_no_frames() {
        let mut e = VideoElement::empty();
        assert_eq!(e.duration(), 0.0);
        assert!(e.current_frame().is_none());
        e.play();
        e.advance(5.0);
        assert_eq!(e.current_time(), 5.0);
        assert!(e.poll_event().is_none());
    }

    #[test]
    fn mute_flag_is_stored() {
        let mut e = VideoElement::empty();
        e.set_muted(true);
        assert!(e.muted());
    }

    #[test]
    fn unsupported_path_fails_synchronously() {
        assert!(matches!(
            VideoElement::open(Path::new("notes.txt")),
            Err(MediaError::Unsupported(_))
        ));
    }

    fn wait_for_load(e: &mut VideoElement) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while e.is_loading() && Instant::now() < deadline {
            e.pump_loader();
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn missing_file_reports_load_failure() {
        let mut e = VideoElement::open(Path::new("/nonexistent/clip.gif")).unwrap();
        wait_for_load(&mut e);
        let events = drain(&mut e);
        assert!(matches!(events.as_slice(), [PlaybackEvent::LoadFailed(_)]));
    }

    #[test]
    fn gif_loads_in_background() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();
        let mut bytes = Vec::new();
        {
            let mut encoder = gif::Encoder::new(&mut bytes, 4, 4, &[]).unwrap();
            for _ in 0..3 {
                let mut rgba = vec![200u8; 64];
                let mut frame = gif::Frame::from_rgba_speed(4, 4, &mut rgba, 10);
                frame.delay = 10;
                encoder.write_frame(&frame).unwrap();
            }
        }
        file.write_all(&bytes).unwrap();

        let mut e = VideoElement::open(file.path()).unwrap();
        wait_for_load(&mut e);
        assert_eq!(e.frame_count(), 3);
        assert!((e.duration() - 0.3).abs() < 1e-9);
        let events = drain(&mut e);
        assert!(matches!(
            events[0],
            PlaybackEvent::MetadataLoaded {
                width: 4,
                height: 4,
                ..
            }
        ));
        assert_eq!(events[1], PlaybackEvent::FramesReady);
    }
}
