//! Frame sources: animated GIFs decoded in-process, video pre-decoded through
//! an `ffprobe`/`ffmpeg` subprocess.
//!
//! Video frames are streamed to a callback as ffmpeg produces them so the
//! first frame can be shown before the whole clip is in memory.
//! RAM cost: ~3.7MB per frame at 1280x720.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;

use super::types::{DecodedFrame, VideoMeta};

/// Extensions routed through ffmpeg.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mkv", "avi", "m4v"];

/// Maximum video duration (seconds) we'll pre-decode. Beyond this, reject.
pub const MAX_PREDECODE_SECS: f64 = 60.0;

/// GIF frames shorter than this are stretched to it.
const MIN_GIF_DELAY_MS: u32 = 20;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("ffmpeg/ffprobe not found on PATH")]
    FfmpegMissing,

    #[error("ffprobe failed: {0}")]
    Probe(String),

    #[error("no video stream found")]
    NoVideoStream,

    #[error("video is {0:.1}s long, over the pre-decode limit")]
    TooLong(f64),

    #[error("ffmpeg failed: {0}")]
    Decode(String),

    #[error("GIF decode error: {0}")]
    Gif(#[from] gif::DecodingError),

    #[error("source has no frames")]
    Empty,
}

/// Which decoder a path goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Gif,
    Video,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Result<Self, MediaError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext == "gif" {
            Ok(SourceKind::Gif)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Ok(SourceKind::Video)
        } else {
            Err(MediaError::Unsupported(path.display().to_string()))
        }
    }
}

/// Check if ffmpeg/ffprobe are available on the system. Cached per process.
pub fn ffmpeg_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        Command::new("ffprobe")
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

/// Probe video metadata using ffprobe.
pub fn probe_video(path: &Path) -> Result<VideoMeta, MediaError> {
    if !ffmpeg_available() {
        return Err(MediaError::FfmpegMissing);
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| MediaError::Probe(e.to_string()))?;

    if !output.status.success() {
        return Err(MediaError::Probe("non-zero exit code".to_string()));
    }

    parse_probe_output(&output.stdout)
}

/// Pull dimensions, frame rate and duration out of ffprobe's JSON.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoMeta, MediaError> {
    let json: serde_json::Value =
        serde_json::from_slice(stdout).map_err(|e| MediaError::Probe(e.to_string()))?;

    let video_stream = json["streams"]
        .as_array()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s["codec_type"].as_str() == Some("video"))
        })
        .ok_or(MediaError::NoVideoStream)?;

    let width = video_stream["width"]
        .as_u64()
        .ok_or_else(|| MediaError::Probe("missing width".into()))? as u32;
    let height = video_stream["height"]
        .as_u64()
        .ok_or_else(|| MediaError::Probe("missing height".into()))? as u32;

    let fps = parse_frame_rate(video_stream["r_frame_rate"].as_str().unwrap_or("30/1"));

    let duration_secs = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            video_stream["duration"]
                .as_str()
                .and_then(|s| s.parse::<f64>().ok())
        })
        .unwrap_or(0.0);

    Ok(VideoMeta {
        width,
        height,
        fps,
        duration_secs,
    })
}

fn parse_frame_rate(rate: &str) -> f64 {
    let fps = if let Some((num, den)) = rate.split_once('/') {
        let n: f64 = num.parse().unwrap_or(30.0);
        let d: f64 = den.parse().unwrap_or(1.0);
        if d > 0.0 { n / d } else { 30.0 }
    } else {
        rate.parse().unwrap_or(30.0)
    };
    if fps.is_finite() && fps > 0.0 { fps } else { 30.0 }
}

/// Decode every frame via a single ffmpeg run, handing each to `on_frame`.
/// Stops early (without error) when `on_frame` returns false.
/// Returns the number of frames delivered.
pub fn decode_video_frames(
    path: &Path,
    meta: &VideoMeta,
    mut on_frame: impl FnMut(DecodedFrame, u32) -> bool,
) -> Result<usize, MediaError> {
    if meta.duration_secs > MAX_PREDECODE_SECS {
        return Err(MediaError::TooLong(meta.duration_secs));
    }

    let frame_size = (meta.width as usize) * (meta.height as usize) * 4;
    let limit = frame_limit(meta);
    log::info!(
        "Pre-decoding video: up to {} frames, ~{}MB RAM",
        limit,
        (limit * frame_size) / (1024 * 1024),
    );

    let mut child = Command::new("ffmpeg")
        .arg("-i")
        .arg(path)
        .args([
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", meta.width, meta.height),
            // one past the limit so an over-long stream is detected
            "-frames:v",
            &(limit + 1).to_string(),
            "-v",
            "quiet",
            "pipe:1",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| MediaError::Decode(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| MediaError::Decode("no stdout pipe".into()))?;

    let result = read_raw_frames(stdout, meta, limit, on_frame);
    let _ = child.kill();
    let _ = child.wait();

    let delivered = result?;
    log::info!("Decoded {delivered} video frames");
    Ok(delivered)
}

/// Most frames a clip may pre-decode, from its frame rate.
/// Holds even when the container reports no duration.
pub fn frame_limit(meta: &VideoMeta) -> usize {
    (MAX_PREDECODE_SECS * meta.fps).ceil().max(1.0) as usize
}

/// Read packed RGBA frames from `reader`, handing each to `on_frame`.
/// A stream with more than `limit` frames is rejected as too long.
pub fn read_raw_frames(
    mut reader: impl Read,
    meta: &VideoMeta,
    limit: usize,
    mut on_frame: impl FnMut(DecodedFrame, u32) -> bool,
) -> Result<usize, MediaError> {
    let frame_size = (meta.width as usize) * (meta.height as usize) * 4;
    let delay_ms = ((1000.0 / meta.fps).round() as u32).max(1);

    let mut delivered = 0;
    let mut buf = vec![0u8; frame_size];
    while reader.read_exact(&mut buf).is_ok() {
        if delivered == limit {
            let secs = (delivered + 1) as f64 / meta.fps;
            log::warn!("Video runs past {limit} frames, rejecting");
            return Err(MediaError::TooLong(secs));
        }
        let frame = DecodedFrame {
            data: buf.clone(),
            width: meta.width,
            height: meta.height,
        };
        delivered += 1;
        if !on_frame(frame, delay_ms) {
            log::debug!("Video decode stopped by receiver after {delivered} frames");
            break;
        }
    }

    if delivered == 0 {
        return Err(MediaError::Decode("decoded zero frames".into()));
    }
    Ok(delivered)
}

/// Load an animated GIF, pre-decoding and compositing all frames.
pub fn load_gif(path: &Path) -> Result<(Vec<DecodedFrame>, Vec<u32>), MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut reader = options.read_info(file)?;

    let width = reader.width() as u32;
    let height = reader.height() as u32;

    let mut frames = Vec::new();
    let mut delays_ms = Vec::new();

    // GIF frames can be partial updates
    let mut canvas = vec![0u8; (width * height * 4) as usize];

    while let Some(frame) = reader.read_next_frame()? {
        let delay = frame.delay as u32 * 10; // centiseconds
        delays_ms.push(delay.max(MIN_GIF_DELAY_MS));

        let fx = frame.left as u32;
        let fy = frame.top as u32;
        let fw = frame.width as u32;
        let fh = frame.height as u32;

        for y in 0..fh {
            for x in 0..fw {
                let src_idx = ((y * fw + x) * 4) as usize;
                let dst_x = fx + x;
                let dst_y = fy + y;
                if dst_x < width && dst_y < height {
                    let dst_idx = ((dst_y * width + dst_x) * 4) as usize;
                    let src = &frame.buffer[src_idx..src_idx + 4];
                    if src[3] > 0 {
                        canvas[dst_idx..dst_idx + 4].copy_from_slice(src);
                    }
                }
            }
        }

        frames.push(DecodedFrame {
            data: canvas.clone(),
            width,
            height,
        });
    }

    if frames.is_empty() {
        return Err(MediaError::Empty);
    }

    log::info!("Loaded GIF: {}x{}, {} frames", width, height, frames.len());
    Ok((frames, delays_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn frame_rate_parsing() {
        assert!((parse_frame_rate("30000/1001") - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("25"), 25.0);
        assert_eq!(parse_frame_rate("24/0"), 30.0);
        assert_eq!(parse_frame_rate("garbage"), 30.0);
        assert_eq!(parse_frame_rate("0/1"), 30.0);
    }

    #[test]
    fn probe_json_prefers_format_duration() {
        let json = br#"{
            "streams": [
                {"codec_type": "audio"},
                {"codec_type": "video", "width": 1920, "height": 1080,
                 "r_frame_rate": "60/1", "duration": "9.0"}
            ],
            "format": {"duration": "12.5"}
        }"#;
        let meta = parse_probe_output(json).unwrap();
        assert_eq!((meta.width, meta.height), (1920, 1080));
        assert_eq!(meta.fps, 60.0);
        assert_eq!(meta.duration_secs, 12.5);
    }

    #[test]
    fn unknown_duration_is_still_frame_capped() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 3840, "height": 2160, "r_frame_rate": "60/1"}
            ],
            "format": {}
        }"#;
        let meta = parse_probe_output(json).unwrap();
        assert_eq!(meta.duration_secs, 0.0);
        assert_eq!(frame_limit(&meta), 3600);
    }

    fn tiny_meta(fps: f64) -> VideoMeta {
        VideoMeta {
            width: 1,
            height: 1,
            fps,
            duration_secs: 0.0,
        }
    }

    #[test]
    fn raw_stream_within_limit_is_delivered() {
        let meta = tiny_meta(1.0);
        let limit = frame_limit(&meta);
        let bytes = vec![7u8; limit * 4];
        let mut seen = 0;
        let delivered = read_raw_frames(bytes.as_slice(), &meta, limit, |frame, delay_ms| {
            assert_eq!(frame.data, vec![7; 4]);
            assert_eq!(delay_ms, 1000);
            seen += 1;
            true
        })
        .unwrap();
        assert_eq!(delivered, 60);
        assert_eq!(seen, 60);
    }

    #[test]
    fn raw_stream_past_limit_is_rejected() {
        let meta = tiny_meta(1.0);
        let limit = frame_limit(&meta);
        let bytes = vec![0u8; (limit + 1) * 4];
        let mut seen = 0;
        let result = read_raw_frames(bytes.as_slice(), &meta, limit, |_, _| {
            seen += 1;
            true
        });
        assert!(matches!(result, Err(MediaError::TooLong(secs)) if secs > MAX_PREDECODE_SECS));
        assert_eq!(seen, limit);
    }

    #[test]
    fn raw_stream_stops_when_receiver_hangs_up() {
        let meta = tiny_meta(10.0);
        let bytes = vec![0u8; 20 * 4];
        let delivered = read_raw_frames(bytes.as_slice(), &meta, 600, |_, _| false).unwrap();
        assert_eq!(delivered, 1);
    }

    #[test]
    fn empty_raw_stream_is_an_error() {
        let meta = tiny_meta(30.0);
        assert!(matches!(
            read_raw_frames(&[][..], &meta, 10, |_, _| true),
            Err(MediaError::Decode(_))
        ));
    }

    #[test]
    fn probe_json_without_video_stream() {
        let json = br#"{"streams": [{"codec_type": "audio"}], "format": {}}"#;
        assert!(matches!(
            parse_probe_output(json),
            Err(MediaError::NoVideoStream)
        ));
    }

    #[test]
    fn source_kind_by_extension() {
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("clip.MP4")).unwrap(),
            SourceKind::Video
        );
        assert_eq!(
            SourceKind::from_path(&PathBuf::from("loop.gif")).unwrap(),
            SourceKind::Gif
        );
        assert!(SourceKind::from_path(&PathBuf::from("notes.txt")).is_err());
    }

    #[test]
    fn too_long_video_is_rejected_before_spawning() {
        let meta = VideoMeta {
            width: 2,
            height: 2,
            fps: 30.0,
            duration_secs: 90.0,
        };
        let result = decode_video_frames(Path::new("missing.mp4"), &meta, |_, _| true);
        assert!(matches!(result, Err(MediaError::TooLong(_))));
    }

    #[test]
    fn gif_frames_and_delays() {
        let mut file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();
        {
            let mut bytes = Vec::new();
            {
                let mut encoder = gif::Encoder::new(&mut bytes, 2, 2, &[]).unwrap();
                for delay in [5u16, 0] {
                    let mut rgba = vec![255u8; 16];
                    let mut frame = gif::Frame::from_rgba_speed(2, 2, &mut rgba, 10);
                    frame.delay = delay;
                    encoder.write_frame(&frame).unwrap();
                }
            }
            file.write_all(&bytes).unwrap();
        }

        let (frames, delays) = load_gif(file.path()).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(DecodedFrame::is_well_formed));
        assert_eq!(delays, vec![50, MIN_GIF_DELAY_MS]);
    }

    #[test]
    fn missing_gif_reports_open_error() {
        let err = load_gif(Path::new("/nonexistent/never.gif")).unwrap_err();
        assert!(matches!(err, MediaError::Open { .. }));
    }
}
