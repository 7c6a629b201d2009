use std::sync::Arc;

/// A decoded frame ready for GPU upload.
#[derive(Debug)]
pub struct DecodedFrame {
    pub data: Vec<u8>, // RGBA8
    pub width: u32,
    pub height: u32,
}

impl DecodedFrame {
    /// Solid-color frame, mostly for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 4)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 4
    }
}

/// Shared handle passed from the element to the canvas without copying pixels.
pub type FrameHandle = Arc<DecodedFrame>;

/// Stream metadata known before frames arrive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMeta {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub duration_secs: f64,
}

/// Messages from the background load thread to its element.
#[derive(Debug)]
pub enum LoadMessage {
    Metadata(VideoMeta),
    /// One decoded frame and how long it stays on screen.
    Frame { frame: DecodedFrame, delay_ms: u32 },
    Finished,
    Failed(String),
}
