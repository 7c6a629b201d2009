pub mod decoder;
pub mod element;
pub mod types;

pub use element::VideoElement;
pub use types::{DecodedFrame, FrameHandle};

/// Extensions offered by the open dialog.
pub fn dialog_extensions() -> Vec<&'static str> {
    std::iter::once("gif")
        .chain(decoder::VIDEO_EXTENSIONS.iter().copied())
        .collect()
}
