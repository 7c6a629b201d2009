pub mod control_bar;
pub mod overlay;
pub mod stage_chrome;
pub mod theme;
pub mod widgets;

pub use overlay::EguiOverlay;
