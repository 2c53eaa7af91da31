// Frontend module - Demo application around the presenter
//
// This module provides:
// - TOML configuration (video, display layout, screenshots)
// - A test-pattern machine standing in for an emulator core
// - The winit window loop with hotkeys and frame pacing
// - An egui debug overlay drawn through the extra-draw hook
// - PNG screenshots of the visible view

pub mod config;
pub mod debug_overlay;
pub mod machine;
pub mod screenshot;
pub mod window;

pub use config::{
    DisplayConfig, FrontendConfig, PaletteSpec, ScreenshotConfig, VideoConfig, CONFIG_FILE,
};
pub use debug_overlay::{DebugAction, DebugOverlay, StatusInfo};
pub use machine::TestMachine;
pub use screenshot::{save_screenshot, ScreenshotError};
pub use window::{run_frontend, FrontendWindow};
