// emu-gfx Library
// Presentation layer for emulator front-ends

// Public modules
pub mod display;
pub mod error;
pub mod frontend;
pub mod gpu;
pub mod overlay;

// Re-export main types for convenience
pub use display::{
    compute_viewport, BorderInsets, Dimension, DisplayInfo, Orientation, PaletteTable,
    PixelAspect, PixelFormat, Rect, Viewport,
};
pub use error::{ConfigError, GfxError};
pub use frontend::{run_frontend, FrontendConfig};
pub use gpu::{
    ExtraDraw, FrameContext, FrameStatus, GpuContext, Presenter, PresenterConfig, TextureHandle,
};
pub use overlay::{FlashFeedback, FlashTint, MuteIndicator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Everything that does not need a GPU can be built directly
        let _flash = FlashFeedback::new();
        let _mute = MuteIndicator::new();
        let _palette = PaletteTable::preset("nes").unwrap();
        let _config = FrontendConfig::default();
        let _presenter = PresenterConfig::default();
    }
}
