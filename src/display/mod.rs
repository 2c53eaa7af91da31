// Display module - GPU-independent parts of the presentation pipeline
//
// This module provides:
// - Geometry types (dimensions, view rectangles, border insets, pixel aspect)
// - Aspect-correct viewport computation
// - Palette tables (up to 256 RGBA entries) and built-in presets
// - The host-side pixel buffer store the emulator writes into
// - Precomputed quad vertex sets for both render passes
// - CPU conversion of a framebuffer view to RGBA for thumbnails and screenshots

pub mod geometry;
pub mod palette;
pub mod pixel_buffer;
pub mod snapshot;
pub mod vertices;
pub mod viewport;

pub use geometry::{BorderInsets, Dimension, DisplayInfo, PixelAspect, Rect};
pub use palette::{rgb_to_rgba, PaletteTable, NES_PALETTE, PALETTE_CAPACITY};
pub use pixel_buffer::{PixelBuffer, PixelFormat};
pub use snapshot::{resolve_view, rgba_to_rgb, ColorSource};
pub use vertices::{display_quad, ImageOrigin, Orientation, QuadVertex, OFFSCREEN_QUAD};
pub use viewport::{compute_viewport, Viewport};
