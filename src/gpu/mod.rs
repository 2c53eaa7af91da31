// GPU module - wgpu side of the presentation pipeline
//
// This module provides:
// - The texture backend seam and its wgpu implementation
// - Framebuffer, palette and offscreen texture management
// - The external texture registry
// - Render pipelines and WGSL shaders for both passes
// - The presenter, which draws one frame per call

pub mod backend;
pub mod context;
pub mod framebuffer;
pub mod pipeline;
pub mod presenter;
pub mod registry;

pub use backend::{TextureBackend, TextureDesc, TextureRole};
pub use context::{GpuContext, GpuTexture};
pub use framebuffer::{FramebufferTextures, Resized, OFFSCREEN_SCALE};
pub use pipeline::{IconUniforms, OffscreenUniforms};
pub use presenter::{
    ExtraDraw, FrameContext, FrameStatus, Presenter, PresenterConfig, EMPTY_SNAPSHOT_SIZE,
};
pub use registry::{TextureHandle, TextureRegistry};
