// Texture backend - The seam between texture bookkeeping and the GPU
//
// Framebuffer and registry logic only needs three things from the device:
// create a texture, write bytes into it, destroy it. Putting those behind a
// trait lets the resize and lifecycle rules run against a recording mock in
// tests, with `GpuContext` as the wgpu implementation.

use crate::display::{Dimension, PixelFormat};
use crate::error::GfxError;

/// How a texture is used by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRole {
    /// Sampled in a shader and written from the host
    Streaming,
    /// Rendered into, then sampled
    RenderTarget,
}

/// Parameters of a texture to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: &'static str,
    pub size: Dimension,
    pub format: PixelFormat,
    pub role: TextureRole,
}

impl TextureDesc {
    /// Host-writable texture
    pub fn streaming(label: &'static str, size: Dimension, format: PixelFormat) -> Self {
        Self {
            label,
            size,
            format,
            role: TextureRole::Streaming,
        }
    }

    /// RGBA render target
    pub fn render_target(label: &'static str, size: Dimension) -> Self {
        Self {
            label,
            size,
            format: PixelFormat::Rgba8,
            role: TextureRole::RenderTarget,
        }
    }

    /// Check the size against a device limit
    ///
    /// # Panics
    /// Panics on a zero-sized texture.
    pub fn check_limit(&self, max_side: u32) -> Result<(), GfxError> {
        assert!(
            !self.size.is_empty(),
            "texture '{}' must have a non-zero size, got {}",
            self.label,
            self.size
        );
        if self.size.width > max_side || self.size.height > max_side {
            return Err(GfxError::TextureTooLarge {
                size: self.size,
                limit: max_side,
            });
        }
        Ok(())
    }
}

/// Creates, writes and destroys textures
pub trait TextureBackend {
    /// Backend texture object
    type Texture;

    /// Create a texture
    ///
    /// # Errors
    /// `GfxError::TextureTooLarge` if the device cannot hold it.
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Self::Texture, GfxError>;

    /// Overwrite the whole texture with tightly packed pixels
    ///
    /// Callers validate `bytes.len()` against `size` and `format` beforehand.
    fn write_texture(
        &mut self,
        texture: &Self::Texture,
        size: Dimension,
        format: PixelFormat,
        bytes: &[u8],
    );

    /// Release a texture
    fn destroy_texture(&mut self, texture: Self::Texture);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_check() {
        let desc = TextureDesc::streaming("fb", Dimension::new(4096, 16), PixelFormat::Rgba8);
        assert!(desc.check_limit(4096).is_ok());
        assert!(matches!(
            desc.check_limit(2048),
            Err(GfxError::TextureTooLarge { limit: 2048, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "non-zero size")]
    fn test_zero_size_is_contract_violation() {
        let desc = TextureDesc::render_target("offscreen", Dimension::new(0, 10));
        let _ = desc.check_limit(8192);
    }

    #[test]
    fn test_render_target_is_rgba() {
        let desc = TextureDesc::render_target("offscreen", Dimension::new(2, 2));
        assert_eq!(desc.format, PixelFormat::Rgba8);
        assert_eq!(desc.role, TextureRole::RenderTarget);
    }
}
