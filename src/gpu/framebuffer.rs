// Framebuffer textures - GPU mirror of the pixel buffer store
//
// Owns three textures:
// - the framebuffer texture, same size as the logical framebuffer
//   (R8 indices in paletted mode, RGBA otherwise)
// - the palette lookup texture (256x1 RGBA), paletted mode only
// - the offscreen upscale target, twice the view size
//
// Textures are recreated only when their size changes. A framebuffer resize
// also drops the offscreen target, which the next `ensure_offscreen` rebuilds.

use super::backend::{TextureBackend, TextureDesc};
use crate::display::{Dimension, DisplayInfo, PaletteTable, PixelFormat, PALETTE_CAPACITY};
use crate::error::{ConfigError, GfxError};

/// Scale factor of the offscreen upscale pass
pub const OFFSCREEN_SCALE: u32 = 2;

/// Which textures `prepare` recreated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resized {
    pub framebuffer: bool,
    pub offscreen: bool,
}

impl Resized {
    /// True if any texture was recreated, so bind groups are stale
    pub fn any(&self) -> bool {
        self.framebuffer || self.offscreen
    }
}

/// Framebuffer, palette and offscreen textures
pub struct FramebufferTextures<T> {
    format: PixelFormat,
    palette: Option<T>,
    size: Option<Dimension>,
    texture: Option<T>,
    view_size: Option<Dimension>,
    offscreen: Option<T>,
}

impl<T> FramebufferTextures<T> {
    /// Set up the color mode and upload the palette
    ///
    /// # Arguments
    /// * `backend` - Texture backend
    /// * `paletted` - Store 8-bit indices instead of RGBA
    /// * `palette` - Lookup table, required in paletted mode
    ///
    /// # Errors
    /// `ConfigError::MissingPalette` if `paletted` is set without a palette.
    pub fn configure<B>(
        backend: &mut B,
        paletted: bool,
        palette: Option<&PaletteTable>,
    ) -> Result<Self, GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        let (format, palette_texture) = if paletted {
            let table = palette.ok_or(ConfigError::MissingPalette)?;
            let size = Dimension::new(PALETTE_CAPACITY as u32, 1);
            let desc = TextureDesc::streaming("palette", size, PixelFormat::Rgba8);
            let texture = backend.create_texture(&desc)?;
            backend.write_texture(&texture, size, PixelFormat::Rgba8, table.as_bytes());
            log::debug!("Palette uploaded ({} entries)", table.len());
            (PixelFormat::Indexed8, Some(texture))
        } else {
            if palette.is_some() {
                log::warn!("Palette supplied for direct color mode, ignoring it");
            }
            (PixelFormat::Rgba8, None)
        };

        Ok(Self {
            format,
            palette: palette_texture,
            size: None,
            texture: None,
            view_size: None,
            offscreen: None,
        })
    }

    /// Make the framebuffer texture match `dim`
    ///
    /// # Returns
    /// `true` if the texture was (re)created
    ///
    /// # Panics
    /// Panics if `dim` has a zero side.
    pub fn ensure_size<B>(&mut self, backend: &mut B, dim: Dimension) -> Result<bool, GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        assert!(!dim.is_empty(), "framebuffer dimension {} must be non-zero", dim);
        if self.size == Some(dim) {
            return Ok(false);
        }

        log::debug!(
            "Recreating framebuffer texture: {} -> {}",
            self.size.map_or_else(|| "none".to_string(), |s| s.to_string()),
            dim
        );

        if let Some(old) = self.texture.take() {
            backend.destroy_texture(old);
        }
        if let Some(old) = self.offscreen.take() {
            backend.destroy_texture(old);
        }
        self.size = None;
        self.view_size = None;

        let desc = TextureDesc::streaming("framebuffer", dim, self.format);
        self.texture = Some(backend.create_texture(&desc)?);
        self.size = Some(dim);
        Ok(true)
    }

    /// Make the offscreen target twice the size of `view`
    ///
    /// # Returns
    /// `true` if the target was (re)created
    ///
    /// # Panics
    /// Panics if `view` has a zero side.
    pub fn ensure_offscreen<B>(&mut self, backend: &mut B, view: Dimension) -> Result<bool, GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        assert!(!view.is_empty(), "view size {} must be non-zero", view);
        if self.view_size == Some(view) && self.offscreen.is_some() {
            return Ok(false);
        }

        let target = view.scaled(OFFSCREEN_SCALE);
        log::debug!("Recreating offscreen target at {} for view {}", target, view);

        if let Some(old) = self.offscreen.take() {
            backend.destroy_texture(old);
        }
        self.view_size = None;

        self.offscreen = Some(backend.create_texture(&TextureDesc::render_target("offscreen", target))?);
        self.view_size = Some(view);
        Ok(true)
    }

    /// Bring every texture in line with this frame's display info
    pub fn prepare<B>(&mut self, backend: &mut B, info: &DisplayInfo) -> Result<Resized, GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        info.assert_valid();
        let framebuffer = self.ensure_size(backend, info.framebuffer)?;
        let offscreen = self.ensure_offscreen(backend, info.view.size())?;
        Ok(Resized {
            framebuffer,
            offscreen,
        })
    }

    /// Copy one frame into the framebuffer texture
    ///
    /// # Errors
    /// - `FramebufferSizeMismatch` if `dim` is not the allocated size
    /// - `UploadSizeMismatch` if `pixels` is not exactly one frame
    pub fn upload<B>(&self, backend: &mut B, pixels: &[u8], dim: Dimension) -> Result<(), GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        let texture = match (&self.texture, self.size) {
            (Some(texture), Some(size)) if size == dim => texture,
            _ => {
                return Err(GfxError::FramebufferSizeMismatch {
                    allocated: self.size.unwrap_or_default(),
                    requested: dim,
                })
            }
        };

        let expected = self.format.frame_len(dim);
        if pixels.len() != expected {
            return Err(GfxError::UploadSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        backend.write_texture(texture, dim, self.format, pixels);
        Ok(())
    }

    /// Framebuffer pixel format
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn is_paletted(&self) -> bool {
        self.format == PixelFormat::Indexed8
    }

    /// Allocated logical framebuffer size
    pub fn size(&self) -> Option<Dimension> {
        self.size
    }

    /// View size the offscreen target was built for
    pub fn view_size(&self) -> Option<Dimension> {
        self.view_size
    }

    pub fn texture(&self) -> Option<&T> {
        self.texture.as_ref()
    }

    pub fn palette(&self) -> Option<&T> {
        self.palette.as_ref()
    }

    pub fn offscreen(&self) -> Option<&T> {
        self.offscreen.as_ref()
    }

    /// Destroy every texture
    pub fn release<B>(self, backend: &mut B)
    where
        B: TextureBackend<Texture = T>,
    {
        for texture in [self.offscreen, self.texture, self.palette].into_iter().flatten() {
            backend.destroy_texture(texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Rect;

    /// Counts calls, textures are plain ids
    #[derive(Default)]
    struct CountingBackend {
        next: u32,
        created: Vec<TextureDesc>,
        destroyed: Vec<u32>,
        writes: Vec<(u32, usize)>,
    }

    impl TextureBackend for CountingBackend {
        type Texture = u32;

        fn create_texture(&mut self, desc: &TextureDesc) -> Result<u32, GfxError> {
            desc.check_limit(8192)?;
            self.next += 1;
            self.created.push(*desc);
            Ok(self.next)
        }

        fn write_texture(&mut self, texture: &u32, _: Dimension, _: PixelFormat, bytes: &[u8]) {
            self.writes.push((*texture, bytes.len()));
        }

        fn destroy_texture(&mut self, texture: u32) {
            self.destroyed.push(texture);
        }
    }

    fn direct(backend: &mut CountingBackend) -> FramebufferTextures<u32> {
        FramebufferTextures::configure(backend, false, None).unwrap()
    }

    #[test]
    fn test_paletted_requires_palette() {
        let mut backend = CountingBackend::default();
        let result = FramebufferTextures::configure(&mut backend, true, None);
        assert!(matches!(
            result,
            Err(GfxError::Config(ConfigError::MissingPalette))
        ));
        assert!(backend.created.is_empty());
    }

    #[test]
    fn test_paletted_uploads_palette_once() {
        let mut backend = CountingBackend::default();
        let palette = PaletteTable::preset("nes").unwrap();
        let fb = FramebufferTextures::configure(&mut backend, true, Some(&palette)).unwrap();

        assert!(fb.is_paletted());
        assert_eq!(backend.created.len(), 1);
        assert_eq!(backend.created[0].size, Dimension::new(256, 1));
        assert_eq!(backend.writes, vec![(1, 1024)]);
    }

    #[test]
    fn test_ensure_size_is_idempotent() {
        let mut backend = CountingBackend::default();
        let mut fb = direct(&mut backend);
        let dim = Dimension::new(320, 240);

        assert!(fb.ensure_size(&mut backend, dim).unwrap());
        assert!(!fb.ensure_size(&mut backend, dim).unwrap());
        assert_eq!(backend.created.len(), 1);
        assert!(backend.destroyed.is_empty());
    }

    #[test]
    fn test_resize_destroys_old_textures() {
        let mut backend = CountingBackend::default();
        let mut fb = direct(&mut backend);
        let info = DisplayInfo::full(Dimension::new(320, 240));
        fb.prepare(&mut backend, &info).unwrap();
        let old_fb = *fb.texture().unwrap();
        let old_off = *fb.offscreen().unwrap();

        assert!(fb.ensure_size(&mut backend, Dimension::new(640, 480)).unwrap());
        assert_eq!(backend.destroyed, vec![old_fb, old_off]);
        assert!(fb.offscreen().is_none());
        assert_eq!(fb.view_size(), None);
    }

    #[test]
    fn test_offscreen_is_twice_the_view() {
        let mut backend = CountingBackend::default();
        let mut fb = direct(&mut backend);
        let info = DisplayInfo {
            framebuffer: Dimension::new(384, 272),
            view: Rect::new(32, 16, 320, 240),
        };

        let resized = fb.prepare(&mut backend, &info).unwrap();
        assert!(resized.framebuffer && resized.offscreen);
        let target = backend.created.last().unwrap();
        assert_eq!(target.size, Dimension::new(640, 480));

        let resized = fb.prepare(&mut backend, &info).unwrap();
        assert!(!resized.any());
    }

    #[test]
    fn test_view_change_alone_rebuilds_offscreen() {
        let mut backend = CountingBackend::default();
        let mut fb = direct(&mut backend);
        let fb_dim = Dimension::new(384, 272);
        fb.prepare(&mut backend, &DisplayInfo::full(fb_dim)).unwrap();

        let cropped = DisplayInfo {
            framebuffer: fb_dim,
            view: Rect::new(0, 0, 256, 240),
        };
        let resized = fb.prepare(&mut backend, &cropped).unwrap();
        assert_eq!(
            resized,
            Resized {
                framebuffer: false,
                offscreen: true
            }
        );
        assert_eq!(fb.view_size(), Some(Dimension::new(256, 240)));
    }

    #[test]
    fn test_upload_checks_byte_count() {
        let mut backend = CountingBackend::default();
        let palette = PaletteTable::preset("nes").unwrap();
        let mut fb = FramebufferTextures::configure(&mut backend, true, Some(&palette)).unwrap();
        let dim = Dimension::new(16, 8);
        fb.ensure_size(&mut backend, dim).unwrap();

        assert!(fb.upload(&mut backend, &[0u8; 128], dim).is_ok());
        assert!(matches!(
            fb.upload(&mut backend, &[0u8; 512], dim),
            Err(GfxError::UploadSizeMismatch {
                expected: 128,
                actual: 512
            })
        ));
    }

    #[test]
    fn test_upload_rejects_unallocated_dimension() {
        let mut backend = CountingBackend::default();
        let mut fb = direct(&mut backend);
        let dim = Dimension::new(8, 8);
        assert!(matches!(
            fb.upload(&mut backend, &[0u8; 256], dim),
            Err(GfxError::FramebufferSizeMismatch { .. })
        ));

        fb.ensure_size(&mut backend, dim).unwrap();
        assert!(matches!(
            fb.upload(&mut backend, &[0u8; 64], Dimension::new(4, 4)),
            Err(GfxError::FramebufferSizeMismatch { .. })
        ));
    }

    #[test]
    fn test_release_destroys_everything() {
        let mut backend = CountingBackend::default();
        let palette = PaletteTable::preset("grayscale").unwrap();
        let mut fb = FramebufferTextures::configure(&mut backend, true, Some(&palette)).unwrap();
        fb.prepare(&mut backend, &DisplayInfo::full(Dimension::new(4, 4)))
            .unwrap();
        fb.release(&mut backend);

        let mut destroyed = backend.destroyed.clone();
        destroyed.sort_unstable();
        assert_eq!(destroyed, vec![1, 2, 3]);
    }

    #[test]
    #[should_panic]
    fn test_zero_dimension_panics() {
        let mut backend = CountingBackend::default();
        let mut fb = direct(&mut backend);
        let _ = fb.ensure_size(&mut backend, Dimension::new(0, 240));
    }
}
