// Texture registry - Handle-based RGBA textures for collaborators
//
// The debugger and the snapshot thumbnails need textures that live outside
// the framebuffer pipeline. Each one gets an opaque handle. Handles are never
// reused, so a stale handle is always detected instead of aliasing a newer
// texture.

use std::collections::HashMap;

use super::backend::{TextureBackend, TextureDesc};
use crate::display::{Dimension, PixelFormat};
use crate::error::GfxError;

/// Opaque identifier of a registry texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// Raw handle value
    pub fn id(&self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn from_id(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry<T> {
    texture: T,
    size: Dimension,
}

/// Streaming RGBA textures addressed by handle
pub struct TextureRegistry<T> {
    entries: HashMap<u32, Entry<T>>,
    next_id: u32,
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
        }
    }
}

impl<T> TextureRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an uninitialized RGBA texture
    ///
    /// # Errors
    /// - `TextureTooLarge` if `size` exceeds the device limit
    /// - `HandlesExhausted` once every handle value has been issued
    ///
    /// # Panics
    /// Panics if `size` has a zero side.
    pub fn create<B>(&mut self, backend: &mut B, size: Dimension) -> Result<TextureHandle, GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(GfxError::HandlesExhausted)?;

        let desc = TextureDesc::streaming("external", size, PixelFormat::Rgba8);
        let texture = backend.create_texture(&desc)?;
        self.entries.insert(id, Entry { texture, size });
        self.next_id = next_id;

        let handle = TextureHandle(id);
        log::debug!("Created texture {} ({})", handle, size);
        Ok(handle)
    }

    /// Create a texture and fill it with RGBA pixels
    pub fn create_with_data<B>(
        &mut self,
        backend: &mut B,
        size: Dimension,
        rgba: &[u8],
    ) -> Result<TextureHandle, GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        let expected = PixelFormat::Rgba8.frame_len(size);
        if rgba.len() != expected {
            return Err(GfxError::UploadSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let handle = self.create(backend, size)?;
        self.update(backend, handle, rgba, size)?;
        Ok(handle)
    }

    /// Overwrite a texture with RGBA pixels
    ///
    /// # Errors
    /// - `UnknownTexture` for a destroyed or foreign handle
    /// - `TextureSizeMismatch` if `size` is not the created size
    /// - `UploadSizeMismatch` if `rgba` is not `size` pixels
    pub fn update<B>(
        &mut self,
        backend: &mut B,
        handle: TextureHandle,
        rgba: &[u8],
        size: Dimension,
    ) -> Result<(), GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        let entry = self
            .entries
            .get(&handle.0)
            .ok_or(GfxError::UnknownTexture(handle))?;
        if entry.size != size {
            return Err(GfxError::TextureSizeMismatch {
                handle,
                allocated: entry.size,
                requested: size,
            });
        }
        let expected = PixelFormat::Rgba8.frame_len(size);
        if rgba.len() != expected {
            return Err(GfxError::UploadSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        backend.write_texture(&entry.texture, size, PixelFormat::Rgba8, rgba);
        Ok(())
    }

    /// Destroy a texture; the handle becomes invalid
    pub fn destroy<B>(&mut self, backend: &mut B, handle: TextureHandle) -> Result<(), GfxError>
    where
        B: TextureBackend<Texture = T>,
    {
        let entry = self
            .entries
            .remove(&handle.0)
            .ok_or(GfxError::UnknownTexture(handle))?;
        backend.destroy_texture(entry.texture);
        log::debug!("Destroyed texture {}", handle);
        Ok(())
    }

    /// Backend texture behind a handle
    pub fn get(&self, handle: TextureHandle) -> Option<&T> {
        self.entries.get(&handle.0).map(|entry| &entry.texture)
    }

    /// Size a texture was created with
    pub fn size(&self, handle: TextureHandle) -> Option<Dimension> {
        self.entries.get(&handle.0).map(|entry| entry.size)
    }

    /// Number of textures not yet destroyed
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    /// Destroy every remaining texture
    pub fn release_all<B>(&mut self, backend: &mut B)
    where
        B: TextureBackend<Texture = T>,
    {
        if !self.entries.is_empty() {
            log::debug!("Releasing {} external textures", self.entries.len());
        }
        for (_, entry) in self.entries.drain() {
            backend.destroy_texture(entry.texture);
        }
    }
}
