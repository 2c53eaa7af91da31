// Common test utilities for GPU-free integration tests
//
// This module provides a recording texture backend so framebuffer and
// registry behavior can be checked without a graphics device.

#![allow(dead_code)]

use emu_gfx::display::{Dimension, PixelFormat};
use emu_gfx::error::GfxError;
use emu_gfx::gpu::{TextureBackend, TextureDesc, TextureRole};

/// Device limit used by the mock
pub const MAX_TEXTURE_SIDE: u32 = 4096;

/// One call made against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        id: u32,
        label: &'static str,
        size: Dimension,
        format: PixelFormat,
        role: TextureRole,
    },
    Write {
        id: u32,
        size: Dimension,
        bytes: usize,
    },
    Destroy {
        id: u32,
    },
}

/// Texture of the recording backend
#[derive(Debug, PartialEq, Eq)]
pub struct MockTexture {
    pub id: u32,
    pub size: Dimension,
}

/// Backend that records every call and tracks live textures
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u32,
    pub calls: Vec<Call>,
    pub live: Vec<u32>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of textures created so far
    pub fn creates(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Create { .. }))
            .count()
    }

    /// Number of textures destroyed so far
    pub fn destroys(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Destroy { .. }))
            .count()
    }

    /// Sizes of created textures with the given label, in creation order
    pub fn created_sizes(&self, label: &str) -> Vec<Dimension> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Create { label: l, size, .. } if *l == label => Some(*size),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls, keep live textures
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl TextureBackend for RecordingBackend {
    type Texture = MockTexture;

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<MockTexture, GfxError> {
        desc.check_limit(MAX_TEXTURE_SIDE)?;
        self.next_id += 1;
        let id = self.next_id;
        self.calls.push(Call::Create {
            id,
            label: desc.label,
            size: desc.size,
            format: desc.format,
            role: desc.role,
        });
        self.live.push(id);
        Ok(MockTexture {
            id,
            size: desc.size,
        })
    }

    fn write_texture(
        &mut self,
        texture: &MockTexture,
        size: Dimension,
        format: PixelFormat,
        bytes: &[u8],
    ) {
        assert!(
            self.live.contains(&texture.id),
            "write to destroyed texture {}",
            texture.id
        );
        assert_eq!(size, texture.size, "write size differs from texture size");
        assert_eq!(bytes.len(), format.frame_len(size));
        self.calls.push(Call::Write {
            id: texture.id,
            size,
            bytes: bytes.len(),
        });
    }

    fn destroy_texture(&mut self, texture: MockTexture) {
        assert!(
            self.live.contains(&texture.id),
            "double destroy of texture {}",
            texture.id
        );
        self.live.retain(|&id| id != texture.id);
        self.calls.push(Call::Destroy { id: texture.id });
    }
}
