// Errors - Failure taxonomy of the presentation layer
//
// - ConfigError: invalid startup configuration, detected before any GPU
//   resource exists. Fatal.
// - GfxError: everything else. Resource failures (texture too large, no
//   adapter, lost device) are fatal for the presenter; the contract-check
//   variants report misuse by the caller (wrong upload size, stale texture
//   handle) and never occur in a correct integration.

use crate::display::Dimension;
use crate::gpu::TextureHandle;

/// Errors in the startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Paletted mode was requested without a palette
    MissingPalette,

    /// A palette with no entries was supplied
    EmptyPalette,

    /// The palette has more entries than the lookup texture holds
    PaletteTooLarge { entries: usize, capacity: usize },

    /// The configuration names a palette preset that does not exist
    UnknownPalettePreset(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingPalette => write!(f, "Paletted mode requires a palette"),
            ConfigError::EmptyPalette => write!(f, "Palette has no entries"),
            ConfigError::PaletteTooLarge { entries, capacity } => write!(
                f,
                "Palette has {} entries, at most {} are supported",
                entries, capacity
            ),
            ConfigError::UnknownPalettePreset(name) => {
                write!(f, "Unknown palette preset '{}'", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by the GPU side of the presentation layer
#[derive(Debug)]
pub enum GfxError {
    /// Invalid configuration
    Config(ConfigError),

    /// A texture exceeds the device's maximum texture size
    TextureTooLarge { size: Dimension, limit: u32 },

    /// The window surface could not be created
    CreateSurface(wgpu::CreateSurfaceError),

    /// No graphics adapter is compatible with the surface
    RequestAdapter(wgpu::RequestAdapterError),

    /// The adapter refused to open a device
    RequestDevice(wgpu::RequestDeviceError),

    /// The adapter cannot present to the window surface
    UnsupportedSurface,

    /// The surface failed in a way reconfiguring does not fix
    Surface(wgpu::SurfaceError),

    /// Upload byte count differs from the frame size
    UploadSizeMismatch { expected: usize, actual: usize },

    /// Upload dimension differs from the allocated texture
    FramebufferSizeMismatch {
        allocated: Dimension,
        requested: Dimension,
    },

    /// Update size differs from the size the texture was created with
    TextureSizeMismatch {
        handle: TextureHandle,
        allocated: Dimension,
        requested: Dimension,
    },

    /// Framebuffer does not fit the pixel buffer store
    FramebufferTooLarge {
        size: Dimension,
        capacity: Dimension,
    },

    /// The texture handle was never created or is already destroyed
    UnknownTexture(TextureHandle),

    /// Every texture handle value has been issued
    HandlesExhausted,
}

impl std::fmt::Display for GfxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GfxError::Config(e) => write!(f, "Configuration error: {}", e),
            GfxError::TextureTooLarge { size, limit } => write!(
                f,
                "Texture of {} exceeds the device limit of {} pixels per side",
                size, limit
            ),
            GfxError::CreateSurface(e) => write!(f, "Surface creation failed: {}", e),
            GfxError::RequestAdapter(e) => write!(f, "No suitable graphics adapter: {}", e),
            GfxError::RequestDevice(e) => write!(f, "Device request failed: {}", e),
            GfxError::UnsupportedSurface => {
                write!(f, "Graphics adapter cannot present to this window")
            }
            GfxError::Surface(e) => write!(f, "Surface error: {}", e),
            GfxError::UploadSizeMismatch { expected, actual } => write!(
                f,
                "Upload size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            GfxError::FramebufferSizeMismatch {
                allocated,
                requested,
            } => write!(
                f,
                "Framebuffer texture is {} but upload is {}",
                allocated, requested
            ),
            GfxError::TextureSizeMismatch {
                handle,
                allocated,
                requested,
            } => write!(
                f,
                "Texture {} is {} but update is {}",
                handle, allocated, requested
            ),
            GfxError::FramebufferTooLarge { size, capacity } => write!(
                f,
                "Framebuffer {} exceeds pixel buffer capacity {}",
                size, capacity
            ),
            GfxError::UnknownTexture(handle) => write!(f, "Unknown texture handle {}", handle),
            GfxError::HandlesExhausted => write!(f, "No texture handles left"),
        }
    }
}

impl std::error::Error for GfxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GfxError::Config(e) => Some(e),
            GfxError::CreateSurface(e) => Some(e),
            GfxError::RequestAdapter(e) => Some(e),
            GfxError::RequestDevice(e) => Some(e),
            GfxError::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for GfxError {
    fn from(e: ConfigError) -> Self {
        GfxError::Config(e)
    }
}

impl From<wgpu::CreateSurfaceError> for GfxError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GfxError::CreateSurface(e)
    }
}

impl From<wgpu::RequestAdapterError> for GfxError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GfxError::RequestAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GfxError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GfxError::RequestDevice(e)
    }
}
