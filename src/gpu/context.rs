// GPU context - wgpu instance, surface, device and queue for one window
//
// Created once per window and owned by the presenter. Implements
// `TextureBackend`, so framebuffer and registry logic reach the device only
// through that trait.

use std::sync::Arc;

use winit::window::Window;

use super::backend::{TextureBackend, TextureDesc, TextureRole};
use crate::display::{Dimension, PixelFormat};
use crate::error::GfxError;

/// A wgpu texture together with its default view
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// Device and presentation surface
pub struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Open a device for `window`
    ///
    /// # Arguments
    /// * `window` - Target window, shared with the event loop
    /// * `vsync` - Wait for vertical blank when presenting
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, GfxError> {
        pollster::block_on(Self::new_async(window, vsync))
    }

    async fn new_async(window: Arc<Window>, vsync: bool) -> Result<Self, GfxError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let adapter_info = adapter.get_info();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("emu-gfx device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(GfxError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        log::info!(
            "GPU: {} ({:?}), surface {:?} {}x{}",
            adapter_info.name,
            adapter_info.backend,
            format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            adapter_info,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Current surface size
    pub fn canvas(&self) -> Dimension {
        Dimension::new(self.config.width, self.config.height)
    }

    /// Largest texture side the device accepts
    pub fn max_texture_side(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Reconfigure the surface for a new window size
    ///
    /// Zero sizes (minimized window) are ignored.
    ///
    /// # Returns
    /// `true` if the surface was reconfigured
    pub fn resize(&mut self, size: Dimension) -> bool {
        if size.is_empty() || size == self.canvas() {
            return false;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        log::info!("Surface reconfigured to {}", size);
        true
    }

    /// Acquire the next surface texture
    ///
    /// A lost or outdated surface is reconfigured and acquisition retried
    /// once. A timeout skips the frame.
    ///
    /// # Returns
    /// `None` when the frame should be skipped
    pub fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>, GfxError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface {}, reconfiguring", e);
                self.surface.configure(&self.device, &self.config);
                match self.surface.get_current_texture() {
                    Ok(frame) => Ok(Some(frame)),
                    Err(wgpu::SurfaceError::Timeout) => Ok(None),
                    Err(e) => Err(GfxError::Surface(e)),
                }
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface acquire timed out, skipping frame");
                Ok(None)
            }
            Err(e) => Err(GfxError::Surface(e)),
        }
    }
}

fn texture_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Indexed8 => wgpu::TextureFormat::R8Unorm,
        PixelFormat::Rgba8 => wgpu::TextureFormat::Rgba8UnormSrgb,
    }
}

fn extent(size: Dimension) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

impl TextureBackend for GpuContext {
    type Texture = GpuTexture;

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<GpuTexture, GfxError> {
        desc.check_limit(self.max_texture_side())?;

        let usage = match desc.role {
            TextureRole::Streaming => {
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST
            }
            TextureRole::RenderTarget => {
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING
            }
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: extent(desc.size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(desc.format),
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(GpuTexture { texture, view })
    }

    fn write_texture(
        &mut self,
        texture: &GpuTexture,
        size: Dimension,
        format: PixelFormat,
        bytes: &[u8],
    ) {
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * format.bytes_per_pixel() as u32),
                rows_per_image: Some(size.height),
            },
            extent(size),
        );
    }

    fn destroy_texture(&mut self, texture: GpuTexture) {
        texture.texture.destroy();
    }
}
