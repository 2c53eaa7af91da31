// Presenter - The frame-draw entry point of the presentation layer
//
// One presenter owns every GPU resource of one window. Per frame it runs:
// prepare textures -> upload pixels -> offscreen 2x upscale -> viewport ->
// display pass (picture, mute icon, caller overlay) -> submit and present.

use super::backend::{TextureBackend, TextureDesc};
use super::context::{GpuContext, GpuTexture};
use super::framebuffer::FramebufferTextures;
use super::pipeline::{IconUniforms, Pipelines};
use super::registry::{TextureHandle, TextureRegistry};
use crate::display::{
    compute_viewport, display_quad, resolve_view, BorderInsets, ColorSource, Dimension,
    DisplayInfo, ImageOrigin, Orientation, PaletteTable, PixelAspect, PixelBuffer, PixelFormat,
    Viewport,
};
use crate::error::GfxError;
use crate::overlay::{FlashFeedback, MuteIndicator};

/// Size of the shared placeholder snapshot texture
pub const EMPTY_SNAPSHOT_SIZE: Dimension = Dimension::new(16, 16);

const EMPTY_SNAPSHOT_COLOR: [u8; 4] = [0x20, 0x20, 0x20, 0xFF];

/// Startup configuration of a presenter
#[derive(Debug, Clone)]
pub struct PresenterConfig {
    /// Pixels kept free around the picture
    pub border: BorderInsets,
    /// Shape of one emulated pixel
    pub pixel_aspect: PixelAspect,
    pub orientation: Orientation,
    /// Framebuffer holds palette indices
    pub paletted: bool,
    pub palette: Option<PaletteTable>,
    /// Largest framebuffer the pixel buffer store accepts
    pub max_framebuffer: Dimension,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            border: BorderInsets::default(),
            pixel_aspect: PixelAspect::SQUARE,
            orientation: Orientation::Landscape,
            paletted: false,
            palette: None,
            max_framebuffer: Dimension::new(1024, 1024),
        }
    }
}

/// Per-frame input from the audio side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStatus {
    /// Audio output is suspended, show the mute icon
    pub audio_suspended: bool,
    /// Monotonic frame counter driving the icon blink
    pub frame_count: u64,
}

/// What an extra-draw callback can see while a frame is recorded
pub struct FrameContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub canvas: Dimension,
    /// Where the picture was placed this frame
    pub viewport: Viewport,
}

/// Caller-supplied drawing on top of the picture
///
/// `draw` runs inside the display pass, after the main quad and the mute
/// icon, with the viewport reset to the full canvas.
pub trait ExtraDraw {
    /// Record uploads before any pass begins
    ///
    /// Returned command buffers are submitted ahead of the frame.
    fn prepare(
        &mut self,
        _frame: &FrameContext<'_>,
        _encoder: &mut wgpu::CommandEncoder,
    ) -> Vec<wgpu::CommandBuffer> {
        Vec::new()
    }

    /// Issue draws into the display pass
    fn draw(&mut self, pass: &mut wgpu::RenderPass<'static>);
}

struct FrameBindGroups {
    offscreen: wgpu::BindGroup,
    display: wgpu::BindGroup,
}

/// Presentation pipeline of one window
pub struct Presenter {
    gpu: GpuContext,
    border: BorderInsets,
    pixel_aspect: PixelAspect,
    palette: Option<PaletteTable>,
    pipelines: Pipelines,
    framebuffer: FramebufferTextures<GpuTexture>,
    bind_groups: Option<FrameBindGroups>,
    registry: TextureRegistry<GpuTexture>,
    pixels: PixelBuffer,
    flash: FlashFeedback,
    mute: MuteIndicator,
    icon_texture: GpuTexture,
    icon_bind_group: wgpu::BindGroup,
    empty_snapshot: Option<TextureHandle>,
    last_viewport: Option<Viewport>,
}

impl Presenter {
    /// Create the presenter
    ///
    /// # Errors
    /// `ConfigError` for an invalid color configuration, or a resource error
    /// if the icon texture cannot be created.
    pub fn new(mut gpu: GpuContext, config: PresenterConfig) -> Result<Self, GfxError> {
        let framebuffer =
            FramebufferTextures::configure(&mut gpu, config.paletted, config.palette.as_ref())?;

        // wgpu uses a top-left texture origin on every backend
        let quad = display_quad(config.orientation, ImageOrigin::TopLeft);
        let pipelines = Pipelines::new(
            gpu.device(),
            gpu.surface_format(),
            framebuffer.is_paletted(),
            quad,
        );

        let mute = MuteIndicator::new();
        let icon = mute.bitmap();
        let icon_texture = gpu.create_texture(&TextureDesc::streaming(
            "mute icon",
            icon.size(),
            PixelFormat::Rgba8,
        ))?;
        gpu.write_texture(&icon_texture, icon.size(), PixelFormat::Rgba8, icon.rgba());
        let icon_bind_group = pipelines.icon_bind_group(gpu.device(), &icon_texture.view);

        log::info!(
            "Presenter ready: {} color, {:?}, border {:?}, pixel aspect {}:{}",
            if framebuffer.is_paletted() {
                "paletted"
            } else {
                "direct"
            },
            config.orientation,
            config.border,
            config.pixel_aspect.normalized().width,
            config.pixel_aspect.normalized().height
        );

        Ok(Self {
            gpu,
            border: config.border,
            pixel_aspect: config.pixel_aspect.normalized(),
            palette: if config.paletted { config.palette } else { None },
            pipelines,
            framebuffer,
            bind_groups: None,
            registry: TextureRegistry::new(),
            pixels: PixelBuffer::new(config.max_framebuffer),
            flash: FlashFeedback::new(),
            mute,
            icon_texture,
            icon_bind_group,
            empty_snapshot: None,
            last_viewport: None,
        })
    }

    fn build_bind_groups(&self) -> Option<FrameBindGroups> {
        let framebuffer = self.framebuffer.texture()?;
        let offscreen = self.framebuffer.offscreen()?;
        let palette = self.framebuffer.palette().map(|texture| &texture.view);
        let device = self.gpu.device();
        Some(FrameBindGroups {
            offscreen: self
                .pipelines
                .offscreen_bind_group(device, &framebuffer.view, palette),
            display: self.pipelines.display_bind_group(device, &offscreen.view),
        })
    }

    /// Draw one frame from the pixel buffer store
    ///
    /// # Arguments
    /// * `info` - Framebuffer size and the view rectangle to show
    /// * `status` - Audio suspension and frame counter
    /// * `extra` - Optional overlay drawn after the picture
    ///
    /// # Panics
    /// Panics on zero sizes or a view outside the framebuffer.
    pub fn draw_frame(
        &mut self,
        info: &DisplayInfo,
        status: FrameStatus,
        mut extra: Option<&mut dyn ExtraDraw>,
    ) -> Result<(), GfxError> {
        info.assert_valid();
        let format = self.framebuffer.format();
        let too_large = GfxError::FramebufferTooLarge {
            size: info.framebuffer,
            capacity: self.pixels.capacity(),
        };
        if !self.pixels.fits(info.framebuffer) {
            return Err(too_large);
        }

        // Upload
        let resized = self.framebuffer.prepare(&mut self.gpu, info)?;
        if resized.any() || self.bind_groups.is_none() {
            self.bind_groups = self.build_bind_groups();
        }
        let pixels = self.pixels.frame(info.framebuffer, format).ok_or(too_large)?;
        self.framebuffer
            .upload(&mut self.gpu, pixels, info.framebuffer)?;
        self.pipelines.write_crop(self.gpu.queue(), info);

        let Some(frame) = self.gpu.acquire()? else {
            return Ok(());
        };
        let (Some(bind_groups), Some(offscreen)) =
            (self.bind_groups.as_ref(), self.framebuffer.offscreen())
        else {
            log::warn!("Frame textures missing, skipping frame");
            return Ok(());
        };
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let canvas = self.gpu.canvas();

        let viewport = compute_viewport(canvas, self.border, info.view, self.pixel_aspect);
        self.last_viewport = Some(viewport);
        let icon = self
            .mute
            .placement(canvas, status.audio_suspended, status.frame_count);
        if let Some(placement) = &icon {
            self.pipelines
                .write_icon(queue, &IconUniforms::new(placement, canvas));
        }
        let [r, g, b, a] = self
            .flash
            .next_frame()
            .target_clear_color(self.gpu.surface_format().is_srgb());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame"),
        });
        let frame_context = FrameContext {
            device,
            queue,
            surface_format: self.gpu.surface_format(),
            canvas,
            viewport,
        };
        let extra_buffers = match extra.as_deref_mut() {
            Some(extra) => extra.prepare(&frame_context, &mut encoder),
            None => Vec::new(),
        };

        // Offscreen pass
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("offscreen"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &offscreen.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            self.pipelines
                .draw_offscreen(&mut pass, &bind_groups.offscreen);
        }

        // Display pass
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("display"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    ..Default::default()
                })
                .forget_lifetime();

            if let Some(vp) = viewport.clamp_to(canvas) {
                pass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
                self.pipelines.draw_display(&mut pass, &bind_groups.display);
            }
            pass.set_viewport(
                0.0,
                0.0,
                canvas.width as f32,
                canvas.height as f32,
                0.0,
                1.0,
            );

            if icon.is_some() {
                self.pipelines.draw_icon(&mut pass, &self.icon_bind_group);
            }
            if let Some(extra) = extra.as_deref_mut() {
                extra.draw(&mut pass);
            }
        }

        queue.submit(
            extra_buffers
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        frame.present();
        Ok(())
    }

    /// Start the green success flash
    pub fn notify_success(&mut self) {
        self.flash.notify_success();
    }

    /// Start the red error flash
    pub fn notify_error(&mut self) {
        self.flash.notify_error();
    }

    /// Pixel buffer store, for the emulator to write the next frame into
    pub fn pixel_buffer_mut(&mut self) -> &mut [u8] {
        self.pixels.as_mut_slice()
    }

    pub fn pixel_buffer(&self) -> &[u8] {
        self.pixels.as_slice()
    }

    /// Size of the pixel buffer store in bytes
    pub fn pixel_buffer_len(&self) -> usize {
        self.pixels.len()
    }

    /// Format the emulator must write
    pub fn pixel_format(&self) -> PixelFormat {
        self.framebuffer.format()
    }

    /// Handle a window resize; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(Dimension::new(width, height));
    }

    pub fn canvas(&self) -> Dimension {
        self.gpu.canvas()
    }

    /// Viewport of the most recent frame
    pub fn last_viewport(&self) -> Option<Viewport> {
        self.last_viewport
    }

    pub fn device(&self) -> &wgpu::Device {
        self.gpu.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.gpu.queue()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    fn color_source(&self) -> ColorSource<'_> {
        match &self.palette {
            Some(palette) => ColorSource::Paletted(palette),
            None => ColorSource::Direct,
        }
    }

    /// Create an RGBA streaming texture
    pub fn create_texture(&mut self, size: Dimension) -> Result<TextureHandle, GfxError> {
        self.registry.create(&mut self.gpu, size)
    }

    /// Overwrite a texture created with `create_texture`
    pub fn update_texture(
        &mut self,
        handle: TextureHandle,
        rgba: &[u8],
        size: Dimension,
    ) -> Result<(), GfxError> {
        self.registry.update(&mut self.gpu, handle, rgba, size)
    }

    /// Destroy a texture; the handle must not be used again
    pub fn destroy_texture(&mut self, handle: TextureHandle) -> Result<(), GfxError> {
        if self.empty_snapshot == Some(handle) {
            self.empty_snapshot = None;
        }
        self.registry.destroy(&mut self.gpu, handle)
    }

    /// Texture view for binding a registry texture elsewhere
    pub fn texture_view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.registry.get(handle).map(|texture| &texture.view)
    }

    /// Resolve the view rectangle of a framebuffer to RGBA
    ///
    /// `pixels` uses the presenter's color mode.
    pub fn resolve_rgba(&self, info: &DisplayInfo, pixels: &[u8]) -> Result<Vec<u8>, GfxError> {
        resolve_view(pixels, info, self.color_source())
    }

    /// Texture holding the view rectangle of a framebuffer, e.g. a thumbnail
    pub fn create_screenshot_texture(
        &mut self,
        info: &DisplayInfo,
        pixels: &[u8],
    ) -> Result<TextureHandle, GfxError> {
        let rgba = self.resolve_rgba(info, pixels)?;
        self.registry
            .create_with_data(&mut self.gpu, info.view.size(), &rgba)
    }

    /// Shared placeholder for empty snapshot slots, created on first use
    pub fn empty_snapshot_texture(&mut self) -> Result<TextureHandle, GfxError> {
        if let Some(handle) = self.empty_snapshot {
            return Ok(handle);
        }
        let rgba = EMPTY_SNAPSHOT_COLOR.repeat(EMPTY_SNAPSHOT_SIZE.area());
        let handle = self
            .registry
            .create_with_data(&mut self.gpu, EMPTY_SNAPSHOT_SIZE, &rgba)?;
        self.empty_snapshot = Some(handle);
        Ok(handle)
    }

    /// Release every GPU resource
    pub fn shutdown(self) {
        let Presenter {
            mut gpu,
            framebuffer,
            mut registry,
            icon_texture,
            ..
        } = self;
        registry.release_all(&mut gpu);
        framebuffer.release(&mut gpu);
        gpu.destroy_texture(icon_texture);
        log::info!("Presenter shut down");
    }
}
