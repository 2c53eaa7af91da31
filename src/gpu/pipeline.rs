// Pipeline - Render pipelines, samplers and uniforms of both passes
//
// This module provides:
// - Offscreen pipeline (direct or paletted), nearest sampling, crop uniforms
// - Display pipeline, linear sampling, vertex set chosen at creation
// - Icon pipeline, linear sampling, alpha blended with color-only writes
// - Bind group builders for the current set of textures

use wgpu::util::DeviceExt;

use crate::display::{Dimension, DisplayInfo, QuadVertex, OFFSCREEN_QUAD};
use crate::overlay::IconPlacement;

/// Format of the offscreen upscale target
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Framebuffer sampling in the offscreen pass
pub const FRAMEBUFFER_FILTER: wgpu::FilterMode = wgpu::FilterMode::Nearest;

/// Upscaled picture sampling in the display pass
pub const DISPLAY_FILTER: wgpu::FilterMode = wgpu::FilterMode::Linear;

/// Mute icon sampling
pub const ICON_FILTER: wgpu::FilterMode = wgpu::FilterMode::Linear;

/// Crop of the view rectangle in framebuffer texture coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OffscreenUniforms {
    pub uv_offset: [f32; 2],
    pub uv_scale: [f32; 2],
}

impl OffscreenUniforms {
    /// Offset and scale selecting `info.view` out of `info.framebuffer`
    pub fn from_display_info(info: &DisplayInfo) -> Self {
        let fb_w = info.framebuffer.width as f32;
        let fb_h = info.framebuffer.height as f32;
        Self {
            uv_offset: [info.view.x as f32 / fb_w, info.view.y as f32 / fb_h],
            uv_scale: [info.view.width as f32 / fb_w, info.view.height as f32 / fb_h],
        }
    }
}

/// Icon rectangle in NDC and its modulation color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IconUniforms {
    pub rect: [f32; 4],
    pub color: [f32; 4],
}

impl IconUniforms {
    pub fn new(placement: &IconPlacement, canvas: Dimension) -> Self {
        Self {
            rect: placement.to_ndc(canvas),
            color: [1.0, 1.0, 1.0, placement.alpha],
        }
    }
}

fn quad_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn texture_entry(binding: u32, filterable: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn sampler(device: &wgpu::Device, label: &str, filter: wgpu::FilterMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::BindGroupLayout,
    shader: &'a wgpu::ShaderModule,
    fragment: &'a str,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    write_mask: wgpu::ColorWrites,
    vertex_buffer: bool,
}

fn create_pipeline(device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &[desc.layout],
        push_constant_ranges: &[],
    });
    let buffers = [quad_layout()];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: if desc.vertex_buffer { &buffers[..] } else { &[] },
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fragment),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(desc.blend),
                write_mask: desc.write_mask,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Every pipeline, sampler and buffer the presenter draws with
pub struct Pipelines {
    paletted: bool,
    offscreen_layout: wgpu::BindGroupLayout,
    offscreen: wgpu::RenderPipeline,
    display_layout: wgpu::BindGroupLayout,
    display: wgpu::RenderPipeline,
    icon_layout: wgpu::BindGroupLayout,
    icon: wgpu::RenderPipeline,
    nearest: wgpu::Sampler,
    linear: wgpu::Sampler,
    offscreen_quad: wgpu::Buffer,
    display_quad: wgpu::Buffer,
    crop: wgpu::Buffer,
    icon_uniforms: wgpu::Buffer,
}

impl Pipelines {
    /// Build every pipeline
    ///
    /// # Arguments
    /// * `device` - wgpu device
    /// * `surface_format` - Format of the display pass target
    /// * `paletted` - Resolve indices through the palette in the offscreen pass
    /// * `display_quad` - Vertex set for the display pass
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        paletted: bool,
        display_quad: &[QuadVertex; 4],
    ) -> Self {
        let offscreen_shader =
            device.create_shader_module(wgpu::include_wgsl!("shaders/offscreen.wgsl"));
        let display_shader =
            device.create_shader_module(wgpu::include_wgsl!("shaders/display.wgsl"));
        let icon_shader = device.create_shader_module(wgpu::include_wgsl!("shaders/icon.wgsl"));

        let mut offscreen_entries = vec![
            texture_entry(0, true),
            sampler_entry(1),
            uniform_entry(2, wgpu::ShaderStages::VERTEX),
        ];
        if paletted {
            offscreen_entries.push(texture_entry(3, false));
        }
        let offscreen_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("offscreen"),
            entries: &offscreen_entries,
        });
        let display_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("display"),
            entries: &[texture_entry(0, true), sampler_entry(1)],
        });
        let icon_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("icon"),
            entries: &[
                texture_entry(0, true),
                sampler_entry(1),
                uniform_entry(2, wgpu::ShaderStages::VERTEX_FRAGMENT),
            ],
        });

        let offscreen = create_pipeline(
            device,
            PipelineDesc {
                label: "offscreen",
                layout: &offscreen_layout,
                shader: &offscreen_shader,
                fragment: if paletted { "fs_paletted" } else { "fs_direct" },
                format: OFFSCREEN_FORMAT,
                blend: wgpu::BlendState::REPLACE,
                write_mask: wgpu::ColorWrites::ALL,
                vertex_buffer: true,
            },
        );
        let display = create_pipeline(
            device,
            PipelineDesc {
                label: "display",
                layout: &display_layout,
                shader: &display_shader,
                fragment: "fs_main",
                format: surface_format,
                blend: wgpu::BlendState::REPLACE,
                write_mask: wgpu::ColorWrites::ALL,
                vertex_buffer: true,
            },
        );
        let icon = create_pipeline(
            device,
            PipelineDesc {
                label: "icon",
                layout: &icon_layout,
                shader: &icon_shader,
                fragment: "fs_main",
                format: surface_format,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                write_mask: wgpu::ColorWrites::COLOR,
                vertex_buffer: false,
            },
        );

        let offscreen_quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("offscreen quad"),
            contents: bytemuck::cast_slice(&OFFSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let display_quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("display quad"),
            contents: bytemuck::cast_slice(display_quad),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let crop = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("crop"),
            size: std::mem::size_of::<OffscreenUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let icon_uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("icon uniforms"),
            size: std::mem::size_of::<IconUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            paletted,
            offscreen_layout,
            offscreen,
            display_layout,
            display,
            icon_layout,
            icon,
            nearest: sampler(device, "nearest", wgpu::FilterMode::Nearest),
            linear: sampler(device, "linear", wgpu::FilterMode::Linear),
            offscreen_quad,
            display_quad,
            crop,
            icon_uniforms,
        }
    }

    /// Bind group of the offscreen pass
    ///
    /// `palette` must be present exactly when the pipelines are paletted.
    pub fn offscreen_bind_group(
        &self,
        device: &wgpu::Device,
        framebuffer: &wgpu::TextureView,
        palette: Option<&wgpu::TextureView>,
    ) -> wgpu::BindGroup {
        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(framebuffer),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(self.sampler(FRAMEBUFFER_FILTER)),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: self.crop.as_entire_binding(),
            },
        ];
        if let (true, Some(palette)) = (self.paletted, palette) {
            entries.push(wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(palette),
            });
        }
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("offscreen"),
            layout: &self.offscreen_layout,
            entries: &entries,
        })
    }

    /// Bind group of the display pass
    pub fn display_bind_group(
        &self,
        device: &wgpu::Device,
        upscaled: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("display"),
            layout: &self.display_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(upscaled),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(self.sampler(DISPLAY_FILTER)),
                },
            ],
        })
    }

    fn sampler(&self, filter: wgpu::FilterMode) -> &wgpu::Sampler {
        match filter {
            wgpu::FilterMode::Nearest => &self.nearest,
            wgpu::FilterMode::Linear => &self.linear,
        }
    }

    /// Bind group of the icon overlay
    pub fn icon_bind_group(&self, device: &wgpu::Device, icon: &wgpu::TextureView) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("icon"),
            layout: &self.icon_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(icon),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(self.sampler(ICON_FILTER)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.icon_uniforms.as_entire_binding(),
                },
            ],
        })
    }

    /// Upload the crop of this frame's view rectangle
    pub fn write_crop(&self, queue: &wgpu::Queue, info: &DisplayInfo) {
        let uniforms = OffscreenUniforms::from_display_info(info);
        queue.write_buffer(&self.crop, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Upload this frame's icon rectangle and alpha
    pub fn write_icon(&self, queue: &wgpu::Queue, uniforms: &IconUniforms) {
        queue.write_buffer(&self.icon_uniforms, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record the offscreen quad
    pub fn draw_offscreen(&self, pass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.offscreen);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, self.offscreen_quad.slice(..));
        pass.draw(0..4, 0..1);
    }

    /// Record the display quad
    pub fn draw_display(&self, pass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.display);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, self.display_quad.slice(..));
        pass.draw(0..4, 0..1);
    }

    /// Record the icon quad
    pub fn draw_icon(&self, pass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.icon);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..4, 0..1);
    }
}
