// Debug overlay - egui drawn through the presenter's extra-draw hook
//
// This module provides:
// - A status line in the bottom border (frame time, viewport, canvas)
// - A debug window with flash/audio/pattern controls
// - Snapshot thumbnails backed by registry textures
//
// egui runs before the frame is drawn; its meshes are uploaded in
// `ExtraDraw::prepare` and painted in `ExtraDraw::draw`.

use std::time::Duration;

use winit::event::WindowEvent;
use winit::window::Window;

use crate::display::{Dimension, Viewport};
use crate::gpu::{ExtraDraw, FrameContext, TextureHandle};

/// Number of snapshot slots shown in the debug window
pub const SNAPSHOT_SLOTS: usize = 4;

/// Width of a thumbnail in the debug window, in points
const THUMBNAIL_WIDTH: f32 = 128.0;

/// Requests raised by the debug window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugAction {
    FlashSuccess,
    FlashError,
    ToggleAudio,
    NextPattern,
    Screenshot,
    Snapshot,
}

/// Values shown in the status line
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusInfo {
    pub frame_time: Duration,
    pub frame_count: u64,
    pub canvas: Dimension,
    pub viewport: Option<Viewport>,
    pub audio_suspended: bool,
}

/// Format the status line
pub fn status_line(info: &StatusInfo) -> String {
    let viewport = match info.viewport {
        Some(vp) => format!(
            "{:.0}x{:.0} @ {:.0},{:.0}",
            vp.width, vp.height, vp.x, vp.y
        ),
        None => "-".to_string(),
    };
    format!(
        "frame {} | {:.2} ms | canvas {} | view {}{}",
        info.frame_count,
        info.frame_time.as_secs_f64() * 1000.0,
        info.canvas,
        viewport,
        if info.audio_suspended { " | muted" } else { "" }
    )
}

/// A registry texture shown through egui
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thumbnail {
    pub handle: TextureHandle,
    pub texture_id: egui::TextureId,
    pub size: Dimension,
}

/// Round-robin snapshot slots
#[derive(Debug, Default)]
pub struct ThumbnailStrip {
    slots: [Option<Thumbnail>; SNAPSHOT_SLOTS],
    next: usize,
}

impl ThumbnailStrip {
    /// Store a thumbnail in the next slot
    ///
    /// # Returns
    /// The thumbnail it replaced, which the caller must release
    pub fn insert(&mut self, thumbnail: Thumbnail) -> Option<Thumbnail> {
        let evicted = self.slots[self.next].replace(thumbnail);
        self.next = (self.next + 1) % SNAPSHOT_SLOTS;
        evicted
    }

    pub fn slots(&self) -> &[Option<Thumbnail>] {
        &self.slots
    }

    /// Remove every thumbnail
    pub fn drain(&mut self) -> Vec<Thumbnail> {
        self.next = 0;
        self.slots.iter_mut().filter_map(Option::take).collect()
    }
}

struct PendingPaint {
    primitives: Vec<egui::ClippedPrimitive>,
    screen: egui_wgpu::ScreenDescriptor,
}

/// Texture changes egui asked for that the renderer has not seen yet
///
/// Uploads survive skipped frames: they are only handed out when a frame is
/// actually prepared, and frees wait until every queued upload went out.
#[derive(Debug)]
pub struct TextureQueue<D> {
    set: Vec<(egui::TextureId, D)>,
    free: Vec<egui::TextureId>,
}

impl<D> Default for TextureQueue<D> {
    fn default() -> Self {
        Self {
            set: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<D> TextureQueue<D> {
    /// Queue one frame's texture changes, after earlier ones
    pub fn push(&mut self, set: Vec<(egui::TextureId, D)>, free: Vec<egui::TextureId>) {
        self.set.extend(set);
        self.free.extend(free);
    }

    /// Uploads to apply before painting, in the order egui produced them
    pub fn take_uploads(&mut self) -> Vec<(egui::TextureId, D)> {
        std::mem::take(&mut self.set)
    }

    /// Textures safe to free after the frame was submitted
    ///
    /// Empty while uploads are still queued.
    pub fn take_frees(&mut self) -> Vec<egui::TextureId> {
        if self.set.is_empty() {
            std::mem::take(&mut self.free)
        } else {
            Vec::new()
        }
    }

    pub fn pending_uploads(&self) -> usize {
        self.set.len()
    }
}

/// egui state and renderer
pub struct DebugOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    visible: bool,
    thumbnails: ThumbnailStrip,
    placeholder: Option<egui::TextureId>,
    pending: Option<PendingPaint>,
    textures: TextureQueue<egui::epaint::ImageDelta>,
}

impl DebugOverlay {
    /// Create the overlay for a window
    ///
    /// # Arguments
    /// * `window` - Window receiving input
    /// * `device` - Device the presenter draws with
    /// * `surface_format` - Format of the display pass target
    pub fn new(window: &Window, device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let max_texture_side = device.limits().max_texture_dimension_2d as usize;
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(max_texture_side),
        );
        let renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            ctx,
            state,
            renderer,
            visible: false,
            thumbnails: ThumbnailStrip::default(),
            placeholder: None,
            pending: None,
            textures: TextureQueue::default(),
        }
    }

    /// Feed a window event to egui
    ///
    /// # Returns
    /// `true` if egui consumed the event
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed && self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Show a registry texture in the empty snapshot slots
    pub fn set_placeholder(&mut self, device: &wgpu::Device, view: &wgpu::TextureView) {
        let id = self
            .renderer
            .register_native_texture(device, view, wgpu::FilterMode::Linear);
        if let Some(old) = self.placeholder.replace(id) {
            self.renderer.free_texture(&old);
        }
    }

    /// Add a snapshot thumbnail
    ///
    /// # Returns
    /// Registry handle of an evicted thumbnail, to be destroyed by the caller
    pub fn add_thumbnail(
        &mut self,
        device: &wgpu::Device,
        handle: TextureHandle,
        view: &wgpu::TextureView,
        size: Dimension,
    ) -> Option<TextureHandle> {
        let texture_id = self
            .renderer
            .register_native_texture(device, view, wgpu::FilterMode::Linear);
        let evicted = self.thumbnails.insert(Thumbnail {
            handle,
            texture_id,
            size,
        })?;
        self.renderer.free_texture(&evicted.texture_id);
        Some(evicted.handle)
    }

    /// Drop every thumbnail, returning their registry handles
    pub fn clear_thumbnails(&mut self) -> Vec<TextureHandle> {
        let drained = self.thumbnails.drain();
        for thumbnail in &drained {
            self.renderer.free_texture(&thumbnail.texture_id);
        }
        drained.into_iter().map(|t| t.handle).collect()
    }

    /// Run one egui frame
    ///
    /// # Returns
    /// Actions requested through the debug window
    pub fn run(&mut self, window: &Window, status: &StatusInfo) -> Vec<DebugAction> {
        let raw_input = self.state.take_egui_input(window);
        let mut actions = Vec::new();
        let visible = self.visible;
        let thumbnails = &self.thumbnails;
        let placeholder = self.placeholder;

        let output = self.ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("status_line"))
                .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(8.0, -8.0))
                .interactable(false)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(status_line(status))
                            .monospace()
                            .color(egui::Color32::LIGHT_GRAY),
                    );
                });

            if visible {
                show_debug_window(ctx, thumbnails, placeholder, &mut actions);
            }
        });

        self.state
            .handle_platform_output(window, output.platform_output);
        let primitives = self.ctx.tessellate(output.shapes, output.pixels_per_point);
        let size = window.inner_size();
        self.textures
            .push(output.textures_delta.set, output.textures_delta.free);
        self.pending = Some(PendingPaint {
            primitives,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: output.pixels_per_point,
            },
        });
        actions
    }

    /// Free textures egui no longer needs, after the frame was submitted
    ///
    /// Uploads of a frame that was never prepared stay queued for the next.
    pub fn end_frame(&mut self) {
        self.pending = None;
        for id in self.textures.take_frees() {
            self.renderer.free_texture(&id);
        }
    }
}

fn show_debug_window(
    ctx: &egui::Context,
    thumbnails: &ThumbnailStrip,
    placeholder: Option<egui::TextureId>,
    actions: &mut Vec<DebugAction>,
) {
    egui::Window::new("Presenter")
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Feedback").strong());
            ui.horizontal(|ui| {
                if ui.button("Success").on_hover_text("F2").clicked() {
                    actions.push(DebugAction::FlashSuccess);
                }
                if ui.button("Error").on_hover_text("F3").clicked() {
                    actions.push(DebugAction::FlashError);
                }
                if ui.button("Mute").on_hover_text("M").clicked() {
                    actions.push(DebugAction::ToggleAudio);
                }
                if ui.button("Pattern").on_hover_text("P").clicked() {
                    actions.push(DebugAction::NextPattern);
                }
            });

            ui.separator();
            ui.label(egui::RichText::new("Snapshots").strong());
            ui.horizontal(|ui| {
                if ui.button("Save screenshot").on_hover_text("F9").clicked() {
                    actions.push(DebugAction::Screenshot);
                }
                if ui.button("Take snapshot").on_hover_text("F10").clicked() {
                    actions.push(DebugAction::Snapshot);
                }
            });

            egui::Grid::new("snapshot_slots").show(ui, |ui| {
                for (i, slot) in thumbnails.slots().iter().enumerate() {
                    let texture = match slot {
                        Some(thumb) => {
                            let aspect = thumb.size.height as f32 / thumb.size.width.max(1) as f32;
                            Some((thumb.texture_id, THUMBNAIL_WIDTH * aspect))
                        }
                        None => placeholder.map(|id| (id, THUMBNAIL_WIDTH * 0.75)),
                    };
                    if let Some((id, height)) = texture {
                        ui.image(egui::load::SizedTexture::new(
                            id,
                            egui::vec2(THUMBNAIL_WIDTH, height),
                        ));
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
        });
}

impl ExtraDraw for DebugOverlay {
    fn prepare(
        &mut self,
        frame: &FrameContext<'_>,
        encoder: &mut wgpu::CommandEncoder,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, delta) in self.textures.take_uploads() {
            self.renderer
                .update_texture(frame.device, frame.queue, id, &delta);
        }
        let Some(pending) = &self.pending else {
            return Vec::new();
        };
        self.renderer.update_buffers(
            frame.device,
            frame.queue,
            encoder,
            &pending.primitives,
            &pending.screen,
        )
    }

    fn draw(&mut self, pass: &mut wgpu::RenderPass<'static>) {
        if let Some(pending) = &self.pending {
            self.renderer
                .render(pass, &pending.primitives, &pending.screen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb(id: u32) -> Thumbnail {
        Thumbnail {
            handle: test_handle(id),
            texture_id: egui::TextureId::User(id as u64),
            size: Dimension::new(256, 240),
        }
    }

    fn test_handle(id: u32) -> TextureHandle {
        TextureHandle::from_id(id)
    }

    #[test]
    fn test_strip_evicts_round_robin() {
        let mut strip = ThumbnailStrip::default();
        for id in 1..=SNAPSHOT_SLOTS as u32 {
            assert!(strip.insert(thumb(id)).is_none());
        }
        let evicted = strip.insert(thumb(10)).unwrap();
        assert_eq!(evicted.handle, test_handle(1));
        let evicted = strip.insert(thumb(11)).unwrap();
        assert_eq!(evicted.handle, test_handle(2));
    }

    #[test]
    fn test_strip_drain() {
        let mut strip = ThumbnailStrip::default();
        strip.insert(thumb(1));
        strip.insert(thumb(2));
        assert_eq!(strip.drain().len(), 2);
        assert!(strip.slots().iter().all(Option::is_none));
        assert!(strip.insert(thumb(3)).is_none());
    }

    #[test]
    fn test_uploads_survive_skipped_frame() {
        let font = egui::TextureId::Managed(0);
        let thumb = egui::TextureId::Managed(1);
        let mut queue = TextureQueue::default();

        // First frame is skipped: nothing prepared, then end of frame
        queue.push(vec![(font, "font atlas")], vec![]);
        assert!(queue.take_frees().is_empty());
        assert_eq!(queue.pending_uploads(), 1);

        // Next frame paints and receives both frames' uploads in order
        queue.push(vec![(thumb, "thumbnail")], vec![]);
        assert_eq!(
            queue.take_uploads(),
            vec![(font, "font atlas"), (thumb, "thumbnail")]
        );
        assert_eq!(queue.pending_uploads(), 0);
    }

    #[test]
    fn test_frees_wait_for_queued_uploads() {
        let old = egui::TextureId::Managed(3);
        let new = egui::TextureId::Managed(4);
        let mut queue = TextureQueue::default();

        queue.push(vec![(new, 1u8)], vec![old]);
        assert!(queue.take_frees().is_empty());

        assert_eq!(queue.take_uploads().len(), 1);
        assert_eq!(queue.take_frees(), vec![old]);
        assert!(queue.take_frees().is_empty());
    }

    #[test]
    fn test_status_line() {
        let info = StatusInfo {
            frame_time: Duration::from_micros(16_700),
            frame_count: 42,
            canvas: Dimension::new(400, 584),
            viewport: Some(Viewport {
                x: 8.0,
                y: 8.0,
                width: 384.0,
                height: 544.0,
            }),
            audio_suspended: true,
        };
        assert_eq!(
            status_line(&info),
            "frame 42 | 16.70 ms | canvas 400x584 | view 384x544 @ 8,8 | muted"
        );
    }

    #[test]
    fn test_status_line_without_viewport() {
        let line = status_line(&StatusInfo::default());
        assert!(line.contains("view -"));
        assert!(!line.contains("muted"));
    }
}
