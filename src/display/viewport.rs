// Viewport - Aspect-correct placement of the emulated picture on the canvas
//
// The usable canvas is the window minus the border insets. The picture keeps
// the emulated aspect ratio (view size times pixel aspect) and is either
// height-constrained (pillarboxed, centered horizontally) or width-constrained
// (letterboxed, placed flush at the top-left border corner).

use super::geometry::{BorderInsets, Dimension, PixelAspect, Rect};

/// Viewport rectangle in canvas pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Viewport covering the whole canvas
    pub fn full(canvas: Dimension) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: canvas.width as f32,
            height: canvas.height as f32,
        }
    }

    /// Aspect ratio (width / height)
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Clip the viewport to the canvas bounds
    ///
    /// GPU back-ends reject viewports that leave the render target. Returns
    /// `None` when nothing visible remains.
    pub fn clamp_to(&self, canvas: Dimension) -> Option<Viewport> {
        let max_w = canvas.width as f32;
        let max_h = canvas.height as f32;
        let x0 = self.x.clamp(0.0, max_w);
        let y0 = self.y.clamp(0.0, max_h);
        let x1 = (self.x + self.width).clamp(0.0, max_w);
        let y1 = (self.y + self.height).clamp(0.0, max_h);
        if x1 - x0 <= 0.0 || y1 - y0 <= 0.0 {
            return None;
        }
        Some(Viewport {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Usable canvas area after removing the border insets
///
/// Each side is clamped to at least 1.0 so the aspect ratio stays finite.
pub fn usable_area(canvas: Dimension, border: BorderInsets) -> (f32, f32) {
    let cw = canvas.width as i64 - border.left as i64 - border.right as i64;
    let ch = canvas.height as i64 - border.top as i64 - border.bottom as i64;
    ((cw as f32).max(1.0), (ch as f32).max(1.0))
}

/// Aspect ratio of the emulated picture including non-square pixels
pub fn emulated_aspect(view: Rect, pixel_aspect: PixelAspect) -> f32 {
    let aspect = pixel_aspect.normalized();
    (view.width as f32 * aspect.width as f32) / (view.height as f32 * aspect.height as f32)
}

/// Compute the display viewport for the emulated picture
///
/// # Arguments
/// * `canvas` - Size of the visible surface
/// * `border` - Insets reserved around the picture
/// * `view` - Visible part of the framebuffer
/// * `pixel_aspect` - Shape of one emulated pixel
///
/// # Returns
/// The viewport in canvas pixels. In the width-constrained case the picture
/// is not centered horizontally or vertically; it sits at the top-left
/// border corner.
pub fn compute_viewport(
    canvas: Dimension,
    border: BorderInsets,
    view: Rect,
    pixel_aspect: PixelAspect,
) -> Viewport {
    let (cw, ch) = usable_area(canvas, border);
    let canvas_aspect = cw / ch;
    let emu_aspect = emulated_aspect(view, pixel_aspect);

    if emu_aspect < canvas_aspect {
        let height = ch;
        let width = ch * emu_aspect;
        Viewport {
            x: border.left as f32 + (cw - width) / 2.0,
            y: border.top as f32,
            width,
            height,
        }
    } else {
        let width = cw;
        Viewport {
            x: border.left as f32,
            y: border.top as f32,
            width,
            height: cw / emu_aspect,
        }
    }
}
