// Vertices - Unit quads for the offscreen and display passes
//
// Both passes draw a 4-vertex triangle strip covering the unit square. The
// display quad's texture coordinates depend on two things that are fixed for
// the lifetime of a presenter: whether the picture is shown rotated
// (portrait) and whether the graphics back-end puts the image origin at the
// top-left or bottom-left corner. The four combinations are precomputed.

use bytemuck::{Pod, Zeroable};

/// Position and texture coordinate of one quad corner
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

const fn v(x: f32, y: f32, u: f32, w: f32) -> QuadVertex {
    QuadVertex {
        pos: [x, y],
        uv: [u, w],
    }
}

/// Display orientation of the emulated picture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Landscape,
    /// Rotated by 90 degrees
    Portrait,
}

impl Orientation {
    /// Orientation from a `portrait` configuration flag
    pub fn from_portrait(portrait: bool) -> Self {
        if portrait {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// Where a back-end places texel (0, 0) of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    TopLeft,
    BottomLeft,
}

/// Quad used by the offscreen upscale pass
pub const OFFSCREEN_QUAD: [QuadVertex; 4] = [
    v(0.0, 0.0, 0.0, 0.0),
    v(1.0, 0.0, 1.0, 0.0),
    v(0.0, 1.0, 0.0, 1.0),
    v(1.0, 1.0, 1.0, 1.0),
];

const QUAD_ROTATED: [QuadVertex; 4] = [
    v(0.0, 0.0, 1.0, 0.0),
    v(1.0, 0.0, 1.0, 1.0),
    v(0.0, 1.0, 0.0, 0.0),
    v(1.0, 1.0, 0.0, 1.0),
];

const QUAD_FLIPPED: [QuadVertex; 4] = [
    v(0.0, 0.0, 0.0, 1.0),
    v(1.0, 0.0, 1.0, 1.0),
    v(0.0, 1.0, 0.0, 0.0),
    v(1.0, 1.0, 1.0, 0.0),
];

const QUAD_FLIPPED_ROTATED: [QuadVertex; 4] = [
    v(0.0, 0.0, 1.0, 1.0),
    v(1.0, 0.0, 1.0, 0.0),
    v(0.0, 1.0, 0.0, 1.0),
    v(1.0, 1.0, 0.0, 0.0),
];

/// Select the display-pass quad
///
/// Looked up once at initialization; orientation and back-end never change
/// at runtime.
pub fn display_quad(orientation: Orientation, origin: ImageOrigin) -> &'static [QuadVertex; 4] {
    match (orientation, origin) {
        (Orientation::Landscape, ImageOrigin::TopLeft) => &OFFSCREEN_QUAD,
        (Orientation::Portrait, ImageOrigin::TopLeft) => &QUAD_ROTATED,
        (Orientation::Landscape, ImageOrigin::BottomLeft) => &QUAD_FLIPPED,
        (Orientation::Portrait, ImageOrigin::BottomLeft) => &QUAD_FLIPPED_ROTATED,
    }
}
