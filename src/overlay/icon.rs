// Mute icon - Blinking speaker-off indicator
//
// The icon is stored as a 1-bit-per-pixel bitmap, least significant bit
// first, each row starting on a fresh byte. It is decoded once into RGBA:
// set bits become opaque white, clear bits transparent white. While audio
// output is suspended the icon is drawn near the top-right corner of the
// canvas and blinks with a 64-frame period.

use crate::display::Dimension;

/// Distance of the icon from the top and right canvas edges, in pixels
pub const ICON_INSET: f32 = 10.0;

/// Frame-counter bit that selects the blink phase (32 frames on, 32 off)
pub const BLINK_MASK: u64 = 0x20;

/// A packed 1-bit bitmap
#[derive(Debug, Clone, Copy)]
pub struct PackedIcon {
    pub width: u32,
    pub height: u32,
    /// Bytes per row
    pub stride: usize,
    pub bits: &'static [u8],
}

const SPEAKER_OFF_BITS: [u8; 350] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xC0, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xE0, 0x03, 0x40, 0x00, 0x00, 0x00, 0x00,
    0xF0, 0x07, 0x60, 0x00, 0x80, 0x03, 0x00,
    0xE0, 0x0F, 0x70, 0x00, 0xC0, 0x07, 0x00,
    0xC0, 0x1F, 0x78, 0x00, 0xE0, 0x07, 0x00,
    0x80, 0x3F, 0x78, 0x00, 0xE0, 0x0F, 0x00,
    0x00, 0x7F, 0x78, 0x00, 0xC0, 0x1F, 0x00,
    0x00, 0xFE, 0x70, 0x00, 0x80, 0x1F, 0x00,
    0x00, 0xFC, 0x61, 0x00, 0x8E, 0x3F, 0x00,
    0x00, 0xF8, 0x43, 0x00, 0x1F, 0x3F, 0x00,
    0x00, 0xF0, 0x07, 0x80, 0x1F, 0x7E, 0x00,
    0x00, 0xF0, 0x0F, 0x80, 0x3F, 0x7E, 0x00,
    0x00, 0xF8, 0x1F, 0x00, 0x3F, 0x7C, 0x00,
    0xF0, 0xFF, 0x3F, 0x00, 0x7E, 0xFC, 0x00,
    0xF8, 0xFF, 0x7F, 0x00, 0x7E, 0xFC, 0x00,
    0xFC, 0x7F, 0xFE, 0x00, 0xFC, 0xF8, 0x00,
    0xFC, 0x3F, 0xFC, 0x01, 0xFC, 0xF8, 0x00,
    0xFC, 0x1F, 0xFC, 0x03, 0xF8, 0xF8, 0x00,
    0x7C, 0x00, 0xFC, 0x07, 0xF8, 0xF8, 0x00,
    0x7C, 0x00, 0xFC, 0x0F, 0xF8, 0xF8, 0x00,
    0x7C, 0x00, 0xFC, 0x1F, 0xF8, 0xF8, 0x00,
    0x7C, 0x00, 0xFC, 0x3F, 0xF8, 0xF8, 0x00,
    0xFC, 0x1F, 0x7C, 0x7F, 0xF8, 0xF8, 0x00,
    0xFC, 0x3F, 0x7C, 0xFE, 0xF0, 0xF8, 0x00,
    0xFC, 0x7F, 0x7C, 0xFC, 0xE1, 0xF8, 0x00,
    0xF8, 0xFF, 0x7C, 0xF8, 0x03, 0xFC, 0x00,
    0xE0, 0xFF, 0x7D, 0xF0, 0x07, 0xFC, 0x00,
    0x00, 0xF8, 0x7F, 0xE0, 0x0F, 0x7C, 0x00,
    0x00, 0xF0, 0x7F, 0xC0, 0x1F, 0x7C, 0x00,
    0x00, 0xE0, 0x7F, 0x80, 0x3F, 0x7C, 0x00,
    0x00, 0xC0, 0x7F, 0x00, 0x7F, 0x38, 0x00,
    0x00, 0x80, 0x7F, 0x00, 0xFE, 0x30, 0x00,
    0x00, 0x00, 0x7F, 0x00, 0xFC, 0x01, 0x00,
    0x00, 0x00, 0x7E, 0x00, 0xF8, 0x03, 0x00,
    0x00, 0x00, 0x7C, 0x00, 0xF0, 0x07, 0x00,
    0x00, 0x00, 0x78, 0x00, 0xE0, 0x0F, 0x00,
    0x00, 0x00, 0x70, 0x00, 0xC0, 0x1F, 0x00,
    0x00, 0x00, 0x60, 0x00, 0x80, 0x3F, 0x00,
    0x00, 0x00, 0x40, 0x00, 0x00, 0x1F, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0E, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Speaker with a cross, 50x50
pub const SPEAKER_OFF: PackedIcon = PackedIcon {
    width: 50,
    height: 50,
    stride: 7,
    bits: &SPEAKER_OFF_BITS,
};

const OPAQUE_WHITE: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const TRANSPARENT_WHITE: [u8; 4] = [0xFF, 0xFF, 0xFF, 0x00];

/// Decoded RGBA icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBitmap {
    size: Dimension,
    rgba: Vec<u8>,
}

impl IconBitmap {
    /// Icon size in pixels
    pub fn size(&self) -> Dimension {
        self.size
    }

    /// Tightly packed RGBA pixels
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// RGBA value of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.size.width as usize + x as usize) * 4;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
            self.rgba[offset + 3],
        ]
    }
}

/// Unpack a 1-bit icon into RGBA
///
/// # Panics
/// Panics if the bit data does not hold exactly `stride * height` bytes or a
/// row is too short for the icon width.
pub fn decode_icon(icon: &PackedIcon) -> IconBitmap {
    assert_eq!(
        icon.bits.len(),
        icon.stride * icon.height as usize,
        "packed icon data does not match its stride"
    );
    assert!(
        icon.stride * 8 >= icon.width as usize,
        "packed icon stride too small for its width"
    );

    let size = Dimension::new(icon.width, icon.height);
    let mut rgba = Vec::with_capacity(size.area() * 4);

    for row in icon.bits.chunks_exact(icon.stride) {
        let mut bits = 0u8;
        for x in 0..icon.width as usize {
            if x & 7 == 0 {
                bits = row[x / 8];
            }
            let color = if bits & 1 != 0 {
                OPAQUE_WHITE
            } else {
                TRANSPARENT_WHITE
            };
            rgba.extend_from_slice(&color);
            bits >>= 1;
        }
    }

    IconBitmap { size, rgba }
}

/// Icon alpha for a given frame count: opaque when bit 5 is clear
#[inline]
pub fn blink_alpha(frame_count: u64) -> f32 {
    if frame_count & BLINK_MASK == 0 {
        1.0
    } else {
        0.0
    }
}

/// Where and how visibly the icon is drawn this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconPlacement {
    /// Left edge, canvas pixels
    pub x0: f32,
    /// Top edge, canvas pixels
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub alpha: f32,
}

impl IconPlacement {
    /// Corners in normalized device coordinates (y up): [left, top, right, bottom]
    pub fn to_ndc(&self, canvas: Dimension) -> [f32; 4] {
        let w = canvas.width.max(1) as f32;
        let h = canvas.height.max(1) as f32;
        [
            self.x0 / w * 2.0 - 1.0,
            1.0 - self.y0 / h * 2.0,
            self.x1 / w * 2.0 - 1.0,
            1.0 - self.y1 / h * 2.0,
        ]
    }
}

/// The mute indicator overlay
///
/// Holds the decoded bitmap; the blink phase comes from the caller's frame
/// counter and is not stored.
#[derive(Debug, Clone)]
pub struct MuteIndicator {
    bitmap: IconBitmap,
}

impl MuteIndicator {
    /// Decode the built-in speaker-off icon
    pub fn new() -> Self {
        Self {
            bitmap: decode_icon(&SPEAKER_OFF),
        }
    }

    /// The decoded icon
    pub fn bitmap(&self) -> &IconBitmap {
        &self.bitmap
    }

    /// Placement for this frame, or `None` if the icon is not shown
    ///
    /// # Arguments
    /// * `canvas` - Size of the visible surface
    /// * `audio_suspended` - Whether audio output is currently suspended
    /// * `frame_count` - Monotonic frame counter driving the blink
    pub fn placement(
        &self,
        canvas: Dimension,
        audio_suspended: bool,
        frame_count: u64,
    ) -> Option<IconPlacement> {
        if !audio_suspended {
            return None;
        }
        let size = self.bitmap.size();
        let x0 = canvas.width as f32 - size.width as f32 - ICON_INSET;
        let y0 = ICON_INSET;
        Some(IconPlacement {
            x0,
            y0,
            x1: x0 + size.width as f32,
            y1: y0 + size.height as f32,
            alpha: blink_alpha(frame_count),
        })
    }
}

impl Default for MuteIndicator {
    fn default() -> Self {
        Self::new()
    }
}
