// Test machine - Stand-in for an emulator core
//
// Produces an animated test pattern into the presenter's pixel buffer, in
// either color mode, with a backing framebuffer wider than the visible view.
// The area outside the view is filled with a stripe pattern that must never
// show on screen.

use crate::display::{Dimension, DisplayInfo, PixelFormat, Rect};
use crate::gpu::FrameStatus;

/// Visible screen size
pub const SCREEN: Dimension = Dimension::new(256, 240);

/// Backing framebuffer, with an 8 pixel margin around the screen
pub const FRAMEBUFFER: Dimension = Dimension::new(272, 256);

/// Visible view inside the framebuffer
pub const VIEW: Rect = Rect::new(8, 8, SCREEN.width, SCREEN.height);

/// Index or gray level used for the hidden margin
const MARGIN_STRIPE: [u8; 2] = [0x16, 0x2A];

/// Picture drawn into the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// 16x16 blocks cycling through the palette
    Blocks,
    /// Horizontal ramp over the palette
    Gradient,
}

impl Pattern {
    fn next(self) -> Self {
        match self {
            Pattern::Blocks => Pattern::Gradient,
            Pattern::Gradient => Pattern::Blocks,
        }
    }

    /// Palette index at view coordinate (x, y)
    fn index(self, x: u32, y: u32, palette_len: u32) -> u8 {
        let value = match self {
            Pattern::Blocks => (x / 16) + (y / 16) * 16,
            Pattern::Gradient => x * palette_len / SCREEN.width,
        };
        (value % palette_len.max(1)) as u8
    }
}

/// Test pattern generator
pub struct TestMachine {
    format: PixelFormat,
    palette_len: u32,
    pattern: Pattern,
    frame_count: u64,
    audio_suspended: bool,
}

impl TestMachine {
    /// Create a machine writing `format` pixels
    ///
    /// `palette_len` bounds the generated indices in paletted mode.
    pub fn new(format: PixelFormat, palette_len: usize) -> Self {
        Self {
            format,
            palette_len: palette_len.clamp(1, 256) as u32,
            pattern: Pattern::Blocks,
            frame_count: 0,
            audio_suspended: false,
        }
    }

    /// Display record for the frames this machine produces
    pub fn display_info(&self) -> DisplayInfo {
        DisplayInfo {
            framebuffer: FRAMEBUFFER,
            view: VIEW,
        }
    }

    /// Render the next frame into `out`
    ///
    /// # Panics
    /// Panics if `out` is smaller than one framebuffer.
    pub fn run_frame(&mut self, out: &mut [u8]) -> DisplayInfo {
        let bpp = self.format.bytes_per_pixel();
        let len = self.format.frame_len(FRAMEBUFFER);
        assert!(out.len() >= len, "pixel buffer too small for test frame");

        let scroll = (self.frame_count / 2) as u32;
        for (i, pixel) in out[..len].chunks_exact_mut(bpp).enumerate() {
            let x = i as u32 % FRAMEBUFFER.width;
            let y = i as u32 / FRAMEBUFFER.width;
            let inside = x >= VIEW.x
                && x < VIEW.x + VIEW.width
                && y >= VIEW.y
                && y < VIEW.y + VIEW.height;
            let index = if inside {
                let vx = (x - VIEW.x + scroll) % SCREEN.width;
                self.pattern.index(vx, y - VIEW.y, self.palette_len)
            } else {
                MARGIN_STRIPE[((x + y) / 4 % 2) as usize]
            };
            self.write_pixel(pixel, index, inside);
        }

        self.frame_count += 1;
        self.display_info()
    }

    fn write_pixel(&self, pixel: &mut [u8], index: u8, inside: bool) {
        match self.format {
            PixelFormat::Indexed8 => pixel[0] = index,
            PixelFormat::Rgba8 if inside => {
                let level = (index as u32 * 255 / (self.palette_len - 1).max(1)) as u8;
                pixel.copy_from_slice(&[level, 255 - level, index.wrapping_mul(37), 0xFF]);
            }
            PixelFormat::Rgba8 => pixel.copy_from_slice(&[0xFF, 0x00, 0xFF, 0xFF]),
        }
    }

    /// Switch to the other pattern
    pub fn next_pattern(&mut self) {
        self.pattern = self.pattern.next();
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Pretend the audio device was suspended or resumed
    pub fn toggle_audio(&mut self) {
        self.audio_suspended = !self.audio_suspended;
        log::info!(
            "Audio {}",
            if self.audio_suspended {
                "suspended"
            } else {
                "resumed"
            }
        );
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Audio state for the presenter
    pub fn status(&self) -> FrameStatus {
        FrameStatus {
            audio_suspended: self.audio_suspended,
            frame_count: self.frame_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_fits_framebuffer() {
        let machine = TestMachine::new(PixelFormat::Indexed8, 64);
        machine.display_info().assert_valid();
    }

    #[test]
    fn test_paletted_frame_stays_in_palette() {
        let mut machine = TestMachine::new(PixelFormat::Indexed8, 64);
        let mut out = vec![0u8; FRAMEBUFFER.area()];
        machine.next_pattern();
        machine.run_frame(&mut out);
        for y in VIEW.y..VIEW.y + VIEW.height {
            for x in VIEW.x..VIEW.x + VIEW.width {
                assert!(out[(y * FRAMEBUFFER.width + x) as usize] < 64);
            }
        }
    }

    #[test]
    fn test_margin_is_marked() {
        let mut machine = TestMachine::new(PixelFormat::Rgba8, 64);
        let mut out = vec![0u8; FRAMEBUFFER.area() * 4];
        machine.run_frame(&mut out);
        assert_eq!(&out[..4], &[0xFF, 0x00, 0xFF, 0xFF]);
        let inside = ((VIEW.y * FRAMEBUFFER.width + VIEW.x) * 4) as usize;
        assert_ne!(&out[inside..inside + 4], &[0xFF, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_frame_counter_and_status() {
        let mut machine = TestMachine::new(PixelFormat::Indexed8, 64);
        let mut out = vec![0u8; FRAMEBUFFER.area()];
        machine.run_frame(&mut out);
        machine.run_frame(&mut out);
        machine.toggle_audio();
        let status = machine.status();
        assert_eq!(status.frame_count, 2);
        assert!(status.audio_suspended);
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn test_short_buffer_panics() {
        let mut machine = TestMachine::new(PixelFormat::Rgba8, 64);
        let mut out = vec![0u8; 16];
        machine.run_frame(&mut out);
    }
}
