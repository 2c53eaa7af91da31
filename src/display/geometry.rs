// Geometry - Sizes and rectangles shared by the presentation pipeline
//
// Everything here is plain data: framebuffer and canvas sizes, the visible
// view rectangle, border insets reserved for status text, and the pixel
// aspect ratio of the emulated display.

use serde::{Deserialize, Serialize};

/// Width and height in pixels
///
/// Describes a framebuffer, a canvas or an icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    /// Create a new dimension
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this dimension
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True if either side is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns this dimension scaled by an integer factor on both axes
    pub fn scaled(&self, factor: u32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// True if `other` fits inside this dimension on both axes
    pub fn contains(&self, other: Dimension) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A sub-region of a framebuffer
///
/// Used for the "visible view" the emulator wants displayed, which may be
/// smaller than the full backing buffer to hide border artifacts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering the whole dimension
    pub const fn from_dimension(dim: Dimension) -> Self {
        Self::new(0, 0, dim.width, dim.height)
    }

    /// Size of the rectangle
    #[inline]
    pub fn size(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }

    /// True if the rectangle lies completely inside a buffer of size `dim`
    pub fn fits_within(&self, dim: Dimension) -> bool {
        self.x as u64 + self.width as u64 <= dim.width as u64
            && self.y as u64 + self.height as u64 <= dim.height as u64
    }
}

/// Pixels reserved around the emulated picture for status text
///
/// Fixed at initialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderInsets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl BorderInsets {
    /// Create new border insets
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Sum of left and right insets
    #[inline]
    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Sum of top and bottom insets
    #[inline]
    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

/// Ratio describing non-square emulated pixels (e.g. 1:2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelAspect {
    pub width: u32,
    pub height: u32,
}

impl PixelAspect {
    /// Square pixels
    pub const SQUARE: PixelAspect = PixelAspect::new(1, 1);

    /// Create a new pixel aspect ratio
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Replace zero components with 1
    ///
    /// An unset component in the configuration means "no stretch" on that axis.
    pub fn normalized(self) -> Self {
        Self {
            width: if self.width == 0 { 1 } else { self.width },
            height: if self.height == 0 { 1 } else { self.height },
        }
    }
}

impl Default for PixelAspect {
    fn default() -> Self {
        Self::SQUARE
    }
}

/// Per-frame display record handed over by the emulator core
///
/// `view` selects the part of the `framebuffer` that is actually displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    pub framebuffer: Dimension,
    pub view: Rect,
}

impl DisplayInfo {
    /// Display info showing a whole framebuffer
    pub fn full(framebuffer: Dimension) -> Self {
        Self {
            framebuffer,
            view: Rect::from_dimension(framebuffer),
        }
    }

    /// Checks the contract every drawn frame must satisfy
    ///
    /// # Panics
    /// Panics if either size is zero or the view leaves the framebuffer.
    pub fn assert_valid(&self) {
        assert!(
            !self.framebuffer.is_empty(),
            "framebuffer dimension {} must be non-zero",
            self.framebuffer
        );
        assert!(
            !self.view.size().is_empty(),
            "view rectangle {:?} must be non-empty",
            self.view
        );
        assert!(
            self.view.fits_within(self.framebuffer),
            "view rectangle {:?} exceeds framebuffer {}",
            self.view,
            self.framebuffer
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_area_and_scale() {
        let dim = Dimension::new(384, 272);
        assert_eq!(dim.area(), 384 * 272);
        assert_eq!(dim.scaled(2), Dimension::new(768, 544));
        assert!(!dim.is_empty());
        assert!(Dimension::new(0, 10).is_empty());
    }

    #[test]
    fn test_dimension_contains() {
        let max = Dimension::new(1024, 1024);
        assert!(max.contains(Dimension::new(1024, 512)));
        assert!(!max.contains(Dimension::new(1025, 1)));
    }

    #[test]
    fn test_rect_fits_within() {
        let fb = Dimension::new(400, 300);
        assert!(Rect::new(8, 8, 384, 284).fits_within(fb));
        assert!(!Rect::new(20, 0, 384, 300).fits_within(fb));
        assert!(Rect::from_dimension(fb).fits_within(fb));
    }

    #[test]
    fn test_pixel_aspect_normalized() {
        assert_eq!(PixelAspect::new(0, 2).normalized(), PixelAspect::new(1, 2));
        assert_eq!(PixelAspect::new(3, 0).normalized(), PixelAspect::new(3, 1));
        assert_eq!(PixelAspect::new(1, 2).normalized(), PixelAspect::new(1, 2));
    }

    #[test]
    fn test_border_sums() {
        let border = BorderInsets::new(8, 8, 8, 32);
        assert_eq!(border.horizontal(), 16);
        assert_eq!(border.vertical(), 40);
    }

    #[test]
    #[should_panic]
    fn test_display_info_rejects_view_outside_framebuffer() {
        let info = DisplayInfo {
            framebuffer: Dimension::new(100, 100),
            view: Rect::new(50, 0, 100, 100),
        };
        info.assert_valid();
    }

    #[test]
    #[should_panic]
    fn test_display_info_rejects_empty_framebuffer() {
        DisplayInfo::full(Dimension::new(0, 240)).assert_valid();
    }
}
