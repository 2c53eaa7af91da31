// Pixel Buffer - Host-memory staging area for the current frame
//
// The emulator writes one frame of raw pixels here, row by row with a stride
// of the framebuffer width, and the presenter uploads the used prefix to the
// GPU texture. The store is allocated once for the largest framebuffer the
// front-end accepts, always with room for 4 bytes per pixel.

use super::geometry::Dimension;

/// Storage format of framebuffer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// One byte per pixel, resolved through the palette
    Indexed8,
    /// Four bytes per pixel, R G B A
    Rgba8,
}

impl PixelFormat {
    /// Bytes used by one pixel
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Indexed8 => 1,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Byte count of a tightly packed frame of the given size
    #[inline]
    pub fn frame_len(self, dim: Dimension) -> usize {
        dim.area() * self.bytes_per_pixel()
    }
}

/// Pixel buffer store
///
/// Owned by the presentation layer; the emulator only writes into it.
pub struct PixelBuffer {
    bytes: Vec<u8>,
    capacity: Dimension,
}

impl PixelBuffer {
    /// Allocate a zeroed store able to hold `capacity` pixels in any format
    pub fn new(capacity: Dimension) -> Self {
        Self {
            bytes: vec![0; capacity.area() * 4],
            capacity,
        }
    }

    /// Largest framebuffer the store can hold
    pub fn capacity(&self) -> Dimension {
        self.capacity
    }

    /// Total size of the store in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the store has no room at all
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if a framebuffer of size `dim` fits
    pub fn fits(&self, dim: Dimension) -> bool {
        self.capacity.contains(dim)
    }

    /// Whole store, for the emulator to write into
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Whole store
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// The bytes of one frame of size `dim`
    ///
    /// Returns `None` if the frame does not fit the store.
    pub fn frame(&self, dim: Dimension, format: PixelFormat) -> Option<&[u8]> {
        if !self.fits(dim) {
            return None;
        }
        Some(&self.bytes[..format.frame_len(dim)])
    }

    /// Mutable bytes of one frame of size `dim`
    pub fn frame_mut(&mut self, dim: Dimension, format: PixelFormat) -> Option<&mut [u8]> {
        if !self.fits(dim) {
            return None;
        }
        Some(&mut self.bytes[..format.frame_len(dim)])
    }

    /// Fill the whole store with one byte value
    pub fn clear(&mut self, value: u8) {
        self.bytes.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_buffer_creation() {
        let buffer = PixelBuffer::new(Dimension::new(1024, 1024));
        assert_eq!(buffer.len(), 1024 * 1024 * 4);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_frame_lengths_follow_format() {
        let buffer = PixelBuffer::new(Dimension::new(512, 512));
        let dim = Dimension::new(384, 272);
        assert_eq!(buffer.frame(dim, PixelFormat::Indexed8).unwrap().len(), 384 * 272);
        assert_eq!(buffer.frame(dim, PixelFormat::Rgba8).unwrap().len(), 384 * 272 * 4);
    }

    #[test]
    fn test_frame_too_large() {
        let mut buffer = PixelBuffer::new(Dimension::new(256, 240));
        assert!(buffer.frame(Dimension::new(257, 240), PixelFormat::Indexed8).is_none());
        assert!(buffer
            .frame_mut(Dimension::new(256, 241), PixelFormat::Rgba8)
            .is_none());
    }

    #[test]
    fn test_writes_are_visible_in_frame() {
        let mut buffer = PixelBuffer::new(Dimension::new(16, 16));
        let dim = Dimension::new(4, 2);
        let frame = buffer.frame_mut(dim, PixelFormat::Indexed8).unwrap();
        frame.copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(
            buffer.frame(dim, PixelFormat::Indexed8).unwrap(),
            &[1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn test_clear() {
        let mut buffer = PixelBuffer::new(Dimension::new(8, 8));
        buffer.clear(0x0F);
        assert!(buffer.as_slice().iter().all(|&b| b == 0x0F));
    }
}
