// Snapshot - CPU-side conversion of a framebuffer view to RGBA
//
// Used for save-state thumbnails and PNG screenshots, where the GPU pipeline
// is not involved: the view rectangle is cropped out of the framebuffer and
// paletted pixels are resolved through the palette table.

use super::geometry::DisplayInfo;
use super::palette::PaletteTable;
use super::pixel_buffer::PixelFormat;
use crate::error::GfxError;

/// How framebuffer bytes map to colors
#[derive(Debug, Clone, Copy)]
pub enum ColorSource<'a> {
    /// Pixels are already RGBA
    Direct,
    /// Pixels are indices into the palette
    Paletted(&'a PaletteTable),
}

impl ColorSource<'_> {
    /// Pixel format implied by the color source
    pub fn format(&self) -> PixelFormat {
        match self {
            ColorSource::Direct => PixelFormat::Rgba8,
            ColorSource::Paletted(_) => PixelFormat::Indexed8,
        }
    }
}

/// Crop the view rectangle out of a framebuffer and resolve it to RGBA
///
/// # Arguments
/// * `pixels` - Framebuffer bytes, rows packed with the framebuffer width
/// * `info` - Framebuffer size and view rectangle
/// * `source` - Direct RGBA or paletted
///
/// # Returns
/// `view.width * view.height * 4` bytes of RGBA
///
/// # Errors
/// `GfxError::UploadSizeMismatch` if `pixels` is shorter than one frame.
pub fn resolve_view(
    pixels: &[u8],
    info: &DisplayInfo,
    source: ColorSource<'_>,
) -> Result<Vec<u8>, GfxError> {
    info.assert_valid();

    let format = source.format();
    let expected = format.frame_len(info.framebuffer);
    if pixels.len() < expected {
        return Err(GfxError::UploadSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let bpp = format.bytes_per_pixel();
    let fb_width = info.framebuffer.width as usize;
    let view = info.view;
    let mut rgba = Vec::with_capacity(view.size().area() * 4);

    for y in view.y as usize..(view.y + view.height) as usize {
        let row_start = (y * fb_width + view.x as usize) * bpp;
        let row = &pixels[row_start..row_start + view.width as usize * bpp];
        match source {
            ColorSource::Direct => rgba.extend_from_slice(row),
            ColorSource::Paletted(palette) => {
                for &index in row {
                    rgba.extend_from_slice(&palette.resolve(index));
                }
            }
        }
    }

    Ok(rgba)
}

/// Drop the alpha channel of tightly packed RGBA data
pub fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::geometry::{Dimension, Rect};

    #[test]
    fn test_resolve_paletted_view() {
        let palette = PaletteTable::from_rgb(&[0x000000, 0xFF0000, 0x00FF00, 0x0000FF]).unwrap();
        // 4x2 framebuffer, view is the middle 2x2
        let pixels = [0, 1, 2, 0, 0, 3, 1, 0];
        let info = DisplayInfo {
            framebuffer: Dimension::new(4, 2),
            view: Rect::new(1, 0, 2, 2),
        };

        let rgba = resolve_view(&pixels, &info, ColorSource::Paletted(&palette)).unwrap();
        assert_eq!(rgba.len(), 2 * 2 * 4);
        assert_eq!(&rgba[0..4], &[0xFF, 0, 0, 0xFF]);
        assert_eq!(&rgba[4..8], &[0, 0xFF, 0, 0xFF]);
        assert_eq!(&rgba[8..12], &[0, 0, 0xFF, 0xFF]);
        assert_eq!(&rgba[12..16], &[0xFF, 0, 0, 0xFF]);
    }

    #[test]
    fn test_resolve_direct_view_crops_rows() {
        let dim = Dimension::new(3, 3);
        let pixels: Vec<u8> = (0..dim.area() as u8)
            .flat_map(|i| [i, i, i, 0xFF])
            .collect();
        let info = DisplayInfo {
            framebuffer: dim,
            view: Rect::new(1, 1, 2, 2),
        };

        let rgba = resolve_view(&pixels, &info, ColorSource::Direct).unwrap();
        let firsts: Vec<u8> = rgba.chunks_exact(4).map(|px| px[0]).collect();
        assert_eq!(firsts, vec![4, 5, 7, 8]);
    }

    #[test]
    fn test_resolve_rejects_short_buffer() {
        let info = DisplayInfo::full(Dimension::new(4, 4));
        let result = resolve_view(&[0u8; 15], &info, ColorSource::Direct);
        assert!(matches!(
            result,
            Err(GfxError::UploadSizeMismatch {
                expected: 64,
                actual: 15
            })
        ));
    }

    #[test]
    fn test_rgba_to_rgb() {
        assert_eq!(rgba_to_rgb(&[1, 2, 3, 4, 5, 6, 7, 8]), vec![1, 2, 3, 5, 6, 7]);
    }
}
