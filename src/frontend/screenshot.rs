// Screenshot functionality
//
// Saves the visible view rectangle of the current frame as a PNG file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::display::{rgba_to_rgb, Dimension};
use crate::frontend::config::ScreenshotConfig;

/// Errors that can occur during screenshot operations
#[derive(Debug)]
pub enum ScreenshotError {
    /// I/O error
    Io(io::Error),

    /// PNG encoding error
    PngEncoding(png::EncodingError),

    /// Pixel data does not match the image size
    SizeMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::Io(e) => write!(f, "I/O error: {}", e),
            ScreenshotError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
            ScreenshotError::SizeMismatch { expected, actual } => write!(
                f,
                "Screenshot data is {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for ScreenshotError {}

impl From<io::Error> for ScreenshotError {
    fn from(e: io::Error) -> Self {
        ScreenshotError::Io(e)
    }
}

impl From<png::EncodingError> for ScreenshotError {
    fn from(e: png::EncodingError) -> Self {
        ScreenshotError::PngEncoding(e)
    }
}

/// Save RGBA pixels as a screenshot
///
/// # Arguments
///
/// * `rgba` - View rectangle resolved to RGBA
/// * `size` - Image size
/// * `config` - Target directory and naming
///
/// # Returns
///
/// Path of the written file
pub fn save_screenshot(
    rgba: &[u8],
    size: Dimension,
    config: &ScreenshotConfig,
) -> Result<PathBuf, ScreenshotError> {
    let expected = size.area() * 4;
    if rgba.len() != expected {
        return Err(ScreenshotError::SizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }

    fs::create_dir_all(&config.directory)?;
    let file_path = config.directory.join(screenshot_filename(config.include_timestamp));

    save_png(&file_path, &rgba_to_rgb(rgba), size)?;
    log::info!("Screenshot saved to {}", file_path.display());
    Ok(file_path)
}

/// File name of a new screenshot
fn screenshot_filename(include_timestamp: bool) -> String {
    if include_timestamp {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("screenshot_{}.png", timestamp)
    } else {
        "screenshot.png".to_string()
    }
}

/// Save RGB data as a PNG file
fn save_png(path: &Path, data: &[u8], size: Dimension) -> Result<(), ScreenshotError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, size.width, size.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename() {
        assert_eq!(screenshot_filename(false), "screenshot.png");
        let name = screenshot_filename(true);
        assert!(name.starts_with("screenshot_"));
        assert!(name.ends_with(".png"));
        // screenshot_YYYYMMDD_HHMMSS.png
        assert_eq!(name.len(), "screenshot_".len() + 15 + ".png".len());
    }

    #[test]
    fn test_save_screenshot_writes_png() {
        let dir = std::env::temp_dir().join(format!("emu_gfx_shot_{}", std::process::id()));
        let config = ScreenshotConfig {
            directory: dir.clone(),
            include_timestamp: false,
        };
        let size = Dimension::new(2, 2);
        let rgba = [0xFFu8; 16];

        let path = save_screenshot(&rgba, size, &config).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_size_mismatch() {
        let config = ScreenshotConfig::default();
        let result = save_screenshot(&[0u8; 8], Dimension::new(2, 2), &config);
        assert!(matches!(
            result,
            Err(ScreenshotError::SizeMismatch {
                expected: 16,
                actual: 8
            })
        ));
    }
}
