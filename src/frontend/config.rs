// Configuration management
//
// Front-end settings persisted as TOML: window and frame pacing, the display
// layout handed to the presenter, and where screenshots go.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::display::{BorderInsets, Dimension, Orientation, PaletteTable, PixelAspect};
use crate::error::ConfigError;
use crate::gpu::PresenterConfig;

/// Default configuration file path
pub const CONFIG_FILE: &str = "emu_gfx.toml";

/// Front-end configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Window and pacing
    pub video: VideoConfig,

    /// Picture layout and color mode
    pub display: DisplayConfig,

    /// Screenshot settings
    pub screenshot: ScreenshotConfig,
}

/// Video configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Initial window scale (1-8)
    pub scale: u32,

    /// Enable VSync
    pub vsync: bool,

    /// Target FPS
    pub fps: u32,
}

impl VideoConfig {
    /// Scale clamped to the supported range
    pub fn scale(&self) -> u32 {
        self.scale.clamp(1, 8)
    }

    /// Get the frame duration for the target FPS
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1) as u64)
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            vsync: true,
            fps: 60,
        }
    }
}

/// Palette source in the configuration file
///
/// Either a preset name or an explicit list of `0xRRGGBB` colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    Preset(String),
    Colors(Vec<u32>),
}

impl PaletteSpec {
    /// Build the palette table
    pub fn resolve(&self) -> Result<PaletteTable, ConfigError> {
        match self {
            PaletteSpec::Preset(name) => PaletteTable::preset(name),
            PaletteSpec::Colors(colors) => PaletteTable::from_rgb(colors),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Pixels kept free around the picture
    pub border: BorderInsets,

    /// Shape of one emulated pixel; zero components mean 1
    pub pixel_aspect: PixelAspect,

    /// Show the picture rotated by 90 degrees
    pub portrait: bool,

    /// Framebuffer holds palette indices
    pub paletted: bool,

    /// Palette for paletted mode
    pub palette: Option<PaletteSpec>,

    /// Largest accepted framebuffer
    pub max_framebuffer: Dimension,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            border: BorderInsets::new(8, 8, 8, 32),
            pixel_aspect: PixelAspect::SQUARE,
            portrait: false,
            paletted: true,
            palette: Some(PaletteSpec::Preset("nes".to_string())),
            max_framebuffer: Dimension::new(512, 512),
        }
    }
}

impl DisplayConfig {
    /// Presenter configuration with the palette resolved
    ///
    /// # Errors
    /// Unknown preset, empty or oversized palette, or paletted mode
    /// without a palette.
    pub fn presenter_config(&self) -> Result<PresenterConfig, ConfigError> {
        let palette = self.palette.as_ref().map(PaletteSpec::resolve).transpose()?;
        if self.paletted && palette.is_none() {
            return Err(ConfigError::MissingPalette);
        }
        Ok(PresenterConfig {
            border: self.border,
            pixel_aspect: self.pixel_aspect.normalized(),
            orientation: Orientation::from_portrait(self.portrait),
            paletted: self.paletted,
            palette,
            max_framebuffer: self.max_framebuffer,
        })
    }

    /// Window size showing `screen` at `scale`, pixel aspect and borders included
    pub fn initial_window_size(&self, screen: Dimension, scale: u32) -> Dimension {
        let aspect = self.pixel_aspect.normalized();
        let (w, h) = match Orientation::from_portrait(self.portrait) {
            Orientation::Landscape => (screen.width * aspect.width, screen.height * aspect.height),
            Orientation::Portrait => (screen.height * aspect.height, screen.width * aspect.width),
        };
        Dimension::new(
            w * scale + self.border.horizontal(),
            h * scale + self.border.vertical(),
        )
    }
}

/// Screenshot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Screenshot directory
    pub directory: PathBuf,

    /// Include timestamp in filename
    pub include_timestamp: bool,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("screenshots"),
            include_timestamp: true,
        }
    }
}

impl FrontendConfig {
    /// Load configuration from file or create default
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// and saves it to the file. A file that exists but does not parse is
    /// reported and replaced by defaults in memory only.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    log::warn!("Could not write default config to {}: {}", path.display(), e);
                }
                config
            }
            Err(e) => {
                log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, io::Error> {
        toml::from_str(contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}
