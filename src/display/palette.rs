// Palette - Color lookup table for paletted framebuffers
//
// In paletted mode every framebuffer byte is an index into a table of up to
// 256 RGBA colors. The table is uploaded once as a 256x1 texture and is
// immutable afterwards.
//
// Two presets are built in: the 64-entry NES master palette and a 256-step
// grayscale ramp.

use crate::error::ConfigError;

/// Maximum number of palette entries
pub const PALETTE_CAPACITY: usize = 256;

/// NES master palette in RGB format (64 colors)
///
/// Each color is represented as a 32-bit value: 0xRRGGBB
pub const NES_PALETTE: [u32; 64] = [
    // $00-$0F
    0x666666, 0x002A88, 0x1412A7, 0x3B00A4, 0x5C007E, 0x6E0040, 0x6C0600, 0x561D00,
    0x333500, 0x0B4800, 0x005200, 0x004F08, 0x00404D, 0x000000, 0x000000, 0x000000,
    // $10-$1F
    0xADADAD, 0x155FD9, 0x4240FF, 0x7527FE, 0xA01ACC, 0xB71E7B, 0xB53120, 0x994E00,
    0x6B6D00, 0x388700, 0x0C9300, 0x008F32, 0x007C8D, 0x000000, 0x000000, 0x000000,
    // $20-$2F
    0xFFFEFF, 0x64B0FF, 0x9290FF, 0xC676FF, 0xF36AFF, 0xFE6ECC, 0xFE8170, 0xEA9E22,
    0xBCBE00, 0x88D800, 0x5CE430, 0x45E082, 0x48CDDE, 0x4F4F4F, 0x000000, 0x000000,
    // $30-$3F
    0xFFFEFF, 0xC0DFFF, 0xD3D2FF, 0xE8C8FF, 0xFBC2FF, 0xFEC4EA, 0xFECCC5, 0xF7D8A5,
    0xE4E594, 0xCFEF96, 0xBDF4AB, 0xB3F3CC, 0xB5EBF2, 0xB8B8B8, 0x000000, 0x000000,
];

/// Convert RGB color to RGBA bytes
///
/// # Arguments
/// * `rgb` - 32-bit RGB color (0xRRGGBB)
///
/// # Returns
/// Array of [R, G, B, A] bytes, fully opaque
#[inline]
pub fn rgb_to_rgba(rgb: u32) -> [u8; 4] {
    [
        ((rgb >> 16) & 0xFF) as u8, // Red
        ((rgb >> 8) & 0xFF) as u8,  // Green
        (rgb & 0xFF) as u8,         // Blue
        0xFF,                       // Alpha (fully opaque)
    ]
}

/// Fixed-capacity RGBA color table
///
/// Unused entries are opaque black, so out-of-range indices resolve to black.
#[derive(Clone, PartialEq, Eq)]
pub struct PaletteTable {
    entries: [[u8; 4]; PALETTE_CAPACITY],
    len: usize,
}

impl PaletteTable {
    /// Build a palette from RGBA entries
    ///
    /// # Errors
    /// `ConfigError::EmptyPalette` for an empty slice and
    /// `ConfigError::PaletteTooLarge` for more than 256 entries.
    pub fn from_rgba(colors: &[[u8; 4]]) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if colors.len() > PALETTE_CAPACITY {
            return Err(ConfigError::PaletteTooLarge {
                entries: colors.len(),
                capacity: PALETTE_CAPACITY,
            });
        }

        let mut entries = [[0, 0, 0, 0xFF]; PALETTE_CAPACITY];
        entries[..colors.len()].copy_from_slice(colors);
        Ok(Self {
            entries,
            len: colors.len(),
        })
    }

    /// Build a palette from 0xRRGGBB values
    pub fn from_rgb(colors: &[u32]) -> Result<Self, ConfigError> {
        let rgba: Vec<[u8; 4]> = colors.iter().map(|&c| rgb_to_rgba(c)).collect();
        Self::from_rgba(&rgba)
    }

    /// Look up a built-in palette by name
    ///
    /// Known presets: `"nes"` and `"grayscale"`.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "nes" => Self::from_rgb(&NES_PALETTE),
            "grayscale" | "greyscale" => {
                let ramp: Vec<u32> = (0..PALETTE_CAPACITY as u32)
                    .map(|v| (v << 16) | (v << 8) | v)
                    .collect();
                Self::from_rgb(&ramp)
            }
            _ => Err(ConfigError::UnknownPalettePreset(name.to_string())),
        }
    }

    /// Number of configured entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: an empty palette cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resolve a framebuffer index to an RGBA color
    #[inline]
    pub fn resolve(&self, index: u8) -> [u8; 4] {
        self.entries[index as usize]
    }

    /// Full 256-entry table as tightly packed RGBA bytes (1024 bytes)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.entries)
    }
}

impl std::fmt::Debug for PaletteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteTable")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_rgba() {
        assert_eq!(rgb_to_rgba(0x123456), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn test_nes_preset() {
        let palette = PaletteTable::preset("nes").unwrap();
        assert_eq!(palette.len(), 64);
        assert_eq!(palette.resolve(0x00), [0x66, 0x66, 0x66, 0xFF]);
        assert_eq!(palette.resolve(0x30), [0xFF, 0xFE, 0xFF, 0xFF]);
        // Entries past the configured range are opaque black
        assert_eq!(palette.resolve(200), [0, 0, 0, 0xFF]);
    }

    #[test]
    fn test_grayscale_preset_fills_capacity() {
        let palette = PaletteTable::preset("grayscale").unwrap();
        assert_eq!(palette.len(), PALETTE_CAPACITY);
        assert_eq!(palette.resolve(0x80), [0x80, 0x80, 0x80, 0xFF]);
    }

    #[test]
    fn test_unknown_preset() {
        assert_eq!(
            PaletteTable::preset("cga"),
            Err(ConfigError::UnknownPalettePreset("cga".to_string()))
        );
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(PaletteTable::from_rgb(&[]), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn test_oversized_palette_rejected() {
        let colors = vec![0u32; PALETTE_CAPACITY + 1];
        assert_eq!(
            PaletteTable::from_rgb(&colors),
            Err(ConfigError::PaletteTooLarge {
                entries: 257,
                capacity: 256
            })
        );
    }

    #[test]
    fn test_full_capacity_accepted() {
        let colors = vec![0xFF0000u32; PALETTE_CAPACITY];
        let palette = PaletteTable::from_rgb(&colors).unwrap();
        assert_eq!(palette.resolve(255), [0xFF, 0, 0, 0xFF]);
    }

    #[test]
    fn test_as_bytes_layout() {
        let palette = PaletteTable::from_rgb(&[0x010203, 0x040506]).unwrap();
        let bytes = palette.as_bytes();
        assert_eq!(bytes.len(), PALETTE_CAPACITY * 4);
        assert_eq!(&bytes[..8], &[1, 2, 3, 0xFF, 4, 5, 6, 0xFF]);
    }
}
