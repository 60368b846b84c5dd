// Palettes used when drawing an occupancy grid into a bitmap

use crate::core::constants::*;
use crate::core::error::{GridError, Result};
use serde::{Deserialize, Serialize};

/// A single palette entry. The pixel-native encoding is computed on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    value: u32,
    bytes: [u8; 4],
    format: PixelFormat,
}

impl Color {
    pub fn gray(value: u8) -> Self {
        Self {
            value: u32::from(value),
            bytes: [value, 0, 0, 0],
            format: PixelFormat::Luma,
        }
    }

    pub fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        let value = u32::from(alpha) << 24
            | u32::from(red) << 16
            | u32::from(green) << 8
            | u32::from(blue);
        Self {
            value,
            bytes: value.to_le_bytes(),
            format: PixelFormat::Rgba,
        }
    }

    /// Gray level, or the packed `0xAARRGGBB` value for RGBA colors.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Native byte encoding: one byte for grayscale, four little-endian bytes for RGBA.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.format.bytes_per_pixel()]
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub(crate) fn luma(&self) -> [u8; 1] {
        [self.bytes[0]]
    }

    /// Channels in `[r, g, b, a]` order, as raster buffers store them.
    pub(crate) fn channels(&self) -> [u8; 4] {
        let [b, g, r, a] = self.value.to_le_bytes();
        [r, g, b, a]
    }
}

/// Color as written in configuration files: a gray level or `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Gray(u8),
    Rgba([u8; 4]),
}

impl From<ColorSpec> for Color {
    fn from(spec: ColorSpec) -> Self {
        match spec {
            ColorSpec::Gray(v) => Color::gray(v),
            ColorSpec::Rgba([r, g, b, a]) => Color::rgba(r, g, b, a),
        }
    }
}

/// Colors for the three occupancy classes, all in one pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfiguration {
    occupied: Color,
    free: Color,
    unknown: Color,
    format: PixelFormat,
}

impl ColorConfiguration {
    /// Missing colors fall back to the default grayscale entries.
    pub fn new(
        occupied: Option<Color>,
        free: Option<Color>,
        unknown: Option<Color>,
    ) -> Result<Self> {
        let occupied = occupied.unwrap_or(Color::gray(DEFAULT_COLOR_OCCUPIED));
        let free = free.unwrap_or(Color::gray(DEFAULT_COLOR_FREE));
        let unknown = unknown.unwrap_or(Color::gray(DEFAULT_COLOR_UNKNOWN));

        if occupied.format() != free.format() || free.format() != unknown.format() {
            return Err(GridError::PaletteFormatMismatch {
                occupied: occupied.format().as_str(),
                free: free.format().as_str(),
                unknown: unknown.format().as_str(),
            });
        }

        Ok(Self {
            occupied,
            free,
            unknown,
            format: occupied.format(),
        })
    }

    pub fn grayscale() -> Self {
        Self {
            occupied: Color::gray(DEFAULT_COLOR_OCCUPIED),
            free: Color::gray(DEFAULT_COLOR_FREE),
            unknown: Color::gray(DEFAULT_COLOR_UNKNOWN),
            format: PixelFormat::Luma,
        }
    }

    /// Black walls, white free space, light gray unknown.
    pub fn rgba_default() -> Self {
        Self {
            occupied: Color::rgba(0x00, 0x00, 0x00, 0xff),
            free: Color::rgba(0xff, 0xff, 0xff, 0xff),
            unknown: Color::rgba(0xbf, 0xbf, 0xbf, 0xff),
            format: PixelFormat::Rgba,
        }
    }

    pub fn occupied(&self) -> Color {
        self.occupied
    }

    pub fn free(&self) -> Color {
        self.free
    }

    pub fn unknown(&self) -> Color {
        self.unknown
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Color for a raw cell value.
    pub fn color_for(&self, cell: i8) -> Color {
        match cell {
            CELL_UNKNOWN => self.unknown,
            CELL_FREE => self.free,
            _ => self.occupied,
        }
    }
}

impl Default for ColorConfiguration {
    fn default() -> Self {
        Self::grayscale()
    }
}
