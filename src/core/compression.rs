// Raster library backend: resampling, encoding and decoding of pixel buffers

use crate::core::codec::PixelBuffer;
use crate::core::constants::PixelFormat;
use crate::core::error::{GridError, Result};
use crate::core::format::CompressedBitmap;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Resampling filter used when resizing a rendered grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Keeps palette colors exact, so every resized pixel stays classifiable.
    #[default]
    Nearest,
    Bilinear,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Looks up an image format by name ("png", "jpeg", "bmp", ...).
pub fn image_format(name: &str) -> Result<ImageFormat> {
    ImageFormat::from_extension(name.to_ascii_lowercase())
        .ok_or_else(|| GridError::UnsupportedFormat(name.to_string()))
}

pub fn resize(buffer: &PixelBuffer, width: u32, height: u32, filter: ResampleFilter) -> PixelBuffer {
    if buffer.dimensions() == (width, height) {
        return buffer.clone();
    }

    let filter = FilterType::from(filter);
    match buffer {
        PixelBuffer::Luma(img) => PixelBuffer::Luma(imageops::resize(img, width, height, filter)),
        PixelBuffer::Rgba(img) => PixelBuffer::Rgba(imageops::resize(img, width, height, filter)),
    }
}

pub fn encode(buffer: &PixelBuffer, format_name: &str) -> Result<Vec<u8>> {
    let format = image_format(format_name)?;

    let image: DynamicImage = match (buffer, format) {
        // No alpha channel in these encoders
        (PixelBuffer::Rgba(img), ImageFormat::Jpeg | ImageFormat::Pnm) => {
            DynamicImage::ImageRgba8(img.clone()).into_rgb8().into()
        }
        _ => buffer.clone().into_dynamic(),
    };

    let mut data = Cursor::new(Vec::new());
    image.write_to(&mut data, format)?;
    Ok(data.into_inner())
}

pub fn decode(data: &[u8], format_name: &str) -> Result<DynamicImage> {
    let format = image_format(format_name)?;
    Ok(image::load_from_memory_with_format(data, format)?)
}

/// Wraps raw, uncompressed pixels in a buffer of the given format.
pub fn decode_raw(pixels: Vec<u8>, format: PixelFormat, width: u32, height: u32) -> Result<PixelBuffer> {
    let expected = width as usize * height as usize * format.bytes_per_pixel();
    let actual = pixels.len();
    let mismatch = || {
        GridError::InvalidGrid(format!(
            "Expected {} bytes for {}x{} {}, got {}",
            expected, width, height, format, actual
        ))
    };

    if actual != expected {
        return Err(mismatch());
    }

    match format {
        PixelFormat::Luma => GrayImage::from_raw(width, height, pixels)
            .map(PixelBuffer::Luma)
            .ok_or_else(mismatch),
        PixelFormat::Rgba => RgbaImage::from_raw(width, height, pixels)
            .map(PixelBuffer::Rgba)
            .ok_or_else(mismatch),
    }
}

/// Fills the format and data slots of a compressed bitmap message.
pub fn fill_compressed_bitmap(
    buffer: &PixelBuffer,
    format: &str,
    message: &mut CompressedBitmap,
) -> Result<()> {
    message.data = encode(buffer, format)?;
    message.format = format.to_string();
    Ok(())
}
