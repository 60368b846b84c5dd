// Conversion between occupancy cells and pixel buffers

use crate::core::color::ColorConfiguration;
use crate::core::constants::*;
use crate::core::error::Result;
use crate::core::format::OccupancyGrid;
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

/// Raster buffer in one of the palette pixel formats.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    Luma(GrayImage),
    Rgba(RgbaImage),
}

impl PixelBuffer {
    pub fn width(&self) -> u32 {
        match self {
            PixelBuffer::Luma(img) => img.width(),
            PixelBuffer::Rgba(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            PixelBuffer::Luma(img) => img.height(),
            PixelBuffer::Rgba(img) => img.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn format(&self) -> PixelFormat {
        match self {
            PixelBuffer::Luma(_) => PixelFormat::Luma,
            PixelBuffer::Rgba(_) => PixelFormat::Rgba,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PixelBuffer::Luma(img) => img.as_raw(),
            PixelBuffer::Rgba(img) => img.as_raw(),
        }
    }

    /// Converts a decoded image into the given pixel format.
    pub fn from_dynamic(image: DynamicImage, format: PixelFormat) -> Self {
        match format {
            PixelFormat::Luma => PixelBuffer::Luma(image.into_luma8()),
            PixelFormat::Rgba => PixelBuffer::Rgba(image.into_rgba8()),
        }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            PixelBuffer::Luma(img) => DynamicImage::ImageLuma8(img),
            PixelBuffer::Rgba(img) => DynamicImage::ImageRgba8(img),
        }
    }
}

/// Draws the grid cells into a buffer of the grid's size, one pixel per cell.
pub fn occupancy_to_image(
    grid: &OccupancyGrid,
    palette: &ColorConfiguration,
) -> Result<PixelBuffer> {
    grid.validate()?;

    let width = grid.info.width;
    let data = &grid.data;
    let cell = |x: u32, y: u32| data[y as usize * width as usize + x as usize];

    let buffer = match palette.format() {
        PixelFormat::Luma => PixelBuffer::Luma(GrayImage::from_fn(
            width,
            grid.info.height,
            |x, y| Luma(palette.color_for(cell(x, y)).luma()),
        )),
        PixelFormat::Rgba => PixelBuffer::Rgba(RgbaImage::from_fn(
            width,
            grid.info.height,
            |x, y| Rgba(palette.color_for(cell(x, y)).channels()),
        )),
    };

    Ok(buffer)
}

/// Maps pixels back to cells. Anything that is neither the unknown nor the
/// free color becomes `CELL_OCCUPIED`.
pub fn image_to_occupancy(buffer: &PixelBuffer, palette: &ColorConfiguration) -> Vec<i8> {
    match buffer {
        PixelBuffer::Luma(img) => {
            let unknown = palette.unknown().luma()[0];
            let free = palette.free().luma()[0];
            img.pixels()
                .map(|Luma([v])| classify(*v == unknown, *v == free))
                .collect()
        }
        PixelBuffer::Rgba(img) => {
            let unknown = palette.unknown().channels();
            let free = palette.free().channels();
            img.pixels()
                .map(|Rgba(px)| classify(*px == unknown, *px == free))
                .collect()
        }
    }
}

fn classify(is_unknown: bool, is_free: bool) -> i8 {
    if is_unknown {
        CELL_UNKNOWN
    } else if is_free {
        CELL_FREE
    } else {
        CELL_OCCUPIED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::core::format::{Header, MapMetaData, Pose, Time};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grid(width: u32, height: u32, data: Vec<i8>) -> OccupancyGrid {
        OccupancyGrid {
            header: Header::default(),
            info: MapMetaData {
                map_load_time: Time::default(),
                resolution: 1.0,
                width,
                height,
                origin: Pose::default(),
            },
            data,
        }
    }

    #[test]
    fn test_grayscale_pixels() {
        let g = grid(2, 2, vec![-1, 0, 100, 42]);
        let buffer = occupancy_to_image(&g, &ColorConfiguration::default()).unwrap();
        assert_eq!(buffer.dimensions(), (2, 2));
        assert_eq!(buffer.format(), PixelFormat::Luma);
        assert_eq!(buffer.as_bytes(), &[128, 1, 0, 0]);
    }

    #[test]
    fn test_row_major_layout() {
        let g = grid(3, 2, vec![-1, 0, 0, 0, 0, 100]);
        let buffer = occupancy_to_image(&g, &ColorConfiguration::default()).unwrap();
        match &buffer {
            PixelBuffer::Luma(img) => {
                assert_eq!(img.get_pixel(0, 0).0, [128]);
                assert_eq!(img.get_pixel(2, 1).0, [0]);
                assert_eq!(img.get_pixel(1, 1).0, [1]);
            }
            PixelBuffer::Rgba(_) => panic!("expected grayscale buffer"),
        }
    }

    #[test]
    fn test_rgba_pixels() {
        let palette = ColorConfiguration::rgba_default();
        let g = grid(3, 1, vec![-1, 0, 7]);
        let buffer = occupancy_to_image(&g, &palette).unwrap();
        assert_eq!(buffer.format(), PixelFormat::Rgba);
        assert_eq!(
            buffer.as_bytes(),
            &[0xbf, 0xbf, 0xbf, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0xff]
        );
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let g = grid(2, 2, vec![0, 0]);
        assert!(occupancy_to_image(&g, &ColorConfiguration::default()).is_err());
    }

    #[test]
    fn test_round_trip_free_and_unknown() {
        let mut rng = StdRng::seed_from_u64(7);
        let palette = ColorConfiguration::default();

        for _ in 0..20 {
            let (w, h) = (rng.gen_range(1..32), rng.gen_range(1..32));
            let data: Vec<i8> = (0..w * h)
                .map(|_| if rng.gen_bool(0.5) { -1 } else { 0 })
                .collect();
            let g = grid(w, h, data.clone());

            let buffer = occupancy_to_image(&g, &palette).unwrap();
            assert_eq!(image_to_occupancy(&buffer, &palette), data);
        }
    }

    #[test]
    fn test_round_trip_collapses_occupied() {
        let palette = ColorConfiguration::default();
        let g = grid(5, 1, vec![1, 50, 100, 127, -100]);
        let buffer = occupancy_to_image(&g, &palette).unwrap();
        assert_eq!(image_to_occupancy(&buffer, &palette), vec![100; 5]);
    }

    #[test]
    fn test_rgba_round_trip() {
        let palette = ColorConfiguration::new(
            Some(Color::rgba(255, 0, 0, 255)),
            Some(Color::rgba(0, 255, 0, 255)),
            Some(Color::rgba(0, 0, 255, 128)),
        )
        .unwrap();
        let g = grid(2, 2, vec![-1, 0, 100, 3]);
        let buffer = occupancy_to_image(&g, &palette).unwrap();
        assert_eq!(image_to_occupancy(&buffer, &palette), vec![-1, 0, 100, 100]);
    }

    #[test]
    fn test_foreign_pixels_are_occupied() {
        let palette = ColorConfiguration::default();
        let buffer = PixelBuffer::Luma(GrayImage::from_raw(3, 1, vec![128, 1, 64]).unwrap());
        assert_eq!(image_to_occupancy(&buffer, &palette), vec![-1, 0, 100]);
    }
}
