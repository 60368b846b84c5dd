// End-to-end grid transforms: scale to a grid, scale and compress, decompress

use crate::core::codec::{image_to_occupancy, occupancy_to_image, PixelBuffer};
use crate::core::color::ColorConfiguration;
use crate::core::compression::{self, decode_raw, ResampleFilter};
use crate::core::constants::DEFAULT_IMAGE_FORMAT;
use crate::core::error::{GridError, Result};
use crate::core::format::{CompressedBitmap, MapMetaData, OccupancyGrid, Time};
use crate::core::scaling::{calculate_resolution, make_scaled_map_metadata};
use tracing::debug;

/// What the output grid should look like: a metric resolution or a pixel footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleTarget {
    Resolution(f64),
    Footprint { width: u32, height: u32 },
}

impl ScaleTarget {
    /// Either `resolution` or both `width` and `height` must be given, never both.
    pub fn from_parameters(
        resolution: Option<f64>,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Self> {
        match (resolution, width, height) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(GridError::Configuration(
                "resolution and width/height are both set, use either resolution or width and height"
                    .to_string(),
            )),
            (Some(resolution), None, None) => {
                if !(resolution.is_finite() && resolution > 0.0) {
                    return Err(GridError::InvalidResolution(resolution));
                }
                Ok(ScaleTarget::Resolution(resolution))
            }
            (None, Some(width), Some(height)) => {
                if width == 0 || height == 0 {
                    return Err(GridError::Configuration(format!(
                        "target footprint must be non-empty, got {}x{}",
                        width, height
                    )));
                }
                Ok(ScaleTarget::Footprint { width, height })
            }
            (None, _, _) => Err(GridError::Configuration(
                "required parameters not found, either resolution or width and height need to be set"
                    .to_string(),
            )),
        }
    }

    /// Effective output resolution for a grid described by `info`.
    pub fn resolve(&self, info: &MapMetaData) -> Result<f64> {
        let resolution = match *self {
            ScaleTarget::Resolution(resolution) => resolution,
            ScaleTarget::Footprint { width, height } => calculate_resolution(
                (width, height),
                (info.width, info.height),
                f64::from(info.resolution),
            ),
        };

        // An empty or unresolved source grid yields zero or NaN here
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(GridError::InvalidResolution(resolution));
        }

        Ok(resolution)
    }
}

fn render_scaled(
    grid: &OccupancyGrid,
    palette: &ColorConfiguration,
    info: &MapMetaData,
    filter: ResampleFilter,
) -> Result<PixelBuffer> {
    let image = occupancy_to_image(grid, palette)?;
    Ok(compression::resize(&image, info.width, info.height, filter))
}

/// Resamples `grid` to `resolution` and returns it as a new occupancy grid.
///
/// The grid is drawn with the default grayscale palette, resized and read
/// back, so occupied cells come out as 100.
pub fn scale_occupancy_grid(
    grid: &OccupancyGrid,
    resolution: f64,
    filter: ResampleFilter,
) -> Result<OccupancyGrid> {
    let palette = ColorConfiguration::default();
    let info = make_scaled_map_metadata(&grid.info, resolution)?;
    let resized = render_scaled(grid, &palette, &info, filter)?;

    debug!(
        "Scaled grid {}x{}@{} -> {}x{}@{}",
        grid.info.width, grid.info.height, grid.info.resolution, info.width, info.height, resolution
    );

    Ok(OccupancyGrid {
        header: grid.header.clone(),
        data: image_to_occupancy(&resized, &palette),
        info,
    })
}

/// Resamples `grid` to `resolution` and encodes it as a `format` image.
pub fn compress_occupancy_grid(
    grid: &OccupancyGrid,
    resolution: f64,
    format: &str,
    palette: &ColorConfiguration,
    filter: ResampleFilter,
) -> Result<CompressedBitmap> {
    let info = make_scaled_map_metadata(&grid.info, resolution)?;
    let resized = render_scaled(grid, palette, &info, filter)?;

    let mut result = CompressedBitmap {
        header: grid.header.clone(),
        origin: grid.info.origin,
        resolution_x: info.resolution,
        resolution_y: info.resolution,
        ..Default::default()
    };
    compression::fill_compressed_bitmap(&resized, format, &mut result)?;

    debug!(
        "Compressed grid {}x{} -> {}x{} {} ({} bytes)",
        grid.info.width,
        grid.info.height,
        info.width,
        info.height,
        format,
        result.data.len()
    );

    Ok(result)
}

/// Decodes a compressed bitmap back into an occupancy grid, using `palette`
/// to classify pixels.
pub fn decompress_occupancy_grid(
    bitmap: &CompressedBitmap,
    palette: &ColorConfiguration,
    map_load_time: Time,
) -> Result<OccupancyGrid> {
    if bitmap.resolution_x != bitmap.resolution_y {
        return Err(GridError::InvalidGrid(format!(
            "Non-square pixels are not supported: {} x {}",
            bitmap.resolution_x, bitmap.resolution_y
        )));
    }

    let image = compression::decode(&bitmap.data, &bitmap.format)?;
    let buffer = PixelBuffer::from_dynamic(image, palette.format());

    let info = MapMetaData {
        map_load_time,
        resolution: bitmap.resolution_x,
        width: buffer.width(),
        height: buffer.height(),
        origin: bitmap.origin,
    };

    OccupancyGrid::new(
        bitmap.header.clone(),
        info,
        image_to_occupancy(&buffer, palette),
    )
}

/// A configured transform, applied to every incoming grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTransformer {
    target: ScaleTarget,
    format: String,
    palette: ColorConfiguration,
    filter: ResampleFilter,
}

impl GridTransformer {
    pub fn new(target: ScaleTarget) -> Self {
        Self {
            target,
            format: DEFAULT_IMAGE_FORMAT.to_string(),
            palette: ColorConfiguration::default(),
            filter: ResampleFilter::default(),
        }
    }

    /// Fails, before any grid is processed, when `format` cannot encode
    /// buffers of the current palette's pixel format. Set the palette first.
    pub fn with_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        let sample = decode_raw(
            vec![0; self.palette.format().bytes_per_pixel()],
            self.palette.format(),
            1,
            1,
        )?;
        compression::encode(&sample, &format)?;
        self.format = format;
        Ok(self)
    }

    pub fn with_palette(mut self, palette: ColorConfiguration) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn target(&self) -> ScaleTarget {
        self.target
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn palette(&self) -> &ColorConfiguration {
        &self.palette
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    pub fn resolution_for(&self, grid: &OccupancyGrid) -> Result<f64> {
        self.target.resolve(&grid.info)
    }

    pub fn scale(&self, grid: &OccupancyGrid) -> Result<OccupancyGrid> {
        scale_occupancy_grid(grid, self.resolution_for(grid)?, self.filter)
    }

    pub fn compress(&self, grid: &OccupancyGrid) -> Result<CompressedBitmap> {
        compress_occupancy_grid(
            grid,
            self.resolution_for(grid)?,
            &self.format,
            &self.palette,
            self.filter,
        )
    }

    pub fn decompress(&self, bitmap: &CompressedBitmap, map_load_time: Time) -> Result<OccupancyGrid> {
        decompress_occupancy_grid(bitmap, &self.palette, map_load_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Color;
    use crate::core::format::{Header, Point, Pose};

    fn example_grid() -> OccupancyGrid {
        OccupancyGrid {
            header: Header {
                seq: 7,
                stamp: Time::new(100, 5),
                frame_id: "map".to_string(),
            },
            info: MapMetaData {
                map_load_time: Time::new(42, 0),
                resolution: 1.0,
                width: 4,
                height: 4,
                origin: Pose {
                    position: Point {
                        x: -2.0,
                        y: -2.0,
                        z: 0.0,
                    },
                    ..Default::default()
                },
            },
            data: vec![
                -1, -1, 0, 0,
                0, 0, 100, 100,
                100, 100, 0, 0,
                0, 0, -1, -1,
            ],
        }
    }

    #[test]
    fn test_target_parameters() {
        assert_eq!(
            ScaleTarget::from_parameters(Some(0.1), None, None).unwrap(),
            ScaleTarget::Resolution(0.1)
        );
        assert_eq!(
            ScaleTarget::from_parameters(None, Some(2), Some(3)).unwrap(),
            ScaleTarget::Footprint {
                width: 2,
                height: 3
            }
        );
    }

    #[test]
    fn test_target_mutually_exclusive() {
        for (r, w, h) in [
            (Some(0.1), Some(2), Some(2)),
            (Some(0.1), Some(2), None),
            (Some(0.1), None, Some(2)),
        ] {
            assert!(matches!(
                ScaleTarget::from_parameters(r, w, h),
                Err(GridError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_target_missing() {
        for (w, h) in [(None, None), (Some(2), None), (None, Some(2))] {
            assert!(matches!(
                ScaleTarget::from_parameters(None, w, h),
                Err(GridError::Configuration(_))
            ));
        }
        assert!(ScaleTarget::from_parameters(None, Some(0), Some(2)).is_err());
        assert!(ScaleTarget::from_parameters(Some(-1.0), None, None).is_err());
    }

    #[test]
    fn test_footprint_resolution() {
        let grid = example_grid();
        let target = ScaleTarget::Footprint {
            width: 2,
            height: 2,
        };
        assert_eq!(target.resolve(&grid.info).unwrap(), 2.0);
    }

    #[test]
    fn test_footprint_of_empty_grid_rejected() {
        let mut info = example_grid().info;
        info.width = 0;
        let target = ScaleTarget::Footprint {
            width: 2,
            height: 2,
        };
        assert!(matches!(
            target.resolve(&info),
            Err(GridError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_scale_example_grid() {
        let grid = example_grid();
        let scaled = scale_occupancy_grid(&grid, 2.0, ResampleFilter::Nearest).unwrap();

        assert_eq!(scaled.header, grid.header);
        assert_eq!((scaled.info.width, scaled.info.height), (2, 2));
        assert_eq!(scaled.info.resolution, 2.0);
        assert_eq!(scaled.info.origin, grid.info.origin);
        assert_eq!(scaled.info.map_load_time, grid.info.map_load_time);
        assert_eq!(scaled.data.len(), 4);

        // Each output cell comes from its own 2x2 source block
        for (i, value) in scaled.data.iter().enumerate() {
            let (bx, by) = (i % 2, i / 2);
            let block: Vec<i8> = (0..4)
                .map(|k| grid.data[(2 * by + k / 2) * 4 + 2 * bx + k % 2])
                .collect();
            assert!(block.contains(value), "cell {} = {} not in {:?}", i, value, block);
        }
    }

    #[test]
    fn test_scale_block_grid_exact() {
        let mut grid = example_grid();
        grid.data = vec![
            -1, -1, 0, 0,
            -1, -1, 0, 0,
            100, 100, 0, 0,
            100, 100, 0, 0,
        ];
        let scaled = scale_occupancy_grid(&grid, 2.0, ResampleFilter::Nearest).unwrap();
        assert_eq!(scaled.data, vec![-1, 0, 100, 0]);
    }

    #[test]
    fn test_scale_native_resolution_is_lossless_for_classes() {
        let grid = example_grid();
        let scaled = scale_occupancy_grid(&grid, 1.0, ResampleFilter::Bilinear).unwrap();
        assert_eq!(scaled.data, grid.data);
    }

    #[test]
    fn test_scale_bilinear_sizes() {
        let grid = example_grid();
        let scaled = scale_occupancy_grid(&grid, 0.5, ResampleFilter::Bilinear).unwrap();
        assert_eq!((scaled.info.width, scaled.info.height), (8, 8));
        assert_eq!(scaled.data.len(), 64);
    }

    #[test]
    fn test_scale_does_not_mutate_input() {
        let grid = example_grid();
        let copy = grid.clone();
        let _ = scale_occupancy_grid(&grid, 2.0, ResampleFilter::Nearest).unwrap();
        assert_eq!(grid, copy);
    }

    #[test]
    fn test_degenerate_scale_rejected() {
        let grid = example_grid();
        let result = scale_occupancy_grid(&grid, 10.0, ResampleFilter::Nearest);
        assert!(matches!(result, Err(GridError::DegenerateScaling { .. })));
    }

    #[test]
    fn test_oversized_scale_rejected() {
        let mut grid = example_grid();
        grid.info.width = 1;
        grid.info.height = 1;
        grid.info.resolution = 1e9;
        grid.data = vec![0];

        let transformer = GridTransformer::new(ScaleTarget::Resolution(1.0));
        assert!(matches!(
            transformer.scale(&grid),
            Err(GridError::ScaledSizeTooLarge { .. })
        ));
        assert!(matches!(
            transformer.compress(&grid),
            Err(GridError::ScaledSizeTooLarge { .. })
        ));
    }

    #[test]
    fn test_compress_example_grid() {
        let grid = example_grid();
        let transformer = GridTransformer::new(ScaleTarget::Footprint {
            width: 2,
            height: 2,
        });
        let bitmap = transformer.compress(&grid).unwrap();

        assert_eq!(bitmap.header, grid.header);
        assert_eq!(bitmap.origin, grid.info.origin);
        assert_eq!(bitmap.resolution_x, 2.0);
        assert_eq!(bitmap.resolution_y, 2.0);
        assert_eq!(bitmap.format, "png");
        assert!(bitmap.data.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_compress_rgba_jpeg() {
        let grid = example_grid();
        let bitmap = compress_occupancy_grid(
            &grid,
            0.25,
            "jpeg",
            &ColorConfiguration::rgba_default(),
            ResampleFilter::Nearest,
        )
        .unwrap();
        assert_eq!(bitmap.format, "jpeg");
        assert_eq!(&bitmap.data[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn test_compress_decompress_round_trip() {
        let grid = example_grid();
        let palette = ColorConfiguration::new(
            Some(Color::rgba(0, 0, 0, 255)),
            Some(Color::rgba(255, 255, 255, 255)),
            Some(Color::rgba(128, 128, 128, 255)),
        )
        .unwrap();
        let transformer = GridTransformer::new(ScaleTarget::Resolution(1.0)).with_palette(palette);

        let bitmap = transformer.compress(&grid).unwrap();
        let restored = transformer
            .decompress(&bitmap, grid.info.map_load_time)
            .unwrap();

        assert_eq!(restored, grid);
    }

    #[test]
    fn test_decompress_rejects_non_square_pixels() {
        let bitmap = CompressedBitmap {
            resolution_x: 1.0,
            resolution_y: 2.0,
            format: "png".to_string(),
            ..Default::default()
        };
        let result = decompress_occupancy_grid(&bitmap, &ColorConfiguration::default(), Time::default());
        assert!(matches!(result, Err(GridError::InvalidGrid(_))));
    }

    #[test]
    fn test_unknown_format_rejected_up_front() {
        let result = GridTransformer::new(ScaleTarget::Resolution(1.0)).with_format("tiffany");
        assert!(matches!(result, Err(GridError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decode_only_format_rejected_up_front() {
        // DDS is recognized by name but has no encoder
        let result = GridTransformer::new(ScaleTarget::Resolution(1.0)).with_format("dds");
        assert!(matches!(result, Err(GridError::Image(_))));

        let result = GridTransformer::new(ScaleTarget::Resolution(1.0))
            .with_palette(ColorConfiguration::rgba_default())
            .with_format("jpeg");
        assert_eq!(result.unwrap().format(), "jpeg");
    }
}
