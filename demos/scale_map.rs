// Example usage: scale a synthetic room map and write the compressed bitmap to disk

use gridmap_transport::{
    GridTransformer, Header, MapMetaData, OccupancyGrid, Pose, Result, ScaleTarget, Time,
};
use tracing::{debug, info, Level};

fn room(width: u32, height: u32) -> Result<OccupancyGrid> {
    let mut data = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let wall = x == 10 || y == 10 || x == width - 11 || y == height - 11;
            let outside = x < 10 || y < 10 || x > width - 11 || y > height - 11;
            data.push(if wall {
                100
            } else if outside {
                -1
            } else {
                0
            });
        }
    }

    OccupancyGrid::new(
        Header {
            frame_id: "map".to_string(),
            ..Default::default()
        },
        MapMetaData {
            map_load_time: Time::new(1, 0),
            resolution: 0.05,
            width,
            height,
            origin: Pose::default(),
        },
        data,
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let grid = room(400, 300)?;
    info!(
        "Source map: {}x{} @ {} m/cell",
        grid.info.width, grid.info.height, grid.info.resolution
    );

    // Fit into 128x128 pixels
    let transformer = GridTransformer::new(ScaleTarget::Footprint {
        width: 128,
        height: 128,
    });

    let scaled = transformer.scale(&grid)?;
    info!(
        "Scaled map: {}x{} @ {} m/cell",
        scaled.info.width, scaled.info.height, scaled.info.resolution
    );

    let occupied = scaled.data.iter().filter(|v| **v == 100).count();
    debug!("Occupied cells after scaling: {}", occupied);

    let bitmap = transformer.compress(&grid)?;
    info!(
        "Compressed map: {} bytes of {} ({} raw cells)",
        bitmap.data.len(),
        bitmap.format,
        grid.data.len()
    );

    std::fs::write("scaled_map.png", &bitmap.data)?;
    info!("Wrote scaled_map.png");

    Ok(())
}
