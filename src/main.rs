//! hyper4d - rotate a hypercube in 4D and print its 3D reductions
//!
//! Runs one frame of the renderer-side path using the loaded configuration:
//! compose the configured rotation, project all 16 vertices, then slice the
//! 32 edges at the configured W plane.

use hyper4d::config::AppConfig;
use hyper4d::frame::FrameProjector;
use hyper4d_math::Vec4;

/// Unit hypercube: bit k of the index picks the sign of axis k
fn hypercube() -> (Vec<Vec4>, Vec<[usize; 2]>) {
    let h = 0.5;
    let vertices = (0..16usize)
        .map(|i| {
            let c = |bit: usize| if i & (1 << bit) != 0 { h } else { -h };
            Vec4::new(c(0), c(1), c(2), c(3))
        })
        .collect();

    let mut edges = Vec::with_capacity(32);
    for i in 0..16usize {
        for j in (i + 1)..16 {
            if (i ^ j).is_power_of_two() {
                edges.push([i, j]);
            }
        }
    }
    (vertices, edges)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting hyper4d");
    if let Err(e) = &loaded {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let (vertices, edges) = hypercube();
    let mut projector = FrameProjector::new(&config);
    log::info!(
        "Projection {:?}, rotation angles {:?}",
        projector.projection(),
        config.rotation.to_array()
    );

    let projected = projector.project(&vertices)?;
    for (i, p) in projected.chunks_exact(3).enumerate() {
        println!("v{:02} ({:>9.5}, {:>9.5}, {:>9.5})", i, p[0], p[1], p[2]);
    }
    log::info!("Projected {} vertices ({} bytes)", vertices.len(), projector.gpu_bytes().len());

    let outline = projector.slice_outline(&vertices, &edges)?;
    for p in outline.chunks_exact(3) {
        println!("slice ({:>9.5}, {:>9.5}, {:>9.5})", p[0], p[1], p[2]);
    }
    log::info!(
        "Slice at w = {} crosses {} edges",
        config.slice.w_plane,
        outline.len() / 3
    );

    Ok(())
}
