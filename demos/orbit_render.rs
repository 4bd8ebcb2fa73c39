//! Orbit a camera around a mesh and report the lines drawn in every frame
//!
//! Runs the full pipeline headless: feature size, view-dependent fields,
//! silhouettes and suggestive contours per frame. Per-frame statistics are
//! printed as JSON lines, or written to a file with `--stats`.

use anyhow::{Context, Result};
use clap::Parser;
use contourkit_core::Transform3D;
use contourkit_demos::{FrameStats, RenderConfig, ShapeConfig};
use contourkit_render::OrbitCamera;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orbit_render", about = "Render contours from an orbiting camera")]
struct Cli {
    /// JSON render configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Raw triangle mesh as JSON, overrides the configured shape
    #[arg(long)]
    mesh: Option<PathBuf>,
    #[arg(long)]
    frames: Option<usize>,
    /// Viewer keys to apply before rendering, e.g. "zf"
    #[arg(long)]
    keys: Option<String>,
    /// Write the per-frame statistics here instead of stdout
    #[arg(long)]
    stats: Option<PathBuf>,
    /// Print the effective configuration and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    env_logger::builder().init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(path) = cli.mesh {
        config.shape = ShapeConfig::Mesh { path };
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if let Some(keys) = cli.keys {
        config.keys = keys;
    }
    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut viewer = config.build_viewer()?;
    viewer.reset_view();
    let sphere = viewer.bounding_sphere();
    log::info!(
        "scene radius {:.3}, feature size {:.4}",
        sphere.radius,
        viewer.models()[0].feature_size()
    );

    let mut camera = OrbitCamera::framing(&sphere, config.distance);
    camera.orbit(0.0, config.elevation);

    let mut out: Box<dyn Write> = match &cli.stats {
        Some(path) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    for index in 0..config.frames {
        viewer.set_global_transform(Transform3D::from(camera.view_matrix()));
        let frames = viewer.render_frame();
        for frame in &frames {
            let stats = FrameStats::from_frame(index, frame);
            log::debug!(
                "frame {index}: {} silhouette, {} suggestive segments",
                stats.edge_silhouettes + stats.face_silhouettes,
                stats.suggestive_contours
            );
            writeln!(out, "{}", serde_json::to_string(&stats)?)?;
        }
        camera.orbit(config.orbit_step, 0.0);
    }
    out.flush()?;
    log::info!("rendered {} frames", config.frames);
    Ok(())
}
