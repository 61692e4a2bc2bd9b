mod cli;
mod logger;

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;

use cli::Args;
use logger::init_logger;
use phong_tracer::{
    algebra::Color,
    loader,
    output::{ImageWriter, PixelSink},
    renderer::SimpleRayTracer,
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    // ── scene ─────────────────────────────────────────────────────────────
    let loaded = loader::load(&args.scene)
        .with_context(|| format!("loading {}", args.scene.display()))?;
    let scene = loaded.scene.finalize();
    let camera = loaded
        .camera
        .multithreading(!args.single_thread)
        .progress(!args.quiet)
        .build()
        .context("camera settings")?;

    let (nx, ny) = camera.resolution();
    info!("camera   : {:?} → {:?}", camera.location(), camera.to().xyz());
    info!("image    : {nx}x{ny}, {} threads", if args.single_thread { 1 } else { rayon::current_num_threads() });
    info!("objects  : {}", scene.geometries.len());
    info!("lights   : {}", scene.lights.len());

    // ── render ────────────────────────────────────────────────────────────
    let mut writer = ImageWriter::new(&args.dir, nx, ny).with_tone_map(args.tone_map.into());
    let tracer = SimpleRayTracer::new(&scene);
    let start = Instant::now();
    camera.render(&tracer, &mut writer)?;
    info!("rendered in {:.2?}", start.elapsed());

    if let Some(interval) = args.grid {
        camera.print_grid(interval, Color::WHITE, &mut writer)?;
    }

    let name = args.output.clone().unwrap_or_else(|| scene.name.clone());
    writer.flush(&name).with_context(|| format!("writing {name}"))?;
    info!("Saved → {}", writer.path_for(&name).display());
    Ok(())
}
