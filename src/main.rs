//! Shape Morph - Run the diamond/heart/spade morph animation.
//!
//! By default this opens a 500x500 window. Built without the `window` feature
//! it renders one full cycle off-screen and prints the frame at each pause.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use shape_morph::schema::MorphConfig;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let config = MorphConfig::default();
    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    match serde_json::to_string(&config) {
        Ok(json) => log::debug!("Configuration: {}", json),
        Err(e) => log::warn!("Could not serialize configuration: {}", e),
    }

    if let Err(e) = run(config) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "window")]
fn run(config: MorphConfig) -> Result<(), Box<dyn std::error::Error>> {
    shape_morph::window::run(config)?;
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run(config: MorphConfig) -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Instant;

    use shape_morph::animation::DriverParams;
    use shape_morph::render::{MorphRenderer, run_cycle};

    let mut surface = headless_surface(&config)?;
    let params = DriverParams::from(&config);
    let mut renderer = MorphRenderer::from_config(&config);

    println!("Shape Morph (headless)");
    println!("======================");
    println!("Surface: {}x{}", config.window.width, config.window.height);
    println!("Step: {}, pause: {} ticks", config.step, config.pause_ticks);
    println!();

    let start = Instant::now();
    let report = run_cycle(
        &mut renderer,
        surface.as_mut(),
        &params,
        config.window.background.to_rgba8(),
    )?;
    let elapsed = start.elapsed();

    println!("Pauses:");
    for pause in &report.pauses {
        println!(
            "  {:<8} phase {:.3}: {} of {} pixels filled ({:.1}%)",
            pause.shape.name(),
            pause.phase,
            pause.stats.filled,
            pause.stats.total,
            pause.stats.coverage() * 100.0
        );
    }
    println!();
    println!(
        "Cycle: {} ticks ({:.1}s at {}ms per tick)",
        report.ticks,
        report.ticks as f32 * config.tick_interval_ms as f32 / 1000.0,
        config.tick_interval_ms
    );
    println!(
        "Time: {:.2}s ({:.1} frames/s)",
        elapsed.as_secs_f32(),
        report.frames as f32 / elapsed.as_secs_f32()
    );
    Ok(())
}

#[cfg(all(not(feature = "window"), feature = "gpu"))]
fn headless_surface(
    config: &MorphConfig,
) -> Result<Box<dyn shape_morph::render::Framebuffer>, Box<dyn std::error::Error>> {
    use shape_morph::render::gpu::{GpuCanvas, GpuError};

    let (width, height) = (config.window.width, config.window.height);
    match pollster::block_on(GpuCanvas::new(width, height, config.window.background)) {
        Ok(canvas) => {
            log::info!("Using GPU rasterizer");
            Ok(Box::new(canvas))
        }
        Err(GpuError::NoAdapter) => {
            log::warn!("No GPU adapter, falling back to CPU rasterizer");
            Ok(Box::new(cpu_canvas(config)))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(all(not(feature = "window"), not(feature = "gpu")))]
fn headless_surface(
    config: &MorphConfig,
) -> Result<Box<dyn shape_morph::render::Framebuffer>, Box<dyn std::error::Error>> {
    log::info!("Using CPU rasterizer");
    Ok(Box::new(cpu_canvas(config)))
}

#[cfg(not(feature = "window"))]
fn cpu_canvas(config: &MorphConfig) -> shape_morph::Canvas {
    shape_morph::Canvas::new(
        config.window.width as usize,
        config.window.height as usize,
        config.window.background,
    )
}
