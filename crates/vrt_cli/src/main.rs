//! Command line host for the VRT kernel.
//!
//! Builds the demo scene, renders it row by row in parallel and writes a PNG.

mod demo;
mod viewport;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use vrt_math::Vec3;
use vrt_renderer::{Integrator, RenderConfig, Renderer, SamplingStrategy, World};

use crate::viewport::Viewport;

/// Render the demo scene with the VRT Whitted ray tracer.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON render configuration; missing fields take defaults
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Output PNG path
    #[clap(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Image width in pixels
    #[clap(short = 'W', long, default_value_t = 400)]
    width: u32,

    /// Image height in pixels
    #[clap(short = 'H', long, default_value_t = 225)]
    height: u32,

    /// Override the sub-rays per pixel
    #[clap(short, long)]
    samples: Option<u32>,

    /// Override the anti-aliasing pattern
    #[clap(long, value_enum)]
    sampling: Option<CliSampling>,

    /// Override the integrator
    #[clap(short, long, value_enum)]
    integrator: Option<CliIntegrator>,

    /// Override the random seed
    #[clap(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliSampling {
    Regular,
    Random,
    Jittered,
    NRooks,
    MultiJittered,
    Hammersley,
}

impl From<CliSampling> for SamplingStrategy {
    fn from(sampling: CliSampling) -> Self {
        match sampling {
            CliSampling::Regular => SamplingStrategy::Regular,
            CliSampling::Random => SamplingStrategy::Random,
            CliSampling::Jittered => SamplingStrategy::Jittered,
            CliSampling::NRooks => SamplingStrategy::NRooks,
            CliSampling::MultiJittered => SamplingStrategy::MultiJittered,
            CliSampling::Hammersley => SamplingStrategy::Hammersley,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliIntegrator {
    Whitted,
    Scatter,
    RayCast,
}

impl From<CliIntegrator> for Integrator {
    fn from(integrator: CliIntegrator) -> Self {
        match integrator {
            CliIntegrator::Whitted => Integrator::Whitted,
            CliIntegrator::Scatter => Integrator::Scatter,
            CliIntegrator::RayCast => Integrator::RayCast,
        }
    }
}

fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(sampling) = args.sampling {
        config.sampling = sampling.into();
    }
    if let Some(integrator) = args.integrator {
        config.integrator = integrator.into();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    log::info!("Starting VRT render {}x{}", args.width, args.height);

    let start = Instant::now();
    let scene = demo::build_scene();
    let world = World::from_inventory(&scene, &config);
    log::info!("Scene '{}' built in {:?}", scene.name, start.elapsed());

    let viewport = Viewport::look_at(
        Vec3::new(0.0, 2.5, 8.0),
        Vec3::new(0.0, 0.8, 0.0),
        Vec3::Y,
        35.0,
        1.0,
        args.width,
        args.height,
    );

    let renderer = Renderer::new(&world, &scene, &scene, &config)
        .with_origin(viewport.eye())
        .with_pixel_footprint(viewport.pixel_delta_u(), viewport.pixel_delta_v());

    log::info!(
        "Rendering with {:?} integrator, {} sub-rays per pixel",
        config.integrator,
        renderer.samples_per_pixel()
    );

    let start = Instant::now();
    let width = viewport.image_width;
    let height = viewport.image_height;

    let rows: Vec<Vec<[u8; 4]>> = (0..height)
        .into_par_iter()
        .map(|j| {
            // One sampling state per row
            let mut state = renderer.new_state(j as u64);
            (0..width)
                .map(|i| renderer.pixel_rgba(viewport.pixel_direction(i, j), &mut state))
                .collect()
        })
        .collect();

    log::info!("Rendered in {:?}", start.elapsed());

    let mut image = image::RgbaImage::new(width, height);
    for (j, row) in rows.iter().enumerate() {
        for (i, rgba) in row.iter().enumerate() {
            image.put_pixel(i as u32, j as u32, image::Rgba(*rgba));
        }
    }

    image
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    log::info!("Saved to {}", args.output.display());

    Ok(())
}
