//! Per-pixel entry point for the host.

use std::sync::Arc;

use rayon::prelude::*;
use vrt_core::{Color, HitRecord, Intersector, MaterialCatalog};
use vrt_math::{Ray, Vec2, Vec3};

use crate::color::{ColorAccumulator, ColorPipeline};
use crate::config::RenderConfig;
use crate::pixel_sampler::PixelSampler;
use crate::sampler::Sampler;
use crate::tracer::{TraceState, Tracer};
use crate::world::World;

/// Multiplier that spreads consecutive stream ids across the seed space.
const STREAM_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Mutable sampling state of one render consumer (a worker, a row, a tile).
#[derive(Debug, Clone)]
pub struct RenderState {
    pixels: PixelSampler,
    trace: TraceState,
}

impl RenderState {
    pub fn trace_state(&mut self) -> &mut TraceState {
        &mut self.trace
    }

    pub fn pixel_sampler(&self) -> &PixelSampler {
        &self.pixels
    }
}

/// Turns primary ray directions into pixel colors.
pub struct Renderer<'a> {
    tracer: Tracer<'a>,
    pixels: PixelSampler,
    pipeline: ColorPipeline,
    origin: Vec3,
    seed: u64,
}

impl<'a> Renderer<'a> {
    pub fn new(
        world: &'a World,
        intersector: &'a dyn Intersector,
        materials: &'a dyn MaterialCatalog,
        config: &RenderConfig,
    ) -> Self {
        let step = Vec2::from(config.pixel_step);
        let sampler = Sampler::new(
            config.sampling,
            config.samples_per_pixel as usize,
            config.sample_sets as usize,
            step,
            config.seed,
        );
        let pixels = PixelSampler::new(sampler).with_anti_aliasing(config.anti_aliasing);

        Self {
            tracer: Tracer::new(world, intersector, materials).with_integrator(config.integrator),
            pixels,
            pipeline: config.color_pipeline(),
            origin: Vec3::ZERO,
            seed: config.seed,
        }
    }

    /// Origin shared by every primary ray (the eye).
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Lay the sub-pixel offsets along the view plane's pixel edges.
    ///
    /// `h` and `v` span one pixel; the existing pattern is rescaled to cover
    /// that footprint.
    pub fn with_pixel_footprint(mut self, h: Vec3, v: Vec3) -> Self {
        let step = Vec2::new(h.length(), v.length());
        let buffer = self.pixels.sampler().buffer().rescaled(step);

        self.pixels = PixelSampler::new(Sampler::from_buffer(Arc::new(buffer), self.seed))
            .with_axes(h.normalize_or_zero(), v.normalize_or_zero())
            .with_anti_aliasing(self.pixels.anti_aliasing());
        self
    }

    pub fn tracer(&self) -> &Tracer<'a> {
        &self.tracer
    }

    pub fn pipeline(&self) -> &ColorPipeline {
        &self.pipeline
    }

    /// Sub-rays per pixel.
    pub fn samples_per_pixel(&self) -> usize {
        self.pixels.ray_count()
    }

    /// Fresh state for one consumer. Different `stream`s draw independent
    /// random sequences.
    pub fn new_state(&self, stream: u64) -> RenderState {
        let seed = self.seed ^ stream.wrapping_add(1).wrapping_mul(STREAM_SPREAD);
        RenderState {
            pixels: self.pixels.fork(seed),
            trace: TraceState::new(seed.rotate_left(17)),
        }
    }

    /// Averaged linear color of the pixel whose corner lies along `direction`.
    ///
    /// Sub-rays are intersected as one parallel batch; shading starts once
    /// every query has returned.
    pub fn pixel_color(&self, direction: Vec3, state: &mut RenderState) -> Color {
        let primary = Ray::new(self.origin, direction);
        let rays = state.pixels.sub_rays(&primary);

        let hits: Vec<Option<HitRecord>> = rays
            .par_iter()
            .map(|ray| self.tracer.intersect(ray))
            .collect();

        let mut accumulator = ColorAccumulator::new();
        for (ray, hit) in rays.iter().zip(&hits) {
            accumulator.add(self.tracer.shade_hit(ray, hit.as_ref(), 0, &mut state.trace));
        }
        accumulator.mean()
    }

    /// Display RGBA of the pixel.
    pub fn pixel_rgba(&self, direction: Vec3, state: &mut RenderState) -> [u8; 4] {
        self.pipeline.to_rgba8(self.pixel_color(direction, state))
    }
}
