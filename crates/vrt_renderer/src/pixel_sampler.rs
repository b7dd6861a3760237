//! Per-pixel sub-ray generation.

use vrt_math::{Ray, Vec2, Vec3};

use crate::sampler::Sampler;

/// Turns one primary ray into the sub-rays of a pixel.
///
/// Each sub-ray keeps the primary origin; its direction is the primary
/// direction plus a sampler offset along the horizontal and vertical axes of
/// the view plane.
#[derive(Debug, Clone)]
pub struct PixelSampler {
    sampler: Sampler,
    h_axis: Vec3,
    v_axis: Vec3,
    anti_aliasing: bool,
}

impl PixelSampler {
    /// Pixel sampler with axes along world X and Y.
    pub fn new(sampler: Sampler) -> Self {
        Self {
            sampler,
            h_axis: Vec3::X,
            v_axis: Vec3::Y,
            anti_aliasing: true,
        }
    }

    /// Set the view plane axes the offsets are applied along.
    pub fn with_axes(mut self, h_axis: Vec3, v_axis: Vec3) -> Self {
        self.h_axis = h_axis;
        self.v_axis = v_axis;
        self
    }

    /// With anti-aliasing off every pixel gets exactly the primary ray.
    pub fn with_anti_aliasing(mut self, enabled: bool) -> Self {
        self.anti_aliasing = enabled;
        self
    }

    /// Same buffer and axes, independent cursor.
    pub fn fork(&self, seed: u64) -> Self {
        Self {
            sampler: self.sampler.fork(seed),
            ..self.clone()
        }
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn anti_aliasing(&self) -> bool {
        self.anti_aliasing
    }

    /// Sub-rays per pixel.
    pub fn ray_count(&self) -> usize {
        if self.anti_aliasing {
            self.sampler.num_samples()
        } else {
            1
        }
    }

    /// Direction of the sub-ray at `offset` from the primary direction.
    pub fn offset_direction(&self, direction: Vec3, offset: Vec2) -> Vec3 {
        direction + self.h_axis * offset.x + self.v_axis * offset.y
    }

    pub fn sub_rays(&mut self, primary: &Ray) -> Vec<Ray> {
        if !self.anti_aliasing {
            return vec![*primary];
        }

        (0..self.sampler.num_samples())
            .map(|_| {
                let offset = self.sampler.sample_unit_square();
                Ray::new(
                    primary.origin(),
                    self.offset_direction(primary.direction(), offset),
                )
            })
            .collect()
    }
}
