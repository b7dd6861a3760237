//! Light sources the shaders integrate over.

use vrt_core::{Color, HitRecord, SceneLight};
use vrt_math::{Ray, Vec3};

use crate::sampler::{Sampler, SamplingStrategy};
use crate::scatter::SELF_HIT_EPSILON;
use crate::tracer::{TraceState, Tracer};

/// Up vector for the occluder frame, nudged off-axis so it is never
/// parallel to a normal pointing straight up.
const JITTERED_UP: Vec3 = Vec3::new(0.0072, 1.0, 0.0034);

/// Constant ambient radiance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ambient {
    pub ls: f32,
    pub color: Color,
}

/// Ambient radiance scaled by how much of the hemisphere is unoccluded.
#[derive(Debug, Clone)]
pub struct AmbientOccluder {
    pub ls: f32,
    pub color: Color,
    /// Occlusion rays per shading point
    pub samples: usize,
    /// Hemisphere sample buffer; each trace state draws from its own fork
    sampler: Sampler,
}

impl AmbientOccluder {
    pub fn new(ls: f32, color: Color, samples: usize, strategy: SamplingStrategy, seed: u64) -> Self {
        let samples = samples.max(1);
        Self {
            ls,
            color,
            samples,
            sampler: Sampler::unit(strategy, samples, 83, seed),
        }
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    fn radiance(&self, hit: &HitRecord, tracer: &Tracer, state: &mut TraceState) -> Color {
        let w = hit.normal();
        let v = w.cross(JITTERED_UP).normalize();
        let u = v.cross(w);

        let unoccluded = self.ls * self.color;
        let sampler = state.occlusion_sampler(&self.sampler);

        let mut total = Color::ZERO;
        for _ in 0..self.samples {
            let sp = sampler.sample_hemisphere();
            let direction = sp.x * u + sp.y * v + sp.z * w;
            let shadow_ray = Ray::offset(hit.point(), direction, SELF_HIT_EPSILON);

            if !tracer.occluded(&shadow_ray, f32::INFINITY) {
                total += unoccluded;
            }
        }
        total / self.samples as f32
    }
}

/// Light emitted from a single point, without distance falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub ls: f32,
    pub color: Color,
    pub position: Vec3,
    pub shadows: bool,
}

/// Parallel light arriving from a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub ls: f32,
    pub color: Color,
    /// Unit vector from the surface towards the light
    pub direction: Vec3,
    pub shadows: bool,
}

impl DirectionalLight {
    /// Light travelling along `forward`.
    pub fn from_forward(ls: f32, color: Color, forward: Vec3) -> Self {
        Self {
            ls,
            color,
            direction: -forward.normalize_or_zero(),
            shadows: true,
        }
    }
}

/// A light source.
#[derive(Debug, Clone)]
pub enum Light {
    Ambient(Ambient),
    AmbientOccluder(AmbientOccluder),
    Point(PointLight),
    Directional(DirectionalLight),
}

impl Light {
    pub fn ambient(ls: f32, color: Color) -> Self {
        Light::Ambient(Ambient { ls, color })
    }

    pub fn point(ls: f32, color: Color, position: Vec3) -> Self {
        Light::Point(PointLight {
            ls,
            color,
            position,
            shadows: true,
        })
    }

    pub fn directional(ls: f32, color: Color, forward: Vec3) -> Self {
        Light::Directional(DirectionalLight::from_forward(ls, color, forward))
    }

    /// Direction from the hit towards the light. Zero for ambient lights.
    pub fn direction(&self, hit: &HitRecord) -> Vec3 {
        match self {
            Light::Ambient(_) | Light::AmbientOccluder(_) => Vec3::ZERO,
            Light::Point(light) => (light.position - hit.point()).normalize_or_zero(),
            Light::Directional(light) => light.direction,
        }
    }

    /// Incident radiance at the hit.
    pub fn radiance(&self, hit: &HitRecord, tracer: &Tracer, state: &mut TraceState) -> Color {
        match self {
            Light::Ambient(light) => light.ls * light.color,
            Light::AmbientOccluder(light) => light.radiance(hit, tracer, state),
            Light::Point(light) => light.ls * light.color,
            Light::Directional(light) => light.ls * light.color,
        }
    }

    pub fn casts_shadows(&self) -> bool {
        match self {
            Light::Ambient(_) | Light::AmbientOccluder(_) => false,
            Light::Point(light) => light.shadows,
            Light::Directional(light) => light.shadows,
        }
    }

    /// Whether something blocks `shadow_ray` before it reaches the light.
    pub fn in_shadow(&self, shadow_ray: &Ray, tracer: &Tracer) -> bool {
        match self {
            Light::Ambient(_) | Light::AmbientOccluder(_) => false,
            Light::Point(light) => {
                let distance = (light.position - shadow_ray.origin()).length();
                tracer.occluded(shadow_ray, distance)
            }
            Light::Directional(_) => tracer.occluded(shadow_ray, f32::INFINITY),
        }
    }

    /// Shadow test for light arriving at `hit` from `wi`.
    pub fn shadowed(&self, hit: &HitRecord, wi: Vec3, tracer: &Tracer) -> bool {
        if !self.casts_shadows() {
            return false;
        }
        let shadow_ray = Ray::offset(hit.point(), wi, SELF_HIT_EPSILON);
        self.in_shadow(&shadow_ray, tracer)
    }
}

impl From<SceneLight> for Light {
    fn from(light: SceneLight) -> Self {
        match light {
            SceneLight::Directional {
                forward,
                intensity,
                color,
            } => Light::directional(intensity, color, forward),
            SceneLight::Point {
                position,
                intensity,
                color,
            } => Light::point(intensity, color, position),
        }
    }
}
