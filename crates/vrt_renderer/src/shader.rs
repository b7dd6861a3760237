//! Surface shaders built from material descriptors.

use vrt_core::{Color, HitRecord, Material, MaterialKind};
use vrt_math::{Ray, Vec3};

use crate::brdf::{Brdf, GlossySpecular, Lambertian, PerfectSpecular};
use crate::scatter::{scatter_dielectric, SELF_HIT_EPSILON};
use crate::tracer::{TraceState, Tracer};

/// Diffuse-only shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matte {
    pub ambient_brdf: Lambertian,
    pub diffuse_brdf: Lambertian,
}

impl Matte {
    pub fn new(ka: f32, kd: f32, cd: Color) -> Self {
        Self {
            ambient_brdf: Lambertian::new(ka, cd),
            diffuse_brdf: Lambertian::new(kd, cd),
        }
    }

    fn shade(&self, ray: &Ray, hit: &HitRecord, tracer: &Tracer, state: &mut TraceState) -> Color {
        let wo = -ray.direction().normalize();
        let ambient = self.ambient_brdf.rho(hit, wo) * tracer.world().ambient.radiance(hit, tracer, state);
        ambient + direct_light(hit, tracer, state, |wi| self.diffuse_brdf.f(hit, wo, wi))
    }
}

/// Diffuse shading plus a glossy highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    pub ambient_brdf: Lambertian,
    pub diffuse_brdf: Lambertian,
    pub specular_brdf: GlossySpecular,
}

impl Phong {
    pub fn new(ka: f32, kd: f32, cd: Color, ks: f32, exp: f32) -> Self {
        Self {
            ambient_brdf: Lambertian::new(ka, cd),
            diffuse_brdf: Lambertian::new(kd, cd),
            specular_brdf: GlossySpecular::new(ks, Color::ONE, exp),
        }
    }

    fn shade(&self, ray: &Ray, hit: &HitRecord, tracer: &Tracer, state: &mut TraceState) -> Color {
        let wo = -ray.direction().normalize();
        let ambient = self.ambient_brdf.rho(hit, wo) * tracer.world().ambient.radiance(hit, tracer, state);
        ambient
            + direct_light(hit, tracer, state, |wi| {
                self.diffuse_brdf.f(hit, wo, wi) + self.specular_brdf.f(hit, wo, wi)
            })
    }
}

/// Phong plus a recursive mirror bounce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflective {
    pub phong: Phong,
    pub reflective_brdf: PerfectSpecular,
}

impl Reflective {
    fn shade(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        depth: u32,
        tracer: &Tracer,
        state: &mut TraceState,
    ) -> Color {
        let local = self.phong.shade(ray, hit, tracer, state);

        let wo = -ray.direction().normalize();
        let (fr, wi) = self.reflective_brdf.sample_f(hit, wo);
        let reflected_ray = Ray::offset(hit.point(), wi, SELF_HIT_EPSILON);

        // fr carries 1 / |n·wi|, so this is kr * cr * L
        local + fr * tracer.trace(&reflected_ray, depth + 1, state) * hit.normal().dot(wi).abs()
    }
}

/// Glass: a highlight plus one reflected or refracted bounce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transparent {
    pub specular_brdf: GlossySpecular,
    pub refractive_index: f32,
    pub transmission_color: Color,
}

impl Transparent {
    fn shade(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        depth: u32,
        tracer: &Tracer,
        state: &mut TraceState,
    ) -> Color {
        let wo = -ray.direction().normalize();
        let local = direct_light(hit, tracer, state, |wi| self.specular_brdf.f(hit, wo, wi));

        let scatter = scatter_dielectric(ray, hit, self.refractive_index, &mut state.rng);
        let transmitted = tracer.trace(&scatter.ray, depth + 1, state);

        local + self.transmission_color * scatter.attenuation * transmitted
    }
}

/// A surface shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shader {
    Matte(Matte),
    Phong(Phong),
    Reflective(Reflective),
    Transparent(Transparent),
}

impl Shader {
    /// Choose and configure the shader for a material descriptor.
    ///
    /// Solid colors get a Phong highlight only when `ks > 0`.
    pub fn for_material(material: &Material) -> Self {
        let k = &material.coefficients;
        let cd = material.color;

        match material.kind {
            MaterialKind::SolidColor if k.ks > 0.0 => {
                Shader::Phong(Phong::new(k.ka, k.kd, cd, k.ks, k.exp))
            }
            MaterialKind::SolidColor => Shader::Matte(Matte::new(k.ka, k.kd, cd)),
            MaterialKind::Metal => Shader::Reflective(Reflective {
                phong: Phong::new(k.ka, k.kd, cd, k.ks, k.exp),
                reflective_brdf: PerfectSpecular::new(k.kr, k.reflection_color),
            }),
            MaterialKind::Dielectric => Shader::Transparent(Transparent {
                specular_brdf: GlossySpecular::new(k.ks, Color::ONE, k.exp),
                refractive_index: k.refractive_index,
                // Base color tints the glass
                transmission_color: k.transmission_color * cd,
            }),
        }
    }

    pub fn shade(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        depth: u32,
        tracer: &Tracer,
        state: &mut TraceState,
    ) -> Color {
        match self {
            Shader::Matte(shader) => shader.shade(ray, hit, tracer, state),
            Shader::Phong(shader) => shader.shade(ray, hit, tracer, state),
            Shader::Reflective(shader) => shader.shade(ray, hit, depth, tracer, state),
            Shader::Transparent(shader) => shader.shade(ray, hit, depth, tracer, state),
        }
    }
}

/// Sum of `brdf(wi) * L * (n·wi)` over the world's unshadowed lights.
fn direct_light(
    hit: &HitRecord,
    tracer: &Tracer,
    state: &mut TraceState,
    brdf: impl Fn(Vec3) -> Color,
) -> Color {
    let mut l = Color::ZERO;

    for light in &tracer.world().lights {
        let wi = light.direction(hit);
        let n_dot_wi = hit.normal().dot(wi);

        if n_dot_wi > 0.0 && !light.shadowed(hit, wi, tracer) {
            l += brdf(wi) * light.radiance(hit, tracer, state) * n_dot_wi;
        }
    }

    l
}
