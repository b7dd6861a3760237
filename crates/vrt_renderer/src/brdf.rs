//! Bidirectional reflectance distribution functions.
//!
//! `wo` points from the surface towards the viewer and `wi` towards the
//! light; both are unit vectors.

use vrt_core::{Color, HitRecord};
use vrt_math::{Vec3, INV_PI};

/// Reflectance terms a shader can ask for. Both default to black.
pub trait Brdf {
    /// Reflected radiance fraction for the pair `wo`, `wi`.
    fn f(&self, _hit: &HitRecord, _wo: Vec3, _wi: Vec3) -> Color {
        Color::ZERO
    }

    /// Bihemispherical reflectance, used for the ambient term.
    fn rho(&self, _hit: &HitRecord, _wo: Vec3) -> Color {
        Color::ZERO
    }
}

/// Perfectly diffuse reflection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    pub kd: f32,
    pub cd: Color,
}

impl Lambertian {
    pub fn new(kd: f32, cd: Color) -> Self {
        Self { kd, cd }
    }
}

impl Brdf for Lambertian {
    fn f(&self, _hit: &HitRecord, _wo: Vec3, _wi: Vec3) -> Color {
        self.kd * self.cd * INV_PI
    }

    fn rho(&self, _hit: &HitRecord, _wo: Vec3) -> Color {
        self.kd * self.cd
    }
}

/// Phong highlight lobe around the mirror direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlossySpecular {
    pub ks: f32,
    pub cs: Color,
    pub exp: f32,
}

impl GlossySpecular {
    pub fn new(ks: f32, cs: Color, exp: f32) -> Self {
        Self { ks, cs, exp }
    }
}

impl Brdf for GlossySpecular {
    fn f(&self, hit: &HitRecord, wo: Vec3, wi: Vec3) -> Color {
        let n = hit.normal();
        let r = -wi + 2.0 * n.dot(wi) * n;
        let r_dot_wo = r.dot(wo);

        if r_dot_wo > 0.0 {
            self.ks * self.cs * r_dot_wo.powf(self.exp)
        } else {
            Color::ZERO
        }
    }
}

/// Mirror reflection. Only meaningful through `sample_f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectSpecular {
    pub kr: f32,
    pub cr: Color,
}

impl PerfectSpecular {
    pub fn new(kr: f32, cr: Color) -> Self {
        Self { kr, cr }
    }

    /// Mirror direction of `wo` about the normal.
    pub fn mirror(hit: &HitRecord, wo: Vec3) -> Vec3 {
        let n = hit.normal();
        -wo + 2.0 * n.dot(wo) * n
    }

    /// Returns `(kr * cr / |n·wi|, wi)`.
    ///
    /// A grazing `wi` (perpendicular to the normal) reflects nothing.
    pub fn sample_f(&self, hit: &HitRecord, wo: Vec3) -> (Color, Vec3) {
        let wi = Self::mirror(hit, wo);
        let n_dot_wi = hit.normal().dot(wi).abs();

        if n_dot_wi > 0.0 {
            (self.kr * self.cr / n_dot_wi, wi)
        } else {
            (Color::ZERO, wi)
        }
    }

    /// Returns `(kr * cr, wi, pdf)` with `pdf = |n·wi|`.
    pub fn sample_f_pdf(&self, hit: &HitRecord, wo: Vec3) -> (Color, Vec3, f32) {
        let wi = Self::mirror(hit, wo);
        let pdf = hit.normal().dot(wi).abs();
        (self.kr * self.cr, wi, pdf)
    }
}

impl Brdf for PerfectSpecular {}
