//! Intersection record produced by an `Intersector`.

use vrt_math::{Vec2, Vec3};

use crate::material::MaterialId;

/// Record of a ray-surface intersection.
///
/// Built by the intersector and read-only afterwards; the shading code only
/// sees it through accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    point: Vec3,
    normal: Vec3,
    distance: f32,
    material: Option<MaterialId>,
    uv: Option<Vec2>,
}

impl HitRecord {
    /// Create a hit at `point` with the given outward normal and ray distance.
    ///
    /// The normal is normalized here so every consumer can rely on it.
    pub fn new(point: Vec3, normal: Vec3, distance: f32) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            distance,
            material: None,
            uv: None,
        }
    }

    /// Attach the material of the surface that was hit.
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// Attach a texture coordinate.
    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = Some(uv);
        self
    }

    /// Point of intersection
    #[inline]
    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// Unit outward surface normal
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Distance from the ray origin to the hit, in world units
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn material(&self) -> Option<MaterialId> {
        self.material
    }

    #[inline]
    pub fn uv(&self) -> Option<Vec2> {
        self.uv
    }
}
