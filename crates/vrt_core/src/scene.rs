//! Reference scene for hosts and tests.
//!
//! The kernel never builds geometry itself. This sphere-only scene implements
//! the three host interfaces (`Intersector`, `MaterialCatalog`,
//! `LightInventory`) so the kernel can be driven end to end.

use std::f32::consts::PI;

use vrt_math::{Interval, Ray, Vec2, Vec3};

use crate::error::MaterialError;
use crate::hit::HitRecord;
use crate::intersector::{Intersector, LayerMask};
use crate::light::{LightInventory, SceneLight};
use crate::material::{Material, MaterialCatalog, MaterialId};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    /// Material of the surface (None renders the diagnostic color)
    pub material: Option<MaterialId>,
    /// Scene layer, checked against the query's `LayerMask`
    pub layer: u32,
}

impl Sphere {
    /// Create a new sphere on layer 0.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material: Some(material),
            layer: 0,
        }
    }

    /// Create a sphere with no material assigned.
    pub fn untextured(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material: None,
            layer: 0,
        }
    }

    /// Move the sphere to another layer.
    pub fn on_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> Vec2 {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        Vec2::new(phi / (2.0 * PI), theta / PI)
    }

    /// Nearest intersection strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let outward_normal = (point - self.center) / self.radius;
        // Distance is reported in world units, as a physics raycast does
        let distance = root * a.sqrt();

        let mut hit = HitRecord::new(point, outward_normal, distance)
            .with_uv(Self::get_sphere_uv(outward_normal));
        if let Some(material) = self.material {
            hit = hit.with_material(material);
        }
        Some(hit)
    }
}

/// A complete scene containing spheres, materials and lights.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,

    pub materials: Vec<Material>,

    pub lights: Vec<SceneLight>,

    /// Scene name (for logging)
    pub name: String,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material to the scene and return its ID.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    /// Add a sphere.
    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    /// Add a light.
    pub fn add_light(&mut self, light: SceneLight) {
        self.lights.push(light);
    }

    /// Get a material by ID.
    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }
}

impl Intersector for Scene {
    fn intersect(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<HitRecord> {
        // Work in ray parameter space; the limit is a world distance
        let len = ray.direction().length();
        if len == 0.0 {
            return None;
        }
        let mut ray_t = Interval::new(0.0, max_distance / len);
        let mut nearest = None;

        for sphere in self.spheres.iter().filter(|s| layers.contains(s.layer)) {
            if let Some(hit) = sphere.hit(ray, ray_t) {
                ray_t = ray_t.closer_than(hit.distance() / len);
                nearest = Some(hit);
            }
        }

        nearest
    }
}

impl MaterialCatalog for Scene {
    fn material(&self, hit: &HitRecord) -> Result<&Material, MaterialError> {
        let id = hit.material().ok_or(MaterialError::Missing)?;
        self.get_material(id).ok_or(MaterialError::Unknown(id))
    }
}

impl LightInventory for Scene {
    fn scene_lights(&self) -> Vec<SceneLight> {
        self.lights.clone()
    }
}
