//! The recursive ray tracer.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use vrt_core::{Color, HitRecord, Intersector, Material, MaterialCatalog, MaterialKind};
use vrt_math::{Ray, Vec2};

use crate::sampler::Sampler;
use crate::scatter::{scatter_dielectric, scatter_diffuse, scatter_metal, SELF_HIT_EPSILON};
use crate::shader::Shader;
use crate::world::World;

/// Shown where a hit's material cannot be resolved.
pub const DIAGNOSTIC_COLOR: Color = Color::new(1.0, 0.0, 0.0);

/// How a hit turns into a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Integrator {
    /// Direct lighting through shaders, recursive mirror and glass bounces
    #[default]
    Whitted,
    /// Recursive attenuation along one scattered ray per hit
    Scatter,
    /// White on hit, background on miss
    RayCast,
}

/// Mutable state of one trace consumer.
///
/// Never shared between threads: every worker owns its own.
#[derive(Debug, Clone)]
pub struct TraceState {
    pub(crate) rng: StdRng,
    /// Fork of the ambient occluder's sampler, taken on first use
    pub(crate) occlusion: Option<Sampler>,
}

impl TraceState {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            occlusion: None,
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// This consumer's fork of `prototype`.
    pub(crate) fn occlusion_sampler(&mut self, prototype: &Sampler) -> &mut Sampler {
        let TraceState { rng, occlusion } = self;
        occlusion.get_or_insert_with(|| prototype.fork(rng.next_u64()))
    }
}

/// Traces rays through a host scene.
#[derive(Clone, Copy)]
pub struct Tracer<'a> {
    world: &'a World,
    intersector: &'a dyn Intersector,
    materials: &'a dyn MaterialCatalog,
    integrator: Integrator,
}

impl<'a> Tracer<'a> {
    pub fn new(
        world: &'a World,
        intersector: &'a dyn Intersector,
        materials: &'a dyn MaterialCatalog,
    ) -> Self {
        Self {
            world,
            intersector,
            materials,
            integrator: Integrator::Whitted,
        }
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn world(&self) -> &'a World {
        self.world
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// Nearest hit within the world's range and layers.
    pub fn intersect(&self, ray: &Ray) -> Option<HitRecord> {
        self.intersector
            .intersect(ray, self.world.max_distance, self.world.layers)
    }

    /// Whether anything lies on `ray` within `max_distance`, capped at the
    /// world's range.
    pub fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        let range = max_distance.min(self.world.max_distance);
        self.intersector
            .intersect(ray, range, self.world.layers)
            .is_some_and(|hit| hit.distance() > SELF_HIT_EPSILON)
    }

    /// Color seen along `ray`. Beyond the world's maximum depth this is black
    /// and no intersection query is made.
    pub fn trace(&self, ray: &Ray, depth: u32, state: &mut TraceState) -> Color {
        if depth > self.world.max_depth {
            return Color::ZERO;
        }

        let hit = self.intersect(ray);
        self.shade_hit(ray, hit.as_ref(), depth, state)
    }

    /// Color for a hit that was already queried, e.g. in a batch.
    pub fn shade_hit(
        &self,
        ray: &Ray,
        hit: Option<&HitRecord>,
        depth: u32,
        state: &mut TraceState,
    ) -> Color {
        if depth > self.world.max_depth {
            return Color::ZERO;
        }

        let hit = match hit {
            Some(hit) if hit.distance() > SELF_HIT_EPSILON => hit,
            _ => return self.world.background.color(ray.direction()),
        };

        if self.integrator == Integrator::RayCast {
            return Color::ONE;
        }

        let material = match self.materials.material(hit) {
            Ok(material) => material,
            Err(err) => {
                log::debug!("{}, shading with diagnostic color", err);
                return DIAGNOSTIC_COLOR;
            }
        };

        if let Some(texture) = &material.texture {
            return texture.sample(hit.uv().unwrap_or(Vec2::ZERO));
        }

        match self.integrator {
            Integrator::Whitted => {
                Shader::for_material(material).shade(ray, hit, depth, self, state)
            }
            Integrator::Scatter => self.scatter(ray, hit, material, depth, state),
            Integrator::RayCast => Color::ONE,
        }
    }

    fn scatter(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        material: &Material,
        depth: u32,
        state: &mut TraceState,
    ) -> Color {
        let rng = &mut state.rng;
        let scattered = match material.kind {
            MaterialKind::SolidColor => Some(scatter_diffuse(hit, material.color, rng)),
            MaterialKind::Metal => scatter_metal(ray, hit, material.color, rng),
            MaterialKind::Dielectric => Some(scatter_dielectric(
                ray,
                hit,
                material.coefficients.refractive_index,
                rng,
            )),
        };

        match scattered {
            Some(s) => s.attenuation * self.trace(&s.ray, depth + 1, state),
            None => Color::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::Light;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use crate::world::Background;
    use vrt_core::{
        LayerMask, MaterialCoefficients, MaterialError, MaterialId, Scene, Sphere, Texture,
    };
    use vrt_math::Vec3;

    /// Counts queries and forwards them to a scene.
    struct CountingIntersector<'a> {
        scene: &'a Scene,
        calls: AtomicUsize,
    }

    impl<'a> CountingIntersector<'a> {
        fn new(scene: &'a Scene) -> Self {
            Self {
                scene,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Intersector for CountingIntersector<'_> {
        fn intersect(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<HitRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.scene.intersect(ray, max_distance, layers)
        }
    }

    fn dark_world() -> World {
        World::new(Light::ambient(0.0, Color::ONE))
    }

    #[test]
    fn test_depth_cutoff_skips_query() {
        let scene = Scene::new("empty");
        let counter = CountingIntersector::new(&scene);
        let world = dark_world();
        let tracer = Tracer::new(&world, &counter, &scene);
        let mut state = TraceState::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = tracer.trace(&ray, world.max_depth + 1, &mut state);

        assert_eq!(color, Color::ZERO);
        assert_eq!(counter.calls(), 0);
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::new("empty");
        let world = dark_world();
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(tracer.trace(&ray, 0, &mut state), Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn test_near_hit_is_a_miss() {
        let world = dark_world();
        let scene = Scene::new("empty");
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = HitRecord::new(Vec3::new(0.0, 0.0005, 0.0), Vec3::NEG_Y, 0.0005)
            .with_material(MaterialId(0));
        assert_eq!(
            tracer.shade_hit(&ray, Some(&hit), 0, &mut state),
            Color::new(0.5, 0.7, 1.0)
        );
    }

    #[test]
    fn test_missing_material_is_diagnostic() {
        let mut scene = Scene::new("untextured");
        scene.add_sphere(Sphere::untextured(Vec3::new(0.0, 0.0, -2.0), 0.5));
        let world = dark_world();
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(tracer.trace(&ray, 0, &mut state), DIAGNOSTIC_COLOR);
        assert_eq!(
            scene.material(&tracer.intersect(&ray).unwrap()).unwrap_err(),
            MaterialError::Missing
        );
    }

    #[test]
    fn test_texture_short_circuits_shading() {
        let mut scene = Scene::new("textured");
        let texture = Arc::new(Texture::solid_color(Color::new(0.2, 0.4, 0.6)));
        let id = scene.add_material(Material::solid("Tex", Color::ONE).with_texture(texture));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, id));

        let world = dark_world();
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = tracer.trace(&ray, 0, &mut state);
        assert!((color - Color::new(0.2, 0.4, 0.6)).length() < 1e-6);
    }

    #[test]
    fn test_matte_sphere_under_point_light() {
        let mut scene = Scene::new("matte");
        let grey = scene.add_material(Material::solid("Grey", Color::splat(0.8)));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, grey));

        let world = dark_world().with_light(Light::point(3.0, Color::ONE, Vec3::new(0.0, 10.0, -3.0)));
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        // Grazing the top and the bottom of the sphere from the side
        let top = tracer.trace(
            &Ray::new(Vec3::new(0.0, 0.7, 0.0), Vec3::NEG_Z),
            0,
            &mut state,
        );
        let bottom = tracer.trace(
            &Ray::new(Vec3::new(0.0, -0.7, 0.0), Vec3::NEG_Z),
            0,
            &mut state,
        );

        assert!(top.x > 0.0);
        assert!(top.x > bottom.x);
        assert_eq!(bottom, Color::ZERO);
    }

    #[test]
    fn test_dielectric_dead_center_queries_once_per_bounce() {
        let mut scene = Scene::new("glass");
        let glass = scene.add_material(Material::dielectric("Dielectric", Color::ONE, 1.5));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, glass));

        let counter = CountingIntersector::new(&scene);
        let world = dark_world().with_max_depth(1);
        let tracer = Tracer::new(&world, &counter, &scene);
        let mut state = TraceState::new(7);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = tracer.intersect(&ray).unwrap();
        assert_eq!(counter.calls(), 1);

        // The chosen bounce is queried once at depth 1; its own bounce
        // would be depth 2 and is cut off
        tracer.shade_hit(&ray, Some(&hit), 0, &mut state);
        assert_eq!(counter.calls(), 2);
    }

    #[test]
    fn test_metal_reflects_background() {
        let mut scene = Scene::new("mirror");
        // A red base color must not tint what the mirror shows
        let mut mirror = Material::metal("Metal", Color::new(1.0, 0.0, 0.0));
        mirror.coefficients.ka = 0.0;
        mirror.coefficients.kd = 0.0;
        mirror.coefficients.ks = 0.0;
        mirror.coefficients.kr = 1.0;
        let id = scene.add_material(mirror);
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, id));

        let world = dark_world().with_background(Background::Solid(Color::new(0.0, 0.5, 0.0)));
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        let color = tracer.trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut state);
        assert!((color - Color::new(0.0, 0.5, 0.0)).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_metal_adds_bounce_to_local_phong() {
        let mut scene = Scene::new("metal");
        let id = scene.add_material(Material::metal("Metal", Color::new(1.0, 0.0, 0.0)));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, id));

        // Light straight behind the eye: the view is the mirror angle
        let world = World::new(Light::ambient(1.0, Color::ONE))
            .with_background(Background::Solid(Color::new(0.0, 0.5, 0.0)))
            .with_light(Light::point(1.0, Color::ONE, Vec3::new(0.0, 0.0, 5.0)));
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        let color = tracer.trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut state);

        // ka * cd + kd * cd / pi + ks, plus kr * background
        let k = MaterialCoefficients::METAL;
        let local = Color::new(k.ka + k.kd * vrt_math::INV_PI, 0.0, 0.0) + Color::splat(k.ks);
        let bounce = k.kr * Color::new(0.0, 0.5, 0.0);
        assert!((color - (local + bounce)).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_phong_highlight_at_mirror_angle() {
        let light = Light::point(2.0, Color::ONE, Vec3::new(0.0, 0.0, 5.0));
        let world = dark_world().with_light(light);
        let cd = Color::new(0.6, 0.2, 0.2);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let shade = |material: Material| {
            let mut scene = Scene::new("phong");
            let id = scene.add_material(material);
            scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, id));
            let tracer = Tracer::new(&world, &scene, &scene);
            tracer.trace(&ray, 0, &mut TraceState::new(0))
        };

        let matte = shade(Material::solid("Matte", cd));
        let glossy = shade(Material::glossy("Glossy", cd, 0.5, 20.0));

        assert!(glossy.min_element() > matte.min_element());
        // r·wo = 1, so the lobe adds ks * ls on every channel
        assert!((glossy - matte - Color::splat(1.0)).length() < 1e-5, "{:?}", glossy - matte);

        // Off the mirror angle the highlight fades
        let mut scene = Scene::new("phong");
        let id = scene.add_material(Material::glossy("Glossy", cd, 0.5, 20.0));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, id));
        let tracer = Tracer::new(&world, &scene, &scene);
        let off_axis = tracer.trace(
            &Ray::new(Vec3::new(0.0, 0.6, 0.0), Vec3::NEG_Z),
            0,
            &mut TraceState::new(0),
        );
        assert!(off_axis.y < glossy.y);
    }

    #[test]
    fn test_ray_cast_integrator() {
        let mut scene = Scene::new("raycast");
        scene.add_sphere(Sphere::untextured(Vec3::new(0.0, 0.0, -2.0), 0.5));
        let world = dark_world().with_background(Background::Solid(Color::ZERO));
        let tracer = Tracer::new(&world, &scene, &scene).with_integrator(Integrator::RayCast);
        let mut state = TraceState::new(0);

        assert_eq!(tracer.trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut state), Color::ONE);
        assert_eq!(tracer.trace(&Ray::new(Vec3::ZERO, Vec3::Z), 0, &mut state), Color::ZERO);
    }

    #[test]
    fn test_scatter_integrator_attenuates() {
        let mut scene = Scene::new("scatter");
        let grey = scene.add_material(Material::solid("Grey", Color::splat(0.5)));
        scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, grey));

        let world = dark_world().with_background(Background::Solid(Color::ONE));
        let tracer = Tracer::new(&world, &scene, &scene).with_integrator(Integrator::Scatter);
        let mut state = TraceState::new(3);

        // A convex sphere: the diffuse bounce always escapes to the background
        for _ in 0..20 {
            let color = tracer.trace(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut state);
            assert!((color - Color::splat(0.5)).length() < 1e-6);
        }
    }

    #[test]
    fn test_ignored_layer_is_invisible() {
        let mut scene = Scene::new("layers");
        let grey = scene.add_material(Material::solid("Grey", Color::splat(0.5)));
        scene.add_sphere(
            Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, grey).on_layer(LayerMask::IGNORE_RAYCAST),
        );
        let world = dark_world();
        let tracer = Tracer::new(&world, &scene, &scene);
        let mut state = TraceState::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(tracer.trace(&ray, 0, &mut state), world.background.color(ray.direction()));
    }
}
