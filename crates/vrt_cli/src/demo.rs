//! Built-in demo scene.

use std::sync::Arc;

use vrt_core::{Color, LayerMask, Material, Scene, SceneLight, Sphere, Texture};
use vrt_math::Vec3;

/// A matte floor with one sphere of each material kind, a checker-textured
/// sphere, a point light and a directional light.
pub fn build_scene() -> Scene {
    let mut scene = Scene::new("demo");

    let floor = scene.add_material(Material::solid("Floor", Color::new(0.5, 0.5, 0.5)));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, floor));

    let matte = scene.add_material(Material::solid("Matte", Color::new(0.8, 0.3, 0.2)));
    scene.add_sphere(Sphere::new(Vec3::new(-3.0, 1.0, -1.0), 1.0, matte));

    let phong = scene.add_material(Material::glossy(
        "Glossy",
        Color::new(0.2, 0.4, 0.8),
        0.3,
        40.0,
    ));
    scene.add_sphere(Sphere::new(Vec3::new(-1.0, 1.0, 0.5), 1.0, phong));

    let metal = scene.add_material(Material::metal("Metal (Instance)", Color::new(0.9, 0.8, 0.6)));
    scene.add_sphere(Sphere::new(Vec3::new(1.2, 1.0, -1.0), 1.0, metal));

    let glass = scene.add_material(Material::dielectric("Dielectric", Color::ONE, 1.5));
    scene.add_sphere(Sphere::new(Vec3::new(3.0, 0.7, 1.0), 0.7, glass));

    let checker = Arc::new(Texture::checkerboard(
        8,
        Color::new(0.9, 0.9, 0.9),
        Color::new(0.1, 0.1, 0.1),
    ));
    let checkered = scene.add_material(Material::solid("Checker", Color::ONE).with_texture(checker));
    scene.add_sphere(Sphere::new(Vec3::new(0.6, 0.4, 1.6), 0.4, checkered));

    // Gizmo the tracer must not see
    scene.add_sphere(Sphere::untextured(Vec3::new(0.0, 1.0, 3.0), 0.5).on_layer(LayerMask::IGNORE_RAYCAST));

    scene.add_light(SceneLight::Point {
        position: Vec3::new(-4.0, 8.0, 6.0),
        intensity: 2.0,
        color: Color::ONE,
    });
    scene.add_light(SceneLight::Directional {
        forward: Vec3::new(-0.5, -1.0, -0.3),
        intensity: 1.0,
        color: Color::new(1.0, 0.95, 0.85),
    });

    scene
}
