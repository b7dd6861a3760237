//! Everything a trace reads besides geometry: lights, background and limits.

use serde::{Deserialize, Serialize};
use vrt_core::{Color, LayerMask, LightInventory};
use vrt_math::Vec3;

use crate::config::{AmbientConfig, RenderConfig};
use crate::light::{AmbientOccluder, Light};

/// Keeps the occluder's pattern off the anti-aliasing sampler's stream.
const OCCLUDER_SEED_SALT: u64 = 0xA0C1_D3E5_F708_192B;

/// Color of rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Background {
    /// White at the horizon blending to light blue overhead
    #[default]
    SkyGradient,
    Solid(Color),
}

impl Background {
    pub fn color(&self, direction: Vec3) -> Color {
        match self {
            Background::SkyGradient => sky_gradient(direction),
            Background::Solid(color) => *color,
        }
    }
}

/// Sky gradient for a ray direction. A zero direction reads as the horizon.
pub fn sky_gradient(direction: Vec3) -> Color {
    let unit_direction = direction.normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Scene-wide render settings shared read-only by every trace.
#[derive(Debug, Clone)]
pub struct World {
    /// Lights integrated by the shaders' direct lighting loop
    pub lights: Vec<Light>,
    /// Ambient term, read by every shader
    pub ambient: Light,
    pub background: Background,
    pub max_depth: u32,
    /// Ray range in world units
    pub max_distance: f32,
    pub layers: LayerMask,
}

impl World {
    /// An empty world with default limits.
    pub fn new(ambient: Light) -> Self {
        Self {
            lights: Vec::new(),
            ambient,
            background: Background::SkyGradient,
            max_depth: 5,
            max_distance: 30.0,
            layers: LayerMask::TRACEABLE,
        }
    }

    /// Build a world from the host's lights and a render configuration.
    pub fn from_inventory(inventory: &dyn LightInventory, config: &RenderConfig) -> Self {
        let ambient = match config.ambient {
            AmbientConfig::Ambient { ls, color } => Light::ambient(ls, color),
            AmbientConfig::Occluder {
                ls,
                color,
                samples,
                strategy,
            } => Light::AmbientOccluder(AmbientOccluder::new(
                ls,
                color,
                samples as usize,
                strategy,
                config.seed ^ OCCLUDER_SEED_SALT,
            )),
        };

        let mut world = Self::new(ambient)
            .with_background(config.background)
            .with_max_depth(config.max_depth)
            .with_max_distance(config.max_distance)
            .with_layers(config.layers);

        for light in inventory.scene_lights() {
            world.add_light(Light::from(light));
        }

        log::info!(
            "World built: {} lights, max depth {}, max distance {}",
            world.lights.len(),
            world.max_depth,
            world.max_distance
        );

        world
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.add_light(light);
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{Sampler, SamplingStrategy};
    use vrt_core::{Scene, SceneLight};

    #[test]
    fn test_sky_gradient_range() {
        let directions = [
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::X,
            Vec3::new(0.3, -0.7, 2.0),
            Vec3::new(-5.0, 10.0, 1.0),
            Vec3::ZERO,
        ];
        for d in directions {
            let c = sky_gradient(d);
            assert!(c.x >= 0.5 - 1e-6 && c.x <= 1.0 + 1e-6, "{:?}", c);
            assert!(c.y >= 0.7 - 1e-6 && c.y <= 1.0 + 1e-6, "{:?}", c);
            assert!((c.z - 1.0).abs() < 1e-6, "{:?}", c);
            // Same input, same output
            assert_eq!(sky_gradient(d), c);
        }
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        assert_eq!(sky_gradient(Vec3::Y), Color::new(0.5, 0.7, 1.0));
        assert_eq!(sky_gradient(Vec3::NEG_Y), Color::ONE);
        let horizon = sky_gradient(Vec3::ZERO);
        assert!((horizon - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_solid_background() {
        let background = Background::Solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(background.color(Vec3::Y), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_from_inventory() {
        let mut scene = Scene::new("lights");
        scene.add_light(SceneLight::Point {
            position: Vec3::new(0.0, 5.0, 0.0),
            intensity: 1.5,
            color: Color::ONE,
        });
        scene.add_light(SceneLight::Directional {
            forward: Vec3::NEG_Y,
            intensity: 0.5,
            color: Color::ONE,
        });

        let mut config = RenderConfig::default();
        config.max_depth = 3;
        config.ambient = AmbientConfig::Occluder {
            ls: 1.0,
            color: Color::ONE,
            samples: 4,
            strategy: SamplingStrategy::Jittered,
        };

        let world = World::from_inventory(&scene, &config);
        assert_eq!(world.lights.len(), 2);
        assert!(world.lights.iter().all(Light::casts_shadows));
        assert!(matches!(world.ambient, Light::AmbientOccluder(_)));
        assert_eq!(world.max_depth, 3);
    }

    #[test]
    fn test_occluder_pattern_is_not_the_config_seed_stream() {
        let config = RenderConfig {
            ambient: AmbientConfig::Occluder {
                ls: 1.0,
                color: Color::ONE,
                samples: 16,
                strategy: SamplingStrategy::MultiJittered,
            },
            ..RenderConfig::default()
        };
        let world = World::from_inventory(&Scene::new("empty"), &config);

        let occluder = match &world.ambient {
            Light::AmbientOccluder(occluder) => occluder,
            other => panic!("expected occluder, got {:?}", other),
        };
        let same_seed = Sampler::unit(SamplingStrategy::MultiJittered, 16, 83, config.seed);
        assert_ne!(
            occluder.sampler().buffer().samples(),
            same_seed.buffer().samples()
        );
    }
}
