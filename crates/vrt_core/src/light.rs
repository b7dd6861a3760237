//! Lights as the host scene describes them.

use vrt_math::Vec3;

use crate::Color;

/// A light enumerated from the host scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneLight {
    /// Parallel light travelling along `forward`
    Directional {
        forward: Vec3,
        intensity: f32,
        color: Color,
    },
    /// Light emitted from a single point
    Point {
        position: Vec3,
        intensity: f32,
        color: Color,
    },
}

/// Enumerates the lights of a scene. Read once per world build.
pub trait LightInventory {
    fn scene_lights(&self) -> Vec<SceneLight>;
}
