//! VRT Core - the boundary between the ray tracing kernel and its host.
//!
//! This crate provides:
//!
//! - **Intersection types**: `HitRecord`, `Intersector`, `LayerMask`
//! - **Material types**: `Material`, `MaterialKind`, `MaterialCatalog`
//! - **Light inventory**: `SceneLight`, `LightInventory`
//! - **Reference scene**: `Scene`, a sphere-only host used by tests and the CLI
//!
//! # Example
//!
//! ```ignore
//! use vrt_core::{LayerMask, Material, Scene, Sphere, Intersector};
//!
//! let mut scene = Scene::new("demo");
//! let red = scene.add_material(Material::solid("Red", Color::new(0.8, 0.1, 0.1)));
//! scene.add_sphere(Sphere::new(Vec3::ZERO, 1.0, red));
//! let hit = scene.intersect(&ray, 30.0, LayerMask::TRACEABLE);
//! ```

pub mod error;
pub mod hit;
pub mod intersector;
pub mod light;
pub mod material;
pub mod scene;
pub mod texture;

use vrt_math::Vec3;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

// Re-export commonly used types
pub use error::MaterialError;
pub use hit::HitRecord;
pub use intersector::{Intersector, LayerMask};
pub use light::{LightInventory, SceneLight};
pub use material::{Material, MaterialCatalog, MaterialCoefficients, MaterialId, MaterialKind};
pub use scene::{Scene, Sphere};
pub use texture::Texture;
