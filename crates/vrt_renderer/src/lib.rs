//! VRT Renderer - Whitted ray tracing kernel.
//!
//! The kernel shades rays against any host that implements the
//! `vrt_core` boundary traits (`Intersector`, `MaterialCatalog`,
//! `LightInventory`).
//!
//! # Example
//!
//! ```ignore
//! use vrt_renderer::{RenderConfig, Renderer, World};
//!
//! let config = RenderConfig::default();
//! let world = World::from_inventory(&scene, &config);
//! let renderer = Renderer::new(&world, &scene, &scene, &config).with_origin(eye);
//!
//! let mut state = renderer.new_state(row as u64);
//! let rgba = renderer.pixel_rgba(direction, &mut state);
//! ```

pub mod brdf;
pub mod color;
pub mod config;
pub mod light;
pub mod pixel_sampler;
pub mod renderer;
pub mod sampler;
pub mod scatter;
pub mod shader;
pub mod tracer;
pub mod world;

// Re-export commonly used types
pub use brdf::{Brdf, GlossySpecular, Lambertian, PerfectSpecular};
pub use color::{linear_to_gamma, ColorAccumulator, ColorPipeline, ToneMapping};
pub use config::{AmbientConfig, ConfigError, ConfigResult, RenderConfig};
pub use light::{Ambient, AmbientOccluder, DirectionalLight, Light, PointLight};
pub use pixel_sampler::PixelSampler;
pub use renderer::{RenderState, Renderer};
pub use sampler::{DrawCursor, SampleBuffer, Sampler, SamplingStrategy};
pub use scatter::{
    reflect, refract, schlick, scatter_dielectric, scatter_diffuse, scatter_metal, Scatter,
    METAL_FUZZ, SELF_HIT_EPSILON,
};
pub use shader::{Matte, Phong, Reflective, Shader, Transparent};
pub use tracer::{Integrator, TraceState, Tracer, DIAGNOSTIC_COLOR};
pub use world::{sky_gradient, Background, World};

// Re-export the boundary types hosts implement
pub use vrt_core::{Color, HitRecord, Intersector, LayerMask, LightInventory, MaterialCatalog};
