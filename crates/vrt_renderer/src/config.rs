//! Render configuration, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vrt_core::{Color, LayerMask};

use crate::color::{ColorPipeline, ToneMapping};
use crate::sampler::SamplingStrategy;
use crate::tracer::Integrator;
use crate::world::Background;

/// Errors that can occur while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The world's ambient light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AmbientConfig {
    /// Constant ambient radiance
    Ambient { ls: f32, color: Color },
    /// Ambient radiance attenuated by hemisphere occlusion rays
    Occluder {
        ls: f32,
        color: Color,
        samples: u32,
        strategy: SamplingStrategy,
    },
}

impl Default for AmbientConfig {
    fn default() -> Self {
        AmbientConfig::Occluder {
            ls: 1.0,
            color: Color::ONE,
            samples: 16,
            strategy: SamplingStrategy::MultiJittered,
        }
    }
}

/// Render configuration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Anti-aliasing sub-rays per pixel
    pub samples_per_pixel: u32,
    /// Independent sample sets per sampler
    pub sample_sets: u32,
    pub sampling: SamplingStrategy,
    /// When false every pixel is one ray through its corner
    pub anti_aliasing: bool,
    /// Horizontal and vertical extent of the sub-pixel offsets
    pub pixel_step: [f32; 2],
    /// Maximum recursion depth
    pub max_depth: u32,
    /// Ray range in world units
    pub max_distance: f32,
    /// Layers rays can hit
    pub layers: LayerMask,
    pub integrator: Integrator,
    /// Color of rays that escape the scene
    pub background: Background,
    pub ambient: AmbientConfig,
    /// Display gamma
    pub gamma: f32,
    pub tone_mapping: ToneMapping,
    /// Base seed for every per-consumer random stream
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 25,
            sample_sets: 83,
            sampling: SamplingStrategy::MultiJittered,
            anti_aliasing: true,
            pixel_step: [1.0 / 200.0, 1.0 / 200.0],
            max_depth: 5,
            max_distance: 30.0,
            layers: LayerMask::TRACEABLE,
            integrator: Integrator::Whitted,
            background: Background::SkyGradient,
            ambient: AmbientConfig::default(),
            gamma: 2.0,
            tone_mapping: ToneMapping::Clamp,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::info!("Loading render config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.gamma > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "gamma must be positive, got {}",
                self.gamma
            )));
        }
        if !(self.max_distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_distance must be positive, got {}",
                self.max_distance
            )));
        }
        if self.pixel_step.iter().any(|s| !(*s >= 0.0) || !s.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "pixel_step must be finite and non-negative, got {:?}",
                self.pixel_step
            )));
        }
        if let AmbientConfig::Occluder { samples: 0, .. } = self.ambient {
            return Err(ConfigError::Invalid(
                "ambient occluder needs at least one sample".to_string(),
            ));
        }
        if self.samples_per_pixel == 0 {
            log::warn!("samples_per_pixel is 0, using 1");
        }
        Ok(())
    }

    pub fn color_pipeline(&self) -> ColorPipeline {
        ColorPipeline::new(self.tone_mapping, self.gamma)
    }
}
