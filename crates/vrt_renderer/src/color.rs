//! Sample averaging and display conversion.

use serde::{Deserialize, Serialize};
use vrt_core::Color;
use vrt_math::Interval;

/// Running mean of sub-ray colors.
///
/// The mean is updated incrementally, so averaging `n` copies of one color
/// yields that color exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorAccumulator {
    mean: Color,
    count: u32,
}

impl ColorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Color) {
        self.count += 1;
        self.mean += (color - self.mean) / self.count as f32;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Mean of everything added so far; black when empty.
    pub fn mean(&self) -> Color {
        self.mean
    }
}

impl Extend<Color> for ColorAccumulator {
    fn extend<I: IntoIterator<Item = Color>>(&mut self, iter: I) {
        for color in iter {
            self.add(color);
        }
    }
}

impl FromIterator<Color> for ColorAccumulator {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}

/// How out-of-gamut colors are brought back into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ToneMapping {
    /// Clamp each channel
    #[default]
    Clamp,
    /// Replace the whole color when any channel exceeds one
    ClampToColor(Color),
    /// Scale down by the largest channel when it exceeds one
    MaxToOne,
}

impl ToneMapping {
    /// Overflow highlight in red.
    pub fn clamp_to_red() -> Self {
        ToneMapping::ClampToColor(Color::new(1.0, 0.0, 0.0))
    }

    pub fn apply(&self, color: Color) -> Color {
        match self {
            ToneMapping::Clamp => color.clamp(Color::ZERO, Color::ONE),
            ToneMapping::ClampToColor(overflow) => {
                if color.max_element() > 1.0 {
                    *overflow
                } else {
                    color.max(Color::ZERO)
                }
            }
            ToneMapping::MaxToOne => {
                let max = color.max_element();
                if max > 1.0 {
                    color / max
                } else {
                    color
                }
            }
        }
    }
}

/// Apply display gamma. Non-positive values map to zero.
#[inline]
pub fn linear_to_gamma(linear: f32, gamma: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if gamma == 2.0 {
        linear.sqrt()
    } else {
        linear.powf(1.0 / gamma)
    }
}

/// Tone mapping followed by gamma correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPipeline {
    pub tone_mapping: ToneMapping,
    pub gamma: f32,
}

impl Default for ColorPipeline {
    fn default() -> Self {
        Self {
            tone_mapping: ToneMapping::Clamp,
            gamma: 2.0,
        }
    }
}

impl ColorPipeline {
    pub fn new(tone_mapping: ToneMapping, gamma: f32) -> Self {
        Self { tone_mapping, gamma }
    }

    /// Display color of a linear pixel value.
    pub fn display(&self, linear: Color) -> Color {
        let mapped = self.tone_mapping.apply(linear);
        Color::new(
            linear_to_gamma(mapped.x, self.gamma),
            linear_to_gamma(mapped.y, self.gamma),
            linear_to_gamma(mapped.z, self.gamma),
        )
    }

    /// Convert a linear color to 8-bit RGBA.
    pub fn to_rgba8(&self, linear: Color) -> [u8; 4] {
        let c = self.display(linear);
        let r = (255.0 * Interval::UNIT.clamp(c.x)) as u8;
        let g = (255.0 * Interval::UNIT.clamp(c.y)) as u8;
        let b = (255.0 * Interval::UNIT.clamp(c.z)) as u8;
        [r, g, b, 255]
    }
}
