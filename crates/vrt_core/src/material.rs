//! Material descriptors and the catalog that resolves them for a hit.
//!
//! A descriptor is plain data: a kind tag plus reflectance coefficients. The
//! renderer turns it into a shader when a ray lands on the surface.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::MaterialError;
use crate::hit::HitRecord;
use crate::texture::Texture;
use crate::Color;

/// Index of a material in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// The reflectance families the tracer can distinguish between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaterialKind {
    #[default]
    SolidColor,
    Metal,
    Dielectric,
}

impl MaterialKind {
    /// Classify a host material by name.
    ///
    /// Only the first whitespace separated token counts, so engine suffixes
    /// like `"Metal (Instance)"` still classify as `Metal`. Unknown names are
    /// solid colors.
    pub fn from_name(name: &str) -> Self {
        match name.split_whitespace().next() {
            Some("Metal") => MaterialKind::Metal,
            Some("Dielectric") => MaterialKind::Dielectric,
            _ => MaterialKind::SolidColor,
        }
    }
}

/// Reflectance coefficients shared by all material kinds.
///
/// Not every kind reads every field: solid colors ignore `kr` and the
/// refractive index, dielectrics ignore `ka`/`kd`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialCoefficients {
    /// Ambient reflection coefficient
    pub ka: f32,
    /// Diffuse reflection coefficient
    pub kd: f32,
    /// Specular reflection coefficient (0 = no highlight)
    pub ks: f32,
    /// Specular exponent of the glossy lobe
    pub exp: f32,
    /// Mirror reflection coefficient
    pub kr: f32,
    /// Mirror reflection color
    pub reflection_color: Color,
    /// Color applied to rays leaving a dielectric
    pub transmission_color: Color,
    /// Index of refraction (1.0 = air, 1.5 = glass)
    pub refractive_index: f32,
}

impl MaterialCoefficients {
    /// Diffuse-only surface.
    pub const MATTE: MaterialCoefficients = MaterialCoefficients {
        ka: 0.25,
        kd: 0.75,
        ks: 0.0,
        exp: 1.0,
        kr: 0.0,
        reflection_color: Color::ONE,
        transmission_color: Color::ONE,
        refractive_index: 1.0,
    };

    /// Polished metal: a dim diffuse base under a strong mirror term.
    pub const METAL: MaterialCoefficients = MaterialCoefficients {
        ka: 0.25,
        kd: 0.5,
        ks: 0.15,
        exp: 100.0,
        kr: 0.75,
        reflection_color: Color::ONE,
        transmission_color: Color::ONE,
        refractive_index: 1.0,
    };

    /// Clear glass.
    pub const GLASS: MaterialCoefficients = MaterialCoefficients {
        ka: 0.0,
        kd: 0.0,
        ks: 0.5,
        exp: 2000.0,
        kr: 0.0,
        reflection_color: Color::ONE,
        transmission_color: Color::ONE,
        refractive_index: 1.5,
    };
}

impl Default for MaterialCoefficients {
    fn default() -> Self {
        Self::MATTE
    }
}

/// A material descriptor: kind tag, base color, coefficients and an
/// optional texture.
#[derive(Debug, Clone)]
pub struct Material {
    /// Material name (for diagnostics)
    pub name: String,

    pub kind: MaterialKind,

    /// Base (diffuse) color, linear RGB
    pub color: Color,

    pub coefficients: MaterialCoefficients,

    /// When present the surface shows this texture unshaded
    pub texture: Option<Arc<Texture>>,
}

impl Material {
    /// Create a material of the given kind with that kind's default coefficients.
    pub fn new(name: impl Into<String>, kind: MaterialKind, color: Color) -> Self {
        let coefficients = match kind {
            MaterialKind::SolidColor => MaterialCoefficients::MATTE,
            MaterialKind::Metal => MaterialCoefficients::METAL,
            MaterialKind::Dielectric => MaterialCoefficients::GLASS,
        };
        Self {
            name: name.into(),
            kind,
            color,
            coefficients,
            texture: None,
        }
    }

    /// Diffuse solid color.
    pub fn solid(name: impl Into<String>, color: Color) -> Self {
        Self::new(name, MaterialKind::SolidColor, color)
    }

    /// Solid color with a Phong highlight.
    pub fn glossy(name: impl Into<String>, color: Color, ks: f32, exp: f32) -> Self {
        let mut material = Self::solid(name, color);
        material.coefficients.ks = ks;
        material.coefficients.exp = exp;
        material
    }

    /// Reflective metal.
    pub fn metal(name: impl Into<String>, color: Color) -> Self {
        Self::new(name, MaterialKind::Metal, color)
    }

    /// Transparent dielectric with the given index of refraction.
    pub fn dielectric(name: impl Into<String>, color: Color, refractive_index: f32) -> Self {
        let mut material = Self::new(name, MaterialKind::Dielectric, color);
        material.coefficients.refractive_index = refractive_index;
        material
    }

    /// Replace the coefficients.
    pub fn with_coefficients(mut self, coefficients: MaterialCoefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Attach a texture (short-circuits shading).
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// Resolves the material descriptor of a hit surface.
pub trait MaterialCatalog: Send + Sync {
    fn material(&self, hit: &HitRecord) -> Result<&Material, MaterialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(MaterialKind::from_name("Metal"), MaterialKind::Metal);
        assert_eq!(MaterialKind::from_name("Metal (Instance)"), MaterialKind::Metal);
        assert_eq!(MaterialKind::from_name("Dielectric (Instance)"), MaterialKind::Dielectric);
        assert_eq!(MaterialKind::from_name("Red"), MaterialKind::SolidColor);
        assert_eq!(MaterialKind::from_name("MetalPlate"), MaterialKind::SolidColor);
        assert_eq!(MaterialKind::from_name(""), MaterialKind::SolidColor);
    }

    #[test]
    fn test_constructors_pick_kind_defaults() {
        let metal = Material::metal("Metal", Color::ONE);
        assert_eq!(metal.kind, MaterialKind::Metal);
        assert!(metal.coefficients.kr > 0.0);

        let glass = Material::dielectric("Dielectric", Color::ONE, 1.33);
        assert_eq!(glass.coefficients.refractive_index, 1.33);

        let solid = Material::solid("Red", Color::X);
        assert_eq!(solid.coefficients.ks, 0.0);
        assert!(solid.texture.is_none());
    }

    #[test]
    fn test_glossy_sets_highlight() {
        let glossy = Material::glossy("Shiny", Color::ONE, 0.3, 40.0);
        assert_eq!(glossy.kind, MaterialKind::SolidColor);
        assert_eq!(glossy.coefficients.ks, 0.3);
        assert_eq!(glossy.coefficients.exp, 40.0);
    }
}
