//! In-memory textures for materials.
//!
//! A textured surface is displayed unshaded: the tracer returns the texel
//! under the hit's UV coordinate directly.

use vrt_math::{Vec2, Vec3};

use crate::Color;

/// A texture with pixel data.
///
/// Stores pixels in linear RGBA float format, row-major, with row 0 at
/// `v = 0`.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, one [R, G, B, A] per pixel
    pub pixels: Vec<[f32; 4]>,

    /// Name (for debugging)
    pub name: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    ///
    /// Missing pixels read as opaque black.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, name: impl Into<String>) -> Self {
        let texture = Self {
            width: width.max(1),
            height: height.max(1),
            pixels,
            name: name.into(),
        };
        let expected = texture.width as usize * texture.height as usize;
        if texture.pixels.len() < expected {
            log::warn!(
                "Texture '{}' has {} of {} pixels",
                texture.name,
                texture.pixels.len(),
                expected
            );
        }
        texture
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self::new(1, 1, vec![[color.x, color.y, color.z, 1.0]], "<solid>")
    }

    /// Create a checkerboard with `cells` squares along each side.
    pub fn checkerboard(cells: u32, a: Color, b: Color) -> Self {
        let cells = cells.max(1);
        let mut pixels = Vec::with_capacity((cells * cells) as usize);
        for y in 0..cells {
            for x in 0..cells {
                let c = if (x + y) % 2 == 0 { a } else { b };
                pixels.push([c.x, c.y, c.z, 1.0]);
            }
        }
        Self::new(cells, cells, pixels, "<checker>")
    }

    /// Nearest-texel lookup.
    ///
    /// The texel is `(floor(u * width), floor(v * height))`, clamped to the
    /// texture edge.
    pub fn sample(&self, uv: Vec2) -> Color {
        let x = (uv.x * self.width as f32).floor();
        let y = (uv.y * self.height as f32).floor();

        let x = (x.max(0.0) as u32).min(self.width - 1);
        let y = (y.max(0.0) as u32).min(self.height - 1);

        let p = self.get_pixel(x, y);
        Color::new(p[0], p[1], p[2])
    }

    /// Get pixel at integer coordinates.
    fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_everywhere() {
        let tex = Texture::solid_color(Vec3::new(0.2, 0.4, 0.6));
        assert_eq!(tex.sample(Vec2::ZERO), Vec3::new(0.2, 0.4, 0.6));
        assert_eq!(tex.sample(Vec2::ONE), Vec3::new(0.2, 0.4, 0.6));
        assert_eq!(tex.sample(Vec2::new(-3.0, 7.0)), Vec3::new(0.2, 0.4, 0.6));
    }

    #[test]
    fn test_checkerboard_texels() {
        let tex = Texture::checkerboard(2, Color::ONE, Color::ZERO);
        assert_eq!(tex.sample(Vec2::new(0.1, 0.1)), Color::ONE);
        assert_eq!(tex.sample(Vec2::new(0.6, 0.1)), Color::ZERO);
        assert_eq!(tex.sample(Vec2::new(0.6, 0.6)), Color::ONE);
        // u = 1 clamps to the last column
        assert_eq!(tex.sample(Vec2::new(1.0, 0.1)), Color::ZERO);
    }

    #[test]
    fn test_short_pixel_buffer_reads_black() {
        let tex = Texture::new(2, 2, vec![[1.0, 1.0, 1.0, 1.0]], "short");
        assert_eq!(tex.sample(Vec2::new(0.9, 0.9)), Color::ZERO);
    }
}
