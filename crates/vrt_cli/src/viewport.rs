//! View plane the primary rays pass through.

use vrt_math::Vec3;

/// An eye point looking through a rectangular plane of pixels.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub image_width: u32,
    pub image_height: u32,

    eye: Vec3,
    /// Upper left corner of the plane
    corner: Vec3,
    /// One pixel step to the right
    pixel_delta_u: Vec3,
    /// One pixel step down
    pixel_delta_v: Vec3,
}

impl Viewport {
    /// Place the plane `distance` in front of `eye`, facing `look_at`.
    pub fn look_at(
        eye: Vec3,
        look_at: Vec3,
        vup: Vec3,
        vfov: f32,
        distance: f32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let image_width = image_width.max(1);
        let image_height = image_height.max(1);

        let h = (vfov.to_radians() / 2.0).tan();
        let plane_height = 2.0 * h * distance;
        let plane_width = plane_height * (image_width as f32 / image_height as f32);

        // Camera basis
        let w = (eye - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let plane_u = plane_width * u;
        let plane_v = -plane_height * v;

        Self {
            image_width,
            image_height,
            eye,
            corner: eye - distance * w - plane_u / 2.0 - plane_v / 2.0,
            pixel_delta_u: plane_u / image_width as f32,
            pixel_delta_v: plane_v / image_height as f32,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn pixel_delta_u(&self) -> Vec3 {
        self.pixel_delta_u
    }

    pub fn pixel_delta_v(&self) -> Vec3 {
        self.pixel_delta_v
    }

    /// Direction from the eye to the upper left corner of pixel (i, j).
    pub fn pixel_direction(&self, i: u32, j: u32) -> Vec3 {
        self.corner + i as f32 * self.pixel_delta_u + j as f32 * self.pixel_delta_v - self.eye
    }
}
