use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length; code that needs a unit
/// vector normalizes it at the point of use.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray that starts `offset` units along `direction` from `origin`.
    ///
    /// Secondary rays leave a surface this way so they do not immediately
    /// re-hit the surface they were spawned from.
    pub fn offset(origin: Vec3, direction: Vec3, offset: f32) -> Self {
        let start = origin + direction.normalize_or_zero() * offset;
        Self::new(start, direction)
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
