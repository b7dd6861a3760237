// Re-export glam for convenience
pub use glam::*;

// VRT math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// 1 / pi, used by the diffuse BRDF normalisation.
pub const INV_PI: f32 = std::f32::consts::FRAC_1_PI;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        // Colors are multiplied component-wise
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
    }

    #[test]
    fn test_inv_pi() {
        assert!((INV_PI * std::f32::consts::PI - 1.0).abs() < 1e-6);
    }
}
