//! Scatter helpers shared by the dielectric shader and the scatter integrator.

use rand::{Rng, RngCore};
use vrt_core::{Color, HitRecord};
use vrt_math::{Ray, Vec3};

/// Perturbation radius applied to metal reflections.
pub const METAL_FUZZ: f32 = 0.3;

/// Hits closer than this are the surface the ray left from.
pub const SELF_HIT_EPSILON: f32 = 1e-3;

/// Upper bound of the reflect-or-refract draw.
const REFLECT_DRAW_MAX: f32 = 1.0 - 1e-5;

/// A scattered ray and the color it is attenuated by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    pub attenuation: Color,
    pub ray: Ray,
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract `v` through a surface with normal `n`.
///
/// Returns `None` on total internal reflection, i.e. a negative
/// discriminant. A zero discriminant still refracts, along the surface.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);

    if discriminant >= 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Uniform point inside the unit sphere (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Diffuse bounce towards `p + n + random_in_unit_sphere`.
pub fn scatter_diffuse(hit: &HitRecord, color: Color, rng: &mut dyn RngCore) -> Scatter {
    let mut direction = hit.normal() + random_in_unit_sphere(rng);

    // Catch degenerate scatter direction
    if direction.length_squared() < 1e-8 {
        direction = hit.normal();
    }

    Scatter {
        attenuation: color,
        ray: Ray::offset(hit.point(), direction, SELF_HIT_EPSILON),
    }
}

/// Fuzzy mirror bounce. `None` when the ray is absorbed into the surface.
pub fn scatter_metal(
    ray: &Ray,
    hit: &HitRecord,
    color: Color,
    rng: &mut dyn RngCore,
) -> Option<Scatter> {
    let reflected = reflect(ray.direction().normalize(), hit.normal());
    let direction = reflected + METAL_FUZZ * random_in_unit_sphere(rng);

    if direction.dot(hit.normal()) > 0.0 {
        Some(Scatter {
            attenuation: color,
            ray: Ray::offset(hit.point(), direction, SELF_HIT_EPSILON),
        })
    } else {
        None
    }
}

/// Pick either the reflected or the refracted direction through a
/// dielectric, weighted by Schlick reflectance.
///
/// Relies on `hit.normal()` pointing out of the surface.
pub fn dielectric_direction(
    ray: &Ray,
    hit: &HitRecord,
    ref_idx: f32,
    rng: &mut dyn RngCore,
) -> Vec3 {
    let d = ray.direction();
    let n = hit.normal();
    let d_dot_n = d.dot(n);

    // Leaving the surface when the ray runs along the outward normal
    let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
        (-n, ref_idx, ref_idx * d_dot_n / d.length())
    } else {
        (n, 1.0 / ref_idx, -d_dot_n / d.length())
    };

    let reflected = reflect(d, n);
    match refract(d, outward_normal, ni_over_nt) {
        Some(refracted) => {
            let reflect_prob = schlick(cosine.min(1.0), ref_idx);
            if rng.gen_range(0.0..REFLECT_DRAW_MAX) < reflect_prob {
                reflected
            } else {
                refracted
            }
        }
        None => reflected,
    }
}

/// Dielectric bounce: always valid, attenuation white.
pub fn scatter_dielectric(
    ray: &Ray,
    hit: &HitRecord,
    ref_idx: f32,
    rng: &mut dyn RngCore,
) -> Scatter {
    let direction = dielectric_direction(ray, hit, ref_idx, rng);
    Scatter {
        attenuation: Color::ONE,
        ray: Ray::offset(hit.point(), direction, SELF_HIT_EPSILON),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reflect_parallel_to_surface() {
        let r = reflect(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(r, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_reflect_flips_normal_component() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert_eq!(r, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_straight_through() {
        let r = refract(Vec3::NEG_Z, Vec3::Z, 1.0 / 1.5).unwrap();
        assert!((r - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at a grazing angle
        let v = Vec3::new(1.0, 0.1, 0.0);
        assert!(refract(v, -Vec3::Y, 1.5).is_none());
    }

    #[test]
    fn test_refract_zero_discriminant_is_valid() {
        // Grazing with matched indices: 1 - 1 * (1 - 0) == 0 exactly
        let r = refract(Vec3::X, Vec3::Y, 1.0).unwrap();
        assert_eq!(r, Vec3::X);
    }

    #[test]
    fn test_schlick_head_on_is_r0() {
        let r0 = ((1.0f32 - 1.5) / (1.0 + 1.5)).powi(2);
        assert_eq!(schlick(1.0, 1.5), r0);
        assert!((r0 - 0.04).abs() < 1e-6);
    }

    #[test]
    fn test_schlick_grazing_is_one() {
        assert!((schlick(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_random_in_unit_sphere() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
        }
    }

    #[test]
    fn test_scatter_diffuse_leaves_surface() {
        let mut rng = StdRng::seed_from_u64(1);
        let hit = HitRecord::new(Vec3::ZERO, Vec3::Y, 2.0);
        for _ in 0..100 {
            let s = scatter_diffuse(&hit, Color::new(0.5, 0.5, 0.5), &mut rng);
            assert_eq!(s.attenuation, Color::new(0.5, 0.5, 0.5));
            assert!(s.ray.direction().dot(Vec3::Y) >= 0.0);
        }
    }

    #[test]
    fn test_scatter_metal_absorbs_below_surface() {
        let mut rng = StdRng::seed_from_u64(2);
        let hit = HitRecord::new(Vec3::ZERO, Vec3::Y, 2.0);

        // Head-on: reflection points straight back up, fuzz cannot flip it
        let ray = Ray::new(Vec3::Y, Vec3::NEG_Y);
        for _ in 0..100 {
            let s = scatter_metal(&ray, &hit, Color::ONE, &mut rng).unwrap();
            assert!(s.ray.direction().dot(Vec3::Y) > 0.0);
        }

        // Grazing: fuzz pushes some reflections below the surface
        let grazing = Ray::new(Vec3::new(-1.0, 0.001, 0.0), Vec3::new(1.0, -0.001, 0.0));
        let absorbed = (0..200)
            .filter(|_| scatter_metal(&grazing, &hit, Color::ONE, &mut rng).is_none())
            .count();
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_dead_center_mostly_refracts() {
        let mut rng = StdRng::seed_from_u64(3);
        let hit = HitRecord::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z, 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);

        let mut refracted = 0;
        for _ in 0..1000 {
            let s = scatter_dielectric(&ray, &hit, 1.5, &mut rng);
            assert_eq!(s.attenuation, Color::ONE);
            if s.ray.direction().z < 0.0 {
                refracted += 1;
            }
        }
        // Reflection probability is r0 = 0.04
        assert!(refracted > 900, "refracted {}", refracted);
    }

    #[test]
    fn test_dielectric_total_internal_reflection_always_reflects() {
        let mut rng = StdRng::seed_from_u64(4);
        // Inside the glass, hitting the boundary at a grazing angle
        let hit = HitRecord::new(Vec3::ZERO, Vec3::Y, 1.0);
        let ray = Ray::new(Vec3::new(-1.0, -0.1, 0.0), Vec3::new(1.0, 0.1, 0.0));

        for _ in 0..100 {
            let d = dielectric_direction(&ray, &hit, 1.5, &mut rng);
            assert!((d - reflect(ray.direction(), Vec3::Y)).length() < 1e-6);
        }
    }
}
