//! Constant-density participating medium.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f32,
    scene::{Arena, MaterialId, ObjectId},
    Vec3,
};
use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// A volume of uniform density bounded by another intersectable.
///
/// Each query samples one free-flight distance and either scatters inside
/// the boundary or lets the ray pass straight through. The boundary is
/// assumed convex: only the first entry and the next exit are considered,
/// so a ray that leaves and re-enters a concave boundary ignores every
/// segment after the first.
#[derive(Debug, Clone)]
pub struct ConstantMedium {
    boundary: ObjectId,
    neg_inv_density: f32,
    phase_function: MaterialId,
}

impl ConstantMedium {
    /// `density` must be positive and finite; the builder enforces this.
    pub(crate) fn new(boundary: ObjectId, density: f32, phase_function: MaterialId) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function,
        }
    }

    pub fn boundary(&self) -> ObjectId {
        self.boundary
    }

    pub fn density(&self) -> f32 {
        -1.0 / self.neg_inv_density
    }
}

impl Hittable for ConstantMedium {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        // Boundary crossings along the whole line, not just the query span.
        let entry = arena.hit_object(self.boundary, ray, Interval::UNIVERSE, rng)?;
        let exit = arena.hit_object(
            self.boundary,
            ray,
            Interval::new(entry.t + 0.0001, f32::INFINITY),
            rng,
        )?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        // u in (0, 1]; ln(0) would give an infinite distance.
        let u = gen_f32(rng).max(f32::MIN_POSITIVE);
        let hit_distance = self.neg_inv_density * u.ln();

        if hit_distance > distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            t,
            p: ray.at(t),
            // Arbitrary; the isotropic phase function ignores it.
            normal: Vec3::X,
            u: 0.0,
            v: 0.0,
            material: self.phase_function,
        })
    }

    fn bounding_box(&self, arena: &Arena, time: Interval) -> Option<Aabb> {
        arena.bounding_box(self.boundary, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, SceneBuilder, SceneError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FORWARD: Interval = Interval {
        min: 0.001,
        max: f32::INFINITY,
    };

    fn scatter_fraction(direction: Vec3, density: f32, trials: u32) -> f32 {
        let mut builder = SceneBuilder::new();
        let white = builder.solid_color(Color::ONE);
        let glass = builder.dielectric(1.5);
        let boundary = builder.sphere(Vec3::ZERO, 1.0, glass).unwrap();
        let fog = builder.constant_medium(boundary, density, white).unwrap();
        let arena = builder.arena();

        let mut rng = StdRng::seed_from_u64(2024);
        let ray = Ray::new(-5.0 * direction.normalize(), direction, 0.0);
        let mut scattered = 0;
        for _ in 0..trials {
            if let Some(rec) = arena.hit_object(fog, &ray, FORWARD, &mut rng) {
                assert!(rec.p.length() <= 1.0 + 1e-4, "scatter outside boundary at {:?}", rec.p);
                scattered += 1;
            }
        }
        scattered as f32 / trials as f32
    }

    #[test]
    fn test_scatter_fraction_follows_beer_lambert() {
        // Chord through the unit sphere center has length 2.
        let density = 0.5;
        let expected = 1.0 - (-density * 2.0_f32).exp();
        let observed = scatter_fraction(Vec3::X, density, 20_000);
        assert!((observed - expected).abs() < 0.015, "observed {observed}, expected {expected}");
    }

    #[test]
    fn test_scatter_fraction_ignores_direction_length() {
        let density = 0.5;
        let expected = 1.0 - (-density * 2.0_f32).exp();
        let observed = scatter_fraction(Vec3::new(0.0, 0.0, 7.5), density, 20_000);
        assert!((observed - expected).abs() < 0.015, "observed {observed}, expected {expected}");
    }

    #[test]
    fn test_ray_starting_inside_scatters_from_origin() {
        let mut builder = SceneBuilder::new();
        let white = builder.solid_color(Color::ONE);
        let glass = builder.dielectric(1.5);
        let boundary = builder.sphere(Vec3::ZERO, 1.0, glass).unwrap();
        let fog = builder.constant_medium(boundary, 1000.0, white).unwrap();
        let arena = builder.arena();
        let mut rng = StdRng::seed_from_u64(3);

        // Very dense: almost always scatters right after the near bound.
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        let rec = arena.hit_object(fog, &ray, FORWARD, &mut rng).unwrap();
        assert!(rec.t > 0.0 && rec.t < 0.1, "t = {}", rec.t);
    }

    #[test]
    fn test_missing_boundary_never_scatters() {
        let mut builder = SceneBuilder::new();
        let white = builder.solid_color(Color::ONE);
        let glass = builder.dielectric(1.5);
        let boundary = builder.sphere(Vec3::ZERO, 1.0, glass).unwrap();
        let fog = builder.constant_medium(boundary, 1000.0, white).unwrap();
        let arena = builder.arena();
        let mut rng = StdRng::seed_from_u64(4);

        let beside = Ray::new(Vec3::new(0.0, 5.0, -5.0), Vec3::Z, 0.0);
        assert!(arena.hit_object(fog, &beside, FORWARD, &mut rng).is_none());

        // Segment already behind the query window.
        let past = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 0.0);
        assert!(arena
            .hit_object(fog, &past, Interval::new(10.0, 20.0), &mut rng)
            .is_none());
    }

    #[test]
    fn test_medium_uses_isotropic_phase_and_boundary_box() {
        let mut builder = SceneBuilder::new();
        let white = builder.solid_color(Color::ONE);
        let glass = builder.dielectric(1.5);
        let boundary = builder.sphere(Vec3::ZERO, 1.0, glass).unwrap();
        let fog = builder.constant_medium(boundary, 1000.0, white).unwrap();
        let arena = builder.arena();
        let mut rng = StdRng::seed_from_u64(5);

        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 0.0);
        let rec = arena.hit_object(fog, &ray, FORWARD, &mut rng).unwrap();
        assert!(matches!(arena.material(rec.material), crate::Material::Isotropic(_)));
        assert_eq!(
            arena.bounding_box(fog, Interval::UNIT),
            arena.bounding_box(boundary, Interval::UNIT)
        );
    }

    #[test]
    fn test_density_must_be_positive_and_finite() {
        let mut builder = SceneBuilder::new();
        let white = builder.solid_color(Color::ONE);
        let glass = builder.dielectric(1.5);
        let boundary = builder.sphere(Vec3::ZERO, 1.0, glass).unwrap();

        for density in [0.0, -1.0, f32::INFINITY, f32::NAN] {
            let result = builder.constant_medium(boundary, density, white);
            assert!(matches!(result, Err(SceneError::InvalidDensity(_))));
        }
    }
}
