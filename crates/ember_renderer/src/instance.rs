//! Instance wrappers that reuse a child in a different placement.
//!
//! Rather than moving geometry, each wrapper moves the ray into the child's
//! local frame, delegates, and maps the hit back to world space.

use crate::{
    hittable::{HitRecord, Hittable},
    scene::{Arena, ObjectId},
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A child shifted by a fixed offset.
#[derive(Debug, Clone)]
pub struct Translate {
    child: ObjectId,
    offset: Vec3,
}

impl Translate {
    pub fn new(child: ObjectId, offset: Vec3) -> Self {
        Self { child, offset }
    }

    pub fn child(&self) -> ObjectId {
        self.child
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl Hittable for Translate {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        let local_ray = ray.with_origin(ray.origin() - self.offset);
        let mut rec = arena.hit_object(self.child, &local_ray, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, arena: &Arena, time: Interval) -> Option<Aabb> {
        arena
            .bounding_box(self.child, time)
            .map(|bbox| bbox.translate(self.offset))
    }
}

/// A child rotated about the world y axis.
///
/// The bounding box is computed once at construction from the eight
/// rotated corners of the child's box, so it is conservative rather than
/// tight.
#[derive(Debug, Clone)]
pub struct RotateY {
    child: ObjectId,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Option<Aabb>,
}

impl RotateY {
    /// Rotate `child` by `degrees`, bounding it over the shutter `time`.
    pub(crate) fn new(arena: &Arena, child: ObjectId, degrees: f32, time: Interval) -> Self {
        let (sin_theta, cos_theta) = degrees.to_radians().sin_cos();

        let bbox = arena.bounding_box(child, time).map(|child_box| {
            let mut min = Vec3::splat(f32::INFINITY);
            let mut max = Vec3::splat(f32::NEG_INFINITY);
            for corner in child_box.corners() {
                let rotated = rotate_forward(sin_theta, cos_theta, corner);
                min = min.min(rotated);
                max = max.max(rotated);
            }
            Aabb::from_points(min, max)
        });

        Self {
            child,
            sin_theta,
            cos_theta,
            bbox,
        }
    }

    pub fn child(&self) -> ObjectId {
        self.child
    }

    /// World to object space.
    #[inline]
    fn to_local(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

/// Object to world space.
#[inline]
fn rotate_forward(sin_theta: f32, cos_theta: f32, v: Vec3) -> Vec3 {
    Vec3::new(
        cos_theta * v.x + sin_theta * v.z,
        v.y,
        -sin_theta * v.x + cos_theta * v.z,
    )
}

impl Hittable for RotateY {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        let local_ray = Ray::new(
            self.to_local(ray.origin()),
            self.to_local(ray.direction()),
            ray.time(),
        );

        let mut rec = arena.hit_object(self.child, &local_ray, ray_t, rng)?;
        rec.p = rotate_forward(self.sin_theta, self.cos_theta, rec.p);
        rec.normal = rotate_forward(self.sin_theta, self.cos_theta, rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, _arena: &Arena, _time: Interval) -> Option<Aabb> {
        self.bbox
    }
}

/// Turns the child's normals around; bounds pass through.
#[derive(Debug, Clone)]
pub struct FlipNormals {
    child: ObjectId,
}

impl FlipNormals {
    pub fn new(child: ObjectId) -> Self {
        Self { child }
    }

    pub fn child(&self) -> ObjectId {
        self.child
    }
}

impl Hittable for FlipNormals {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        let mut rec = arena.hit_object(self.child, ray, ray_t, rng)?;
        rec.normal = -rec.normal;
        Some(rec)
    }

    fn bounding_box(&self, arena: &Arena, time: Interval) -> Option<Aabb> {
        arena.bounding_box(self.child, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, RectPlane, SceneBuilder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FORWARD: Interval = Interval {
        min: 0.001,
        max: f32::INFINITY,
    };

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let sphere = builder.sphere(Vec3::ZERO, 1.0, mat).unwrap();
        let moved = builder.translate(sphere, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(10.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let rec = builder.arena().hit_object(moved, &ray, FORWARD, &mut rng).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
        assert_vec_near(rec.p, Vec3::new(10.0, 0.0, 1.0));
        assert_vec_near(rec.normal, Vec3::Z);

        let old_spot = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        assert!(builder.arena().hit_object(moved, &old_spot, FORWARD, &mut rng).is_none());
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        // Facing +z at z = 1; after +90 degrees about y it faces +x at x = 1.
        let unit = Interval::new(-0.5, 0.5);
        let rect = builder.rect(RectPlane::XY, unit, unit, 1.0, mat).unwrap();
        let rotated = builder.rotate_y(rect, 90.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::X, 0.0);
        let rec = builder.arena().hit_object(rotated, &ray, FORWARD, &mut rng).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert_vec_near(rec.p, Vec3::new(1.0, 0.0, 0.0));
        assert_vec_near(rec.normal, Vec3::X);

        // cos(90 degrees) is not exactly zero in f32, so compare extents loosely.
        let bbox = builder.arena().bounding_box(rotated, Interval::UNIT).unwrap();
        assert!(bbox.contains_point(Vec3::new(1.0, 0.25, 0.25)));
        assert!(bbox.contains_point(Vec3::new(1.0, -0.25, -0.25)));
        assert!((bbox.x.min - 1.0).abs() < 1e-3 && (bbox.x.max - 1.0).abs() < 1e-3);
        assert!((bbox.z.min + 0.5).abs() < 1e-4);
        assert!((bbox.z.max - 0.5).abs() < 1e-4);
        assert!((bbox.y.max - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_y_box_is_conservative() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let cube = builder.cuboid(Vec3::splat(-1.0), Vec3::splat(1.0), mat).unwrap();
        let rotated = builder.rotate_y(cube, 45.0).unwrap();

        let bbox = builder.arena().bounding_box(rotated, Interval::UNIT).unwrap();
        let half_diagonal = 2.0_f32.sqrt();
        assert!((bbox.x.max - half_diagonal).abs() < 1e-4);
        assert!((bbox.z.min + half_diagonal).abs() < 1e-4);
        assert!((bbox.y.max - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_translated_unrotated_box_only_shifts() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let p0 = Vec3::ZERO;
        let p1 = Vec3::new(165.0, 330.0, 165.0);
        let offset = Vec3::new(265.0, 0.0, 295.0);
        let cube = builder.cuboid(p0, p1, mat).unwrap();
        let rotated = builder.rotate_y(cube, 0.0).unwrap();
        let placed = builder.translate(rotated, offset).unwrap();

        let arena = builder.arena();
        let expected = arena.bounding_box(cube, Interval::UNIT).unwrap().translate(offset);
        let actual = arena.bounding_box(placed, Interval::UNIT).unwrap();
        assert_vec_near(actual.min(), expected.min());
        assert_vec_near(actual.max(), expected.max());
        assert_vec_near(actual.min(), p0 + offset);
        assert_vec_near(actual.max(), p1 + offset);
    }

    #[test]
    fn test_flip_normals_negates_and_keeps_box() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let sphere = builder.sphere(Vec3::ZERO, 1.0, mat).unwrap();
        let flipped = builder.flip_normals(sphere).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let arena = builder.arena();
        let plain = arena.hit_object(sphere, &ray, FORWARD, &mut rng).unwrap();
        let rec = arena.hit_object(flipped, &ray, FORWARD, &mut rng).unwrap();
        assert_eq!(rec.normal, -plain.normal);
        assert_eq!(rec.t, plain.t);
        assert_eq!(
            arena.bounding_box(flipped, Interval::UNIT),
            arena.bounding_box(sphere, Interval::UNIT)
        );
    }
}
