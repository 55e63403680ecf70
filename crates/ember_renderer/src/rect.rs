//! Axis-aligned rectangles and the six-sided box built from them.

use crate::{
    hittable::{HitRecord, Hittable},
    scene::{Arena, MaterialId, ObjectId},
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Padding along the fixed axis so the BVH never sees a flat box.
const RECT_THICKNESS: f32 = 0.0001;

/// Which coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectPlane {
    /// Spans x and y at fixed z; normal +z
    XY,
    /// Spans x and z at fixed y; normal +y
    XZ,
    /// Spans y and z at fixed x; normal +x
    YZ,
}

impl RectPlane {
    /// Axis indices `(a, b, k)`: the two spanned axes and the fixed one.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::XY => (0, 1, 2),
            RectPlane::XZ => (0, 2, 1),
            RectPlane::YZ => (1, 2, 0),
        }
    }

    /// Unit normal along the fixed axis.
    pub fn normal(self) -> Vec3 {
        match self {
            RectPlane::XY => Vec3::Z,
            RectPlane::XZ => Vec3::Y,
            RectPlane::YZ => Vec3::X,
        }
    }
}

/// A rectangle in one of the three coordinate planes.
///
/// `a` and `b` bound the two spanned axes in `(a, b)` order of
/// [`RectPlane`]; `k` is the coordinate on the fixed axis.
#[derive(Debug, Clone)]
pub struct AxisRect {
    plane: RectPlane,
    a: Interval,
    b: Interval,
    k: f32,
    material: MaterialId,
}

impl AxisRect {
    pub fn new(plane: RectPlane, a: Interval, b: Interval, k: f32, material: MaterialId) -> Self {
        Self {
            plane,
            a,
            b,
            k,
            material,
        }
    }

    pub fn plane(&self) -> RectPlane {
        self.plane
    }
}

impl Hittable for AxisRect {
    fn hit(
        &self,
        _arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        let (ai, bi, ki) = self.plane.axes();

        // Parallel rays give +-inf or NaN here and fail the interval test.
        let t = (self.k - ray.origin[ki]) / ray.direction[ki];
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let (pa, pb) = (p[ai], p[bi]);
        if !self.a.contains(pa) || !self.b.contains(pb) {
            return None;
        }

        Some(HitRecord {
            t,
            p,
            normal: self.plane.normal(),
            u: (pa - self.a.min) / self.a.size(),
            v: (pb - self.b.min) / self.b.size(),
            material: self.material,
        })
    }

    fn bounding_box(&self, _arena: &Arena, _time: Interval) -> Option<Aabb> {
        let (ai, bi, ki) = self.plane.axes();
        let mut axes = [Interval::EMPTY; 3];
        axes[ai] = self.a;
        axes[bi] = self.b;
        axes[ki] = Interval::new(self.k - RECT_THICKNESS, self.k + RECT_THICKNESS);
        Some(Aabb::new(axes[0], axes[1], axes[2]))
    }
}

/// A closed axis-aligned box made of six rectangles.
///
/// The sides live in the arena as a list; the three faces on the min
/// corner are wrapped in `FlipNormals` so every normal points outward.
#[derive(Debug, Clone)]
pub struct Cuboid {
    sides: ObjectId,
    bbox: Aabb,
}

impl Cuboid {
    pub(crate) fn new(sides: ObjectId, p0: Vec3, p1: Vec3) -> Self {
        Self {
            sides,
            bbox: Aabb::from_points(p0, p1),
        }
    }

    /// Handle of the list holding the six faces.
    pub fn sides(&self) -> ObjectId {
        self.sides
    }
}

impl Hittable for Cuboid {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        arena.hit_object(self.sides, ray, ray_t, rng)
    }

    fn bounding_box(&self, _arena: &Arena, _time: Interval) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, SceneBuilder};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FORWARD: Interval = Interval {
        min: 0.001,
        max: f32::INFINITY,
    };

    #[test]
    fn test_xy_rect_hit_uv_and_normal() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let rect = builder
            .rect(RectPlane::XY, Interval::new(0.0, 4.0), Interval::new(0.0, 2.0), -1.0, mat)
            .unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::new(1.0, 1.5, 3.0), -Vec3::Z, 0.0);
        let rec = builder.arena().hit_object(rect, &ray, FORWARD, &mut rng).unwrap();

        assert!((rec.t - 4.0).abs() < 1e-5);
        assert_eq!(rec.normal, Vec3::Z);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_rect_orientations() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let unit = Interval::new(-1.0, 1.0);
        let xz = builder.rect(RectPlane::XZ, unit, unit, 2.0, mat).unwrap();
        let yz = builder.rect(RectPlane::YZ, unit, unit, 2.0, mat).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let up = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        let rec = builder.arena().hit_object(xz, &up, FORWARD, &mut rng).unwrap();
        assert_eq!(rec.normal, Vec3::Y);
        assert!((rec.p - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);

        let right = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = builder.arena().hit_object(yz, &right, FORWARD, &mut rng).unwrap();
        assert_eq!(rec.normal, Vec3::X);
        assert!((rec.t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rect_rejections() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let unit = Interval::new(-1.0, 1.0);
        let rect = builder.rect(RectPlane::XY, unit, unit, 0.0, mat).unwrap();
        let arena = builder.arena();
        let mut rng = StdRng::seed_from_u64(0);

        // Outside the rectangle bounds.
        let beside = Ray::new(Vec3::new(3.0, 0.0, 5.0), -Vec3::Z, 0.0);
        assert!(arena.hit_object(rect, &beside, FORWARD, &mut rng).is_none());

        // Parallel to the plane, both off it and in it.
        let parallel = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X, 0.0);
        assert!(arena.hit_object(rect, &parallel, FORWARD, &mut rng).is_none());
        let in_plane = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 0.0);
        assert!(arena.hit_object(rect, &in_plane, FORWARD, &mut rng).is_none());

        // Behind the origin.
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 0.0);
        assert!(arena.hit_object(rect, &away, FORWARD, &mut rng).is_none());
    }

    #[test]
    fn test_rect_box_is_padded() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let rect = builder
            .rect(RectPlane::XZ, Interval::new(0.0, 5.0), Interval::new(1.0, 2.0), 3.0, mat)
            .unwrap();

        let bbox = builder.arena().bounding_box(rect, Interval::UNIT).unwrap();
        assert_eq!(bbox.x, Interval::new(0.0, 5.0));
        assert_eq!(bbox.z, Interval::new(1.0, 2.0));
        assert!(bbox.y.size() > 0.0);
        assert!(bbox.y.contains(3.0));
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let cube = builder.cuboid(Vec3::splat(-1.0), Vec3::splat(1.0), mat).unwrap();
        let arena = builder.arena();
        let mut rng = StdRng::seed_from_u64(0);

        let cases = [
            (Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, Vec3::Z),
            (Vec3::new(0.0, 0.0, -5.0), Vec3::Z, -Vec3::Z),
            (Vec3::new(0.0, 5.0, 0.0), -Vec3::Y, Vec3::Y),
            (Vec3::new(0.0, -5.0, 0.0), Vec3::Y, -Vec3::Y),
            (Vec3::new(5.0, 0.0, 0.0), -Vec3::X, Vec3::X),
            (Vec3::new(-5.0, 0.0, 0.0), Vec3::X, -Vec3::X),
        ];
        for (origin, direction, expected) in cases {
            let ray = Ray::new(origin, direction, 0.0);
            let rec = arena.hit_object(cube, &ray, FORWARD, &mut rng).unwrap();
            assert!((rec.t - 4.0).abs() < 1e-5);
            assert_eq!(rec.normal, expected, "ray from {origin:?}");
        }
    }

    #[test]
    fn test_cuboid_box_is_exact_corners() {
        let mut builder = SceneBuilder::new();
        let mat = builder.lambertian_color(Color::ONE);
        let cube = builder
            .cuboid(Vec3::new(265.0, 0.0, 295.0), Vec3::new(430.0, 330.0, 460.0), mat)
            .unwrap();

        let bbox = builder.arena().bounding_box(cube, Interval::UNIT).unwrap();
        assert_eq!(bbox.min(), Vec3::new(265.0, 0.0, 295.0));
        assert_eq!(bbox.max(), Vec3::new(430.0, 330.0, 460.0));
    }
}
