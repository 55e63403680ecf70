//! Hittable trait and HitRecord for ray-object intersection.

use crate::scene::{Arena, MaterialId, ObjectId};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal. Points outward unless a `FlipNormals` wrapper
    /// turned it around; it is not reoriented against the ray.
    pub normal: Vec3,
    /// Surface coordinates in [0, 1]
    pub u: f32,
    pub v: f32,
    /// Material of the surface that was hit
    pub material: MaterialId,
}

/// Anything a ray can be intersected with.
///
/// `rng` is only consumed by stochastic intersectables (participating
/// media); every other implementation ignores it.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with parameter strictly inside `ray_t`.
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord>;

    /// Bounds over the shutter interval `time`, or `None` when the object
    /// cannot be bounded.
    fn bounding_box(&self, arena: &Arena, time: Interval) -> Option<Aabb>;
}

/// An unordered collection of intersectables, scanned linearly.
#[derive(Debug, Clone, Default)]
pub struct HittableList {
    objects: Vec<ObjectId>,
}

impl HittableList {
    pub fn new(objects: Vec<ObjectId>) -> Self {
        Self { objects }
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }
}

impl Hittable for HittableList {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for &object in &self.objects {
            let interval = closest.map_or(ray_t, |rec| ray_t.with_max(rec.t));
            if let Some(rec) = arena.hit_object(object, ray, interval, rng) {
                closest = Some(rec);
            }
        }

        closest
    }

    /// Union of all children. An empty list, or one with any unbounded
    /// child, is itself unbounded.
    fn bounding_box(&self, arena: &Arena, time: Interval) -> Option<Aabb> {
        let (first, rest) = self.objects.split_first()?;
        let mut bbox = arena.bounding_box(*first, time)?;
        for &object in rest {
            bbox = Aabb::surrounding(&bbox, &arena.bounding_box(object, time)?);
        }
        Some(bbox)
    }
}
