//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of arena nodes. Each `BvhNode` has exactly two children,
//! which are either further BVH nodes or the primitives themselves; a
//! node over a single primitive points both children at it.

use crate::{
    hittable::{HitRecord, Hittable},
    scene::{Arena, Object, ObjectId, SceneError, SceneResult},
};
use ember_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// Interior node of the hierarchy.
#[derive(Debug, Clone)]
pub struct BvhNode {
    left: ObjectId,
    right: ObjectId,
    bbox: Aabb,
}

impl BvhNode {
    pub fn left(&self) -> ObjectId {
        self.left
    }

    pub fn right(&self) -> ObjectId {
        self.right
    }

    /// Cached union of both children's boxes.
    pub fn bbox(&self) -> Aabb {
        self.bbox
    }

    /// Build a hierarchy over `objects` and return the root node.
    ///
    /// Every primitive needs a bounding box over `time`; an unbounded one
    /// is reported as [`SceneError::Unbounded`].
    pub(crate) fn build(
        arena: &mut Arena,
        objects: &[ObjectId],
        time: Interval,
    ) -> SceneResult<ObjectId> {
        if objects.is_empty() {
            return Err(SceneError::EmptyBvh);
        }

        let mut primitives = Vec::with_capacity(objects.len());
        for &id in objects {
            arena.check_object(id)?;
            let bbox = arena.bounding_box(id, time).ok_or(SceneError::Unbounded(id))?;
            primitives.push((id, bbox));
        }

        let mut node_count = 0;
        let root = Self::build_recursive(arena, &mut primitives, &mut node_count);

        log::info!(
            "Built BVH: {} primitives, {} nodes",
            objects.len(),
            node_count
        );

        Ok(root)
    }

    /// Median split on the axis of widest centroid spread.
    fn build_recursive(
        arena: &mut Arena,
        primitives: &mut [(ObjectId, Aabb)],
        node_count: &mut usize,
    ) -> ObjectId {
        let axis = centroid_bounds(primitives).longest_axis();

        let (left, right) = match primitives.len() {
            1 => (primitives[0], primitives[0]),
            2 => {
                let (a, b) = (primitives[0], primitives[1]);
                if b.1.centroid()[axis] < a.1.centroid()[axis] {
                    (b, a)
                } else {
                    (a, b)
                }
            }
            n => {
                primitives
                    .sort_by(|(_, a), (_, b)| a.centroid()[axis].total_cmp(&b.centroid()[axis]));

                let (lower, upper) = primitives.split_at_mut(n / 2);
                let left = Self::child(arena, lower, node_count);
                let right = Self::child(arena, upper, node_count);
                (left, right)
            }
        };

        *node_count += 1;
        arena.push_object(Object::Bvh(BvhNode {
            left: left.0,
            right: right.0,
            bbox: Aabb::surrounding(&left.1, &right.1),
        }))
    }

    /// A subtree handle plus its box. Single primitives are used directly.
    fn child(
        arena: &mut Arena,
        primitives: &mut [(ObjectId, Aabb)],
        node_count: &mut usize,
    ) -> (ObjectId, Aabb) {
        if let [single] = primitives {
            return *single;
        }
        let bbox = primitives
            .iter()
            .fold(Aabb::EMPTY, |acc, (_, b)| Aabb::surrounding(&acc, b));
        (Self::build_recursive(arena, primitives, node_count), bbox)
    }
}

fn centroid_bounds(primitives: &[(ObjectId, Aabb)]) -> Aabb {
    primitives.iter().fold(Aabb::EMPTY, |acc, (_, b)| {
        let c = b.centroid();
        Aabb::surrounding(&acc, &Aabb::from_points(c, c))
    })
}

impl Hittable for BvhNode {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = arena.hit_object(self.left, ray, ray_t, rng);
        if self.left == self.right {
            return hit_left;
        }

        // Only check right up to closest hit
        let right_t = hit_left.map_or(ray_t, |rec| ray_t.with_max(rec.t));
        let hit_right = arena.hit_object(self.right, ray, right_t, rng);

        hit_right.or(hit_left)
    }

    fn bounding_box(&self, _arena: &Arena, _time: Interval) -> Option<Aabb> {
        Some(self.bbox)
    }
}
