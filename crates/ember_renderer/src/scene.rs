//! Scene arena: every intersectable, material and texture lives in one
//! flat vector per kind and is referenced by a typed handle.
//!
//! Children are always pushed before their parents, so handles only ever
//! point backwards and the object graph cannot contain a cycle.

use crate::{
    bvh::BvhNode,
    hittable::{HitRecord, Hittable, HittableList},
    instance::{FlipNormals, RotateY, Translate},
    material::Material,
    medium::ConstantMedium,
    rect::{AxisRect, Cuboid},
    sphere::{MovingSphere, Sphere},
    texture::Texture,
    Color,
};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use thiserror::Error;

/// Handle to an intersectable in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

/// Handle to a material in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

/// Handle to a texture in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

impl ObjectId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MaterialId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TextureId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Construction-time invariant violations.
///
/// Queries never fail; these are raised only while a scene is being built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Unknown object handle {0:?}")]
    UnknownObject(ObjectId),

    #[error("Unknown material handle {0:?}")]
    UnknownMaterial(MaterialId),

    #[error("Unknown texture handle {0:?}")]
    UnknownTexture(TextureId),

    #[error("Cannot build a BVH over zero primitives")]
    EmptyBvh,

    #[error("Object {0:?} has no bounding box and cannot be placed in a BVH")]
    Unbounded(ObjectId),

    #[error("Medium density must be positive and finite, got {0}")]
    InvalidDensity(f32),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Every kind of intersectable the renderer knows about.
#[derive(Debug, Clone)]
pub enum Object {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AxisRect),
    Cuboid(Cuboid),
    List(HittableList),
    Bvh(BvhNode),
    Translate(Translate),
    RotateY(RotateY),
    FlipNormals(FlipNormals),
    ConstantMedium(ConstantMedium),
}

impl Object {
    /// Short variant name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Object::Sphere(_) => "sphere",
            Object::MovingSphere(_) => "moving sphere",
            Object::Rect(_) => "rect",
            Object::Cuboid(_) => "box",
            Object::List(_) => "list",
            Object::Bvh(_) => "bvh node",
            Object::Translate(_) => "translate",
            Object::RotateY(_) => "rotate y",
            Object::FlipNormals(_) => "flip normals",
            Object::ConstantMedium(_) => "constant medium",
        }
    }
}

impl Hittable for Object {
    fn hit(
        &self,
        arena: &Arena,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        match self {
            Object::Sphere(o) => o.hit(arena, ray, ray_t, rng),
            Object::MovingSphere(o) => o.hit(arena, ray, ray_t, rng),
            Object::Rect(o) => o.hit(arena, ray, ray_t, rng),
            Object::Cuboid(o) => o.hit(arena, ray, ray_t, rng),
            Object::List(o) => o.hit(arena, ray, ray_t, rng),
            Object::Bvh(o) => o.hit(arena, ray, ray_t, rng),
            Object::Translate(o) => o.hit(arena, ray, ray_t, rng),
            Object::RotateY(o) => o.hit(arena, ray, ray_t, rng),
            Object::FlipNormals(o) => o.hit(arena, ray, ray_t, rng),
            Object::ConstantMedium(o) => o.hit(arena, ray, ray_t, rng),
        }
    }

    fn bounding_box(&self, arena: &Arena, time: Interval) -> Option<Aabb> {
        match self {
            Object::Sphere(o) => o.bounding_box(arena, time),
            Object::MovingSphere(o) => o.bounding_box(arena, time),
            Object::Rect(o) => o.bounding_box(arena, time),
            Object::Cuboid(o) => o.bounding_box(arena, time),
            Object::List(o) => o.bounding_box(arena, time),
            Object::Bvh(o) => o.bounding_box(arena, time),
            Object::Translate(o) => o.bounding_box(arena, time),
            Object::RotateY(o) => o.bounding_box(arena, time),
            Object::FlipNormals(o) => o.bounding_box(arena, time),
            Object::ConstantMedium(o) => o.bounding_box(arena, time),
        }
    }
}

/// Flat storage for a scene's nodes.
#[derive(Debug, Default)]
pub struct Arena {
    objects: Vec<Object>,
    materials: Vec<Material>,
    textures: Vec<Texture>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_object(&mut self, object: Object) -> ObjectId {
        self.objects.push(object);
        ObjectId((self.objects.len() - 1) as u32)
    }

    pub(crate) fn push_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId((self.materials.len() - 1) as u32)
    }

    pub(crate) fn push_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId((self.textures.len() - 1) as u32)
    }

    pub(crate) fn check_object(&self, id: ObjectId) -> SceneResult<()> {
        if id.index() < self.objects.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownObject(id))
        }
    }

    pub(crate) fn check_material(&self, id: MaterialId) -> SceneResult<()> {
        if id.index() < self.materials.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownMaterial(id))
        }
    }

    pub(crate) fn check_texture(&self, id: TextureId) -> SceneResult<()> {
        if id.index() < self.textures.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownTexture(id))
        }
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    #[inline]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.index()]
    }

    #[inline]
    pub fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id.index()]
    }

    /// Nearest hit against one node of the graph.
    #[inline]
    pub fn hit_object(
        &self,
        id: ObjectId,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord> {
        self.object(id).hit(self, ray, ray_t, rng)
    }

    #[inline]
    pub fn bounding_box(&self, id: ObjectId, time: Interval) -> Option<Aabb> {
        self.object(id).bounding_box(self, time)
    }

    #[inline]
    pub fn texture_value(&self, id: TextureId, u: f32, v: f32, p: Vec3) -> Color {
        self.texture(id).value(self, u, v, p)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }
}

/// An immutable scene: the arena plus the root intersectable.
///
/// `Scene` is `Send + Sync`; render threads share it by reference.
pub struct Scene {
    arena: Arena,
    root: ObjectId,
}

impl Scene {
    pub(crate) fn new(arena: Arena, root: ObjectId) -> Self {
        Self { arena, root }
    }

    /// A scene with nothing in it: every ray misses.
    pub fn empty() -> Self {
        let mut arena = Arena::new();
        let root = arena.push_object(Object::List(HittableList::new(Vec::new())));
        Self { arena, root }
    }

    pub fn root(&self) -> ObjectId {
        self.root
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        self.arena.object(id)
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        self.arena.material(id)
    }

    pub fn texture(&self, id: TextureId) -> &Texture {
        self.arena.texture(id)
    }

    /// Nearest hit of `ray` against the whole scene within `ray_t`.
    #[inline]
    pub fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord> {
        self.arena.hit_object(self.root, ray, ray_t, rng)
    }

    /// Bounds of the root over the given shutter interval.
    pub fn bounding_box(&self, time: Interval) -> Option<Aabb> {
        self.arena.bounding_box(self.root, time)
    }
}
