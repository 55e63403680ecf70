//! Ember Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over an immutable scene arena. Intersectables,
//! materials and textures are closed enums stored in a [`Scene`] and
//! referenced by typed handles; the graph is a DAG built bottom-up through
//! [`SceneBuilder`].
//!
//! The crate consumes a camera through [`RayGenerator`] and a random source
//! through [`rand::RngCore`], and hands back linear radiance. Gamma,
//! quantization and file output belong to the caller.

mod builder;
mod bucket;
mod bvh;
mod hittable;
mod instance;
mod material;
mod medium;
mod perlin;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;

pub use builder::SceneBuilder;
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{FlipNormals, RotateY, Translate};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, Scatter, ScatterResult,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use rect::{AxisRect, Cuboid, RectPlane};
pub use renderer::{radiance, ray_color, render, render_pixel, ImageBuffer, RayGenerator};
pub use sampling::{gen_f32, random_in_unit_sphere};
pub use scene::{Arena, MaterialId, Object, ObjectId, Scene, SceneError, SceneResult, TextureId};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{ImageTexture, NoiseTexture, Texture};

/// Re-export math and configuration types used in the public API
pub use ember_core::{PixelBuffer, RenderConfig};
pub use ember_math::{Aabb, Interval, Ray, Vec3};

/// Linear RGB, components usually in [0, 1] but unbounded for emitters.
pub type Color = Vec3;
