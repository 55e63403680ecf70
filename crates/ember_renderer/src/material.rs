//! Materials: how light scatters off, refracts through or leaves a surface.

use crate::{
    hittable::HitRecord,
    sampling::{gen_f32, random_in_unit_sphere},
    scene::{Arena, TextureId},
    Color, Ray, Vec3,
};
use rand::RngCore;

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel throughput applied to the scattered ray's radiance
    pub attenuation: Color,
    /// The continuation ray, starting at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Scatter {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` when the path ends here (absorbed or emitter).
    fn scatter(
        &self,
        arena: &Arena,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Light emitted at the given surface point. Black for non-emitters.
    fn emitted(&self, _arena: &Arena, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: TextureId,
}

impl Lambertian {
    pub fn new(albedo: TextureId) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> TextureId {
        self.albedo
    }
}

impl Scatter for Lambertian {
    fn scatter(
        &self,
        arena: &Arena,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: arena.texture_value(self.albedo, rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough. Values
    ///   outside [0, 1] are clamped.
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        let clamped = fuzz.clamp(0.0, 1.0);
        if clamped != fuzz {
            log::warn!("Metal fuzz {} outside [0, 1], clamped to {}", fuzz, clamped);
        }
        Self {
            albedo,
            fuzz: clamped,
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Scatter for Metal {
    fn scatter(
        &self,
        _arena: &Arena,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
///
/// Normals are outward, so the side the ray arrives from is read off the
/// sign of `direction . normal` rather than a stored front-face flag.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }
}

impl Scatter for Dielectric {
    fn scatter(
        &self,
        _arena: &Arena,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let direction = ray_in.direction();
        let reflected = reflect(direction, rec.normal);
        let d_dot_n = direction.dot(rec.normal);

        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            // Leaving the medium.
            let cosine = d_dot_n / direction.length();
            let cosine = (1.0 - self.ior * self.ior * (1.0 - cosine * cosine)).sqrt();
            (-rec.normal, self.ior, cosine)
        } else {
            (rec.normal, 1.0 / self.ior, -d_dot_n / direction.length())
        };

        let refracted = refract(direction, outward_normal, ni_over_nt);
        let reflect_prob = match refracted {
            Some(_) => schlick(cosine, self.ior),
            None => 1.0,
        };

        // Always draw, so the random stream does not depend on the branch.
        let u = gen_f32(rng);
        let out_direction = match refracted {
            Some(refracted) if u >= reflect_prob => refracted,
            _ => reflected,
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, out_direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter. Never scatters.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: TextureId,
}

impl DiffuseLight {
    pub fn new(emit: TextureId) -> Self {
        Self { emit }
    }

    pub fn emit(&self) -> TextureId {
        self.emit
    }
}

impl Scatter for DiffuseLight {
    fn scatter(
        &self,
        _arena: &Arena,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, arena: &Arena, u: f32, v: f32, p: Vec3) -> Color {
        arena.texture_value(self.emit, u, v, p)
    }
}

/// Phase function of a participating medium: scatters uniformly in all
/// directions.
#[derive(Debug, Clone)]
pub struct Isotropic {
    albedo: TextureId,
}

impl Isotropic {
    pub fn new(albedo: TextureId) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> TextureId {
        self.albedo
    }
}

impl Scatter for Isotropic {
    fn scatter(
        &self,
        arena: &Arena,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: arena.texture_value(self.albedo, rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_in_unit_sphere(rng), ray_in.time()),
        })
    }
}

/// Every material kind the renderer knows about.
#[derive(Debug, Clone)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
    Isotropic(Isotropic),
}

impl Scatter for Material {
    fn scatter(
        &self,
        arena: &Arena,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(arena, ray_in, rec, rng),
            Material::Metal(m) => m.scatter(arena, ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(arena, ray_in, rec, rng),
            Material::DiffuseLight(m) => m.scatter(arena, ray_in, rec, rng),
            Material::Isotropic(m) => m.scatter(arena, ray_in, rec, rng),
        }
    }

    fn emitted(&self, arena: &Arena, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight(m) => m.emitted(arena, u, v, p),
            _ => Color::ZERO,
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

impl From<DiffuseLight> for Material {
    fn from(m: DiffuseLight) -> Self {
        Material::DiffuseLight(m)
    }
}

impl From<Isotropic> for Material {
    fn from(m: Isotropic) -> Self {
        Material::Isotropic(m)
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of `v` through a surface with normal `n` facing the
/// incoming side. `None` on total internal reflection.
fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation for reflectance
fn schlick(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
