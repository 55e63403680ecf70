//! Bottom-up scene construction.
//!
//! Every `add`-style method checks the handles it is given against what
//! the builder already holds, so a parent can only reference existing
//! children and the finished graph is acyclic.

use crate::{
    bvh::BvhNode,
    hittable::HittableList,
    instance::{FlipNormals, RotateY, Translate},
    material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal},
    medium::ConstantMedium,
    perlin::Perlin,
    rect::{AxisRect, Cuboid, RectPlane},
    scene::{Arena, MaterialId, Object, ObjectId, Scene, SceneError, SceneResult, TextureId},
    sphere::{MovingSphere, Sphere},
    texture::{ImageTexture, NoiseTexture, Texture},
    Color, PixelBuffer,
};
use ember_math::{Interval, Vec3};
use std::sync::Arc;

/// Builds a [`Scene`] one node at a time.
///
/// # Example
/// ```
/// use ember_renderer::{Color, SceneBuilder, Vec3};
///
/// let mut builder = SceneBuilder::new();
/// let red = builder.lambertian_color(Color::new(0.65, 0.05, 0.05));
/// let ball = builder.sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, red)?;
/// let scene = builder.build(ball)?;
/// assert_eq!(scene.root(), ball);
/// # Ok::<(), ember_renderer::SceneError>(())
/// ```
pub struct SceneBuilder {
    arena: Arena,
    shutter: Interval,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    /// A builder with a `[0, 1]` shutter.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            shutter: Interval::UNIT,
        }
    }

    /// Shutter interval used for the bounding boxes computed at build
    /// time (BVH splits, rotated boxes).
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.shutter = Interval::new(time0, time1);
        self
    }

    pub fn shutter(&self) -> Interval {
        self.shutter
    }

    /// Nodes added so far.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    // Textures

    pub fn add_texture(&mut self, texture: Texture) -> SceneResult<TextureId> {
        if let Texture::Checker { even, odd } = &texture {
            self.arena.check_texture(*even)?;
            self.arena.check_texture(*odd)?;
        }
        Ok(self.arena.push_texture(texture))
    }

    pub fn solid_color(&mut self, color: Color) -> TextureId {
        self.arena.push_texture(Texture::Constant(color))
    }

    pub fn checker(&mut self, even: TextureId, odd: TextureId) -> SceneResult<TextureId> {
        self.add_texture(Texture::Checker { even, odd })
    }

    pub fn noise(&mut self, noise: Arc<Perlin>, scale: f32) -> TextureId {
        self.arena
            .push_texture(Texture::Noise(NoiseTexture::new(noise, scale)))
    }

    pub fn image(&mut self, pixels: Arc<PixelBuffer>) -> TextureId {
        self.arena
            .push_texture(Texture::Image(ImageTexture::new(pixels)))
    }

    // Materials

    pub fn add_material(&mut self, material: impl Into<Material>) -> SceneResult<MaterialId> {
        let material = material.into();
        match &material {
            Material::Lambertian(m) => self.arena.check_texture(m.albedo())?,
            Material::DiffuseLight(m) => self.arena.check_texture(m.emit())?,
            Material::Isotropic(m) => self.arena.check_texture(m.albedo())?,
            Material::Metal(_) | Material::Dielectric(_) => {}
        }
        Ok(self.arena.push_material(material))
    }

    pub fn lambertian(&mut self, albedo: TextureId) -> SceneResult<MaterialId> {
        self.add_material(Lambertian::new(albedo))
    }

    pub fn lambertian_color(&mut self, albedo: Color) -> MaterialId {
        let texture = self.solid_color(albedo);
        self.arena
            .push_material(Material::Lambertian(Lambertian::new(texture)))
    }

    pub fn metal(&mut self, albedo: Color, fuzz: f32) -> MaterialId {
        self.arena
            .push_material(Material::Metal(Metal::new(albedo, fuzz)))
    }

    pub fn dielectric(&mut self, ior: f32) -> MaterialId {
        self.arena
            .push_material(Material::Dielectric(Dielectric::new(ior)))
    }

    pub fn diffuse_light(&mut self, emit: TextureId) -> SceneResult<MaterialId> {
        self.add_material(DiffuseLight::new(emit))
    }

    pub fn diffuse_light_color(&mut self, emit: Color) -> MaterialId {
        let texture = self.solid_color(emit);
        self.arena
            .push_material(Material::DiffuseLight(DiffuseLight::new(texture)))
    }

    pub fn isotropic(&mut self, albedo: TextureId) -> SceneResult<MaterialId> {
        self.add_material(Isotropic::new(albedo))
    }

    pub fn isotropic_color(&mut self, albedo: Color) -> MaterialId {
        let texture = self.solid_color(albedo);
        self.arena
            .push_material(Material::Isotropic(Isotropic::new(texture)))
    }

    // Geometry

    pub fn sphere(
        &mut self,
        center: Vec3,
        radius: f32,
        material: MaterialId,
    ) -> SceneResult<ObjectId> {
        self.arena.check_material(material)?;
        Ok(self
            .arena
            .push_object(Object::Sphere(Sphere::new(center, radius, material))))
    }

    pub fn moving_sphere(
        &mut self,
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: MaterialId,
    ) -> SceneResult<ObjectId> {
        self.arena.check_material(material)?;
        Ok(self.arena.push_object(Object::MovingSphere(MovingSphere::new(
            center0, center1, time0, time1, radius, material,
        ))))
    }

    /// Rectangle spanning `a` and `b` on the plane's two free axes at
    /// coordinate `k` on the fixed one.
    pub fn rect(
        &mut self,
        plane: RectPlane,
        a: Interval,
        b: Interval,
        k: f32,
        material: MaterialId,
    ) -> SceneResult<ObjectId> {
        self.arena.check_material(material)?;
        Ok(self
            .arena
            .push_object(Object::Rect(AxisRect::new(plane, a, b, k, material))))
    }

    /// Closed box between two opposite corners, given in any order.
    pub fn cuboid(&mut self, p0: Vec3, p1: Vec3, material: MaterialId) -> SceneResult<ObjectId> {
        self.arena.check_material(material)?;
        let (lo, hi) = (p0.min(p1), p0.max(p1));
        let x = Interval::new(lo.x, hi.x);
        let y = Interval::new(lo.y, hi.y);
        let z = Interval::new(lo.z, hi.z);

        let faces = [
            (RectPlane::XY, x, y, hi.z, false),
            (RectPlane::XY, x, y, lo.z, true),
            (RectPlane::XZ, x, z, hi.y, false),
            (RectPlane::XZ, x, z, lo.y, true),
            (RectPlane::YZ, y, z, hi.x, false),
            (RectPlane::YZ, y, z, lo.x, true),
        ];

        let mut sides = Vec::with_capacity(faces.len());
        for (plane, a, b, k, flipped) in faces {
            let face = self
                .arena
                .push_object(Object::Rect(AxisRect::new(plane, a, b, k, material)));
            sides.push(if flipped {
                self.arena.push_object(Object::FlipNormals(FlipNormals::new(face)))
            } else {
                face
            });
        }

        let sides = self
            .arena
            .push_object(Object::List(HittableList::new(sides)));
        Ok(self.arena.push_object(Object::Cuboid(Cuboid::new(sides, lo, hi))))
    }

    pub fn list(&mut self, objects: Vec<ObjectId>) -> SceneResult<ObjectId> {
        for &id in &objects {
            self.arena.check_object(id)?;
        }
        Ok(self
            .arena
            .push_object(Object::List(HittableList::new(objects))))
    }

    /// Hierarchy over `objects`, bounded over the builder's shutter.
    pub fn bvh(&mut self, objects: &[ObjectId]) -> SceneResult<ObjectId> {
        BvhNode::build(&mut self.arena, objects, self.shutter)
    }

    pub fn translate(&mut self, child: ObjectId, offset: Vec3) -> SceneResult<ObjectId> {
        self.arena.check_object(child)?;
        Ok(self
            .arena
            .push_object(Object::Translate(Translate::new(child, offset))))
    }

    /// Rotation about the y axis by `degrees`.
    pub fn rotate_y(&mut self, child: ObjectId, degrees: f32) -> SceneResult<ObjectId> {
        self.arena.check_object(child)?;
        let rotated = RotateY::new(&self.arena, child, degrees, self.shutter);
        Ok(self.arena.push_object(Object::RotateY(rotated)))
    }

    pub fn flip_normals(&mut self, child: ObjectId) -> SceneResult<ObjectId> {
        self.arena.check_object(child)?;
        Ok(self
            .arena
            .push_object(Object::FlipNormals(FlipNormals::new(child))))
    }

    /// Fog of the given density filling `boundary`, scattering with an
    /// isotropic phase function colored by `albedo`.
    pub fn constant_medium(
        &mut self,
        boundary: ObjectId,
        density: f32,
        albedo: TextureId,
    ) -> SceneResult<ObjectId> {
        self.arena.check_object(boundary)?;
        if !(density > 0.0 && density.is_finite()) {
            return Err(SceneError::InvalidDensity(density));
        }
        let phase_function = self.isotropic(albedo)?;
        Ok(self.arena.push_object(Object::ConstantMedium(ConstantMedium::new(
            boundary,
            density,
            phase_function,
        ))))
    }

    /// Freeze the arena into a scene rooted at `root`.
    pub fn build(self, root: ObjectId) -> SceneResult<Scene> {
        self.arena.check_object(root)?;

        log::info!(
            "Scene built: {} objects, {} materials, {} textures (root: {})",
            self.arena.object_count(),
            self.arena.material_count(),
            self.arena.texture_count(),
            self.arena.object(root).kind_name()
        );

        Ok(Scene::new(self.arena, root))
    }
}
