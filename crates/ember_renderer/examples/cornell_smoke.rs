//! Cornell box with two smoke-filled blocks.
//!
//! Usage: `cargo run --release --example cornell_smoke [output.png] [config.json]`
//!
//! The camera and PNG output live here, outside the renderer: a pinhole
//! `RayGenerator` and a gamma-2 quantizer.

use anyhow::{Context, Result};
use ember_renderer::{
    gen_f32, render, Color, ImageBuffer, Interval, ObjectId, Ray, RayGenerator, RectPlane,
    RenderConfig, Scene, SceneBuilder, Vec3,
};
use rand::RngCore;

const WIDTH: u32 = 400;
const HEIGHT: u32 = 400;

/// Pinhole camera with a shutter; no depth of field.
struct PinholeCamera {
    width: u32,
    height: u32,
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    shutter: Interval,
}

impl PinholeCamera {
    fn new(width: u32, height: u32, look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32) -> Self {
        let aspect = width as f32 / height as f32;
        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = aspect * half_height;

        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        Self {
            width,
            height,
            origin: look_from,
            lower_left_corner: look_from - half_width * u - half_height * v - w,
            horizontal: 2.0 * half_width * u,
            vertical: 2.0 * half_height * v,
            shutter: Interval::UNIT,
        }
    }
}

impl RayGenerator for PinholeCamera {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let s = (x as f32 + gen_f32(rng)) / self.width as f32;
        // Pixel rows run top-down, the image plane bottom-up.
        let t = ((self.height - 1 - y) as f32 + gen_f32(rng)) / self.height as f32;
        let time = self.shutter.min + gen_f32(rng) * self.shutter.size();

        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(self.origin, target - self.origin, time)
    }
}

fn cornell_smoke() -> Result<Scene> {
    let mut builder = SceneBuilder::new();

    let red = builder.lambertian_color(Color::new(0.65, 0.05, 0.05));
    let white = builder.lambertian_color(Color::new(0.73, 0.73, 0.73));
    let green = builder.lambertian_color(Color::new(0.12, 0.45, 0.15));
    let light = builder.diffuse_light_color(Color::splat(7.0));

    let wall = Interval::new(0.0, 555.0);
    let mut objects: Vec<ObjectId> = Vec::new();

    let left = builder.rect(RectPlane::YZ, wall, wall, 555.0, green)?;
    objects.push(builder.flip_normals(left)?);
    objects.push(builder.rect(RectPlane::YZ, wall, wall, 0.0, red)?);
    objects.push(builder.rect(
        RectPlane::XZ,
        Interval::new(113.0, 443.0),
        Interval::new(127.0, 432.0),
        554.0,
        light,
    )?);
    let ceiling = builder.rect(RectPlane::XZ, wall, wall, 555.0, white)?;
    objects.push(builder.flip_normals(ceiling)?);
    objects.push(builder.rect(RectPlane::XZ, wall, wall, 0.0, white)?);
    let back = builder.rect(RectPlane::XY, wall, wall, 555.0, white)?;
    objects.push(builder.flip_normals(back)?);

    let short_box = builder.cuboid(Vec3::ZERO, Vec3::splat(165.0), white)?;
    let short_box = builder.rotate_y(short_box, -18.0)?;
    let short_box = builder.translate(short_box, Vec3::new(130.0, 0.0, 65.0))?;

    let tall_box = builder.cuboid(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white)?;
    let tall_box = builder.rotate_y(tall_box, 15.0)?;
    let tall_box = builder.translate(tall_box, Vec3::new(265.0, 0.0, 295.0))?;

    let white_smoke = builder.solid_color(Color::ONE);
    let black_smoke = builder.solid_color(Color::ZERO);
    objects.push(builder.constant_medium(short_box, 0.01, white_smoke)?);
    objects.push(builder.constant_medium(tall_box, 0.01, black_smoke)?);

    let root = builder.bvh(&objects)?;
    Ok(builder.build(root)?)
}

fn save_png(image: &ImageBuffer, path: &str) -> Result<()> {
    let to_byte = |linear: f32| (255.99 * linear.max(0.0).sqrt().min(1.0)) as u8;

    let mut bytes = Vec::with_capacity(image.pixels.len() * 3);
    for color in &image.pixels {
        bytes.extend_from_slice(&[to_byte(color.x), to_byte(color.y), to_byte(color.z)]);
    }

    image::save_buffer(path, &bytes, image.width, image.height, image::ColorType::Rgb8)
        .with_context(|| format!("Failed to write {}", path))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "cornell_smoke.png".to_string());
    let config = match args.next() {
        Some(path) => RenderConfig::load(&path).with_context(|| format!("Loading {}", path))?,
        None => RenderConfig::default(),
    };

    let scene = cornell_smoke()?;
    let camera = PinholeCamera::new(
        WIDTH,
        HEIGHT,
        Vec3::new(278.0, 278.0, -800.0),
        Vec3::new(278.0, 278.0, 0.0),
        Vec3::Y,
        40.0,
    );

    let image = render(&camera, &scene, &config);
    save_png(&image, &output)?;
    log::info!("Saved {}", output);

    Ok(())
}
