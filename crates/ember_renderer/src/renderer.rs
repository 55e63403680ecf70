//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with a hard depth cutoff
//! - Emission added at every bounce
//! - Anti-aliasing via multi-sampling, driven by a caller-supplied camera

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::material::Scatter;
use crate::{Color, Interval, Ray, RenderConfig, Scene};
use rand::RngCore;
use rayon::prelude::*;
use std::time::Instant;

/// Source of primary rays.
///
/// `get_ray` is called once per sample and may draw from `rng` for pixel
/// jitter, lens sampling or shutter time.
pub trait RayGenerator: Sync {
    /// Image size in pixels, `(width, height)`.
    fn resolution(&self) -> (u32, u32);

    /// A primary ray through pixel `(x, y)`, `y = 0` being the top row.
    fn get_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray;
}

/// Compute the color seen by a ray.
///
/// `depth` counts the bounces already taken. Once it reaches
/// `config.max_depth` the material is not asked to scatter and only its
/// emission is returned.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = scene.hit(ray, Interval::new(config.t_min, f32::INFINITY), rng) else {
        return Color::from(config.background);
    };

    let arena = scene.arena();
    let material = arena.material(rec.material);
    let emitted = material.emitted(arena, rec.u, rec.v, rec.p);

    if depth < config.max_depth {
        if let Some(result) = material.scatter(arena, ray, &rec, rng) {
            let incoming = ray_color(&result.scattered, scene, depth + 1, config, rng);
            return emitted + result.attenuation * incoming;
        }
    }

    emitted
}

/// Linear radiance arriving along a camera ray.
pub fn radiance(scene: &Scene, ray: &Ray, config: &RenderConfig, rng: &mut dyn RngCore) -> Color {
    ray_color(ray, scene, 0, config, rng)
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &dyn RayGenerator,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if config.samples_per_pixel == 0 {
        return Color::ZERO;
    }

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += radiance(scene, &ray, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Linear image buffer for render output.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the entire scene, buckets in parallel.
///
/// The result depends only on the scene, the camera and `config` (seed
/// included), not on thread count or scheduling.
pub fn render(camera: &dyn RayGenerator, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let (width, height) = camera.resolution();
    let buckets = generate_buckets(width, height, config.bucket_size);

    log::info!(
        "Rendering {}x{}: {} spp, max depth {}, {} buckets on {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        buckets.len(),
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, scene, config))
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
