//! Textures: pure functions from surface coordinates and a point to a color.

use crate::{
    perlin::Perlin,
    scene::{Arena, TextureId},
    Color, PixelBuffer, Vec3,
};
use std::sync::Arc;

/// Octaves summed by the marble texture.
const TURBULENCE_DEPTH: u32 = 7;

/// Every texture kind the renderer knows about.
#[derive(Debug, Clone)]
pub enum Texture {
    /// A fixed color.
    Constant(Color),
    /// A 3D checker pattern picking between two child textures.
    Checker { even: TextureId, odd: TextureId },
    /// Marble-like procedural noise.
    Noise(NoiseTexture),
    /// A decoded image looked up by `(u, v)`.
    Image(ImageTexture),
}

impl Texture {
    pub fn value(&self, arena: &Arena, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Constant(color) => *color,
            Texture::Checker { even, odd } => {
                let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
                if sines < 0.0 {
                    arena.texture_value(*odd, u, v, p)
                } else {
                    arena.texture_value(*even, u, v, p)
                }
            }
            Texture::Noise(noise) => noise.value(p),
            Texture::Image(image) => image.value(u, v),
        }
    }
}

/// Marble: `0.5 * (1 + sin(scale * z + 10 * turbulence(p)))`.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    noise: Arc<Perlin>,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(noise: Arc<Perlin>, scale: f32) -> Self {
        Self { noise, scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn value(&self, p: Vec3) -> Color {
        let turbulence = self.noise.turbulence(p, TURBULENCE_DEPTH);
        Color::splat(0.5 * (1.0 + (self.scale * p.z + 10.0 * turbulence).sin()))
    }
}

/// Image lookup. `v = 1` is the top row of the image.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    pixels: Arc<PixelBuffer>,
}

impl ImageTexture {
    pub fn new(pixels: Arc<PixelBuffer>) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    fn value(&self, u: f32, v: f32) -> Color {
        let (width, height) = (self.pixels.width(), self.pixels.height());

        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        // Float to int casts saturate, and texel clamps to the last row and
        // column, so u = 1 and v = 0 stay in bounds.
        let i = (u * width as f32) as u32;
        let j = ((1.0 - v) * height as f32 - 0.001) as u32;

        Color::from(self.pixels.texel(i, j))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneBuilder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_constant_ignores_inputs() {
        let mut builder = SceneBuilder::new();
        let id = builder.solid_color(Color::new(0.1, 0.2, 0.3));
        let arena = builder.arena();
        for p in [Vec3::ZERO, Vec3::splat(100.0)] {
            assert_eq!(arena.texture_value(id, 0.9, 0.1, p), Color::new(0.1, 0.2, 0.3));
        }
    }

    #[test]
    fn test_checker_alternates_in_space() {
        let mut builder = SceneBuilder::new();
        let even = builder.solid_color(Color::ONE);
        let odd = builder.solid_color(Color::ZERO);
        let checker = builder.checker(even, odd).unwrap();
        let arena = builder.arena();

        // sin(10 * 0.1) > 0 on every axis.
        let a = Vec3::splat(0.1);
        // Flipping one axis flips the sign of the product.
        let b = Vec3::new(-0.1, 0.1, 0.1);
        assert_eq!(arena.texture_value(checker, 0.0, 0.0, a), Color::ONE);
        assert_eq!(arena.texture_value(checker, 0.0, 0.0, b), Color::ZERO);
        // Independent of (u, v).
        assert_eq!(arena.texture_value(checker, 0.7, 0.3, a), Color::ONE);
    }

    #[test]
    fn test_noise_stays_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(12);
        let perlin = Arc::new(Perlin::new(&mut rng));
        let texture = Texture::Noise(NoiseTexture::new(perlin, 4.0));
        let arena = Arena::new();

        for i in 0..500 {
            let p = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, i as f32 * 0.05);
            let c = texture.value(&arena, 0.0, 0.0, p);
            assert!(c.x >= 0.0 && c.x <= 1.0);
            assert_eq!(c.x, c.y);
            assert_eq!(c.y, c.z);
        }
    }

    #[test]
    fn test_image_lookup_flips_rows_and_clamps() {
        // 2x2 RGB: top row red, green; bottom row blue, white.
        let data = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        let pixels = Arc::new(PixelBuffer::from_raw(2, 2, 3, data).unwrap());
        let texture = Texture::Image(ImageTexture::new(pixels));
        let arena = Arena::new();
        let at = |u: f32, v: f32| texture.value(&arena, u, v, Vec3::ZERO);

        assert_eq!(at(0.25, 0.75), Color::new(1.0, 0.0, 0.0));
        assert_eq!(at(0.75, 0.75), Color::new(0.0, 1.0, 0.0));
        assert_eq!(at(0.25, 0.25), Color::new(0.0, 0.0, 1.0));
        assert_eq!(at(0.75, 0.25), Color::ONE);

        // Edges and out-of-range coordinates clamp instead of panicking.
        assert_eq!(at(1.0, 1.0), Color::new(0.0, 1.0, 0.0));
        assert_eq!(at(0.0, 0.0), Color::new(0.0, 0.0, 1.0));
        assert_eq!(at(-3.0, 7.0), Color::new(1.0, 0.0, 0.0));
        assert_eq!(at(f32::NAN, 0.5), at(0.0, 0.5));
    }
}
