//! Ember Core - data handed to the renderer by its collaborators.
//!
//! This crate provides:
//!
//! - **Pixel buffers**: decoded 8-bit images used by image textures
//! - **Render configuration**: sampling, depth and seed settings, loadable
//!   from JSON
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{PixelBuffer, RenderConfig};
//!
//! let earth = PixelBuffer::open("earthmap.jpg")?;
//! let config = RenderConfig::load("render.json")?;
//! println!("{}x{} texture, {} spp", earth.width(), earth.height(), config.samples_per_pixel);
//! ```

pub mod config;
pub mod pixels;

// Re-export commonly used types
pub use config::{ConfigError, ConfigResult, RenderConfig};
pub use pixels::{ImageError, ImageResult, PixelBuffer};
