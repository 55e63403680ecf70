//! Render configuration.
//!
//! Every field has a default, so a JSON file only needs to name the
//! settings it changes:
//!
//! ```json
//! { "samples_per_pixel": 400, "seed": 7 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid render configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for the integrator and the image-level sampling loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Independent radiance samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Bounce depth at which a path is cut off
    pub max_depth: u32,
    /// Linear RGB returned for rays that leave the scene
    pub background: [f32; 3],
    /// Near bound of every intersection query, avoids self-intersection
    pub t_min: f32,
    /// Base seed; each bucket derives its own stream from it
    pub seed: u64,
    /// Edge length in pixels of the square render buckets
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: [0.0, 0.0, 0.0],
            t_min: 0.001,
            seed: 0,
            bucket_size: 64,
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.warn_on_odd_values();
        Ok(config)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        log::info!("Loading render configuration from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn warn_on_odd_values(&self) {
        if self.samples_per_pixel == 0 {
            log::warn!("samples_per_pixel is 0; every pixel will be black");
        }
        if self.bucket_size == 0 {
            log::warn!("bucket_size is 0; the renderer will use 1");
        }
        if self.t_min <= 0.0 {
            log::warn!("t_min is {}; expect self-intersection acne", self.t_min);
        }
    }
}
