//! Decoded image data for image textures.
//!
//! The renderer never decodes files itself; it indexes a [`PixelBuffer`]
//! that was filled here, either from an image file through the `image`
//! crate or from raw bytes supplied by the caller.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while producing a pixel buffer.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to load image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Unsupported channel count: {0} (expected 1 to 4)")]
    UnsupportedChannels(u8),

    #[error("Pixel data holds {actual} bytes, {expected} needed for {width}x{height}x{channels}")]
    SizeMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// 8-bit pixel data, row-major with the first row at the top of the image.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw interleaved bytes.
    ///
    /// `data` must hold exactly `width * height * channels` bytes.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height });
        }
        if !(1..=4).contains(&channels) {
            return Err(ImageError::UnsupportedChannels(channels));
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Decode an image file into an RGB buffer.
    ///
    /// A file that cannot be read is an [`ImageError::Io`]; one that reads
    /// but does not decode is an [`ImageError::Decode`].
    pub fn open(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let img = image::load_from_memory(&bytes).map_err(|source| ImageError::Decode {
            path: path.display().to_string(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let buffer = Self::from_raw(width, height, 3, rgb.into_raw())?;

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            buffer.size_bytes() as f32 / 1024.0
        );

        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Texel at integer coordinates, normalized to [0, 1].
    ///
    /// Coordinates past the edge are clamped to the nearest border texel.
    /// One- and two-channel images are treated as gray.
    pub fn texel(&self, x: u32, y: u32) -> [f32; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let channels = self.channels as usize;
        let idx = (y * self.width as usize + x) * channels;

        let px = &self.data[idx..idx + channels];
        let to_unit = |b: u8| b as f32 / 255.0;
        if channels >= 3 {
            [to_unit(px[0]), to_unit(px[1]), to_unit(px[2])]
        } else {
            let gray = to_unit(px[0]);
            [gray, gray, gray]
        }
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> PixelBuffer {
        // Top row: red, green. Bottom row: blue, white.
        let data = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        PixelBuffer::from_raw(2, 2, 3, data).unwrap()
    }

    #[test]
    fn test_texel_lookup_is_row_major_from_top() {
        let buffer = two_by_two();
        assert_eq!(buffer.texel(0, 0), [1.0, 0.0, 0.0]);
        assert_eq!(buffer.texel(1, 0), [0.0, 1.0, 0.0]);
        assert_eq!(buffer.texel(0, 1), [0.0, 0.0, 1.0]);
        assert_eq!(buffer.texel(1, 1), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_texel_clamps_out_of_range() {
        let buffer = two_by_two();
        assert_eq!(buffer.texel(7, 0), buffer.texel(1, 0));
        assert_eq!(buffer.texel(0, 99), buffer.texel(0, 1));
    }

    #[test]
    fn test_gray_and_rgba_buffers() {
        let gray = PixelBuffer::from_raw(1, 1, 1, vec![51]).unwrap();
        assert_eq!(gray.texel(0, 0), [0.2, 0.2, 0.2]);

        let rgba = PixelBuffer::from_raw(1, 1, 4, vec![0, 255, 0, 10]).unwrap();
        assert_eq!(rgba.texel(0, 0), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_from_raw_rejects_bad_input() {
        assert!(matches!(
            PixelBuffer::from_raw(0, 4, 3, vec![]),
            Err(ImageError::Empty { .. })
        ));
        assert!(matches!(
            PixelBuffer::from_raw(1, 1, 5, vec![0; 5]),
            Err(ImageError::UnsupportedChannels(5))
        ));
        assert!(matches!(
            PixelBuffer::from_raw(2, 2, 3, vec![0; 11]),
            Err(ImageError::SizeMismatch { expected: 12, actual: 11, .. })
        ));
    }

    #[test]
    fn test_open_missing_file_is_an_error() {
        let _ = env_logger::builder().is_test(true).try_init();
        let result = PixelBuffer::open("definitely/not/here.png");
        assert!(matches!(result, Err(ImageError::Io(_))));
    }

    #[test]
    fn test_open_undecodable_file_is_a_decode_error() {
        let name = format!("ember_not_an_image_{}.png", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, b"plain text, not a png").unwrap();
        let result = PixelBuffer::open(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ImageError::Decode { .. })));
    }
}
