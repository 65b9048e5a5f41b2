//! Deterministic image embedding generator.
//!
//! Maps raw image bytes to a fixed 192-dimensional vector without any model:
//! the image is resampled onto a fixed 32x32 RGB raster and each 4x4 pixel
//! block contributes one mean intensity per channel (8 x 8 blocks x 3
//! channels). The vector is then L2-normalized so similarity is independent
//! of exposure. Identical input bytes always produce identical output.

use image::imageops::FilterType;

use crate::defaults::DIMENSION;
use crate::errors::{FaceSearchError, Result};
use crate::vector;

/// Fixed raster the input is resampled onto.
const RASTER: u32 = 32;
/// Pixels per aggregation block side.
const BLOCK: u32 = 4;
const BLOCKS_PER_SIDE: u32 = RASTER / BLOCK;

/// Generate the embedding for an uploaded image.
///
/// Pure and deterministic: no randomness, no model download, no network.
/// Fails with [`FaceSearchError::Decode`] when the bytes are not a valid
/// raster image.
pub fn generate(image_bytes: &[u8]) -> Result<Vec<f32>> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| FaceSearchError::Decode(e.to_string()))?;

    // Nearest-neighbor keeps the resample bit-exact across platforms;
    // smoother filters would not change retrieval quality for block means.
    let rgb = img
        .resize_exact(RASTER, RASTER, FilterType::Nearest)
        .to_rgb8();

    let mut embedding = vec![0.0f32; DIMENSION];
    let block_area = (BLOCK * BLOCK) as f32;

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let block_idx = (y / BLOCK) * BLOCKS_PER_SIDE + (x / BLOCK);
        for c in 0..3 {
            let dim = (block_idx as usize) * 3 + c;
            embedding[dim] += f32::from(pixel[c]) / 255.0 / block_area;
        }
    }

    vector::normalize(&mut embedding);
    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| Rgb(f(x, y)));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_generate_is_deterministic() {
        let bytes = png_bytes(64, 48, |x, y| [(x * 3) as u8, (y * 5) as u8, 128]);
        let first = generate(&bytes).unwrap();
        let second = generate(&bytes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_has_fixed_dimension() {
        for (w, h) in [(16, 16), (640, 480), (31, 97)] {
            let bytes = png_bytes(w, h, |x, y| [x as u8, y as u8, 7]);
            assert_eq!(generate(&bytes).unwrap().len(), DIMENSION);
        }
    }

    #[test]
    fn test_generate_unit_length_for_nonblack_image() {
        let bytes = png_bytes(32, 32, |_, _| [200, 100, 50]);
        let embedding = generate(&bytes).unwrap();
        let mag = crate::vector::magnitude(&embedding);
        assert!((mag - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_generate_black_image_is_zero_vector() {
        let bytes = png_bytes(32, 32, |_, _| [0, 0, 0]);
        let embedding = generate(&bytes).unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_generate_distinct_images_distinct_vectors() {
        let red = generate(&png_bytes(32, 32, |_, _| [255, 0, 0])).unwrap();
        let blue = generate(&png_bytes(32, 32, |_, _| [0, 0, 255])).unwrap();
        assert_ne!(red, blue);
        // Pure-red and pure-blue block means share no channel, so the
        // embeddings are orthogonal.
        assert!(crate::vector::cosine(&red, &blue).abs() < 1e-6);
    }

    #[test]
    fn test_generate_rejects_garbage_bytes() {
        let err = generate(b"definitely not an image").unwrap_err();
        assert!(matches!(err, FaceSearchError::Decode(_)));
    }
}
