//! Raster reshaping and orientation correction.

use image::{imageops, GrayImage};

use super::{IMAGE_PIXELS, IMAGE_SIDE};
use crate::utils::error::{MnistaError, Result};

/// Reshape flattened row-major samples into a 28x28 grayscale raster.
///
/// `index` is only used to report which image was malformed.
pub fn reshape(index: usize, samples: &[u8]) -> Result<GrayImage> {
    let shape_error = || MnistaError::Shape {
        index,
        expected: IMAGE_PIXELS,
        actual: samples.len(),
    };

    if samples.len() != IMAGE_PIXELS {
        return Err(shape_error());
    }

    GrayImage::from_raw(IMAGE_SIDE as u32, IMAGE_SIDE as u32, samples.to_vec())
        .ok_or_else(shape_error)
}

/// Undo the MNIST-A serialization layout.
///
/// Mirror left/right first, then rotate a quarter turn counter-clockwise.
/// The two steps do not commute; together they transpose the raster.
pub fn orient(raster: &GrayImage) -> GrayImage {
    let mirrored = imageops::flip_horizontal(raster);
    // rotate270 is clockwise, i.e. one quarter turn counter-clockwise
    imageops::rotate270(&mirrored)
}

const ASCII_RAMP: &[u8] = b" .:-=+*#%@";

/// Render a raster as ASCII art, one text line per pixel row
pub fn render_ascii(raster: &GrayImage) -> String {
    let (width, height) = raster.dimensions();
    let mut out = String::with_capacity(((width + 1) * height) as usize);

    for y in 0..height {
        for x in 0..width {
            let value = raster.get_pixel(x, y)[0] as usize;
            let level = value * (ASCII_RAMP.len() - 1) / 255;
            out.push(ASCII_RAMP[level] as char);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn single_pixel(row: usize, col: usize) -> Vec<u8> {
        let mut samples = vec![0u8; IMAGE_PIXELS];
        samples[row * IMAGE_SIDE + col] = 255;
        samples
    }

    fn bright_pixels(raster: &GrayImage) -> Vec<(u32, u32)> {
        raster
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] > 0)
            .map(|(x, y, _)| (y, x))
            .collect()
    }

    fn random_raster(rng: &mut ChaCha8Rng) -> GrayImage {
        let samples: Vec<u8> = (0..IMAGE_PIXELS).map(|_| rng.gen()).collect();
        reshape(0, &samples).unwrap()
    }

    #[test]
    fn test_reshape_is_row_major() {
        let raster = reshape(0, &single_pixel(3, 17)).unwrap();

        assert_eq!(raster.dimensions(), (28, 28));
        assert_eq!(raster.get_pixel(17, 3)[0], 255);
        assert_eq!(bright_pixels(&raster), vec![(3, 17)]);
    }

    #[test]
    fn test_reshape_rejects_wrong_length() {
        let err = reshape(5, &vec![0u8; IMAGE_PIXELS - 1]).unwrap_err();
        assert!(matches!(
            err,
            MnistaError::Shape {
                index: 5,
                expected: 784,
                actual: 783
            }
        ));

        assert!(reshape(0, &vec![0u8; IMAGE_PIXELS + 1]).is_err());
        assert!(reshape(0, &[]).is_err());
    }

    #[test]
    fn test_orient_keeps_origin_pixel() {
        let raster = reshape(0, &single_pixel(0, 0)).unwrap();
        assert_eq!(bright_pixels(&orient(&raster)), vec![(0, 0)]);
    }

    #[test]
    fn test_orient_moves_first_row_to_first_column() {
        let raster = reshape(0, &single_pixel(0, 5)).unwrap();
        assert_eq!(bright_pixels(&orient(&raster)), vec![(5, 0)]);

        let raster = reshape(0, &single_pixel(27, 0)).unwrap();
        assert_eq!(bright_pixels(&orient(&raster)), vec![(0, 27)]);
    }

    #[test]
    fn test_orient_is_transpose() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let raster = random_raster(&mut rng);
        let oriented = orient(&raster);

        for (x, y, pixel) in oriented.enumerate_pixels() {
            assert_eq!(pixel, raster.get_pixel(y, x));
        }
    }

    #[test]
    fn test_flip_then_rotate_differs_from_rotate_then_flip() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..8 {
            let raster = random_raster(&mut rng);
            let rotate_first = imageops::flip_horizontal(&imageops::rotate270(&raster));
            assert_ne!(orient(&raster), rotate_first);
        }

        // Single off-diagonal pixel: rotate-then-flip sends (0, 5) to (22, 27)
        let raster = reshape(0, &single_pixel(0, 5)).unwrap();
        let rotate_first = imageops::flip_horizontal(&imageops::rotate270(&raster));
        assert_eq!(bright_pixels(&rotate_first), vec![(22, 27)]);
    }

    #[test]
    fn test_render_ascii() {
        let raster = reshape(0, &single_pixel(0, 0)).unwrap();
        let text = render_ascii(&raster);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 28);
        assert!(lines[0].starts_with('@'));
        assert_eq!(lines[1].trim(), "");
    }
}
