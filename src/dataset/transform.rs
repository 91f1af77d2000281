//! Per-item image transforms.
//!
//! A transform receives the oriented 8-bit raster and may return any type.
//! Transforms are plain values (unit structs, config structs or function
//! pointers), never capturing closures, so a dataset holding one stays
//! `Send + Sync` and can be serialized and rebuilt in another process.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::utils::error::{MnistaError, Result};

/// Converts one oriented raster into the item's image representation
pub trait ImageTransform: Send + Sync {
    type Output: Send + Sync;

    fn apply(&self, image: GrayImage) -> Result<Self::Output>;
}

/// Returns the raster unchanged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity;

impl ImageTransform for Identity {
    type Output = GrayImage;

    fn apply(&self, image: GrayImage) -> Result<GrayImage> {
        Ok(image)
    }
}

/// Converts a raster to a `[1, H, W]` float buffer scaled to `[0, 1]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToTensor;

impl ImageTransform for ToTensor {
    type Output = Vec<f32>;

    fn apply(&self, image: GrayImage) -> Result<Vec<f32>> {
        Ok(image
            .into_raw()
            .into_iter()
            .map(|v| v as f32 / 255.0)
            .collect())
    }
}

/// [`ToTensor`] followed by `(x - mean) / std`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Normalize {
    mean: f32,
    std: f32,
}

impl Normalize {
    /// Mean and standard deviation of the MNIST training set
    pub const MNIST_MEAN: f32 = 0.1307;
    pub const MNIST_STD: f32 = 0.3081;

    pub fn new(mean: f32, std: f32) -> Result<Self> {
        if !(std.is_finite() && std > 0.0) || !mean.is_finite() {
            return Err(MnistaError::Config(format!(
                "normalization needs a finite mean and positive std, got mean={mean} std={std}"
            )));
        }
        Ok(Self { mean, std })
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn std(&self) -> f32 {
        self.std
    }
}

impl Default for Normalize {
    fn default() -> Self {
        Self {
            mean: Self::MNIST_MEAN,
            std: Self::MNIST_STD,
        }
    }
}

impl ImageTransform for Normalize {
    type Output = Vec<f32>;

    fn apply(&self, image: GrayImage) -> Result<Vec<f32>> {
        let mut tensor = ToTensor.apply(image)?;
        for v in &mut tensor {
            *v = (*v - self.mean) / self.std;
        }
        Ok(tensor)
    }
}

impl<O: Send + Sync> ImageTransform for fn(GrayImage) -> Result<O> {
    type Output = O;

    fn apply(&self, image: GrayImage) -> Result<O> {
        self(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn gradient() -> GrayImage {
        GrayImage::from_fn(28, 28, |x, y| Luma([((x + y) * 4) as u8]))
    }

    fn count_bright(image: GrayImage) -> Result<usize> {
        Ok(image.pixels().filter(|p| p[0] > 127).count())
    }

    fn always_fails(_: GrayImage) -> Result<()> {
        Err(MnistaError::Transform("rejected".to_string()))
    }

    #[test]
    fn test_identity() {
        let image = gradient();
        assert_eq!(Identity.apply(image.clone()).unwrap(), image);
    }

    #[test]
    fn test_to_tensor_scales_row_major() {
        let tensor = ToTensor.apply(gradient()).unwrap();

        assert_eq!(tensor.len(), 784);
        assert_eq!(tensor[0], 0.0);
        // row 1, column 2 -> (1 + 2) * 4 = 12
        assert!((tensor[28 + 2] - 12.0 / 255.0).abs() < 1e-6);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_normalize() {
        let normalize = Normalize::new(0.5, 0.5).unwrap();
        let image = GrayImage::from_pixel(28, 28, Luma([255]));
        let tensor = normalize.apply(image).unwrap();

        assert!(tensor.iter().all(|v| (v - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_normalize_default_is_mnist() {
        let normalize = Normalize::default();
        assert_eq!(normalize.mean(), 0.1307);
        assert_eq!(normalize.std(), 0.3081);
    }

    #[test]
    fn test_normalize_rejects_bad_std() {
        assert!(Normalize::new(0.1, 0.0).is_err());
        assert!(Normalize::new(0.1, -1.0).is_err());
        assert!(Normalize::new(f32::NAN, 1.0).is_err());
    }

    #[test]
    fn test_function_pointer_transform() {
        let transform: fn(GrayImage) -> Result<usize> = count_bright;
        // (x + y) * 4 > 127 once x + y >= 32
        let expected = (0..28u32)
            .flat_map(|x| (0..28u32).map(move |y| x + y))
            .filter(|s| ((s * 4) as u8) > 127)
            .count();
        assert_eq!(transform.apply(gradient()).unwrap(), expected);
    }

    #[test]
    fn test_function_pointer_error_passes_through() {
        let transform: fn(GrayImage) -> Result<()> = always_fails;
        let err = transform.apply(gradient()).unwrap_err();
        assert!(matches!(err, MnistaError::Transform(ref m) if m == "rejected"));
    }
}
