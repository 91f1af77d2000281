//! Burn Dataset Integration for MNIST-A
//!
//! `MnistaDataset` is the indexed view burn's data loader pulls items from.
//! Each item is reshaped, orientation-corrected, passed through the dataset's
//! transform and paired with its integer label. `MnistaBatcher` stacks tensor
//! items into training batches.

use std::sync::Arc;

use burn::data::dataloader::batcher::Batcher;
use burn::data::dataloader::{DataLoader, DataLoaderBuilder};
use burn::data::dataset::Dataset;
use burn::prelude::*;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::arrays::{ImageArray, LabelArray, LabelScalar};
use super::raster::{orient, reshape};
use super::transform::{Identity, ImageTransform};
use super::{IMAGE_PIXELS, IMAGE_SIDE, NUM_CLASSES};
use crate::config::LoaderConfig;
use crate::utils::error::{MnistaError, Result};

/// A single MNIST-A item: the transformed image and its class label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MnistaItem<I> {
    pub image: I,
    pub label: i64,
}

/// MNIST-A dataset implementing Burn's Dataset trait
///
/// Holds shared handles to the image and label arrays, so cloning is cheap
/// and every clone reads the same storage. The caller guarantees that both
/// arrays have the same length; a mismatch is logged, not repaired.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MnistaDataset<L = u8, T = Identity> {
    images: ImageArray,
    labels: LabelArray<L>,
    transform: T,
}

impl<L: LabelScalar> MnistaDataset<L, Identity> {
    /// Create a dataset whose items carry the oriented `GrayImage`
    pub fn new(images: ImageArray, labels: LabelArray<L>) -> Self {
        Self::with_transform(images, labels, Identity)
    }
}

impl<L: LabelScalar, T: ImageTransform> MnistaDataset<L, T> {
    /// Create a dataset that applies `transform` to every oriented raster
    pub fn with_transform(images: ImageArray, labels: LabelArray<L>, transform: T) -> Self {
        if images.len() != labels.len() {
            warn!(
                "MNIST-A arrays are not aligned: {} images, {} labels",
                images.len(),
                labels.len()
            );
        }
        debug!("Created MNIST-A dataset with {} items", labels.len());

        Self {
            images,
            labels,
            transform,
        }
    }

    /// Replace the transform, keeping the shared storage
    pub fn map_transform<U: ImageTransform>(self, transform: U) -> MnistaDataset<L, U> {
        MnistaDataset {
            images: self.images,
            labels: self.labels,
            transform,
        }
    }

    /// Number of items, taken from the label array
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn images(&self) -> &ImageArray {
        &self.images
    }

    pub fn labels(&self) -> &LabelArray<L> {
        &self.labels
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// The oriented raster at `index`, before the transform
    pub fn raster(&self, index: usize) -> Result<GrayImage> {
        let len = self.len();
        if index >= len {
            return Err(MnistaError::IndexOutOfRange { index, len });
        }

        let samples = self
            .images
            .get(index)
            .ok_or(MnistaError::IndexOutOfRange {
                index,
                len: self.images.len(),
            })?;

        Ok(orient(&reshape(index, samples)?))
    }

    /// The label at `index` as a plain integer
    pub fn label(&self, index: usize) -> Result<i64> {
        let raw = self.labels.get(index).ok_or(MnistaError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;

        raw.to_label().ok_or_else(|| MnistaError::InvalidLabel {
            index,
            value: format!("{raw:?}"),
        })
    }

    /// Fetch the item at `index`.
    ///
    /// Reshape and orientation errors, transform errors and label coercion
    /// errors are returned as-is.
    pub fn try_get(&self, index: usize) -> Result<MnistaItem<T::Output>> {
        let raster = self.raster(index)?;
        let image = self.transform.apply(raster)?;
        let label = self.label(index)?;

        Ok(MnistaItem { image, label })
    }

    /// Check every image length, every label and the image count without
    /// running the transform.
    ///
    /// Returns the first failure found, in index order.
    pub fn verify(&self) -> Result<()> {
        if self.images.len() < self.len() {
            return Err(MnistaError::IndexOutOfRange {
                index: self.images.len(),
                len: self.images.len(),
            });
        }

        for index in 0..self.len() {
            if let Some(samples) = self.images.get(index) {
                if samples.len() != IMAGE_PIXELS {
                    return Err(MnistaError::Shape {
                        index,
                        expected: IMAGE_PIXELS,
                        actual: samples.len(),
                    });
                }
            }
            self.label(index)?;
        }

        Ok(())
    }

    /// Get samples per class count. Labels outside the digit range are skipped.
    pub fn class_distribution(&self) -> Vec<usize> {
        let mut counts = vec![0usize; NUM_CLASSES];
        for label in self.labels.iter().filter_map(LabelScalar::to_label) {
            if (0..NUM_CLASSES as i64).contains(&label) {
                counts[label as usize] += 1;
            }
        }
        counts
    }
}

impl<L, T> Dataset<MnistaItem<T::Output>> for MnistaDataset<L, T>
where
    L: LabelScalar,
    T: ImageTransform,
{
    /// burn reads `None` as the end of the data, so only an out-of-range
    /// index maps to `None`. Any other failure panics with the error.
    fn get(&self, index: usize) -> Option<MnistaItem<T::Output>> {
        match self.try_get(index) {
            Ok(item) => Some(item),
            Err(MnistaError::IndexOutOfRange { .. }) => None,
            Err(e) => {
                error!("MNIST-A item {} is unreadable: {}", index, e);
                panic!("MNIST-A item {index} is unreadable: {e}");
            }
        }
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

/// A batch of MNIST-A images for training
#[derive(Clone, Debug)]
pub struct MnistaBatch<B: Backend> {
    /// Batch of images with shape [batch_size, 1, 28, 28]
    pub images: Tensor<B, 4>,
    /// Batch of labels with shape [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Batcher for items produced by a tensor transform (`ToTensor`, `Normalize`)
#[derive(Clone, Debug, Default)]
pub struct MnistaBatcher;

impl<B: Backend> Batcher<B, MnistaItem<Vec<f32>>, MnistaBatch<B>> for MnistaBatcher {
    fn batch(&self, items: Vec<MnistaItem<Vec<f32>>>, device: &B::Device) -> MnistaBatch<B> {
        let batch_size = items.len();

        for (position, item) in items.iter().enumerate() {
            assert_eq!(
                item.image.len(),
                IMAGE_PIXELS,
                "batch item {position} (label {}) has {} values, expected {IMAGE_PIXELS}",
                item.label,
                item.image.len()
            );
        }

        let images_data: Vec<f32> = items
            .iter()
            .flat_map(|item| item.image.iter().copied())
            .collect();

        let images = Tensor::<B, 4>::from_floats(
            TensorData::new(images_data, [batch_size, 1, IMAGE_SIDE, IMAGE_SIDE]),
            device,
        );

        let targets_data: Vec<i64> = items.iter().map(|item| item.label).collect();
        let targets =
            Tensor::<B, 1, Int>::from_data(TensorData::new(targets_data, [batch_size]), device);

        MnistaBatch { images, targets }
    }
}

/// Build a burn data loader over a tensor-producing dataset
///
/// The dataset is verified first, so a malformed image or label is reported
/// here instead of cutting an epoch short. The transform must produce
/// exactly 784 values per image; the batcher panics otherwise.
/// `num_workers = 0` uses burn's single-threaded loader.
pub fn build_dataloader<B, L, T>(
    dataset: MnistaDataset<L, T>,
    config: &LoaderConfig,
) -> Result<Arc<dyn DataLoader<B, MnistaBatch<B>>>>
where
    B: Backend,
    L: LabelScalar,
    T: ImageTransform<Output = Vec<f32>> + 'static,
{
    config.validate()?;
    dataset.verify()?;

    debug!(
        "Building data loader: batch_size={}, workers={}, shuffle_seed={:?}",
        config.batch_size, config.num_workers, config.shuffle_seed
    );

    let mut builder = DataLoaderBuilder::new(MnistaBatcher).batch_size(config.batch_size);

    if config.num_workers > 0 {
        builder = builder.num_workers(config.num_workers);
    }
    if let Some(seed) = config.shuffle_seed {
        builder = builder.shuffle(seed);
    }

    Ok(builder.build(dataset))
}
