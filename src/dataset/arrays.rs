//! Shared image and label storage.
//!
//! Both arrays keep their contents behind an `Arc`: cloning an array, or a
//! dataset built on it, hands out another handle to the same buffers. Nothing
//! here checks that the two arrays have equal length.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::IMAGE_PIXELS;

/// A sequence of flattened 28x28 grayscale rasters
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageArray {
    images: Arc<Vec<Vec<u8>>>,
}

impl ImageArray {
    /// Wrap already flattened images. Lengths are not checked here.
    pub fn new(images: Vec<Vec<u8>>) -> Self {
        Self {
            images: Arc::new(images),
        }
    }

    /// Split one contiguous buffer into consecutive 784-sample images.
    ///
    /// A trailing partial chunk is kept as a short image so that accessing it
    /// reports a shape error instead of silently dropping samples.
    pub fn from_flat(data: &[u8]) -> Self {
        Self::new(data.chunks(IMAGE_PIXELS).map(|c| c.to_vec()).collect())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Flattened samples of the image at `index`
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.images.get(index).map(Vec::as_slice)
    }

    /// Whether both handles point at the same storage
    pub fn shares_storage(&self, other: &ImageArray) -> bool {
        Arc::ptr_eq(&self.images, &other.images)
    }
}

impl From<Vec<Vec<u8>>> for ImageArray {
    fn from(images: Vec<Vec<u8>>) -> Self {
        Self::new(images)
    }
}

impl fmt::Debug for ImageArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageArray")
            .field("len", &self.images.len())
            .finish()
    }
}

/// A sequence of labels, index-aligned with an [`ImageArray`]
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelArray<L> {
    labels: Arc<Vec<L>>,
}

impl<L: LabelScalar> LabelArray<L> {
    pub fn new(labels: Vec<L>) -> Self {
        Self {
            labels: Arc::new(labels),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Raw label scalar at `index`, before integer coercion
    pub fn get(&self, index: usize) -> Option<L> {
        self.labels.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = L> + '_ {
        self.labels.iter().copied()
    }
}

impl<L: LabelScalar> From<Vec<L>> for LabelArray<L> {
    fn from(labels: Vec<L>) -> Self {
        Self::new(labels)
    }
}

impl<L> fmt::Debug for LabelArray<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelArray")
            .field("len", &self.labels.len())
            .finish()
    }
}

/// A numeric scalar that can be turned into a plain integer class label.
///
/// Integers convert when they fit in `i64`. Floats truncate toward zero;
/// NaN, infinities and values outside the `i64` range have no label.
pub trait LabelScalar: Copy + fmt::Debug + Send + Sync + 'static {
    fn to_label(self) -> Option<i64>;
}

macro_rules! impl_label_scalar_int {
    ($($t:ty),*) => {
        $(
            impl LabelScalar for $t {
                fn to_label(self) -> Option<i64> {
                    i64::try_from(self).ok()
                }
            }
        )*
    };
}

impl_label_scalar_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

impl LabelScalar for f64 {
    fn to_label(self) -> Option<i64> {
        if !self.is_finite() {
            return None;
        }
        let truncated = self.trunc();
        // i64::MAX is not exactly representable; 2^63 is the first value out of range
        if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
            return None;
        }
        Some(truncated as i64)
    }
}

impl LabelScalar for f32 {
    fn to_label(self) -> Option<i64> {
        f64::from(self).to_label()
    }
}
