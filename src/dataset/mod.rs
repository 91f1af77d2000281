//! Dataset module for MNIST-A (Arabic handwritten digits)
//!
//! This module provides:
//! - Shared image/label storage that dataset clones and loader workers reuse
//! - Reshaping and orientation correction of the serialized rasters
//! - Per-item transforms (raw bitmap, float tensor, normalized tensor)
//! - Burn `Dataset` and `Batcher` integration
//! - CSV loading and JSON snapshots
//!
//! ## Orientation
//!
//! MNIST-A rasters are serialized transposed relative to the usual MNIST
//! layout. Every item is mirrored horizontally and then rotated a quarter turn
//! counter-clockwise before it reaches the transform.

pub mod arrays;
pub mod burn_dataset;
pub mod loader;
pub mod raster;
pub mod transform;

// Re-export main types for convenience
pub use arrays::{ImageArray, LabelArray, LabelScalar};
pub use burn_dataset::{build_dataloader, MnistaBatch, MnistaBatcher, MnistaDataset, MnistaItem};
pub use loader::{load_csv_images, load_csv_labels, load_snapshot, save_snapshot};
pub use raster::{orient, reshape};
pub use transform::{Identity, ImageTransform, Normalize, ToTensor};

/// Side length of a raster in pixels
pub const IMAGE_SIDE: usize = 28;

/// Number of samples in one flattened raster
pub const IMAGE_PIXELS: usize = IMAGE_SIDE * IMAGE_SIDE;

/// Number of digit classes
pub const NUM_CLASSES: usize = 10;

/// Class names for MNIST-A, indexed by label
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "sifr",
    "wahid",
    "ithnan",
    "thalatha",
    "arbaa",
    "khamsa",
    "sitta",
    "saba",
    "thamaniya",
    "tisa",
];

/// Arabic-Indic numerals, indexed by label
const DIGIT_GLYPHS: [char; NUM_CLASSES] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Get the class name for a given label index
pub fn class_name(label: usize) -> Option<&'static str> {
    CLASS_NAMES.get(label).copied()
}

/// Get the label index for a given class name
pub fn class_index(name: &str) -> Option<usize> {
    CLASS_NAMES.iter().position(|&n| n == name)
}

/// Get the Arabic-Indic numeral for a label
pub fn digit_glyph(label: usize) -> Option<char> {
    DIGIT_GLYPHS.get(label).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_constants() {
        assert_eq!(IMAGE_PIXELS, 784);
    }

    #[test]
    fn test_class_name() {
        assert_eq!(class_name(0), Some("sifr"));
        assert_eq!(class_name(9), Some("tisa"));
        assert_eq!(class_name(10), None);
    }

    #[test]
    fn test_class_index() {
        assert_eq!(class_index("khamsa"), Some(5));
        assert_eq!(class_index("five"), None);
    }

    #[test]
    fn test_digit_glyph() {
        assert_eq!(digit_glyph(3), Some('٣'));
        assert_eq!(digit_glyph(42), None);
    }
}
