//! # MNIST-A Data
//!
//! A Burn dataset adapter for MNIST-A (Arabic handwritten digits).
//!
//! The images ship as flattened 28x28 rasters whose serialization is mirrored
//! and rotated relative to the usual MNIST layout. [`MnistaDataset`] wraps
//! pre-loaded image and label arrays and, for each index, returns the
//! orientation-corrected image (optionally transformed) and its integer label.
//! It implements Burn's `Dataset` trait, so it plugs directly into
//! `DataLoaderBuilder` together with [`MnistaBatcher`].
//!
//! ## Modules
//!
//! - `dataset`: storage, orientation correction, transforms, Burn integration, loading
//! - `config`: data loader configuration (TOML)
//! - `backend`: default Burn backend selection
//! - `utils`: errors, logging, formatting helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mnista_data::dataset::{load_csv_images, load_csv_labels, MnistaDataset, Normalize};
//!
//! let images = load_csv_images("data/csvTrainImages.csv".as_ref())?;
//! let labels = load_csv_labels("data/csvTrainLabel.csv".as_ref())?;
//! let dataset = MnistaDataset::with_transform(images, labels, Normalize::default());
//!
//! let item = dataset.try_get(0)?;
//! println!("label {} with {} pixels", item.label, item.image.len());
//! ```

pub mod backend;
pub mod config;
pub mod dataset;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::{LoaderConfig, NormalizeConfig};
pub use dataset::{
    build_dataloader, ImageArray, ImageTransform, LabelArray, LabelScalar, MnistaBatch,
    MnistaBatcher, MnistaDataset, MnistaItem,
};
pub use utils::error::{MnistaError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
