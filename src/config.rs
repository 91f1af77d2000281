//! Data loader configuration, read from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::transform::Normalize;
use crate::utils::error::{MnistaError, Result};

/// Settings for building a burn data loader over an MNIST-A dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Items per batch
    pub batch_size: usize,
    /// Loader worker threads; 0 runs burn's single-threaded loader on the calling thread
    pub num_workers: usize,
    /// Shuffle with this seed; no shuffling when absent
    pub shuffle_seed: Option<u64>,
    /// Pixel normalization applied after scaling to [0, 1]
    pub normalize: NormalizeConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            num_workers: 4,
            shuffle_seed: None,
            normalize: NormalizeConfig::default(),
        }
    }
}

/// Mean and standard deviation for [`Normalize`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub mean: f32,
    pub std: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            mean: Normalize::MNIST_MEAN,
            std: Normalize::MNIST_STD,
        }
    }
}

impl LoaderConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MnistaError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            MnistaError::Config(msg) => MnistaError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| MnistaError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(MnistaError::Config("batch_size must be at least 1".to_string()));
        }
        self.normalizer()?;
        Ok(())
    }

    /// The normalization transform described by this config
    pub fn normalizer(&self) -> Result<Normalize> {
        Normalize::new(self.normalize.mean, self.normalize.std)
    }
}
