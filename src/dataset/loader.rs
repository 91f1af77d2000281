//! Loading MNIST-A arrays from disk.
//!
//! The CSV layout follows the public MNIST-A / AHDBase release: one image per
//! line as 784 comma-separated intensities, and a separate file with one
//! label per line. Datasets can also be written to and restored from JSON
//! snapshots, which is how a worker process rebuilds an identical dataset.

use std::fs;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::arrays::{ImageArray, LabelArray};
use super::burn_dataset::MnistaDataset;
use crate::utils::error::{MnistaError, Result};

/// Non-empty lines with their 1-based line numbers
fn numbered_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect()
}

fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> MnistaError {
    MnistaError::Parse {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

fn parse_row(path: &Path, line_no: usize, line: &str) -> Result<Vec<u8>> {
    line.split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<u8>()
                .map_err(|e| parse_error(path, line_no, format!("'{field}': {e}")))
        })
        .collect()
}

/// Load images from a CSV file, one flattened image per line.
///
/// Rows are not length-checked; a malformed row surfaces as a shape error
/// when the item is read.
pub fn load_csv_images(path: &Path) -> Result<ImageArray> {
    let content = fs::read_to_string(path)?;
    let lines = numbered_lines(&content);

    info!("Parsing {} images from {}", lines.len(), path.display());

    let pb = ProgressBar::new(lines.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("  {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let images = lines
        .par_iter()
        .map(|(line_no, line)| {
            let row = parse_row(path, *line_no, line);
            pb.inc(1);
            row
        })
        .collect::<Result<Vec<_>>>()?;

    pb.finish_and_clear();
    info!("Loaded {} images", images.len());

    Ok(ImageArray::new(images))
}

/// Load labels from a CSV file, one integer per line
pub fn load_csv_labels(path: &Path) -> Result<LabelArray<i64>> {
    let content = fs::read_to_string(path)?;

    let labels = numbered_lines(&content)
        .into_iter()
        .map(|(line_no, line)| {
            line.parse::<i64>()
                .map_err(|e| parse_error(path, line_no, format!("'{line}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded {} labels from {}", labels.len(), path.display());

    Ok(LabelArray::new(labels))
}

/// Write a dataset, including its transform settings, as JSON
pub fn save_snapshot<L, T>(dataset: &MnistaDataset<L, T>, path: &Path) -> Result<()>
where
    MnistaDataset<L, T>: Serialize,
{
    let json = serde_json::to_string(dataset)?;
    fs::write(path, json)?;
    info!("Wrote dataset snapshot to {}", path.display());
    Ok(())
}

/// Rebuild a dataset from a JSON snapshot
pub fn load_snapshot<L, T>(path: &Path) -> Result<MnistaDataset<L, T>>
where
    MnistaDataset<L, T>: DeserializeOwned,
{
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::transform::Normalize;
    use crate::dataset::IMAGE_PIXELS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_row(value: u8) -> String {
        vec![value.to_string(); IMAGE_PIXELS].join(",")
    }

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_images() {
        let file = write_file(&format!("{}\n\n{}\n", csv_row(0), csv_row(255)));
        let images = load_csv_images(file.path()).unwrap();

        assert_eq!(images.len(), 2);
        assert!(images.get(1).unwrap().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_load_images_reports_line() {
        let bad = csv_row(1).replacen('1', "300", 1);
        let file = write_file(&format!("{}\n{}\n", csv_row(1), bad));

        match load_csv_images(file.path()) {
            Err(MnistaError::Parse { line, message, .. }) => {
                assert_eq!(line, 2);
                assert!(message.contains("300"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_short_rows_load_and_fail_on_access() {
        let file = write_file("1,2,3\n");
        let images = load_csv_images(file.path()).unwrap();
        let dataset = MnistaDataset::new(images, LabelArray::new(vec![0i64]));

        assert!(matches!(
            dataset.try_get(0),
            Err(MnistaError::Shape { actual: 3, .. })
        ));
    }

    #[test]
    fn test_load_labels() {
        let file = write_file("3\n 7 \n\n0\n");
        let labels = load_csv_labels(file.path()).unwrap();
        assert_eq!(labels.iter().collect::<Vec<_>>(), vec![3, 7, 0]);

        let file = write_file("3\nseven\n");
        assert!(matches!(
            load_csv_labels(file.path()),
            Err(MnistaError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv_labels(Path::new("/nonexistent/labels.csv")).unwrap_err();
        assert!(matches!(err, MnistaError::Io(_)));
    }

    #[test]
    fn test_snapshot_reconstructs_identical_items() {
        let images = ImageArray::new(
            (0..3)
                .map(|i| (0..IMAGE_PIXELS).map(|p| ((p * 3 + i) % 256) as u8).collect())
                .collect(),
        );
        let dataset = MnistaDataset::with_transform(
            images,
            LabelArray::new(vec![4u8, 1, 9]),
            Normalize::new(0.5, 0.2).unwrap(),
        );

        let file = NamedTempFile::new().unwrap();
        save_snapshot(&dataset, file.path()).unwrap();
        let restored: MnistaDataset<u8, Normalize> = load_snapshot(file.path()).unwrap();

        assert_eq!(restored.len(), dataset.len());
        assert_eq!(restored.transform(), dataset.transform());
        for i in 0..dataset.len() {
            assert_eq!(restored.try_get(i).unwrap(), dataset.try_get(i).unwrap());
        }
    }
}
