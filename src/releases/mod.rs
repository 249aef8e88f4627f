//! Release analytics pipeline.
//!
//! The CSV snapshot is parsed once at startup into an immutable
//! [`ReleaseDataset`]; every chart view is a pure function of that dataset.

mod aggregate;
mod parser;

pub use aggregate::*;
pub use parser::parse;

use std::path::Path;

use crate::errors::IngestError;
use crate::models::ReleaseRecord;

/// Parsed release snapshot plus the number of rows dropped during ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseDataset {
    records: Vec<ReleaseRecord>,
    skipped_rows: usize,
}

impl ReleaseDataset {
    pub fn new(records: Vec<ReleaseRecord>, skipped_rows: usize) -> Self {
        Self {
            records,
            skipped_rows,
        }
    }

    #[cfg(test)]
    pub fn from_records(records: Vec<ReleaseRecord>) -> Self {
        Self::new(records, 0)
    }

    pub fn records(&self) -> &[ReleaseRecord] {
        &self.records
    }

    /// Data rows discarded because their field count did not match the header.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read and parse the release snapshot at `path`.
///
/// Only a failure to read the file is an error. Malformed rows are dropped and
/// counted in [`ReleaseDataset::skipped_rows`].
pub async fn load(path: &Path) -> Result<ReleaseDataset, IngestError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let dataset = parse(&text);
    tracing::info!(
        records = dataset.len(),
        skipped_rows = dataset.skipped_rows(),
        "Loaded release data from {}",
        path.display()
    );
    if dataset.is_empty() {
        tracing::warn!("Release data at {} contains no records", path.display());
    }
    if dataset.skipped_rows() > 0 {
        tracing::warn!(
            "{} release rows were dropped due to a column count mismatch",
            dataset.skipped_rows()
        );
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("releases.csv");
        tokio::fs::write(
            &path,
            "Repository,Month\nstackflow,2024-01\nbroken\nseed-design,2024-02\n",
        )
        .await
        .unwrap();

        let dataset = load(&path).await.unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.skipped_rows(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");

        let err = load(&path).await.unwrap_err();
        match &err {
            IngestError::Io { path: p, .. } => assert_eq!(p, &path),
        }
        assert!(err.to_string().contains("missing.csv"));
    }

    #[tokio::test]
    async fn test_load_invalid_utf8_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("releases.csv");
        tokio::fs::write(&path, b"Repository,Month\n\xff\xfe,2024-01\n")
            .await
            .unwrap();

        let err = load(&path).await.unwrap_err();
        match &err {
            IngestError::Io { path: p, source } => {
                assert_eq!(p, &path);
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
            }
        }
    }
}
