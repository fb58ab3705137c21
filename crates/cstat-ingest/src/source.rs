//! Raw dataset availability.
//!
//! Acquiring datasets from the remote catalogue happens outside this
//! workspace. The pipeline only asks a [`DatasetFetcher`] to guarantee that a
//! dataset's file is present before it starts reading; it neither retries nor
//! checks freshness.

use std::path::Path;

use tracing::debug;

use cstat_model::SourceDataset;

use crate::error::{IngestError, Result};

pub trait DatasetFetcher {
    /// Ensure `path` holds the extracted file of `dataset`.
    fn ensure_available(&self, dataset: SourceDataset, path: &Path) -> Result<()>;
}

/// Datasets already extracted into a local directory by an external step.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDirectory;

impl DatasetFetcher for LocalDirectory {
    fn ensure_available(&self, dataset: SourceDataset, path: &Path) -> Result<()> {
        if path.is_file() {
            debug!(dataset = %dataset, path = %path.display(), "dataset available");
            Ok(())
        } else {
            Err(IngestError::DatasetUnavailable {
                dataset,
                catalogue_id: dataset.catalogue_id(),
                path: path.to_path_buf(),
            })
        }
    }
}
