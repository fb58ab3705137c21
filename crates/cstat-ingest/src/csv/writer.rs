//! Indexed CSV output and staged output batches.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use cstat_model::columns::ID;

use crate::error::{IngestError, Result};

/// Writes `df` with a leading `id` row-index column and returns the row count.
///
/// Nulls are written as empty fields so missing values round-trip as missing.
pub fn write_indexed_csv(df: &DataFrame, path: &Path, delimiter: u8) -> Result<usize> {
    let mut indexed = df.with_row_index(ID.into(), None)?;
    let file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_separator(delimiter)
        .finish(&mut indexed)
        .map_err(|e| IngestError::FileWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    debug!(path = %path.display(), rows = indexed.height(), "csv written");
    Ok(indexed.height())
}

/// A batch of output files written into a private staging directory and moved
/// into the target directory only on [`StagedOutput::commit`].
///
/// Dropping an uncommitted batch removes the staging directory, so a failure
/// while producing any table leaves the target directory untouched. The
/// staging directory lives inside the target so the final moves are renames on
/// one filesystem.
#[derive(Debug)]
pub struct StagedOutput {
    target_dir: PathBuf,
    staging: TempDir,
    delimiter: u8,
    staged: Vec<String>,
}

/// Subdirectory of the staging area holding the files a commit replaces.
const PREVIOUS_DIR: &str = ".previous";

/// Renames performed by a commit, in order, so they can be undone.
#[derive(Debug, Default)]
struct CommitJournal {
    backed_up: Vec<String>,
    placed: Vec<String>,
}

impl StagedOutput {
    pub fn new(target_dir: &Path, delimiter: u8) -> Result<Self> {
        fs::create_dir_all(target_dir).map_err(|source| IngestError::OutputDirectory {
            path: target_dir.to_path_buf(),
            source,
        })?;
        let staging = tempfile::Builder::new()
            .prefix(".cstat-staging-")
            .tempdir_in(target_dir)
            .map_err(|source| IngestError::OutputDirectory {
                path: target_dir.to_path_buf(),
                source,
            })?;
        Ok(Self {
            target_dir: target_dir.to_path_buf(),
            staging,
            delimiter,
            staged: Vec::new(),
        })
    }

    /// Write one table into the staging directory.
    pub fn stage(&mut self, file_name: &str, df: &DataFrame) -> Result<usize> {
        let path = self.staging.path().join(file_name);
        let rows = write_indexed_csv(df, &path, self.delimiter)?;
        self.staged.push(file_name.to_string());
        Ok(rows)
    }

    /// Move every staged file into the target directory, replacing older files.
    ///
    /// Existing targets are moved aside first. If any move fails, the files
    /// already placed are removed and the previous ones restored, so the target
    /// directory holds either the whole new batch or its old contents.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        for name in &self.staged {
            let to = self.target_dir.join(name);
            if to.is_dir() {
                return Err(IngestError::FileWrite {
                    path: to,
                    message: "destination is a directory".to_string(),
                });
            }
        }

        let previous = self.staging.path().join(PREVIOUS_DIR);
        fs::create_dir(&previous).map_err(|source| IngestError::OutputDirectory {
            path: previous.clone(),
            source,
        })?;

        let mut journal = CommitJournal::default();
        for name in &self.staged {
            if let Err(error) = self.place(name, &previous, &mut journal) {
                self.roll_back(&previous, &journal);
                return Err(error);
            }
        }

        let written: Vec<PathBuf> = journal
            .placed
            .iter()
            .map(|name| self.target_dir.join(name))
            .collect();
        info!(
            target_dir = %self.target_dir.display(),
            file_count = written.len(),
            replaced = journal.backed_up.len(),
            "output batch committed"
        );
        Ok(written)
    }

    fn place(&self, name: &str, previous: &Path, journal: &mut CommitJournal) -> Result<()> {
        let to = self.target_dir.join(name);
        if to.exists() {
            rename(&to, &previous.join(name))?;
            journal.backed_up.push(name.to_string());
        }
        rename(&self.staging.path().join(name), &to)?;
        journal.placed.push(name.to_string());
        Ok(())
    }

    fn roll_back(&self, previous: &Path, journal: &CommitJournal) {
        for name in journal.placed.iter().rev() {
            let path = self.target_dir.join(name);
            if let Err(error) = fs::remove_file(&path) {
                warn!(path = %path.display(), %error, "could not remove partially committed file");
            }
        }
        for name in journal.backed_up.iter().rev() {
            let path = self.target_dir.join(name);
            if let Err(error) = fs::rename(previous.join(name), &path) {
                warn!(path = %path.display(), %error, "could not restore previous file");
            }
        }
        warn!(
            target_dir = %self.target_dir.display(),
            restored = journal.backed_up.len(),
            "output batch rolled back"
        );
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| IngestError::FileWrite {
        path: to.to_path_buf(),
        message: e.to_string(),
    })
}
