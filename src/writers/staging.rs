use crate::error::{ProcessingError, Result};
use crate::utils::constants::STAGING_PREFIX;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Scratch directory next to the final outputs.
///
/// Artifacts are written here first and only moved into the output root by
/// [`StagingArea::commit`]. Dropping an uncommitted area removes everything staged.
pub struct StagingArea {
    temp_dir: TempDir,
    destination: PathBuf,
    staged: Vec<String>,
}

impl StagingArea {
    pub fn new(destination: &Path) -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(destination)
            .map_err(|e| {
                ProcessingError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create staging directory in {}: {}",
                        destination.display(),
                        e
                    ),
                ))
            })?;

        Ok(Self {
            temp_dir,
            destination: destination.to_path_buf(),
            staged: Vec::new(),
        })
    }

    pub fn staging_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Reserve a staged path for `file_name`
    pub fn stage(&mut self, file_name: &str) -> PathBuf {
        if !self.staged.iter().any(|f| f == file_name) {
            self.staged.push(file_name.to_string());
        }
        self.temp_dir.path().join(file_name)
    }

    pub fn staged_files(&self) -> &[String] {
        &self.staged
    }

    /// Move every staged file into the destination, replacing older outputs.
    ///
    /// Nothing moves unless every staged file exists. If a rename fails part-way,
    /// the error names the files that already replaced their old versions.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        if let Some(missing) = self
            .staged
            .iter()
            .find(|f| !self.temp_dir.path().join(f).exists())
        {
            return Err(ProcessingError::InvalidFormat(format!(
                "Staged file '{}' was never written",
                missing
            )));
        }

        let mut committed: Vec<PathBuf> = Vec::with_capacity(self.staged.len());
        for file_name in &self.staged {
            let from = self.temp_dir.path().join(file_name);
            let to = self.destination.join(file_name);
            if let Err(source) = std::fs::rename(&from, &to) {
                warn!(
                    "Commit to {} failed after {} of {} files",
                    self.destination.display(),
                    committed.len(),
                    self.staged.len()
                );
                return Err(ProcessingError::PartialCommit {
                    committed: committed
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect(),
                    source,
                });
            }
            debug!("Committed {}", to.display());
            committed.push(to);
        }

        Ok(committed)
    }
}
