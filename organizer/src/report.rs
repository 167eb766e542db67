use sorter_core::{CoreError, SavedRecord};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Records matching no category land in this file.
pub const UNCATEGORIZED_FILE: &str = "uncategorized";

const DIVIDER_WIDTH: usize = 30;

pub fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

/// Writes per-category report files.
///
/// Blocks are appended into a staging directory next to the target;
/// `finalize` swaps it into place only after the whole run succeeded, so an
/// aborted run never leaves a half-wiped output directory behind. Files are
/// opened per append and closed immediately.
#[derive(Debug)]
pub struct ReportWriter {
    staging: PathBuf,
    target: PathBuf,
    finalized: bool,
}

impl ReportWriter {
    pub fn create(target: &Path) -> Result<Self, CoreError> {
        let staging = staging_path(target);
        if staging.exists() {
            // Stale staging from an aborted run.
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;
        debug!("Staging report files in {}", staging.display());

        Ok(Self {
            staging,
            target: target.to_path_buf(),
            finalized: false,
        })
    }

    /// Appends the record's block to every matched category file, or to the
    /// uncategorized file when the set is empty.
    pub fn append(&self, record: &SavedRecord, categories: &BTreeSet<&str>) -> Result<(), CoreError> {
        if categories.is_empty() {
            return self.append_to(UNCATEGORIZED_FILE, record);
        }

        for category in categories {
            self.append_to(category, record)?;
        }
        Ok(())
    }

    fn append_to(&self, file_name: &str, record: &SavedRecord) -> Result<(), CoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.staging.join(file_name))?;
        writeln!(file, "{record}")?;
        writeln!(file, "{}", divider())?;
        Ok(())
    }

    /// Replaces the previous output directory with this run's files.
    pub fn finalize(mut self) -> Result<PathBuf, CoreError> {
        if self.target.exists() {
            fs::remove_dir_all(&self.target)?;
        }
        fs::rename(&self.staging, &self.target)?;
        self.finalized = true;
        info!("Report written to {}", self.target.display());
        Ok(self.target.clone())
    }
}

impl Drop for ReportWriter {
    fn drop(&mut self) {
        if !self.finalized && self.staging.exists() {
            if let Err(err) = fs::remove_dir_all(&self.staging) {
                debug!(
                    "Failed to clean up staging directory {}: {}",
                    self.staging.display(),
                    err
                );
            }
        }
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(".staging");
    target.with_file_name(name)
}
