//! Staging directories that become visible only when complete.
//!
//! A bundle is assembled in a hidden temporary directory inside the export
//! root and swapped into its final name with renames. A previous bundle of the
//! same name is moved aside first and deleted afterwards, so readers see either
//! the old bundle or the new one, never a mix.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{io_at, ExportError, ExportResult};

/// A bundle under construction.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Creates an empty staging area inside `export_root`.
    pub fn create(export_root: &Path, bundle_name: &str) -> ExportResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!(".{bundle_name}.staging-"))
            .tempdir_in(export_root)
            .map_err(io_at(export_root))?;
        debug!(path = %dir.path().display(), "Created staging area");
        Ok(Self { dir })
    }

    /// Root of the staging area.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a file at a staging-relative path and returns its full path.
    pub fn write_file(&self, relative: &str, contents: &[u8]) -> ExportResult<PathBuf> {
        let target = self.path().join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(io_at(parent))?;
        }
        fs::write(&target, contents).map_err(io_at(&target))?;
        Ok(target)
    }

    /// Copies every file under `source` into `prefix/` inside the staging area.
    ///
    /// Returns the staging-relative paths of the copied files in sorted order,
    /// always using `/` as separator.
    pub fn copy_tree(&self, source: &Path, prefix: &str) -> ExportResult<Vec<String>> {
        let mut copied = Vec::new();
        for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ExportError::Io {
                path: source.to_path_buf(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|_| ExportError::Io {
                    path: entry.path().to_path_buf(),
                    source: std::io::Error::other("asset escaped its source directory"),
                })?;
            let name = std::iter::once(prefix.to_string())
                .chain(relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()))
                .collect::<Vec<_>>()
                .join("/");

            let target = self.path().join(&name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(io_at(parent))?;
            }
            fs::copy(entry.path(), &target).map_err(io_at(entry.path()))?;
            copied.push(name);
        }
        Ok(copied)
    }

    /// Moves the finished bundle to `target`, replacing whatever was there.
    pub fn commit(self, target: &Path) -> ExportResult<PathBuf> {
        let parent = target.parent().unwrap_or_else(|| Path::new("."));

        // Old bundle goes into a scratch directory that is deleted on drop.
        let retired = if target.exists() {
            let scratch = tempfile::Builder::new()
                .prefix(".replaced-")
                .tempdir_in(parent)
                .map_err(io_at(parent))?;
            let aside = scratch.path().join("bundle");
            fs::rename(target, &aside).map_err(io_at(target))?;
            warn!(path = %target.display(), "Replacing existing staging directory");
            Some((scratch, aside))
        } else {
            None
        };

        if let Err(source) = fs::rename(self.dir.path(), target) {
            return Err(restore_previous(target, source, retired));
        }

        // `self.dir` now points at a moved path; its drop is a no-op.
        drop(retired);
        Ok(target.to_path_buf())
    }
}

/// Puts a retired bundle back after a failed install.
///
/// If that fails too, the retired bundle is kept on disk and both errors are
/// reported.
fn restore_previous(
    target: &Path,
    source: std::io::Error,
    retired: Option<(TempDir, PathBuf)>,
) -> ExportError {
    let Some((scratch, aside)) = retired else {
        return ExportError::Io {
            path: target.to_path_buf(),
            source,
        };
    };
    match fs::rename(&aside, target) {
        Ok(()) => ExportError::Io {
            path: target.to_path_buf(),
            source,
        },
        Err(rollback) => {
            let preserved = scratch.keep().join("bundle");
            warn!(
                path = %target.display(),
                preserved = %preserved.display(),
                error = %rollback,
                "Could not restore previous bundle"
            );
            ExportError::RollbackFailed {
                path: target.to_path_buf(),
                preserved,
                source,
                rollback,
            }
        }
    }
}
