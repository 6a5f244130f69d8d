//! Deterministic `.zip` packaging of a bundle directory.

use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{io_at, ExportError, ExportResult};

/// File extension of bundle archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Packs every file under `source_dir` into a deflate-compressed zip at
/// `archive_path`.
///
/// Files are added in sorted path order with `/` separators, a fixed
/// modification time of 1980-01-01 and fixed permissions, so identical
/// directory contents give identical archives. Directories get no entries of
/// their own. The archive is written to a temporary file next to its
/// destination and renamed over any previous archive.
pub fn write_archive(source_dir: &Path, archive_path: &Path) -> ExportResult<()> {
    let parent = archive_path.parent().unwrap_or_else(|| Path::new("."));
    let tmp = NamedTempFile::new_in(parent).map_err(io_at(parent))?;

    let mut writer = ZipWriter::new(tmp);
    append_tree(&mut writer, source_dir).map_err(io_at(source_dir))?;

    let tmp = writer
        .finish()
        .map_err(io::Error::from)
        .map_err(io_at(archive_path))?;
    tmp.persist(archive_path).map_err(|e| ExportError::Io {
        path: archive_path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

fn append_tree<W: Write + Seek>(writer: &mut ZipWriter<W>, root: &Path) -> io::Result<()> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        writer.start_file(name, options)?;
        let mut file = File::open(entry.path())?;
        io::copy(&mut file, writer)?;
    }
    Ok(())
}
