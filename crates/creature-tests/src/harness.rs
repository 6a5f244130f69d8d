//! Helpers for inspecting export bundles and archives.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use walkdir::WalkDir;
use zip::ZipArchive;

/// A fixed manifest timestamp for byte-level comparisons.
pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Relative paths of every file under `dir`, sorted, `/`-separated.
pub fn bundle_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .map(|e| e.expect("Failed to walk bundle"))
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .expect("entry under bundle")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// File entries of a `.zip` archive keyed by internal path.
pub fn archive_entries(archive: &Path) -> BTreeMap<String, Vec<u8>> {
    let file = File::open(archive).expect("Failed to open archive");
    let mut zip = ZipArchive::new(file).expect("Failed to read archive");
    let mut entries = BTreeMap::new();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).expect("Failed to read archive entry");
        if !entry.is_file() {
            continue;
        }
        let mut body = Vec::new();
        entry.read_to_end(&mut body).expect("Failed to read entry");
        entries.insert(entry.name().to_string(), body);
    }
    entries
}

/// Parses a JSON file.
pub fn read_json(path: &Path) -> Value {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("{} is not JSON: {}", path.display(), e))
}
