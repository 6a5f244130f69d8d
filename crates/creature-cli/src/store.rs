//! On-disk blueprint store.
//!
//! Blueprints live as pretty-printed JSON files in one directory. A name
//! resolves to `{name}.json`, then `{name}Blueprint.json`, then to any file
//! whose `meta.name` equals the name. Saves always use `{name}Blueprint.json`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use creature_spec::{validate, Blueprint, BlueprintMeta, ValidatedBlueprint};
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{io_at, StoreError, StoreResult};
use crate::templates::TemplateCatalog;

/// Names that can be neither deleted nor claimed by imports and templates.
pub const PROTECTED_BLUEPRINTS: &[&str] = &["Elephant"];

/// Returns true if `name` is protected.
pub fn is_protected(name: &str) -> bool {
    PROTECTED_BLUEPRINTS.contains(&name)
}

/// Rejects names that are blank or would resolve outside the store.
pub fn check_name(name: &str) -> StoreResult<&str> {
    if name.trim().is_empty() {
        return Err(StoreError::BlankName);
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(StoreError::UnsafeName {
            name: name.to_string(),
        });
    }
    Ok(name)
}

/// File name a blueprint is saved under.
pub fn blueprint_file_name(name: &str) -> String {
    format!("{name}Blueprint.json")
}

/// One row of `blueprint list`.
#[derive(Debug, Clone, Serialize)]
pub struct BlueprintSummary {
    pub file: String,
    pub meta: BlueprintMeta,
}

/// Directory of blueprint documents.
#[derive(Debug, Clone)]
pub struct BlueprintStore {
    dir: PathBuf,
}

impl BlueprintStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Metadata of every valid blueprint, sorted by file name.
    ///
    /// Files that fail to parse or validate are skipped with a warning.
    pub fn list(&self) -> StoreResult<Vec<BlueprintSummary>> {
        let mut summaries = Vec::new();
        for path in self.json_files()? {
            let file = file_name(&path);
            match read_document(&path).and_then(|doc| validate_named(&file, &doc)) {
                Ok(validated) => summaries.push(BlueprintSummary {
                    file,
                    meta: validated.into_blueprint().meta,
                }),
                Err(e) => warn!(file = %file, error = %e, "Skipping unreadable blueprint"),
            }
        }
        Ok(summaries)
    }

    /// Resolves `name` to the file that holds it.
    pub fn resolve(&self, name: &str) -> StoreResult<PathBuf> {
        check_name(name)?;
        for candidate in [format!("{name}.json"), blueprint_file_name(name)] {
            let path = self.dir.join(candidate);
            if path.is_file() {
                return Ok(path);
            }
        }

        for path in self.json_files()? {
            let Ok(document) = read_document(&path) else {
                continue;
            };
            if document.pointer("/meta/name").and_then(Value::as_str) == Some(name) {
                return Ok(path);
            }
        }

        Err(StoreError::NotFound {
            name: name.to_string(),
        })
    }

    /// Loads and validates the blueprint called `name`.
    pub fn load(&self, name: &str) -> StoreResult<ValidatedBlueprint> {
        let path = self.resolve(name)?;
        debug!(name, path = %path.display(), "Loading blueprint");
        let document = read_document(&path)?;
        validate_named(name, &document)
    }

    /// Saves `blueprint` as `{name}Blueprint.json` with `meta.name` set to `name`.
    pub fn save(&self, name: &str, blueprint: &Blueprint) -> StoreResult<ValidatedBlueprint> {
        let renamed = blueprint.with_name(name);
        let document = renamed.to_value().map_err(|source| StoreError::Serialize {
            name: name.to_string(),
            source,
        })?;
        self.save_document(name, document)
    }

    /// Deletes the blueprint called `name`. Protected names are refused.
    pub fn delete(&self, name: &str) -> StoreResult<PathBuf> {
        if is_protected(name) {
            return Err(StoreError::Protected {
                name: name.to_string(),
                action: "deleted",
            });
        }
        let path = self.resolve(name)?;
        fs::remove_file(&path).map_err(io_at(&path))?;
        debug!(name, path = %path.display(), "Deleted blueprint");
        Ok(path)
    }

    /// Imports a blueprint from raw JSON bytes and saves it under its `meta.name`.
    pub fn import_bytes(&self, payload: &[u8]) -> StoreResult<ValidatedBlueprint> {
        let text = std::str::from_utf8(payload).map_err(|e| StoreError::Malformed {
            what: "Import payload".to_string(),
            format: "UTF-8",
            message: e.to_string(),
        })?;
        let document: Value = serde_json::from_str(text).map_err(|e| StoreError::Malformed {
            what: "Import payload".to_string(),
            format: "JSON",
            message: e.to_string(),
        })?;
        let validated = validate_named("imported blueprint", &document)?;

        let name = check_name(validated.name().trim())?.to_string();
        if is_protected(&name) {
            return Err(StoreError::Protected {
                name,
                action: "overwritten by an import",
            });
        }
        self.save_document(&name, document)
    }

    /// Creates `name` from the template selected by `label`.
    ///
    /// Only `meta.name` changes; everything else comes from the template.
    pub fn create_from_template(
        &self,
        name: &str,
        label: &str,
        catalog: &TemplateCatalog,
    ) -> StoreResult<ValidatedBlueprint> {
        let name = check_name(name.trim())?;
        if is_protected(name) {
            return Err(StoreError::Protected {
                name: name.to_string(),
                action: "used for a new species",
            });
        }
        if self.dir.join(blueprint_file_name(name)).exists() {
            return Err(StoreError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let template = catalog.load(label)?;
        self.save_document(name, template.source().clone())
    }

    fn save_document(&self, name: &str, mut document: Value) -> StoreResult<ValidatedBlueprint> {
        check_name(name)?;
        if let Some(meta) = document.get_mut("meta").and_then(Value::as_object_mut) {
            meta.insert("name".to_string(), Value::String(name.to_string()));
        }
        let validated = validate_named(name, &document)?;

        let rendered =
            serde_json::to_string_pretty(&document).map_err(|e| StoreError::Serialize {
                name: name.to_string(),
                source: e.into(),
            })?;

        fs::create_dir_all(&self.dir).map_err(io_at(&self.dir))?;
        let path = self.dir.join(blueprint_file_name(name));
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_at(&self.dir))?;
        tmp.write_all(rendered.as_bytes()).map_err(io_at(&path))?;
        tmp.write_all(b"\n").map_err(io_at(&path))?;
        tmp.persist(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        debug!(name, path = %path.display(), "Saved blueprint");
        Ok(validated)
    }

    fn json_files(&self) -> StoreResult<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_at(&self.dir))? {
            let path = entry.map_err(io_at(&self.dir))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_document(path: &Path) -> StoreResult<Value> {
    let text = fs::read_to_string(path).map_err(io_at(path))?;
    serde_json::from_str(&text).map_err(|e| StoreError::Malformed {
        what: format!("Blueprint file '{}'", file_name(path)),
        format: "JSON",
        message: e.to_string(),
    })
}

fn validate_named(name: &str, document: &Value) -> StoreResult<ValidatedBlueprint> {
    validate(document).map_err(|failure| StoreError::Invalid {
        name: name.to_string(),
        failure,
    })
}
