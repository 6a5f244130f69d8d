//! Bundle export orchestration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, SecondsFormat, Utc};
use creature_spec::ValidatedBlueprint;
use regex::Regex;
use tracing::{debug, info};

use crate::archive::{write_archive, ARCHIVE_EXTENSION};
use crate::checksum::file_checksum;
use crate::error::{io_at, ExportError, ExportResult};
use crate::payload::{
    render_json, AnimalDefinition, AnimalIdentity, Manifest, MaterialsPayload, RuntimePayload,
    Stamps, Tooling,
};
use crate::staging::StagingArea;

/// Application name recorded in manifests.
pub const DEFAULT_APP_NAME: &str = "CreatureStudio";

/// Fixed payload file names.
pub const MANIFEST_FILE: &str = "manifest.json";
pub const DEFINITION_FILE: &str = "AnimalDefinition.json";
pub const MATERIALS_FILE: &str = "materials.json";
pub const RUNTIME_FILE: &str = "runtime.json";
pub const BLUEPRINT_FILE: &str = "blueprint.json";

/// Bundle directory holding passthrough assets.
pub const ASSETS_DIR: &str = "assets";

static UNSAFE_KEY_CHARS: OnceLock<Regex> = OnceLock::new();

fn unsafe_key_chars() -> &'static Regex {
    UNSAFE_KEY_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("invalid regex pattern"))
}

/// Strips every character that is not an ASCII letter, digit or underscore.
///
/// ```
/// use creature_export::species_key;
///
/// assert_eq!(species_key("Elephant!"), "Elephant");
/// assert_eq!(species_key("Snow Leopard (v2)"), "SnowLeopardv2");
/// ```
pub fn species_key(display_name: &str) -> String {
    unsafe_key_chars().replace_all(display_name, "").into_owned()
}

/// Exporter settings, built once by the caller.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory receiving bundle directories and archives.
    pub export_root: PathBuf,
    /// Directory with per-species asset folders, if any.
    pub assets_root: Option<PathBuf>,
    /// Application name written to the manifest.
    pub app_name: String,
    /// Manifest timestamp; `None` uses the current time.
    ///
    /// Payload files never depend on it, but `manifest.json` and the archive
    /// only come out byte-identical across exports when it is fixed.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExportConfig {
    pub fn new(export_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
            assets_root: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            timestamp: None,
        }
    }

    pub fn with_assets_root(mut self, assets_root: impl Into<PathBuf>) -> Self {
        self.assets_root = Some(assets_root.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// The `.zip` archive.
    pub archive_path: PathBuf,
    /// The unpacked bundle directory.
    pub staging_dir: PathBuf,
    /// Checksum per bundle-relative file, as listed in the manifest.
    pub checksums: BTreeMap<String, String>,
}

/// Writes export bundles for validated blueprints.
#[derive(Debug, Clone)]
pub struct BundleExporter {
    config: ExportConfig,
}

impl BundleExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports `validated` as `{speciesKey}V{version}`.
    ///
    /// Preconditions (non-blank single-segment version, non-empty species
    /// key) are checked before the filesystem is touched. An earlier bundle or
    /// archive with the same name is replaced in full.
    pub fn export(
        &self,
        validated: &ValidatedBlueprint,
        version: &str,
    ) -> ExportResult<ExportOutcome> {
        let version = check_version(version)?;
        let blueprint = validated.blueprint();
        let key = species_key(&blueprint.meta.name);
        if key.is_empty() {
            return Err(ExportError::EmptySpeciesKey {
                name: blueprint.meta.name.clone(),
            });
        }

        let root = &self.config.export_root;
        fs::create_dir_all(root).map_err(io_at(root))?;

        let bundle_name = format!("{key}V{version}");
        let staging = StagingArea::create(root, &bundle_name)?;
        let mut checksums = BTreeMap::new();

        let definition = AnimalDefinition::build(blueprint, &key);
        write_payload(&staging, DEFINITION_FILE, &definition, &mut checksums)?;
        write_payload(
            &staging,
            MATERIALS_FILE,
            &MaterialsPayload::build(blueprint),
            &mut checksums,
        )?;
        let runtime = RuntimePayload::build(blueprint);
        if runtime.has_content() {
            write_payload(&staging, RUNTIME_FILE, &runtime, &mut checksums)?;
        }
        write_payload(&staging, BLUEPRINT_FILE, validated.source(), &mut checksums)?;
        write_payload(
            &staging,
            &format!("{key}Blueprint.json"),
            validated.source(),
            &mut checksums,
        )?;

        if let Some(assets) = self.asset_dir(&blueprint.meta.name, &key) {
            for name in staging.copy_tree(&assets, ASSETS_DIR)? {
                record_checksum(&staging, &name, &mut checksums)?;
            }
        }

        let manifest = Manifest {
            stamps: Stamps::for_blueprint(blueprint),
            tooling: Tooling {
                app: self.config.app_name.clone(),
                version: version.to_string(),
                timestamp: self
                    .config
                    .timestamp
                    .unwrap_or_else(Utc::now)
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            animal: AnimalIdentity {
                species_key: key.clone(),
                display_name: blueprint.meta.name.clone(),
            },
            payloads: checksums.clone(),
        };
        let rendered = render_json(&manifest, MANIFEST_FILE)?;
        staging.write_file(MANIFEST_FILE, rendered.as_bytes())?;

        let staging_dir = staging.commit(&root.join(&bundle_name))?;
        let archive_path = root.join(format!("{bundle_name}.{ARCHIVE_EXTENSION}"));
        write_archive(&staging_dir, &archive_path)?;

        info!(
            species = %key,
            version = %version,
            files = checksums.len(),
            archive = %archive_path.display(),
            "Exported bundle"
        );

        Ok(ExportOutcome {
            archive_path,
            staging_dir,
            checksums,
        })
    }

    /// Asset folder for the species, looked up by display name then key.
    fn asset_dir(&self, display_name: &str, key: &str) -> Option<PathBuf> {
        let root = self.config.assets_root.as_ref()?;
        [display_name, key]
            .into_iter()
            .filter(|name| !name.is_empty() && is_single_segment(name))
            .map(|name| root.join(name))
            .find(|dir| dir.is_dir())
    }
}

fn check_version(version: &str) -> ExportResult<&str> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(ExportError::EmptyVersion);
    }
    if !is_single_segment(trimmed) {
        return Err(ExportError::InvalidVersion {
            version: trimmed.to_string(),
        });
    }
    Ok(trimmed)
}

fn is_single_segment(name: &str) -> bool {
    !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

fn write_payload<T: serde::Serialize>(
    staging: &StagingArea,
    name: &str,
    payload: &T,
    checksums: &mut BTreeMap<String, String>,
) -> ExportResult<()> {
    let rendered = render_json(payload, name)?;
    staging.write_file(name, rendered.as_bytes())?;
    record_checksum(staging, name, checksums)
}

fn record_checksum(
    staging: &StagingArea,
    name: &str,
    checksums: &mut BTreeMap<String, String>,
) -> ExportResult<()> {
    let path: &Path = &staging.path().join(name);
    let digest = file_checksum(path).map_err(io_at(path))?;
    debug!(file = name, checksum = %digest, "Checksummed payload");
    checksums.insert(name.to_string(), digest);
    Ok(())
}
