//! Fixture documents and throwaway studio directories.

use std::fs;
use std::path::{Path, PathBuf};

use creature_cli::StudioConfig;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Directory holding the JSON fixtures shipped with this crate.
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Directory holding the starter template fixtures.
pub fn templates_dir() -> PathBuf {
    fixtures_dir().join("templates")
}

/// Loads a fixture file relative to [`fixtures_dir`].
pub fn load_fixture(relative: &str) -> Value {
    let path = fixtures_dir().join(relative);
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Fixture {} is not JSON: {}", path.display(), e))
}

/// The canonical V2 elephant.
pub fn elephant() -> Value {
    load_fixture("ElephantBlueprint.json")
}

/// A legacy-only quadruped (chain map and slot body parts, no V2 data).
pub fn legacy_quadruped() -> Value {
    load_fixture("LegacyQuadrupedBlueprint.json")
}

/// Bones `root, spine1, head`; chain `spine` references the missing `headX`.
pub fn headx_scenario() -> Value {
    json!({
        "meta": {"name": "HeadX"},
        "bodyPlan": {"type": "biped"},
        "skeleton": {"bones": [
            {"name": "root", "parent": "", "position": [0, 0, 0]},
            {"name": "spine1", "parent": "root", "position": [0, 1, 0]},
            {"name": "head", "parent": "spine1", "position": [0, 2, 0]}
        ]},
        "chainsV2": [{"name": "spine", "bones": ["spine1", "headX"]}],
        "bodyPartsV2": [{"name": "head", "chain": "spine", "generator": "headGenerator"}]
    })
}

/// A temporary studio laid out like a real base directory.
pub struct StudioFixture {
    pub root: TempDir,
    pub config: StudioConfig,
}

impl StudioFixture {
    /// Creates an empty studio with its blueprint directory in place.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let config = StudioConfig::rooted_at(root.path());
        fs::create_dir_all(&config.blueprints_dir).expect("Failed to create blueprints dir");
        Self { root, config }
    }

    /// Copies the template fixtures into the studio.
    pub fn with_templates(self) -> Self {
        fs::create_dir_all(&self.config.templates_dir).expect("Failed to create templates dir");
        for entry in fs::read_dir(templates_dir()).expect("Failed to list template fixtures") {
            let path = entry.expect("Failed to read template entry").path();
            let name = path.file_name().expect("template has a file name");
            fs::copy(&path, self.config.templates_dir.join(name)).expect("Failed to copy template");
        }
        self
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Writes a blueprint document into the store directory.
    pub fn add_blueprint(&self, file: &str, document: &Value) -> PathBuf {
        let path = self.config.blueprints_dir.join(file);
        let text = serde_json::to_string_pretty(document).expect("fixture serializes");
        fs::write(&path, text).expect("Failed to write blueprint");
        path
    }

    /// Writes a reference asset for `species` (display name or key).
    pub fn add_asset(&self, species: &str, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.config.assets_dir.join(species).join(relative);
        fs::create_dir_all(path.parent().expect("asset has a parent"))
            .expect("Failed to create asset dir");
        fs::write(&path, contents).expect("Failed to write asset");
        path
    }
}

impl Default for StudioFixture {
    fn default() -> Self {
        Self::new()
    }
}
