//! Starter templates addressed by body-plan label.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use creature_spec::{validate, ValidatedBlueprint};
use serde::Serialize;
use serde_json::Value;

use crate::error::{io_at, StoreError, StoreResult};

/// Template families shipped with the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Quadruped,
    Biped,
    Winged,
    NoPed,
}

/// Every accepted label with the template it selects.
pub const TEMPLATE_LABELS: &[(&str, TemplateKind)] = &[
    ("biped", TemplateKind::Biped),
    ("no-ped", TemplateKind::NoPed),
    ("no_ped", TemplateKind::NoPed),
    ("nopeds", TemplateKind::NoPed),
    ("quadruped", TemplateKind::Quadruped),
    ("winged", TemplateKind::Winged),
    ("winged_quadruped", TemplateKind::Winged),
];

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Quadruped,
        TemplateKind::Biped,
        TemplateKind::Winged,
        TemplateKind::NoPed,
    ];

    /// Looks up a label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> StoreResult<Self> {
        let key = label.trim().to_lowercase();
        TEMPLATE_LABELS
            .iter()
            .find(|(l, _)| *l == key)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| StoreError::UnknownTemplate {
                label: label.to_string(),
                expected: accepted_labels(),
            })
    }

    /// File name of the template document.
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateKind::Quadruped => "TemplateQuadruped.json",
            TemplateKind::Biped => "TemplateBiped.json",
            TemplateKind::Winged => "TemplateWinged.json",
            TemplateKind::NoPed => "TemplateNoPed.json",
        }
    }

    /// Labels that select this template.
    pub fn labels(&self) -> Vec<&'static str> {
        TEMPLATE_LABELS
            .iter()
            .filter(|(_, kind)| kind == self)
            .map(|(label, _)| *label)
            .collect()
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TemplateKind::Quadruped => "quadruped",
            TemplateKind::Biped => "biped",
            TemplateKind::Winged => "winged",
            TemplateKind::NoPed => "no-ped",
        };
        f.write_str(label)
    }
}

/// Sorted, comma-separated list of accepted labels.
pub fn accepted_labels() -> String {
    TEMPLATE_LABELS
        .iter()
        .map(|(label, _)| *label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One row of `template list`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateEntry {
    pub kind: TemplateKind,
    pub labels: Vec<&'static str>,
    pub file: &'static str,
    pub available: bool,
}

/// Template documents stored in one directory.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
}

impl TemplateCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every template family and whether its file is present.
    pub fn entries(&self) -> Vec<TemplateEntry> {
        TemplateKind::ALL
            .iter()
            .map(|kind| TemplateEntry {
                kind: *kind,
                labels: kind.labels(),
                file: kind.file_name(),
                available: self.dir.join(kind.file_name()).is_file(),
            })
            .collect()
    }

    /// Loads and validates the template selected by `label`.
    pub fn load(&self, label: &str) -> StoreResult<ValidatedBlueprint> {
        let kind = TemplateKind::from_label(label)?;
        let file = kind.file_name();
        let path = self.dir.join(file);
        if !path.is_file() {
            return Err(StoreError::TemplateMissing {
                file: file.to_string(),
                dir: self.dir.clone(),
            });
        }

        let text = fs::read_to_string(&path).map_err(io_at(&path))?;
        let document: Value = serde_json::from_str(&text).map_err(|e| StoreError::Malformed {
            what: format!("Template blueprint '{file}'"),
            format: "JSON",
            message: e.to_string(),
        })?;
        validate(&document).map_err(|failure| StoreError::Invalid {
            name: file.to_string(),
            failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_labels_are_normalized() {
        assert_eq!(TemplateKind::from_label(" Quadruped ").unwrap(), TemplateKind::Quadruped);
        assert_eq!(TemplateKind::from_label("WINGED_QUADRUPED").unwrap(), TemplateKind::Winged);
        assert_eq!(TemplateKind::from_label("nopeds").unwrap(), TemplateKind::NoPed);
        assert_eq!(TemplateKind::from_label("no-ped").unwrap().file_name(), "TemplateNoPed.json");
    }

    #[test]
    fn test_unknown_label_lists_accepted_labels() {
        let err = TemplateKind::from_label("serpent").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown template type 'serpent'. Expected one of: biped, no-ped, no_ped, nopeds, \
             quadruped, winged, winged_quadruped"
        );
    }

    #[test]
    fn test_blank_label_rejected() {
        assert!(matches!(
            TemplateKind::from_label("   "),
            Err(StoreError::UnknownTemplate { .. })
        ));
    }

    #[test]
    fn test_labels_grouped_by_kind() {
        assert_eq!(TemplateKind::NoPed.labels(), vec!["no-ped", "no_ped", "nopeds"]);
        assert_eq!(TemplateKind::Winged.labels(), vec!["winged", "winged_quadruped"]);
    }

    #[test]
    fn test_missing_template_file() {
        let tmp = TempDir::new().unwrap();
        let catalog = TemplateCatalog::new(tmp.path());
        assert!(matches!(
            catalog.load("biped"),
            Err(StoreError::TemplateMissing { .. })
        ));
        assert!(catalog.entries().iter().all(|e| !e.available));
    }

    #[test]
    fn test_load_validates_template() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("TemplateBiped.json"),
            r#"{
                "meta": {"name": "TemplateBiped"},
                "bodyPlan": {"type": "biped"},
                "skeleton": {"bones": [{"name": "spine_base", "parent": "", "position": [0, 1, 0]}]}
            }"#,
        )
        .unwrap();
        let catalog = TemplateCatalog::new(tmp.path());
        let template = catalog.load("biped").unwrap();
        assert_eq!(template.name(), "TemplateBiped");
        assert!(catalog.entries().iter().any(|e| e.kind == TemplateKind::Biped && e.available));
    }
}
