//! Studio directory configuration.
//!
//! Settings are resolved once per invocation from, in increasing precedence:
//! defaults rooted at a base directory, `CREATURESTUDIO_*` environment
//! variables, and command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use creature_export::{ExportConfig, DEFAULT_APP_NAME};

/// Prefix shared by every environment variable the CLI reads.
pub const ENV_PREFIX: &str = "CREATURESTUDIO_";

/// Environment variable that pins manifest timestamps for reproducible bundles.
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// Directory settings for one CLI run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// User-authored blueprint documents.
    pub blueprints_dir: PathBuf,
    /// Starter templates (`TemplateQuadruped.json`, ...).
    pub templates_dir: PathBuf,
    /// Destination of export bundles and archives.
    pub exports_dir: PathBuf,
    /// Per-species reference assets copied into bundles.
    pub assets_dir: PathBuf,
    /// Application name recorded in manifests.
    pub app_name: String,
}

/// Values given on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_dir: Option<PathBuf>,
    pub exports_dir: Option<PathBuf>,
}

impl StudioConfig {
    /// Default layout under `base`.
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            blueprints_dir: base.join("shared").join("blueprints"),
            templates_dir: base.join("shared").join("templates"),
            exports_dir: base.join("exports"),
            assets_dir: base.join("zoo_reference"),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    /// Resolves settings from the process environment and working directory.
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::resolve(&cwd, |key| std::env::var(key).ok(), overrides))
    }

    /// Resolves settings against an explicit environment lookup.
    ///
    /// Relative paths from the environment or flags are taken relative to `cwd`.
    pub fn resolve<F>(cwd: &Path, env: F, overrides: &ConfigOverrides) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            env(&format!("{ENV_PREFIX}{suffix}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base = overrides
            .base_dir
            .as_ref()
            .map(|p| cwd.join(p))
            .or_else(|| var("BASE_DIR").map(|v| cwd.join(v)))
            .unwrap_or_else(|| cwd.to_path_buf());

        let mut config = Self::rooted_at(&base);
        if let Some(dir) = var("BLUEPRINTS_DIR") {
            config.blueprints_dir = cwd.join(dir);
        }
        if let Some(dir) = var("TEMPLATES_DIR") {
            config.templates_dir = cwd.join(dir);
        }
        if let Some(dir) = var("EXPORTS_DIR") {
            config.exports_dir = cwd.join(dir);
        }
        if let Some(dir) = var("ASSETS_DIR") {
            config.assets_dir = cwd.join(dir);
        }
        if let Some(name) = var("APP_NAME") {
            config.app_name = name;
        }
        if let Some(dir) = &overrides.exports_dir {
            config.exports_dir = cwd.join(dir);
        }
        config
    }

    /// Exporter settings, with the manifest timestamp taken from
    /// `SOURCE_DATE_EPOCH` when it is set.
    pub fn export_config(&self) -> Result<ExportConfig> {
        let timestamp = source_date_epoch(std::env::var(SOURCE_DATE_EPOCH).ok().as_deref())?;
        Ok(self.export_config_at(timestamp))
    }

    /// Exporter settings with an explicit manifest timestamp.
    pub fn export_config_at(&self, timestamp: Option<DateTime<Utc>>) -> ExportConfig {
        let mut config =
            ExportConfig::new(&self.exports_dir).with_assets_root(&self.assets_dir);
        config.app_name = self.app_name.clone();
        config.timestamp = timestamp;
        config
    }
}

/// Parses a `SOURCE_DATE_EPOCH` value (whole seconds since the Unix epoch).
pub fn source_date_epoch(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let seconds: i64 = raw
        .parse()
        .with_context(|| format!("{SOURCE_DATE_EPOCH} must be an integer, got '{raw}'"))?;
    match DateTime::from_timestamp(seconds, 0) {
        Some(ts) => Ok(Some(ts)),
        None => bail!("{SOURCE_DATE_EPOCH} is out of range: {raw}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_rooted_at_cwd() {
        let config = StudioConfig::resolve(Path::new("/studio"), env(&[]), &Default::default());
        assert_eq!(config.blueprints_dir, PathBuf::from("/studio/shared/blueprints"));
        assert_eq!(config.templates_dir, PathBuf::from("/studio/shared/templates"));
        assert_eq!(config.exports_dir, PathBuf::from("/studio/exports"));
        assert_eq!(config.assets_dir, PathBuf::from("/studio/zoo_reference"));
        assert_eq!(config.app_name, "CreatureStudio");
    }

    #[test]
    fn test_env_base_dir_and_specific_dirs() {
        let config = StudioConfig::resolve(
            Path::new("/work"),
            env(&[
                ("CREATURESTUDIO_BASE_DIR", "repo"),
                ("CREATURESTUDIO_EXPORTS_DIR", "/tmp/out"),
                ("CREATURESTUDIO_APP_NAME", "Zoo"),
            ]),
            &Default::default(),
        );
        assert_eq!(config.blueprints_dir, PathBuf::from("/work/repo/shared/blueprints"));
        assert_eq!(config.exports_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.app_name, "Zoo");
    }

    #[test]
    fn test_flags_beat_environment() {
        let overrides = ConfigOverrides {
            base_dir: Some(PathBuf::from("/flag")),
            exports_dir: Some(PathBuf::from("bundles")),
        };
        let config = StudioConfig::resolve(
            Path::new("/work"),
            env(&[
                ("CREATURESTUDIO_BASE_DIR", "/env"),
                ("CREATURESTUDIO_EXPORTS_DIR", "/env/out"),
            ]),
            &overrides,
        );
        assert_eq!(config.templates_dir, PathBuf::from("/flag/shared/templates"));
        assert_eq!(config.exports_dir, PathBuf::from("/work/bundles"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let config = StudioConfig::resolve(
            Path::new("/studio"),
            env(&[("CREATURESTUDIO_BASE_DIR", "  ")]),
            &Default::default(),
        );
        assert_eq!(config.exports_dir, PathBuf::from("/studio/exports"));
    }

    #[test]
    fn test_source_date_epoch() {
        assert_eq!(source_date_epoch(None).unwrap(), None);
        assert_eq!(source_date_epoch(Some("")).unwrap(), None);
        let ts = source_date_epoch(Some("1700000000")).unwrap().unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert!(source_date_epoch(Some("yesterday")).is_err());
    }

    #[test]
    fn test_export_config_carries_dirs() {
        let config = StudioConfig::rooted_at(Path::new("/studio"));
        let export = config.export_config_at(None);
        assert_eq!(export.export_root, PathBuf::from("/studio/exports"));
        assert_eq!(export.assets_root, Some(PathBuf::from("/studio/zoo_reference")));
        assert_eq!(export.timestamp, None);
    }
}
