//! Repair settings loader.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/settings.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/omni-repair/settings.yaml`
//!
//! Merge precedence is user over system. An explicit `--settings` file
//! replaces both and must exist.

use std::path::{Path, PathBuf};

use omni_io::{DEFAULT_MAX_FILE_SIZE, LineEnding};
use serde::{Deserialize, Serialize};

use crate::error::RepairError;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/settings.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "omni-repair/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

/// Default lines of context around a located symbol or line.
pub const DEFAULT_CONTEXT_WINDOW: usize = 0;
/// Default number of independent repair samples.
pub const DEFAULT_MAX_SAMPLES: usize = 1;
/// Default number of candidate files kept from the file listing.
pub const DEFAULT_TOP_N_FILES: usize = 3;
/// Default sampling temperature for localization prompts.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Default sampling temperature for repair prompts.
pub const DEFAULT_REPAIR_TEMPERATURE: f32 = 0.8;
/// Default response size limit.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Settings as written in YAML; every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepairSettings {
    /// `locate:` section.
    #[serde(default)]
    pub locate: LocateSettings,
    /// `repair:` section.
    #[serde(default)]
    pub repair: RepairStageSettings,
    /// `oracle:` section.
    #[serde(default)]
    pub oracle: OracleSettings,
}

/// Localization settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocateSettings {
    pub context_window: Option<usize>,
    pub top_n_files: Option<usize>,
    pub label_excerpts: Option<bool>,
    pub max_file_size: Option<u64>,
}

/// Suggestion and application settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepairStageSettings {
    pub max_samples: Option<usize>,
    pub hint_slack: Option<usize>,
    pub line_ending: Option<LineEnding>,
}

/// Sampling parameters passed to the oracle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OracleSettings {
    pub temperature: Option<f32>,
    pub repair_temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Effective configuration with every default filled in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepairConfig {
    /// Lines of context on each side of a location.
    pub context_window: usize,
    /// Candidate files kept from a file listing.
    pub top_n_files: usize,
    /// Frame named-symbol excerpts with a label in prompts.
    pub label_excerpts: bool,
    /// Read limit per file.
    pub max_file_size: u64,
    /// Independent repair samples requested from the oracle.
    pub max_samples: usize,
    /// Slack around a SEARCH line hint.
    pub hint_slack: usize,
    /// Line endings used when writing fixes back.
    pub line_ending: LineEnding,
    /// Temperature for localization prompts.
    pub temperature: f32,
    /// Temperature for repair prompts.
    pub repair_temperature: f32,
    /// Response size limit.
    pub max_tokens: u32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        RepairSettings::default().resolve()
    }
}

impl RepairSettings {
    /// Fill unset fields with defaults.
    #[must_use]
    pub fn resolve(&self) -> RepairConfig {
        RepairConfig {
            context_window: self.locate.context_window.unwrap_or(DEFAULT_CONTEXT_WINDOW),
            top_n_files: self.locate.top_n_files.unwrap_or(DEFAULT_TOP_N_FILES).max(1),
            label_excerpts: self.locate.label_excerpts.unwrap_or(true),
            max_file_size: self.locate.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            max_samples: self.repair.max_samples.unwrap_or(DEFAULT_MAX_SAMPLES).max(1),
            hint_slack: self
                .repair
                .hint_slack
                .unwrap_or(omni_edit::DEFAULT_HINT_SLACK),
            line_ending: self.repair.line_ending.unwrap_or_default(),
            temperature: self.oracle.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            repair_temperature: self
                .oracle
                .repair_temperature
                .unwrap_or(DEFAULT_REPAIR_TEMPERATURE),
            max_tokens: self.oracle.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    fn merge(self, overlay: Self) -> Self {
        Self {
            locate: self.locate.merge(overlay.locate),
            repair: self.repair.merge(overlay.repair),
            oracle: self.oracle.merge(overlay.oracle),
        }
    }
}

impl LocateSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            context_window: overlay.context_window.or(self.context_window),
            top_n_files: overlay.top_n_files.or(self.top_n_files),
            label_excerpts: overlay.label_excerpts.or(self.label_excerpts),
            max_file_size: overlay.max_file_size.or(self.max_file_size),
        }
    }
}

impl RepairStageSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            max_samples: overlay.max_samples.or(self.max_samples),
            hint_slack: overlay.hint_slack.or(self.hint_slack),
            line_ending: overlay.line_ending.or(self.line_ending),
        }
    }
}

impl OracleSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            temperature: overlay.temperature.or(self.temperature),
            repair_temperature: overlay.repair_temperature.or(self.repair_temperature),
            max_tokens: overlay.max_tokens.or(self.max_tokens),
        }
    }
}

/// Load merged settings (user overrides system).
#[must_use]
pub fn load_settings() -> RepairSettings {
    let (system_path, user_path) = settings_paths();
    load_settings_from_paths(&system_path, &user_path)
}

#[doc(hidden)]
#[must_use]
pub fn settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

#[doc(hidden)]
#[must_use]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> RepairSettings {
    load_one(system).merge(load_one(user))
}

/// Load one settings file that the caller asked for explicitly.
///
/// # Errors
/// `RepairError::Settings` when the file is missing or not valid YAML.
pub fn load_settings_file(path: &Path) -> Result<RepairSettings, RepairError> {
    let raw = std::fs::read_to_string(path).map_err(|e| RepairError::Settings {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    serde_yaml::from_str(&raw).map_err(|e| RepairError::Settings {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

fn load_one(path: &Path) -> RepairSettings {
    if !path.exists() {
        return RepairSettings::default();
    }
    match load_settings_file(path) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to load settings file; ignoring"
            );
            RepairSettings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    let path = PathBuf::from(configured);
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RepairConfig::default();
        assert_eq!(config.context_window, 0);
        assert_eq!(config.top_n_files, 3);
        assert_eq!(config.max_samples, 1);
        assert_eq!(config.hint_slack, 2);
        assert!(config.label_excerpts);
        assert_eq!(config.line_ending, LineEnding::Preserve);
        assert_eq!(config.max_tokens, 4096);
    }

    #[test]
    fn test_partial_yaml() {
        let settings: RepairSettings =
            serde_yaml::from_str("repair:\n  line_ending: crlf\noracle:\n  temperature: 0.3\n")
                .unwrap();
        let config = settings.resolve();
        assert_eq!(config.line_ending, LineEnding::Crlf);
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert!((config.repair_temperature - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_samples_clamped() {
        let settings: RepairSettings =
            serde_yaml::from_str("repair:\n  max_samples: 0\n").unwrap();
        assert_eq!(settings.resolve().max_samples, 1);
    }
}
