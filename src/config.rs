// src/config.rs
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_ROOT;
use crate::error::TypegenError;

/// Files looked up in the working directory, in order.
pub const CONFIG_FILENAMES: [&str; 5] = [
  "oip.config.json",
  "oip.config.yaml",
  ".oiprc",
  ".oiprc.json",
  ".oiprc.yaml",
];

pub const SAMPLE_CONFIG_FILENAME: &str = "oip.config.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct OipConfig {
  #[serde(default = "default_api_root")]
  pub api_root: String,
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,
  #[serde(default)]
  pub default_single_file: bool,
  /// Per-template overrides used by `add`.
  #[serde(default)]
  pub templates: HashMap<String, TemplateOverride>,
  #[serde(default)]
  pub jsdoc: JsDocConfig,
}

fn default_api_root() -> String {
  DEFAULT_API_ROOT.to_string()
}
fn default_output_dir() -> PathBuf {
  PathBuf::from("oip")
}

impl Default for OipConfig {
  fn default() -> Self {
    OipConfig {
      api_root: default_api_root(),
      output_dir: default_output_dir(),
      default_single_file: false,
      templates: HashMap::new(),
      jsdoc: JsDocConfig::default(),
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOverride {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_path: Option<PathBuf>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub force: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct JsDocConfig {
  #[serde(default = "default_true")]
  pub include_examples: bool,
  #[serde(default = "default_true")]
  pub include_authors: bool,
  #[serde(default = "default_true")]
  pub include_version: bool,
  #[serde(default)]
  pub custom_tags: BTreeMap<String, String>,
}

fn default_true() -> bool {
  true
}

impl Default for JsDocConfig {
  fn default() -> Self {
    JsDocConfig {
      include_examples: true,
      include_authors: true,
      include_version: true,
      custom_tags: BTreeMap::new(),
    }
  }
}

/// Resolves the configuration.
/// Order of preference:
/// 1. --config argument (or OIP_CONFIG); failures are errors
/// 2. a known config file in `cwd`
/// 3. a known config file in the user config directory
/// 4. built-in defaults
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<OipConfig, TypegenError> {
  if let Some(path) = explicit {
    info!("Loading configuration from {}", path.display());
    return read_config_file(path);
  }

  let Some(path) = find_config_file(cwd).or_else(user_config_file) else {
    debug!("No config file found, using defaults");
    return Ok(OipConfig::default());
  };

  match read_config_file(&path) {
    Ok(config) => {
      info!("Loaded configuration from {}", path.display());
      Ok(config)
    }
    Err(e) => {
      warn!("Failed to load config file {}: {}", path.display(), e);
      warn!("Using default configuration");
      Ok(OipConfig::default())
    }
  }
}

pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
  CONFIG_FILENAMES
    .iter()
    .map(|name| dir.join(name))
    .find(|path| path.is_file())
}

fn user_config_file() -> Option<PathBuf> {
  let dirs = ProjectDirs::from("onl", "oip", "oiptypes")?;
  find_config_file(dirs.config_dir())
}

pub fn read_config_file(path: &Path) -> Result<OipConfig, TypegenError> {
  let content = fs::read_to_string(path).map_err(|e| TypegenError::ConfigReadError {
    path: path.to_path_buf(),
    source: e,
  })?;
  if is_yaml(path) {
    serde_yaml::from_str(&content).map_err(|e| TypegenError::config_parse(path, e))
  } else {
    serde_json::from_str(&content).map_err(|e| TypegenError::config_parse(path, e))
  }
}

fn is_yaml(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .map_or(false, |ext| ext == "yaml" || ext == "yml")
}

pub fn sample_config() -> OipConfig {
  let mut templates = HashMap::new();
  templates.insert(
    "Audio".to_string(),
    TemplateOverride {
      output_path: Some(PathBuf::from("types/audio.ts")),
      force: None,
    },
  );
  templates.insert(
    "Video".to_string(),
    TemplateOverride {
      output_path: Some(PathBuf::from("types/video.ts")),
      force: Some(true),
    },
  );
  OipConfig {
    templates,
    ..OipConfig::default()
  }
}

/// Writes the sample configuration to `path`, refusing to clobber an existing
/// file unless `force` is set.
pub fn write_sample_config(path: &Path, force: bool) -> Result<(), TypegenError> {
  if path.exists() && !force {
    return Err(TypegenError::ConfigExists(path.to_path_buf()));
  }
  let content = serde_json::to_string_pretty(&sample_config())?;
  fs::write(path, content).map_err(|e| TypegenError::OutputWrite {
    path: path.to_path_buf(),
    source: e,
  })?;
  info!("Sample config created: {}", path.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn partial_json_config_is_merged_with_defaults() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join("oip.config.json"),
      r#"{ "outputDir": "types/oip", "templates": { "Post": { "force": true } } }"#,
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config.api_root, DEFAULT_API_ROOT);
    assert_eq!(config.output_dir, PathBuf::from("types/oip"));
    assert!(!config.default_single_file);
    assert_eq!(config.templates["Post"].force, Some(true));
    assert!(config.jsdoc.include_examples);
  }

  #[test]
  fn yaml_config_is_supported() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join("oip.config.yaml"),
      "defaultSingleFile: true\njsdoc:\n  includeAuthors: false\n  customTags:\n    since: \"2024\"\n",
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert!(config.default_single_file);
    assert!(!config.jsdoc.include_authors);
    assert_eq!(config.jsdoc.custom_tags["since"], "2024");
  }

  #[test]
  fn broken_discovered_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".oiprc"), "{ not json").unwrap();
    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config, OipConfig::default());
  }

  #[test]
  fn broken_explicit_config_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
      load_config(Some(&path), dir.path()),
      Err(TypegenError::ConfigParseError { .. })
    ));
  }

  #[test]
  fn sample_config_round_trips_and_respects_force() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SAMPLE_CONFIG_FILENAME);
    write_sample_config(&path, false).unwrap();
    assert_eq!(read_config_file(&path).unwrap(), sample_config());

    assert!(matches!(
      write_sample_config(&path, false),
      Err(TypegenError::ConfigExists(_))
    ));
    assert!(write_sample_config(&path, true).is_ok());
  }
}
