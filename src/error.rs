// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypegenError {
  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON Parsing Error: {0}")]
  JsonParse(#[from] serde_json::Error),

  #[error("HTTP Error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Request to '{url}' failed with status {status}")]
  HttpStatus {
    url: String,
    status: reqwest::StatusCode,
  },

  #[error("API response missing TypeScript content")]
  MissingTypeScript,

  #[error("Template '{0}' not found")]
  TemplateNotFound(String),

  #[error("Failed to extract content for template '{0}'")]
  ExtractionFailed(String),

  #[error("Could not read config file '{path}': {source}")]
  ConfigReadError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Could not parse config file '{path}': {reason}")]
  ConfigParseError { path: PathBuf, reason: String },

  #[error("Configuration file already exists: {0} (use --force to overwrite)")]
  ConfigExists(PathBuf),

  #[error("Could not read input file '{path}': {source}")]
  InputReadError {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to create output directory '{path}': {source}")]
  OutputDirCreation {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write '{path}': {source}")]
  OutputWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("User interaction failed: {0}")]
  DialoguerError(#[from] dialoguer::Error),
}

impl TypegenError {
  pub(crate) fn config_parse<E: std::fmt::Display>(path: &std::path::Path, error: E) -> Self {
    TypegenError::ConfigParseError {
      path: path.to_path_buf(),
      reason: error.to_string(),
    }
  }
}
