use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::TypegenError;
use crate::render::{self, TemplatesPayload, VersionStrategy};
use crate::scanner;

pub const SINGLE_FILE_NAME: &str = "generated-types.ts";
pub const INDEX_FILE_NAME: &str = "index.ts";

/// Uppercases the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
  /// `index.ts` in split mode, the single declaration file otherwise.
  pub final_output_path: PathBuf,
  pub output_dir: PathBuf,
}

/// Resolves where `generate` writes. An explicit split-mode output is a
/// directory; an explicit single-file output without an extension is treated
/// as a directory holding `generated-types.ts`.
pub fn resolve_output_paths(output: Option<&Path>, single_file: bool, default_dir: &Path) -> OutputPaths {
  match output {
    Some(path) if single_file => {
      let final_output_path = if path.extension().is_none() {
        path.join(SINGLE_FILE_NAME)
      } else {
        path.to_path_buf()
      };
      let output_dir = final_output_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
      OutputPaths {
        final_output_path,
        output_dir,
      }
    }
    Some(path) => OutputPaths {
      final_output_path: path.join(INDEX_FILE_NAME),
      output_dir: path.to_path_buf(),
    },
    None => OutputPaths {
      final_output_path: default_dir.join(if single_file { SINGLE_FILE_NAME } else { INDEX_FILE_NAME }),
      output_dir: default_dir.to_path_buf(),
    },
  }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeAnalysis {
  pub interface_count: usize,
  pub type_names: Vec<String>,
}

/// Counts exported interfaces and collects exported type alias names. Only
/// declaration headers at the start of a line count.
pub fn analyze_types(content: &str) -> TypeAnalysis {
  let mut analysis = TypeAnalysis::default();
  for line in scanner::blob_lines(content) {
    let Some(name) = scanner::header_name(line) else {
      continue;
    };
    if line.starts_with("export interface ") {
      analysis.interface_count += 1;
    } else {
      analysis.type_names.push(name.to_string());
    }
  }
  analysis
}

/// Reads a local input file and turns it into a declaration blob.
/// A JSON object with `typeScript` yields that string, one with `templates`
/// is rendered, anything else is used verbatim.
pub fn load_input(path: &Path, strategy: VersionStrategy) -> Result<String, TypegenError> {
  let content = fs::read_to_string(path).map_err(|e| TypegenError::InputReadError {
    path: path.to_path_buf(),
    source: e,
  })?;
  blob_from_input(&content, strategy)
}

/// The blob for commands working on every template: the local input when
/// given, the API otherwise.
pub fn load_blob(input: Option<&Path>, api_root: &str, strategy: VersionStrategy) -> Result<String, TypegenError> {
  match input {
    Some(path) => {
      info!("Reading templates from {}", path.display());
      load_input(path, strategy)
    }
    None => ApiClient::new(api_root)?.fetch_all_templates(),
  }
}

pub fn blob_from_input(content: &str, strategy: VersionStrategy) -> Result<String, TypegenError> {
  let Ok(value) = serde_json::from_str::<Value>(content) else {
    debug!("Input is not JSON, treating it as a declaration blob");
    return Ok(content.to_string());
  };

  if let Some(blob) = value.get("typeScript").and_then(Value::as_str) {
    debug!("Input carries a typeScript field");
    return Ok(blob.to_string());
  }

  if value.get("templates").is_some() {
    let payload: TemplatesPayload = serde_json::from_value(value)?;
    info!("Rendering {} template records from input", payload.templates.len());
    return Ok(render::render_blob(&payload, strategy, Utc::now()));
  }

  warn!("Input JSON has neither 'typeScript' nor 'templates', using it verbatim");
  Ok(content.to_string())
}

pub fn ensure_dir(path: &Path) -> Result<(), TypegenError> {
  if path.as_os_str().is_empty() || path.is_dir() {
    return Ok(());
  }
  fs::create_dir_all(path).map_err(|e| TypegenError::OutputDirCreation {
    path: path.to_path_buf(),
    source: e,
  })?;
  debug!("Created directory: {}", path.display());
  Ok(())
}

/// Writes `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<(), TypegenError> {
  if let Some(parent) = path.parent() {
    ensure_dir(parent)?;
  }
  fs::write(path, content).map_err(|e| TypegenError::OutputWrite {
    path: path.to_path_buf(),
    source: e,
  })
}

/// Writes every split module plus the index, returning the total bytes written.
pub fn write_split_files(
  output_dir: &Path,
  files: &IndexMap<String, String>,
  index_content: &str,
) -> Result<usize, TypegenError> {
  ensure_dir(output_dir)?;

  let pb = ProgressBar::new(files.len() as u64 + 1);
  pb.set_style(
    ProgressStyle::default_bar()
      .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
      .expect("valid progress template")
      .progress_chars("#>-"),
  );
  pb.set_message("Writing type files...");

  let mut total_bytes = 0;
  for (file_name, content) in files {
    let path = output_dir.join(file_name);
    write_file(&path, content)?;
    debug!("Wrote {}", path.display());
    total_bytes += content.len();
    pb.inc(1);
  }

  write_file(&output_dir.join(INDEX_FILE_NAME), index_content)?;
  total_bytes += index_content.len();
  pb.inc(1);
  pb.finish_with_message("Type files written.");

  Ok(total_bytes)
}

pub fn size_in_kb(bytes: usize) -> String {
  format!("{:.2}", bytes as f64 / 1024.0)
}

/// Asks before replacing an existing file. Returns `true` when the caller may write.
pub fn confirm_overwrite(path: &Path) -> Result<bool, TypegenError> {
  let answer = Confirm::with_theme(&ColorfulTheme::default())
    .with_prompt(format!("File {} already exists. Overwrite?", path.display()))
    .default(false)
    .interact()?;
  Ok(answer)
}
