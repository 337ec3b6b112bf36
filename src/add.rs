// src/add.rs
use crate::api::ApiClient;
use crate::cli::AddArgs;
use crate::config::{OipConfig, TemplateOverride};
use crate::error::TypegenError;
use crate::extract;
use crate::render::VersionStrategy;
use crate::scanner;
use crate::split::MODULE_EXTENSION;
use crate::utils;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub fn run_add(args: AddArgs, config: &OipConfig, cwd: &Path) -> Result<(), TypegenError> {
  info!("Adding template '{}'...", args.name);
  let overrides = template_overrides(config, &args.name);
  let force = args.force || overrides.force.unwrap_or(false);

  // --- 1. Fetch ---
  let blob = match args.input.as_deref() {
    Some(path) => utils::load_input(path, VersionStrategy::LatestOnly)?,
    None => ApiClient::new(&config.api_root)?.fetch_template(&args.name)?,
  };

  // --- 2. Extract ---
  let content = extract_template(&blob, &args.name)?;

  // --- 3. Write ---
  let output_path = resolve_add_path(&args.name, &overrides, config, cwd);
  debug!("Output path for '{}': {}", args.name, output_path.display());
  if output_path.exists() && !force && !utils::confirm_overwrite(&output_path)? {
    info!("Operation cancelled.");
    return Ok(());
  }
  utils::write_file(&output_path, &content)?;

  info!("Template schema added successfully!");
  info!("Output: {}", output_path.display());
  Ok(())
}

/// Extracts the declaration named after `template_name` (first character
/// uppercased) together with its direct dependencies.
pub fn extract_template(blob: &str, template_name: &str) -> Result<String, TypegenError> {
  let target = utils::capitalize_first(template_name);
  let lines = scanner::blob_lines(blob);
  if scanner::find_declaration(&lines, &target).is_none() {
    return Err(TypegenError::TemplateNotFound(template_name.to_string()));
  }
  extract::extract_one(blob, &target).ok_or_else(|| TypegenError::ExtractionFailed(template_name.to_string()))
}

/// Overrides are keyed either by the name as typed or by its capitalised
/// type name (`audio` finds `Audio`).
pub fn template_overrides(config: &OipConfig, template_name: &str) -> TemplateOverride {
  config
    .templates
    .get(template_name)
    .or_else(|| config.templates.get(&utils::capitalize_first(template_name)))
    .cloned()
    .unwrap_or_default()
}

/// A configured `outputPath` wins (relative paths are taken from `cwd`);
/// otherwise the file lands at `<outputDir>/<name>.ts`.
pub fn resolve_add_path(name: &str, overrides: &TemplateOverride, config: &OipConfig, cwd: &Path) -> PathBuf {
  match &overrides.output_path {
    Some(path) => cwd.join(path),
    None => cwd
      .join(&config.output_dir)
      .join(format!("{}.{}", name, MODULE_EXTENSION)),
  }
}
