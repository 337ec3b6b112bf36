// src/generate.rs
use crate::cli::GenerateArgs;
use crate::config::OipConfig;
use crate::error::TypegenError;
use crate::jsdoc::{JsDocEnhancer, SchemaDocs};
use crate::render::VersionStrategy;
use crate::split;
use crate::utils::{self, OutputPaths};
use log::{debug, info};
use std::path::Path;

pub fn run_generate(args: GenerateArgs, config: &OipConfig, cwd: &Path) -> Result<(), TypegenError> {
  info!("Running generate command...");
  debug!("Args: {:?}", args);

  // --- 1. Load the declaration blob ---
  let strategy = if args.keep_versions {
    VersionStrategy::KeepAllVersions
  } else {
    VersionStrategy::LatestOnly
  };
  let blob = utils::load_blob(args.input.as_deref(), &config.api_root, strategy)?;

  // --- 2. Resolve output and documentation ---
  let single_file = args.single_file || config.default_single_file;
  let paths = utils::resolve_output_paths(
    args.output.as_deref(),
    single_file,
    &cwd.join(&config.output_dir),
  );
  debug!("Resolved output: {:?}", paths);

  let schema = args.schema_docs.as_deref().map(SchemaDocs::load).transpose()?;
  let enhancer = if args.no_jsdoc {
    info!("JSDoc enhancement disabled");
    None
  } else {
    Some(JsDocEnhancer::new(&config.jsdoc, schema.as_ref()))
  };

  // --- 3. Write ---
  if single_file {
    write_single_file(&blob, &paths, enhancer.as_ref())
  } else {
    write_split(&blob, &paths, enhancer.as_ref())
  }
}

fn write_single_file(
  blob: &str,
  paths: &OutputPaths,
  enhancer: Option<&JsDocEnhancer<'_>>,
) -> Result<(), TypegenError> {
  let content = match enhancer {
    Some(enhancer) => enhancer.enhance(blob),
    None => blob.to_string(),
  };
  utils::write_file(&paths.final_output_path, &content)?;

  let analysis = utils::analyze_types(&content);
  info!(
    "Generated {} interfaces and {} type aliases",
    analysis.interface_count,
    analysis.type_names.len()
  );
  info!(
    "Output: {} ({} KB)",
    paths.final_output_path.display(),
    utils::size_in_kb(content.len())
  );
  Ok(())
}

fn write_split(blob: &str, paths: &OutputPaths, enhancer: Option<&JsDocEnhancer<'_>>) -> Result<(), TypegenError> {
  let mut result = split::split_all(blob);
  if let Some(enhancer) = enhancer {
    for content in result.files.values_mut() {
      *content = enhancer.enhance(content);
    }
  }

  let bytes = utils::write_split_files(&paths.output_dir, &result.files, &result.index_content)?;
  info!(
    "Generated {} declaration files plus {}",
    result.files.len(),
    paths.final_output_path.display()
  );
  info!(
    "Output directory: {} ({} KB)",
    paths.output_dir.display(),
    utils::size_in_kb(bytes)
  );
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::path::PathBuf;
  use tempfile::tempdir;

  const BLOB: &str = "// Auto-generated TypeScript types from OIP Arweave templates\n// Generated on 2024-01-01T00:00:00.000Z\n\nexport interface Post {\n  title: string;\n  image?: ImageTemplate;\n}\n\nexport interface ImageTemplate {\n  width: number;\n}\n";

  fn args(input: PathBuf, output: PathBuf, single_file: bool, no_jsdoc: bool) -> GenerateArgs {
    GenerateArgs {
      output: Some(output),
      single_file,
      input: Some(input),
      keep_versions: false,
      no_jsdoc,
      schema_docs: None,
    }
  }

  #[test]
  fn split_generation_writes_modules_and_index() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("blob.ts");
    fs::write(&input, BLOB).unwrap();
    let out = dir.path().join("oip");

    run_generate(args(input, out.clone(), false, true), &OipConfig::default(), dir.path()).unwrap();

    let post = fs::read_to_string(out.join("Post.ts")).unwrap();
    assert!(post.contains("import type { ImageTemplate } from './ImageTemplate';"));
    assert!(out.join("ImageTemplate.ts").is_file());
    let index = fs::read_to_string(out.join("index.ts")).unwrap();
    assert!(index.ends_with("export * from './Post';\nexport * from './ImageTemplate';\n"));
  }

  #[test]
  fn split_generation_documents_each_module() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("blob.ts");
    fs::write(&input, BLOB).unwrap();
    let out = dir.path().join("oip");

    run_generate(args(input, out.clone(), false, false), &OipConfig::default(), dir.path()).unwrap();

    let post = fs::read_to_string(out.join("Post.ts")).unwrap();
    assert!(post.contains(" * Represents a social media or blog post with content and metadata"));
    assert!(post.contains("  /** The title or name (text) */"));
  }

  #[test]
  fn single_file_generation_uses_default_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("blob.json");
    fs::write(&input, serde_json::json!({ "typeScript": BLOB }).to_string()).unwrap();
    let out = dir.path().join("types");

    run_generate(args(input, out.clone(), true, true), &OipConfig::default(), dir.path()).unwrap();

    assert_eq!(fs::read_to_string(out.join("generated-types.ts")).unwrap(), BLOB);
  }
}
