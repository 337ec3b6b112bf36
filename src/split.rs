// src/split.rs
use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::scanner::{self, DeclarationBlock, HEADER_LINES};

/// Extension used for every generated module.
pub const MODULE_EXTENSION: &str = "ts";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
  /// `"<Name>.ts"` to file content, in declaration order.
  pub files: IndexMap<String, String>,
  pub index_content: String,
}

pub fn module_file_name(name: &str) -> String {
  format!("{}.{}", name, MODULE_EXTENSION)
}

pub fn import_line(name: &str) -> String {
  format!("import type {{ {0} }} from './{0}';", name)
}

pub fn reexport_line(name: &str) -> String {
  format!("export * from './{}';", name)
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Import statements for every other export referenced as a whole word in
/// `block_content`, in export order.
pub fn find_required_imports(block_content: &str, all_exports: &[&str], current_name: &str) -> Vec<String> {
  let words: HashSet<&str> = WORD_RE.find_iter(block_content).map(|m| m.as_str()).collect();
  all_exports
    .iter()
    .filter(|name| **name != current_name && words.contains(*name))
    .map(|name| import_line(name))
    .collect()
}

/// Breaks a blob into one module per declaration plus an index re-exporting
/// all of them. Each module carries the blob banner and its own imports.
pub fn split_all(blob: &str) -> SplitResult {
  let lines = scanner::blob_lines(blob);
  let header_end = lines.len().min(HEADER_LINES);
  let header = format!("{}\n\n", lines[..header_end].join("\n"));

  let scan = scanner::scan(&lines, HEADER_LINES);
  let all_exports: Vec<&str> = scan
    .all_exports
    .iter()
    .copied()
    .collect::<IndexSet<&str>>()
    .into_iter()
    .collect();
  debug!("Splitting {} declarations", all_exports.len());

  let mut result = SplitResult::default();
  let mut exported: Vec<&str> = Vec::new();
  for block in &scan.blocks {
    let file_name = module_file_name(block.name);
    if result.files.contains_key(&file_name) {
      warn!(
        "Duplicate declaration '{}' at line {} ignored; keeping the first one",
        block.name, block.start_line
      );
      continue;
    }
    result
      .files
      .insert(file_name, render_module(&header, block, &all_exports));
    exported.push(block.name);
  }

  let reexports: Vec<String> = exported.iter().map(|name| reexport_line(name)).collect();
  result.index_content = format!("{}{}\n", header, reexports.join("\n"));
  result
}

fn render_module(header: &str, block: &DeclarationBlock<'_>, all_exports: &[&str]) -> String {
  let body = block.text();
  let imports = find_required_imports(&body, all_exports, block.name);
  let mut content = String::from(header);
  if !imports.is_empty() {
    content.push_str(&imports.join("\n"));
    content.push_str("\n\n");
  }
  content.push_str(&body);
  content.push('\n');
  content
}
