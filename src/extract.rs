// src/extract.rs
use indexmap::IndexSet;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::scanner::{self, HEADER_LINES};

/// Names never treated as references to another declaration.
pub const PRIMITIVE_TYPES: [&str; 4] = ["string", "number", "boolean", "unknown"];

// Suffix vocabulary, type annotations, union members. Deliberately loose.
static DEPENDENCY_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
  [
    Regex::new(r"\b([A-Z][A-Za-z0-9]*(?:Code|Template|Reference))\b"),
    Regex::new(r":\s*([A-Z][A-Za-z0-9]+)(?:\s*[;\]}]|\s*\|)"),
    Regex::new(r"\|\s*([A-Z][A-Za-z0-9]+)(?:\s*[;\]}]|\s*\|)"),
  ]
  .map(|re| re.expect("valid dependency regex"))
});

/// Adds every type name referenced on `line` to `dependencies`, skipping
/// `exclude` and the primitive names.
pub fn find_dependencies_in_line(line: &str, dependencies: &mut IndexSet<String>, exclude: &str) {
  for pattern in DEPENDENCY_PATTERNS.iter() {
    for caps in pattern.captures_iter(line) {
      let Some(name) = caps.get(1).map(|m| m.as_str()) else {
        continue;
      };
      if name != exclude && !PRIMITIVE_TYPES.contains(&name) {
        dependencies.insert(name.to_string());
      }
    }
  }
}

/// Returns `target_name` together with the declarations its body references,
/// prefixed with the blob's banner. Only direct references are expanded.
///
/// `None` means the declaration does not exist in `blob`.
pub fn extract_one(blob: &str, target_name: &str) -> Option<String> {
  let lines = scanner::blob_lines(blob);
  let target = scanner::find_declaration(&lines, target_name)?;
  if target.lines.is_empty() {
    return None;
  }
  debug!(
    "Found '{}' ({}) at lines {}..={}",
    target_name,
    target.kind.label(),
    target.start_line,
    target.end_line
  );

  let mut dependencies = IndexSet::new();
  for line in &target.lines {
    find_dependencies_in_line(line, &mut dependencies, target_name);
  }
  trace!("Dependencies of '{}': {:?}", target_name, dependencies);

  let mut emitted: Vec<String> = Vec::new();
  for dependency in &dependencies {
    let Some(block) = scanner::find_declaration(&lines, dependency) else {
      debug!("Dependency '{}' is not declared in the blob, skipping", dependency);
      continue;
    };
    let text = block.text();
    // Names are unique and headers carry the name, so bodies cannot repeat; compared anyway.
    if emitted.contains(&text) {
      trace!("Dependency '{}' duplicates an emitted body, skipping", dependency);
      continue;
    }
    emitted.push(text);
  }

  let header_end = lines.len().min(HEADER_LINES);
  let mut parts: Vec<&str> = lines[..header_end].to_vec();
  parts.push("");
  for text in &emitted {
    parts.push(text);
    parts.push("");
  }
  parts.extend(target.lines.iter().copied());

  Some(parts.join("\n"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  const HEADER: &str = "// Auto-generated TypeScript types from OIP Arweave templates\n// Generated on 2024-01-01T00:00:00.000Z\n";

  fn deps(line: &str, exclude: &str) -> Vec<String> {
    let mut set = IndexSet::new();
    find_dependencies_in_line(line, &mut set, exclude);
    set.into_iter().collect()
  }

  #[test]
  fn extracts_target_with_direct_dependency() {
    let blob = format!(
      "{}\nexport interface Foo {{\n  bar: Baz;\n}}\n\nexport interface Baz {{\n  x: string;\n}}\n",
      HEADER
    );
    let out = extract_one(&blob, "Foo").unwrap();
    let expected = format!(
      "{}\n\nexport interface Baz {{\n  x: string;\n}}\n\nexport interface Foo {{\n  bar: Baz;\n}}",
      HEADER
    );
    assert_eq!(out, expected);
  }

  #[test]
  fn missing_target_is_none() {
    let blob = format!("{}\nexport interface Foo {{\n}}\n", HEADER);
    assert_eq!(extract_one(&blob, "Missing"), None);
  }

  #[test]
  fn closure_stops_at_depth_one() {
    let blob = format!(
      "{}\nexport interface Alpha {{\n  beta: Beta;\n}}\n\nexport interface Beta {{\n  gamma: Gamma;\n}}\n\nexport interface Gamma {{\n  value: string;\n}}\n",
      HEADER
    );
    let out = extract_one(&blob, "Alpha").unwrap();
    assert!(out.contains("export interface Alpha {"));
    assert!(out.contains("export interface Beta {"));
    assert!(!out.contains("export interface Gamma {"));
  }

  #[test]
  fn repeated_dependency_name_is_emitted_once() {
    let blob = format!(
      "{}\nexport interface Holder {{\n  a: Shared;\n  b: Shared;\n}}\n\nexport interface Shared {{\n  id: string;\n}}\n",
      HEADER
    );
    let out = extract_one(&blob, "Holder").unwrap();
    assert_eq!(out.matches("export interface Shared {").count(), 1);
  }

  #[test]
  fn unknown_references_are_skipped() {
    let blob = format!(
      "{}\nexport interface Post {{\n  author: CreatorReference;\n}}\n",
      HEADER
    );
    let out = extract_one(&blob, "Post").unwrap();
    assert_eq!(
      out,
      format!("{}\n\nexport interface Post {{\n  author: CreatorReference;\n}}", HEADER)
    );
  }

  #[test]
  fn union_alias_target_keeps_nested_braces() {
    let blob = format!(
      "{}\nexport type CreatorReference =\n  | string\n  | {{\n      didAddress: string;\n    }}\n;\n\nexport interface After {{\n}}\n",
      HEADER
    );
    let out = extract_one(&blob, "CreatorReference").unwrap();
    assert!(out.ends_with("    }\n;"));
    assert!(!out.contains("After"));
  }

  #[test]
  fn dependency_patterns_match_suffixes_annotations_and_unions() {
    assert_eq!(deps("  image: string | ImageTemplate;", "Post"), vec!["ImageTemplate"]);
    assert_eq!(deps("  kind: Kind;", "Post"), vec!["Kind"]);
    assert_eq!(deps("  | Circle |", "Shape"), vec!["Circle"]);
    assert_eq!(deps("  replyTo: PostTemplate;", "PostTemplate"), Vec::<String>::new());
    assert_eq!(deps("  name: string;", "Post"), Vec::<String>::new());
  }

  #[test]
  fn lowercase_references_are_not_detected() {
    // camelCase type names fall outside the heuristic
    assert!(deps("  meta: metaInfo;", "Post").is_empty());
  }
}
