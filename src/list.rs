// src/list.rs
use crate::cli::ListArgs;
use crate::config::OipConfig;
use crate::error::TypegenError;
use crate::render::VersionStrategy;
use crate::scanner::{self, DeclarationKind, HEADER_LINES};
use crate::utils;
use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSummary {
  pub name: String,
  pub kind: DeclarationKind,
  /// 1-based, inclusive.
  pub first_line: usize,
  pub last_line: usize,
}

pub fn run_list(args: ListArgs, config: &OipConfig) -> Result<(), TypegenError> {
  let blob = utils::load_blob(args.input.as_deref(), &config.api_root, VersionStrategy::LatestOnly)?;
  let declarations = summarize(&blob);

  println!("Declarations in template blob:");
  println!("{:<35} | {:<9} | {}", "Name", "Kind", "Lines");
  println!("{:-<35}-+-{:-<9}-+-{:-<15}", "", "", "");

  if declarations.is_empty() {
    warn!("No exported declarations found");
    return Ok(());
  }

  for declaration in &declarations {
    println!(
      "{:<35} | {:<9} | {}-{}",
      declaration.name,
      declaration.kind.label(),
      declaration.first_line,
      declaration.last_line
    );
  }
  println!("\nTotal: {} declarations", declarations.len());

  Ok(())
}

pub fn summarize(blob: &str) -> Vec<DeclarationSummary> {
  let lines = scanner::blob_lines(blob);
  scanner::scan(&lines, HEADER_LINES)
    .blocks
    .iter()
    .map(|block| DeclarationSummary {
      name: block.name.to_string(),
      kind: block.kind,
      first_line: block.start_line + 1,
      last_line: block.end_line + 1,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn summarizes_every_declaration() {
    let blob = "// a\n// b\n\nexport type Kind =\n  | \"x\"\n;\nexport interface Post {\n  kind: Kind;\n}\n";
    assert_eq!(
      summarize(blob),
      vec![
        DeclarationSummary {
          name: "Kind".to_string(),
          kind: DeclarationKind::UnionAlias,
          first_line: 4,
          last_line: 6,
        },
        DeclarationSummary {
          name: "Post".to_string(),
          kind: DeclarationKind::Interface,
          first_line: 7,
          last_line: 9,
        },
      ]
    );
  }

  #[test]
  fn blob_without_declarations_is_empty() {
    assert!(summarize("// a\n// b\n\nconst x = 1;\n").is_empty());
  }
}
