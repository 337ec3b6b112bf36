// src/scanner.rs
//! Line-oriented scanning of generated declaration text.
//!
//! There is no real parser here. A declaration starts at a line beginning with
//! `export interface <Name>` or `export type <Name>` and ends either when the
//! brace balance returns to zero (interfaces and object-shaped aliases) or at
//! the first line that is a bare `;` (multi-line union aliases).

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of banner lines at the top of every blob.
pub const HEADER_LINES: usize = 3;

static HEADER_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^export (?:type|interface) ([A-Za-z0-9_]+)").expect("valid header regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
  Interface,
  UnionAlias,
}

impl DeclarationKind {
  /// An assignment without an opening brace on the header line is a union alias.
  pub fn of_header(line: &str) -> Self {
    if line.contains('=') && !line.contains('{') {
      DeclarationKind::UnionAlias
    } else {
      DeclarationKind::Interface
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      DeclarationKind::Interface => "interface",
      DeclarationKind::UnionAlias => "union",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationBlock<'a> {
  pub name: &'a str,
  pub kind: DeclarationKind,
  pub lines: Vec<&'a str>,
  pub start_line: usize,
  pub end_line: usize,
}

impl DeclarationBlock<'_> {
  pub fn text(&self) -> String {
    self.lines.join("\n")
  }
}

/// Returns the declared name if `line` introduces a top-level declaration.
pub fn header_name(line: &str) -> Option<&str> {
  HEADER_RE
    .captures(line)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

/// Splits a blob into lines the same way for every consumer.
pub fn blob_lines(blob: &str) -> Vec<&str> {
  blob.split('\n').collect()
}

/// Where the scan currently is relative to a declaration body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
  SeekingHeader,
  InInterfaceBody { brace_balance: i64, opened: bool },
  InUnionBody,
}

impl ScanState {
  fn enter(kind: DeclarationKind) -> Self {
    match kind {
      DeclarationKind::Interface => ScanState::InInterfaceBody {
        brace_balance: 0,
        opened: false,
      },
      DeclarationKind::UnionAlias => ScanState::InUnionBody,
    }
  }

  /// Feeds one line of the current declaration (header included) and returns
  /// true when that line terminates it.
  fn consume(&mut self, line: &str, is_header: bool) -> bool {
    match self {
      ScanState::SeekingHeader => false,
      ScanState::InInterfaceBody {
        brace_balance,
        opened,
      } => {
        let open = line.matches('{').count() as i64;
        let close = line.matches('}').count() as i64;
        *brace_balance += open - close;
        *opened |= open > 0;
        if *opened && *brace_balance == 0 {
          *self = ScanState::SeekingHeader;
          true
        } else {
          false
        }
      }
      ScanState::InUnionBody => {
        if !is_header && line.trim() == ";" {
          *self = ScanState::SeekingHeader;
          true
        } else {
          false
        }
      }
    }
  }
}

/// Captures the declaration whose header sits at `start`, following only the
/// termination rule for its kind. Runs to end of input if it never terminates.
pub fn capture<'a>(lines: &[&'a str], start: usize) -> Option<DeclarationBlock<'a>> {
  let header = *lines.get(start)?;
  let name = header_name(header)?;
  let kind = DeclarationKind::of_header(header);
  let mut state = ScanState::enter(kind);
  let mut end = start;

  for (offset, line) in lines[start..].iter().enumerate() {
    end = start + offset;
    if state.consume(line, offset == 0) {
      break;
    }
  }

  Some(DeclarationBlock {
    name,
    kind,
    lines: lines[start..=end].to_vec(),
    start_line: start,
    end_line: end,
  })
}

/// Finds the first declaration named exactly `name` and captures it.
pub fn find_declaration<'a>(lines: &[&'a str], name: &str) -> Option<DeclarationBlock<'a>> {
  lines
    .iter()
    .position(|line| header_name(line) == Some(name))
    .and_then(|idx| capture(lines, idx))
}

#[derive(Debug, Default)]
pub struct ScanResult<'a> {
  pub blocks: Vec<DeclarationBlock<'a>>,
  /// Every declared name in discovery order (repeats included).
  pub all_exports: Vec<&'a str>,
}

/// Forward pass over `lines[start_index..]`. A new header closes any block
/// still open; a block left open at end of input keeps what it collected.
pub fn scan<'a>(lines: &[&'a str], start_index: usize) -> ScanResult<'a> {
  let mut result = ScanResult::default();
  let mut state = ScanState::SeekingHeader;
  let mut open: Option<DeclarationBlock<'a>> = None;

  for (idx, &line) in lines.iter().enumerate().skip(start_index) {
    if let Some(name) = header_name(line) {
      if let Some(block) = open.take() {
        log::trace!("'{}' interrupted by '{}' at line {}", block.name, name, idx);
        result.blocks.push(block);
      }
      result.all_exports.push(name);

      let kind = DeclarationKind::of_header(line);
      state = ScanState::enter(kind);
      let block = DeclarationBlock {
        name,
        kind,
        lines: vec![line],
        start_line: idx,
        end_line: idx,
      };
      if state.consume(line, true) {
        result.blocks.push(block);
      } else {
        open = Some(block);
      }
      continue;
    }

    if let Some(block) = open.as_mut() {
      block.lines.push(line);
      block.end_line = idx;
      if state.consume(line, false) {
        if let Some(done) = open.take() {
          result.blocks.push(done);
        }
      }
    }
  }

  if let Some(block) = open.take() {
    log::debug!(
      "Declaration '{}' reached end of input without terminating",
      block.name
    );
    result.blocks.push(block);
  }

  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lines(text: &str) -> Vec<&str> {
    blob_lines(text)
  }

  #[test]
  fn header_name_requires_line_start() {
    assert_eq!(header_name("export interface Foo {"), Some("Foo"));
    assert_eq!(header_name("export type Bar ="), Some("Bar"));
    assert_eq!(header_name("  export interface Foo {"), None);
    assert_eq!(header_name("// export interface Foo"), None);
  }

  #[test]
  fn kind_follows_assignment_and_brace() {
    assert_eq!(DeclarationKind::of_header("export type A ="), DeclarationKind::UnionAlias);
    assert_eq!(DeclarationKind::of_header("export type A = {"), DeclarationKind::Interface);
    assert_eq!(DeclarationKind::of_header("export interface A {"), DeclarationKind::Interface);
  }

  #[test]
  fn interface_ends_when_balance_returns_to_zero() {
    let text = "export interface Outer {\n  inner: {\n    x: string;\n  };\n  y: number;\n}\ntrailing";
    let block = capture(&lines(text), 0).unwrap();
    assert_eq!(block.kind, DeclarationKind::Interface);
    assert_eq!(block.end_line, 5);
    assert_eq!(block.lines.last(), Some(&"}"));
  }

  #[test]
  fn union_ends_at_bare_semicolon_despite_braces() {
    let text = "export type Choice =\n  | string\n  | {\n      a: string;\n    }\n;\nexport interface Next {\n}";
    let block = capture(&lines(text), 0).unwrap();
    assert_eq!(block.kind, DeclarationKind::UnionAlias);
    assert_eq!(block.end_line, 5);
  }

  #[test]
  fn single_line_interface_terminates_on_header() {
    let text = "export interface Empty {}\nexport interface Other {\n}";
    let block = capture(&lines(text), 0).unwrap();
    assert_eq!(block.lines, vec!["export interface Empty {}"]);
  }

  #[test]
  fn unterminated_capture_runs_to_end() {
    let text = "export interface Broken {\n  a: string;";
    let block = capture(&lines(text), 0).unwrap();
    assert_eq!(block.end_line, 1);
  }

  #[test]
  fn find_declaration_matches_exact_name() {
    let text = "export interface FooBar {\n}\nexport interface Foo {\n  a: string;\n}";
    let block = find_declaration(&lines(text), "Foo").unwrap();
    assert_eq!(block.start_line, 2);
    assert!(find_declaration(&lines(text), "Fo").is_none());
  }

  #[test]
  fn scan_skips_header_and_collects_exports() {
    let text = "// banner\n// generated\n\nexport interface A {\n  b: B;\n}\n\nexport type B =\n  | \"x\"\n;\n";
    let result = scan(&lines(text), HEADER_LINES);
    assert_eq!(result.all_exports, vec!["A", "B"]);
    assert_eq!(result.blocks.len(), 2);
    assert_eq!(result.blocks[0].start_line, 3);
    assert_eq!(result.blocks[0].end_line, 5);
    assert_eq!(result.blocks[1].kind, DeclarationKind::UnionAlias);
    assert_eq!(result.blocks[1].end_line, 9);
  }

  #[test]
  fn scan_closes_open_block_at_next_header() {
    let text = "h\nh\nh\nexport interface A {\n  x: string;\nexport interface B {\n}";
    let result = scan(&lines(text), HEADER_LINES);
    assert_eq!(result.blocks.len(), 2);
    assert_eq!(result.blocks[0].lines, vec!["export interface A {", "  x: string;"]);
    assert_eq!(result.blocks[1].name, "B");
  }
}
