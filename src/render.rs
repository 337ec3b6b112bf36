// src/render.rs
//! Renders declaration text directly from template field metadata.
//!
//! This is the offline path: a `templates` payload (as served by the OIP API
//! without `typeScriptTypes`) becomes a blob in the same shape the API would
//! return, so it can be split or extracted like any other blob.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use log::{debug, trace};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::capitalize_first;

pub const BANNER: &str = "// Auto-generated TypeScript types from OIP Arweave templates";

/// Shared declarations every rendered blob starts with.
pub const PRELUDE: &str = "export type CreatorReference =
  | string
  | {
      didAddress: string;
      creatorSig: string;
    }
;";

static TYPE_TAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    ("string", "string"),
    ("repeated string", "string[]"),
    ("number", "number"),
    ("integer", "number"),
    ("uint64", "number"),
    ("uint32", "number"),
    ("long", "number"),
    ("float", "number"),
    ("repeated float", "number[]"),
    ("repeated uint64", "number[]"),
    ("repeated uint32", "number[]"),
    ("boolean", "boolean"),
    ("bool", "boolean"),
    ("enum", "string"),
  ])
});

// Field name -> template a dref field points at.
static DREF_TARGETS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    ("articleText", "TextTemplate"),
    ("transcript", "TextTemplate"),
    ("chapters", "TextTemplate"),
    ("instructions", "TextTemplate"),
    ("featuredImage", "ImageTemplate"),
    ("avatar", "ImageTemplate"),
    ("podcastArtwork", "ImageTemplate"),
    ("thumbnails", "ImageTemplate"),
    ("episodeArtwork", "ImageTemplate"),
    ("audioItems", "AudioTemplate"),
    ("videoItems", "VideoTemplate"),
    ("imageItems", "ImageTemplate"),
    ("replyTo", "PostTemplate"),
    ("authorDRef", "CreatorRegistrationTemplate"),
    ("exercise", "ExerciseTemplate"),
  ])
});

const CREATOR_FIELDS: [&str; 1] = ["creator"];

#[derive(Debug, Deserialize, Clone)]
pub struct TemplatesPayload {
  pub templates: Vec<TemplateRecord>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplateRecord {
  pub data: TemplateData,
  #[serde(default)]
  pub oip: TemplateOip,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
  pub template: String,
  pub fields_in_template: BTreeMap<String, FieldDefinition>,
  /// Everything else, notably the `<field>Values` enum lists.
  #[serde(flatten)]
  pub extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
  #[serde(rename = "type")]
  pub field_type: String,
  pub index: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub required: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub enum_values: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOip {
  #[serde(default)]
  pub in_arweave_block: u64,
}

impl TemplateData {
  /// Structural identity of the template's fields.
  pub fn fingerprint(&self) -> String {
    serde_json::to_string(&self.fields_in_template).unwrap_or_default()
  }

  fn enum_values<'a>(&'a self, field_name: &str, field: &'a FieldDefinition) -> Option<&'a [Value]> {
    self
      .extra
      .get(&format!("{}Values", field_name))
      .and_then(Value::as_array)
      .map(Vec::as_slice)
      .or(field.enum_values.as_deref())
  }
}

/// How templates that share a name are turned into declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionStrategy {
  /// One declaration per template name; the highest block number wins.
  #[default]
  LatestOnly,
  /// Every distinct field shape is kept; later shapes get a `V<n>` suffix.
  KeepAllVersions,
}

#[derive(Debug)]
pub struct NamedTemplate<'a> {
  pub interface_name: String,
  pub data: &'a TemplateData,
}

pub fn interface_name(template_name: &str) -> String {
  format!("{}Template", capitalize_first(template_name))
}

impl VersionStrategy {
  pub fn select<'a>(&self, templates: &'a [TemplateRecord]) -> Vec<NamedTemplate<'a>> {
    match self {
      VersionStrategy::LatestOnly => latest_only(templates),
      VersionStrategy::KeepAllVersions => keep_all_versions(templates),
    }
  }
}

fn latest_only(templates: &[TemplateRecord]) -> Vec<NamedTemplate<'_>> {
  let mut latest: IndexMap<&str, &TemplateRecord> = IndexMap::new();
  for record in templates {
    let name = record.data.template.as_str();
    let newer = latest
      .get(name)
      .map_or(true, |existing| record.oip.in_arweave_block > existing.oip.in_arweave_block);
    if newer {
      latest.insert(name, record);
    } else {
      trace!("Skipping older '{}' (block {})", name, record.oip.in_arweave_block);
    }
  }
  latest
    .into_iter()
    .map(|(name, record)| NamedTemplate {
      interface_name: interface_name(name),
      data: &record.data,
    })
    .collect()
}

fn keep_all_versions(templates: &[TemplateRecord]) -> Vec<NamedTemplate<'_>> {
  let mut seen: HashSet<(&str, String)> = HashSet::new();
  let mut versions: HashMap<&str, usize> = HashMap::new();
  let mut selected = Vec::new();

  for record in templates {
    let name = record.data.template.as_str();
    if !seen.insert((name, record.data.fingerprint())) {
      trace!("Skipping exact duplicate of '{}'", name);
      continue;
    }
    let version = versions.entry(name).or_insert(0);
    *version += 1;
    let declared = match *version {
      1 => interface_name(name),
      n => format!("{}V{}", interface_name(name), n),
    };
    selected.push(NamedTemplate {
      interface_name: declared,
      data: &record.data,
    });
  }
  selected
}

/// Maps one field's type tag to its TypeScript type.
pub fn map_field_type(type_tag: &str, enum_values: Option<&[Value]>, field_name: &str) -> String {
  if CREATOR_FIELDS.contains(&field_name) && type_tag == "string" {
    return "CreatorReference".to_string();
  }

  if type_tag == "dref" || type_tag == "repeated dref" {
    let base = match DREF_TARGETS.get(field_name) {
      Some(target) => format!("string | {}", target),
      None => "string".to_string(),
    };
    return if type_tag == "repeated dref" {
      format!("({})[]", base)
    } else {
      base
    };
  }

  if let Some(values) = enum_values.filter(|values| !values.is_empty()) {
    return values
      .iter()
      .map(enum_literal)
      .collect::<Vec<_>>()
      .join(" | ");
  }

  TYPE_TAGS
    .get(type_tag)
    .copied()
    .unwrap_or("unknown")
    .to_string()
}

fn enum_literal(value: &Value) -> String {
  match value {
    Value::String(s) => format!("\"{}\"", s),
    Value::Object(map) => match map.get("code") {
      Some(Value::String(code)) => format!("\"{}\"", code),
      Some(code) if !code.is_null() => format!("\"{}\"", code),
      _ => format!("\"{}\"", value),
    },
    other => format!("\"{}\"", other),
  }
}

pub fn render_interface(interface_name: &str, data: &TemplateData) -> String {
  let mut fields: Vec<(&String, &FieldDefinition)> = data.fields_in_template.iter().collect();
  fields.sort_by_key(|(_, field)| field.index);

  let field_lines: Vec<String> = fields
    .into_iter()
    .map(|(name, field)| {
      let ts_type = map_field_type(&field.field_type, data.enum_values(name, field), name);
      let optional = if field.required == Some(false) { "?" } else { "" };
      format!("  {}{}: {};", name, optional, ts_type)
    })
    .collect();

  format!("export interface {} {{\n{}\n}}", interface_name, field_lines.join("\n"))
}

/// Renders a whole blob: 3-line banner, prelude, then one interface per
/// selected template.
pub fn render_blob(payload: &TemplatesPayload, strategy: VersionStrategy, generated_at: DateTime<Utc>) -> String {
  let selected = strategy.select(&payload.templates);
  debug!(
    "Rendering {} of {} templates ({:?})",
    selected.len(),
    payload.templates.len(),
    strategy
  );
  let interfaces: Vec<String> = selected
    .iter()
    .map(|named| render_interface(&named.interface_name, named.data))
    .collect();

  format!(
    "{}\n// Generated on {}\n\n{}\n\n{}\n",
    BANNER,
    generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    PRELUDE,
    interfaces.join("\n\n")
  )
}
