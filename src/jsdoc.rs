// src/jsdoc.rs
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use heck::ToTitleCase;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::config::JsDocConfig;
use crate::error::TypegenError;
use crate::scanner;

static INTERFACE_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^export interface (\w+)").expect("valid interface regex"));
static PROPERTY_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^(\s+)(\w+)(\??):\s*([^;]+);?").expect("valid property regex"));

static INTERFACE_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    ("Album", "Represents a music album with metadata information"),
    ("Artwork", "Represents an artwork piece with descriptive metadata"),
    ("Audio", "Represents an audio file with metadata and technical information"),
    ("Video", "Represents a video file with metadata and technical specifications"),
    ("Image", "Represents an image file with metadata and technical details"),
    ("Text", "Represents a text document with metadata and content information"),
    ("Basic", "Basic OIP template with fundamental metadata fields"),
    ("Person", "Represents a person entity with biographical information"),
    ("Podcast", "Represents a podcast episode with metadata and technical details"),
    ("PodcastShow", "Represents a podcast show with series-level metadata"),
    ("Recipe", "Represents a cooking recipe with ingredients and instructions"),
    ("Workout", "Represents a fitness workout with exercises and metadata"),
    ("Exercise", "Represents a single exercise with instructions and metadata"),
    ("Post", "Represents a social media or blog post with content and metadata"),
    ("NutritionalInfo", "Represents nutritional information for food items"),
    ("CreatorRegistration", "Represents creator registration information for OIP"),
  ])
});

static PROPERTY_DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    ("title", "The title or name"),
    ("name", "The name identifier"),
    ("description", "A detailed description"),
    ("artist", "The artist or creator name"),
    ("author", "The author or creator"),
    ("year", "The year of creation or publication"),
    ("date", "The date information"),
    ("type", "The type or category"),
    ("category", "The category classification"),
    ("tags", "Associated tags or keywords"),
    ("url", "The URL or web address"),
    ("duration", "The duration in seconds or specified units"),
    ("size", "The file size or dimensions"),
    ("format", "The file format or type"),
    ("version", "The version number or identifier"),
    ("id", "The unique identifier"),
    ("email", "The email address"),
    ("phone", "The phone number"),
    ("address", "The physical address"),
    ("price", "The price or cost"),
    ("currency", "The currency type"),
    ("language", "The language code or name"),
    ("country", "The country name or code"),
    ("license", "The license information"),
    ("copyright", "The copyright information"),
    ("thumbnail", "The thumbnail image URL or data"),
    ("preview", "The preview content or URL"),
  ])
});

static INTERFACE_EXAMPLES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
  HashMap::from([
    (
      "Album",
      "const album: Album = {\n  albumTitle: \"My Album\",\n  artist: \"Artist Name\",\n  year: 2024\n};",
    ),
    (
      "Audio",
      "const audio: Audio = {\n  title: \"My Song\",\n  artist: \"Artist Name\",\n  duration: 180\n};",
    ),
    (
      "Video",
      "const video: Video = {\n  title: \"My Video\",\n  duration: 300,\n  format: \"mp4\"\n};",
    ),
    (
      "Basic",
      "const basic: Basic = {\n  title: \"My Content\",\n  description: \"Content description\"\n};",
    ),
  ])
});

/// Per-template documentation, keyed by interface name.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SchemaDocs(pub HashMap<String, TemplateSchema>);

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TemplateSchema {
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub properties: HashMap<String, FieldSchema>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FieldSchema {
  #[serde(default)]
  pub description: Option<String>,
}

impl SchemaDocs {
  pub fn load(path: &Path) -> Result<Self, TypegenError> {
    let content = fs::read_to_string(path).map_err(|e| TypegenError::InputReadError {
      path: path.to_path_buf(),
      source: e,
    })?;
    let docs: SchemaDocs = serde_json::from_str(&content)?;
    info!("Loaded schema docs for {} templates", docs.0.len());
    Ok(docs)
  }

  fn field(&self, interface: &str, field: &str) -> Option<&FieldSchema> {
    self.0.get(interface)?.properties.get(field)
  }
}

pub struct JsDocEnhancer<'a> {
  options: &'a JsDocConfig,
  schema: Option<&'a SchemaDocs>,
}

impl<'a> JsDocEnhancer<'a> {
  pub fn new(options: &'a JsDocConfig, schema: Option<&'a SchemaDocs>) -> Self {
    Self { options, schema }
  }

  /// Inserts a doc block before every `export interface` and a one-line doc
  /// before every property inside it. Everything else passes through.
  pub fn enhance(&self, content: &str) -> String {
    let lines = scanner::blob_lines(content);
    let mut enhanced: Vec<String> = Vec::with_capacity(lines.len() * 2);
    let mut idx = 0;

    while idx < lines.len() {
      let line = lines[idx];
      let Some(name) = INTERFACE_RE.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str()) else {
        enhanced.push(line.to_string());
        idx += 1;
        continue;
      };
      let Some(block) = scanner::capture(&lines, idx) else {
        enhanced.push(line.to_string());
        idx += 1;
        continue;
      };

      enhanced.extend(self.interface_doc(name));
      for (offset, body_line) in block.lines.iter().enumerate() {
        if offset > 0 {
          if let Some(doc) = self.property_doc(body_line, name) {
            enhanced.push(doc);
          }
        }
        enhanced.push(body_line.to_string());
      }
      idx = block.end_line + 1;
    }

    debug!("JSDoc enhancement completed");
    enhanced.join("\n")
  }

  fn interface_doc(&self, name: &str) -> Vec<String> {
    let mut doc = vec!["/**".to_string(), format!(" * {}", self.interface_description(name))];

    if self.options.include_authors {
      doc.push(format!(" * @author {}", env!("CARGO_PKG_AUTHORS")));
    }
    if self.options.include_version {
      doc.push(format!(" * @version {}", env!("CARGO_PKG_VERSION")));
    }
    for (tag, value) in &self.options.custom_tags {
      doc.push(format!(" * @{} {}", tag, value));
    }
    if self.options.include_examples {
      if let Some(example) = INTERFACE_EXAMPLES.get(name) {
        doc.push(" * @example".to_string());
        doc.push(" * ```typescript".to_string());
        doc.extend(example.lines().map(|l| format!(" * {}", l)));
        doc.push(" * ```".to_string());
      }
    }

    doc.push(" */".to_string());
    doc
  }

  fn interface_description(&self, name: &str) -> String {
    if let Some(description) = self
      .schema
      .and_then(|s| s.0.get(name))
      .and_then(|t| t.description.as_ref())
    {
      return description.clone();
    }
    INTERFACE_DESCRIPTIONS
      .get(name)
      .map(|d| d.to_string())
      .unwrap_or_else(|| format!("Represents a {} entity from OIP Arweave templates", name))
  }

  fn property_doc(&self, line: &str, interface: &str) -> Option<String> {
    let caps = PROPERTY_RE.captures(line)?;
    let indent = caps.get(1).map_or("\t", |m| m.as_str());
    let property = caps.get(2)?.as_str();
    let optional = caps.get(3).map_or(false, |m| !m.as_str().is_empty());
    let property_type = caps.get(4)?.as_str();

    let description = self.property_description(property, property_type, optional, interface);
    Some(format!("{}/** {} */", indent, description))
  }

  fn property_description(&self, property: &str, property_type: &str, optional: bool, interface: &str) -> String {
    let from_schema = self
      .schema
      .and_then(|s| s.field(interface, property))
      .and_then(|f| f.description.clone());

    let mut description = match from_schema {
      Some(description) => description,
      None => {
        let mut description = PROPERTY_DESCRIPTIONS
          .get(property.to_lowercase().as_str())
          .map(|d| d.to_string())
          .unwrap_or_else(|| format!("The {}", property.to_title_case().to_lowercase()));
        let clean_type = property_type.split_whitespace().collect::<Vec<_>>().join(" ");
        if let Some(hint) = type_hint(&clean_type) {
          description.push_str(&format!(" ({})", hint));
        }
        description
      }
    };

    if optional {
      description.push_str(" - Optional field");
    }
    description
  }
}

fn type_hint(ts_type: &str) -> Option<&'static str> {
  if ts_type.contains("[]") {
    Some("array")
  } else if ts_type.contains('|') {
    Some("union type")
  } else {
    match ts_type {
      "string" => Some("text"),
      "number" => Some("numeric"),
      "boolean" => Some("true/false"),
      "Date" => Some("date object"),
      _ => None,
    }
  }
}
