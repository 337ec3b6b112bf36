// src/api.rs
use log::{debug, error, info};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::TypegenError;

pub const DEFAULT_API_ROOT: &str = "https://api.oip.onl/api/templates";

/// Body returned by the templates endpoint when TypeScript output is requested.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
  #[serde(default)]
  pub type_script: Option<String>,
}

impl TemplateResponse {
  pub fn into_blob(self) -> Result<String, TypegenError> {
    match self.type_script {
      Some(blob) if !blob.is_empty() => Ok(blob),
      _ => Err(TypegenError::MissingTypeScript),
    }
  }
}

pub struct ApiClient {
  base_url: String,
  client: Client,
}

impl ApiClient {
  pub fn new(base_url: &str) -> Result<Self, TypegenError> {
    let client = Client::builder()
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      client,
    })
  }

  fn request(&self, template_name: Option<&str>) -> RequestBuilder {
    let mut query = vec![("typeScriptTypes", "true")];
    if let Some(name) = template_name {
      query.push(("template", name));
    }
    self.client.get(&self.base_url).query(&query)
  }

  /// Fetches the declaration blob for every template.
  pub fn fetch_all_templates(&self) -> Result<String, TypegenError> {
    info!("Fetching templates from {}", self.base_url);
    let blob = self.get_blob(self.request(None)).map_err(|e| {
      error!("Failed to fetch templates from API: {}", e);
      e
    })?;
    info!("Successfully fetched templates");
    Ok(blob)
  }

  /// Fetches the declaration blob for one template. A 404 maps to
  /// `TemplateNotFound`.
  pub fn fetch_template(&self, template_name: &str) -> Result<String, TypegenError> {
    info!("Fetching schema for template: {}", template_name);
    match self.get_blob(self.request(Some(template_name))) {
      Err(TypegenError::HttpStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
        Err(TypegenError::TemplateNotFound(template_name.to_string()))
      }
      other => other,
    }
  }

  fn get_blob(&self, request: RequestBuilder) -> Result<String, TypegenError> {
    let response = request.send()?;
    let status = response.status();
    let url = response.url().to_string();
    debug!("GET {} -> {}", url, status);
    if !status.is_success() {
      return Err(TypegenError::HttpStatus { url, status });
    }
    let body: TemplateResponse = response.json()?;
    body.into_blob()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn requests_carry_query_and_encoded_template() {
    let client = ApiClient::new("https://example.test/api/templates/").unwrap();
    let all = client.request(None).build().unwrap();
    assert_eq!(
      all.url().as_str(),
      "https://example.test/api/templates?typeScriptTypes=true"
    );
    let one = client.request(Some("my post")).build().unwrap();
    assert_eq!(
      one.url().as_str(),
      "https://example.test/api/templates?typeScriptTypes=true&template=my+post"
    );
  }

  #[test]
  fn response_without_type_script_is_rejected() {
    let body: TemplateResponse = serde_json::from_str(r#"{"other": 1}"#).unwrap();
    assert!(matches!(body.into_blob(), Err(TypegenError::MissingTypeScript)));

    let body: TemplateResponse = serde_json::from_str(r#"{"typeScript": "export interface A {}"}"#).unwrap();
    assert_eq!(body.into_blob().unwrap(), "export interface A {}");
  }
}
