//! `package.json` of the generated VitePress project.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ConfigError;

pub const VITEPRESS_PACKAGE: &str = "vitepress";
pub const VITEPRESS_VERSION: &str = "^1.0.0";

/// Minimal npm manifest able to run VitePress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
  pub name:             String,
  pub version:          String,
  pub description:      String,
  #[serde(rename = "type")]
  pub module_type:      String,
  pub scripts:          IndexMap<String, String>,
  pub dev_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
  /// Manifest with the `docs:*` scripts and VitePress as the only
  /// dependency.
  #[must_use]
  pub fn new(description: &str) -> Self {
    let scripts = [
      ("docs:dev", "vitepress dev docs"),
      ("docs:build", "vitepress build docs"),
      ("docs:preview", "vitepress preview docs"),
    ]
    .into_iter()
    .map(|(name, command)| (name.to_string(), command.to_string()))
    .collect();

    let mut dev_dependencies = IndexMap::new();
    dev_dependencies
      .insert(VITEPRESS_PACKAGE.to_string(), VITEPRESS_VERSION.to_string());

    Self {
      name: "vitepress-docs".to_string(),
      version: "1.0.0".to_string(),
      description: description.to_string(),
      module_type: "module".to_string(),
      scripts,
      dev_dependencies,
    }
  }

  /// Add development dependencies; existing names are overwritten.
  pub fn add_dev_dependencies(
    &mut self,
    dependencies: impl IntoIterator<Item = (String, String)>,
  ) {
    self.dev_dependencies.extend(dependencies);
  }

  /// Pretty-printed JSON with a trailing newline.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails.
  pub fn to_json(&self) -> Result<String, ConfigError> {
    let mut json = serde_json::to_string_pretty(self)?;
    json.push('\n');
    Ok(json)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_manifest_json() {
    let mut manifest = PackageManifest::new("A book");
    manifest.add_dev_dependencies([(
      "markdown-it-mathjax3".to_string(),
      "^4.3.2".to_string(),
    )]);

    let json = manifest.to_json().expect("serialize");
    let value: serde_json::Value =
      serde_json::from_str(&json).expect("valid json");

    assert_eq!(value["type"], "module");
    assert_eq!(value["scripts"]["docs:build"], "vitepress build docs");
    assert_eq!(value["devDependencies"]["vitepress"], "^1.0.0");
    assert_eq!(value["devDependencies"]["markdown-it-mathjax3"], "^4.3.2");
    assert!(json.starts_with("{\n  \"name\": \"vitepress-docs\",\n"));
    assert!(json.ends_with("}\n"));
  }
}
