//! Core types shared by all markdown transformers.
//!
//! - [`Transformer`]: the whole-document rewrite capability
//! - [`DocumentContext`]: per-call information about the document
//! - [`TransformerMetadata`]: configuration and dependency requirements a
//!   transformer places on the generated VitePress project

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised by transformers.
///
/// Expected absence (a missing include target, an unknown anchor) is never an
/// error; it is reported inline in the converted document instead.
#[derive(Debug, Error)]
pub enum TransformError {
  #[error(
    "{transformer}: inlining includes requires the path of the document \
     being converted"
  )]
  MissingDocumentPath { transformer: &'static str },
}

/// Result type for transformer operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Information about the document passed through a transformer.
///
/// Holds no state between calls; every conversion builds its own context.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentContext<'a> {
  path: Option<&'a Path>,
}

impl<'a> DocumentContext<'a> {
  /// Context for a document read from `path`.
  #[must_use]
  pub const fn new(path: &'a Path) -> Self {
    Self { path: Some(path) }
  }

  /// Context for a document with no backing file, e.g. read from stdin.
  #[must_use]
  pub const fn detached() -> Self {
    Self { path: None }
  }

  /// Path of the document being converted, if known.
  #[must_use]
  pub const fn path(&self) -> Option<&'a Path> {
    self.path
  }

  /// Directory relative includes are resolved against.
  #[must_use]
  pub fn base_dir(&self) -> Option<&'a Path> {
    self
      .path
      .map(|path| path.parent().unwrap_or_else(|| Path::new(".")))
  }
}

/// A markdown rewriter from the mdBook dialect to the VitePress dialect.
///
/// Implementations are stateless: any scanning state lives inside a single
/// [`Transformer::transform`] call.
pub trait Transformer: Send + Sync {
  /// Stable identifier used for logging and pipeline introspection.
  fn name(&self) -> &'static str;

  /// Human readable summary of what the transformer rewrites.
  fn description(&self) -> &'static str;

  /// Rewrite a whole document.
  ///
  /// # Errors
  ///
  /// Returns an error only when the transformer cannot run at all in the
  /// given context.
  fn transform(
    &self,
    content: &str,
    ctx: &DocumentContext<'_>,
  ) -> TransformResult<String>;

  /// Configuration and dependencies the generated project needs for the
  /// transformed output to render.
  fn metadata(&self) -> TransformerMetadata {
    TransformerMetadata::default()
  }
}

/// Requirements a transformer places on the generated VitePress project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformerMetadata {
  /// Fragment merged into the VitePress `defineConfig` object.
  pub required_config: Map<String, Value>,

  /// Packages added to `devDependencies` in `package.json`.
  pub required_dependencies: IndexMap<String, String>,
}

impl TransformerMetadata {
  /// Whether the transformer requires nothing.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.required_config.is_empty() && self.required_dependencies.is_empty()
  }

  /// Merge another metadata set into this one.
  ///
  /// Config objects are merged recursively with `other` winning on scalar
  /// conflicts; dependencies from `other` override same-named entries.
  pub fn merge(&mut self, other: Self) {
    merge_objects(&mut self.required_config, other.required_config);
    self.required_dependencies.extend(other.required_dependencies);
  }
}

/// Recursively merge `source` into `target`.
pub fn merge_objects(target: &mut Map<String, Value>, source: Map<String, Value>) {
  for (key, value) in source {
    match (target.get_mut(&key), value) {
      (Some(Value::Object(existing)), Value::Object(incoming)) => {
        merge_objects(existing, incoming);
      },
      (_, value) => {
        target.insert(key, value);
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn object(value: Value) -> Map<String, Value> {
    match value {
      Value::Object(map) => map,
      _ => Map::new(),
    }
  }

  #[test]
  fn test_metadata_merge_is_deep() {
    let mut base = TransformerMetadata {
      required_config:       object(json!({"markdown": {"lineNumbers": true}})),
      required_dependencies: IndexMap::new(),
    };
    let mut deps = IndexMap::new();
    deps.insert("markdown-it-mathjax3".to_string(), "^4.3.2".to_string());
    base.merge(TransformerMetadata {
      required_config:       object(json!({"markdown": {"math": true}})),
      required_dependencies: deps,
    });

    assert_eq!(
      Value::Object(base.required_config),
      json!({"markdown": {"lineNumbers": true, "math": true}})
    );
    assert_eq!(
      base.required_dependencies.get("markdown-it-mathjax3"),
      Some(&"^4.3.2".to_string())
    );
  }

  #[test]
  fn test_default_metadata_is_empty() {
    assert!(TransformerMetadata::default().is_empty());
  }

  #[test]
  fn test_document_context_base_dir() {
    let path = Path::new("book/src/chapter/intro.md");
    let ctx = DocumentContext::new(path);
    assert_eq!(ctx.base_dir(), Some(Path::new("book/src/chapter")));
    assert!(DocumentContext::detached().base_dir().is_none());
  }
}
