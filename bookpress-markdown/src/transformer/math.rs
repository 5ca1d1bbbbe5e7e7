//! Math passthrough.
//!
//! Both dialects use `$...$` and `$$...$$`, so content is returned as is.
//! The transformer exists to switch on math rendering in the generated
//! project.

use serde_json::{Value, json};

use super::types::{
  DocumentContext,
  TransformResult,
  Transformer,
  TransformerMetadata,
};

/// Package VitePress needs for `markdown.math`.
pub const MATH_PACKAGE: &str = "markdown-it-mathjax3";
pub const MATH_PACKAGE_VERSION: &str = "^4.3.2";

#[derive(Debug, Clone, Copy, Default)]
pub struct MathTransformer;

impl Transformer for MathTransformer {
  fn name(&self) -> &'static str {
    "mathjax"
  }

  fn description(&self) -> &'static str {
    "Keeps $ and $$ math delimiters and enables math rendering"
  }

  fn transform(
    &self,
    content: &str,
    _ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    Ok(content.to_string())
  }

  fn metadata(&self) -> TransformerMetadata {
    let required_config = match json!({ "markdown": { "math": true } }) {
      Value::Object(map) => map,
      _ => serde_json::Map::new(),
    };

    let mut metadata = TransformerMetadata {
      required_config,
      ..TransformerMetadata::default()
    };
    metadata
      .required_dependencies
      .insert(MATH_PACKAGE.to_string(), MATH_PACKAGE_VERSION.to_string());
    metadata
  }
}
