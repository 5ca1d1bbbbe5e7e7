//! The ordered chain of rewriters applied to every document.

use std::fmt;

use log::trace;

use crate::transformer::{
  AttributesTransformer,
  DocumentContext,
  HiddenLinesTransformer,
  ImagesTransformer,
  IncludeMode,
  IncludeTransformer,
  MathTransformer,
  PlaygroundTransformer,
  QuotesTransformer,
  TransformResult,
  Transformer,
  TransformerMetadata,
};

/// Applies a fixed sequence of transformers, feeding each one's output to
/// the next.
///
/// The default order is significant: includes are resolved before images so
/// inlined content gets its paths rooted too, and attribute comments are
/// inserted before quotes are grouped.
pub struct Pipeline {
  transformers: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
  /// The standard pipeline with includes handled in `include_mode`.
  #[must_use]
  pub fn new(include_mode: IncludeMode) -> Self {
    Self::with_transformers(vec![
      Box::new(HiddenLinesTransformer),
      Box::new(IncludeTransformer::new(include_mode)),
      Box::new(PlaygroundTransformer),
      Box::new(AttributesTransformer),
      Box::new(MathTransformer),
      Box::new(QuotesTransformer),
      Box::new(ImagesTransformer),
    ])
  }

  /// A pipeline running exactly `transformers`, in the given order.
  #[must_use]
  pub fn with_transformers(transformers: Vec<Box<dyn Transformer>>) -> Self {
    Self { transformers }
  }

  /// Convert a document.
  ///
  /// # Errors
  ///
  /// Returns the first error raised by a transformer. The document is left
  /// unconverted in that case.
  pub fn convert(
    &self,
    content: &str,
    ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    self
      .transformers
      .iter()
      .try_fold(content.to_string(), |text, transformer| {
        trace!("Applying transformer: {}", transformer.name());
        transformer.transform(&text, ctx)
      })
  }

  /// Names of the transformers in application order.
  #[must_use]
  pub fn names(&self) -> Vec<&'static str> {
    self.transformers.iter().map(|t| t.name()).collect()
  }

  /// `(name, description)` pairs in application order.
  #[must_use]
  pub fn describe(&self) -> Vec<(&'static str, &'static str)> {
    self
      .transformers
      .iter()
      .map(|t| (t.name(), t.description()))
      .collect()
  }

  /// Merged configuration and dependency requirements of all transformers.
  #[must_use]
  pub fn metadata(&self) -> TransformerMetadata {
    self
      .transformers
      .iter()
      .fold(TransformerMetadata::default(), |mut acc, transformer| {
        acc.merge(transformer.metadata());
        acc
      })
  }
}

impl Default for Pipeline {
  fn default() -> Self {
    Self::new(IncludeMode::default())
  }
}

impl fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("transformers", &self.names())
      .finish()
  }
}
