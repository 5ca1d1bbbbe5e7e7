//! The mdBook to VitePress rewriters.
//!
//! Each rewriter implements [`Transformer`] and works on a whole document.
//! [`crate::Pipeline`] chains them in their required order.

pub mod attributes;
pub mod hidden_lines;
pub mod images;
pub mod includes;
pub mod math;
pub mod playground;
pub mod quotes;
pub mod types;

pub use attributes::AttributesTransformer;
pub use hidden_lines::HiddenLinesTransformer;
pub use images::ImagesTransformer;
pub use includes::{IncludeMode, IncludeTransformer};
pub use math::MathTransformer;
pub use playground::PlaygroundTransformer;
pub use quotes::QuotesTransformer;
pub use types::{
  DocumentContext,
  TransformError,
  TransformResult,
  Transformer,
  TransformerMetadata,
};
