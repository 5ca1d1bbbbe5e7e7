//! # bookpress-markdown
//!
//! Rewrites markdown written for mdBook into markdown VitePress understands,
//! and parses mdBook's `SUMMARY.md` table of contents.
//!
//! ## Quick Start
//!
//! ```rust
//! use bookpress_markdown::{DocumentContext, Pipeline};
//!
//! let pipeline = Pipeline::default();
//! let converted = pipeline
//!   .convert("```rust,editable\n# use std::io;\n```", &DocumentContext::detached())
//!   .unwrap();
//!
//! assert_eq!(converted, "```rust\n// use std::io;\n```");
//! ```
//!
//! ## Rewriters
//!
//! Applied in this order by [`Pipeline`]:
//!
//! - **hidden-lines**: `# hidden` code lines become `// hidden`
//! - **include-files**: `{{#include file.rs:3:5}}` becomes `<<< file.rs{3-5}`,
//!   or is replaced by the file content in [`IncludeMode::Inline`]
//! - **rust-playground**: ` ```rust,editable ` becomes ` ```rust `
//! - **html-attributes**: `{.class}` annotations become hint comments
//! - **mathjax**: passthrough, enables `markdown.math`
//! - **quote-blocks**: quotes become `::: tip`/`warning`/`danger`/`info`
//! - **image-references**: `./img.png` becomes `/img.png`
//!
//! ## Table of contents
//!
//! ```rust
//! use bookpress_markdown::parse_summary;
//!
//! let toc = parse_summary("- [Guide](guide.md)\n  - [Install](install.md)");
//! assert_eq!(toc[0].children[0].link, "install.md");
//! ```

mod pipeline;
pub mod summary;
pub mod transformer;
pub mod utils;

pub use crate::{
  pipeline::Pipeline,
  summary::{TocEntry, parse_summary},
  transformer::{
    DocumentContext,
    IncludeMode,
    TransformError,
    TransformResult,
    Transformer,
    TransformerMetadata,
  },
};
