//! Hidden code lines.
//!
//! mdBook hides lines starting with `#` inside code blocks. VitePress has no
//! such notion, so hidden lines are turned into visible line comments:
//!
//! ```text
//! # use std::io;      ->  // use std::io;
//! ```
//!
//! Only the default `#` prefix is supported.

use super::types::{DocumentContext, TransformResult, Transformer};
use crate::utils::codeblock::{LineKind, classify_lines};

const HIDDEN_MARKER: char = '#';

/// Rewrites hidden code lines into `//` comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenLinesTransformer;

impl Transformer for HiddenLinesTransformer {
  fn name(&self) -> &'static str {
    "hidden-lines"
  }

  fn description(&self) -> &'static str {
    "Converts mdBook hidden code lines (`# `) into line comments"
  }

  fn transform(
    &self,
    content: &str,
    _ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    let lines: Vec<String> = classify_lines(content)
      .into_iter()
      .map(|(line, kind)| {
        if kind == LineKind::Code {
          rewrite_hidden_line(line).unwrap_or_else(|| line.to_string())
        } else {
          line.to_string()
        }
      })
      .collect();

    Ok(lines.join("\n"))
  }
}

/// Rewrite a single code line if it is a hidden line.
///
/// Returns `None` for lines that must be left untouched: anything not starting
/// with the marker, shebangs (`#!`) and attributes (`#[...]`).
#[must_use]
pub fn rewrite_hidden_line(line: &str) -> Option<String> {
  let trimmed = line.trim_start();
  let rest = trimmed.strip_prefix(HIDDEN_MARKER)?;
  if rest.starts_with('!') || rest.starts_with('[') {
    return None;
  }

  let indent = &line[..line.len() - trimmed.len()];
  let separator = if rest.is_empty() || rest.starts_with(char::is_whitespace)
  {
    ""
  } else {
    " "
  };
  Some(format!("{indent}//{separator}{rest}"))
}
