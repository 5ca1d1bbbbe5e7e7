//! Brace attribute annotations.
//!
//! A heading anchor `{#id}` is valid in both dialects and stays as it is.
//! Any other annotation such as `{.warning .wide data-x=1}` has no VitePress
//! counterpart; it is moved out of the line into an HTML comment block that
//! suggests an equivalent `<div>` wrapper. Math is left alone, both inline
//! `$...$` spans and `$$` display blocks.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{DocumentContext, TransformResult, Transformer};
use crate::utils::{
  codeblock::{LineKind, classify_lines},
  compile_regex,
};

/// Comments, inline code and inline math are matched first so annotations
/// inside them are skipped; only the last alternative captures.
static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(
    r"<!--.*?-->|`[^`]*`|\$\$[^$]*\$\$|\$[^$]*\$|\{([^{}]+)\}",
  )
});

static ID_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"^#[A-Za-z0-9_-]+$"));

static CLASS_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"^\.[A-Za-z0-9_-]+$"));

static KEY_VALUE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"^[A-Za-z_:][A-Za-z0-9_:.-]*=\S+$"));

/// Attribute tokens extracted from a brace annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
  /// The annotation as written, braces included.
  pub raw:     String,
  /// Class names without their leading dot.
  pub classes: Vec<String>,
  /// Every non-class token, in source order.
  pub others:  Vec<String>,
}

impl Annotation {
  /// Parse the inside of a brace pair.
  ///
  /// Returns `None` when the text is not an attribute list at all (template
  /// expressions, math, prose in braces) or when it is a lone `#id`, which
  /// needs no rewriting.
  #[must_use]
  pub fn parse(inner: &str) -> Option<Self> {
    let trimmed = inner.trim();
    if trimmed.is_empty() || ID_RE.is_match(trimmed) {
      return None;
    }

    let mut classes = Vec::new();
    let mut others = Vec::new();
    for token in trimmed.split_whitespace() {
      if CLASS_RE.is_match(token) {
        classes.push(token[1..].to_string());
      } else if ID_RE.is_match(token) || KEY_VALUE_RE.is_match(token) {
        others.push(token.to_string());
      } else {
        return None;
      }
    }

    Some(Self {
      raw: format!("{{{inner}}}"),
      classes,
      others,
    })
  }

  /// The three-line comment block replacing the annotation.
  #[must_use]
  pub fn to_comment_block(&self) -> String {
    let mut attrs = Vec::new();
    if !self.classes.is_empty() {
      attrs.push(format!("class=\"{}\"", self.classes.join(" ")));
    }
    attrs.extend(self.others.iter().cloned());

    format!(
      "<!-- mdBook attributes: {} -->\n<!-- VitePress does not fully \
       support this syntax, wrap the content in HTML instead -->\n<!-- e.g. \
       <div {}>content</div> -->",
      self.raw,
      attrs.join(" ")
    )
  }
}

/// Replaces unsupported attribute annotations with explanatory comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributesTransformer;

impl Transformer for AttributesTransformer {
  fn name(&self) -> &'static str {
    "html-attributes"
  }

  fn description(&self) -> &'static str {
    "Keeps {#id} heading anchors and turns other attribute annotations into \
     HTML hint comments"
  }

  fn transform(
    &self,
    content: &str,
    _ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    let mut in_display_math = false;
    let lines: Vec<String> = classify_lines(content)
      .into_iter()
      .map(|(line, kind)| {
        if kind != LineKind::Text {
          return line.to_string();
        }
        if opens_or_closes_display_math(line) {
          in_display_math = !in_display_math;
          return line.to_string();
        }
        if in_display_math {
          line.to_string()
        } else {
          rewrite_line(line)
        }
      })
      .collect();

    Ok(lines.join("\n"))
  }
}

/// A line with an odd number of `$$` delimiters enters or leaves a display
/// math block. `$$x$$` on one line is handled by the inline pattern.
fn opens_or_closes_display_math(line: &str) -> bool {
  line.matches("$$").count() % 2 == 1
}

/// Rewrite one prose line.
///
/// Annotations are removed from the line and their comment blocks follow it
/// on separate lines, so a heading keeps its text intact.
fn rewrite_line(line: &str) -> String {
  let mut kept = String::with_capacity(line.len());
  let mut blocks = Vec::new();
  let mut last = 0;

  for caps in ANNOTATION_RE.captures_iter(line) {
    let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
      continue;
    };
    let Some(annotation) = Annotation::parse(inner.as_str()) else {
      continue;
    };
    let before = &line[last..whole.start()];
    kept.push_str(before.strip_suffix(' ').unwrap_or(before));
    last = whole.end();
    blocks.push(annotation.to_comment_block());
  }

  if blocks.is_empty() {
    return line.to_string();
  }
  kept.push_str(&line[last..]);

  let kept = kept.trim_end();
  let mut output: Vec<&str> = Vec::with_capacity(blocks.len() + 1);
  if !kept.trim().is_empty() {
    output.push(kept);
  }
  output.extend(blocks.iter().map(String::as_str));
  output.join("\n")
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  fn run(input: &str) -> String {
    AttributesTransformer
      .transform(input, &DocumentContext::detached())
      .expect("attributes never fail")
  }

  #[test]
  fn test_heading_id_is_kept() {
    let input = "## Installation {#install}\n\nText";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_class_annotation_on_heading() {
    let out = run("## Title {.warning .wide}");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "## Title");
    assert_eq!(lines[1], "<!-- mdBook attributes: {.warning .wide} -->");
    assert!(lines[2].contains("does not fully support"));
    assert_eq!(
      lines[3],
      "<!-- e.g. <div class=\"warning wide\">content</div> -->"
    );
  }

  #[test]
  fn test_mixed_tokens() {
    let annotation =
      Annotation::parse(".note #intro data-kind=aside").expect("annotation");
    assert_eq!(annotation.classes, vec!["note"]);
    assert_eq!(annotation.others, vec!["#intro", "data-kind=aside"]);
  }

  #[test]
  fn test_non_attribute_braces_untouched() {
    let input = "Use {{ value }} or {a, b} and $\\frac{a}{b}$";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_inline_code_and_fences_untouched() {
    let input = "Write `{.class}` here\n```\n{.class}\n```";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_math_braces_untouched() {
    let input = "Sum $\\sum_{i=1}^{n} x_i$ here\n\n\
                 $$\n\\sum_{k=0}^{n} k\n$$\n\n\
                 Also $$\\int_{a=0}^{1}$$ inline";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_annotation_after_display_math() {
    let out = run("$$\nx_{i=1}\n$$\nParagraph {.lead}");
    assert!(out.starts_with("$$\nx_{i=1}\n$$\nParagraph\n"));
    assert!(out.contains("<!-- mdBook attributes: {.lead} -->"));
  }

  #[test]
  fn test_idempotent() {
    let once = run("Paragraph {.lead}");
    assert_eq!(run(&once), once);
  }
}
