//! Block quotes to VitePress custom containers.
//!
//! A quote whose first line starts with a bold label becomes a styled
//! container:
//!
//! ```text
//! > **Warning:** mind the gap      ::: warning Warning
//! > second line               ->   mind the gap
//!                                  second line
//!                                  :::
//! ```
//!
//! Any other quote becomes an `info` container. GitHub style alerts
//! (`> [!NOTE]`) are rendered natively by VitePress and pass through.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{DocumentContext, TransformResult, Transformer};
use crate::utils::{
  codeblock::{LineKind, classify_lines},
  compile_regex,
};

static ALERT_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r"\*\*(注意|Note|警告|Warning|错误|Error)[：:]\*\*\s*")
});

static GITHUB_ALERT_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r"^\s*\[!(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\]")
});

/// VitePress container variants produced from quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
  Info,
  Tip,
  Warning,
  Danger,
}

impl ContainerKind {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Info => "info",
      Self::Tip => "tip",
      Self::Warning => "warning",
      Self::Danger => "danger",
    }
  }

  /// Container for an alert label, in either supported language.
  #[must_use]
  pub fn from_label(label: &str) -> Option<Self> {
    match label {
      "注意" | "Note" => Some(Self::Tip),
      "警告" | "Warning" => Some(Self::Warning),
      "错误" | "Error" => Some(Self::Danger),
      _ => None,
    }
  }
}

/// Content of a quote line, or `None` if the line is not part of a quote.
///
/// Only `> text` and a bare `>` count; the bare form is an empty line.
fn quote_content(line: &str) -> Option<&str> {
  if let Some(rest) = line.strip_prefix("> ") {
    return Some(rest);
  }
  (line.starts_with('>') && line.trim() == ">").then_some("")
}

/// Converts block quotes into `:::` containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotesTransformer;

impl Transformer for QuotesTransformer {
  fn name(&self) -> &'static str {
    "quote-blocks"
  }

  fn description(&self) -> &'static str {
    "Turns block quotes into VitePress tip/warning/danger/info containers"
  }

  fn transform(
    &self,
    content: &str,
    _ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    let mut output: Vec<String> = Vec::new();
    // Raw lines of the quote being collected.
    let mut quote: Vec<&str> = Vec::new();

    for (line, kind) in classify_lines(content) {
      if kind == LineKind::Text && quote_content(line).is_some() {
        quote.push(line);
        continue;
      }
      if !quote.is_empty() {
        output.extend(convert_quote(&quote));
        quote.clear();
      }
      output.push(line.to_string());
    }

    if !quote.is_empty() {
      output.extend(convert_quote(&quote));
    }

    Ok(output.join("\n"))
  }
}

/// Convert the raw lines of one quote block.
fn convert_quote(raw: &[&str]) -> Vec<String> {
  let lines: Vec<&str> = raw.iter().filter_map(|line| quote_content(line)).collect();
  let Some(first) = lines.first() else {
    return Vec::new();
  };

  if GITHUB_ALERT_RE.is_match(first) {
    return raw.iter().map(ToString::to_string).collect();
  }

  let mut output = Vec::with_capacity(lines.len() + 2);

  let labelled = ALERT_RE.captures(first).and_then(|caps| {
    let label = caps.get(1)?.as_str();
    let whole = caps.get(0)?;
    let kind = ContainerKind::from_label(label)?;
    let remainder = format!("{}{}", &first[..whole.start()], &first[whole.end()..]);
    Some((kind, label, remainder))
  });

  match labelled {
    Some((kind, label, remainder)) => {
      output.push(format!("::: {} {label}", kind.as_str()));
      if !remainder.trim().is_empty() {
        output.push(remainder);
      }
      output.extend(lines[1..].iter().map(ToString::to_string));
    },
    None => {
      output.push(format!("::: {}", ContainerKind::Info.as_str()));
      output.extend(lines.iter().map(ToString::to_string));
    },
  }

  output.push(":::".to_string());
  output
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  fn run(input: &str) -> String {
    QuotesTransformer
      .transform(input, &DocumentContext::detached())
      .expect("quotes never fail")
  }

  #[test]
  fn test_note_alert() {
    assert_eq!(run("> **Note:** hi"), "::: tip Note\nhi\n:::");
  }

  #[test]
  fn test_label_alone_on_first_line() {
    assert_eq!(
      run("> **Note:**\n> body text"),
      "::: tip Note\nbody text\n:::"
    );
  }

  #[test]
  fn test_chinese_alert_with_full_width_colon() {
    assert_eq!(
      run("> **警告：** 小心\n> 第二行"),
      "::: warning 警告\n小心\n第二行\n:::"
    );
  }

  #[test]
  fn test_error_alert() {
    assert_eq!(
      run("> **Error:** broken"),
      "::: danger Error\nbroken\n:::"
    );
  }

  #[test]
  fn test_plain_quote_becomes_info() {
    assert_eq!(
      run("> first\n>\n> second"),
      "::: info\nfirst\n\nsecond\n:::"
    );
  }

  #[test]
  fn test_label_only_checked_on_first_line() {
    assert_eq!(
      run("> intro\n> **Warning:** later"),
      "::: info\nintro\n**Warning:** later\n:::"
    );
  }

  #[test]
  fn test_surrounding_text_interleaved() {
    assert_eq!(
      run("before\n> a\nmiddle\n> **Note:** b\nafter"),
      "before\n::: info\na\n:::\nmiddle\n::: tip Note\nb\n:::\nafter"
    );
  }

  #[test]
  fn test_quote_in_fence_untouched() {
    let input = "```text\n> not a quote\n```";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_github_alert_passes_through() {
    let input = "> [!TIP]\n> Use the force";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_idempotent() {
    let once = run("> **Note:** hi\n\n> plain");
    assert_eq!(run(&once), once);
  }
}
