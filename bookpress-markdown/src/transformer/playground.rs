//! Rust playground fence options.
//!
//! mdBook decorates Rust code blocks with playground options
//! (` ```rust,editable `). VitePress only understands the language tag, so
//! blocks carrying a playground flag are reduced to ` ```rust `.

use super::types::{DocumentContext, TransformResult, Transformer};
use crate::utils::codeblock::{CodeBlockInfo, LineKind, classify_lines, fence_info};

/// Options that only make sense on the mdBook playground.
pub const PLAYGROUND_FLAGS: &[&str] = &["editable", "noplayground", "ignore"];

/// Strips playground-only options from Rust fence-open lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaygroundTransformer;

impl Transformer for PlaygroundTransformer {
  fn name(&self) -> &'static str {
    "rust-playground"
  }

  fn description(&self) -> &'static str {
    "Reduces ```rust,editable style fences to a bare language tag"
  }

  fn transform(
    &self,
    content: &str,
    _ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    let lines: Vec<String> = classify_lines(content)
      .into_iter()
      .map(|(line, kind)| {
        if kind == LineKind::FenceOpen {
          rewrite_fence_open(line).unwrap_or_else(|| line.to_string())
        } else {
          line.to_string()
        }
      })
      .collect();

    Ok(lines.join("\n"))
  }
}

/// Rewrite a fence-open line carrying playground flags.
///
/// The leading indentation and the backtick run are kept as they were.
fn rewrite_fence_open(line: &str) -> Option<String> {
  let info = CodeBlockInfo::parse(fence_info(line));
  if info.language != "rust"
    || !PLAYGROUND_FLAGS.iter().any(|flag| info.has_option(flag))
  {
    return None;
  }

  let trimmed = line.trim_start();
  let indent = &line[..line.len() - trimmed.len()];
  let ticks = trimmed.chars().take_while(|&c| c == '`').count();
  Some(format!("{indent}{}{}", "`".repeat(ticks), info.language))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  fn run(input: &str) -> String {
    PlaygroundTransformer
      .transform(input, &DocumentContext::detached())
      .expect("playground never fails")
  }

  #[test]
  fn test_editable_is_stripped() {
    assert_eq!(
      run("```rust,editable\ncode\n```"),
      "```rust\ncode\n```"
    );
  }

  #[test]
  fn test_all_options_dropped_when_any_flag_present() {
    assert_eq!(
      run("```rust,ignore,should_panic\nfn f() {}\n```"),
      "```rust\nfn f() {}\n```"
    );
  }

  #[test]
  fn test_other_options_untouched() {
    let input = "```rust,no_run\nfn f() {}\n```";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_other_language_untouched() {
    let input = "```toml,editable\na = 1\n```";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_only_open_transitions_rewritten() {
    // The second fence line closes the first block, so it must not be
    // treated as an opener even though it carries an info string.
    let input = "```text\nx\n```rust,editable\n```rust,noplayground\ny\n```";
    assert_eq!(
      run(input),
      "```text\nx\n```rust,editable\n```rust\ny\n```"
    );
  }

  #[test]
  fn test_indentation_and_tick_count_kept() {
    assert_eq!(
      run("  ````rust,editable\ncode\n  ````"),
      "  ````rust\ncode\n  ````"
    );
  }
}
