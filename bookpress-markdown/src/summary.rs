//! `SUMMARY.md` parsing.
//!
//! mdBook's table of contents is an indented list of links. Every two columns
//! of indentation open one more nesting level:
//!
//! ```text
//! [Introduction](README.md)
//! - [Guide](guide/index.md)
//!   - [Install](guide/install.md)
//! ```
//!
//! Lines that are not a single link (part headings, `---` separators, prose,
//! draft chapters with an empty target) are ignored.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::utils::compile_regex;

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r"^([ \t]*)(?:(?:[-*+]|\d+\.)\s+)?\[([^\]]+)\]\(([^)]+)\)\s*$")
});

/// Columns of indentation per nesting level.
const INDENT_PER_LEVEL: usize = 2;

/// One entry of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
  pub title:    String,
  /// Link target as written, e.g. `guide/install.md`.
  pub link:     String,
  /// Nesting level, 1 for top-level entries.
  pub level:    usize,
  pub children: Vec<Self>,
}

impl TocEntry {
  fn leaf(title: &str, link: &str, level: usize) -> Self {
    Self {
      title: title.to_string(),
      link: link.trim().to_string(),
      level,
      children: Vec::new(),
    }
  }

  /// Depth-first iterator over this entry and all its descendants.
  pub fn iter(&self) -> impl Iterator<Item = &Self> {
    let mut stack = vec![self];
    std::iter::from_fn(move || {
      let entry = stack.pop()?;
      stack.extend(entry.children.iter().rev());
      Some(entry)
    })
  }
}

/// Parse one line into `(title, link, level)`.
fn parse_line(line: &str) -> Option<(&str, &str, usize)> {
  let caps = ENTRY_RE.captures(line)?;
  let indent: usize = caps[1]
    .chars()
    .map(|c| if c == '\t' { INDENT_PER_LEVEL } else { 1 })
    .sum();
  let title = caps.get(2)?.as_str();
  let link = caps.get(3)?.as_str();
  Some((title, link, indent / INDENT_PER_LEVEL + 1))
}

/// Parse a table of contents into a tree of entries.
///
/// Entries are attached with an explicit stack of open scopes: each new
/// entry closes every scope at its own level or deeper, becomes a child of
/// the innermost remaining scope and is itself opened as a scope.
#[must_use]
pub fn parse_summary(content: &str) -> Vec<TocEntry> {
  // Open scopes; the bottom one is the root at level 0.
  let mut stack: Vec<TocEntry> = vec![TocEntry::leaf("", "", 0)];

  for (title, link, level) in content.lines().filter_map(parse_line) {
    while stack.last().is_some_and(|scope| scope.level >= level) {
      close_scope(&mut stack);
    }
    stack.push(TocEntry::leaf(title, link, level));
  }

  while stack.len() > 1 {
    close_scope(&mut stack);
  }

  stack.pop().map(|root| root.children).unwrap_or_default()
}

/// Pop the innermost scope and attach it to its parent.
fn close_scope(stack: &mut Vec<TocEntry>) {
  if stack.len() < 2 {
    return;
  }
  if let Some(entry) = stack.pop()
    && let Some(parent) = stack.last_mut()
  {
    parent.children.push(entry);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(title: &str, link: &str, level: usize, children: Vec<TocEntry>) -> TocEntry {
    TocEntry {
      title: title.to_string(),
      link: link.to_string(),
      level,
      children,
    }
  }

  #[test]
  fn test_two_space_nesting() {
    let toc = parse_summary("[A](a.md)\n  [B](b.md)\n[C](c.md)");
    assert_eq!(toc, vec![
      entry("A", "a.md", 1, vec![entry("B", "b.md", 2, vec![])]),
      entry("C", "c.md", 1, vec![]),
    ]);
  }

  #[test]
  fn test_mdbook_summary() {
    let summary = "# Summary\n\n[Introduction](README.md)\n\n# User Guide\n\n- [Install](guide/install.md)\n  - [Linux](guide/linux.md)\n    - [Arch](guide/arch.md)\n  - [macOS](guide/macos.md)\n- [Draft]()\n\n---\n\n- [FAQ](faq.md)\n";
    let toc = parse_summary(summary);
    assert_eq!(toc, vec![
      entry("Introduction", "README.md", 1, vec![]),
      entry("Install", "guide/install.md", 1, vec![
        entry("Linux", "guide/linux.md", 2, vec![entry(
          "Arch",
          "guide/arch.md",
          3,
          vec![]
        )]),
        entry("macOS", "guide/macos.md", 2, vec![]),
      ]),
      entry("FAQ", "faq.md", 1, vec![]),
    ]);
  }

  #[test]
  fn test_closing_several_levels_at_once() {
    let toc = parse_summary("- [A](a.md)\n  - [B](b.md)\n    - [C](c.md)\n- [D](d.md)");
    assert_eq!(toc.len(), 2);
    assert_eq!(toc[0].children[0].children[0].title, "C");
    assert_eq!(toc[1].title, "D");
  }

  #[test]
  fn test_skipped_level_still_nests() {
    let toc = parse_summary("- [A](a.md)\n    - [B](b.md)");
    assert_eq!(toc.len(), 1);
    assert_eq!(toc[0].children[0].level, 3);
  }

  #[test]
  fn test_tabs_count_as_one_level() {
    let toc = parse_summary("- [A](a.md)\n\t- [B](b.md)");
    assert_eq!(toc[0].children[0].title, "B");
  }

  #[test]
  fn test_malformed_lines_ignored() {
    assert!(parse_summary("[no link]\n(no title)\nplain text\n").is_empty());
    assert!(parse_summary("").is_empty());
  }

  #[test]
  fn test_iter_is_depth_first() {
    let toc = parse_summary("- [A](a.md)\n  - [B](b.md)\n  - [C](c.md)");
    let titles: Vec<&str> = toc[0].iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
  }
}
