//! File inclusion directives.
//!
//! Handles mdBook's `{{#include path}}` and `{{#rustdoc_include path}}` with
//! the optional line range or anchor suffix:
//!
//! | mdBook                  | VitePress import     |
//! |-------------------------|----------------------|
//! | `{{#include a.rs}}`     | `<<< a.rs`           |
//! | `{{#include a.rs:7}}`   | `<<< a.rs{7-}`       |
//! | `{{#include a.rs:3:5}}` | `<<< a.rs{3-5}`      |
//! | `{{#include a.rs::4}}`  | `<<< a.rs{1-4}`      |
//! | `{{#include a.rs:main}}`| `<<< a.rs#main`      |
//!
//! Two modes exist, see [`IncludeMode`]. A transformer instance runs in
//! exactly one of them.

use std::{
  fmt,
  fs,
  path::Path,
  str::FromStr,
  sync::LazyLock,
};

use log::{debug, warn};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::types::{
  DocumentContext,
  TransformError,
  TransformResult,
  Transformer,
};
use crate::utils::{
  codeblock::{LineKind, classify_lines},
  compile_regex,
};

static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r"\{\{#(?:include|rustdoc_include)\s+([^}]+?)\s*\}\}")
});

static ANCHOR_START_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r"(?i)(?:\bANCHOR:\s*|#region\s+)([\w-]+)")
});

static ANCHOR_END_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r"(?i)(?:\bANCHOR_END:\s*|#endregion\s+)([\w-]+)")
});

/// How include directives are handled.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum IncludeMode {
  /// Rewrite directives into VitePress `<<<` imports and let VitePress read
  /// the files at build time.
  #[default]
  Translate,

  /// Read the referenced files now and substitute their content.
  Inline,
}

impl FromStr for IncludeMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "translate" => Ok(Self::Translate),
      "inline" => Ok(Self::Inline),
      _ => Err(format!("Unknown include mode: {s}")),
    }
  }
}

impl fmt::Display for IncludeMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Translate => f.write_str("translate"),
      Self::Inline => f.write_str("inline"),
    }
  }
}

/// Portion of a file selected by an include directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  /// The whole file.
  All,

  /// From the given 1-based line to the end of the file.
  From(usize),

  /// Inclusive 1-based line range.
  Range { start: usize, end: usize },

  /// From the first line up to and including the given line.
  To(usize),

  /// A named anchor region.
  Anchor(String),
}

/// Parsed argument of an include directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeTarget {
  /// Path relative to the including document, without a leading `./`.
  pub path:      String,
  pub selection: Selection,
}

impl IncludeTarget {
  /// Parse the argument of an include directive, e.g. `./src/main.rs:3:5`.
  #[must_use]
  pub fn parse(raw: &str) -> Self {
    let raw = raw.trim();
    let raw = raw.strip_prefix("./").unwrap_or(raw);

    let Some((path, suffix)) = raw.split_once(':') else {
      return Self {
        path:      raw.to_string(),
        selection: Selection::All,
      };
    };

    Self {
      path:      path.to_string(),
      selection: parse_selection(suffix),
    }
  }

  /// The equivalent VitePress snippet import line.
  #[must_use]
  pub fn to_import(&self) -> String {
    let path = &self.path;
    match &self.selection {
      Selection::All => format!("<<< {path}"),
      Selection::From(start) => format!("<<< {path}{{{start}-}}"),
      Selection::Range { start, end } => format!("<<< {path}{{{start}-{end}}}"),
      Selection::To(end) => format!("<<< {path}{{1-{end}}}"),
      Selection::Anchor(name) => format!("<<< {path}#{name}"),
    }
  }
}

fn parse_selection(suffix: &str) -> Selection {
  let number = |s: &str| s.trim().parse::<usize>().ok();
  let parts: Vec<&str> = suffix.split(':').collect();

  match parts.as_slice() {
    [single] if single.trim().is_empty() => Selection::All,
    [single] => {
      number(single)
        .map_or_else(|| Selection::Anchor(single.trim().to_string()), Selection::From)
    },
    [start, end] => {
      match (
        start.trim().is_empty(),
        number(start),
        end.trim().is_empty(),
        number(end),
      ) {
        (true, _, true, _) => Selection::All,
        (false, Some(start), true, _) => Selection::From(start),
        (true, _, false, Some(end)) => Selection::To(end),
        (false, Some(start), false, Some(end)) => Selection::Range { start, end },
        _ => Selection::Anchor(suffix.trim().to_string()),
      }
    },
    _ => Selection::Anchor(suffix.trim().to_string()),
  }
}

/// Rewrites or resolves `{{#include}}` and `{{#rustdoc_include}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeTransformer {
  mode: IncludeMode,
}

impl IncludeTransformer {
  #[must_use]
  pub const fn new(mode: IncludeMode) -> Self {
    Self { mode }
  }

  #[must_use]
  pub const fn mode(&self) -> IncludeMode {
    self.mode
  }
}

impl Transformer for IncludeTransformer {
  fn name(&self) -> &'static str {
    "include-files"
  }

  fn description(&self) -> &'static str {
    "Converts mdBook include directives into VitePress snippet imports or \
     inlines the referenced files"
  }

  fn transform(
    &self,
    content: &str,
    ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    if !DIRECTIVE_RE.is_match(content) {
      return Ok(content.to_string());
    }

    match self.mode {
      IncludeMode::Translate => Ok(translate_document(content)),
      IncludeMode::Inline => {
        let base_dir =
          ctx
            .base_dir()
            .ok_or(TransformError::MissingDocumentPath {
              transformer: self.name(),
            })?;
        Ok(inline_document(content, base_dir))
      },
    }
  }
}

fn translate_directives(line: &str) -> String {
  DIRECTIVE_RE
    .replace_all(line, |caps: &Captures| {
      IncludeTarget::parse(&caps[1]).to_import()
    })
    .into_owned()
}

/// Whether the whole (trimmed) line is a single include directive.
fn is_directive_line(line: &str) -> bool {
  let trimmed = line.trim();
  DIRECTIVE_RE
    .find(trimmed)
    .is_some_and(|m| m.start() == 0 && m.end() == trimmed.len())
}

fn translate_document(content: &str) -> String {
  let mut output: Vec<String> = Vec::new();
  let mut fence: Option<Vec<&str>> = None;

  for (line, kind) in classify_lines(content) {
    match kind {
      LineKind::FenceOpen => fence = Some(vec![line]),
      LineKind::Code => {
        if let Some(block) = fence.as_mut() {
          block.push(line);
        } else {
          output.push(translate_directives(line));
        }
      },
      LineKind::FenceClose => {
        let mut block = fence.take().unwrap_or_default();
        block.push(line);
        output.extend(translate_fenced_block(&block));
      },
      LineKind::Text => output.push(translate_directives(line)),
    }
  }

  // Unterminated fence: nothing to unwrap, rewrite in place.
  if let Some(block) = fence {
    output.extend(block.into_iter().map(translate_directives));
  }

  output.join("\n")
}

/// Translate a complete fenced block, fence lines included.
///
/// VitePress imports render their own code block, so a fence whose body is
/// nothing but include directives is dropped and only the imports remain.
fn translate_fenced_block(block: &[&str]) -> Vec<String> {
  let body = if block.len() >= 2 {
    &block[1..block.len() - 1]
  } else {
    &[][..]
  };

  let only_directives = body.iter().any(|line| is_directive_line(line))
    && body
      .iter()
      .all(|line| line.trim().is_empty() || is_directive_line(line));

  if only_directives {
    body
      .iter()
      .filter(|line| is_directive_line(line))
      .map(|line| translate_directives(line.trim()))
      .collect()
  } else {
    block.iter().map(|line| translate_directives(line)).collect()
  }
}

fn inline_document(content: &str, base_dir: &Path) -> String {
  DIRECTIVE_RE
    .replace_all(content, |caps: &Captures| {
      resolve_include(&IncludeTarget::parse(&caps[1]), base_dir)
    })
    .into_owned()
}

/// Read and slice the file an include directive points at.
///
/// Never fails: problems are reported as an HTML comment in place of the
/// directive so they stay visible in the converted document.
#[must_use]
pub fn resolve_include(target: &IncludeTarget, base_dir: &Path) -> String {
  let full_path = base_dir.join(&target.path);
  debug!("Including file: {}", full_path.display());

  let text = match fs::read_to_string(&full_path) {
    Ok(text) => text,
    Err(e) => {
      warn!("Could not include {}: {e}", full_path.display());
      return format!(
        "<!-- bookpress: could not include file: {} -->",
        target.path
      );
    },
  };

  select_lines(&text, &target.selection).unwrap_or_else(|| {
    let name = match &target.selection {
      Selection::Anchor(name) => name.as_str(),
      _ => "",
    };
    warn!("Anchor '{name}' not found in {}", full_path.display());
    format!(
      "<!-- bookpress: anchor '{name}' not found in {} -->",
      target.path
    )
  })
}

/// Apply a selection to file content. Returns `None` only when an anchor
/// cannot be found.
///
/// Anchor marker lines are never part of the result.
#[must_use]
pub fn select_lines(text: &str, selection: &Selection) -> Option<String> {
  let lines: Vec<&str> = text.lines().collect();

  let selected: Vec<&str> = match selection {
    Selection::All => lines,
    Selection::From(start) => {
      lines.into_iter().skip(start.saturating_sub(1)).collect()
    },
    Selection::Range { start, end } => {
      let skip = start.saturating_sub(1);
      lines
        .into_iter()
        .skip(skip)
        .take(end.saturating_sub(skip))
        .collect()
    },
    Selection::To(end) => lines.into_iter().take(*end).collect(),
    Selection::Anchor(name) => anchored_lines(&lines, name)?,
  };

  let kept: Vec<&str> = selected
    .into_iter()
    .filter(|line| !is_anchor_marker(line))
    .collect();
  Some(kept.join("\n"))
}

fn is_anchor_marker(line: &str) -> bool {
  ANCHOR_START_RE.is_match(line) || ANCHOR_END_RE.is_match(line)
}

fn marker_name<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
  re.captures(line)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

/// Lines between the start and end markers of anchor `name`.
///
/// A region left open runs to the end of the file.
fn anchored_lines<'a>(lines: &[&'a str], name: &str) -> Option<Vec<&'a str>> {
  let matches_name =
    |found: Option<&str>| found.is_some_and(|found| found.eq_ignore_ascii_case(name));

  let start = lines
    .iter()
    .position(|line| matches_name(marker_name(&ANCHOR_START_RE, line)))?;

  Some(
    lines[start + 1..]
      .iter()
      .take_while(|line| !matches_name(marker_name(&ANCHOR_END_RE, line)))
      .copied()
      .collect(),
  )
}
