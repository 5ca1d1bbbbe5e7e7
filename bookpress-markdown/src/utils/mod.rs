pub mod codeblock;

use std::path::{Path, PathBuf};

use log::trace;
use regex::Regex;
use walkdir::WalkDir;

/// Compile a regex pattern, falling back to a pattern that never matches.
///
/// All patterns in this crate are literals, so the fallback only guards
/// against a regression in the pattern itself. The failure is logged instead
/// of aborting a conversion run.
#[must_use]
pub fn compile_regex(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!("Failed to compile regex pattern {pattern:?}: {e}");
    never_matching_regex()
  })
}

/// Returns a regex that never matches anything.
#[must_use]
#[allow(
  clippy::expect_used,
  reason = "The pattern is a constant and always compiles"
)]
pub fn never_matching_regex() -> Regex {
  // A character class that excludes every character can never match.
  Regex::new(r"[^\s\S]").expect("never-matching pattern must compile")
}

/// Recursively collect all markdown files under `input_dir`, sorted by path.
#[must_use]
pub fn collect_markdown_files(input_dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
    .filter(|entry| entry.file_type().is_file())
    .map(walkdir::DirEntry::into_path)
    .filter(|path| is_markdown_file(path))
    .collect();

  files.sort();
  trace!("Found {} markdown files to process", files.len());
  files
}

/// Whether `path` has a `.md` extension (case-insensitive).
#[must_use]
pub fn is_markdown_file(path: &Path) -> bool {
  path
    .extension()
    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Strip a trailing `.md` from a link, keeping any `#fragment` after it.
///
/// ```
/// use bookpress_markdown::utils::strip_md_extension;
///
/// assert_eq!(strip_md_extension("guide/intro.md"), "guide/intro");
/// assert_eq!(strip_md_extension("faq.md#install"), "faq#install");
/// assert_eq!(strip_md_extension("notes.txt"), "notes.txt");
/// ```
#[must_use]
pub fn strip_md_extension(link: &str) -> String {
  let (path, fragment) = link
    .split_once('#')
    .map_or((link, None), |(path, frag)| (path, Some(frag)));
  let path = path.strip_suffix(".md").unwrap_or(path);
  fragment.map_or_else(|| path.to_string(), |frag| format!("{path}#{frag}"))
}
