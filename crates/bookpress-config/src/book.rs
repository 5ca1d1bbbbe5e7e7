//! mdBook's `book.toml`.

use std::{
  fs,
  path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::ConfigError;

pub const BOOK_TOML: &str = "book.toml";

const DEFAULT_TITLE: &str = "Documentation";
const DEFAULT_DESCRIPTION: &str = "Documentation site built with VitePress";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_SRC: &str = "src";

/// Directories never searched for a `book.toml`.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "book"];

/// The parts of `book.toml` a migration needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookConfig {
  pub book:         BookSection,
  pub build:        BuildSection,
  pub preprocessor: toml::Table,
  pub output:       toml::Table,
}

/// The `[book]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BookSection {
  pub title:          Option<String>,
  pub description:    Option<String>,
  pub authors:        Vec<String>,
  pub language:       Option<String>,
  pub src:            Option<PathBuf>,
  pub multilingual:   bool,
  pub text_direction: Option<String>,
}

/// The `[build]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildSection {
  pub build_dir:      Option<PathBuf>,
  pub create_missing: bool,
}

impl BookConfig {
  /// Parse `book.toml` content.
  ///
  /// # Errors
  ///
  /// Returns an error if the content is not valid TOML for a book.
  pub fn parse(content: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(content)?)
  }

  /// Read and parse a `book.toml` file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path)?;
    Self::parse(&content)
  }

  /// Load the book rooted at or below `source_dir`.
  ///
  /// Returns the configuration and the directory holding `book.toml`. A
  /// missing or broken `book.toml` is logged and the defaults are used with
  /// `source_dir` as the root.
  #[must_use]
  pub fn load(source_dir: &Path) -> (Self, PathBuf) {
    let Some(path) = find_book_toml(source_dir) else {
      warn!(
        "No {BOOK_TOML} found under {}, using defaults",
        source_dir.display()
      );
      return (Self::default(), source_dir.to_path_buf());
    };

    let root = path
      .parent()
      .map_or_else(|| source_dir.to_path_buf(), Path::to_path_buf);

    match Self::from_file(&path) {
      Ok(config) => {
        debug!("Loaded {}", path.display());
        (config, root)
      },
      Err(e) => {
        warn!("Failed to parse {}: {e}, using defaults", path.display());
        (Self::default(), root)
      },
    }
  }

  #[must_use]
  pub fn title(&self) -> &str {
    self.book.title.as_deref().unwrap_or(DEFAULT_TITLE)
  }

  #[must_use]
  pub fn description(&self) -> &str {
    self
      .book
      .description
      .as_deref()
      .unwrap_or(DEFAULT_DESCRIPTION)
  }

  #[must_use]
  pub fn language(&self) -> &str {
    self.book.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
  }

  /// Markdown source directory, relative to the book root.
  #[must_use]
  pub fn src_dir(&self) -> &Path {
    self
      .book
      .src
      .as_deref()
      .unwrap_or_else(|| Path::new(DEFAULT_SRC))
  }

  /// `output.html.git-repository-url`, if set.
  #[must_use]
  pub fn repository_url(&self) -> Option<&str> {
    self
      .html_output()?
      .get("git-repository-url")?
      .as_str()
  }

  /// Whether the book has search enabled (`output.html.search.enable`,
  /// on unless disabled).
  #[must_use]
  pub fn search_enabled(&self) -> bool {
    self
      .html_output()
      .and_then(|html| html.get("search"))
      .and_then(toml::Value::as_table)
      .and_then(|search| search.get("enable"))
      .and_then(toml::Value::as_bool)
      .unwrap_or(true)
  }

  fn html_output(&self) -> Option<&toml::Table> {
    self.output.get("html")?.as_table()
  }
}

/// Locate `book.toml`: first directly in `root`, then anywhere below it.
///
/// The walk is sorted by file name so the result is stable; hidden and build
/// directories are skipped.
#[must_use]
pub fn find_book_toml(root: &Path) -> Option<PathBuf> {
  let direct = root.join(BOOK_TOML);
  if direct.is_file() {
    return Some(direct);
  }

  WalkDir::new(root)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| {
      let name = entry.file_name().to_string_lossy();
      !(entry.file_type().is_dir()
        && (name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())))
    })
    .filter_map(Result::ok)
    .find(|entry| entry.file_type().is_file() && entry.file_name() == BOOK_TOML)
    .map(walkdir::DirEntry::into_path)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_parse_full_book() {
    let config = BookConfig::parse(
      r#"
[book]
title = "The Book"
authors = ["Ferris"]
language = "zh-CN"
src = "content"
text-direction = "ltr"

[build]
build-dir = "out"
create-missing = false

[preprocessor.links]

[output.html]
git-repository-url = "https://github.com/rust-lang/book"

[output.html.search]
enable = false
"#,
    )
    .expect("valid book.toml");

    assert_eq!(config.title(), "The Book");
    assert_eq!(config.language(), "zh-CN");
    assert_eq!(config.src_dir(), Path::new("content"));
    assert_eq!(config.book.authors, vec!["Ferris"]);
    assert_eq!(config.book.text_direction.as_deref(), Some("ltr"));
    assert_eq!(config.build.build_dir, Some(PathBuf::from("out")));
    assert!(config.preprocessor.contains_key("links"));
    assert_eq!(
      config.repository_url(),
      Some("https://github.com/rust-lang/book")
    );
    assert!(!config.search_enabled());
  }

  #[test]
  fn test_defaults() {
    let config = BookConfig::parse("").expect("empty book.toml");
    assert_eq!(config.title(), "Documentation");
    assert_eq!(config.language(), "en");
    assert_eq!(config.src_dir(), Path::new("src"));
    assert!(config.repository_url().is_none());
    assert!(config.search_enabled());
  }

  #[test]
  fn test_find_book_toml_in_subdirectory() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join("node_modules/pkg")).expect("mkdir");
    fs::write(dir.path().join("node_modules/pkg/book.toml"), "").expect("write");
    fs::create_dir_all(dir.path().join("docs/guide")).expect("mkdir");
    fs::write(dir.path().join("docs/guide/book.toml"), "").expect("write");

    assert_eq!(
      find_book_toml(dir.path()),
      Some(dir.path().join("docs/guide/book.toml"))
    );
  }

  #[test]
  fn test_load_missing_uses_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config, root) = BookConfig::load(dir.path());
    assert_eq!(config.title(), "Documentation");
    assert_eq!(root, dir.path());
  }

  #[test]
  fn test_load_broken_uses_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("book.toml"), "[book\ntitle = ").expect("write");
    let (config, root) = BookConfig::load(dir.path());
    assert_eq!(config.title(), "Documentation");
    assert_eq!(root, dir.path());
  }
}
