use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result};
use fs_extra::dir::CopyOptions;
use log::{debug, warn};
use walkdir::WalkDir;

/// Extensions of static assets, served from VitePress' `public/` directory.
const ASSET_EXTENSIONS: &[&str] =
  &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "pdf"];

/// Extensions of plain documents copied alongside the pages.
const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "json", "yaml", "yml", "toml"];

/// How a file found in the book's source directory is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
  Markdown,
  Asset,
  Document,
  Other,
}

impl FileKind {
  /// Classify a path by its (case-insensitive) extension.
  #[must_use]
  pub fn classify(path: &Path) -> Self {
    let Some(ext) = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase)
    else {
      return Self::Other;
    };

    if ext == "md" {
      Self::Markdown
    } else if ASSET_EXTENSIONS.contains(&ext.as_str()) {
      Self::Asset
    } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
      Self::Document
    } else {
      Self::Other
    }
  }
}

/// Files copied by [`copy_book_files`].
#[derive(Debug, Default)]
pub struct CopiedFiles {
  pub assets:    Vec<PathBuf>,
  pub documents: Vec<PathBuf>,
}

/// Copy the non-markdown files of a book.
///
/// Assets go below `asset_dir` and documents below `document_dir`, both
/// keeping their path relative to `src_dir`. Other files are ignored. A file
/// that cannot be copied is logged and skipped.
#[must_use]
pub fn copy_book_files(
  src_dir: &Path,
  asset_dir: &Path,
  document_dir: &Path,
) -> CopiedFiles {
  let mut copied = CopiedFiles::default();

  for entry in WalkDir::new(src_dir)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
    .filter(|entry| entry.file_type().is_file())
  {
    let path = entry.path();
    let Ok(rel) = path.strip_prefix(src_dir) else {
      continue;
    };

    let (dest_root, list) = match FileKind::classify(path) {
      FileKind::Asset => (asset_dir, &mut copied.assets),
      FileKind::Document => (document_dir, &mut copied.documents),
      FileKind::Markdown | FileKind::Other => continue,
    };

    let dest = dest_root.join(rel);
    match copy_file(path, &dest) {
      Ok(()) => {
        debug!("Copied {} to {}", path.display(), dest.display());
        list.push(dest);
      },
      Err(e) => warn!("Skipping {}: {e:#}", path.display()),
    }
  }

  copied
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }
  fs::copy(source, dest)
    .map(|_| ())
    .wrap_err_with(|| format!("Failed to copy to {}", dest.display()))
}

/// Copy the directory of included source files into `target_dir`.
///
/// `dir` is resolved against `source_root` when relative. The directory
/// itself is copied, so `listings/` ends up as `<target_dir>/listings/`. A
/// missing directory is logged and `None` is returned.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be copied.
pub fn copy_including_files(
  source_root: &Path,
  dir: &Path,
  target_dir: &Path,
) -> Result<Option<PathBuf>> {
  let source = source_root.join(dir);
  if !source.is_dir() {
    warn!(
      "Including files directory not found, skipping: {}",
      source.display()
    );
    return Ok(None);
  }

  fs::create_dir_all(target_dir).wrap_err_with(|| {
    format!("Failed to create directory: {}", target_dir.display())
  })?;

  let options = CopyOptions::new().overwrite(true);
  fs_extra::dir::copy(&source, target_dir, &options).wrap_err_with(|| {
    format!(
      "Failed to copy {} to {}",
      source.display(),
      target_dir.display()
    )
  })?;

  Ok(source.file_name().map(|name| target_dir.join(name)))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_classify() {
    assert_eq!(FileKind::classify(Path::new("a/b.md")), FileKind::Markdown);
    assert_eq!(FileKind::classify(Path::new("logo.PNG")), FileKind::Asset);
    assert_eq!(FileKind::classify(Path::new("manual.pdf")), FileKind::Asset);
    assert_eq!(FileKind::classify(Path::new("data.yml")), FileKind::Document);
    assert_eq!(FileKind::classify(Path::new("main.rs")), FileKind::Other);
    assert_eq!(FileKind::classify(Path::new("Makefile")), FileKind::Other);
  }

  #[test]
  fn test_copy_book_files() {
    let src = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(src.path().join("img")).expect("mkdir");
    fs::write(src.path().join("img/logo.svg"), "<svg/>").expect("write");
    fs::write(src.path().join("data.json"), "{}").expect("write");
    fs::write(src.path().join("intro.md"), "# Intro").expect("write");
    fs::write(src.path().join("build.rs"), "fn main() {}").expect("write");

    let public = out.path().join("public");
    let copied = copy_book_files(src.path(), &public, out.path());

    assert_eq!(copied.assets, vec![public.join("img/logo.svg")]);
    assert_eq!(copied.documents, vec![out.path().join("data.json")]);
    assert!(!out.path().join("intro.md").exists());
    assert!(!out.path().join("build.rs").exists());
  }

  #[test]
  fn test_copy_including_files() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(root.path().join("listings/ch01")).expect("mkdir");
    fs::write(root.path().join("listings/ch01/main.rs"), "fn main() {}")
      .expect("write");

    let copied =
      copy_including_files(root.path(), Path::new("listings"), out.path())
        .expect("copy");
    assert_eq!(copied, Some(out.path().join("listings")));
    assert!(out.path().join("listings/ch01/main.rs").is_file());

    let missing =
      copy_including_files(root.path(), Path::new("nope"), out.path())
        .expect("missing directory is not an error");
    assert!(missing.is_none());
  }
}
