//! Turns an mdBook project into a VitePress project.
//!
//! The generated layout is:
//!
//! ```text
//! <target>/
//! ├── package.json
//! ├── <including files dir>/    (optional)
//! └── docs/
//!     ├── .vitepress/config.mts
//!     ├── public/               (images and other static assets)
//!     ├── index.md              (home page)
//!     └── ...                   (converted chapters)
//! ```

use std::{
  fs,
  path::{Path, PathBuf},
};

use bookpress_config::{
  BookConfig,
  Config,
  PackageManifest,
  VitePressConfig,
  sidebar::{
    SidebarItem,
    build_nav,
    build_sidebar,
    first_chapter_link,
  },
};
use bookpress_markdown::{Pipeline, parse_summary};
use color_eyre::eyre::{Context, Result, bail};
use log::{info, warn};

use crate::utils::{
  self,
  markdown::SUMMARY_FILE,
  output::{DEFAULT_FIRST_CHAPTER, HomePage},
};

/// Directory below the target that VitePress serves.
pub const DOCS_DIR: &str = "docs";

/// Static assets directory below [`DOCS_DIR`].
pub const PUBLIC_DIR: &str = "public";

/// What a migration produced.
#[derive(Debug, Default)]
pub struct MigrationReport {
  /// Directory the converted pages were written to.
  pub pages_dir:       PathBuf,
  pub converted:       Vec<PathBuf>,
  pub failed:          Vec<PathBuf>,
  pub assets:          Vec<PathBuf>,
  pub documents:       Vec<PathBuf>,
  /// Number of sidebar entries, nested ones included.
  pub sidebar_entries: usize,
  pub config_file:     Option<PathBuf>,
  pub package_json:    Option<PathBuf>,
  pub home_page:       bool,
  pub including_files: Option<PathBuf>,
}

/// Run a migration as described by `config`.
///
/// # Errors
///
/// Returns an error if no target directory is configured, the source
/// directory does not exist, or a project file cannot be written. Single
/// pages that fail to convert are reported, not returned as errors.
pub fn migrate(config: &Config) -> Result<MigrationReport> {
  let Some(target_dir) = config.target_dir.as_deref() else {
    bail!("No target directory given");
  };
  let source_dir = config
    .source_dir
    .clone()
    .unwrap_or_else(|| PathBuf::from("."));
  if !source_dir.is_dir() {
    bail!("Source directory not found: {}", source_dir.display());
  }

  let (book, root) = BookConfig::load(&source_dir);
  let src_dir = root.join(book.src_dir());
  if !src_dir.is_dir() {
    bail!("Book source directory not found: {}", src_dir.display());
  }
  info!("Migrating \"{}\" from {}", book.title(), src_dir.display());

  let pipeline = Pipeline::new(config.include_mode);

  if config.files_only {
    return convert_files(&pipeline, &src_dir, target_dir, target_dir, config);
  }

  let docs_dir = target_dir.join(DOCS_DIR);
  fs::create_dir_all(docs_dir.join(".vitepress")).wrap_err_with(|| {
    format!("Failed to create target directory: {}", docs_dir.display())
  })?;
  info!("Created target directory: {}", docs_dir.display());

  let mut report = convert_files(
    &pipeline,
    &src_dir,
    &docs_dir,
    &docs_dir.join(PUBLIC_DIR),
    config,
  )?;

  let sidebar = load_sidebar(&src_dir, config.base_path.as_deref());
  report.sidebar_entries =
    sidebar.iter().map(|item| item.iter().count()).sum();

  let metadata = pipeline.metadata();

  let mut site = VitePressConfig::from_book(&book);
  site.base.clone_from(&config.site_base);
  if config.generate_nav {
    site.nav = Some(build_nav(&sidebar, config.base_path.as_deref()));
  }
  site.sidebar.clone_from(&sidebar);
  site.merge_extra(metadata.required_config);
  report.config_file =
    Some(utils::write_vitepress_config(&docs_dir, &site)?);

  let mut manifest = PackageManifest::new(book.description());
  manifest.add_dev_dependencies(metadata.required_dependencies);
  report.package_json =
    Some(utils::write_package_json(target_dir, &manifest)?);

  let mut home = HomePage::new(book.title(), book.description());
  home.first_chapter = first_chapter_link(&sidebar)
    .unwrap_or(DEFAULT_FIRST_CHAPTER)
    .to_string();
  home.repository = book.repository_url().map(ToString::to_string);
  report.home_page =
    utils::write_home_page(&docs_dir, &home, config.overwrite_home_page)?;

  if let Some(dir) = &config.including_files_dir {
    report.including_files =
      utils::copy_including_files(&root, dir, target_dir)?;
  }

  info!(
    "Migration complete: {} pages, {} assets, {} sidebar entries",
    report.converted.len(),
    report.assets.len(),
    report.sidebar_entries
  );
  Ok(report)
}

/// Convert the pages and copy the assets and documents of a book.
fn convert_files(
  pipeline: &Pipeline,
  src_dir: &Path,
  pages_dir: &Path,
  asset_dir: &Path,
  config: &Config,
) -> Result<MigrationReport> {
  fs::create_dir_all(pages_dir).wrap_err_with(|| {
    format!("Failed to create directory: {}", pages_dir.display())
  })?;

  let conversion =
    utils::convert_markdown_files(pipeline, src_dir, pages_dir, config.jobs)?;
  let copied = utils::copy_book_files(src_dir, asset_dir, pages_dir);

  Ok(MigrationReport {
    pages_dir: pages_dir.to_path_buf(),
    converted: conversion.converted,
    failed: conversion.failed,
    assets: copied.assets,
    documents: copied.documents,
    ..MigrationReport::default()
  })
}

/// Sidebar from the book's `SUMMARY.md`; empty when there is none.
fn load_sidebar(src_dir: &Path, base_path: Option<&str>) -> Vec<SidebarItem> {
  let summary_path = src_dir.join(SUMMARY_FILE);
  match fs::read_to_string(&summary_path) {
    Ok(content) => build_sidebar(&parse_summary(&content), base_path),
    Err(e) => {
      warn!(
        "Could not read {}: {e}, generating an empty sidebar",
        summary_path.display()
      );
      Vec::new()
    },
  }
}
