use std::{
  fs,
  path::{Path, PathBuf},
};

use bookpress_config::{PackageManifest, VitePressConfig, vitepress};
use color_eyre::eyre::{Context, Result};
use log::info;
use tera::Tera;

/// Tagline of the generated home page.
const DEFAULT_TAGLINE: &str = "Welcome to the documentation";

/// First chapter linked from the home page when the book has none.
pub const DEFAULT_FIRST_CHAPTER: &str = "/README";

/// Values shown on the generated VitePress home page.
#[derive(Debug, Clone)]
pub struct HomePage {
  pub title:         String,
  pub description:   String,
  pub tagline:       String,
  pub first_chapter: String,
  pub repository:    Option<String>,
}

impl HomePage {
  #[must_use]
  pub fn new(title: &str, description: &str) -> Self {
    Self {
      title:         title.to_string(),
      description:   description.to_string(),
      tagline:       DEFAULT_TAGLINE.to_string(),
      first_chapter: DEFAULT_FIRST_CHAPTER.to_string(),
      repository:    None,
    }
  }

  /// Render the page from the embedded template.
  ///
  /// # Errors
  ///
  /// Returns an error if the template fails to render.
  pub fn render(&self) -> Result<String> {
    let mut tera = Tera::default();
    tera
      .add_raw_template("index.md", bookpress_templates::HOME_PAGE_TEMPLATE)
      .wrap_err("Failed to load home page template")?;

    let mut context = tera::Context::new();
    context.insert("title", &yaml_quoted(&self.title));
    context.insert("description", &yaml_quoted(&self.description));
    context.insert("tagline", &yaml_quoted(&self.tagline));
    context.insert("first_chapter", &self.first_chapter);
    context.insert("repository", &self.repository);

    tera
      .render("index.md", &context)
      .wrap_err("Failed to render home page")
  }
}

/// Escape a value placed between double quotes in YAML front matter.
fn yaml_quoted(value: &str) -> String {
  value
    .replace('\\', "\\\\")
    .replace('"', "\\\"")
    .replace('\n', " ")
}

/// Write `index.md` into `docs_dir`.
///
/// An existing page is kept unless `overwrite` is set. Returns whether the
/// page was written.
///
/// # Errors
///
/// Returns an error if the page cannot be rendered or written.
pub fn write_home_page(
  docs_dir: &Path,
  page: &HomePage,
  overwrite: bool,
) -> Result<bool> {
  let index_path = docs_dir.join("index.md");
  if index_path.exists() && !overwrite {
    info!("Keeping existing home page: {}", index_path.display());
    return Ok(false);
  }

  fs::write(&index_path, page.render()?).wrap_err_with(|| {
    format!("Failed to write home page: {}", index_path.display())
  })?;
  info!("Created home page: {}", index_path.display());
  Ok(true)
}

/// Write `.vitepress/config.mts` below `docs_dir`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be rendered or written.
pub fn write_vitepress_config(
  docs_dir: &Path,
  config: &VitePressConfig,
) -> Result<PathBuf> {
  let path = docs_dir.join(vitepress::CONFIG_PATH);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }

  let source = config
    .render()
    .wrap_err("Failed to render VitePress configuration")?;
  fs::write(&path, source)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

  info!("Wrote VitePress configuration: {}", path.display());
  Ok(path)
}

/// Write `package.json` into `target_dir`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be serialized or written.
pub fn write_package_json(
  target_dir: &Path,
  manifest: &PackageManifest,
) -> Result<PathBuf> {
  let path = target_dir.join("package.json");
  let json = manifest
    .to_json()
    .wrap_err("Failed to serialize package.json")?;
  fs::write(&path, json)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

  info!("Wrote {}", path.display());
  Ok(path)
}
