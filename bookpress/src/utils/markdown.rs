use std::{
  fs,
  path::{Path, PathBuf},
};

use bookpress_markdown::{
  DocumentContext,
  Pipeline,
  utils::collect_markdown_files,
};
use color_eyre::eyre::{Context, Result};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{debug, error, info};
use rayon::prelude::*;

/// The table of contents; it becomes the sidebar instead of a page.
pub const SUMMARY_FILE: &str = "SUMMARY.md";

const PROGRESS_TEMPLATE: &str =
  "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Outcome of converting a directory of markdown files.
#[derive(Debug, Default)]
pub struct ConversionReport {
  /// Output paths of the converted files, sorted.
  pub converted: Vec<PathBuf>,
  /// Source files that could not be read, converted or written.
  pub failed:    Vec<PathBuf>,
}

/// Convert a single markdown file and return the converted text.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the pipeline fails.
pub fn convert_file(pipeline: &Pipeline, source: &Path) -> Result<String> {
  let content = fs::read_to_string(source).wrap_err_with(|| {
    format!("Failed to read markdown file: {}", source.display())
  })?;

  pipeline
    .convert(&content, &DocumentContext::new(source))
    .wrap_err_with(|| format!("Failed to convert {}", source.display()))
}

/// Convert `source` and write the result to `dest`, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be read, converted or written.
pub fn convert_file_to(
  pipeline: &Pipeline,
  source: &Path,
  dest: &Path,
) -> Result<()> {
  let converted = convert_file(pipeline, source)?;

  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create output directory: {}", parent.display())
    })?;
  }

  fs::write(dest, converted)
    .wrap_err_with(|| format!("Failed to write {}", dest.display()))
}

/// Convert every markdown file below `src_dir` into `out_dir`, keeping the
/// relative layout.
///
/// The top-level `SUMMARY.md` is skipped. Files are converted in parallel on
/// a dedicated pool of `jobs` threads (all cores by default); a file that
/// fails is logged and reported in [`ConversionReport::failed`] without
/// stopping the others.
///
/// # Errors
///
/// Returns an error if the thread pool cannot be created.
pub fn convert_markdown_files(
  pipeline: &Pipeline,
  src_dir: &Path,
  out_dir: &Path,
  jobs: Option<usize>,
) -> Result<ConversionReport> {
  let files: Vec<PathBuf> = collect_markdown_files(src_dir)
    .into_iter()
    .filter(|path| path != &src_dir.join(SUMMARY_FILE))
    .collect();
  info!("Found {} markdown files in {}", files.len(), src_dir.display());

  let thread_count = jobs.unwrap_or_else(num_cpus::get).max(1);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build()
    .wrap_err("Failed to create thread pool")?;
  debug!("Converting with {thread_count} threads");

  let progress = progress_bar(files.len());

  let results: Vec<(PathBuf, Result<PathBuf>)> = pool.install(|| {
    files
      .par_iter()
      .progress_with(progress.clone())
      .map(|source| {
        let result = source
          .strip_prefix(src_dir)
          .wrap_err_with(|| {
            format!("{} is outside {}", source.display(), src_dir.display())
          })
          .map(|rel| out_dir.join(rel))
          .and_then(|dest| {
            convert_file_to(pipeline, source, &dest).map(|()| dest)
          });
        (source.clone(), result)
      })
      .collect()
  });
  progress.finish_and_clear();

  let mut report = ConversionReport::default();
  for (source, result) in results {
    match result {
      Ok(dest) => report.converted.push(dest),
      Err(e) => {
        error!("Skipping {}: {e:#}", source.display());
        report.failed.push(source);
      },
    }
  }
  report.converted.sort();

  info!(
    "Converted {} markdown files ({} failed)",
    report.converted.len(),
    report.failed.len()
  );
  Ok(report)
}

fn progress_bar(len: usize) -> ProgressBar {
  let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
  let bar =
    ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX)).with_style(style);
  bar.set_message("converting");
  bar
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_convert_directory() {
    let src = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(src.path().join("guide")).expect("mkdir");
    fs::write(src.path().join("SUMMARY.md"), "- [A](a.md)").expect("write");
    fs::write(src.path().join("a.md"), "```rust,editable\nfn main() {}\n```")
      .expect("write");
    fs::write(src.path().join("guide/b.md"), "![x](./x.png)").expect("write");

    let pipeline = Pipeline::default();
    let report =
      convert_markdown_files(&pipeline, src.path(), out.path(), Some(2))
        .expect("conversion");

    assert_eq!(report.converted, vec![
      out.path().join("a.md"),
      out.path().join("guide/b.md"),
    ]);
    assert!(report.failed.is_empty());
    assert!(!out.path().join("SUMMARY.md").exists());
    assert_eq!(
      fs::read_to_string(out.path().join("a.md")).expect("read"),
      "```rust\nfn main() {}\n```"
    );
    assert_eq!(
      fs::read_to_string(out.path().join("guide/b.md")).expect("read"),
      "![x](/x.png)"
    );
  }

  #[test]
  fn test_failed_file_is_skipped() {
    let src = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(src.path().join("good.md"), "# Good").expect("write");
    fs::write(src.path().join("bad.md"), [0xff, 0xfe, 0x00]).expect("write");

    let report =
      convert_markdown_files(&Pipeline::default(), src.path(), out.path(), None)
        .expect("conversion");

    assert_eq!(report.converted, vec![out.path().join("good.md")]);
    assert_eq!(report.failed, vec![src.path().join("bad.md")]);
  }
}
