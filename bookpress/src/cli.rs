use std::path::PathBuf;

use bookpress_config::Config;
use bookpress_markdown::IncludeMode;
use clap::{Parser, Subcommand};

/// Command line interface for bookpress
#[derive(Parser, Debug)]
#[command(author, version, about = "bookpress: move an mdBook to VitePress")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the bookpress CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Convert an mdBook project into a VitePress project.
  Migrate {
    /// Directory to write the VitePress project to.
    target: Option<PathBuf>,

    /// Root of the mdBook project. Defaults to the current directory.
    source: Option<PathBuf>,

    /// Only convert markdown and copy assets, without generating a VitePress
    /// project around them.
    #[arg(long)]
    files_only: bool,

    /// Do not generate the top navigation bar.
    #[arg(long)]
    no_nav: bool,

    /// How to handle `{{#include}}` directives.
    #[arg(long, value_parser = parse_include_mode)]
    include_mode: Option<IncludeMode>,

    /// Directory with files referenced by includes, copied next to `docs/`.
    #[arg(short = 'i', long)]
    including_files_dir: Option<PathBuf>,

    /// Prefix for all sidebar links, e.g. `/zh`.
    #[arg(long)]
    base_path: Option<String>,

    /// Number of threads to use for parallel processing.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,
  },

  /// Convert a single markdown file and print the result.
  Convert {
    /// Markdown file to convert.
    file: PathBuf,

    /// Write the result to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How to handle `{{#include}}` directives.
    #[arg(long, value_parser = parse_include_mode)]
    include_mode: Option<IncludeMode>,
  },

  /// Parse a SUMMARY.md and print the table of contents as JSON.
  Summary {
    /// The SUMMARY.md file.
    file: PathBuf,

    /// Print the VitePress sidebar instead of the raw table of contents.
    #[arg(long)]
    sidebar: bool,

    /// Prefix for all sidebar links.
    #[arg(long, requires = "sidebar")]
    base_path: Option<String>,
  },

  /// Initialize a new bookpress configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "bookpress.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

fn parse_include_mode(value: &str) -> Result<IncludeMode, String> {
  value.parse()
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

impl Commands {
  /// Apply explicit `migrate` flags on top of a loaded configuration.
  ///
  /// Flags that were not given leave the configuration untouched. Other
  /// commands carry no configuration flags.
  pub fn merge_into(&self, config: &mut Config) {
    if let Self::Migrate {
      target,
      source,
      files_only,
      no_nav,
      include_mode,
      including_files_dir,
      base_path,
      jobs,
    } = self
    {
      if let Some(target) = target {
        config.target_dir = Some(target.clone());
      }
      if let Some(source) = source {
        config.source_dir = Some(source.clone());
      }
      if *files_only {
        config.files_only = true;
      }
      if *no_nav {
        config.generate_nav = false;
      }
      if let Some(mode) = include_mode {
        config.include_mode = *mode;
      }
      if let Some(dir) = including_files_dir {
        config.including_files_dir = Some(dir.clone());
      }
      if let Some(base) = base_path {
        config.base_path = Some(base.clone());
      }
      if let Some(jobs) = jobs {
        config.jobs = Some(*jobs);
      }
    }
  }
}
