use std::{
  fs,
  path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use bookpress::cli::Cli;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

const BIN_NAME: &str = "bookpress";

/// Shells completions are generated for.
const SHELLS: [Shell; 4] =
  [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the bookpress CLI
  Dist {
    /// Output directory for generated files.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Only generate shell completions.
    #[arg(long, conflicts_with = "manpage_only")]
    completions_only: bool,

    /// Only generate manpage.
    #[arg(long, conflicts_with = "completions_only")]
    manpage_only: bool,
  },

  /// Write the embedded templates to a directory, e.g. to review them after
  /// editing.
  Templates {
    /// Directory to write the templates to.
    #[arg(short, long, default_value = "dist/templates")]
    output_dir: PathBuf,

    /// Overwrite existing files.
    #[arg(short, long)]
    force: bool,
  },
}

fn main() -> Result<()> {
  match Xtask::parse().command {
    Commands::Dist {
      output_dir,
      completions_only,
      manpage_only,
    } => {
      if !manpage_only {
        generate_completions(&output_dir)?;
      }
      if !completions_only {
        generate_manpage(&output_dir)?;
      }
    },
    Commands::Templates { output_dir, force } => {
      export_templates(&output_dir, force)?;
    },
  }

  Ok(())
}

/// Generate shell completions for every shell in [`SHELLS`].
fn generate_completions(output_dir: &Path) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir)?;

  let mut cmd = Cli::command();
  for shell in SHELLS {
    let path = generate_to(shell, &mut cmd, BIN_NAME, &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
    println!("Generated {}", path.display());
  }
  Ok(())
}

/// Generate the `bookpress(1)` manpage.
fn generate_manpage(output_dir: &Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)?;

  let file_path = man_dir.join(format!("{BIN_NAME}.1"));
  let mut file = fs::File::create(&file_path).with_context(|| {
    format!("Failed to create manpage file at {}", file_path.display())
  })?;
  Man::new(Cli::command())
    .render(&mut file)
    .context("Failed to render manpage")?;
  println!("Generated {}", file_path.display());
  Ok(())
}

fn export_templates(output_dir: &Path, force: bool) -> Result<()> {
  fs::create_dir_all(output_dir)?;

  let mut templates: Vec<_> =
    bookpress_templates::all_templates().into_iter().collect();
  templates.sort_unstable_by_key(|(name, _)| *name);

  for (name, content) in templates {
    let path = output_dir.join(name);
    if path.exists() && !force {
      bail!("{} already exists, use --force to overwrite", path.display());
    }
    fs::write(&path, content)
      .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
  }
  Ok(())
}
