use std::{fs, io::Write as _};

use bookpress::{
  cli::{Cli, Commands},
  migrate, utils,
};
use bookpress_config::{Config, sidebar::build_sidebar};
use bookpress_markdown::{Pipeline, parse_summary};
use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info, warn};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;

      info!(
        "Configuration file created successfully. Edit it to customize the \
         migration."
      );
      Ok(())
    },

    Commands::Convert {
      file,
      output,
      include_mode,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      let pipeline = Pipeline::new(include_mode.unwrap_or(config.include_mode));

      if let Some(output) = output {
        utils::convert_file_to(&pipeline, file, output)?;
        info!("Wrote {}", output.display());
      } else {
        let converted = utils::convert_file(&pipeline, file)?;
        write_stdout(&converted)?;
      }
      Ok(())
    },

    Commands::Summary {
      file,
      sidebar,
      base_path,
    } => {
      let content = fs::read_to_string(file)
        .wrap_err_with(|| format!("Failed to read {}", file.display()))?;
      let toc = parse_summary(&content);

      let json = if *sidebar {
        let items = build_sidebar(&toc, base_path.as_deref());
        serde_json::to_string_pretty(&items)
      } else {
        serde_json::to_string_pretty(&toc)
      }
      .wrap_err("Failed to serialize table of contents")?;

      write_stdout(&format!("{json}\n"))
    },

    Commands::Migrate { .. } => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
      cli.command.merge_into(&mut config);

      let report = migrate::migrate(&config)?;
      if !report.failed.is_empty() {
        warn!(
          "{} files could not be converted, see the errors above",
          report.failed.len()
        );
      }
      info!("Pages written to {}", report.pages_dir.display());
      Ok(())
    },
  }
}

fn write_stdout(text: &str) -> Result<()> {
  let mut stdout = std::io::stdout().lock();
  stdout
    .write_all(text.as_bytes())
    .and_then(|()| stdout.flush())
    .wrap_err("Failed to write to stdout")
}
