use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use bookpress_markdown::IncludeMode;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::ConfigError;

/// File names searched for a configuration file, in order.
const CONFIG_FILENAMES: &[&str] = &[
  "bookpress.toml",
  "bookpress.json",
  ".bookpress.toml",
  ".bookpress.json",
  ".config/bookpress.toml",
  ".config/bookpress.json",
];

/// Configuration for a bookpress migration.
///
/// Fields are typically loaded from a TOML or JSON config file, then
/// adjusted by `--config KEY=VALUE` overrides and finally by CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Root of the mdBook project (the directory holding `book.toml`).
  pub source_dir: Option<PathBuf>,

  /// Directory the VitePress project is written to.
  pub target_dir: Option<PathBuf>,

  /// How `{{#include}}` directives are handled.
  pub include_mode: IncludeMode,

  /// Only convert files, without generating a VitePress project around them.
  pub files_only: bool,

  /// Whether to generate a top navigation bar.
  pub generate_nav: bool,

  /// Directory of included source files, copied next to `docs/` so that
  /// translated imports keep resolving.
  pub including_files_dir: Option<PathBuf>,

  /// Prefix for every sidebar link, e.g. `/zh` for a localized book.
  pub base_path: Option<String>,

  /// Public base URL of the site, emitted as VitePress `base`.
  pub site_base: Option<String>,

  /// Number of threads used to convert files.
  pub jobs: Option<usize>,

  /// Replace an `index.md` produced by the book with the generated home page.
  pub overwrite_home_page: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      source_dir:          None,
      target_dir:          None,
      include_mode:        IncludeMode::default(),
      files_only:          false,
      generate_nav:        true,
      including_files_dir: None,
      base_path:           None,
      site_base:           None,
      jobs:                None,
      overwrite_home_page: false,
    }
  }
}

/// The settings a single config file actually sets.
///
/// Every field is optional so that merging several files only touches the
/// keys each of them spells out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
  pub source_dir:          Option<PathBuf>,
  pub target_dir:          Option<PathBuf>,
  pub include_mode:        Option<IncludeMode>,
  pub files_only:          Option<bool>,
  pub generate_nav:        Option<bool>,
  pub including_files_dir: Option<PathBuf>,
  pub base_path:           Option<String>,
  pub site_base:           Option<String>,
  pub jobs:                Option<usize>,
  pub overwrite_home_page: Option<bool>,
}

impl ConfigLayer {
  /// Load the keys set in a config file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    parse_file(path.as_ref())
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON). Keys the file does not
  /// set keep their defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    config.merge(ConfigLayer::from_file(path)?);
    Ok(config)
  }

  /// Load configuration from the given files, or a discovered one, then apply
  /// `KEY=VALUE` overrides.
  ///
  /// Multiple files are merged in order, later files taking precedence. With
  /// no files given, [`Config::find_config_file`] is consulted; without any
  /// file the defaults are used.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file cannot be loaded or an override is
  /// invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;

      for config_path in rest {
        merged_config.merge(ConfigLayer::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load discovered config from {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust
  /// use bookpress_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&["include_mode=inline".to_string(), "jobs=4".to_string()])
  ///   .unwrap();
  /// assert_eq!(config.jobs, Some(4));
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. Empty values clear optional fields.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value cannot be parsed.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "source_dir" => self.source_dir = optional_path(value),
      "target_dir" => self.target_dir = optional_path(value),
      "including_files_dir" => self.including_files_dir = optional_path(value),
      "base_path" => self.base_path = optional_string(value),
      "site_base" => self.site_base = optional_string(value),
      "files_only" => self.files_only = parse_bool(key, value)?,
      "generate_nav" => self.generate_nav = parse_bool(key, value)?,
      "overwrite_home_page" => {
        self.overwrite_home_page = parse_bool(key, value)?;
      },
      "include_mode" => {
        self.include_mode = value.parse().map_err(|e: String| {
          ConfigError::Config(format!(
            "Invalid value for '{key}': '{value}' - {e}"
          ))
        })?;
      },
      "jobs" => {
        self.jobs = if value.is_empty() {
          None
        } else {
          match value.parse::<usize>() {
            Ok(jobs) if jobs > 0 => Some(jobs),
            _ => {
              return Err(ConfigError::Config(format!(
                "Invalid value for '{key}': '{value}'. Expected a positive \
                 integer"
              )));
            },
          }
        };
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }

    Ok(())
  }

  /// Merge a config layer into this one. Every key the layer sets replaces
  /// this config's value; keys it leaves out are kept.
  pub fn merge(&mut self, layer: ConfigLayer) {
    fn merge_option<T>(target: &mut Option<T>, other: Option<T>) {
      if other.is_some() {
        *target = other;
      }
    }

    fn merge_value<T>(target: &mut T, other: Option<T>) {
      if let Some(value) = other {
        *target = value;
      }
    }

    merge_option(&mut self.source_dir, layer.source_dir);
    merge_option(&mut self.target_dir, layer.target_dir);
    merge_option(&mut self.including_files_dir, layer.including_files_dir);
    merge_option(&mut self.base_path, layer.base_path);
    merge_option(&mut self.site_base, layer.site_base);
    merge_option(&mut self.jobs, layer.jobs);
    merge_value(&mut self.include_mode, layer.include_mode);
    merge_value(&mut self.files_only, layer.files_only);
    merge_value(&mut self.generate_nav, layer.generate_nav);
    merge_value(&mut self.overwrite_home_page, layer.overwrite_home_page);
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        if let Some(found) = Self::find_config_file_in(&current_dir) {
          return Some(found);
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["bookpress.toml", "bookpress.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Search `dir` for one of the known config file names.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = match format.to_lowercase().as_str() {
      "toml" => bookpress_templates::DEFAULT_CONFIG_TOML,
      "json" => bookpress_templates::DEFAULT_CONFIG_JSON,
      _ => {
        return Err(ConfigError::Template(format!(
          "Unsupported template format: {format}"
        )));
      },
    };

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

#[allow(
  clippy::option_if_let_else,
  reason = "Clearer with explicit match on extension"
)]
fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
  let content = fs::read_to_string(path).map_err(|e| {
    ConfigError::Config(format!(
      "Failed to read config file: {}: {}",
      path.display(),
      e
    ))
  })?;

  match path.extension().and_then(|ext| ext.to_str()) {
    Some(ext) => {
      match ext.to_lowercase().as_str() {
        "json" => {
          serde_json::from_str(&content).map_err(|e| {
            ConfigError::Config(format!(
              "Failed to parse JSON config from {}: {}",
              path.display(),
              e
            ))
          })
        },
        "toml" => {
          toml::from_str(&content).map_err(|e| {
            ConfigError::Config(format!(
              "Failed to parse TOML config from {}: {}",
              path.display(),
              e
            ))
          })
        },
        _ => {
          Err(ConfigError::Config(format!(
            "Unsupported config file format: {}",
            path.display()
          )))
        },
      }
    },
    None => {
      Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )))
    },
  }
}

fn optional_path(value: &str) -> Option<PathBuf> {
  (!value.is_empty()).then(|| PathBuf::from(value))
}

fn optional_string(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert!(config.generate_nav);
    assert!(!config.files_only);
    assert_eq!(config.include_mode, IncludeMode::Translate);
    assert!(config.jobs.is_none());
  }

  #[test]
  fn test_config_merge_option_fields() {
    let mut base = Config::default();
    base.source_dir = Some(PathBuf::from("book"));

    base.merge(ConfigLayer {
      base_path: Some("/zh".to_string()),
      ..ConfigLayer::default()
    });

    assert_eq!(base.source_dir, Some(PathBuf::from("book")));
    assert_eq!(base.base_path.as_deref(), Some("/zh"));
  }

  #[test]
  fn test_config_merge_keeps_unset_plain_fields() {
    let mut base = Config::default();
    base.include_mode = IncludeMode::Inline;
    base.generate_nav = false;

    base.merge(ConfigLayer {
      files_only: Some(true),
      ..ConfigLayer::default()
    });

    assert_eq!(base.include_mode, IncludeMode::Inline);
    assert!(!base.generate_nav);
    assert!(base.files_only);

    base.merge(ConfigLayer {
      generate_nav: Some(true),
      ..ConfigLayer::default()
    });
    assert!(base.generate_nav);
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();

    config
      .apply_overrides(&[
        "include_mode=inline".to_string(),
        "generate_nav=no".to_string(),
        "base_path = /en".to_string(),
        "jobs=8".to_string(),
        "source_dir=/tmp/book".to_string(),
      ])
      .unwrap();

    assert_eq!(config.include_mode, IncludeMode::Inline);
    assert!(!config.generate_nav);
    assert_eq!(config.base_path.as_deref(), Some("/en"));
    assert_eq!(config.jobs, Some(8));
    assert_eq!(config.source_dir, Some(PathBuf::from("/tmp/book")));
  }

  #[test]
  fn test_apply_override_empty_clears_option() {
    let mut config = Config::default();
    config.jobs = Some(2);
    config.including_files_dir = Some(PathBuf::from("listings"));

    config.apply_override("jobs", "").unwrap();
    config.apply_override("including_files_dir", "").unwrap();

    assert!(config.jobs.is_none());
    assert!(config.including_files_dir.is_none());
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();
    let result = config.apply_overrides(&["no_equals_sign".to_string()]);
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();
    let result = config.apply_overrides(&["unknown_key=value".to_string()]);
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Unknown configuration key")
    );
  }

  #[test]
  fn test_apply_overrides_invalid_values() {
    let mut config = Config::default();

    let result = config.apply_override("files_only", "maybe");
    assert!(result.unwrap_err().to_string().contains("Invalid boolean"));

    let result = config.apply_override("jobs", "0");
    assert!(result.unwrap_err().to_string().contains("Invalid value"));

    let result = config.apply_override("include_mode", "copy");
    assert!(result.unwrap_err().to_string().contains("Invalid value"));
  }
}
