#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::PathBuf};

use bookpress_config::{Config, ConfigError};
use bookpress_markdown::IncludeMode;

#[test]
fn test_from_toml_and_json() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir");

  let toml_path = dir.path().join("bookpress.toml");
  fs::write(
    &toml_path,
    "source_dir = \"book\"\ninclude_mode = \"inline\"\njobs = 2\n",
  )
  .expect("write");
  let config = Config::from_file(&toml_path).expect("toml config");
  assert_eq!(config.source_dir, Some(PathBuf::from("book")));
  assert_eq!(config.include_mode, IncludeMode::Inline);
  assert_eq!(config.jobs, Some(2));
  assert!(config.generate_nav, "unset fields keep their defaults");

  let json_path = dir.path().join("bookpress.json");
  fs::write(&json_path, r#"{ "files_only": true, "base_path": "/zh" }"#)
    .expect("write");
  let config = Config::from_file(&json_path).expect("json config");
  assert!(config.files_only);
  assert_eq!(config.base_path.as_deref(), Some("/zh"));
}

#[test]
fn test_unsupported_extension() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir");
  let path = dir.path().join("bookpress.yaml");
  fs::write(&path, "files_only: true").expect("write");

  let err = Config::from_file(&path).expect_err("yaml is not supported");
  assert!(matches!(err, ConfigError::Config(_)));
  assert!(err.to_string().contains("Unsupported config file format"));
}

#[test]
fn test_load_merges_files_then_overrides() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir");
  let first = dir.path().join("a.toml");
  let second = dir.path().join("b.toml");
  fs::write(&first, "source_dir = \"book\"\nbase_path = \"/en\"\n")
    .expect("write");
  fs::write(&second, "base_path = \"/zh\"\n").expect("write");

  let config = Config::load(&[first, second], &["jobs=3".to_string()])
    .expect("load");

  assert_eq!(config.source_dir, Some(PathBuf::from("book")));
  assert_eq!(config.base_path.as_deref(), Some("/zh"));
  assert_eq!(config.jobs, Some(3));
}

#[test]
fn test_later_file_keeps_settings_it_does_not_set() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir");
  let first = dir.path().join("a.toml");
  let second = dir.path().join("b.json");
  fs::write(&first, "include_mode = \"inline\"\ngenerate_nav = false\n")
    .expect("write");
  fs::write(&second, r#"{ "target_dir": "out" }"#).expect("write");

  let config = Config::load(&[first, second], &[]).expect("load");

  assert_eq!(config.include_mode, IncludeMode::Inline);
  assert!(!config.generate_nav);
  assert_eq!(config.target_dir, Some(PathBuf::from("out")));
}

#[test]
fn test_default_templates_parse() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir");

  for format in ["toml", "json"] {
    let path = dir.path().join(format!("bookpress.{format}"));
    Config::generate_default_config(format, &path).expect("generate");
    let config = Config::from_file(&path).expect("template parses");
    assert_eq!(config, Config::default());
  }

  let err = Config::generate_default_config("yaml", &dir.path().join("x"))
    .expect_err("unsupported format");
  assert!(matches!(err, ConfigError::Template(_)));
}

#[test]
fn test_find_config_file_in() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir");
  assert!(Config::find_config_file_in(dir.path()).is_none());

  fs::write(dir.path().join(".bookpress.toml"), "").expect("write");
  fs::write(dir.path().join("bookpress.json"), "{}").expect("write");
  assert_eq!(
    Config::find_config_file_in(dir.path()),
    Some(dir.path().join("bookpress.json"))
  );
}
