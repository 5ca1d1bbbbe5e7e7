//! The generated `.vitepress/config.mts`.
//!
//! The configuration is assembled as a JSON object and printed as a
//! TypeScript object literal:
//!
//! ```text
//! import { defineConfig } from 'vitepress'
//!
//! export default defineConfig({
//!   title: 'My Book',
//!   themeConfig: {
//!     sidebar: [ ... ]
//!   }
//! })
//! ```

use std::fmt::Write as _;

use bookpress_markdown::transformer::types::merge_objects;
use serde_json::{Map, Value};

use crate::{
  book::BookConfig,
  error::ConfigError,
  sidebar::{NavItem, SidebarItem},
};

/// Where the config module is written, relative to `docs/`.
pub const CONFIG_PATH: &str = ".vitepress/config.mts";

const INDENT: &str = "  ";

/// Site configuration for VitePress `defineConfig`.
#[derive(Debug, Clone, Default)]
pub struct VitePressConfig {
  pub title:          String,
  pub description:    String,
  pub lang:           String,
  /// Public base URL (`base`).
  pub base:           Option<String>,
  pub nav:            Option<Vec<NavItem>>,
  pub sidebar:        Vec<SidebarItem>,
  /// Repository linked from the navigation bar.
  pub repository_url: Option<String>,
  /// Enable VitePress' built-in local search.
  pub local_search:   bool,
  /// Extra top-level options, merged last.
  pub extra:          Map<String, Value>,
}

impl VitePressConfig {
  /// Site metadata taken from `book.toml`.
  #[must_use]
  pub fn from_book(book: &BookConfig) -> Self {
    Self {
      title: book.title().to_string(),
      description: book.description().to_string(),
      lang: book.language().to_string(),
      repository_url: book.repository_url().map(ToString::to_string),
      local_search: book.search_enabled(),
      ..Self::default()
    }
  }

  /// Deep-merge additional options, such as those required by the markdown
  /// transformers.
  pub fn merge_extra(&mut self, extra: Map<String, Value>) {
    merge_objects(&mut self.extra, extra);
  }

  /// The configuration object passed to `defineConfig`.
  ///
  /// # Errors
  ///
  /// Returns an error if the sidebar or navigation cannot be serialized.
  pub fn to_value(&self) -> Result<Value, ConfigError> {
    let mut theme = Map::new();
    if let Some(nav) = &self.nav {
      theme.insert("nav".to_string(), serde_json::to_value(nav)?);
    }
    theme.insert("sidebar".to_string(), serde_json::to_value(&self.sidebar)?);
    if let Some(url) = &self.repository_url {
      let mut link = Map::new();
      link.insert("icon".to_string(), Value::from("github"));
      link.insert("link".to_string(), Value::from(url.as_str()));
      theme.insert(
        "socialLinks".to_string(),
        Value::Array(vec![Value::Object(link)]),
      );
    }
    if self.local_search {
      let mut search = Map::new();
      search.insert("provider".to_string(), Value::from("local"));
      theme.insert("search".to_string(), Value::Object(search));
    }

    let mut root = Map::new();
    root.insert("title".to_string(), Value::from(self.title.as_str()));
    root.insert(
      "description".to_string(),
      Value::from(self.description.as_str()),
    );
    root.insert("lang".to_string(), Value::from(self.lang.as_str()));
    if let Some(base) = &self.base {
      root.insert("base".to_string(), Value::from(base.as_str()));
    }
    root.insert("themeConfig".to_string(), Value::Object(theme));
    merge_objects(&mut root, self.extra.clone());

    Ok(Value::Object(root))
  }

  /// Source of the `config.mts` module.
  ///
  /// # Errors
  ///
  /// Returns an error if the configuration cannot be serialized.
  pub fn render(&self) -> Result<String, ConfigError> {
    Ok(format!(
      "import {{ defineConfig }} from 'vitepress'\n\nexport default \
       defineConfig({})\n",
      format_ts_value(&self.to_value()?, 0)
    ))
  }
}

/// Print a JSON value as a TypeScript literal.
///
/// Objects and arrays are spread over multiple lines with two-space
/// indentation, empty ones stay `{}`/`[]`. Keys that are valid identifiers
/// are left bare; other keys and all strings use single quotes.
#[must_use]
pub fn format_ts_value(value: &Value, depth: usize) -> String {
  let pad = INDENT.repeat(depth);
  let inner_pad = INDENT.repeat(depth + 1);

  match value {
    Value::Array(items) if items.is_empty() => "[]".to_string(),
    Value::Array(items) => {
      let items: Vec<String> = items
        .iter()
        .map(|item| format!("{inner_pad}{}", format_ts_value(item, depth + 1)))
        .collect();
      format!("[\n{}\n{pad}]", items.join(",\n"))
    },
    Value::Object(map) if map.is_empty() => "{}".to_string(),
    Value::Object(map) => {
      let props: Vec<String> = map
        .iter()
        .map(|(key, value)| {
          format!(
            "{inner_pad}{}: {}",
            format_ts_key(key),
            format_ts_value(value, depth + 1)
          )
        })
        .collect();
      format!("{{\n{}\n{pad}}}", props.join(",\n"))
    },
    Value::String(s) => quote_ts_string(s),
    other => other.to_string(),
  }
}

fn format_ts_key(key: &str) -> String {
  if is_ts_identifier(key) {
    key.to_string()
  } else {
    quote_ts_string(key)
  }
}

fn is_ts_identifier(key: &str) -> bool {
  let mut chars = key.chars();
  chars
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn quote_ts_string(s: &str) -> String {
  let mut quoted = String::with_capacity(s.len() + 2);
  quoted.push('\'');
  for c in s.chars() {
    match c {
      '\\' => quoted.push_str("\\\\"),
      '\'' => quoted.push_str("\\'"),
      '\n' => quoted.push_str("\\n"),
      '\r' => quoted.push_str("\\r"),
      '\t' => quoted.push_str("\\t"),
      c if c.is_control() => {
        let _ = write!(quoted, "\\u{{{:x}}}", u32::from(c));
      },
      c => quoted.push(c),
    }
  }
  quoted.push('\'');
  quoted
}
