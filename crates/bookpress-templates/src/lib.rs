use std::collections::HashMap;

/// Commented default tool configuration written by `bookpress init`.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../templates/bookpress.toml");
pub const DEFAULT_CONFIG_JSON: &str = include_str!("../templates/bookpress.json");

/// Tera template of the VitePress home page.
pub const HOME_PAGE_TEMPLATE: &str = include_str!("../templates/index.md");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("bookpress.toml", DEFAULT_CONFIG_TOML);
  templates.insert("bookpress.json", DEFAULT_CONFIG_JSON);
  templates.insert("index.md", HOME_PAGE_TEMPLATE);
  templates
}
