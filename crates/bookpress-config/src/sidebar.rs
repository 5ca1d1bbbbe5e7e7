//! VitePress sidebar and navigation bar built from the table of contents.

use bookpress_markdown::{TocEntry, utils::strip_md_extension};
use serde::Serialize;

/// An entry of VitePress `themeConfig.sidebar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
  pub text:      String,
  pub link:      String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub items:     Vec<Self>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub collapsed: Option<bool>,
}

/// An entry of VitePress `themeConfig.nav`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
  pub text: String,
  pub link: String,
}

impl SidebarItem {
  /// Map a table of contents entry, and its children, onto a sidebar item.
  ///
  /// Items with children are expanded by default.
  #[must_use]
  pub fn from_toc(entry: &TocEntry, base_path: Option<&str>) -> Self {
    let items: Vec<Self> = entry
      .children
      .iter()
      .map(|child| Self::from_toc(child, base_path))
      .collect();
    let collapsed = (!items.is_empty()).then_some(false);

    Self {
      text: entry.title.clone(),
      link: site_link(&entry.link, base_path),
      items,
      collapsed,
    }
  }

  /// Depth-first iterator over this item and its descendants.
  pub fn iter(&self) -> impl Iterator<Item = &Self> {
    let mut stack = vec![self];
    std::iter::from_fn(move || {
      let item = stack.pop()?;
      stack.extend(item.items.iter().rev());
      Some(item)
    })
  }
}

/// Build the whole sidebar from a parsed table of contents.
#[must_use]
pub fn build_sidebar(
  toc: &[TocEntry],
  base_path: Option<&str>,
) -> Vec<SidebarItem> {
  toc
    .iter()
    .map(|entry| SidebarItem::from_toc(entry, base_path))
    .collect()
}

/// Home and Guide entries; Guide points at the first chapter, and is left
/// out when the book has no chapters.
#[must_use]
pub fn build_nav(
  sidebar: &[SidebarItem],
  base_path: Option<&str>,
) -> Vec<NavItem> {
  let home = normalize_base(base_path)
    .map_or_else(|| "/".to_string(), |base| format!("{base}/"));

  let mut nav = vec![NavItem {
    text: "Home".to_string(),
    link: home,
  }];
  if let Some(first) = first_chapter_link(sidebar) {
    nav.push(NavItem {
      text: "Guide".to_string(),
      link: first.to_string(),
    });
  }
  nav
}

/// Link of the first chapter in reading order.
#[must_use]
pub fn first_chapter_link(sidebar: &[SidebarItem]) -> Option<&str> {
  sidebar
    .iter()
    .flat_map(|item| item.iter())
    .map(|item| item.link.as_str())
    .find(|link| !link.is_empty())
}

/// Turn a `SUMMARY.md` link target into a site link.
///
/// ```
/// use bookpress_config::sidebar::site_link;
///
/// assert_eq!(site_link("guide/intro.md", None), "/guide/intro");
/// assert_eq!(site_link("./faq.md#install", Some("/zh/")), "/zh/faq#install");
/// assert_eq!(site_link("https://x.org", Some("/zh")), "https://x.org");
/// ```
#[must_use]
pub fn site_link(link: &str, base_path: Option<&str>) -> String {
  let link = link.trim();
  if link.contains("://") {
    return link.to_string();
  }

  let relative = link.strip_prefix("./").unwrap_or(link);
  let relative = relative.trim_start_matches('/');
  let path = strip_md_extension(relative);

  match normalize_base(base_path) {
    Some(base) => format!("{base}/{path}"),
    None => format!("/{path}"),
  }
}

/// `zh`, `/zh/` and `/zh` all become `/zh`; empty and `/` mean no base.
fn normalize_base(base_path: Option<&str>) -> Option<String> {
  let trimmed = base_path?.trim().trim_matches('/');
  (!trimmed.is_empty()).then(|| format!("/{trimmed}"))
}
