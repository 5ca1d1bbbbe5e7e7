//! Image references.
//!
//! VitePress serves static files from `docs/public` at the site root, so
//! relative image paths are rooted at `/`. HTML `<img>` tags are turned into
//! markdown images first so both forms go through the same normalization.
//! A tag may span several lines; inline code spans are left alone.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::types::{DocumentContext, TransformResult, Transformer};
use crate::utils::{
  codeblock::{LineKind, classify_lines},
  compile_regex,
};

/// Inline code is matched first so tags inside it are skipped; only the last
/// alternative captures.
static IMG_TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"`[^`\n]*`|<img\b([^>]*?)/?>"));

static SRC_ATTR_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r#"\ssrc\s*=\s*["']([^"']+)["']"#));

static ALT_ATTR_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r#"\salt\s*=\s*["']([^"']*)["']"#));

static MARKDOWN_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r#"`[^`]*`|!\[([^\]]*)\]\(([^)\s]+)((?:\s+"[^"]*")?)\)"#)
});

/// Whether `src` points outside the site and must not be touched.
#[must_use]
pub fn is_external(src: &str) -> bool {
  src.starts_with("http") || src.contains("://") || src.starts_with("data:")
}

/// Root a relative image path at the site's static asset directory.
///
/// ```
/// use bookpress_markdown::transformer::images::normalize_image_path;
///
/// assert_eq!(normalize_image_path("./img/a.png"), "/img/a.png");
/// assert_eq!(normalize_image_path("img/a.png"), "/img/a.png");
/// assert_eq!(normalize_image_path("/img/a.png"), "/img/a.png");
/// assert_eq!(normalize_image_path("https://x.org/a.png"), "https://x.org/a.png");
/// ```
#[must_use]
pub fn normalize_image_path(src: &str) -> String {
  if src.starts_with('/') || is_external(src) {
    return src.to_string();
  }
  let relative = src.strip_prefix("./").unwrap_or(src);
  format!("/{relative}")
}

/// Normalizes image paths in HTML and markdown image syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagesTransformer;

impl Transformer for ImagesTransformer {
  fn name(&self) -> &'static str {
    "image-references"
  }

  fn description(&self) -> &'static str {
    "Converts <img> tags to markdown and roots relative image paths at /"
  }

  fn transform(
    &self,
    content: &str,
    _ctx: &DocumentContext<'_>,
  ) -> TransformResult<String> {
    let mut output: Vec<String> = Vec::new();
    let mut text_run: Vec<&str> = Vec::new();

    for (line, kind) in classify_lines(content) {
      if kind == LineKind::Text {
        text_run.push(line);
      } else {
        flush_text_run(&mut text_run, &mut output);
        output.push(line.to_string());
      }
    }
    flush_text_run(&mut text_run, &mut output);

    Ok(output.join("\n"))
  }
}

/// Rewrite a run of consecutive prose lines. Tags are converted over the
/// whole run so that a tag split across lines is still found.
fn flush_text_run(run: &mut Vec<&str>, output: &mut Vec<String>) {
  if run.is_empty() {
    return;
  }
  let converted = rewrite_img_tags(&run.join("\n"));
  output.extend(converted.split('\n').map(rewrite_markdown_images));
  run.clear();
}

/// `<img src=".." alt="..">` to `![alt](src)`. Tags without a `src` stay.
fn rewrite_img_tags(text: &str) -> String {
  IMG_TAG_RE
    .replace_all(text, |caps: &Captures| {
      let Some(attrs) = caps.get(1).map(|m| m.as_str()) else {
        return caps[0].to_string();
      };
      let Some(src) = SRC_ATTR_RE.captures(attrs).map(|c| c[1].to_string())
      else {
        return caps[0].to_string();
      };
      let alt = ALT_ATTR_RE
        .captures(attrs)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
      format!("![{alt}]({})", normalize_image_path(&src))
    })
    .into_owned()
}

/// Root relative paths of markdown images. Anchors (`#...`) stay.
fn rewrite_markdown_images(line: &str) -> String {
  MARKDOWN_IMAGE_RE
    .replace_all(line, |caps: &Captures| {
      let Some(src) = caps.get(2).map(|m| m.as_str()) else {
        return caps[0].to_string();
      };
      if src.starts_with('#') {
        return caps[0].to_string();
      }
      format!("![{}]({}{})", &caps[1], normalize_image_path(src), &caps[3])
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  fn run(input: &str) -> String {
    ImagesTransformer
      .transform(input, &DocumentContext::detached())
      .expect("images never fail")
  }

  #[test]
  fn test_markdown_relative_paths() {
    assert_eq!(run("![x](./img.png)"), "![x](/img.png)");
    assert_eq!(run("![x](assets/img.png)"), "![x](/assets/img.png)");
    assert_eq!(run("![x](http://h/img.png)"), "![x](http://h/img.png)");
    assert_eq!(run("![x](#fig)"), "![x](#fig)");
  }

  #[test]
  fn test_markdown_title_kept() {
    assert_eq!(
      run(r#"![x](img.png "A title")"#),
      r#"![x](/img.png "A title")"#
    );
  }

  #[test]
  fn test_img_tag() {
    assert_eq!(run(r#"<img src="./a.png" alt="b">"#), "![b](/a.png)");
    assert_eq!(
      run("Logo: <img alt='logo' src='https://x.org/l.svg' />"),
      "Logo: ![logo](https://x.org/l.svg)"
    );
    assert_eq!(run(r#"<img src="a.png">"#), "![](/a.png)");
  }

  #[test]
  fn test_img_tag_across_lines() {
    assert_eq!(run("<img src=\"./a.png\"\n     alt=\"b\">"), "![b](/a.png)");
    assert_eq!(
      run("Before\n<img\n  src=\"img/c.svg\"\n  alt=\"c\" />\nAfter"),
      "Before\n![c](/img/c.svg)\nAfter"
    );
  }

  #[test]
  fn test_img_tag_does_not_cross_fences() {
    let input = "<img src=\"a.png\"\n```html\nalt=\"x\">\n```";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_inline_code_untouched() {
    let input = "Write `![x](./a.png)` or `<img src=\"a.png\">` for images";
    assert_eq!(run(input), input);
    assert_eq!(
      run("`code` then ![x](./a.png)"),
      "`code` then ![x](/a.png)"
    );
  }

  #[test]
  fn test_img_tag_without_src_untouched() {
    let input = r#"<img alt="nothing">"#;
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_fenced_code_untouched() {
    let input = "```markdown\n![x](./img.png)\n```";
    assert_eq!(run(input), input);
  }

  #[test]
  fn test_idempotent() {
    let once = run("![a](./a.png) <img src=\"b.png\" alt=\"b\">");
    assert_eq!(once, "![a](/a.png) ![b](/b.png)");
    assert_eq!(run(&once), once);
  }
}
