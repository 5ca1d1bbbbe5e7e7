/// Classification of a single line relative to fenced code blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
  /// A fence delimiter that opens a code block.
  FenceOpen,

  /// A fence delimiter that closes the current code block.
  FenceClose,

  /// A content line inside a code block.
  Code,

  /// A line outside of any code block.
  Text,
}

impl LineKind {
  /// Whether the line is a fence delimiter rather than content.
  #[must_use]
  pub const fn is_fence(self) -> bool {
    matches!(self, Self::FenceOpen | Self::FenceClose)
  }
}

/// State tracking for code fence detection in markdown.
///
/// mdBook sources only use backtick fences, so the tracker is a plain toggle:
/// every line whose trimmed form starts with three or more backticks flips the
/// state, and nothing else does. An unterminated fence simply leaves the
/// tracker inside a code block at the end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceTracker {
  in_code_block: bool,
}

impl FenceTracker {
  /// Create a new fence tracker.
  #[must_use]
  pub const fn new() -> Self {
    Self {
      in_code_block: false,
    }
  }

  /// Check if currently inside a code block.
  #[must_use]
  pub const fn in_code_block(&self) -> bool {
    self.in_code_block
  }

  /// Process a line and update fence state.
  ///
  /// Returns the updated state together with the classification of `line`.
  /// A fence-open line already counts as entering the block, so the line
  /// right after it is reported as [`LineKind::Code`].
  #[must_use]
  pub fn process_line(&self, line: &str) -> (Self, LineKind) {
    if is_fence_delimiter(line) {
      let kind = if self.in_code_block {
        LineKind::FenceClose
      } else {
        LineKind::FenceOpen
      };
      return (
        Self {
          in_code_block: !self.in_code_block,
        },
        kind,
      );
    }

    let kind = if self.in_code_block {
      LineKind::Code
    } else {
      LineKind::Text
    };
    (*self, kind)
  }
}

/// Whether `line` is a code fence delimiter (three or more backticks after
/// trimming).
#[must_use]
pub fn is_fence_delimiter(line: &str) -> bool {
  line.trim().starts_with("```")
}

/// Return the info string of a fence line, i.e. everything after the run of
/// backticks, trimmed.
#[must_use]
pub fn fence_info(line: &str) -> &str {
  line.trim().trim_start_matches('`').trim()
}

/// Classify every line of `content` in document order.
///
/// Lines are split on `\n` so that the caller can re-join them without
/// losing a trailing newline.
#[must_use]
pub fn classify_lines(content: &str) -> Vec<(&str, LineKind)> {
  let mut tracker = FenceTracker::new();
  content
    .split('\n')
    .map(|line| {
      let (next, kind) = tracker.process_line(line);
      tracker = next;
      (line, kind)
    })
    .collect()
}

/// Parsed fence info string in mdBook's `language,option,option` form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeBlockInfo {
  /// Language tag, empty when the fence carries none.
  pub language: String,

  /// Comma separated options following the language.
  pub options: Vec<String>,
}

impl CodeBlockInfo {
  /// Parse an info string such as `rust,editable`.
  #[must_use]
  pub fn parse(info: &str) -> Self {
    let mut parts = info.trim().split(',').map(str::trim);
    let language = parts.next().unwrap_or_default().to_string();
    let options = parts
      .filter(|opt| !opt.is_empty())
      .map(ToString::to_string)
      .collect();
    Self { language, options }
  }

  /// Whether the given option is present.
  #[must_use]
  pub fn has_option(&self, option: &str) -> bool {
    self.options.iter().any(|opt| opt == option)
  }
}
