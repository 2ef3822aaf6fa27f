use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

/// Number of lines preceding a fence that are kept as diagnostic context.
const CONTEXT_LINES: usize = 5;

/// A line opening a fragment: three backticks immediately followed by a word tag.
static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^[ \t]*```(\w+)[ \t]*$") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid opening fence regex: {err}"),
    }
});

/// A line closing a fragment: a bare triple backtick marker.
static CLOSING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^[ \t]*```[ \t]*$") {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid closing fence regex: {err}"),
    }
});

/// A code fragment extracted from a markdown document with its location.
///
/// Fragments are identified by fenced code syntax carrying a language tag:
///
/// ````markdown
/// Build the project:
///
/// ```bash
/// make all
/// ```
/// ````
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFragment {
    /// The document the fragment was found in
    pub source_path: Arc<PathBuf>,
    /// 1-based line of the opening fence
    pub line_number: usize,
    /// The tag from the fence marker, case preserved (e.g. "bash", "Python")
    pub language: String,
    /// The fragment text, fences excluded
    pub body: String,
    /// Up to five lines of text preceding the opening fence, trimmed
    pub context: String,
}

/// Lazy iterator over the fragments of one document, in document order.
///
/// Created by [`extract_fragments`]. The iterator is finite and is consumed
/// once; extracting again means calling [`extract_fragments`] again.
pub struct Fragments<'a> {
    content: &'a str,
    source_path: Arc<PathBuf>,
    /// Byte offset of the next unscanned line
    offset: usize,
    /// 1-based number of the line at `offset`
    line: usize,
}

impl<'a> Fragments<'a> {
    /// The line starting at `at` without its terminator, and the offset of the next line.
    fn line_at(&self, at: usize) -> Option<(&'a str, usize)> {
        let rest = self.content.get(at..).filter(|rest| !rest.is_empty())?;
        let (text, next) = match rest.find('\n') {
            Some(end) => (&rest[..end], at + end + 1),
            None => (rest, self.content.len()),
        };
        Some((text.strip_suffix('\r').unwrap_or(text), next))
    }
}

impl Iterator for Fragments<'_> {
    type Item = CodeFragment;

    fn next(&mut self) -> Option<Self::Item> {
        'open: loop {
            let (text, next) = self.line_at(self.offset)?;
            let fence_start = self.offset;
            let fence_line = self.line;
            self.offset = next;
            self.line += 1;

            let Some(captures) = OPENING_FENCE.captures(text) else {
                continue;
            };
            let language = captures.get(1).map_or("", |m| m.as_str());

            let body_start = self.offset;
            let mut cursor = self.offset;
            let mut body_lines = 0;
            loop {
                let Some((text, next)) = self.line_at(cursor) else {
                    // Unterminated: no later fence can close either
                    self.offset = self.content.len();
                    return None;
                };

                if CLOSING_FENCE.is_match(text) {
                    let body = &self.content[body_start..cursor];
                    let body = body.strip_suffix('\n').unwrap_or(body);
                    let body = body.strip_suffix('\r').unwrap_or(body);

                    self.offset = next;
                    self.line += body_lines + 1;

                    return Some(CodeFragment {
                        source_path: Arc::clone(&self.source_path),
                        line_number: fence_line,
                        language: language.to_string(),
                        body: body.to_string(),
                        context: preceding_context(&self.content[..fence_start]),
                    });
                }

                if OPENING_FENCE.is_match(text) {
                    // The pending fence is never closed; rescan from this opener
                    self.offset = cursor;
                    self.line += body_lines;
                    continue 'open;
                }

                cursor = next;
                body_lines += 1;
            }
        }
    }
}

/// Extracts the fenced code fragments of a markdown document.
///
/// A fragment opens with a line of three backticks immediately followed by a
/// language tag, and closes at the next line holding only three backticks.
/// A fence that meets another opening fence or the end of the document before
/// its closing line yields nothing. Bodies are kept verbatim, including blank
/// lines and indentation.
///
/// # Arguments
///
/// * `source_path` - The document path recorded on every fragment
/// * `content` - The markdown content to scan
///
/// # Example
///
/// ```
/// use doc_check_code::extract_fragments;
/// use std::path::Path;
///
/// let markdown = "# Setup\n\n```bash\necho hello\n```\n";
/// let fragments: Vec<_> = extract_fragments(Path::new("README.md"), markdown).collect();
///
/// assert_eq!(fragments.len(), 1);
/// assert_eq!(fragments[0].language, "bash");
/// assert_eq!(fragments[0].line_number, 3);
/// assert_eq!(fragments[0].body, "echo hello");
/// ```
pub fn extract_fragments<'a>(source_path: &Path, content: &'a str) -> Fragments<'a> {
    Fragments {
        content,
        source_path: Arc::new(source_path.to_path_buf()),
        offset: 0,
        line: 1,
    }
}

/// Last [`CONTEXT_LINES`] lines of `before`, trimmed as a whole block.
fn preceding_context(before: &str) -> String {
    let mut tail: Vec<&str> = before
        .rsplitn(CONTEXT_LINES + 1, '\n')
        .take(CONTEXT_LINES)
        .collect();
    tail.reverse();
    tail.join("\n").trim().to_string()
}
