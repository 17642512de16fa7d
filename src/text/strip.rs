//! Pre-processing for fetched source text: line-comment stripping and
//! whitespace normalization.

const TAB_REPLACEMENT: &str = "    ";

/// Find the byte offset where a trailing `//` comment starts, if any.
///
/// `//` inside a double-quoted string literal or a single-quoted char
/// literal does not count. A backslash escapes the following character, so
/// an escaped quote does not toggle literal state. Unterminated literal
/// state simply persists to the end of the line.
fn comment_start(line: &str) -> Option<usize> {
    let mut in_string = false;
    let mut in_char = false;
    let mut escaped = false;

    let mut iter = line.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' if !in_char => in_string = !in_string,
            '\'' if !in_string => in_char = !in_char,
            '/' if !in_string && !in_char => {
                if matches!(iter.peek(), Some(&(_, '/'))) {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Remove same-line trailing `//` comments from every line, then drop any
/// blank lines left at the end of the text.
pub fn strip_line_comments(text: &str) -> String {
    let mut cleaned: Vec<String> = text
        .replace("\r\n", "\n")
        .split('\n')
        .map(|line| match comment_start(line) {
            Some(i) => line[..i].trim_end().to_string(),
            None => line.to_string(),
        })
        .collect();

    while cleaned.last().is_some_and(|line| line.trim().is_empty()) {
        cleaned.pop();
    }

    cleaned.join("\n")
}

/// Full normalization pass applied to fetched file content: CRLF to LF,
/// optional comment stripping, tabs to four spaces. Tabs are replaced after
/// stripping so comment detection sees the original columns.
pub fn normalize_source(text: &str, strip_comments: bool) -> String {
    let text = if strip_comments {
        strip_line_comments(text)
    } else {
        text.replace("\r\n", "\n")
    };
    text.replace('\t', TAB_REPLACEMENT)
}
