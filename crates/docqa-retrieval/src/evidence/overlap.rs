//! Line-level evidence chosen by token overlap with a question or answer.

pub const DEFAULT_MAX_LINES: usize = 2;
/// Tokens must be longer than two characters to count.
const MIN_TOKEN_CHARS: usize = 3;

/// Line boundaries recognised in extracted text: newline, carriage return,
/// vertical tab, form feed (PDF page break), the ASCII file/group/record
/// separators, NEL and the Unicode line/paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Splits `text` into lines on any `is_line_break` character, `\r\n`
/// counting as one break. A trailing break adds no empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) { continue; }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() { lines.push(&text[start..]); }
    lines
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// Returns up to `max_lines` lines of `text` that contain any token of
/// `answer`, in document order, joined by a single space.
///
/// With no matching line, falls back to the first non-empty line; an
/// all-blank `text` gives an empty string.
pub fn extract_relevant_snippet(text: &str, answer: &str, max_lines: usize) -> String {
    let answer_tokens = tokens(answer);
    let mut matched: Vec<&str> = Vec::new();
    let lines = split_lines(text);
    for line in &lines {
        let lower = line.to_lowercase();
        if answer_tokens.iter().any(|t| lower.contains(t.as_str())) {
            matched.push(line.trim());
        }
        if matched.len() >= max_lines { break; }
    }

    if matched.is_empty() {
        return lines.iter().map(|l| l.trim()).find(|l| !l.is_empty()).unwrap_or_default().to_string();
    }
    matched.join(" ")
}
