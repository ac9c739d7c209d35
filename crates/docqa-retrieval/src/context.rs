use docqa_core::types::Chunk;

pub const CHUNK_SEPARATOR: &str = "\n\n";
/// Display width used by the presentation layer.
pub const DEFAULT_TRIM_CHARS: usize = 280;
pub const NO_CONTEXT: &str = "No supporting context available.";

/// Joins chunk texts with a blank line, optionally prefixing each with a
/// `[Source: ...]` line.
pub fn format_context<'a, I>(chunks: I, include_source: bool) -> String
where
    I: IntoIterator<Item = &'a Chunk>,
{
    chunks
        .into_iter()
        .map(|c| {
            if include_source {
                format!("[Source: {}]\n{}", c.source_or_unknown(), c.content)
            } else {
                c.content.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

/// Shortens context for display. Counts characters, not bytes.
pub fn trim_context(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return NO_CONTEXT.to_string();
    }
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_context_has_no_annotations() {
        let chunks = [Chunk::new("first"), Chunk::new("second").with_source("bol.pdf")];
        assert_eq!(format_context(&chunks, false), "first\n\nsecond");
        assert_eq!(format_context(&chunks, true), "[Source: unknown]\nfirst\n\n[Source: bol.pdf]\nsecond");
    }

    #[test]
    fn trimming() {
        assert_eq!(trim_context("", 280), NO_CONTEXT);
        assert_eq!(trim_context("  short  ", 280), "short");
        assert_eq!(trim_context("abcdef", 3), "abc...");
        assert_eq!(trim_context("äöüß", 2), "äö...");
        assert_eq!(trim_context("abc", 3), "abc");
        let long = "x".repeat(DEFAULT_TRIM_CHARS + 20);
        assert_eq!(trim_context(&long, DEFAULT_TRIM_CHARS).chars().count(), DEFAULT_TRIM_CHARS + 3);
    }
}
