use tracing::trace;

const FENCE: &str = "```";

/// Recover the JSON array from a model reply.
///
/// Takes the content of the first fenced block when there is one (dropping a
/// language tag such as `json`), then, if the text still does not open with
/// `[`, cuts from the first `[` to the last `]`. The result may still be
/// invalid JSON; when no delimiters are found the trimmed input comes back.
pub fn unwrap_payload(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(start) = text.find(FENCE) {
        let after = &text[start + FENCE.len()..];
        let inner = match after.find(FENCE) {
            Some(end) => &after[..end],
            None => after,
        };
        text = skip_language_tag(inner).trim();
        trace!(len = text.len(), "took fenced block");
    }

    if !text.starts_with('[') {
        if let (Some(open), Some(close)) = (text.find('['), text.rfind(']')) {
            if open < close {
                text = &text[open..=close];
                trace!(open, close, "sliced bracketed array");
            }
        }
    }

    text
}

fn skip_language_tag(block: &str) -> &str {
    if !block.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return block;
    }
    let end = block
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
        .unwrap_or(block.len());
    &block[end..]
}
