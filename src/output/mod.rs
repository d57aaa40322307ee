// Output formatting — terminal display for decisions and history.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..."
/// when something was cut. Works on character boundaries, so multi-byte
/// text never panics a byte slice.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
