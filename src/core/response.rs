//! Discord message size helpers
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.2.0: truncate_for_message counts characters
//! - 1.1.0: Add tail_chars for the log command
//! - 1.0.0: truncate_for_message

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Characters of the log file returned by `marvin log`, leaving headroom under
/// the message limit
pub const LOG_TAIL_CHARS: usize = 1900;

/// Last `max_chars` characters of `text` (UTF-8 safe)
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }

    match text.char_indices().nth(total - max_chars) {
        Some((start, _)) => &text[start..],
        None => "",
    }
}

/// Truncate text to fit the message limit (counted in characters, as Discord
/// does), adding ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    if text.chars().count() <= MESSAGE_LIMIT {
        return text.to_string();
    }

    let kept: String = text.chars().take(MESSAGE_LIMIT - 3).collect();
    format!("{kept}...")
}
