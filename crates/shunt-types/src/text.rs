//! Char-safe string truncation helpers used for previews and evidence.

/// Keep at most the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Keep at most the last `max` characters of `s`.
pub fn tail_chars(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        s.chars().skip(count - max).collect()
    }
}

/// Truncate `s` to `max` characters, appending `...` when anything was cut.
pub fn preview(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out = truncate_chars(s, max);
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}
