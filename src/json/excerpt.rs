//! Purpose: Locate decode failures in raw input and cut bounded excerpts around them.
//! Exports: `EXCERPT_LEN`, `byte_offset`, `syntax_window`, `type_window`.
//! Role: Pure slicing helpers used by the byte-slice decoder.
//! Invariants: Windows always lie within `[0, data.len())`; out-of-range offsets clamp.
//! Invariants: Windows are at most `EXCERPT_LEN` bytes long.

/// Maximum number of input bytes quoted in a decode error.
pub const EXCERPT_LEN: usize = 20;

/// Converts a 1-based line and in-line column into the number of bytes
/// consumed, clamped to the input length. Line 0 means "no position".
pub(crate) fn byte_offset(data: &[u8], line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let start_of_line = if line == 1 {
        0
    } else {
        data.iter()
            .enumerate()
            .filter(|(_, byte)| **byte == b'\n')
            .nth(line - 2)
            .map(|(index, _)| index + 1)
            .unwrap_or(data.len())
    };
    Some(start_of_line.saturating_add(column).min(data.len()))
}

/// Window starting at the failing byte (`offset - 1`) and running forward.
pub(crate) fn syntax_window(data: &[u8], offset: usize) -> &[u8] {
    let start = offset.saturating_sub(1).min(data.len());
    let end = start.saturating_add(EXCERPT_LEN).min(data.len());
    &data[start..end]
}

/// Window ending at `offset`, covering the value that failed to convert.
pub(crate) fn type_window(data: &[u8], offset: usize) -> &[u8] {
    let end = offset.min(data.len());
    let start = end.saturating_sub(EXCERPT_LEN);
    &data[start..end]
}

#[cfg(test)]
mod tests {
    use super::{EXCERPT_LEN, byte_offset, syntax_window, type_window};

    #[test]
    fn offset_on_first_line_is_the_column() {
        assert_eq!(byte_offset(b"{ First: 15 }", 1, 3), Some(3));
    }

    #[test]
    fn offset_on_later_lines_counts_preceding_lines() {
        let data = b"{\n  \"a\": 1,\n  b\n}";
        // line 3 starts after the second newline at index 11
        assert_eq!(byte_offset(data, 3, 3), Some(15));
    }

    #[test]
    fn offset_without_position_is_none() {
        assert_eq!(byte_offset(b"{}", 0, 0), None);
    }

    #[test]
    fn offset_past_the_end_clamps() {
        assert_eq!(byte_offset(b"{}", 1, 40), Some(2));
        assert_eq!(byte_offset(b"{}", 9, 1), Some(2));
    }

    #[test]
    fn syntax_window_at_offset_zero_starts_at_zero() {
        let data = b"nope, not json at all";
        assert_eq!(syntax_window(data, 0), &data[..EXCERPT_LEN]);
        assert_eq!(syntax_window(data, 1), &data[..EXCERPT_LEN]);
    }

    #[test]
    fn syntax_window_near_end_is_shorter() {
        let data = b"{\"a\": tru";
        assert_eq!(syntax_window(data, data.len()), b"u");
        assert_eq!(syntax_window(data, data.len() + 5), b"");
    }

    #[test]
    fn syntax_window_on_empty_input_is_empty() {
        assert_eq!(syntax_window(b"", 0), b"");
        assert_eq!(syntax_window(b"", 7), b"");
    }

    #[test]
    fn type_window_ends_at_offset() {
        let data = br#"{"First": "not-a-number", "Second": "x"}"#;
        assert_eq!(type_window(data, 24), br#"rst": "not-a-number""#);
    }

    #[test]
    fn type_window_near_start_is_shorter() {
        let data = br#"["x"]"#;
        assert_eq!(type_window(data, 4), br#"["x""#);
        assert_eq!(type_window(data, 0), b"");
    }

    #[test]
    fn type_window_past_the_end_clamps() {
        let data = b"[1, 2]";
        assert_eq!(type_window(data, 100), b"[1, 2]");
    }
}
