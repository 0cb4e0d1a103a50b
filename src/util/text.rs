use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal column width of `s` (CJK and emoji count as two columns).
///
/// ```
/// use hnreader::util::display_width;
///
/// assert_eq!(display_width("Show HN"), 7);
/// assert_eq!(display_width("你好"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or less have no room for an ellipsis, so the leading characters
/// that fit are returned as-is. Returns `Cow::Borrowed` whenever `s` already fits.
///
/// ```
/// use hnreader::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Ask HN: Who is hiring?", 10), "Ask HN:...");
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut width = 0;
        for (idx, c) in s.char_indices() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if width + w > max_width {
                break;
            }
            width += w;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    let target = max_width - ELLIPSIS_WIDTH;
    let mut width = 0;
    let mut cut = None;

    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if cut.is_none() && width + w > target {
            cut = Some(idx);
        }
        if width + w > max_width {
            let end = cut.unwrap_or(idx);
            return Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS));
        }
        width += w;
    }

    Cow::Borrowed(s)
}

/// Strips terminal control characters and ANSI escape sequences.
///
/// Item titles, comment bodies and author names come from a public API and
/// are printed straight into the terminal, so CSI (`ESC [`), OSC (`ESC ]`)
/// sequences, bare ESC, DEL and C0 controls are removed. Tab, newline and
/// carriage return survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    if !bytes.iter().any(|&b| is_stripped(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if b == 0x1b {
            match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < len {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < len {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        } else if is_stripped(b) {
            i += 1;
        } else {
            let start = i;
            i += 1;
            while i < len && !is_stripped(bytes[i]) {
                i += 1;
            }
            // Only ASCII bytes end a run, so the slice stays on char boundaries.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

fn is_stripped(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Greedy word wrap by display width.
///
/// Each input line (split on `\n`) wraps independently; blank lines are kept
/// so paragraph breaks survive. Words wider than `width` are hard-split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0;

        for word in raw.split_whitespace() {
            let word_width = display_width(word);

            if word_width > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                for c in word.chars() {
                    let w = UnicodeWidthChar::width(c).unwrap_or(0);
                    if current_width + w > width {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(c);
                    current_width += w;
                }
                continue;
            }

            let needed = if current.is_empty() {
                word_width
            } else {
                current_width + 1 + word_width
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncates_ascii_with_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_truncates_wide_chars_on_column_boundaries() {
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
        assert_eq!(truncate_to_width("你好", 1), "");
        assert_eq!(truncate_to_width("你好", 3), "你");
    }

    #[test]
    fn test_narrow_widths_skip_ellipsis() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("Hi", 3), "Hi");
    }

    #[test]
    fn test_strip_leaves_clean_text_borrowed() {
        let input = "line one\nline\ttwo\r\n";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_removes_csi_osc_and_controls() {
        assert_eq!(strip_control_chars("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x00b\x07c\x7fd"), "abcd");
        assert_eq!(strip_control_chars("bare\x1besc"), "bareesc");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip_control_chars("日本 \x1b[1m語\x1b[0m"), "日本 語");
    }

    #[test]
    fn test_wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_preserves_blank_lines_between_paragraphs() {
        let lines = wrap_text("first\n\nsecond", 20);
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn test_wrap_hard_splits_long_words() {
        let lines = wrap_text("https://example.com/x", 8);
        assert_eq!(lines, vec!["https://", "example.", "com/x"]);
    }

    proptest! {
        #[test]
        fn test_wrapped_lines_never_exceed_width(text in "[a-z ]{0,200}", width in 1usize..40) {
            for line in wrap_text(&text, width) {
                prop_assert!(display_width(&line) <= width);
            }
        }

        #[test]
        fn test_truncation_never_exceeds_width(text in "[a-zA-Z0-9 你好世界]{0,60}", width in 0usize..30) {
            prop_assert!(display_width(&truncate_to_width(&text, width)) <= width);
        }
    }
}
