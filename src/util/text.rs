use chrono::{DateTime, Utc};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated text.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns (CJK and emoji count as 2).
///
/// ```
/// use headlines::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("你好"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Truncate to at most `max_width` columns, appending "..." when text is cut.
///
/// Widths of 3 or less leave no room for the ellipsis, so as many characters
/// as fit are returned bare. Text that already fits is borrowed.
///
/// ```
/// use headlines::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_width(s, max_width).to_string());
    }
    let head = take_width(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", head.trim_end(), ELLIPSIS))
}

/// Longest prefix of `s` that fits in `width` columns.
fn take_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

fn is_stripped_control(c: char) -> bool {
    c.is_control() && !matches!(c, '\t' | '\n' | '\r')
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Headline text comes from third-party publishers and is written straight
/// to the terminal, so CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`)
/// sequences are dropped whole along with other C0/C1 controls. Tab, newline
/// and carriage return are kept.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_stripped_control(c) {
                out.push(c);
            }
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameters and intermediates run until a final byte in 0x40..=0x7E
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

/// Sanitize API text for a single display line: controls stripped, runs of
/// whitespace (including newlines) collapsed to one space, ends trimmed.
pub fn single_line(s: &str) -> String {
    strip_control_chars(s)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word-wrap `s` into at most `max_lines` lines of `width` columns.
///
/// Words longer than a line are hard-split. If text remains after the last
/// line, that line is truncated with an ellipsis.
pub fn wrap_to_width(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for word in s.split_whitespace() {
        let word_width = display_width(word);
        let sep = usize::from(!current.is_empty());

        if current_width + sep + word_width <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }

        // Start a new line with this word
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if lines.len() == max_lines {
            return finish_overflow(lines, width);
        }

        let mut rest = word;
        while display_width(rest) > width {
            let head = take_width(rest, width);
            if head.is_empty() {
                // Single char wider than the line
                break;
            }
            lines.push(head.to_string());
            rest = &rest[head.len()..];
            if lines.len() == max_lines {
                return finish_overflow(lines, width);
            }
        }
        current.push_str(rest);
        current_width = display_width(rest);
    }

    if !current.is_empty() {
        if lines.len() == max_lines {
            return finish_overflow(lines, width);
        }
        lines.push(current);
    }
    lines
}

fn finish_overflow(mut lines: Vec<String>, width: usize) -> Vec<String> {
    if let Some(last) = lines.last_mut() {
        *last = if width > ELLIPSIS_WIDTH {
            let head = take_width(last, width - ELLIPSIS_WIDTH).trim_end();
            format!("{}{}", head, ELLIPSIS)
        } else {
            take_width(last, width).to_string()
        };
    }
    lines
}

/// Short relative age of a publish time: "5m ago", "3h ago", "2d ago", or a
/// date for anything a week or older.
pub fn format_relative_time(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published) = published else {
        return String::new();
    };

    let secs = (now - published).num_seconds();
    match secs {
        // Clock skew between publisher and us
        i64::MIN..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        86_400..=604_799 => format!("{}d ago", secs / 86_400),
        _ => published.format("%b %d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_fits_is_borrowed() {
        assert!(matches!(truncate_to_width("Short", 10), Cow::Borrowed(_)));
        assert_eq!(truncate_to_width("Exact", 5), "Exact");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("你好", 1), "");
    }

    #[test]
    fn test_strip_clean_text_is_borrowed() {
        assert!(matches!(
            strip_control_chars("Plain headline"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_strip_ansi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m text"), "Red text");
        assert_eq!(
            strip_control_chars("\x1b]0;pwned\x07Title"),
            "Title"
        );
        assert_eq!(
            strip_control_chars("\x1b]8;;https://evil\x1b\\link"),
            "link"
        );
    }

    #[test]
    fn test_strip_keeps_whitespace_controls() {
        assert_eq!(strip_control_chars("a\tb\nc\x07d\x00"), "a\tb\ncd");
    }

    #[test]
    fn test_single_line_collapses_whitespace() {
        assert_eq!(single_line("  Breaking:\n\n  markets\tfall \x1b[1m "), "Breaking: markets fall");
        assert_eq!(single_line(""), "");
    }

    #[test]
    fn test_wrap_basic() {
        assert_eq!(
            wrap_to_width("the quick brown fox jumps", 10, 3),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_overflow_gets_ellipsis() {
        let lines = wrap_to_width("one two three four five six seven", 9, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert!(lines[1].ends_with("..."));
        assert!(display_width(&lines[1]) <= 9);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        assert_eq!(
            wrap_to_width("abcdefghij", 4, 5),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn test_wrap_degenerate() {
        assert!(wrap_to_width("text", 0, 2).is_empty());
        assert!(wrap_to_width("text", 10, 0).is_empty());
        assert!(wrap_to_width("   ", 10, 2).is_empty());
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let ago = |d: Duration| Some(now - d);

        assert_eq!(format_relative_time(None, now), "");
        assert_eq!(format_relative_time(ago(Duration::seconds(30)), now), "just now");
        assert_eq!(format_relative_time(ago(Duration::minutes(5)), now), "5m ago");
        assert_eq!(format_relative_time(ago(Duration::hours(3)), now), "3h ago");
        assert_eq!(format_relative_time(ago(Duration::days(2)), now), "2d ago");
        assert_eq!(
            format_relative_time(ago(Duration::days(9)), now),
            "Mar 01, 2024"
        );
    }

    #[test]
    fn test_relative_time_future_is_just_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            format_relative_time(Some(now + Duration::hours(2)), now),
            "just now"
        );
    }
}
