use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_display_width).sum()
}

/// Display width of a grapheme cluster.
fn grapheme_display_width(g: &str) -> usize {
    if g == "\t" {
        return 4;
    }
    UnicodeWidthStr::width(g)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells <= 1 {
        return "\u{2026}".to_string();
    }
    let mut result = clip_to_width(s, max_cells - 1).to_string();
    result.push('\u{2026}');
    result
}

/// Longest prefix of `s` that fits in `max_cells`, cut on a grapheme boundary.
pub fn clip_to_width(s: &str, max_cells: usize) -> &str {
    let mut width = 0;
    for (i, g) in s.grapheme_indices(true) {
        let gw = grapheme_display_width(g);
        if width + gw > max_cells {
            return &s[..i];
        }
        width += gw;
    }
    s
}

/// The rest of `s` once `cols` cells have scrolled off the left. A wide
/// grapheme straddling the edge is dropped whole.
pub fn skip_width(s: &str, cols: usize) -> &str {
    let mut width = 0;
    for (i, g) in s.grapheme_indices(true) {
        if width >= cols {
            return &s[i..];
        }
        width += grapheme_display_width(g);
    }
    ""
}

/// Cells covered by the first `graphemes` grapheme clusters of `s`.
pub fn width_of_graphemes(s: &str, graphemes: usize) -> usize {
    s.graphemes(true)
        .take(graphemes)
        .map(grapheme_display_width)
        .sum()
}

// ---------------------------------------------------------------------------
// Grapheme-indexed editing
// ---------------------------------------------------------------------------

pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Byte offset of grapheme `index`, or the end of the string.
fn byte_offset(s: &str, index: usize) -> usize {
    s.grapheme_indices(true)
        .nth(index)
        .map_or(s.len(), |(offset, _)| offset)
}

pub fn insert_at(s: &str, cursor: usize, text: &str) -> String {
    let at = byte_offset(s, cursor);
    let mut out = String::with_capacity(s.len() + text.len());
    out.push_str(&s[..at]);
    out.push_str(text);
    out.push_str(&s[at..]);
    out
}

/// Remove the grapheme before `cursor` (backspace).
pub fn remove_before(s: &str, cursor: usize) -> Option<String> {
    if cursor == 0 {
        return None;
    }
    remove_at(s, cursor - 1)
}

/// Remove the grapheme at `cursor` (delete).
pub fn remove_at(s: &str, cursor: usize) -> Option<String> {
    if cursor >= grapheme_len(s) {
        return None;
    }
    let start = byte_offset(s, cursor);
    let end = byte_offset(s, cursor + 1);
    Some(format!("{}{}", &s[..start], &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── display_width ──────────────────────────────────────────────

    #[test]
    fn display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn display_width_cjk_and_emoji() {
        assert_eq!(display_width("你好"), 4);
        assert_eq!(display_width("🎉"), 2);
        assert_eq!(display_width("hello你好"), 9);
    }

    #[test]
    fn display_width_combining() {
        assert_eq!(display_width("cafe\u{0301}"), 4);
    }

    #[test]
    fn display_width_tab() {
        assert_eq!(display_width("a\tb"), 6);
    }

    // ── truncation and scrolling ───────────────────────────────────

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("hi", 10), "hi");
        assert_eq!(truncate_to_width("hello world", 8), "hello w\u{2026}");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn truncate_cjk_boundary() {
        // "你好世界" is 8 cells: "你好" = 4 + "…" = 5
        assert_eq!(truncate_to_width("你好世界", 5), "你好\u{2026}");
    }

    #[test]
    fn clip_never_splits_a_wide_char() {
        assert_eq!(clip_to_width("你好", 3), "你");
        assert_eq!(clip_to_width("abc", 10), "abc");
    }

    #[test]
    fn skip_width_scrolls_by_cells() {
        assert_eq!(skip_width("hello", 2), "llo");
        assert_eq!(skip_width("你好x", 2), "好x");
        assert_eq!(skip_width("你好x", 1), "好x");
        assert_eq!(skip_width("ab", 5), "");
        assert_eq!(skip_width("ab", 0), "ab");
    }

    #[test]
    fn width_of_leading_graphemes() {
        assert_eq!(width_of_graphemes("a你b", 2), 3);
        assert_eq!(width_of_graphemes("ab", 9), 2);
    }

    // ── editing ────────────────────────────────────────────────────

    #[test]
    fn grapheme_editing() {
        assert_eq!(insert_at("héllo", 2, "X"), "héXllo");
        assert_eq!(insert_at("", 3, "a"), "a");
        assert_eq!(remove_before("a👍🏽b", 2), Some("ab".to_string()));
        assert_eq!(remove_before("abc", 0), None);
        assert_eq!(remove_at("abc", 1), Some("ac".to_string()));
        assert_eq!(remove_at("abc", 3), None);
        assert_eq!(grapheme_len("a👍🏽b"), 3);
    }
}
