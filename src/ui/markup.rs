//! Terminal layout for answer markup.
//!
//! Markup is a loose subset of HTML. Block-level closing tags and `<br>`
//! break lines, table cells are joined with ` | `, the basic entities are
//! decoded and text inside `<mark>` is kept as highlighted spans. Everything
//! else is dropped.

use std::sync::LazyLock;

use regex::Regex;
use unicode_width::UnicodeWidthChar;

use super::viewport::Viewport;
use crate::search::{decode_entity, entity_len};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)[^<>]*>").expect("markup token pattern is valid")
});

const CELL_SEPARATOR: &str = " | ";
const BULLET: &str = "• ";

/// A run of text with one highlight state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    pub text: String,
    pub marked: bool,
}

/// One display row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupLine {
    pub spans: Vec<MarkupSpan>,
}

impl MarkupLine {
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn has_mark(&self) -> bool {
        self.spans.iter().any(|s| s.marked)
    }

    fn from_cells(cells: &[(char, bool)]) -> Self {
        let mut spans: Vec<MarkupSpan> = Vec::new();
        for &(ch, marked) in cells {
            match spans.last_mut() {
                Some(span) if span.marked == marked => span.text.push(ch),
                _ => spans.push(MarkupSpan {
                    text: ch.to_string(),
                    marked,
                }),
            }
        }
        Self { spans }
    }
}

/// Logical lines before wrapping; each char carries its highlight state.
#[derive(Default)]
struct Builder {
    lines: Vec<Vec<(char, bool)>>,
    current: Vec<(char, bool)>,
    mark_depth: usize,
    cell_in_row: bool,
}

impl Builder {
    fn push_text(&mut self, text: &str) {
        let marked = self.mark_depth > 0;
        for ch in decode_entities(text).chars() {
            match ch {
                '\n' => self.break_line(),
                '\r' => {}
                '\t' => self.current.push((' ', marked)),
                _ => self.current.push((ch, marked)),
            }
        }
    }

    fn push_literal(&mut self, text: &str) {
        let marked = self.mark_depth > 0;
        self.current.extend(text.chars().map(|c| (c, marked)));
    }

    fn break_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
        self.cell_in_row = false;
    }

    /// Break unless the current line is already empty.
    fn end_block(&mut self) {
        if !self.current.is_empty() {
            self.break_line();
        }
    }

    fn tag(&mut self, closing: bool, name: &str) {
        match (closing, name.to_ascii_lowercase().as_str()) {
            (false, "mark") => self.mark_depth += 1,
            (true, "mark") => self.mark_depth = self.mark_depth.saturating_sub(1),
            (_, "br") => self.break_line(),
            (false, "tr") => {
                self.end_block();
                self.cell_in_row = false;
            }
            (false, "td" | "th") => {
                if self.cell_in_row {
                    self.push_literal(CELL_SEPARATOR);
                }
                self.cell_in_row = true;
            }
            (false, "li") => {
                self.end_block();
                self.push_literal(BULLET);
            }
            (true, "p" | "div" | "tr" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                self.break_line();
            }
            (false, "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "table" | "ul" | "ol") => {
                self.end_block();
            }
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<Vec<(char, bool)>> {
        if !self.current.is_empty() {
            self.lines.push(self.current);
        }
        self.lines
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(ch) = text[pos..].chars().next() {
        let decoded = entity_len(&text[pos..])
            .and_then(|len| decode_entity(&text[pos..pos + len]).map(|ch| (len, ch)));
        match decoded {
            Some((len, ch)) => {
                out.push(ch);
                pos += len;
            }
            None => {
                out.push(ch);
                pos += ch.len_utf8();
            }
        }
    }
    out
}

/// Lay `markup` out into rows of at most `width` display columns.
pub fn layout(markup: &str, width: u16) -> Vec<MarkupLine> {
    let mut builder = Builder::default();
    let mut last = 0;
    for caps in TOKEN.captures_iter(markup) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        builder.push_text(&markup[last..whole.start()]);
        builder.tag(&caps[1] == "/", &caps[2]);
        last = whole.end();
    }
    builder.push_text(&markup[last..]);

    let width = usize::from(width.max(1));
    builder
        .finish()
        .iter()
        .flat_map(|line| wrap_cells(line, width))
        .map(MarkupLine::from_cells)
        .collect()
}

/// Greedy word wrap over highlighted chars. An empty line yields one empty row.
fn wrap_cells(cells: &[(char, bool)], width: usize) -> Vec<&[(char, bool)]> {
    if cells.is_empty() {
        return vec![cells];
    }
    let mut rows = Vec::new();
    let mut start = 0;
    while start < cells.len() {
        let mut used = 0;
        let mut end = start;
        while end < cells.len() {
            let w = cells[end].0.width().unwrap_or(0);
            if used + w > width && end > start {
                break;
            }
            used += w;
            end += 1;
        }
        if end == cells.len() {
            rows.push(&cells[start..]);
            break;
        }
        if cells[end].0 == ' ' {
            rows.push(&cells[start..end]);
            start = end + 1;
            continue;
        }
        match cells[start..end].iter().rposition(|(c, _)| *c == ' ') {
            Some(space) if space > 0 => {
                rows.push(&cells[start..start + space]);
                start += space + 1;
            }
            _ => {
                rows.push(&cells[start..end]);
                start = end;
            }
        }
    }
    rows
}

/// Index of the first row containing a highlight marker.
pub fn first_marked_line(lines: &[MarkupLine]) -> Option<usize> {
    lines.iter().position(MarkupLine::has_mark)
}

/// Start a smooth scroll that centres the first highlighted row.
///
/// Returns `false`, leaving the viewport alone, when nothing is highlighted.
pub fn scroll_to_first_match(lines: &[MarkupLine], viewport: &mut Viewport) -> bool {
    let Some(line) = first_marked_line(lines) else {
        return false;
    };
    viewport.start_smooth_scroll_to_center(line);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[MarkupLine]) -> Vec<String> {
        lines.iter().map(MarkupLine::plain).collect()
    }

    #[test]
    fn test_paragraphs_and_breaks_become_lines() {
        let lines = layout("<p>Invoice #12345</p><p>Date: 2024-01-02<br/>Due now</p>", 80);
        assert_eq!(plain(&lines), ["Invoice #12345", "Date: 2024-01-02", "Due now"]);
    }

    #[test]
    fn test_table_cells_are_joined() {
        let markup = "<table><tr><th>Item</th><th>Price</th></tr>\
                      <tr><td>Widget</td><td>$130.00</td></tr></table>";
        assert_eq!(plain(&layout(markup, 80)), ["Item | Price", "Widget | $130.00"]);
    }

    #[test]
    fn test_list_items_get_bullets() {
        let lines = layout("<ul><li>one</li><li>two</li></ul>", 80);
        assert_eq!(plain(&lines), ["• one", "• two"]);
    }

    #[test]
    fn test_entities_are_decoded() {
        let lines = layout("<p>A &amp; B &lt;ok&gt; &quot;q&quot; it&#39;s</p>", 80);
        assert_eq!(plain(&lines), ["A & B <ok> \"q\" it's"]);
    }

    #[test]
    fn test_marked_text_becomes_highlighted_span() {
        let lines = layout("<p><mark>Total</mark>: $130.00</p>", 80);
        assert_eq!(
            lines[0].spans,
            vec![
                MarkupSpan {
                    text: "Total".to_string(),
                    marked: true
                },
                MarkupSpan {
                    text: ": $130.00".to_string(),
                    marked: false
                },
            ]
        );
    }

    #[test]
    fn test_long_lines_wrap_at_spaces() {
        let lines = layout("the quick brown fox jumps", 10);
        assert_eq!(plain(&lines), ["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_long_words_hard_break() {
        let lines = layout("abcdefghij", 4);
        assert_eq!(plain(&lines), ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_highlight_across_rows() {
        let lines = layout("aaaa <mark>bbbb cccc</mark>", 9);
        assert_eq!(plain(&lines), ["aaaa bbbb", "cccc"]);
        assert!(lines[0].has_mark());
        assert!(lines[1].spans.iter().all(|s| s.marked));
    }

    #[test]
    fn test_unknown_tags_are_dropped() {
        let lines = layout("<span class=\"x\">hi</span> <b>there</b>", 80);
        assert_eq!(plain(&lines), ["hi there"]);
    }

    #[test]
    fn test_raw_newlines_break_lines() {
        assert_eq!(plain(&layout("one\ntwo", 80)), ["one", "two"]);
    }

    #[test]
    fn test_placeholder_text_is_one_line() {
        assert_eq!(plain(&layout("no data", 80)), ["no data"]);
    }

    #[test]
    fn test_scroll_to_first_match_centres_marked_row() {
        let markup: String = (0..40)
            .map(|i| {
                if i == 30 {
                    "<p><mark>Total</mark></p>".to_string()
                } else {
                    format!("<p>line {i}</p>")
                }
            })
            .collect();
        let lines = layout(&markup, 40);
        assert_eq!(first_marked_line(&lines), Some(30));

        let mut viewport = Viewport::new(40, 10, lines.len());
        assert!(scroll_to_first_match(&lines, &mut viewport));
        while viewport.step_animation() {}
        assert_eq!(viewport.offset(), 25);
    }

    #[test]
    fn test_scroll_without_marker_is_noop() {
        let lines = layout("<p>nothing here</p>", 40);
        let mut viewport = Viewport::new(40, 10, lines.len());
        assert!(!scroll_to_first_match(&lines, &mut viewport));
        assert!(!viewport.is_animating());
    }
}
