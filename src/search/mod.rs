//! In-document search.
//!
//! Provides:
//! - Literal, case-insensitive match highlighting in markup
//! - Keyword suggestions narrowed as the user types
//! - The search panel state machine (suggestion and answer loading)

mod highlight;
mod panel;
mod suggest;

pub use highlight::{MARK_CLOSE, MARK_OPEN, count_marks, escape_term, highlight};
pub(crate) use highlight::{decode_entity, entity_len};
pub use panel::{
    ANSWER_ERROR, AnswerContent, AnswerState, NO_DATA, SearchMode, SearchPanel, SearchQuery,
    SuggestionState, Submission, normalize_newlines,
};
pub use suggest::{
    KeywordSet, MAX_TEXT_KEYWORDS, MIN_KEYWORD_CHARS, SuggestionFilter, filter,
};

/// Build searchable markup from plain page text: one escaped paragraph per
/// page, source line breaks kept as `<br/>`.
pub fn markup_from_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| {
            let escaped = escape_html(page).replace('\n', "<br/>");
            format!("<p>{escaped}</p>")
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}
