use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Opening highlight marker.
pub const MARK_OPEN: &str = "<mark>";
/// Closing highlight marker.
pub const MARK_CLOSE: &str = "</mark>";

/// Characters escaped before a term is compiled into a pattern.
const METACHARACTERS: &[char] = &[
    '-', '/', '\\', '^', '$', '*', '+', '?', '.', '(', ')', '|', '[', ']', '{', '}',
];

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

/// Escape `term` so every metacharacter matches literally.
///
/// ```
/// use pagewise::search::escape_term;
///
/// assert_eq!(escape_term("$130.00"), r"\$130\.00");
/// ```
pub fn escape_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() * 2);
    for ch in term.chars() {
        if METACHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wrap every case-insensitive occurrence of `term` in `markup` with
/// [`MARK_OPEN`]/[`MARK_CLOSE`].
///
/// Only text between tags is searched, with entities read as the character
/// they stand for, so `Smith & Sons` matches `Smith &amp; Sons`. Text already
/// inside a marker is left alone, so applying the same term twice gives the
/// same markers.
/// An empty term returns the markup unchanged.
///
/// ```
/// use pagewise::search::highlight;
///
/// let out = highlight("<p>Total: $130.00</p>", "total");
/// assert_eq!(out, "<p><mark>Total</mark>: $130.00</p>");
/// ```
pub fn highlight<'a>(markup: &'a str, term: &str) -> Cow<'a, str> {
    if term.is_empty() {
        return Cow::Borrowed(markup);
    }
    let pattern = match RegexBuilder::new(&escape_term(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(err) => {
            tracing::warn!(%err, "highlight term did not compile");
            return Cow::Borrowed(markup);
        }
    };

    let mut out = String::new();
    let mut changed = false;
    let mut mark_depth = 0usize;
    let mut last = 0usize;

    let mut emit_text = |out: &mut String, text: &str, inside_mark: bool| {
        if inside_mark {
            out.push_str(text);
            return;
        }
        match mark_text(&pattern, text) {
            Some(marked) => {
                changed = true;
                out.push_str(&marked);
            }
            None => out.push_str(text),
        }
    };

    for tag in TAG.find_iter(markup) {
        emit_text(&mut out, &markup[last..tag.start()], mark_depth > 0);
        let name = tag_name(tag.as_str());
        if name.eq_ignore_ascii_case("mark") {
            mark_depth += 1;
        } else if name.eq_ignore_ascii_case("/mark") {
            mark_depth = mark_depth.saturating_sub(1);
        }
        out.push_str(tag.as_str());
        last = tag.end();
    }
    emit_text(&mut out, &markup[last..], mark_depth > 0);

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(markup)
    }
}

/// Stands in for entities with no known character, so no term matches them.
const UNKNOWN_ENTITY: char = '\u{fffc}';

/// Mark matches in the text between two tags.
///
/// The pattern runs over the decoded text, so `&amp;` is matched as `&` and
/// a match never starts or ends inside an entity.
fn mark_text(pattern: &Regex, text: &str) -> Option<String> {
    if !text.contains('&') {
        return match pattern.replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{MARK_OPEN}{}{MARK_CLOSE}", &caps[0])
        }) {
            Cow::Owned(marked) => Some(marked),
            Cow::Borrowed(_) => None,
        };
    }

    // (decoded offset, source offset) at the start of every decoded char
    let mut decoded = String::with_capacity(text.len());
    let mut offsets = Vec::with_capacity(text.len() + 1);
    let mut pos = 0;
    while let Some(ch) = text[pos..].chars().next() {
        offsets.push((decoded.len(), pos));
        let (len, ch) = match entity_len(&text[pos..]) {
            Some(len) => (
                len,
                decode_entity(&text[pos..pos + len]).unwrap_or(UNKNOWN_ENTITY),
            ),
            None => (ch.len_utf8(), ch),
        };
        decoded.push(ch);
        pos += len;
    }
    offsets.push((decoded.len(), text.len()));

    let source = |at: usize| {
        offsets
            .binary_search_by_key(&at, |&(decoded_at, _)| decoded_at)
            .map_or(text.len(), |i| offsets[i].1)
    };

    let mut out = String::new();
    let mut last = 0;
    for found in pattern.find_iter(&decoded) {
        let (start, end) = (source(found.start()), source(found.end()));
        out.push_str(&text[last..start]);
        out.push_str(MARK_OPEN);
        out.push_str(&text[start..end]);
        out.push_str(MARK_CLOSE);
        last = end;
    }
    if out.is_empty() {
        return None;
    }
    out.push_str(&text[last..]);
    Some(out)
}

/// Length of the entity reference `rest` starts with, e.g. 5 for `&amp;`.
pub(crate) fn entity_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = &body[..end];
    let valid = match name.strip_prefix('#') {
        Some(num) => match num.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        },
        None => {
            name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                && name.chars().all(|c| c.is_ascii_alphanumeric())
        }
    };
    (valid && name.len() <= 10).then_some(end + 2)
}

/// Character an entity reference such as `&lt;` or `&#39;` stands for.
pub(crate) fn decode_entity(entity: &str) -> Option<char> {
    let name = entity.strip_prefix('&')?.strip_suffix(';')?;
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}

/// Tag name with a leading `/` for closing tags: `</Mark >` gives `/Mark`.
fn tag_name(tag: &str) -> &str {
    let inner = tag.trim_start_matches('<').trim_end_matches('>').trim();
    let end = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_whitespace() || *c == '/' || *c == '>')
        .map_or(inner.len(), |(i, _)| i);
    &inner[..end]
}

/// Number of highlight markers in `markup`.
pub fn count_marks(markup: &str) -> usize {
    markup.matches(MARK_OPEN).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_term_is_identity() {
        let markup = "<p>Total: $130.00</p>";
        assert!(matches!(highlight(markup, ""), Cow::Borrowed(m) if m == markup));
    }

    #[test]
    fn test_total_is_marked_exactly_once() {
        let out = highlight("<p>Total: $130.00</p>", "Total");
        assert_eq!(out, "<p><mark>Total</mark>: $130.00</p>");
        assert_eq!(out.matches("<mark>Total</mark>").count(), 1);
    }

    #[test]
    fn test_matching_is_case_insensitive_and_keeps_original_case() {
        let out = highlight("Invoice and INVOICE and invoice", "invoice");
        assert_eq!(
            out,
            "<mark>Invoice</mark> and <mark>INVOICE</mark> and <mark>invoice</mark>"
        );
    }

    #[test]
    fn test_metacharacters_match_literally() {
        let out = highlight("<p>Total: $130.00 (net)</p>", "$130.00");
        assert_eq!(out, "<p>Total: <mark>$130.00</mark> (net)</p>");

        let out = highlight("a.b axb", "a.b");
        assert_eq!(out, "<mark>a.b</mark> axb");

        let out = highlight("x [1] {2} a|b c-d e/f", "[1]");
        assert_eq!(out, "x <mark>[1]</mark> {2} a|b c-d e/f");
    }

    #[test]
    fn test_escape_term_covers_every_metacharacter() {
        assert_eq!(
            escape_term(r"-/\^$*+?.()|[]{}"),
            r"\-\/\\\^\$\*\+\?\.\(\)\|\[\]\{\}"
        );
        assert_eq!(escape_term("plain"), "plain");
    }

    #[test]
    fn test_tags_are_not_searched() {
        let out = highlight(r#"<p class="para">para</p>"#, "p");
        assert_eq!(out, r#"<p class="para"><mark>p</mark>ara</p>"#);
    }

    #[test]
    fn test_no_match_borrows_input() {
        assert!(matches!(highlight("<p>nothing</p>", "total"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_second_application_adds_no_markers() {
        let once = highlight("<td>Total</td><td>total due</td>", "total").into_owned();
        let twice = highlight(&once, "total");
        assert_eq!(twice, once);
        assert_eq!(count_marks(&twice), 2);
    }

    #[test]
    fn test_entity_reference_lengths() {
        assert_eq!(entity_len("&amp; rest"), Some(5));
        assert_eq!(entity_len("&#39;s"), Some(5));
        assert_eq!(entity_len("&#x27;"), Some(6));
        assert_eq!(entity_len("& Sons;"), None);
        assert_eq!(entity_len("&#;"), None);
        assert_eq!(entity_len("&amp"), None);
    }

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("&lt;"), Some('<'));
        assert_eq!(decode_entity("&#39;"), Some('\''));
        assert_eq!(decode_entity("&#x41;"), Some('A'));
        assert_eq!(decode_entity("&copy;"), None);
    }

    #[test]
    fn test_unknown_entities_stay_whole() {
        let out = highlight("<p>&copy; copy</p>", "copy");
        assert_eq!(out, "<p>&copy; <mark>copy</mark></p>");
    }

    #[test]
    fn test_term_spanning_numeric_entity() {
        let out = highlight("<p>it&#x27;s it&#39;s</p>", "it's");
        assert_eq!(out, "<p><mark>it&#x27;s</mark> <mark>it&#39;s</mark></p>");
    }

    #[test]
    fn test_tag_name_parsing() {
        assert_eq!(tag_name("<mark>"), "mark");
        assert_eq!(tag_name("</mark>"), "/mark");
        assert_eq!(tag_name("<MARK class=\"x\">"), "MARK");
        assert_eq!(tag_name("<br/>"), "br");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn empty_term_never_changes_markup(markup in ".*") {
                prop_assert_eq!(highlight(&markup, ""), markup.as_str());
            }

            #[test]
            fn highlighting_twice_keeps_marker_count(
                words in proptest::collection::vec("[a-zA-Z$.]{1,8}", 0..20),
                term in "[a-zA-Z$.]{1,4}",
            ) {
                let markup = format!("<p>{}</p>", words.join(" "));
                let once = highlight(&markup, &term).into_owned();
                let twice = highlight(&once, &term).into_owned();
                prop_assert_eq!(count_marks(&once), count_marks(&twice));
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn removing_markers_restores_markup(
                words in proptest::collection::vec("[a-z]{1,8}", 0..20),
                term in "[a-z]{1,3}",
            ) {
                let markup = format!("<p>{}</p>", words.join(" "));
                let stripped = highlight(&markup, &term)
                    .replace(MARK_OPEN, "")
                    .replace(MARK_CLOSE, "");
                prop_assert_eq!(stripped, markup);
            }
        }
    }
}
