use std::collections::HashSet;

/// Minimum length of a word taken from document text as a keyword.
pub const MIN_KEYWORD_CHARS: usize = 4;
/// Most keywords taken from document text.
pub const MAX_TEXT_KEYWORDS: usize = 200;

/// Ordered set of distinct candidate keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    /// Build from candidates, trimming each and dropping blanks and repeats.
    /// The first occurrence of a repeated keyword keeps its position.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .filter_map(|w| {
                let w: String = w.into();
                let trimmed = w.trim();
                (!trimmed.is_empty() && seen.insert(trimmed.to_string()))
                    .then(|| trimmed.to_string())
            })
            .collect();
        Self { words }
    }

    /// Parse a keyword file: one keyword per line, `#` starts a comment line.
    pub fn from_keyword_file(contents: &str) -> Self {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Distinct words of at least [`MIN_KEYWORD_CHARS`] letters from `text`,
    /// in order of first appearance, at most [`MAX_TEXT_KEYWORDS`].
    ///
    /// Words differing only in case count once.
    pub fn from_text_words(text: &str) -> Self {
        let mut seen = HashSet::new();
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .filter(|w| seen.insert(w.to_lowercase()))
            .take(MAX_TEXT_KEYWORDS)
            .map(str::to_string)
            .collect();
        Self { words }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Candidates whose lowercase form contains `partial`'s lowercase form,
/// in candidate order.
///
/// ```
/// use pagewise::search::{KeywordSet, filter};
///
/// let keywords = KeywordSet::new(["Invoice", "Total", "Subtotal"]);
/// let matches: Vec<_> = filter(&keywords, "TOT").collect();
/// assert_eq!(matches, ["Total", "Subtotal"]);
/// ```
pub fn filter<'a>(
    candidates: &'a KeywordSet,
    partial: &str,
) -> impl Iterator<Item = &'a str> + use<'a> {
    let needle = partial.to_lowercase();
    candidates
        .iter()
        .filter(move |candidate| candidate.to_lowercase().contains(&needle))
}

/// Keeps the suggestion list in step with the typed input.
#[derive(Debug, Clone, Default)]
pub struct SuggestionFilter {
    keywords: KeywordSet,
    input: String,
    matches: Vec<String>,
    selected: Option<usize>,
}

impl SuggestionFilter {
    pub fn new(keywords: KeywordSet) -> Self {
        let mut filter = Self {
            keywords,
            ..Self::default()
        };
        filter.refresh();
        filter
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_keyword(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.matches.get(i))
            .map(String::as_str)
    }

    /// Replace the typed input and re-filter. Clears the selection.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.selected = None;
        self.refresh();
    }

    /// Swap in a fresh vocabulary, re-filtering against the current input.
    pub fn replace_keywords(&mut self, keywords: KeywordSet) {
        let previous = self.selected_keyword().map(str::to_string);
        self.keywords = keywords;
        self.refresh();
        self.selected = previous.and_then(|p| self.matches.iter().position(|m| *m == p));
    }

    pub fn select_next(&mut self) {
        if self.matches.is_empty() {
            self.selected = None;
            return;
        }
        let last = self.matches.len() - 1;
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
    }

    pub fn select_previous(&mut self) {
        self.selected = match self.selected {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    fn refresh(&mut self) {
        self.matches = filter(&self.keywords, &self.input)
            .map(str::to_string)
            .collect();
    }
}
