use std::time::Instant;

use super::highlight::highlight;
use super::suggest::{KeywordSet, SuggestionFilter};

/// Neutral answer placeholder.
pub const NO_DATA: &str = "no data";
/// Answer placeholder shown after a failed answer fetch.
pub const ANSWER_ERROR: &str = "Failed to fetch answer.";

/// Suggestion vocabulary loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestionState {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Answer loading for the latest submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerState {
    #[default]
    Idle,
    /// Waiting on the answer to query number `seq`.
    Loading { seq: u64 },
    Ready,
    /// Terminal for that query; a new submit starts over.
    Failed,
}

/// What the answer area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnswerContent {
    #[default]
    NoData,
    Markup(String),
    Error(String),
}

impl AnswerContent {
    /// Markup to display.
    pub fn markup(&self) -> &str {
        match self {
            Self::NoData => NO_DATA,
            Self::Markup(markup) | Self::Error(markup) => markup,
        }
    }
}

/// The last submitted search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub submitted_at: Instant,
}

/// Where submitted queries go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Highlight matches in this markup.
    Local { markup: String },
    /// Ask the answering service.
    Remote,
}

/// Outcome of [`SearchPanel::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank query, nothing happened.
    Ignored,
    /// Local markup was re-highlighted.
    Highlighted,
    /// The question must be sent to the answering service.
    Ask { question: String, seq: u64 },
}

/// Search box state for one document session.
///
/// Composes a [`SuggestionFilter`] with two independent loading machines:
/// one for the suggestion vocabulary, one for answers.
#[derive(Debug, Clone)]
pub struct SearchPanel {
    mode: SearchMode,
    filter: SuggestionFilter,
    suggestions: SuggestionState,
    answer: AnswerState,
    content: AnswerContent,
    last_query: Option<SearchQuery>,
    next_seq: u64,
}

impl SearchPanel {
    pub fn new(mode: SearchMode) -> Self {
        let content = match &mode {
            SearchMode::Local { markup } if !markup.is_empty() => {
                AnswerContent::Markup(markup.clone())
            }
            SearchMode::Local { .. } | SearchMode::Remote => AnswerContent::NoData,
        };
        Self {
            mode,
            filter: SuggestionFilter::default(),
            suggestions: SuggestionState::Idle,
            answer: AnswerState::Idle,
            content,
            last_query: None,
            next_seq: 0,
        }
    }

    pub fn remote() -> Self {
        Self::new(SearchMode::Remote)
    }

    pub const fn mode(&self) -> &SearchMode {
        &self.mode
    }

    /// Switch to local highlighting over `markup` and show it un-highlighted.
    pub fn set_local_markup(&mut self, markup: String) {
        self.content = AnswerContent::Markup(markup.clone());
        self.mode = SearchMode::Local { markup };
        self.answer = AnswerState::Idle;
    }

    pub fn query(&self) -> &str {
        self.filter.input()
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.filter.set_input(text);
    }

    pub fn push_char(&mut self, ch: char) {
        let mut text = self.query().to_string();
        text.push(ch);
        self.filter.set_input(text);
    }

    pub fn pop_char(&mut self) {
        let mut text = self.query().to_string();
        if text.pop().is_some() {
            self.filter.set_input(text);
        }
    }

    pub fn clear_query(&mut self) {
        self.filter.set_input(String::new());
    }

    pub const fn filter(&self) -> &SuggestionFilter {
        &self.filter
    }

    pub fn select_next_suggestion(&mut self) {
        self.filter.select_next();
    }

    pub fn select_previous_suggestion(&mut self) {
        self.filter.select_previous();
    }

    /// Copy the selected suggestion into the query. Returns whether one was selected.
    pub fn accept_suggestion(&mut self) -> bool {
        let Some(keyword) = self.filter.selected_keyword().map(str::to_string) else {
            return false;
        };
        self.filter.set_input(keyword);
        true
    }

    pub const fn suggestion_state(&self) -> SuggestionState {
        self.suggestions
    }

    pub const fn answer_state(&self) -> AnswerState {
        self.answer
    }

    pub const fn content(&self) -> &AnswerContent {
        &self.content
    }

    pub const fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    pub fn begin_suggestions(&mut self) {
        self.suggestions = SuggestionState::Loading;
    }

    /// Seed the vocabulary without a fetch.
    pub fn seed_keywords(&mut self, keywords: KeywordSet) {
        self.filter.replace_keywords(keywords);
        self.suggestions = SuggestionState::Ready;
    }

    /// Apply a finished vocabulary fetch.
    ///
    /// A failure keeps the previous vocabulary; it is logged, not shown.
    pub fn suggestions_loaded(&mut self, result: Result<Vec<String>, String>) {
        match result {
            Ok(words) => self.filter.replace_keywords(KeywordSet::new(words)),
            Err(error) => {
                tracing::warn!(%error, "keyword suggestions unavailable; keeping previous list");
            }
        }
        self.suggestions = SuggestionState::Ready;
    }

    /// Submit the current query.
    ///
    /// Blank queries are ignored. Local mode highlights synchronously; remote
    /// mode enters loading and hands back the question to ask.
    pub fn submit(&mut self, now: Instant) -> Submission {
        let text = self.query().trim().to_string();
        if text.is_empty() {
            return Submission::Ignored;
        }
        self.last_query = Some(SearchQuery {
            text: text.clone(),
            submitted_at: now,
        });
        match &self.mode {
            SearchMode::Local { markup } => {
                self.content = AnswerContent::Markup(highlight(markup, &text).into_owned());
                self.answer = AnswerState::Ready;
                Submission::Highlighted
            }
            SearchMode::Remote => {
                self.next_seq += 1;
                let seq = self.next_seq;
                self.answer = AnswerState::Loading { seq };
                self.content = AnswerContent::NoData;
                Submission::Ask {
                    question: text,
                    seq,
                }
            }
        }
    }

    /// Apply the answer to query `seq`.
    ///
    /// Returns `false`, leaving state alone, when `seq` is not the query
    /// currently loading.
    pub fn answer_loaded(&mut self, seq: u64, result: Result<String, String>) -> bool {
        if self.answer != (AnswerState::Loading { seq }) {
            return false;
        }
        match result {
            Ok(markup) => {
                self.content = AnswerContent::Markup(normalize_newlines(&markup));
                self.answer = AnswerState::Ready;
            }
            Err(error) => {
                tracing::warn!(%error, seq, "answer fetch failed");
                self.content = AnswerContent::Error(ANSWER_ERROR.to_string());
                self.answer = AnswerState::Failed;
            }
        }
        true
    }
}

/// Replace newline sequences with `<br/>`, including the two-character
/// escaped form `\n` some services emit.
pub fn normalize_newlines(markup: &str) -> String {
    markup
        .replace("\r\n", "<br/>")
        .replace("\\n", "<br/>")
        .replace('\n', "<br/>")
}
