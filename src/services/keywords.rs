use super::{ServiceError, SuggestionService};
use crate::search::KeywordSet;

/// A fixed vocabulary, e.g. loaded from a keyword file.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestions {
    keywords: KeywordSet,
}

impl StaticSuggestions {
    pub const fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }
}

impl SuggestionService for StaticSuggestions {
    fn suggestions(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.keywords.as_slice().to_vec())
    }
}
