use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Answer, AnswerService, ServiceError, SuggestionService};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build()
}

fn transport_error(url: &str, err: &ureq::Error) -> ServiceError {
    let message = match err {
        ureq::Error::Status(code, _) => format!("HTTP {code}"),
        ureq::Error::Transport(transport) => transport.to_string(),
    };
    ServiceError::Transport {
        url: url.to_string(),
        message,
    }
}

/// Keyword list as served by the suggestion endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeywordsPayload {
    List(Vec<String>),
    Wrapped { keywords: Vec<String> },
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswerPayload {
    #[serde(alias = "answerMarkup")]
    answer: String,
}

/// Decode a suggestion response body.
///
/// Accepts a bare JSON array of strings or `{"keywords": [...]}`.
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] if the body matches neither shape.
pub fn decode_keywords(url: &str, body: &str) -> Result<Vec<String>, ServiceError> {
    let payload: KeywordsPayload =
        serde_json::from_str(body).map_err(|err| ServiceError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })?;
    Ok(match payload {
        KeywordsPayload::List(keywords) | KeywordsPayload::Wrapped { keywords } => keywords,
    })
}

/// Decode an answer response body (`{"answer": "..."}` or `{"answerMarkup": "..."}`).
///
/// # Errors
///
/// Returns [`ServiceError::Decode`] if the body has no answer field.
pub fn decode_answer(url: &str, body: &str) -> Result<Answer, ServiceError> {
    let payload: AnswerPayload =
        serde_json::from_str(body).map_err(|err| ServiceError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })?;
    Ok(Answer {
        answer_markup: payload.answer,
    })
}

/// `GET {url}` keyword suggestion client.
#[derive(Debug, Clone)]
pub struct HttpSuggestionService {
    url: String,
    agent: ureq::Agent,
}

impl HttpSuggestionService {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            agent: agent(),
        }
    }
}

impl SuggestionService for HttpSuggestionService {
    fn suggestions(&self) -> Result<Vec<String>, ServiceError> {
        let _scope = crate::perf::scope("services.suggestions");
        let response = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|err| transport_error(&self.url, &err))?;
        let body = response.into_string().map_err(|err| ServiceError::Decode {
            url: self.url.clone(),
            message: err.to_string(),
        })?;
        decode_keywords(&self.url, &body)
    }
}

/// `POST {url}` question-answering client.
#[derive(Debug, Clone)]
pub struct HttpAnswerService {
    url: String,
    agent: ureq::Agent,
}

impl HttpAnswerService {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            agent: agent(),
        }
    }
}

impl AnswerService for HttpAnswerService {
    fn ask(&self, question: &str) -> Result<Answer, ServiceError> {
        let _scope = crate::perf::scope("services.ask");
        let response = self
            .agent
            .post(&self.url)
            .send_json(AskRequest { question })
            .map_err(|err| transport_error(&self.url, &err))?;
        let body = response.into_string().map_err(|err| ServiceError::Decode {
            url: self.url.clone(),
            message: err.to_string(),
        })?;
        decode_answer(&self.url, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:8000/keywords";

    #[test]
    fn test_decode_keywords_accepts_bare_array() {
        let keywords = decode_keywords(URL, r#"["Invoice", "Total"]"#).unwrap();
        assert_eq!(keywords, vec!["Invoice", "Total"]);
    }

    #[test]
    fn test_decode_keywords_accepts_wrapped_object() {
        let keywords = decode_keywords(URL, r#"{"keywords": ["Date", "Customer"]}"#).unwrap();
        assert_eq!(keywords, vec!["Date", "Customer"]);
    }

    #[test]
    fn test_decode_keywords_rejects_other_shapes() {
        let err = decode_keywords(URL, r#"{"items": 3}"#).unwrap_err();
        assert!(matches!(err, ServiceError::Decode { .. }));
        assert!(err.to_string().contains(URL));
    }

    #[test]
    fn test_decode_answer_reads_answer_field() {
        let answer = decode_answer(URL, r#"{"answer": "<p>Yes</p>\nline two"}"#).unwrap();
        assert_eq!(answer.answer_markup, "<p>Yes</p>\nline two");
    }

    #[test]
    fn test_decode_answer_accepts_answer_markup_alias() {
        let answer = decode_answer(URL, r#"{"answerMarkup": "<b>ok</b>"}"#).unwrap();
        assert_eq!(answer.answer_markup, "<b>ok</b>");
    }

    #[test]
    fn test_ask_request_serializes_question() {
        let body = serde_json::to_string(&AskRequest { question: "who signed?" }).unwrap();
        assert_eq!(body, r#"{"question":"who signed?"}"#);
    }
}
