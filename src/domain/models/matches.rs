//! Pattern-query results
//!
//! Semgrex-style endpoints answer with one object per sentence, keyed by match
//! index, plus a reserved `length` entry:
//!
//! ```json
//! {"sentences": [{"length": 1, "0": {"text": "Alice", "begin": 0, "end": 1}}]}
//! ```
//!
//! `flatten_matches` turns that into a flat list of matched words tagged with
//! the sentence they came from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reserved per-sentence key holding the match count
pub const LENGTH_KEY: &str = "length";

/// Key under which a flattened word records its sentence
pub const SENT_INDEX_KEY: &str = "sent_index";

/// Errors raised when a query result does not have the expected shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchesError {
    #[error("Query result has no 'sentences' array")]
    MissingSentences,

    #[error("Sentence {0} is not an object")]
    InvalidSentence(usize),

    #[error("Match '{key}' in sentence {sent_index} is not an object")]
    InvalidMatch { sent_index: usize, key: String },

    #[error("Query result is plain text, not JSON")]
    NotJson,
}

/// A matched word annotated with the index of its sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedWord {
    pub sent_index: usize,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl IndexedWord {
    /// String-valued field of the match, such as `text` or `word`
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Body of a pattern-query response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Json(Value),
    Text(String),
}

impl QueryOutput {
    /// Parse the body as JSON, keeping the raw text when that fails
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn flatten(&self, sent_index: Option<usize>) -> Result<Vec<IndexedWord>, MatchesError> {
        let value = self.as_json().ok_or(MatchesError::NotJson)?;
        flatten_matches(value, sent_index)
    }
}

/// Flatten per-sentence matches into indexed words.
///
/// Matches inside a sentence are emitted in numeric key order. With
/// `sent_index`, only that sentence contributes.
pub fn flatten_matches(
    matches: &Value,
    sent_index: Option<usize>,
) -> Result<Vec<IndexedWord>, MatchesError> {
    let sentences = matches
        .get("sentences")
        .and_then(Value::as_array)
        .ok_or(MatchesError::MissingSentences)?;

    let mut words = Vec::new();
    for (index, sentence) in sentences.iter().enumerate() {
        if sent_index.is_some_and(|wanted| wanted != index) {
            continue;
        }

        let entries = sentence
            .as_object()
            .ok_or(MatchesError::InvalidSentence(index))?;

        let mut keyed: Vec<(&String, &Value)> =
            entries.iter().filter(|(k, _)| *k != LENGTH_KEY).collect();
        keyed.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });

        for (key, entry) in keyed {
            let mut fields = entry
                .as_object()
                .ok_or_else(|| MatchesError::InvalidMatch {
                    sent_index: index,
                    key: key.clone(),
                })?
                .clone();
            // The originating sentence replaces any index the server reported
            fields.remove(SENT_INDEX_KEY);
            words.push(IndexedWord {
                sent_index: index,
                fields,
            });
        }
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn two_sentences() -> Value {
        json!({
            "sentences": [
                {"length": 1, "0": {"word": "Alice"}},
                {"length": 1, "0": {"word": "ran"}}
            ]
        })
    }

    #[test]
    fn test_flatten_tags_sentence_index() {
        let words = flatten_matches(&two_sentences(), None).unwrap();

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].sent_index, 0);
        assert_eq!(words[0].field_str("word"), Some("Alice"));
        assert_eq!(words[1].sent_index, 1);
        assert_eq!(words[1].field_str("word"), Some("ran"));
        assert!(words.iter().all(|w| !w.fields.contains_key(LENGTH_KEY)));
    }

    #[test]
    fn test_flatten_restricts_to_sentence() {
        let words = flatten_matches(&two_sentences(), Some(1)).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].field_str("word"), Some("ran"));

        let first = flatten_matches(&two_sentences(), Some(0)).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].field_str("word"), Some("Alice"));

        assert!(flatten_matches(&two_sentences(), Some(7)).unwrap().is_empty());
    }

    #[test]
    fn test_flatten_orders_matches_numerically() {
        let mut sentence = Map::new();
        sentence.insert(LENGTH_KEY.to_string(), json!(11));
        for i in 0..11 {
            sentence.insert(i.to_string(), json!({ "begin": i }));
        }
        let matches = json!({ "sentences": [Value::Object(sentence)] });

        let words = flatten_matches(&matches, None).unwrap();
        let begins: Vec<i64> = words
            .iter()
            .map(|w| w.fields["begin"].as_i64().unwrap())
            .collect();
        assert_eq!(begins, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_serialized_word_merges_sentence_index() {
        let words = flatten_matches(&two_sentences(), Some(0)).unwrap();
        let value = serde_json::to_value(&words[0]).unwrap();
        assert_eq!(value, json!({"word": "Alice", "sent_index": 0}));
    }

    #[test]
    fn test_sentence_index_overrides_match_field() {
        let matches = json!({
            "sentences": [{"length": 1, "0": {"word": "x", "sent_index": 9}}]
        });

        let words = flatten_matches(&matches, None).unwrap();
        assert_eq!(words[0].sent_index, 0);
        assert!(!words[0].fields.contains_key(SENT_INDEX_KEY));

        let serialized = serde_json::to_string(&words[0]).unwrap();
        assert_eq!(serialized.matches("\"sent_index\"").count(), 1);
        let value: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(value, json!({"word": "x", "sent_index": 0}));
    }

    #[test]
    fn test_flatten_rejects_malformed_results() {
        assert_eq!(
            flatten_matches(&json!({"matches": []}), None),
            Err(MatchesError::MissingSentences)
        );
        assert_eq!(
            flatten_matches(&json!({"sentences": [3]}), None),
            Err(MatchesError::InvalidSentence(0))
        );
        assert_eq!(
            flatten_matches(&json!({"sentences": [{"0": "Alice"}]}), None),
            Err(MatchesError::InvalidMatch {
                sent_index: 0,
                key: "0".to_string()
            })
        );
    }

    #[test]
    fn test_query_output_falls_back_to_text() {
        assert_eq!(
            QueryOutput::from_body("{\"sentences\": []}".to_string()),
            QueryOutput::Json(json!({"sentences": []}))
        );
        let text = QueryOutput::from_body("(ROOT (S ...".to_string());
        assert_eq!(text, QueryOutput::Text("(ROOT (S ...".to_string()));
        assert_eq!(text.flatten(None), Err(MatchesError::NotJson));
    }

    proptest! {
        #[test]
        fn prop_flatten_emits_every_match_once(counts in proptest::collection::vec(0usize..6, 0..6)) {
            let sentences: Vec<Value> = counts
                .iter()
                .map(|&n| {
                    let mut s = Map::new();
                    s.insert(LENGTH_KEY.to_string(), json!(n));
                    for i in 0..n {
                        s.insert(i.to_string(), json!({ "index": i }));
                    }
                    Value::Object(s)
                })
                .collect();
            let matches = json!({ "sentences": sentences });

            let words = flatten_matches(&matches, None).unwrap();
            prop_assert_eq!(words.len(), counts.iter().sum::<usize>());

            for (index, &n) in counts.iter().enumerate() {
                let only = flatten_matches(&matches, Some(index)).unwrap();
                prop_assert_eq!(only.len(), n);
                prop_assert!(only.iter().all(|w| w.sent_index == index));
            }
        }
    }
}
