use std::fmt;

use serde::{Deserialize, Serialize};

/// Table layout. Identifiers are SQLite rowids rather than declared keys.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS phrases (
    phrase TEXT NOT NULL,
    list TEXT NOT NULL DEFAULT '',
    enabled INTEGER NOT NULL DEFAULT 1,
    difficulty REAL
);

CREATE TABLE IF NOT EXISTS batches (
    batch_id INTEGER NOT NULL,
    start_time TEXT,
    end_time TEXT
);

CREATE TABLE IF NOT EXISTS response_history (
    batch_id INTEGER NOT NULL,
    phrase_id INTEGER NOT NULL,
    response_time_ms INTEGER,
    response_status TEXT
);

CREATE INDEX IF NOT EXISTS idx_phrases_phrase ON phrases(phrase);
CREATE INDEX IF NOT EXISTS idx_response_history_batch ON response_history(batch_id);
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhraseId(pub i64);

impl fmt::Display for PhraseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BatchId(pub i64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored phrase as read back from the store. Changes go through the store,
/// never through this value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: PhraseId,
    pub text: String,
    pub list: String,
    pub enabled: bool,
    pub difficulty: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Correct,
    Incorrect,
}

impl ResponseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseStatus::Correct => "Correct",
            ResponseStatus::Incorrect => "Incorrect",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Correct" => Some(ResponseStatus::Correct),
            "Incorrect" => Some(ResponseStatus::Incorrect),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub batch_id: BatchId,
    pub phrase_id: PhraseId,
    pub response_time_ms: u64,
    pub status: ResponseStatus,
}

/// Result of sampling: the freshly allocated batch and its phrases in
/// presentation order.
#[derive(Clone, Debug)]
pub struct SampledBatch {
    pub batch_id: BatchId,
    pub phrases: Vec<Phrase>,
}
