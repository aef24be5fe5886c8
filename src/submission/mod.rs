//! Submission model
//!
//! A submission is an immutable answer set recorded against one form.
//! Answers are kept as a closed [`AnswerValue`] union so that validation
//! and aggregation can match on every shape exhaustively.

mod value;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use value::AnswerValue;

/// Answers keyed by field identifier
pub type Answers = BTreeMap<String, AnswerValue>;

/// An accepted form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Unique submission ID
    pub id: String,
    /// Form this submission belongs to
    pub form_id: String,
    /// Field ID -> answer
    #[serde(default)]
    pub answers: Answers,
    /// Ingestion time
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Create a submission stamped with a fresh ID and the current time
    pub fn new(form_id: impl Into<String>, answers: Answers) -> Self {
        Self::at(form_id, answers, Utc::now())
    }

    /// Create a submission with an explicit creation time
    pub fn at(form_id: impl Into<String>, answers: Answers, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            form_id: form_id.into(),
            answers,
            created_at,
        }
    }

    /// Get the answer for a field
    pub fn answer(&self, field_id: &str) -> Option<&AnswerValue> {
        self.answers.get(field_id)
    }
}
