//! Report types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Answer label -> occurrence count for one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDistribution {
    pub buckets: BTreeMap<String, u64>,
}

impl FieldDistribution {
    pub(crate) fn bump(&mut self, label: &str) {
        *self.buckets.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Count for one label, 0 when absent
    pub fn count(&self, label: &str) -> u64 {
        self.buckets.get(label).copied().unwrap_or(0)
    }

    /// Label with the strictly greatest count.
    ///
    /// On a tie the first label in iteration order wins; callers must not
    /// depend on which one that is.
    pub fn most_common(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (label, &count) in &self.buckets {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Submissions created on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`, UTC
    pub date: String,
    pub count: u64,
}

/// How often a field was left unanswered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedField {
    pub field_id: String,
    pub field_name: String,
    pub skip_count: u64,
    /// Percentage of all submissions, 0 when there are none
    pub skip_rate: f64,
}

/// Consolidated statistics for one form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Total submissions scanned
    pub count: u64,
    /// Field ID -> answer distribution
    pub field_breakdown: BTreeMap<String, FieldDistribution>,
    /// Field ID -> mean of numeric answers
    pub average_rating: BTreeMap<String, f64>,
    /// Trailing daily counts, oldest first
    pub response_trends: Vec<TrendPoint>,
    /// Field ID -> most frequent answer label
    pub most_common_answers: BTreeMap<String, String>,
    /// Per-field skip statistics in schema order
    pub skipped_fields: Vec<SkippedField>,
    /// Answered field slots over all field slots, as a percentage
    pub completion_rate: f64,
}

impl AnalyticsReport {
    /// Skip statistics for one field
    pub fn skipped(&self, field_id: &str) -> Option<&SkippedField> {
        self.skipped_fields.iter().find(|s| s.field_id == field_id)
    }
}
