//! Single-pass aggregation
//!
//! The aggregator is fed submissions one at a time in storage order and
//! keeps only running tallies, so a report never needs the whole history
//! in memory.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::report::{AnalyticsReport, FieldDistribution, SkippedField, TrendPoint};
use crate::schema::{FieldSchema, Form};
use crate::submission::{AnswerValue, Submission};

/// Length of the trailing trend window in days
pub const TREND_DAYS: i64 = 7;

/// Running tallies for one non-PII field
#[derive(Debug, Default)]
struct FieldTally {
    distribution: FieldDistribution,
    /// Set once any non-skipped answer has been seen
    answered: bool,
    skips: u64,
    numeric_sum: f64,
    numeric_count: u64,
}

impl FieldTally {
    fn observe(&mut self, answer: Option<&AnswerValue>) {
        let Some(answer) = answer.filter(|a| !a.is_blank()) else {
            self.skips += 1;
            return;
        };

        self.answered = true;
        match answer {
            AnswerValue::String(s) => self.distribution.bump(s),
            AnswerValue::Number(n) => {
                self.distribution.bump("value");
                self.numeric_sum += n;
                self.numeric_count += 1;
            }
            AnswerValue::Bool(b) => self.distribution.bump(if *b { "true" } else { "false" }),
            AnswerValue::List(_) => {
                for item in answer.string_items() {
                    self.distribution.bump(item);
                }
            }
            AnswerValue::Other(_) => self.distribution.bump("other"),
            // blank, handled above
            AnswerValue::Null => {}
        }
    }
}

/// Accumulates a report for one form
#[derive(Debug)]
pub struct Aggregator<'a> {
    fields: Vec<&'a FieldSchema>,
    tallies: Vec<FieldTally>,
    total: u64,
    daily: HashMap<NaiveDate, u64>,
}

impl<'a> Aggregator<'a> {
    /// Start an empty aggregation over `form`'s non-PII fields
    pub fn new(form: &'a Form) -> Self {
        let fields: Vec<&FieldSchema> = form.fields.iter().filter(|f| !f.is_pii).collect();
        let tallies = fields.iter().map(|_| FieldTally::default()).collect();
        Self {
            fields,
            tallies,
            total: 0,
            daily: HashMap::new(),
        }
    }

    /// Fold one submission into the tallies
    pub fn observe(&mut self, submission: &Submission) {
        self.total += 1;
        *self
            .daily
            .entry(submission.created_at.date_naive())
            .or_insert(0) += 1;

        for (field, tally) in self.fields.iter().zip(self.tallies.iter_mut()) {
            tally.observe(submission.answer(&field.id));
        }
    }

    /// Produce the report, anchoring the trend window at `now`
    pub fn finish(self, now: DateTime<Utc>) -> AnalyticsReport {
        let total = self.total;
        let mut report = AnalyticsReport {
            count: total,
            response_trends: trend(&self.daily, now.date_naive()),
            ..Default::default()
        };

        let mut answered_slots = 0u64;
        for (field, tally) in self.fields.iter().zip(self.tallies) {
            answered_slots += total - tally.skips;

            report.skipped_fields.push(SkippedField {
                field_id: field.id.clone(),
                field_name: field.label.clone(),
                skip_count: tally.skips,
                skip_rate: percentage(tally.skips, total),
            });

            if tally.numeric_count > 0 {
                report.average_rating.insert(
                    field.id.clone(),
                    tally.numeric_sum / tally.numeric_count as f64,
                );
            }

            if !tally.answered {
                continue;
            }
            if let Some(label) = tally.distribution.most_common() {
                report
                    .most_common_answers
                    .insert(field.id.clone(), label.to_string());
            }
            report
                .field_breakdown
                .insert(field.id.clone(), tally.distribution);
        }

        let slots = self.fields.len() as u64 * total;
        report.completion_rate = percentage(answered_slots, slots);
        report
    }
}

/// Aggregate an already materialized submission list
pub fn aggregate<'s>(
    form: &Form,
    submissions: impl IntoIterator<Item = &'s Submission>,
    now: DateTime<Utc>,
) -> AnalyticsReport {
    let mut aggregator = Aggregator::new(form);
    for submission in submissions {
        aggregator.observe(submission);
    }
    aggregator.finish(now)
}

fn trend(daily: &HashMap<NaiveDate, u64>, today: NaiveDate) -> Vec<TrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            TrendPoint {
                date: day.format("%Y-%m-%d").to_string(),
                count: daily.get(&day).copied().unwrap_or(0),
            }
        })
        .collect()
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
