//! Submission ingestion
//!
//! validate → persist → publish. A submission is only published after it
//! has been stored, and publishing can never fail the request.

use super::error::{CoreError, CoreResult};
use super::service::FormService;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::validate;
use crate::submission::{Answers, Submission};

impl FormService {
    /// Accept a submission for a published form
    pub fn submit(&self, form_id: &str, answers: Answers) -> CoreResult<Submission> {
        let form = self.load_form(form_id)?;
        if !form.is_published() {
            self.metrics.increment_submissions_rejected();
            return Err(CoreError::FormNotPublished(form_id.to_string()));
        }

        if let Err(e) = validate(&form, &answers) {
            self.metrics.increment_submissions_rejected();
            log_event_with_fields(
                Event::SubmissionRejected,
                &[("form_id", form_id), ("field", e.field()), ("code", e.code())],
            );
            return Err(e.into());
        }

        let submission = Submission::new(form_id, answers);
        if let Err(e) = self.store.insert_submission(&submission) {
            log_event_with_fields(
                Event::StorageFailed,
                &[("form_id", form_id), ("error", &e.to_string())],
            );
            return Err(e.into());
        }
        self.metrics.increment_submissions_accepted();

        let published = self.registry.publish(form_id, &submission);
        self.metrics
            .add_broadcasts(published.delivered as u64, published.evicted as u64);

        log_event_with_fields(
            Event::SubmissionAccepted,
            &[
                ("form_id", form_id),
                ("submission_id", &submission.id),
                ("observers", &published.delivered.to_string()),
            ],
        );
        Ok(submission)
    }
}
