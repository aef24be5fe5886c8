//! # Form Store
//!
//! Storage collaborator for forms and their submissions.
//!
//! Forms are documents reachable by ID. Submissions are append-only and are
//! read back in insertion order with a single forward scan.

mod errors;
mod file;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use file::FileFormStore;
pub use memory::MemFormStore;

use crate::schema::Form;
use crate::submission::Submission;

/// Trait for form and submission storage
pub trait FormStore: Send + Sync + std::fmt::Debug {
    /// Fetch a form by ID
    fn get_form(&self, form_id: &str) -> StoreResult<Option<Form>>;

    /// All forms created by `owner_id`, most recently updated first
    fn list_forms(&self, owner_id: &str) -> StoreResult<Vec<Form>>;

    /// Insert or replace a form
    fn save_form(&self, form: &Form) -> StoreResult<()>;

    /// Append a submission
    fn insert_submission(&self, submission: &Submission) -> StoreResult<()>;

    /// Visit every submission of a form in insertion order
    fn scan_submissions(
        &self,
        form_id: &str,
        visit: &mut dyn FnMut(Submission),
    ) -> StoreResult<()>;

    /// Collect every submission of a form in insertion order
    fn list_submissions(&self, form_id: &str) -> StoreResult<Vec<Submission>> {
        let mut submissions = Vec::new();
        self.scan_submissions(form_id, &mut |s| submissions.push(s))?;
        Ok(submissions)
    }
}

/// Newest `updated_at` first
fn sort_recent_first(forms: &mut [Form]) {
    forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
