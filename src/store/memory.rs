//! In-memory form store

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::errors::{StoreError, StoreResult};
use super::{sort_recent_first, FormStore};
use crate::schema::Form;
use crate::submission::Submission;

#[derive(Debug, Default)]
struct Tables {
    forms: HashMap<String, Form>,
    submissions: HashMap<String, Vec<Submission>>,
}

/// Process-local store, used for tests and the `memory` storage mode
#[derive(Debug, Default)]
pub struct MemFormStore {
    tables: RwLock<Tables>,
}

impl MemFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("Lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("Lock poisoned".into()))
    }
}

impl FormStore for MemFormStore {
    fn get_form(&self, form_id: &str) -> StoreResult<Option<Form>> {
        Ok(self.read()?.forms.get(form_id).cloned())
    }

    fn list_forms(&self, owner_id: &str) -> StoreResult<Vec<Form>> {
        let mut forms: Vec<Form> = self
            .read()?
            .forms
            .values()
            .filter(|f| f.is_owned_by(owner_id))
            .cloned()
            .collect();
        sort_recent_first(&mut forms);
        Ok(forms)
    }

    fn save_form(&self, form: &Form) -> StoreResult<()> {
        self.write()?.forms.insert(form.id.clone(), form.clone());
        Ok(())
    }

    fn insert_submission(&self, submission: &Submission) -> StoreResult<()> {
        self.write()?
            .submissions
            .entry(submission.form_id.clone())
            .or_default()
            .push(submission.clone());
        Ok(())
    }

    fn scan_submissions(
        &self,
        form_id: &str,
        visit: &mut dyn FnMut(Submission),
    ) -> StoreResult<()> {
        // Copy out first so the visitor never runs under the lock
        let submissions = self
            .read()?
            .submissions
            .get(form_id)
            .cloned()
            .unwrap_or_default();
        for submission in submissions {
            visit(submission);
        }
        Ok(())
    }
}
