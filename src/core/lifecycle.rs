//! Form lifecycle
//!
//! Forms start as drafts, become published once, and from then on their
//! fields are frozen so that every stored submission keeps matching the
//! schema it was validated against.

use chrono::Utc;
use serde::Deserialize;

use super::context::RequestContext;
use super::error::{CoreError, CoreResult};
use super::service::FormService;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{FieldSchema, Form, FormStatus};

/// Body of a create request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<FormStatus>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

/// Body of an update request; absent members are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormUpdate {
    pub title: Option<String>,
    pub status: Option<FormStatus>,
    pub fields: Option<Vec<FieldSchema>>,
}

impl FormService {
    /// Create a form owned by the caller
    pub fn create_form(&self, ctx: &RequestContext, draft: FormDraft) -> CoreResult<Form> {
        let owner = ctx.require_caller()?;

        let mut form = Form::new(draft.title, draft.fields).owned_by(owner);
        form.status = draft.status.unwrap_or_default();
        form.validate_structure()?;

        self.store.save_form(&form)?;
        self.metrics.increment_forms_created();
        log_event_with_fields(
            Event::FormCreated,
            &[
                ("form_id", &form.id),
                ("owner", owner),
                ("request_id", &ctx.request_id.to_string()),
                ("status", form.status.as_str()),
            ],
        );
        Ok(form)
    }

    /// Fetch a form. Published forms are public; drafts are owner-only.
    pub fn get_form(&self, ctx: &RequestContext, form_id: &str) -> CoreResult<Form> {
        let form = self.load_form(form_id)?;
        if !form.is_published() {
            ctx.require_owner(&form)?;
        }
        Ok(form)
    }

    /// The caller's forms, most recently updated first
    pub fn list_forms(&self, ctx: &RequestContext) -> CoreResult<Vec<Form>> {
        let owner = ctx.require_caller()?;
        Ok(self.store.list_forms(owner)?)
    }

    /// Apply a partial update to a form the caller owns
    pub fn update_form(
        &self,
        ctx: &RequestContext,
        form_id: &str,
        update: FormUpdate,
    ) -> CoreResult<Form> {
        let mut form = self.load_form(form_id)?;
        ctx.require_owner(&form)?;
        let was_published = form.is_published();

        if was_published {
            if update.status == Some(FormStatus::Draft) {
                return Err(CoreError::FormImmutable(form_id.to_string()));
            }
            if matches!(&update.fields, Some(fields) if *fields != form.fields) {
                return Err(CoreError::FormImmutable(form_id.to_string()));
            }
        }

        if let Some(title) = update.title {
            form.title = title;
        }
        if let Some(status) = update.status {
            form.status = status;
        }
        if let Some(fields) = update.fields {
            form.fields = fields;
        }
        form.validate_structure()?;
        form.updated_at = Utc::now();

        self.store.save_form(&form)?;

        let event = if !was_published && form.is_published() {
            Event::FormPublished
        } else {
            Event::FormUpdated
        };
        log_event_with_fields(
            event,
            &[
                ("form_id", &form.id),
                ("request_id", &ctx.request_id.to_string()),
            ],
        );
        Ok(form)
    }
}
