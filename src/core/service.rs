//! Form Service
//!
//! Wires the store, the subscription registry and the metrics counters
//! behind the operations exposed to transports.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::context::RequestContext;
use super::error::{CoreError, CoreResult};
use crate::analytics::{AnalyticsReport, Aggregator};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::realtime::SubscriptionRegistry;
use crate::schema::Form;
use crate::store::FormStore;

/// Shared service state, cloned per request via `Arc`
#[derive(Debug, Clone)]
pub struct FormService {
    pub(crate) store: Arc<dyn FormStore>,
    pub(crate) registry: Arc<SubscriptionRegistry>,
    pub(crate) metrics: Arc<MetricsRegistry>,
}

impl FormService {
    /// Create a service over `store` with a fresh registry and counters
    pub fn new(store: Arc<dyn FormStore>) -> Self {
        Self::with_registry(store, Arc::new(SubscriptionRegistry::new()))
    }

    /// Create a service with an explicit registry
    pub fn with_registry(store: Arc<dyn FormStore>, registry: Arc<SubscriptionRegistry>) -> Self {
        Self {
            store,
            registry,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn FormStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Fetch a form or fail with `FormNotFound`
    pub(crate) fn load_form(&self, form_id: &str) -> CoreResult<Form> {
        self.store
            .get_form(form_id)?
            .ok_or_else(|| CoreError::not_found(form_id))
    }

    /// Owner-only analytics for a form, anchored at the current time
    pub fn aggregate(&self, ctx: &RequestContext, form_id: &str) -> CoreResult<AnalyticsReport> {
        let form = self.load_form(form_id)?;
        ctx.require_owner(&form)?;
        let report = self.report_for(&form, Utc::now())?;
        log_event_with_fields(
            Event::ReportGenerated,
            &[
                ("count", &report.count.to_string()),
                ("duration_ms", &ctx.elapsed_ms().to_string()),
                ("form_id", &form.id),
                ("request_id", &ctx.request_id.to_string()),
            ],
        );
        Ok(report)
    }

    /// Analytics for a form without an ownership check, anchored at `now`
    pub fn generate_report(&self, form_id: &str, now: DateTime<Utc>) -> CoreResult<AnalyticsReport> {
        let form = self.load_form(form_id)?;
        let report = self.report_for(&form, now)?;
        log_event_with_fields(
            Event::ReportGenerated,
            &[("count", &report.count.to_string()), ("form_id", &form.id)],
        );
        Ok(report)
    }

    fn report_for(&self, form: &Form, now: DateTime<Utc>) -> CoreResult<AnalyticsReport> {
        let mut aggregator = Aggregator::new(form);
        self.store
            .scan_submissions(&form.id, &mut |submission| aggregator.observe(&submission))?;

        let report = aggregator.finish(now);
        self.metrics.increment_reports_generated();
        Ok(report)
    }
}
