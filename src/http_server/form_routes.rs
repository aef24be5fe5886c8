//! Form HTTP Routes
//!
//! Form management, submission ingestion and analytics under `/api`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::response::{run_blocking, ApiResult};
use crate::analytics::AnalyticsReport;
use crate::core::{FormDraft, FormService, FormUpdate, RequestContext};
use crate::schema::Form;
use crate::submission::{Answers, Submission};

/// Header carrying the caller identity set by the upstream authenticator
pub const CALLER_HEADER: &str = "x-user-id";

/// Form routes with shared service
pub fn form_routes(service: Arc<FormService>) -> Router {
    Router::new()
        .route("/forms", get(list_forms_handler).post(create_form_handler))
        .route("/forms/:id", get(get_form_handler).put(update_form_handler))
        .route("/forms/:id/responses", post(submit_handler))
        .route("/forms/:id/analytics", get(analytics_handler))
        .with_state(service)
}

/// Build the request context from the caller header
pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let caller = headers
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string());
    RequestContext::new(caller)
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answers: Answers,
}

async fn list_forms_handler(
    State(service): State<Arc<FormService>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Form>>> {
    let ctx = request_context(&headers);
    let forms = run_blocking(move || service.list_forms(&ctx)).await?;
    Ok(Json(forms))
}

async fn create_form_handler(
    State(service): State<Arc<FormService>>,
    headers: HeaderMap,
    body: Result<Json<FormDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Form>)> {
    let ctx = request_context(&headers);
    let Json(draft) = body?;
    let form = run_blocking(move || service.create_form(&ctx, draft)).await?;
    Ok((StatusCode::CREATED, Json(form)))
}

async fn get_form_handler(
    State(service): State<Arc<FormService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Form>> {
    let ctx = request_context(&headers);
    let form = run_blocking(move || service.get_form(&ctx, &id)).await?;
    Ok(Json(form))
}

async fn update_form_handler(
    State(service): State<Arc<FormService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<FormUpdate>, JsonRejection>,
) -> ApiResult<Json<Form>> {
    let ctx = request_context(&headers);
    let Json(update) = body?;
    let form = run_blocking(move || service.update_form(&ctx, &id, update)).await?;
    Ok(Json(form))
}

/// Public: anyone may answer a published form
async fn submit_handler(
    State(service): State<Arc<FormService>>,
    Path(id): Path<String>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Submission>)> {
    let Json(request) = body?;
    let submission = run_blocking(move || service.submit(&id, request.answers)).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

async fn analytics_handler(
    State(service): State<Arc<FormService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<AnalyticsReport>> {
    let ctx = request_context(&headers);
    let report = run_blocking(move || service.aggregate(&ctx, &id)).await?;
    Ok(Json(report))
}
