use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use benefit_screener::error::AppError;
use benefit_screener::screening::{
    AnswerForm, BenefitRecord, HtmlCardRenderer, QuestionStep, QuestionnaireController,
    ResultRenderer, ScreeningOutcome, SessionError, UserResponses, TOTAL_STEPS,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ResultFormat {
    #[default]
    Json,
    Html,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScreeningRequest {
    #[serde(flatten)]
    pub(crate) answers: AnswerForm,
    #[serde(default)]
    pub(crate) format: ResultFormat,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScreeningResponse {
    pub(crate) answers: UserResponses,
    pub(crate) matched: usize,
    pub(crate) catalog_size: usize,
    pub(crate) screened_at: String,
    pub(crate) matches: Vec<BenefitRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) html: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionnaireResponse {
    pub(crate) total_steps: usize,
    pub(crate) steps: &'static [QuestionStep],
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/questionnaire", get(questionnaire_endpoint))
        .route("/api/v1/benefits", get(benefits_endpoint))
        .route("/api/v1/screenings", post(screening_endpoint))
        .route("/api/v1/catalog/reload", post(reload_endpoint))
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "catalog_unavailable" })),
        )
    }
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn questionnaire_endpoint() -> Json<QuestionnaireResponse> {
    Json(QuestionnaireResponse {
        total_steps: TOTAL_STEPS,
        steps: QuestionStep::all(),
    })
}

pub(crate) async fn benefits_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<BenefitRecord>>, AppError> {
    let catalog = state
        .catalog
        .snapshot()
        .ok_or(SessionError::CatalogUnavailable)?;
    Ok(Json(catalog.records().to_vec()))
}

pub(crate) async fn screening_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ScreeningRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let catalog = state
        .catalog
        .snapshot()
        .ok_or(SessionError::CatalogUnavailable)?;

    let answers = QuestionnaireController::new().answer_all(&payload.answers)?;
    let outcome = ScreeningOutcome::evaluate(&catalog, answers);
    let html = match payload.format {
        ResultFormat::Html => Some(HtmlCardRenderer.render(&outcome.matches)),
        ResultFormat::Json => None,
    };

    Ok(Json(ScreeningResponse {
        matched: outcome.matches.len(),
        catalog_size: outcome.catalog_size,
        screened_at: outcome.screened_at.to_rfc3339(),
        answers: outcome.answers,
        matches: outcome.matches,
        html,
    }))
}

pub(crate) async fn reload_endpoint(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = state.catalog.clone();
    let catalog = tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err)))??;
    info!(records = catalog.len(), "catalog reload requested");
    Ok(Json(json!({ "status": "reloaded", "records": catalog.len() })))
}
