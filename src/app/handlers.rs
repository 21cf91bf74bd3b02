use crate::app::response::{error_response, json_response, pdf_attachment, SAVE_FAILED};
use crate::core::engine::RoiEngine;
use crate::core::report::REPORT_FILENAME;
use crate::core::{PdfRenderer, RoiResult, Scenario, ScenarioStore};
use crate::utils::error::{ErrorCategory, Result};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const APP_JS: &str = include_str!("../../web/app.js");

pub type SharedEngine<S, R> = Arc<RoiEngine<S, R>>;

fn parse_body(bytes: &Bytes) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APP_JS,
    )
}

pub async fn healthz() -> Response {
    json_response(StatusCode::OK, serde_json::json!({"status": "ok"}))
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found.", "No such route")
}

pub async fn simulate<S, R>(
    State(engine): State<SharedEngine<S, R>>,
    body: Bytes,
) -> Result<Json<RoiResult>>
where
    S: ScenarioStore + 'static,
    R: PdfRenderer + 'static,
{
    let body = parse_body(&body)?;
    Ok(Json(engine.simulate(&body)?))
}

pub async fn create_scenario<S, R>(
    State(engine): State<SharedEngine<S, R>>,
    body: Bytes,
) -> Result<Response>
where
    S: ScenarioStore + 'static,
    R: PdfRenderer + 'static,
{
    let body = parse_body(&body)?;
    match engine.save_scenario(&body).await {
        Ok(scenario) => Ok((StatusCode::CREATED, Json(scenario)).into_response()),
        Err(e) if e.category() == ErrorCategory::Persistence => Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            SAVE_FAILED,
            e.to_string(),
        )),
        Err(e) => Err(e),
    }
}

pub async fn list_scenarios<S, R>(
    State(engine): State<SharedEngine<S, R>>,
) -> Result<Json<Vec<Scenario>>>
where
    S: ScenarioStore + 'static,
    R: PdfRenderer + 'static,
{
    Ok(Json(engine.list_scenarios().await?))
}

pub async fn get_scenario<S, R>(
    State(engine): State<SharedEngine<S, R>>,
    Path(raw_id): Path<String>,
) -> Result<Response>
where
    S: ScenarioStore + 'static,
    R: PdfRenderer + 'static,
{
    // Non-numeric ids are simply unknown scenarios.
    let Ok(id) = raw_id.parse::<i64>() else {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            "Not found.",
            format!("Scenario {} not found", raw_id),
        ));
    };
    let scenario = engine.get_scenario(id).await?;
    Ok(Json(scenario).into_response())
}

pub async fn generate_report<S, R>(
    State(engine): State<SharedEngine<S, R>>,
    body: Bytes,
) -> Result<Response>
where
    S: ScenarioStore + 'static,
    R: PdfRenderer + 'static,
{
    let body = parse_body(&body)?;
    let pdf = engine.generate_report(&body).await?;
    Ok(pdf_attachment(pdf, REPORT_FILENAME))
}
