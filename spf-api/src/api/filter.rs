//! Speaker filtering endpoint

use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use spf_common::report::Report;
use spf_common::Classifier;

use super::upload::read_csv_upload;
use crate::{ApiError, ApiResult, AppState};

/// Query parameters naming the event
#[derive(Debug, Deserialize)]
pub struct EventQuery {
    /// Event tag prefix, e.g. "2511 Barclays"
    #[serde(default)]
    pub event_name: Option<String>,
    /// Full event title used for content-fit analysis
    #[serde(default)]
    pub event_title: String,
}

/// Parse the uploaded CSV and classify it for the requested event
pub(crate) async fn classify_upload(
    state: &AppState,
    query: &EventQuery,
    multipart: &mut Multipart,
) -> ApiResult<Report> {
    let event_name = query.event_name.as_deref().ok_or_else(|| {
        ApiError::BadRequest("Missing 'event_name' query parameter".to_string())
    })?;
    let classifier = Classifier::new(event_name, (*state.config).clone())?;
    let table = read_csv_upload(multipart).await?;

    if table.records.is_empty() {
        return Err(ApiError::NotFound("No records found in CSV file".to_string()));
    }

    let classification = classifier.classify(&table.records);
    info!(
        event = %classifier.event_name(),
        total = classification.summary().total_count,
        "Filtered uploaded speakers"
    );

    Ok(Report::new(
        classifier.event_name(),
        query.event_title.trim(),
        classification,
    ))
}

/// POST /api/filter-speakers-csv?event_name=...&event_title=...
///
/// Returns the categorized speakers as JSON.
pub async fn filter_speakers(
    State(state): State<AppState>,
    query: Result<Query<EventQuery>, QueryRejection>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let report = classify_upload(&state, &query, &mut multipart).await?;
    Ok(Json(report.json_body()).into_response())
}
