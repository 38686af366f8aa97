//! Report download endpoint

use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use spf_common::report::ReportFormat;

use super::filter::{classify_upload, EventQuery};
use crate::{ApiResult, AppState};

const FILE_BASE_NAME: &str = "speaker_report";

/// POST /api/export-csv/:format?event_name=...&event_title=...
///
/// Returns the report as an attachment in csv, json or text format.
pub async fn export_speakers(
    State(state): State<AppState>,
    Path(format): Path<String>,
    query: Result<Query<EventQuery>, QueryRejection>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let format: ReportFormat = format.parse()?;
    let report = classify_upload(&state, &query, &mut multipart).await?;

    let content = report.render(format)?;
    let disposition = format!(
        "attachment; filename={}",
        report.file_name(FILE_BASE_NAME, format)
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}
