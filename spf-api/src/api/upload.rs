//! CSV upload inspection

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use spf_common::diagnostics::{
    check_columns, suggest_event_names, tag_distribution, ColumnCheck, TagCount,
};
use spf_common::source::{parse_csv, CsvTable};
use spf_common::Record;

use crate::{ApiError, ApiResult, AppState};

const SAMPLE_ROWS: usize = 3;

/// File part of a multipart upload
#[derive(Debug)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Read the `file` part of a multipart body
pub async fn read_upload(multipart: &mut Multipart) -> ApiResult<Upload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        return Ok(Upload { file_name, bytes });
    }
    Err(ApiError::BadRequest("Missing 'file' field in upload".to_string()))
}

/// Parse CSV bytes on the blocking thread pool
pub async fn parse_csv_blocking(bytes: Bytes) -> ApiResult<CsvTable> {
    let table = tokio::task::spawn_blocking(move || parse_csv(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("CSV parse task failed: {}", e)))??;
    Ok(table)
}

/// Read the upload and parse it as CSV
pub async fn read_csv_upload(multipart: &mut Multipart) -> ApiResult<CsvTable> {
    let upload = read_upload(multipart).await?;
    let file_name = upload.file_name.unwrap_or_else(|| "<unnamed>".to_string());
    let table = parse_csv_blocking(upload.bytes).await?;
    info!(
        file = %file_name,
        rows = table.row_count(),
        columns = table.column_count(),
        "Parsed CSV upload"
    );
    Ok(table)
}

/// CSV file information response
#[derive(Debug, Serialize)]
pub struct CsvInfoResponse {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub sample_data: Vec<Record>,
    pub message: String,
    pub column_checks: Vec<ColumnCheck>,
    pub suggested_event_names: Vec<String>,
    pub tag_distribution: Vec<TagCount>,
}

/// POST /api/upload-csv
///
/// Summarizes an uploaded CSV: size, columns, first rows, and how well it
/// matches the configured column mapping.
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<CsvInfoResponse>> {
    let upload = read_upload(&mut multipart).await?;

    let is_csv = upload
        .file_name
        .as_deref()
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".csv"));
    if !is_csv {
        return Err(ApiError::BadRequest("File must be a CSV file".to_string()));
    }

    let table = parse_csv_blocking(upload.bytes).await?;
    let tags_column = &state.config.columns.tags;

    Ok(Json(CsvInfoResponse {
        row_count: table.row_count(),
        column_count: table.column_count(),
        message: format!(
            "Successfully uploaded. Found {} rows and {} columns.",
            table.row_count(),
            table.column_count()
        ),
        sample_data: table.sample(SAMPLE_ROWS).to_vec(),
        column_checks: check_columns(&table.columns, &state.config.columns),
        suggested_event_names: suggest_event_names(table.column_values(tags_column)),
        tag_distribution: tag_distribution(table.column_values(tags_column)),
        columns: table.columns,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_csv_blocking() {
        let bytes = Bytes::from_static(b"Name,Workshops\nJane Doe,2511 Barclays Confirmed\n");
        let table = parse_csv_blocking(bytes).await.unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.columns, vec!["Name", "Workshops"]);
    }

    #[tokio::test]
    async fn test_parse_csv_blocking_empty_input() {
        let err = parse_csv_blocking(Bytes::new()).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Common(spf_common::Error::EmptyInput(_))
        ));
    }
}
