use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{error::ApiError, state::AppState},
    report::{report_filename, ReportRecord},
};

pub const MAX_REPORT_RECORDS: u64 = 10_000;

#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(max = MAX_REPORT_RECORDS))]
    pub data: Option<Vec<ReportRecord>>,
}

/// POST /generate-report - Render the consumption report as a PDF attachment
pub async fn generate_report(
    State(state): State<AppState>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    request.validate()?;
    let records = request
        .data
        .ok_or_else(|| ApiError::BadRequest("No se recibieron datos para el reporte".to_string()))?;

    let report_id = Uuid::new_v4();
    let generated_at = state.clock.now();
    let renderer = Arc::clone(&state.renderer);
    tracing::info!(%report_id, records = records.len(), "generating report");

    let report = tokio::task::spawn_blocking(move || renderer.render(&records, generated_at))
        .await
        .map_err(|e| ApiError::InternalError(format!("report worker failed: {e}")))??;

    tracing::info!(%report_id, pages = report.pages, bytes = report.bytes.len(), "report ready");

    let disposition = format!("attachment; filename={}", report_filename(generated_at));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_data_parses() {
        let request: ReportRequest = serde_json::from_str("{}").unwrap();
        assert!(request.data.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_at_limit_accepted() {
        let request = ReportRequest {
            data: Some(vec![ReportRecord::default(); MAX_REPORT_RECORDS as usize]),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_oversized_request_rejected() {
        let request = ReportRequest {
            data: Some(vec![ReportRecord::default(); MAX_REPORT_RECORDS as usize + 1]),
        };
        assert!(request.validate().is_err());
    }
}
