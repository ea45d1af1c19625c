use amzcat_core::ProductRecord;
use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_scraper_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ExtractRequest {
    pub url: String,
}

/// Fetches and extracts a product page. The result is returned for review
/// and is not added to the catalog.
pub(super) async fn extract_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ExtractRequest>,
) -> Result<Json<ApiResponse<ProductRecord>>, ApiError> {
    let url = body.url.trim();
    if url.is_empty() {
        return Err(ApiError::new(req_id.0, "validation_error", "url is required"));
    }

    let record = state
        .client
        .fetch_product(url)
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    Ok(ApiResponse::new(record, req_id.0))
}
