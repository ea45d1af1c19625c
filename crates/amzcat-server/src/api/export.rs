use amzcat_store::{export_file_name, ExportFormat};
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension,
};
use chrono::Utc;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ExportQuery {
    #[serde(default)]
    pub format: Option<String>,
}

/// Streams the whole catalog as a file attachment.
pub(super) async fn export_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = match query.format.as_deref() {
        None | Some("") => ExportFormat::default(),
        Some(raw) => raw
            .parse::<ExportFormat>()
            .map_err(|e| map_store_error(req_id.0.clone(), &e))?,
    };

    let products = state.store.lock().await.list();
    let body = format
        .render(&products)
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    let file_name = export_file_name(format, Utc::now());

    tracing::info!(%format, products = products.len(), "catalog exported");

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}
