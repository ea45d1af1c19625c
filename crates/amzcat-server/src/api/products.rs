use amzcat_core::ProductRecord;
use amzcat_scraper::ImageDownloadOutcome;
use amzcat_store::StoreError;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_scraper_error, map_store_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct DeletedProduct {
    id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct ImageDownloadReport {
    product: ProductRecord,
    downloaded: usize,
    failed: usize,
    outcomes: Vec<ImageDownloadOutcome>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ProductRecord>>> {
    let products = state.store.lock().await.list();
    ApiResponse::new(products, req_id.0)
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(record): Json<ProductRecord>,
) -> Result<Json<ApiResponse<ProductRecord>>, ApiError> {
    let stored = state
        .store
        .lock()
        .await
        .add(record)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(stored, req_id.0))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ProductRecord>>, ApiError> {
    let product = state.store.lock().await.get(id).cloned();
    match product {
        Some(product) => Ok(ApiResponse::new(product, req_id.0)),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("product {id} not found"),
        )),
    }
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
    Json(record): Json<ProductRecord>,
) -> Result<Json<ApiResponse<ProductRecord>>, ApiError> {
    let updated = state
        .store
        .lock()
        .await
        .update(id, record)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(updated, req_id.0))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedProduct>>, ApiError> {
    state
        .store
        .lock()
        .await
        .delete(id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(ApiResponse::new(DeletedProduct { id }, req_id.0))
}

/// Downloads the product's images one at a time, then records which ones
/// landed on disk. A product deleted while its images download yields
/// `not_found`, and the already written files are logged as orphaned.
pub(super) async fn download_product_images(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ImageDownloadReport>>, ApiError> {
    let mut record = state.store.lock().await.get(id).cloned().ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("product {id} not found"),
        )
    })?;

    let outcomes = state
        .client
        .download_images(&mut record, &state.images_dir)
        .await
        .map_err(|e| map_scraper_error(req_id.0.clone(), &e))?;

    let saved: Vec<String> = outcomes
        .iter()
        .filter(|o| o.succeeded())
        .map(|o| o.url.clone())
        .collect();

    // The catalog lock is not held across the downloads, so the product can
    // be deleted meanwhile. Its files are then left on disk.
    let marked = state
        .store
        .lock()
        .await
        .mark_images_downloaded(id, &saved)
        .await;
    let product = match marked {
        Ok(product) => product,
        Err(StoreError::NotFound { .. }) => {
            let orphaned: Vec<String> = outcomes
                .iter()
                .filter_map(|o| o.path.as_ref().map(|p| p.display().to_string()))
                .collect();
            tracing::warn!(id, ?orphaned, "product deleted during image download");
            return Err(ApiError::new(
                req_id.0,
                "not_found",
                format!("product {id} was deleted during image download"),
            ));
        }
        Err(e) => return Err(map_store_error(req_id.0, &e)),
    };

    Ok(ApiResponse::new(
        ImageDownloadReport {
            product,
            downloaded: saved.len(),
            failed: outcomes.len() - saved.len(),
            outcomes,
        },
        req_id.0,
    ))
}
