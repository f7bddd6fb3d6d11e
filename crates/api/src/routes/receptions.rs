//! Reception opening and product scanning.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use common::{Product, ProductType, Reception};
use serde::Deserialize;
use storage::Store;

use super::{AppState, parse_pvz_id};
use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenReceptionRequest {
    pub pvz_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProductRequest {
    #[serde(rename = "type")]
    pub product_type: String,
    pub pvz_id: String,
}

/// POST /receptions: open a reception at a pickup point.
#[tracing::instrument(skip(state, body))]
pub async fn open<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<OpenReceptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Reception>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let pvz_id = parse_pvz_id(&req.pvz_id)?;

    let reception = state.receptions.open_reception(pvz_id).await?;
    Ok((StatusCode::CREATED, Json(reception)))
}

/// POST /products: scan a product into the open reception.
#[tracing::instrument(skip(state, body))]
pub async fn scan<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<ScanProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let pvz_id = parse_pvz_id(&req.pvz_id)?;
    let product_type: ProductType = req
        .product_type
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid product type".to_string()))?;

    let product = state.receptions.scan_product(product_type, pvz_id).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
