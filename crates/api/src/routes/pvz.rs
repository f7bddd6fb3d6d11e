//! Pickup point endpoints: registration, listing and per-point reception actions.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{City, PickupPoint, Reception};
use projections::{ListPoints, PickupPointTree};
use serde::Deserialize;
use storage::Store;

use super::{AppState, parse_pvz_id};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreatePointRequest {
    pub city: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<ListQuery> for ListPoints {
    fn from(q: ListQuery) -> Self {
        ListPoints {
            start_date: q.start_date,
            end_date: q.end_date,
            page: q.page,
            limit: q.limit,
        }
    }
}

// -- Handlers --

/// POST /pvz: register a pickup point.
#[tracing::instrument(skip(state, body))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    body: Result<Json<CreatePointRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PickupPoint>), ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let city: City = req
        .city
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid city".to_string()))?;

    let point = state.registry.create_point(city).await?;
    Ok((StatusCode::CREATED, Json(point)))
}

/// GET /pvz: pickup points with their receptions and products, paginated.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<PickupPointTree>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let trees = state.registry.list_points(&query.into()).await?;
    Ok(Json(trees))
}

/// POST /pvz/{pvzId}/delete_last_product: undo the latest scan.
#[tracing::instrument(skip(state))]
pub async fn delete_last_product<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(pvz_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let pvz_id = parse_pvz_id(&pvz_id)?;
    state.receptions.remove_last_product(pvz_id).await?;
    Ok(StatusCode::OK)
}

/// POST /pvz/{pvzId}/close_last_reception: close the open reception.
#[tracing::instrument(skip(state))]
pub async fn close_last_reception<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(pvz_id): Path<String>,
) -> Result<Json<Reception>, ApiError> {
    let pvz_id = parse_pvz_id(&pvz_id)?;
    let reception = state.receptions.close_reception(pvz_id).await?;
    Ok(Json(reception))
}
