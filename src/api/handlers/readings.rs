//! Reading ingestion and history.
//!
//! These endpoints are called by the wearables themselves and carry no
//! session; staff-facing views live in `patients` and `dashboard`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::api::middleware::SessionUser;
use crate::db::{queries, Database};
use crate::error::ApiError;
use crate::models::reading::{clamp_limit, NewReading};

/// Ingest one reading for a wearable. Heart rate and temperature are
/// required; the row is validated before any write and appended atomically.
pub async fn record(
    db: web::Data<Database>,
    path: web::Path<i32>,
    body: web::Json<NewReading>,
) -> Result<HttpResponse, ApiError> {
    let wearable_id = path.into_inner();
    let reading = body.into_inner();
    reading.validate()?;

    let inserted = queries::insert_reading(db.pool(), wearable_id, &reading).await?;
    debug!(wearable_id, reading_id = inserted.reading_id, "reading ingested");

    Ok(HttpResponse::Created().json(json!({
        "message": "reading recorded",
        "wearable_id": wearable_id,
        "reading_id": inserted.reading_id,
        "recorded_at": inserted.recorded_at,
    })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// Reading history for one wearable, newest first, page size clamped.
pub async fn list(
    db: web::Data<Database>,
    path: web::Path<i32>,
    params: web::Query<HistoryParams>,
) -> Result<HttpResponse, ApiError> {
    let wearable_id = path.into_inner();
    let limit = clamp_limit(params.limit);
    let readings = queries::fetch_readings_for_wearable(db.pool(), wearable_id, limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "wearable_id": wearable_id,
        "count": readings.len(),
        "readings": readings,
    })))
}

/// Latest reading per wearable across the whole fleet.
pub async fn latest(
    db: web::Data<Database>,
    _user: SessionUser,
) -> Result<HttpResponse, ApiError> {
    let wearables = queries::fetch_latest_per_wearable(db.pool()).await?;
    Ok(HttpResponse::Ok().json(json!({ "wearables": wearables })))
}
