//! Request handlers.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::{queries, Database};
use crate::error::ApiError;

pub mod auth;
pub mod dashboard;
pub mod patients;
pub mod readings;

/// Liveness probe with a store round trip.
pub async fn health(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    queries::ping(db.pool()).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
