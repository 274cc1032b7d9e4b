//! Patient views: listing, status board, search and wearable assignment.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::middleware::SessionUser;
use crate::db::queries::{self, SearchFilter, WearableFilter};
use crate::db::Database;
use crate::error::ApiError;
use crate::models::patient::{PatientSearchView, PatientStatusView, PatientView};
use crate::triage::Status;

/// Tabular listing: every patient with a wearable, latest vitals merged in.
pub async fn list(
    db: web::Data<Database>,
    _user: SessionUser,
) -> Result<HttpResponse, ApiError> {
    let rows = queries::fetch_patients_with_latest(db.pool()).await?;
    let today = Utc::now().date_naive();
    let patients: Vec<PatientView> = rows.into_iter().map(|r| r.into_view(today)).collect();
    Ok(HttpResponse::Ok().json(json!({ "patients": patients })))
}

/// Status board: the same rows with the derived status attached.
pub async fn board(
    db: web::Data<Database>,
    _user: SessionUser,
) -> Result<HttpResponse, ApiError> {
    let rows = queries::fetch_patients_with_latest(db.pool()).await?;
    let today = Utc::now().date_naive();
    let patients: Vec<PatientStatusView> = rows
        .into_iter()
        .map(|r| r.into_status_view(today))
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "patients": patients })))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub status: Option<Status>,
    pub wearable: Option<WearableFilter>,
}

/// Search across all patients, including those without a wearable.
pub async fn search(
    db: web::Data<Database>,
    params: web::Query<SearchParams>,
    _user: SessionUser,
) -> Result<HttpResponse, ApiError> {
    let filter = SearchFilter {
        term: params.q.clone(),
        status: params.status,
        wearable: params.wearable,
    };
    let rows = queries::search_patients(db.pool(), &filter).await?;
    let today = Utc::now().date_naive();
    let patients: Vec<PatientSearchView> =
        rows.into_iter().map(|r| r.into_view(today)).collect();
    Ok(HttpResponse::Ok().json(json!({
        "total_results": patients.len(),
        "patients": patients,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AssignWearableRequest {
    pub wearable_id: i32,
}

/// Assign (or replace) the wearable of an existing patient.
pub async fn assign_wearable(
    db: web::Data<Database>,
    path: web::Path<i32>,
    body: web::Json<AssignWearableRequest>,
    user: SessionUser,
) -> Result<HttpResponse, ApiError> {
    let patient_id = path.into_inner();
    if body.wearable_id <= 0 {
        return Err(ApiError::Validation(
            "wearable_id must be a positive integer".into(),
        ));
    }

    queries::assign_wearable(db.pool(), patient_id, body.wearable_id).await?;
    info!(
        username = %user.0.sub,
        patient_id,
        wearable_id = body.wearable_id,
        "wearable assigned"
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "patient_id": patient_id,
        "wearable_id": body.wearable_id,
    })))
}
