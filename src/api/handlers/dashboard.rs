//! Dashboard landing counts.

use actix_web::{web, HttpResponse};

use crate::api::middleware::SessionUser;
use crate::db::{queries, Database};
use crate::error::ApiError;

/// Patient total plus critical/stable reading counts for the last 24 hours.
pub async fn summary(
    db: web::Data<Database>,
    _user: SessionUser,
) -> Result<HttpResponse, ApiError> {
    let summary = queries::dashboard_summary(db.pool()).await?;
    Ok(HttpResponse::Ok().json(summary))
}
