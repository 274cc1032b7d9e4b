//! Parameterized SQL statements.
//!
//! "Latest reading" for a wearable is the row with the maximum
//! `recorded_at`, highest id breaking ties, so repeated reads return the
//! same row until a new reading arrives. The lateral join and the
//! `DISTINCT ON` listing both lean on the
//! `(wearable_id, recorded_at DESC, id DESC)` index.

use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::ApiError;
use crate::models::patient::{PatientSearchRow, PatientWithLatest};
use crate::models::reading::{
    DashboardSummary, InsertedReading, NewReading, Reading, WearableLatest,
};
use crate::models::user::UserRecord;
use crate::triage::Status;

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Staff account lookup for login.
pub async fn fetch_user(pool: &PgPool, username: &str) -> Result<Option<UserRecord>, ApiError> {
    let user = sqlx::query_as::<_, UserRecord>(
        "SELECT username, password_hash, full_name, role, created_at
         FROM users
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Every patient with a wearable, joined with the latest reading of that
/// wearable (or nulls when it has none yet). Patients without a wearable
/// are deliberately excluded here.
pub async fn fetch_patients_with_latest(pool: &PgPool) -> Result<Vec<PatientWithLatest>, ApiError> {
    let rows = sqlx::query_as::<_, PatientWithLatest>(
        "SELECT
             p.id AS patient_id,
             p.first_name,
             p.paternal_surname,
             p.maternal_surname,
             p.birth_date,
             w.id AS wearable_id,
             r.heart_rate,
             r.temperature_c,
             r.worn,
             r.recorded_at AS last_reading_at
         FROM patients p
         JOIN wearables w ON w.patient_id = p.id
         LEFT JOIN LATERAL (
             SELECT heart_rate, temperature_c, worn, recorded_at
             FROM readings
             WHERE wearable_id = w.id
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1
         ) r ON TRUE
         ORDER BY p.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Wearable-assignment filter for patient search.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WearableFilter {
    Assigned,
    Unassigned,
}

/// Patient search criteria; all filters optional and combined with AND.
#[derive(Debug, Default)]
pub struct SearchFilter {
    /// Numeric term matches the patient id, anything else matches name
    /// parts case-insensitively.
    pub term: Option<String>,
    pub status: Option<Status>,
    pub wearable: Option<WearableFilter>,
}

const CRITICAL_SQL: &str = "(r.temperature_c < 35.0 OR r.temperature_c > 39.5 \
     OR r.heart_rate < 40 OR r.heart_rate > 130)";
const STABLE_SQL: &str = "(r.temperature_c BETWEEN 36.0 AND 37.5 \
     AND r.heart_rate BETWEEN 60 AND 100 AND COALESCE(r.worn, FALSE))";

/// Search over all patients, wearable assignment optional. The status
/// filters mirror `triage::classify`: rows with missing vitals count as
/// warning.
pub async fn search_patients(
    pool: &PgPool,
    filter: &SearchFilter,
) -> Result<Vec<PatientSearchRow>, ApiError> {
    let mut query = QueryBuilder::<Postgres>::new(
        "SELECT
             p.id AS patient_id,
             p.first_name,
             p.paternal_surname,
             p.maternal_surname,
             p.birth_date,
             w.id AS wearable_id,
             r.heart_rate,
             r.temperature_c,
             r.worn,
             r.recorded_at AS last_reading_at
         FROM patients p
         LEFT JOIN wearables w ON w.patient_id = p.id
         LEFT JOIN LATERAL (
             SELECT heart_rate, temperature_c, worn, recorded_at
             FROM readings
             WHERE wearable_id = w.id
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1
         ) r ON TRUE
         WHERE TRUE",
    );

    if let Some(term) = filter.term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        if let Ok(id) = term.parse::<i32>() {
            query.push(" AND p.id = ").push_bind(id);
        } else {
            let pattern = format!("%{}%", term);
            query
                .push(" AND (p.first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.paternal_surname ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.maternal_surname ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    match filter.status {
        Some(Status::Critical) => {
            query.push(" AND ").push(CRITICAL_SQL);
        }
        Some(Status::Stable) => {
            query.push(" AND ").push(STABLE_SQL);
        }
        Some(Status::Warning) => {
            query
                .push(" AND (r.heart_rate IS NULL OR r.temperature_c IS NULL OR NOT (")
                .push(CRITICAL_SQL)
                .push(" OR ")
                .push(STABLE_SQL)
                .push("))");
        }
        None => {}
    }

    match filter.wearable {
        Some(WearableFilter::Assigned) => {
            query.push(" AND w.id IS NOT NULL");
        }
        Some(WearableFilter::Unassigned) => {
            query.push(" AND w.id IS NULL");
        }
        None => {}
    }

    query.push(" ORDER BY p.id");

    let rows = query
        .build_query_as::<PatientSearchRow>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Latest reading per wearable, one row per device that has reported.
pub async fn fetch_latest_per_wearable(pool: &PgPool) -> Result<Vec<WearableLatest>, ApiError> {
    let rows = sqlx::query_as::<_, WearableLatest>(
        "SELECT DISTINCT ON (r.wearable_id)
             r.wearable_id,
             w.patient_id,
             r.id AS reading_id,
             r.recorded_at,
             r.heart_rate,
             r.temperature_c,
             r.worn
         FROM readings r
         JOIN wearables w ON w.id = r.wearable_id
         ORDER BY r.wearable_id, r.recorded_at DESC, r.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Append one immutable reading; id and timestamp are server-assigned.
/// An unknown wearable id trips the foreign key and maps to NotFound.
pub async fn insert_reading(
    pool: &PgPool,
    wearable_id: i32,
    reading: &NewReading,
) -> Result<InsertedReading, ApiError> {
    let inserted = sqlx::query_as::<_, InsertedReading>(
        "INSERT INTO readings (wearable_id, heart_rate, temperature_c, worn, comment)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id AS reading_id, recorded_at",
    )
    .bind(wearable_id)
    .bind(reading.heart_rate)
    .bind(reading.temperature_c)
    .bind(reading.worn)
    .bind(reading.comment.as_deref())
    .fetch_one(pool)
    .await
    .map_err(|err| {
        let unknown_wearable = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code == FOREIGN_KEY_VIOLATION)
            .unwrap_or(false);
        if unknown_wearable {
            ApiError::NotFound("wearable")
        } else {
            ApiError::Store(err)
        }
    })?;
    Ok(inserted)
}

/// Reading history for one wearable, newest first. `limit` is already
/// clamped by the caller.
pub async fn fetch_readings_for_wearable(
    pool: &PgPool,
    wearable_id: i32,
    limit: i64,
) -> Result<Vec<Reading>, ApiError> {
    let rows = sqlx::query_as::<_, Reading>(
        "SELECT id AS reading_id, recorded_at, heart_rate, temperature_c, worn, comment
         FROM readings
         WHERE wearable_id = $1
         ORDER BY recorded_at DESC, id DESC
         LIMIT $2",
    )
    .bind(wearable_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Patient count plus critical/stable reading counts over the last 24 hours.
pub async fn dashboard_summary(pool: &PgPool) -> Result<DashboardSummary, ApiError> {
    let summary = sqlx::query_as::<_, DashboardSummary>(
        "SELECT
             (SELECT COUNT(*) FROM patients) AS total_patients,
             COUNT(*) FILTER (
                 WHERE (r.temperature_c < 35.0 OR r.temperature_c > 39.5)
                    OR (r.heart_rate < 40 OR r.heart_rate > 130)
             ) AS critical_last_24h,
             COUNT(*) FILTER (
                 WHERE r.temperature_c BETWEEN 36.0 AND 37.5
                   AND r.heart_rate BETWEEN 60 AND 100
                   AND r.worn = TRUE
             ) AS stable_last_24h
         FROM readings r
         WHERE r.recorded_at > NOW() - INTERVAL '24 hours'",
    )
    .fetch_one(pool)
    .await?;
    Ok(summary)
}

/// Assign a wearable to a patient. The wearable id comes from the device
/// itself; an id already in use is a conflict, and a patient keeps at most
/// one device (reassignment replaces it).
pub async fn assign_wearable(
    pool: &PgPool,
    patient_id: i32,
    wearable_id: i32,
) -> Result<(), ApiError> {
    let mut tx = pool.begin().await?;

    let patient_exists = sqlx::query_scalar::<_, i32>("SELECT id FROM patients WHERE id = $1")
        .bind(patient_id)
        .fetch_optional(&mut tx)
        .await?;
    if patient_exists.is_none() {
        return Err(ApiError::NotFound("patient"));
    }

    let taken = sqlx::query_scalar::<_, i32>("SELECT patient_id FROM wearables WHERE id = $1")
        .bind(wearable_id)
        .fetch_optional(&mut tx)
        .await?;
    if taken.is_some() {
        return Err(ApiError::Conflict(format!(
            "wearable {} is already assigned",
            wearable_id
        )));
    }

    let current = sqlx::query_scalar::<_, i32>("SELECT id FROM wearables WHERE patient_id = $1")
        .bind(patient_id)
        .fetch_optional(&mut tx)
        .await?;
    if current.is_some() {
        sqlx::query("UPDATE wearables SET id = $1, assigned_at = NOW() WHERE patient_id = $2")
            .bind(wearable_id)
            .bind(patient_id)
            .execute(&mut tx)
            .await?;
    } else {
        sqlx::query("INSERT INTO wearables (id, patient_id, assigned_at) VALUES ($1, $2, NOW())")
            .bind(wearable_id)
            .bind(patient_id)
            .execute(&mut tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Store round trip for the health check.
pub async fn ping(pool: &PgPool) -> Result<(), ApiError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
