use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ApiError;

/// Default page size for the reading history.
pub const DEFAULT_LIMIT: i64 = 10;
/// Upper bound on the reading history page size.
pub const MAX_LIMIT: i64 = 100;

/// One stored vital-sign sample, newest first in listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reading {
    pub reading_id: i32,
    pub recorded_at: DateTime<Utc>,
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    pub worn: Option<bool>,
    pub comment: Option<String>,
}

/// Ingestion payload from a wearable.
#[derive(Debug, Deserialize)]
pub struct NewReading {
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub worn: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewReading {
    /// Heart rate and temperature are required; worn and comment stay null
    /// when absent. Checked before any write.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Vec::new();
        if self.heart_rate.is_none() {
            missing.push("'heart_rate'");
        }
        if self.temperature_c.is_none() {
            missing.push("'temperature_c'");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Server-assigned identity of a freshly ingested reading.
#[derive(Debug, FromRow, Serialize)]
pub struct InsertedReading {
    pub reading_id: i32,
    pub recorded_at: DateTime<Utc>,
}

/// Latest reading of one wearable, for the fleet view.
#[derive(Debug, FromRow, Serialize)]
pub struct WearableLatest {
    pub wearable_id: i32,
    pub patient_id: i32,
    pub reading_id: i32,
    pub recorded_at: DateTime<Utc>,
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    pub worn: Option<bool>,
}

/// Counts shown on the dashboard landing page.
#[derive(Debug, FromRow, Serialize)]
pub struct DashboardSummary {
    pub total_patients: i64,
    pub critical_last_24h: i64,
    pub stable_last_24h: i64,
}

/// Clamp a requested history page size to [1, MAX_LIMIT]; missing, zero or
/// negative values fall back to the default.
pub fn clamp_limit(requested: Option<i64>) -> i64 {
    match requested {
        Some(n) if n >= 1 => n.min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None => 10 ; "missing defaults")]
    #[test_case(Some(0) => 10 ; "zero defaults")]
    #[test_case(Some(-5) => 10 ; "negative defaults")]
    #[test_case(Some(1) => 1 ; "lower bound kept")]
    #[test_case(Some(25) => 25 ; "in range kept")]
    #[test_case(Some(100) => 100 ; "upper bound kept")]
    #[test_case(Some(1000) => 100 ; "oversized clamped")]
    fn clamp_limit_cases(requested: Option<i64>) -> i64 {
        clamp_limit(requested)
    }

    #[test]
    fn validate_accepts_complete_payload() {
        let payload = NewReading {
            heart_rate: Some(72),
            temperature_c: Some(36.6),
            worn: Some(true),
            comment: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn validate_names_every_missing_field() {
        let payload = NewReading {
            heart_rate: None,
            temperature_c: None,
            worn: None,
            comment: None,
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required fields: 'heart_rate', 'temperature_c'"
        );
    }

    #[test]
    fn validate_rejects_missing_temperature_only() {
        let payload = NewReading {
            heart_rate: Some(80),
            temperature_c: None,
            worn: None,
            comment: Some("manual check".into()),
        };
        let err = payload.validate().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: 'temperature_c'");
    }
}
