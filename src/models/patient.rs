use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::triage::{self, Status};

/// Row from the patient listing join: patient identity plus the latest
/// reading of the assigned wearable, if any.
#[derive(Debug, Clone, FromRow)]
pub struct PatientWithLatest {
    pub patient_id: i32,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub birth_date: Option<NaiveDate>,
    pub wearable_id: i32,
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    pub worn: Option<bool>,
    pub last_reading_at: Option<DateTime<Utc>>,
}

/// Search row: same shape but the wearable assignment is optional, search
/// also surfaces patients without a device.
#[derive(Debug, Clone, FromRow)]
pub struct PatientSearchRow {
    pub patient_id: i32,
    pub first_name: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub birth_date: Option<NaiveDate>,
    pub wearable_id: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    pub worn: Option<bool>,
    pub last_reading_at: Option<DateTime<Utc>>,
}

/// Patient listing entry.
#[derive(Debug, Serialize)]
pub struct PatientView {
    pub patient_id: i32,
    pub display_name: String,
    pub age: Option<i32>,
    pub wearable_id: i32,
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    pub worn: Option<bool>,
    pub last_reading_at: Option<DateTime<Utc>>,
}

/// Status board entry: listing fields plus the derived status.
#[derive(Debug, Serialize)]
pub struct PatientStatusView {
    pub patient_id: i32,
    pub display_name: String,
    pub age: Option<i32>,
    pub wearable_id: i32,
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    pub worn: Option<bool>,
    pub last_reading_at: Option<DateTime<Utc>>,
    pub status: Status,
    pub status_label: &'static str,
    pub color: &'static str,
}

/// Search result entry.
#[derive(Debug, Serialize)]
pub struct PatientSearchView {
    pub patient_id: i32,
    pub display_name: String,
    pub age: Option<i32>,
    pub wearable_id: Option<i32>,
    pub heart_rate: Option<i32>,
    pub temperature_c: Option<f64>,
    pub worn: Option<bool>,
    pub last_reading_at: Option<DateTime<Utc>>,
    pub status: Status,
    pub status_label: &'static str,
    pub color: &'static str,
}

impl PatientWithLatest {
    pub fn into_view(self, today: NaiveDate) -> PatientView {
        PatientView {
            patient_id: self.patient_id,
            display_name: display_name(
                &self.first_name,
                &self.paternal_surname,
                &self.maternal_surname,
            ),
            age: self.birth_date.map(|born| age_on(born, today)),
            wearable_id: self.wearable_id,
            heart_rate: self.heart_rate,
            temperature_c: self.temperature_c,
            worn: self.worn,
            last_reading_at: self.last_reading_at,
        }
    }

    pub fn into_status_view(self, today: NaiveDate) -> PatientStatusView {
        let status = triage::classify(self.temperature_c, self.heart_rate, self.worn);
        PatientStatusView {
            patient_id: self.patient_id,
            display_name: display_name(
                &self.first_name,
                &self.paternal_surname,
                &self.maternal_surname,
            ),
            age: self.birth_date.map(|born| age_on(born, today)),
            wearable_id: self.wearable_id,
            heart_rate: self.heart_rate,
            temperature_c: self.temperature_c,
            worn: self.worn,
            last_reading_at: self.last_reading_at,
            status,
            status_label: status.label(),
            color: status.color(),
        }
    }
}

impl PatientSearchRow {
    pub fn into_view(self, today: NaiveDate) -> PatientSearchView {
        let status = triage::classify(self.temperature_c, self.heart_rate, self.worn);
        PatientSearchView {
            patient_id: self.patient_id,
            display_name: display_name(
                &self.first_name,
                &self.paternal_surname,
                &self.maternal_surname,
            ),
            age: self.birth_date.map(|born| age_on(born, today)),
            wearable_id: self.wearable_id,
            heart_rate: self.heart_rate,
            temperature_c: self.temperature_c,
            worn: self.worn,
            last_reading_at: self.last_reading_at,
            status,
            status_label: status.label(),
            color: status.color(),
        }
    }
}

/// Full display name: given name plus both surnames, space separated, with
/// empty parts skipped.
pub fn display_name(first: &str, paternal: &str, maternal: &str) -> String {
    [first, paternal, maternal]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Completed-birthday age in whole years.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_on_exact_birthday() {
        assert_eq!(age_on(date(1950, 6, 15), date(2020, 6, 15)), 70);
    }

    #[test]
    fn age_before_this_years_birthday() {
        // Birthday is tomorrow: still one year younger.
        assert_eq!(age_on(date(1950, 6, 16), date(2020, 6, 15)), 69);
    }

    #[test]
    fn age_after_this_years_birthday() {
        assert_eq!(age_on(date(1950, 6, 14), date(2020, 6, 15)), 70);
    }

    #[test]
    fn display_name_joins_all_parts() {
        assert_eq!(display_name("María", "García", "López"), "María García López");
    }

    #[test]
    fn display_name_skips_empty_parts() {
        assert_eq!(display_name("María", "García", ""), "María García");
        assert_eq!(display_name("María", "  ", "López"), "María López");
    }

    #[test]
    fn patient_without_readings_classifies_as_warning() {
        let row = PatientWithLatest {
            patient_id: 1,
            first_name: "Ana".into(),
            paternal_surname: "Ruiz".into(),
            maternal_surname: "Soto".into(),
            birth_date: None,
            wearable_id: 42,
            heart_rate: None,
            temperature_c: None,
            worn: None,
            last_reading_at: None,
        };
        let view = row.into_status_view(date(2020, 1, 1));
        assert_eq!(view.status, crate::triage::Status::Warning);
        assert_eq!(view.status_label, "Advertencia");
        assert_eq!(view.color, "azul");
        assert_eq!(view.age, None);
    }
}
