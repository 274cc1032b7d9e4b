//! Triage status classifier.
//!
//! Maps the latest vital signs of a patient to one of three status levels.
//! Warning doubles as the "no data" default: a patient whose wearable has not
//! reported temperature and heart rate is never classified critical or stable.

use serde::{Deserialize, Serialize};

/// Derived patient status, computed on read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Critical,
    Stable,
    Warning,
}

impl Status {
    /// Label shown to staff.
    pub fn label(self) -> &'static str {
        match self {
            Status::Critical => "Crítico",
            Status::Stable => "Estable",
            Status::Warning => "Advertencia",
        }
    }

    /// Color key used by the status board.
    pub fn color(self) -> &'static str {
        match self {
            Status::Critical => "rojo",
            Status::Stable => "verde",
            Status::Warning => "azul",
        }
    }
}

/// Classify a reading into a status level. Rules apply in order, first match
/// wins:
///
/// 1. temperature or heart rate missing -> warning
/// 2. temperature outside (35.0, 39.5) or heart rate outside (40, 130),
///    strict comparisons -> critical
/// 3. temperature in [36.0, 37.5], heart rate in [60, 100] and the wearable
///    worn -> stable
/// 4. anything else -> warning
pub fn classify(
    temperature_c: Option<f64>,
    heart_rate: Option<i32>,
    worn: Option<bool>,
) -> Status {
    let (Some(temp), Some(rate)) = (temperature_c, heart_rate) else {
        return Status::Warning;
    };

    if temp < 35.0 || temp > 39.5 || rate < 40 || rate > 130 {
        return Status::Critical;
    }

    if (36.0..=37.5).contains(&temp) && (60..=100).contains(&rate) && worn == Some(true) {
        return Status::Stable;
    }

    Status::Warning
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, Some(70), Some(true) => Status::Warning ; "missing temperature")]
    #[test_case(Some(36.5), None, Some(true) => Status::Warning ; "missing heart rate")]
    #[test_case(None, None, None => Status::Warning ; "no data at all")]
    #[test_case(Some(34.9), Some(70), Some(true) => Status::Critical ; "hypothermia")]
    #[test_case(Some(40.0), Some(70), Some(true) => Status::Critical ; "high fever")]
    #[test_case(Some(36.5), Some(39), Some(true) => Status::Critical ; "bradycardia")]
    #[test_case(Some(36.5), Some(131), Some(true) => Status::Critical ; "tachycardia")]
    #[test_case(Some(36.5), Some(80), Some(true) => Status::Stable ; "ideal vitals worn")]
    #[test_case(Some(36.0), Some(60), Some(true) => Status::Stable ; "stable lower bounds inclusive")]
    #[test_case(Some(37.5), Some(100), Some(true) => Status::Stable ; "stable upper bounds inclusive")]
    #[test_case(Some(36.5), Some(80), Some(false) => Status::Warning ; "not worn blocks stable")]
    #[test_case(Some(36.5), Some(80), None => Status::Warning ; "unknown worn blocks stable")]
    #[test_case(Some(35.0), Some(70), Some(true) => Status::Warning ; "boundary 35.0 is not critical")]
    #[test_case(Some(39.5), Some(130), Some(true) => Status::Warning ; "boundary 39.5 and 130 not critical")]
    #[test_case(Some(35.5), Some(70), Some(true) => Status::Warning ; "between critical and stable ranges")]
    fn classify_cases(
        temperature_c: Option<f64>,
        heart_rate: Option<i32>,
        worn: Option<bool>,
    ) -> Status {
        classify(temperature_c, heart_rate, worn)
    }

    #[test]
    fn labels_and_colors() {
        assert_eq!(Status::Critical.label(), "Crítico");
        assert_eq!(Status::Stable.label(), "Estable");
        assert_eq!(Status::Warning.label(), "Advertencia");
        assert_eq!(Status::Critical.color(), "rojo");
        assert_eq!(Status::Stable.color(), "verde");
        assert_eq!(Status::Warning.color(), "azul");
    }
}
