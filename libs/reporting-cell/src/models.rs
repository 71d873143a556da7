use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Serialize};

use appointment_cell::models::{Appointment, AppointmentStatus, PatientSummary};
use patient_cell::models::Patient;
use shared_models::error::AppError;
use shared_models::timestamp;
use shared_utils::params::{self, DateRange, ParamError};

// ==============================================================================
// REQUEST PARAMETERS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeParams {
    pub fn parse(&self) -> Result<DateRange, ReportError> {
        Ok(DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordParams {
    pub keyword: Option<String>,
}

/// `months` stays raw text so that junk input falls back to the default
/// instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentParams {
    pub months: Option<String>,
}

impl RecentParams {
    pub fn months(&self) -> u32 {
        params::months_or_default(self.months.as_deref())
    }
}

// ==============================================================================
// RESULT SHAPES
// ==============================================================================

/// Patient annotated with the number of appointments inside the range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientAppointmentCount {
    #[serde(flatten)]
    pub patient: Patient,
    pub appointment_count: usize,
}

/// One row per scheduled appointment, carrying the patient's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPatient {
    #[serde(flatten)]
    pub patient: Patient,
    #[serde(with = "timestamp")]
    pub appointment_date: DateTime<Utc>,
    pub doctor_name: String,
    pub appointment_status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient_name: Option<String>,
    pub kasallik: Option<String>,
}

// ==============================================================================
// STORE ROWS
// ==============================================================================

/// Patient row with the matching appointments embedded.
#[derive(Debug, Deserialize)]
pub(crate) struct PatientWithAppointments {
    #[serde(flatten)]
    pub patient: Patient,
    #[serde(default)]
    pub appointments: Vec<IgnoredAny>,
}

impl From<PatientWithAppointments> for PatientAppointmentCount {
    fn from(row: PatientWithAppointments) -> Self {
        Self {
            appointment_count: row.appointments.len(),
            patient: row.patient,
        }
    }
}

/// Appointment columns with the referenced patient embedded.
#[derive(Debug, Deserialize)]
pub(crate) struct ScheduledRow {
    #[serde(with = "timestamp")]
    pub tayinlash_sanasi: DateTime<Utc>,
    pub doctor_name: String,
    pub status: AppointmentStatus,
    pub patients: Patient,
}

impl From<ScheduledRow> for ScheduledPatient {
    fn from(row: ScheduledRow) -> Self {
        Self {
            patient: row.patients,
            appointment_date: row.tayinlash_sanasi,
            doctor_name: row.doctor_name,
            appointment_status: row.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DoctorAppointmentRow {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(default)]
    pub patients: Option<PatientSummary>,
}

impl From<DoctorAppointmentRow> for DoctorAppointment {
    fn from(row: DoctorAppointmentRow) -> Self {
        let patient = row.patients.unwrap_or_default();
        Self {
            appointment: row.appointment,
            patient_name: patient.name,
            kasallik: patient.kasallik,
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<ParamError> for ReportError {
    fn from(err: ParamError) -> Self {
        ReportError::ValidationError(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::ValidationError(msg) => AppError::ValidationError(msg),
            ReportError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn patient_json() -> serde_json::Value {
        json!({
            "id": 1,
            "name": "Ali",
            "age": 42,
            "medical_history": "Type 2 Diabetes",
            "contact_info": "{\"email\":\"a@b.com\",\"phone\":\"+998901234567\",\"address\":\"Tashkent\"}",
            "kasallik": "diabet"
        })
    }

    #[test]
    fn test_count_is_number_of_embedded_appointments() {
        let mut row = patient_json();
        row["appointments"] = json!([{"id": 3}, {"id": 8}]);

        let shaped = PatientAppointmentCount::from(serde_json::from_value::<PatientWithAppointments>(row).unwrap());
        assert_eq!(shaped.appointment_count, 2);

        let out = serde_json::to_value(&shaped).unwrap();
        assert_eq!(out["appointment_count"], 2);
        assert_eq!(out["contact_info"]["email"], "a@b.com");
        assert!(out.get("appointments").is_none());
    }

    #[test]
    fn test_scheduled_row_is_flattened() {
        let row: ScheduledRow = serde_json::from_value(json!({
            "tayinlash_sanasi": "2024-01-10T09:00:00",
            "doctor_name": "Dr. Rustamov",
            "status": "rejalashtirilgan",
            "patients": patient_json()
        }))
        .unwrap();

        let out = serde_json::to_value(ScheduledPatient::from(row)).unwrap();
        assert_eq!(out["name"], "Ali");
        assert_eq!(out["appointment_date"], "2024-01-10T09:00:00Z");
        assert_eq!(out["appointment_status"], "rejalashtirilgan");
        assert_eq!(out["contact_info"]["address"], "Tashkent");
    }

    #[test]
    fn test_doctor_row_without_patient() {
        let row: DoctorAppointmentRow = serde_json::from_value(json!({
            "id": 4,
            "patients_id": null,
            "doctor_name": "Dr. Rustamov",
            "tayinlash_sanasi": "2024-01-10T09:00:00",
            "status": "bekor qilingan",
            "patients": null
        }))
        .unwrap();

        let shaped = DoctorAppointment::from(row);
        assert_eq!(shaped.patient_name, None);
        assert_eq!(shaped.kasallik, None);
    }

    #[test]
    fn test_recent_params_coerce_months() {
        assert_eq!(RecentParams { months: Some("abc".into()) }.months(), 6);
        assert_eq!(RecentParams::default().months(), 6);
        assert_eq!(RecentParams { months: Some("3".into()) }.months(), 3);
    }

    #[test]
    fn test_missing_bound_is_validation_error() {
        let params = DateRangeParams { start_date: Some("2024-01-01".into()), end_date: None };
        assert_eq!(
            params.parse(),
            Err(ReportError::ValidationError("endDate is required".to_string()))
        );
    }

    #[test]
    fn test_malformed_bound_names_the_parameter() {
        let params = DateRangeParams { start_date: Some("01/01/2024".into()), end_date: Some("2024-01-31".into()) };
        assert_matches!(params.parse(), Err(ReportError::ValidationError(msg)) if msg.starts_with("startDate"));
    }
}
