// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use chrono::{DateTime, Utc};
use std::fmt;

use shared_models::error::AppError;
use shared_models::timestamp;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patients_id: Option<i64>,
    pub doctor_name: String,
    #[serde(with = "timestamp")]
    pub tayinlash_sanasi: DateTime<Utc>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stored literals are the clinic's own wording.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    #[default]
    #[serde(rename = "rejalashtirilgan")]
    Scheduled,
    #[serde(rename = "tugallangan")]
    Completed,
    #[serde(rename = "bekor qilingan")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "rejalashtirilgan",
            AppointmentStatus::Completed => "tugallangan",
            AppointmentStatus::Cancelled => "bekor qilingan",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns of the referenced patient pulled in by an embedded join. The
/// embed is `null` when the appointment has no resolvable patient.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientSummary {
    pub name: Option<String>,
    pub kasallik: Option<String>,
}

/// Appointment row as read with `patients(...)` embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRow {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(default)]
    pub patients: Option<PatientSummary>,
}

/// Appointment with the patient's name resolved, or `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient_name: Option<String>,
}

impl From<AppointmentRow> for AppointmentView {
    fn from(row: AppointmentRow) -> Self {
        Self {
            appointment: row.appointment,
            patient_name: row.patients.and_then(|patient| patient.name),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patients_id: Option<i64>,
    pub doctor_name: String,
    #[serde(with = "timestamp")]
    pub tayinlash_sanasi: DateTime<Utc>,
    pub status: Option<AppointmentStatus>,
}

impl CreateAppointmentRequest {
    pub fn validate(&self) -> Result<(), AppointmentError> {
        validate_doctor_name(&self.doctor_name)
    }

    pub fn to_row(&self) -> Value {
        json!({
            "patients_id": self.patients_id,
            "doctor_name": self.doctor_name.trim(),
            "tayinlash_sanasi": self.tayinlash_sanasi.to_rfc3339(),
            "status": self.status.unwrap_or_default(),
        })
    }
}

/// Partial update. `patients_id: null` clears the reference, an absent key
/// keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub doctor_name: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub tayinlash_sanasi: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    #[serde(default, deserialize_with = "present")]
    pub patients_id: Option<Option<i64>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateAppointmentRequest {
    pub fn validate(&self) -> Result<(), AppointmentError> {
        match &self.doctor_name {
            Some(name) => validate_doctor_name(name),
            None => Ok(()),
        }
    }

    pub fn apply(self, current: Appointment, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id: current.id,
            patients_id: self.patients_id.unwrap_or(current.patients_id),
            doctor_name: self.doctor_name
                .map(|name| name.trim().to_string())
                .unwrap_or(current.doctor_name),
            tayinlash_sanasi: self.tayinlash_sanasi.unwrap_or(current.tayinlash_sanasi),
            status: self.status.unwrap_or(current.status),
            created_at: current.created_at,
            updated_at: Some(now),
        }
    }
}

impl Appointment {
    /// Mutable columns, as written back on update.
    pub fn to_row(&self) -> Value {
        json!({
            "patients_id": self.patients_id,
            "doctor_name": self.doctor_name,
            "tayinlash_sanasi": self.tayinlash_sanasi.to_rfc3339(),
            "status": self.status,
            "updated_at": self.updated_at.map(|instant| instant.to_rfc3339()),
        })
    }
}

fn validate_doctor_name(name: &str) -> Result<(), AppointmentError> {
    if name.trim().is_empty() {
        return Err(AppointmentError::ValidationError("doctor_name must not be empty".to_string()));
    }
    Ok(())
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
