use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use patient_cell::models::Patient;
use shared_config::AppConfig;
use shared_models::{ApiResponse, AppError};

use crate::models::{
    DateRangeParams, DoctorAppointment, KeywordParams, PatientAppointmentCount, RecentParams,
    ScheduledPatient,
};
use crate::services::ReportingService;

type ReportResponse<T> = Result<Json<ApiResponse<Vec<T>>>, AppError>;

#[axum::debug_handler]
pub async fn patients_with_appointments(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<DateRangeParams>,
) -> ReportResponse<PatientAppointmentCount> {
    let range = params.parse()?;
    let service = ReportingService::new(&config);

    let patients = service.patients_with_appointments_in_range(range).await?;

    Ok(Json(ApiResponse::new(patients, "Patients with appointments in range fetched successfully")))
}

#[axum::debug_handler]
pub async fn patients_by_kasallik(
    State(config): State<Arc<AppConfig>>,
    Path(kasallik): Path<String>,
) -> ReportResponse<Patient> {
    let service = ReportingService::new(&config);

    let patients = service.patients_by_kasallik(&kasallik).await?;

    Ok(Json(ApiResponse::new(patients, "Patients by kasallik fetched successfully")))
}

#[axum::debug_handler]
pub async fn patients_without_appointments(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<DateRangeParams>,
) -> ReportResponse<Patient> {
    let range = params.parse()?;
    let service = ReportingService::new(&config);

    let patients = service.patients_without_appointments_in_range(range).await?;

    Ok(Json(ApiResponse::new(patients, "Patients without appointments in range fetched successfully")))
}

#[axum::debug_handler]
pub async fn patients_with_scheduled_appointments(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<DateRangeParams>,
) -> ReportResponse<ScheduledPatient> {
    let range = params.parse()?;
    let service = ReportingService::new(&config);

    let patients = service.patients_with_scheduled_appointments(range).await?;

    Ok(Json(ApiResponse::new(patients, "Patients with scheduled appointments fetched successfully")))
}

#[axum::debug_handler]
pub async fn patients_by_medical_history(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<KeywordParams>,
) -> ReportResponse<Patient> {
    let service = ReportingService::new(&config);

    let patients = service
        .patients_by_medical_history(params.keyword.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(ApiResponse::new(patients, "Patients by medical history fetched successfully")))
}

#[axum::debug_handler]
pub async fn patients_without_recent_appointments(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<RecentParams>,
) -> ReportResponse<Patient> {
    let months = params.months();
    let service = ReportingService::new(&config);

    let patients = service.patients_without_recent_appointments(months, Utc::now()).await?;

    Ok(Json(ApiResponse::new(
        patients,
        format!("Patients without appointments in the last {} months fetched successfully", months),
    )))
}

#[axum::debug_handler]
pub async fn appointments_by_doctor(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_name): Path<String>,
) -> ReportResponse<DoctorAppointment> {
    let service = ReportingService::new(&config);

    let appointments = service.appointments_by_doctor(&doctor_name).await?;

    Ok(Json(ApiResponse::new(appointments, "Appointments by doctor fetched successfully")))
}
