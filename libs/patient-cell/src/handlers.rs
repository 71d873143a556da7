use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared_config::AppConfig;
use shared_models::{ApiResponse, AppError};

use crate::models::{CreatePatientRequest, Patient, UpdatePatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<ApiResponse<Vec<Patient>>>, AppError> {
    let service = PatientService::new(&config);

    let patients = service.list_patients().await?;

    Ok(Json(ApiResponse::new(patients, "Patients fetched successfully")))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Patient>>), AppError> {
    let service = PatientService::new(&config);
    
    let patient = service.create_patient(request).await?;
    
    Ok((StatusCode::CREATED, Json(ApiResponse::new(patient, "Patient created successfully"))))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let service = PatientService::new(&config);
    
    let patient = service.get_patient(patient_id).await?;
    
    Ok(Json(ApiResponse::new(patient, "Patient fetched successfully")))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let service = PatientService::new(&config);
    
    let patient = service.update_patient(patient_id, request).await?;
    
    Ok(Json(ApiResponse::new(patient, "Patient updated successfully")))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let service = PatientService::new(&config);

    let patient = service.delete_patient(patient_id).await?;

    Ok(Json(ApiResponse::new(patient, "Patient deleted successfully")))
}
