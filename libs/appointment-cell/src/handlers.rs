// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use shared_config::AppConfig;
use shared_models::{ApiResponse, AppError};

use crate::models::{Appointment, AppointmentView, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::services::AppointmentService;

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, AppError> {
    let service = AppointmentService::new(&state);

    let appointments = service.list_appointments().await?;

    Ok(Json(ApiResponse::new(appointments, "Appointments fetched successfully")))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Appointment>>), AppError> {
    let service = AppointmentService::new(&state);

    let appointment = service.create_appointment(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(appointment, "Appointment created successfully"))))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<ApiResponse<AppointmentView>>, AppError> {
    let service = AppointmentService::new(&state);

    let appointment = service.get_appointment(appointment_id).await?;

    Ok(Json(ApiResponse::new(appointment, "Appointment fetched successfully")))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let service = AppointmentService::new(&state);

    let appointment = service.update_appointment(appointment_id, request, Utc::now()).await?;

    Ok(Json(ApiResponse::new(appointment, "Appointment updated successfully")))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let service = AppointmentService::new(&state);

    let appointment = service.delete_appointment(appointment_id).await?;

    Ok(Json(ApiResponse::new(appointment, "Appointment deleted successfully")))
}
