use std::sync::Arc;
use axum::{routing::get, Router};
use shared_config::AppConfig;

use crate::handlers::*;

/// Patient-centric reports, mounted next to the patient routes.
pub fn patient_query_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/queries/with-appointments", get(patients_with_appointments))
        .route("/queries/by-kasallik/{kasallik}", get(patients_by_kasallik))
        .route("/queries/without-appointments", get(patients_without_appointments))
        .route("/queries/scheduled-appointments", get(patients_with_scheduled_appointments))
        .route("/queries/by-medical-history", get(patients_by_medical_history))
        .route("/queries/without-recent-appointments", get(patients_without_recent_appointments))
        .with_state(config)
}

/// Appointment-centric reports, mounted next to the appointment routes.
pub fn appointment_query_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/queries/by-doctor/{doctor_name}", get(appointments_by_doctor))
        .with_state(config)
}
