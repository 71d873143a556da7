use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use patient_cell::router::patient_routes;
use reporting_cell::router::{appointment_query_routes, patient_query_routes};
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest(
            "/api/v1/patients",
            patient_routes(state.clone()).merge(patient_query_routes(state.clone())),
        )
        .nest(
            "/api/v1/appointments",
            appointment_routes(state.clone()).merge(appointment_query_routes(state)),
        )
}
