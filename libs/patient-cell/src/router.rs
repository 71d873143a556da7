use std::sync::Arc;
use axum::{routing::get, Router};
use shared_config::AppConfig;

use crate::handlers::*;

pub fn patient_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route("/{id}", get(get_patient).put(update_patient).delete(delete_patient))
        .with_state(config)
}
