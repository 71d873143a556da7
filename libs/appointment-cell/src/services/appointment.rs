use chrono::{DateTime, Utc};
use reqwest::Method;
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_database::{Order, SelectQuery, SupabaseClient};

use crate::models::{
    Appointment, AppointmentError, AppointmentRow, AppointmentView, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};

pub struct AppointmentService {
    supabase: SupabaseClient,
}

fn store_error(err: anyhow::Error) -> AppointmentError {
    error!("Appointment store operation failed: {:#}", err);
    AppointmentError::DatabaseError(err.to_string())
}

/// Appointments left-joined with the referenced patient's name.
fn with_patient_name() -> SelectQuery {
    SelectQuery::from("appointments").select("*").embed("patients", "name")
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_appointments(&self) -> Result<Vec<AppointmentView>, AppointmentError> {
        debug!("Fetching all appointments");

        let query = with_patient_name().order("tayinlash_sanasi", Order::Desc);
        let rows: Vec<AppointmentRow> = self.supabase.select(&query).await.map_err(store_error)?;

        Ok(rows.into_iter().map(AppointmentView::from).collect())
    }

    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        request.validate()?;
        debug!("Booking appointment with {} at {}", request.doctor_name, request.tayinlash_sanasi);

        let rows: Vec<Appointment> = self.supabase
            .write_returning(Method::POST, "/rest/v1/appointments", Some(request.to_row()))
            .await
            .map_err(store_error)?;

        let appointment = rows.into_iter().next()
            .ok_or_else(|| AppointmentError::DatabaseError("Failed to create appointment".to_string()))?;

        info!("Appointment created with ID: {}", appointment.id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<AppointmentView, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let query = with_patient_name().eq("id", appointment_id).limit(1);
        let rows: Vec<AppointmentRow> = self.supabase.select(&query).await.map_err(store_error)?;

        rows.into_iter()
            .next()
            .map(AppointmentView::from)
            .ok_or(AppointmentError::NotFound)
    }

    /// Merges the supplied fields into the stored record; `updated_at` is set to `now`.
    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        request: UpdateAppointmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        request.validate()?;
        debug!("Updating appointment: {}", appointment_id);

        let current = self.get_appointment(appointment_id).await?.appointment;
        let merged = request.apply(current, now);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Appointment> = self.supabase
            .write_returning(Method::PATCH, &path, Some(merged.to_row()))
            .await
            .map_err(store_error)?;

        let appointment = rows.into_iter().next().ok_or(AppointmentError::NotFound)?;
        info!("Appointment {} updated", appointment.id);
        Ok(appointment)
    }

    pub async fn delete_appointment(&self, appointment_id: i64) -> Result<Appointment, AppointmentError> {
        debug!("Deleting appointment: {}", appointment_id);

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let rows: Vec<Appointment> = self.supabase
            .write_returning(Method::DELETE, &path, None)
            .await
            .map_err(store_error)?;

        let appointment = rows.into_iter().next().ok_or(AppointmentError::NotFound)?;
        info!("Appointment {} deleted", appointment.id);
        Ok(appointment)
    }
}
