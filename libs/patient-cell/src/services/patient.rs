use reqwest::Method;
use tracing::{debug, error, info, warn};

use shared_config::AppConfig;
use shared_database::{Order, SelectQuery, SupabaseClient};

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest};

pub struct PatientService {
    supabase: SupabaseClient,
}

fn store_error(err: anyhow::Error) -> PatientError {
    error!("Patient store operation failed: {:#}", err);
    PatientError::DatabaseError(err.to_string())
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>, PatientError> {
        debug!("Fetching all patients");

        let query = SelectQuery::from("patients").order("name", Order::Asc);
        self.supabase.select(&query).await.map_err(store_error)
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        request.validate()?;
        debug!("Creating patient: {}", request.name);

        let rows: Vec<Patient> = self.supabase
            .write_returning(Method::POST, "/rest/v1/patients", Some(request.to_row()))
            .await
            .map_err(store_error)?;

        let patient = rows.into_iter().next()
            .ok_or_else(|| PatientError::DatabaseError("Failed to create patient".to_string()))?;

        info!("Patient created with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        debug!("Fetching patient: {}", patient_id);

        let query = SelectQuery::from("patients").eq("id", patient_id).limit(1);
        let rows: Vec<Patient> = self.supabase.select(&query).await.map_err(store_error)?;

        rows.into_iter().next().ok_or(PatientError::NotFound)
    }

    /// Merges the supplied fields into the stored record and writes it back.
    pub async fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        request.validate()?;
        debug!("Updating patient: {}", patient_id);

        let current = self.get_patient(patient_id).await?;
        let merged = request.apply(current);

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let rows: Vec<Patient> = self.supabase
            .write_returning(Method::PATCH, &path, Some(merged.to_row()))
            .await
            .map_err(store_error)?;

        let patient = rows.into_iter().next().ok_or(PatientError::NotFound)?;
        info!("Patient {} updated", patient.id);
        Ok(patient)
    }

    /// Refuses to delete a patient that any appointment still references.
    pub async fn delete_patient(&self, patient_id: i64) -> Result<Patient, PatientError> {
        debug!("Deleting patient: {}", patient_id);

        if self.has_appointments(patient_id).await? {
            warn!("Refusing to delete patient {} with appointments", patient_id);
            return Err(PatientError::HasAppointments);
        }

        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let rows: Vec<Patient> = self.supabase
            .write_returning(Method::DELETE, &path, None)
            .await
            .map_err(store_error)?;

        let patient = rows.into_iter().next().ok_or(PatientError::NotFound)?;
        info!("Patient {} deleted", patient.id);
        Ok(patient)
    }

    async fn has_appointments(&self, patient_id: i64) -> Result<bool, PatientError> {
        let query = SelectQuery::from("appointments")
            .select("id")
            .eq("patients_id", patient_id)
            .limit(1);
        let rows: Vec<serde_json::Value> = self.supabase.select(&query).await.map_err(store_error)?;

        Ok(!rows.is_empty())
    }
}
