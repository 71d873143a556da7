use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use patient_cell::models::Patient;
use shared_config::AppConfig;
use shared_database::{SelectQuery, SupabaseClient};
use shared_utils::params::{self, DateRange};

use crate::models::{
    DoctorAppointment, DoctorAppointmentRow, PatientAppointmentCount, PatientWithAppointments,
    ReportError, ScheduledPatient, ScheduledRow,
};
use crate::services::queries;

/// Read-only reports over patients and their appointments. Every report
/// validates its input first and then issues exactly one select.
pub struct ReportingService {
    supabase: SupabaseClient,
}

impl ReportingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn run<T>(&self, report: &str, query: SelectQuery) -> Result<Vec<T>, ReportError>
    where
        T: DeserializeOwned,
    {
        debug!("Running report {} via {}", report, query.to_path());

        let rows: Vec<T> = self.supabase.select(&query).await.map_err(|e| {
            error!("Report {} failed: {:#}", report, e);
            ReportError::DatabaseError(e.to_string())
        })?;

        debug!("Report {} returned {} rows", report, rows.len());
        Ok(rows)
    }

    pub async fn patients_with_appointments_in_range(
        &self,
        range: DateRange,
    ) -> Result<Vec<PatientAppointmentCount>, ReportError> {
        let rows: Vec<PatientWithAppointments> = self
            .run("with-appointments", queries::patients_with_appointments_in_range(&range))
            .await?;

        Ok(rows.into_iter().map(PatientAppointmentCount::from).collect())
    }

    /// Unknown tags are not an error; they match nobody.
    pub async fn patients_by_kasallik(&self, kasallik: &str) -> Result<Vec<Patient>, ReportError> {
        let kasallik = params::required_text("kasallik", Some(kasallik))?;

        self.run("by-kasallik", queries::patients_by_kasallik(kasallik)).await
    }

    pub async fn patients_without_appointments_in_range(
        &self,
        range: DateRange,
    ) -> Result<Vec<Patient>, ReportError> {
        self.run("without-appointments", queries::patients_without_appointments_in_range(&range))
            .await
    }

    pub async fn patients_with_scheduled_appointments(
        &self,
        range: DateRange,
    ) -> Result<Vec<ScheduledPatient>, ReportError> {
        let rows: Vec<ScheduledRow> = self
            .run("scheduled-appointments", queries::scheduled_appointments_in_range(&range))
            .await?;

        Ok(rows.into_iter().map(ScheduledPatient::from).collect())
    }

    pub async fn patients_by_medical_history(&self, keyword: &str) -> Result<Vec<Patient>, ReportError> {
        let keyword = params::required_text("keyword", Some(keyword))?;

        self.run("by-medical-history", queries::patients_by_medical_history(keyword)).await
    }

    /// Patients with no appointment in the `months` calendar months before `now`.
    pub async fn patients_without_recent_appointments(
        &self,
        months: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Patient>, ReportError> {
        let since = params::months_before(now, months);

        self.run("without-recent-appointments", queries::patients_without_appointments_since(since))
            .await
    }

    pub async fn appointments_by_doctor(&self, doctor_name: &str) -> Result<Vec<DoctorAppointment>, ReportError> {
        let doctor_name = params::required_text("doctorName", Some(doctor_name))?;

        let rows: Vec<DoctorAppointmentRow> = self
            .run("by-doctor", queries::appointments_by_doctor(doctor_name))
            .await?;

        Ok(rows.into_iter().map(DoctorAppointment::from).collect())
    }
}
