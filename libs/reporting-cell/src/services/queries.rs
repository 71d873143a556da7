//! Query plans for the reports. Pure builders, no I/O.

use chrono::{DateTime, Utc};

use appointment_cell::models::AppointmentStatus;
use shared_database::query::timestamp;
use shared_database::{Order, SelectQuery};
use shared_utils::params::DateRange;

const SCHEDULED_AT: &str = "tayinlash_sanasi";
const EMBEDDED_SCHEDULED_AT: &str = "appointments.tayinlash_sanasi";

/// Patients joined to their appointments inside `range`; patients without
/// one are dropped by the inner join.
pub fn patients_with_appointments_in_range(range: &DateRange) -> SelectQuery {
    SelectQuery::from("patients")
        .select("*")
        .embed_inner("appointments", "id")
        .between(EMBEDDED_SCHEDULED_AT, range.start, range.end)
        .order("name", Order::Asc)
}

pub fn patients_by_kasallik(kasallik: &str) -> SelectQuery {
    SelectQuery::from("patients")
        .eq("kasallik", kasallik)
        .order("name", Order::Asc)
}

/// Anti-join: patients with no appointment inside `range`.
pub fn patients_without_appointments_in_range(range: &DateRange) -> SelectQuery {
    SelectQuery::from("patients")
        .select("*")
        .embed("appointments", "id")
        .between(EMBEDDED_SCHEDULED_AT, range.start, range.end)
        .without("appointments")
        .order("name", Order::Asc)
}

/// One row per scheduled appointment inside `range`, in chronological order.
pub fn scheduled_appointments_in_range(range: &DateRange) -> SelectQuery {
    SelectQuery::from("appointments")
        .select("tayinlash_sanasi,doctor_name,status")
        .embed_inner("patients", "*")
        .eq("status", AppointmentStatus::Scheduled)
        .between(SCHEDULED_AT, range.start, range.end)
        .order(SCHEDULED_AT, Order::Asc)
}

pub fn patients_by_medical_history(keyword: &str) -> SelectQuery {
    SelectQuery::from("patients")
        .ilike("medical_history", keyword)
        .order("name", Order::Asc)
}

/// Anti-join: patients with no appointment on or after `since`. Without a
/// lower bound this is every patient who has no appointment at all.
pub fn patients_without_appointments_since(since: Option<DateTime<Utc>>) -> SelectQuery {
    let mut query = SelectQuery::from("patients").select("*").embed("appointments", "id");
    if let Some(since) = since {
        query = query.gte(EMBEDDED_SCHEDULED_AT, timestamp(since));
    }

    query.without("appointments").order("name", Order::Asc)
}

/// Appointments of one doctor, newest first, left-joined to the patient.
pub fn appointments_by_doctor(doctor_name: &str) -> SelectQuery {
    SelectQuery::from("appointments")
        .select("*")
        .embed("patients", "name,kasallik")
        .eq("doctor_name", doctor_name)
        .order(SCHEDULED_AT, Order::Desc)
}
