use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use shared_models::contact::{ContactInfo, ContactPatch};
use shared_models::error::AppError;

/// Condition tag stored when none is given.
pub const DEFAULT_KASALLIK: &str = "hech_narsa";

/// Tags offered by the intake form. The column itself accepts any text.
pub const KNOWN_KASALLIK: [&str; 5] = [
    "diabet",
    "gipertenziya",
    "astma",
    "yurak_kasalligi",
    DEFAULT_KASALLIK,
];

pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i32,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default = "default_kasallik", deserialize_with = "kasallik_or_default")]
    pub kasallik: String,
}

fn default_kasallik() -> String {
    DEFAULT_KASALLIK.to_string()
}

/// Null and blank tags read back as [`DEFAULT_KASALLIK`].
pub fn kasallik_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag
        .filter(|tag| !tag.trim().is_empty())
        .unwrap_or_else(default_kasallik))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub age: i32,
    pub medical_history: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub kasallik: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(&self) -> Result<(), PatientError> {
        validate_name(&self.name)?;
        validate_age(self.age)
    }

    pub fn contact_info(&self) -> ContactInfo {
        ContactInfo {
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
        }
    }

    /// Row written to the store.
    pub fn to_row(&self) -> Value {
        json!({
            "name": self.name.trim(),
            "age": self.age,
            "medical_history": self.medical_history,
            "contact_info": self.contact_info(),
            "kasallik": self.kasallik.clone()
                .filter(|tag| !tag.trim().is_empty())
                .unwrap_or_else(default_kasallik),
        })
    }
}

/// Partial update. Every `None` keeps the stored value, including the
/// individual contact fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub medical_history: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub kasallik: Option<String>,
}

impl UpdatePatientRequest {
    pub fn validate(&self) -> Result<(), PatientError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }

    pub fn contact_patch(&self) -> ContactPatch {
        ContactPatch {
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }

    pub fn apply(self, current: Patient) -> Patient {
        let contact_info = self.contact_patch().apply(current.contact_info);

        Patient {
            id: current.id,
            name: self.name.map(|name| name.trim().to_string()).unwrap_or(current.name),
            age: self.age.unwrap_or(current.age),
            medical_history: self.medical_history.or(current.medical_history),
            contact_info,
            kasallik: self.kasallik.unwrap_or(current.kasallik),
        }
    }
}

impl Patient {
    /// Mutable columns, as written back on update.
    pub fn to_row(&self) -> Value {
        json!({
            "name": self.name,
            "age": self.age,
            "medical_history": self.medical_history,
            "contact_info": self.contact_info,
            "kasallik": self.kasallik,
        })
    }
}

fn validate_name(name: &str) -> Result<(), PatientError> {
    if name.trim().is_empty() {
        return Err(PatientError::ValidationError("name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_age(age: i32) -> Result<(), PatientError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(PatientError::ValidationError(format!(
            "age must be between {} and {}",
            MIN_AGE, MAX_AGE
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("patient has appointments")]
    HasAppointments,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::HasAppointments => AppError::Conflict(err.to_string()),
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn stored() -> Patient {
        Patient {
            id: 7,
            name: "Aziza Karimova".to_string(),
            age: 34,
            medical_history: Some("Asthma since childhood".to_string()),
            contact_info: ContactInfo {
                email: "aziza@example.uz".to_string(),
                phone: "+998901112233".to_string(),
                address: "Samarkand".to_string(),
            },
            kasallik: "astma".to_string(),
        }
    }

    #[test]
    fn test_empty_patch_keeps_everything() {
        let merged = UpdatePatientRequest::default().apply(stored());
        assert_eq!(merged, stored());
    }

    #[test]
    fn test_patch_overwrites_only_supplied_fields() {
        let patch = UpdatePatientRequest {
            age: Some(35),
            address: Some("Tashkent".to_string()),
            ..Default::default()
        };
        let merged = patch.apply(stored());

        assert_eq!(merged.age, 35);
        assert_eq!(merged.name, "Aziza Karimova");
        assert_eq!(merged.kasallik, "astma");
        assert_eq!(merged.contact_info.address, "Tashkent");
        assert_eq!(merged.contact_info.email, "aziza@example.uz");
        assert_eq!(merged.contact_info.phone, "+998901112233");
    }

    #[test]
    fn test_patch_can_clear_with_empty_string() {
        let patch = UpdatePatientRequest {
            email: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(patch.apply(stored()).contact_info.email, "");
    }

    #[test]
    fn test_create_defaults() {
        let request = CreatePatientRequest {
            name: "Bobur".to_string(),
            age: 50,
            email: Some("bobur@example.uz".to_string()),
            ..Default::default()
        };
        let row = request.to_row();

        assert_eq!(row["kasallik"], DEFAULT_KASALLIK);
        assert_eq!(row["contact_info"], json!({"email": "bobur@example.uz", "phone": "", "address": ""}));
    }

    #[test]
    fn test_validation() {
        let blank = CreatePatientRequest { name: "  ".to_string(), age: 30, ..Default::default() };
        assert_matches!(blank.validate(), Err(PatientError::ValidationError(_)));

        let too_old = CreatePatientRequest { name: "X".to_string(), age: 151, ..Default::default() };
        assert_matches!(too_old.validate(), Err(PatientError::ValidationError(_)));

        let zero = UpdatePatientRequest { age: Some(0), ..Default::default() };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_null_kasallik_reads_as_default() {
        let patient: Patient = serde_json::from_value(json!({
            "id": 1,
            "name": "Dilnoza",
            "age": 28,
            "medical_history": null,
            "contact_info": null,
            "kasallik": null
        }))
        .unwrap();

        assert_eq!(patient.kasallik, DEFAULT_KASALLIK);
        assert_eq!(patient.contact_info, ContactInfo::default());
    }

    #[test]
    fn test_known_tags_include_default() {
        assert!(KNOWN_KASALLIK.contains(&DEFAULT_KASALLIK));
    }
}
