use std::sync::Arc;
use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Default::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_key: None,
            port: 3000,
        }
    }
    
    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Rows shaped the way the REST gateway returns them.
pub struct MockStoreRows;

impl MockStoreRows {
    pub fn contact() -> Value {
        json!({
            "email": "a@b.com",
            "phone": "+998901234567",
            "address": "Tashkent"
        })
    }

    pub fn patient_row(id: i64, name: &str, kasallik: &str, medical_history: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "age": 42,
            "medical_history": medical_history,
            "contact_info": Self::contact(),
            "kasallik": kasallik
        })
    }

    pub fn appointment_row(id: i64, patients_id: Option<i64>, doctor_name: &str, date: &str, status: &str) -> Value {
        json!({
            "id": id,
            "patients_id": patients_id,
            "doctor_name": doctor_name,
            "tayinlash_sanasi": date,
            "status": status,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        })
    }
    
    pub fn error_response(message: &str, code: &str) -> Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
