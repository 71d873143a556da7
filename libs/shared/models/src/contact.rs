//! Patient contact details stored as an embedded document.
//!
//! Depending on the read path the store hands `contact_info` back either as a
//! JSON object or as its encoded text. [`ContactInfo`] deserializes from both,
//! so every read model that embeds it gets a structured value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredContact {
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl From<StoredContact> for ContactInfo {
    fn from(stored: StoredContact) -> Self {
        Self {
            email: stored.email.unwrap_or_default(),
            phone: stored.phone.unwrap_or_default(),
            address: stored.address.unwrap_or_default(),
        }
    }
}

impl ContactInfo {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(text) if text.trim().is_empty() => Ok(Self::default()),
            Value::String(text) => serde_json::from_str::<StoredContact>(&text).map(Self::from),
            other => serde_json::from_value::<StoredContact>(other).map(Self::from),
        }
    }
}

impl<'de> Deserialize<'de> for ContactInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        ContactInfo::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Partial contact update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }

    pub fn apply(self, current: ContactInfo) -> ContactInfo {
        ContactInfo {
            email: self.email.unwrap_or(current.email),
            phone: self.phone.unwrap_or(current.phone),
            address: self.address.unwrap_or(current.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ContactInfo {
        ContactInfo {
            email: "a@b.com".to_string(),
            phone: "+998901234567".to_string(),
            address: "Tashkent".to_string(),
        }
    }

    #[test]
    fn test_decodes_structured_document() {
        let value = json!({"email": "a@b.com", "phone": "+998901234567", "address": "Tashkent"});
        let contact: ContactInfo = serde_json::from_value(value).unwrap();
        assert_eq!(contact, sample());
    }

    #[test]
    fn test_decodes_encoded_text() {
        let value = json!(r#"{"email":"a@b.com","phone":"+998901234567","address":"Tashkent"}"#);
        let contact: ContactInfo = serde_json::from_value(value).unwrap();
        assert_eq!(contact, sample());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let contact: ContactInfo = serde_json::from_value(json!({"phone": null, "email": "x@y.uz"})).unwrap();
        assert_eq!(contact.email, "x@y.uz");
        assert_eq!(contact.phone, "");
        assert_eq!(contact.address, "");

        let absent: ContactInfo = serde_json::from_value(Value::Null).unwrap();
        assert_eq!(absent, ContactInfo::default());
    }

    #[test]
    fn test_garbage_text_is_an_error() {
        let result: Result<ContactInfo, _> = serde_json::from_value(json!("not json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_merges_only_supplied_fields() {
        let patch = ContactPatch {
            phone: Some("+998711112233".to_string()),
            ..Default::default()
        };
        let merged = patch.apply(sample());

        assert_eq!(merged.email, "a@b.com");
        assert_eq!(merged.phone, "+998711112233");
        assert_eq!(merged.address, "Tashkent");
        assert!(ContactPatch::default().is_empty());
    }

    #[test]
    fn test_serializes_as_object() {
        assert_eq!(
            serde_json::to_value(sample()).unwrap(),
            json!({"email": "a@b.com", "phone": "+998901234567", "address": "Tashkent"})
        );
    }
}
