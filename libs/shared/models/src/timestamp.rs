//! Serde adapter for timestamp columns.
//!
//! `timestamptz` columns arrive as RFC 3339, plain `timestamp` columns arrive
//! without an offset and form inputs may omit seconds. Offset-less values are
//! taken as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    // Postgres renders short offsets such as `+00`
    if let Ok(instant) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(instant.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

pub mod option {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => super::serialize(instant, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_parses_store_variants() {
        assert_eq!(parse("2024-01-15T10:30:00+00:00"), Some(expected()));
        assert_eq!(parse("2024-01-15T15:30:00+05:00"), Some(expected()));
        assert_eq!(parse("2024-01-15T10:30:00"), Some(expected()));
        assert_eq!(parse("2024-01-15T10:30:00.000"), Some(expected()));
        assert_eq!(parse("2024-01-15 10:30:00+00"), Some(expected()));
        assert_eq!(parse("2024-01-15T10:30"), Some(expected()));
    }

    #[test]
    fn test_serialize_keeps_fractional_seconds() {
        #[derive(serde::Serialize)]
        struct Row(#[serde(with = "super")] DateTime<Utc>);

        let precise = parse("2024-01-15 10:30:00.25+00").unwrap();
        assert_eq!(serde_json::to_value(Row(precise)).unwrap(), "2024-01-15T10:30:00.250Z");
        assert_eq!(serde_json::to_value(Row(expected())).unwrap(), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse("yesterday"), None);
        assert_eq!(parse("2024-01-15"), None);
    }
}
