//! Lifetime options offered to uploaders

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// How long an upload stays retrievable.
///
/// Clients send the lifetime as a minutes key (`"10"`, `"60"`, `"1440"`).
/// Any other key, including a missing one, selects one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    TenMinutes,
    #[default]
    OneHour,
    OneDay,
}

impl Expiry {
    /// Map a client-supplied minutes key to a lifetime
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("10") => Expiry::TenMinutes,
            Some("60") => Expiry::OneHour,
            Some("1440") => Expiry::OneDay,
            _ => Expiry::OneHour,
        }
    }

    pub fn minutes(self) -> i64 {
        match self {
            Expiry::TenMinutes => 10,
            Expiry::OneHour => 60,
            Expiry::OneDay => 24 * 60,
        }
    }

    pub fn ttl(self) -> Duration {
        Duration::minutes(self.minutes())
    }

    /// Absolute expiry for an upload created at `created_at`
    pub fn expires_at(self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.ttl()
    }
}

/// Expiry key as it appears in JSON bodies: the browser client sends a
/// string, other clients may send a bare number. Any other JSON value is
/// accepted and selects the default lifetime.
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum ExpiryKey {
    Text(String),
    Minutes(u64),
    Other(serde_json::Value),
}

impl ExpiryKey {
    pub fn to_expiry(&self) -> Expiry {
        match self {
            ExpiryKey::Text(key) => Expiry::from_key(Some(key)),
            ExpiryKey::Minutes(minutes) => Expiry::from_key(Some(&minutes.to_string())),
            ExpiryKey::Other(_) => Expiry::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys() {
        assert_eq!(Expiry::from_key(Some("10")), Expiry::TenMinutes);
        assert_eq!(Expiry::from_key(Some("60")), Expiry::OneHour);
        assert_eq!(Expiry::from_key(Some("1440")), Expiry::OneDay);
    }

    #[test]
    fn test_unknown_keys_default_to_one_hour() {
        assert_eq!(Expiry::from_key(None), Expiry::OneHour);
        assert_eq!(Expiry::from_key(Some("")), Expiry::OneHour);
        assert_eq!(Expiry::from_key(Some("30")), Expiry::OneHour);
        assert_eq!(Expiry::from_key(Some(" 10")), Expiry::OneHour);
        assert_eq!(Expiry::from_key(Some("forever")), Expiry::OneHour);
    }

    #[test]
    fn test_ttl_milliseconds() {
        assert_eq!(Expiry::TenMinutes.ttl().num_milliseconds(), 600_000);
        assert_eq!(Expiry::OneHour.ttl().num_milliseconds(), 3_600_000);
        assert_eq!(Expiry::OneDay.ttl().num_milliseconds(), 86_400_000);
    }

    #[test]
    fn test_expires_at_adds_ttl() {
        let created_at = Utc::now();
        let expires_at = Expiry::OneDay.expires_at(created_at);
        assert_eq!((expires_at - created_at).num_milliseconds(), 86_400_000);
    }

    #[test]
    fn test_expiry_key_accepts_string_or_number() {
        let text: ExpiryKey = serde_json::from_str(r#""1440""#).unwrap();
        assert_eq!(text.to_expiry(), Expiry::OneDay);

        let number: ExpiryKey = serde_json::from_str("10").unwrap();
        assert_eq!(number.to_expiry(), Expiry::TenMinutes);

        let unknown: ExpiryKey = serde_json::from_str("7").unwrap();
        assert_eq!(unknown.to_expiry(), Expiry::OneHour);
    }

    #[test]
    fn test_expiry_key_other_values_default_to_one_hour() {
        for raw in ["10.0", "true", "-5", r#"{"m":10}"#, "null", "[10]"] {
            let key: ExpiryKey = serde_json::from_str(raw).unwrap();
            assert_eq!(key.to_expiry(), Expiry::OneHour, "{}", raw);
        }
    }
}
