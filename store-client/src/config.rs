//! Connection settings for the remote store.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::StoreError;

/// Endpoint and credentials of the remote table store.
///
/// Both `url` and `key` are mandatory; `StoreClient::new` rejects blank
/// values so a misconfigured process never starts serving.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,
    /// Anon or service-role key; sent as `apikey` and bearer token.
    pub key: AccessKey,
    /// Per-request timeout. `None` leaves the HTTP client's default (no deadline).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: AccessKey::new(key),
            timeout_secs: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        if self.url.trim().is_empty() {
            return Err(StoreError::config("store URL is not configured"));
        }
        if self.key.expose().trim().is_empty() {
            return Err(StoreError::config("store access key is not configured"));
        }
        Ok(())
    }
}

/// Access key for the store. `Debug` and `Display` never print the value and
/// the buffer is zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessKey(String);

impl AccessKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read-only access for building request headers. Do not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

// Layered config sources type their scalars, so an all-digit key arrives as
// a number. Any scalar is taken as the key's text.
impl<'de> Deserialize<'de> for AccessKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AccessKeyVisitor)
    }
}

struct AccessKeyVisitor;

impl Visitor<'_> for AccessKeyVisitor {
    type Value = AccessKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an access key string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<AccessKey, E> {
        Ok(AccessKey::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<AccessKey, E> {
        Ok(AccessKey(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<AccessKey, E> {
        Ok(AccessKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<AccessKey, E> {
        Ok(AccessKey(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<AccessKey, E> {
        Ok(AccessKey(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<AccessKey, E> {
        Ok(AccessKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<AccessKey, E> {
        Ok(AccessKey(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<AccessKey, E> {
        Ok(AccessKey(v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_key_is_redacted() {
        let key = AccessKey::new("service-role-secret");
        assert_eq!(format!("{key:?}"), "[REDACTED]");
        assert_eq!(format!("{key}"), "[REDACTED]");
        assert_eq!(key.expose(), "service-role-secret");
    }

    #[test]
    fn config_debug_hides_key() {
        let cfg = StoreConfig::new("http://localhost:54321", "service-role-secret");
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("localhost:54321"));
        assert!(!dbg.contains("service-role-secret"));
    }

    #[test]
    fn blank_url_is_rejected() {
        let cfg = StoreConfig::new("  ", "key");
        assert!(matches!(cfg.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn blank_key_is_rejected() {
        let cfg = StoreConfig::new("http://localhost:54321", "");
        assert!(matches!(cfg.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn deserializes_from_json() {
        let cfg: StoreConfig =
            serde_json::from_str(r#"{"url":"http://localhost:54321","key":"k","timeout_secs":5}"#)
                .unwrap();
        assert_eq!(cfg.url, "http://localhost:54321");
        assert_eq!(cfg.key.expose(), "k");
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    #[test]
    fn numeric_key_is_read_as_text() {
        let cfg: StoreConfig =
            serde_json::from_str(r#"{"url":"http://localhost:54321","key":123456}"#).unwrap();
        assert_eq!(cfg.key.expose(), "123456");
    }

    #[test]
    fn structured_key_is_rejected() {
        let result: Result<StoreConfig, _> =
            serde_json::from_str(r#"{"url":"http://x","key":{"nested":1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_key_fails_to_deserialize() {
        let result: Result<StoreConfig, _> = serde_json::from_str(r#"{"url":"http://x"}"#);
        assert!(result.is_err());
    }
}
