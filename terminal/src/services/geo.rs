//! IP geolocation check for restricted regions.

use crate::core::error::{Result, TerminalError};
use crate::core::service::GeoLookup;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const GEO_URL: &str = "https://ipapi.co/json/";

/// Country codes that may not use the swap screen.
pub const BANNED_COUNTRY_CODES: &[&str] = &["US"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeoInfo {
    pub country: String,
    pub country_code: String,
    pub country_code_iso3: String,
}

impl GeoInfo {
    pub fn is_banned(&self) -> bool {
        [&self.country, &self.country_code, &self.country_code_iso3]
            .iter()
            .any(|code| BANNED_COUNTRY_CODES.contains(&code.as_str()))
    }
}

/// ipapi.co lookup.
#[derive(Debug, Clone)]
pub struct GeoService {
    http: reqwest::Client,
    url: String,
}

impl GeoService {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TerminalError::Api(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            url: GEO_URL.to_string(),
        })
    }
}

#[async_trait]
impl GeoLookup for GeoService {
    async fn lookup(&self) -> Result<GeoInfo> {
        let start = Instant::now();
        let info = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TerminalError::Api(format!("Geolocation request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| TerminalError::Api(format!("Geolocation request failed: {}", e)))?
            .json::<GeoInfo>()
            .await
            .map_err(|e| TerminalError::Api(format!("Invalid geolocation response: {}", e)))?;

        debug!(
            country_code = %info.country_code,
            duration_ms = start.elapsed().as_millis() as u64,
            "Geolocation resolved"
        );
        Ok(info)
    }
}

/// `true` when the lookup places the user in a banned region. Lookup
/// failures are treated as not banned.
pub async fn is_geobanned(lookup: &dyn GeoLookup) -> bool {
    match lookup.lookup().await {
        Ok(info) => info.is_banned(),
        Err(e) => {
            warn!(error = %e, "Geolocation check failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLookup(Option<GeoInfo>);

    #[async_trait]
    impl GeoLookup for FixedLookup {
        async fn lookup(&self) -> Result<GeoInfo> {
            self.0
                .clone()
                .ok_or_else(|| TerminalError::Api("offline".to_string()))
        }
    }

    #[test]
    fn test_any_field_can_ban() {
        let iso3_only = GeoInfo {
            country_code_iso3: "US".to_string(),
            ..GeoInfo::default()
        };
        assert!(iso3_only.is_banned());

        let allowed: GeoInfo =
            serde_json::from_str(r#"{"country":"DE","country_code":"DE","country_code_iso3":"DEU","city":"Berlin"}"#)
                .unwrap();
        assert!(!allowed.is_banned());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_banned() {
        assert!(!is_geobanned(&FixedLookup(None)).await);
        let us = GeoInfo {
            country: "US".to_string(),
            ..GeoInfo::default()
        };
        assert!(is_geobanned(&FixedLookup(Some(us))).await);
    }
}
