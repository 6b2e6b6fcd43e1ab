//! HTTP client for the Kakao Local address search API.
//!
//! Wraps `reqwest` with Kakao-specific auth (`Authorization: KakaoAK <key>`),
//! typed response deserialization, and an optional retry wrapper for
//! transient failures.

use std::time::Duration;

use reqwest::{Client, Url};

use mentalmap_core::Coordinate;

use crate::error::GeocodeError;
use crate::retry::retry_with_backoff;
use crate::types::AddressSearchResponse;

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/";
const ADDRESS_SEARCH_PATH: &str = "v2/local/search/address.json";

/// Client for the Kakao Local REST API.
///
/// Use [`KakaoLocalClient::new`] for production or
/// [`KakaoLocalClient::with_base_url`] to point at a mock server in tests.
pub struct KakaoLocalClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl KakaoLocalClient {
    /// Creates a new client pointed at the production Kakao Local API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("mentalmap/0.1 (center-directory)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join appends the search path rather than replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Resolve a street address to a coordinate.
    ///
    /// Sends `GET /v2/local/search/address.json?query=<address>&size=1` and
    /// takes the first match; Kakao orders matches by relevance.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::NoMatch`] if the API knows no such address.
    /// - [`GeocodeError::Http`] / [`GeocodeError::HttpStatus`] on network
    ///   failure or non-2xx status (401 means a bad API key).
    /// - [`GeocodeError::Deserialize`] /
    ///   [`GeocodeError::InvalidResponseCoordinate`] if the response does not
    ///   match the expected shape.
    pub async fn address_to_coordinate(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let url = self
            .base_url
            .join(ADDRESS_SEARCH_PATH)
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .get(url.clone())
            .query(&[("query", address), ("size", "1")])
            .header(
                reqwest::header::AUTHORIZATION,
                format!("KakaoAK {}", self.api_key),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.json::<serde_json::Value>().await?;
        let parsed: AddressSearchResponse =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("address search for '{address}'"),
                source: e,
            })?;

        let Some(document) = parsed.documents.into_iter().next() else {
            return Err(GeocodeError::NoMatch {
                address: address.to_owned(),
            });
        };

        if let Some(matched) = &document.address_name {
            tracing::debug!(address, matched, "geocoded address");
        }

        let lat = parse_coordinate_field(&document.y)?;
        let lng = parse_coordinate_field(&document.x)?;
        Coordinate::new(lat, lng).map_err(|_| GeocodeError::InvalidResponseCoordinate {
            value: format!("({lat}, {lng})"),
        })
    }

    /// [`Self::address_to_coordinate`] with retries on transient failures.
    ///
    /// # Errors
    ///
    /// Same as [`Self::address_to_coordinate`]; the last error is returned
    /// once `max_retries` transient attempts are exhausted.
    pub async fn address_to_coordinate_with_retry(
        &self,
        address: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Coordinate, GeocodeError> {
        retry_with_backoff(max_retries, backoff_base_ms, || {
            self.address_to_coordinate(address)
        })
        .await
    }
}

fn parse_coordinate_field(raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponseCoordinate {
            value: raw.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_coordinate_field_accepts_kakao_strings() {
        assert_eq!(parse_coordinate_field("127.0276").unwrap(), 127.0276);
        assert_eq!(parse_coordinate_field(" 37.4979 ").unwrap(), 37.4979);
    }

    #[test]
    fn parse_coordinate_field_rejects_garbage() {
        assert!(matches!(
            parse_coordinate_field("east-ish"),
            Err(GeocodeError::InvalidResponseCoordinate { .. })
        ));
    }

    #[test]
    fn with_base_url_rejects_invalid_url() {
        let result = KakaoLocalClient::with_base_url("key", 10, "not a url");
        assert!(matches!(result, Err(GeocodeError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn with_base_url_normalises_trailing_slash() {
        let client = KakaoLocalClient::with_base_url("key", 10, "http://localhost:9999").unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:9999/");
    }
}
