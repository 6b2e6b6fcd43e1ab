//! Error types for the Kakao Local geocoding client.

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("KAKAO_API_KEY is not configured")]
    MissingApiKey,
    #[error("HTTP error calling Kakao Local API: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Kakao Local API returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("no coordinates found for address '{address}'")]
    NoMatch { address: String },
    #[error("invalid coordinate in Kakao response: {value}")]
    InvalidResponseCoordinate { value: String },
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        context: String,
        source: serde_json::Error,
    },
}
