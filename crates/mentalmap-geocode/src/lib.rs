//! Address geocoding via the Kakao Local REST API.
//!
//! Crawler exports carry street addresses but often no coordinates; this
//! crate resolves them so centers can participate in proximity queries.

mod client;
mod error;
mod retry;
mod types;

pub use client::KakaoLocalClient;
pub use error::GeocodeError;
pub use retry::retry_with_backoff;
