use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Radius used when a centers query supplies neither `radius` nor `level`.
    pub default_radius_m: f64,
    pub kakao_api_key: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub geocode_timeout_secs: u64,
    pub geocode_max_retries: u32,
    pub geocode_retry_backoff_base_ms: u64,
    pub geocode_inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("default_radius_m", &self.default_radius_m)
            .field("database_url", &"[redacted]")
            .field(
                "kakao_api_key",
                &self.kakao_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("geocode_max_retries", &self.geocode_max_retries)
            .field(
                "geocode_retry_backoff_base_ms",
                &self.geocode_retry_backoff_base_ms,
            )
            .field(
                "geocode_inter_request_delay_ms",
                &self.geocode_inter_request_delay_ms,
            )
            .finish()
    }
}
