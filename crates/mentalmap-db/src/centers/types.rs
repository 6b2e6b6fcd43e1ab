//! Row types for the `centers` table.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Input record for inserting/upserting a center.
#[derive(Debug, Clone)]
pub struct NewCenter {
    pub center_key: String,
    pub name: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub region: Option<String>,
}

/// A row from the `centers` table.
///
/// `lat`/`lng` stay `Option`: crawler exports often lack coordinates until
/// the geocode backfill resolves the address.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CenterRow {
    pub id: i64,
    pub public_id: Uuid,
    pub center_key: String,
    pub name: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub region: Option<String>,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CenterRow {
    /// Convert into the wire-facing view model.
    ///
    /// Returns `None` when the row has no coordinates yet; such rows cannot
    /// participate in proximity queries or map rendering.
    #[must_use]
    pub fn into_center(self) -> Option<mentalmap_core::Center> {
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            return None;
        };
        Some(mentalmap_core::Center {
            name: self.name,
            phone: self.phone.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            description: self.description,
            lat,
            lng,
            region: self.region,
            distance_m: None,
        })
    }
}
