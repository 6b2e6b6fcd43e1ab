//! CSV seed import for the `centers` table.
//!
//! The crawler exports `name,phone,address,detail_url,lat,lng[,region]`
//! with blank fields where geocoding failed; blanks become `NULL` so the
//! backfill can resolve them later.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use sqlx::PgPool;

use crate::centers::{make_center_key, upsert_center, NewCenter};
use crate::DbError;

/// One row of a crawler CSV export.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvCenterRecord {
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    /// The center's detail page; stored as the website field.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub detail_url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none_f64")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub region: Option<String>,
}

impl CsvCenterRecord {
    /// Build the upsert input, deriving the dedup key from name + address.
    /// The crawler's `detail_url` becomes the center's website.
    #[must_use]
    pub fn to_new_center(&self) -> NewCenter {
        NewCenter {
            center_key: make_center_key(&self.name, self.address.as_deref()),
            name: self.name.clone(),
            phone: self.phone.clone(),
            website: self.detail_url.clone(),
            address: self.address.clone(),
            description: None,
            lat: self.lat,
            lng: self.lng,
            region: self.region.clone(),
        }
    }
}

fn blank_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

fn blank_as_none_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<f64>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parse a crawler CSV export.
///
/// # Errors
///
/// Returns [`DbError::Csv`] if the file cannot be read or a row does not
/// deserialize.
pub fn read_center_csv(path: &Path) -> Result<Vec<CsvCenterRecord>, DbError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<CsvCenterRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Upsert a batch of parsed CSV records into the database.
///
/// Returns the number of records processed. All upserts run inside a single
/// transaction; if any operation fails the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_centers(pool: &PgPool, records: &[CsvCenterRecord]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for record in records {
        upsert_center(&mut *tx, &record.to_new_center()).await?;
        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}
