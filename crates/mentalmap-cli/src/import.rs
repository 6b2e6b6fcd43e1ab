//! `import` subcommand: CSV export → `centers` table, with optional
//! geocoding of rows that arrived without coordinates.

use std::path::Path;
use std::time::Duration;

use sqlx::PgPool;

use mentalmap_core::AppConfig;
use mentalmap_geocode::{GeocodeError, KakaoLocalClient};

/// Upper bound on geocode calls per import run, to stay inside the Kakao
/// daily quota; remaining rows are picked up by the server's nightly
/// backfill.
const IMPORT_GEOCODE_LIMIT: i64 = 1_000;

pub(crate) async fn run(csv_path: &Path, geocode_missing: bool) -> anyhow::Result<()> {
    let config = mentalmap_core::load_app_config()?;
    let pool = mentalmap_db::connect_pool(
        &config.database_url,
        mentalmap_db::PoolConfig::from_app_config(&config),
    )
    .await?;
    mentalmap_db::run_migrations(&pool).await?;

    let records = mentalmap_db::read_center_csv(csv_path)?;
    tracing::info!(
        count = records.len(),
        path = %csv_path.display(),
        "parsed center CSV"
    );

    let count = mentalmap_db::seed_centers(&pool, &records).await?;
    println!("imported {count} centers from {}", csv_path.display());

    if geocode_missing {
        let resolved = geocode_missing_coordinates(&pool, &config).await?;
        println!("geocoded {resolved} centers");
    }

    Ok(())
}

async fn geocode_missing_coordinates(pool: &PgPool, config: &AppConfig) -> anyhow::Result<usize> {
    let api_key = config
        .kakao_api_key
        .as_deref()
        .ok_or(GeocodeError::MissingApiKey)?;
    let client = KakaoLocalClient::new(api_key, config.geocode_timeout_secs)?;

    let rows = mentalmap_db::list_centers_missing_coordinates(pool, IMPORT_GEOCODE_LIMIT).await?;
    if rows.is_empty() {
        return Ok(0);
    }

    tracing::info!(count = rows.len(), "geocoding centers without coordinates");

    let mut resolved = 0usize;
    for row in &rows {
        let Some(address) = &row.address else {
            // list_centers_missing_coordinates guarantees Some; guard defensively.
            continue;
        };

        match client
            .address_to_coordinate_with_retry(
                address,
                config.geocode_max_retries,
                config.geocode_retry_backoff_base_ms,
            )
            .await
        {
            Ok(coordinate) => {
                mentalmap_db::set_center_coordinates(pool, row.id, coordinate).await?;
                tracing::info!(
                    center = %row.name,
                    lat = coordinate.lat,
                    lng = coordinate.lng,
                    "geocoded center"
                );
                resolved += 1;
            }
            Err(GeocodeError::NoMatch { .. }) => {
                tracing::warn!(center = %row.name, address, "address did not geocode");
            }
            // Bad API key or malformed responses will not improve mid-batch.
            Err(e) => return Err(e.into()),
        }

        tokio::time::sleep(Duration::from_millis(config.geocode_inter_request_delay_ms)).await;
    }

    Ok(resolved)
}
