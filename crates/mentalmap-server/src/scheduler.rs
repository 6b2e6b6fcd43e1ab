//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! nightly geocode backfill.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use mentalmap_geocode::{GeocodeError, KakaoLocalClient};

/// Centers geocoded per nightly run; keeps one run well inside the Kakao
/// daily quota.
const BACKFILL_BATCH_SIZE: i64 = 100;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<mentalmap_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_geocode_backfill_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the nightly geocode backfill.
///
/// Runs every day at 03:00 UTC (`0 0 3 * * *`): centers imported without
/// coordinates get their address resolved through the Kakao Local API so
/// they start appearing in proximity queries.
async fn register_geocode_backfill_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<mentalmap_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 3 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting nightly geocode backfill");
            run_geocode_backfill(&pool, &config).await;
            tracing::info!("scheduler: nightly geocode backfill complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Geocode one batch of centers that still lack coordinates.
async fn run_geocode_backfill(pool: &PgPool, config: &mentalmap_core::AppConfig) {
    let Some(api_key) = &config.kakao_api_key else {
        tracing::info!("scheduler: KAKAO_API_KEY not set; skipping geocode backfill");
        return;
    };

    let client = match KakaoLocalClient::new(api_key, config.geocode_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to build geocode client");
            return;
        }
    };

    let rows = match mentalmap_db::list_centers_missing_coordinates(pool, BACKFILL_BATCH_SIZE).await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to load centers missing coordinates");
            return;
        }
    };

    if rows.is_empty() {
        tracing::info!("scheduler: no centers missing coordinates; skipping");
        return;
    }

    tracing::info!(count = rows.len(), "scheduler: geocoding centers");

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
                if let Err(e) = mentalmap_db::set_center_coordinates(pool, row.id, coordinate).await
                {
                    tracing::error!(center = %row.name, error = %e, "scheduler: failed to store coordinates");
                } else {
                    resolved += 1;
                }
            }
            Err(GeocodeError::NoMatch { .. }) => {
                tracing::warn!(center = %row.name, address, "scheduler: address did not geocode");
            }
            Err(e) => {
                tracing::error!(center = %row.name, error = %e, "scheduler: geocode request failed");
            }
        }

        tokio::time::sleep(std::time::Duration::from_millis(
            config.geocode_inter_request_delay_ms,
        ))
        .await;
    }

    tracing::info!(
        resolved,
        total = rows.len(),
        "scheduler: geocode backfill batch finished"
    );
}
