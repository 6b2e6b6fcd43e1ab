mod import;
mod nearby;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use mentalmap_geocode::{GeocodeError, KakaoLocalClient};

#[derive(Debug, Parser)]
#[command(name = "mentalmap-cli")]
#[command(about = "mentalmap center directory CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import centers from a crawler CSV export.
    Import {
        /// Path to the CSV file (`name,phone,address,detail_url,lat,lng[,region]`).
        #[arg(long)]
        csv: PathBuf,
        /// Geocode rows that arrived without coordinates (requires `KAKAO_API_KEY`).
        #[arg(long)]
        geocode_missing: bool,
    },
    /// Resolve a street address to coordinates.
    Geocode { address: String },
    /// List open centers near a point, closest first.
    Nearby {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lng: f64,
        /// Search radius in meters. Wins over --level when both are given.
        #[arg(long)]
        radius: Option<f64>,
        /// Map zoom level in [1, 13], translated through the radius table.
        #[arg(long)]
        level: Option<u8>,
        /// Print only the N nearest centers.
        #[arg(long)]
        top: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Import {
            csv,
            geocode_missing,
        } => import::run(&csv, geocode_missing).await,
        Commands::Geocode { address } => geocode(&address).await,
        Commands::Nearby {
            lat,
            lng,
            radius,
            level,
            top,
        } => nearby::run(lat, lng, radius, level, top).await,
    }
}

async fn geocode(address: &str) -> anyhow::Result<()> {
    let config = mentalmap_core::load_app_config()?;
    let api_key = config
        .kakao_api_key
        .as_deref()
        .ok_or(GeocodeError::MissingApiKey)?;

    let client = KakaoLocalClient::new(api_key, config.geocode_timeout_secs)?;
    let coordinate = client
        .address_to_coordinate_with_retry(
            address,
            config.geocode_max_retries,
            config.geocode_retry_backoff_base_ms,
        )
        .await?;

    println!("{address}");
    println!("lat: {}, lng: {}", coordinate.lat, coordinate.lng);
    Ok(())
}
