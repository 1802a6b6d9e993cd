use std::env;
use std::sync::Arc;

use attendance_store::{AttendanceStore, MemoryStore, SqliteStore};
use checkin_core::{CircularGeofence, Coordinates};
use checkin_listener::{EventProcessor, TelegramSink};
use checkin_session::{SessionConfig, SessionEngine};
use telegram_channel::{BotConfig, TelegramClient};
use tracing::info;

/// Default geofence radius in kilometers.
const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Read the geofence from the environment.
///
/// `ALLOWED_CENTER_LAT` and `ALLOWED_CENTER_LON` are required;
/// `ALLOWED_RADIUS_KM` defaults to 5 km.
fn get_geofence() -> Result<CircularGeofence, Box<dyn std::error::Error>> {
    let latitude: f64 = env::var("ALLOWED_CENTER_LAT")
        .map_err(|_| "ALLOWED_CENTER_LAT environment variable is required")?
        .parse()
        .map_err(|_| "ALLOWED_CENTER_LAT must be a number")?;

    let longitude: f64 = env::var("ALLOWED_CENTER_LON")
        .map_err(|_| "ALLOWED_CENTER_LON environment variable is required")?
        .parse()
        .map_err(|_| "ALLOWED_CENTER_LON must be a number")?;

    let radius_km = match env::var("ALLOWED_RADIUS_KM") {
        Ok(val) => val.parse().map_err(|_| "ALLOWED_RADIUS_KM must be a number")?,
        Err(_) => DEFAULT_RADIUS_KM,
    };

    let center = Coordinates::new(latitude, longitude)?;
    Ok(CircularGeofence::new(center, radius_km)?)
}

fn get_session_config() -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = SessionConfig::default();
    if let Ok(val) = env::var("MAX_ATTEMPTS") {
        config.max_attempts = val.parse().map_err(|_| "MAX_ATTEMPTS must be a number")?;
    }
    Ok(config)
}

/// Open the attendance store.
///
/// Uses SQLite when DATABASE_URL is set, otherwise an in-memory store
/// (records are lost on restart).
async fn get_store() -> Result<Arc<dyn AttendanceStore>, Box<dyn std::error::Error>> {
    match env::var("DATABASE_URL") {
        Ok(url) => {
            info!("Opening attendance database at {}", url);
            let store = SqliteStore::connect(&url).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory attendance store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let geofence = Arc::new(get_geofence()?);
    info!(
        "Geofence: center ({}, {}), radius {} km",
        geofence.center().latitude(),
        geofence.center().longitude(),
        geofence.radius_km()
    );

    let session_config = get_session_config()?;
    let store = get_store().await?;

    let bot_config = BotConfig::from_env()?;
    let client = TelegramClient::connect(bot_config).await?;

    let sink = TelegramSink::new(client.clone());
    let engine = SessionEngine::new(geofence, store, sink, session_config);

    info!("Starting attendance bot");
    let processor = EventProcessor::new(client, engine);
    processor.run_until_stopped().await?;

    Ok(())
}
