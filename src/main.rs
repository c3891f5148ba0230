use anyhow::{Context, Result};
use brewcast::{AppState, BrewcastConfig, Location, ModelStore, OpenMeteoClient, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = BrewcastConfig::load().context("Failed to load configuration")?;
    telemetry::init(&config.logging)?;
    tracing::info!("brewcast {} starting", brewcast::VERSION);

    let models = ModelStore::load(&config.models.directory)
        .context("Failed to load forecast models")?;
    let weather = OpenMeteoClient::new(&config.weather)?;
    let location = Location::from(&config.site);
    tracing::info!(
        "Forecasting for {} ({})",
        location.format_coordinates(),
        location.timezone
    );

    let state = AppState::new(models, weather, location);
    web::run(&config.bind_address(), state).await
}
