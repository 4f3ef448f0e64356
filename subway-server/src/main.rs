use subway_server::config::ServerConfig;
use subway_server::lines::{LineRepository, LineService};
use subway_server::stations::{StationClient, StationRegistry};
use subway_server::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("subway_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Load stations from the upstream feed if one is configured (fail fast if unavailable)
    let stations = match &config.station_feed {
        Some(feed) => {
            info!(url = %feed.base_url, "fetching stations");
            let client = StationClient::new(feed.clone())?;
            let registry = StationRegistry::fetch(client).await?;

            // Spawn background task to refresh stations periodically
            let refresh = registry.clone();
            let period = config.station_refresh;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.tick().await; // First tick is immediate, skip it
                loop {
                    interval.tick().await;
                    match refresh.refresh().await {
                        Ok(count) => info!(count, "refreshed stations"),
                        Err(e) => error!(error = %e, "failed to refresh stations"),
                    }
                }
            });

            registry
        }
        None => {
            warn!("STATION_FEED_URL not set; stations must be registered via POST /stations");
            StationRegistry::new()
        }
    };

    let service = LineService::new(LineRepository::new(), stations);
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "subway server listening");
    info!("  GET    /health");
    info!("  GET    /stations, POST /stations, GET /stations/:id");
    info!("  GET    /lines, POST /lines");
    info!("  GET    /lines/:id, PUT /lines/:id, DELETE /lines/:id");
    info!("  POST   /lines/:id/sections, DELETE /lines/:id/sections?stationId=");

    axum::serve(listener, app).await?;
    Ok(())
}
