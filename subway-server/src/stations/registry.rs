//! Shared station registry.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::domain::{Station, StationDirectory, StationId, StationIdsExhausted};

use super::client::{StationClient, StationDto};
use super::error::StationError;

/// Thread-safe station registry.
///
/// Stations either come from an upstream feed (fetched at startup and
/// refreshed in the background) or are registered locally. The registry
/// hands out read guards so a line operation resolves all of its stations
/// against one consistent snapshot.
#[derive(Clone, Default)]
pub struct StationRegistry {
    inner: Arc<RwLock<StationDirectory>>,
    client: Option<StationClient>,
}

impl StationRegistry {
    /// Create an empty registry with no upstream feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry by fetching from the feed.
    ///
    /// This will fail if the feed is unreachable.
    pub async fn fetch(client: StationClient) -> Result<Self, StationError> {
        let stations = client.fetch_all().await?;
        let directory = build_directory(stations);
        info!(count = directory.len(), "loaded stations from feed");

        Ok(Self {
            inner: Arc::new(RwLock::new(directory)),
            client: Some(client),
        })
    }

    /// Register a station locally under the next free id.
    pub async fn register(&self, name: impl Into<String>) -> Result<Station, StationIdsExhausted> {
        let mut guard = self.inner.write().await;
        let station = guard.register(name)?;
        debug!(id = %station.id, name = %station.name, "registered station");
        Ok(station)
    }

    /// Look up a station by id.
    pub async fn get(&self, id: StationId) -> Option<Station> {
        let guard = self.inner.read().await;
        guard.get(id).cloned()
    }

    /// All known stations, ordered by id.
    pub async fn list(&self) -> Vec<Station> {
        let guard = self.inner.read().await;
        guard.stations()
    }

    /// Get the number of known stations.
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// Check if the registry is empty.
    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }

    /// Take a read snapshot usable as a [`crate::domain::StationLookup`].
    pub async fn read(&self) -> RwLockReadGuard<'_, StationDirectory> {
        self.inner.read().await
    }

    /// Refresh station data from the feed.
    ///
    /// Feed entries replace earlier feed entries with the same id. A feed
    /// entry whose id belongs to a locally registered station is skipped
    /// with a warning, so lines never silently change stations. On failure
    /// the existing directory is preserved and the error is returned.
    pub async fn refresh(&self) -> Result<usize, StationError> {
        let client = self.client.as_ref().ok_or(StationError::NoFeed)?;
        let stations = client.fetch_all().await?;

        let mut guard = self.inner.write().await;
        let collisions = guard.merge_feed(stations.into_iter().map(Station::from));
        for id in collisions {
            warn!(%id, "feed station collides with a local station; keeping local");
        }

        Ok(guard.len())
    }
}

impl From<StationDirectory> for StationRegistry {
    /// Wrap an existing directory with no upstream feed.
    fn from(directory: StationDirectory) -> Self {
        Self {
            inner: Arc::new(RwLock::new(directory)),
            client: None,
        }
    }
}

/// Build the id → station directory from feed DTOs.
fn build_directory(stations: Vec<StationDto>) -> StationDirectory {
    stations.into_iter().map(Station::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationLookup;
    use crate::stations::StationClientConfig;
    use axum::{Json, Router, routing::get};
    use serde_json::{Value, json};

    /// Serve `body` at `/stations` on an ephemeral port, returning the base URL.
    async fn serve_feed(body: Value) -> String {
        let app = Router::new().route(
            "/stations",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn registry_with_feed(base_url: &str) -> StationRegistry {
        let client = StationClient::new(StationClientConfig::new(base_url)).unwrap();
        StationRegistry {
            inner: Arc::default(),
            client: Some(client),
        }
    }

    #[test]
    fn build_directory_keeps_last_duplicate() {
        let stations = vec![
            StationDto {
                id: 1,
                name: "Gangnam".to_string(),
            },
            StationDto {
                id: 1,
                name: "Gangnam (renamed)".to_string(),
            },
            StationDto {
                id: 2,
                name: "Yeoksam".to_string(),
            },
        ];

        let directory = build_directory(stations);
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get(StationId(1)).unwrap().name, "Gangnam (renamed)");
    }

    #[tokio::test]
    async fn register_and_get() {
        let registry = StationRegistry::new();
        assert!(registry.is_empty().await);

        let gangnam = registry.register("Gangnam").await.unwrap();
        let yeoksam = registry.register("Yeoksam").await.unwrap();

        assert_eq!(registry.len().await, 2);
        assert_eq!(registry.get(gangnam.id).await, Some(gangnam.clone()));
        assert_eq!(registry.list().await, vec![gangnam, yeoksam]);
        assert_eq!(registry.get(StationId(99)).await, None);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let registry = StationRegistry::new();
        let other = registry.clone();
        registry.register("Gangnam").await.unwrap();
        assert_eq!(other.len().await, 1);
    }

    #[tokio::test]
    async fn read_guard_resolves() {
        let registry = StationRegistry::new();
        let station = registry.register("Gangnam").await.unwrap();

        let guard = registry.read().await;
        assert_eq!(guard.resolve(station.id).unwrap().name, "Gangnam");
    }

    #[tokio::test]
    async fn refresh_without_feed_fails() {
        let registry = StationRegistry::new();
        assert!(matches!(
            registry.refresh().await,
            Err(StationError::NoFeed)
        ));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_directory() {
        let registry = registry_with_feed("http://127.0.0.1:1");
        registry.register("Gangnam").await.unwrap();

        assert!(matches!(
            registry.refresh().await,
            Err(StationError::Http(_))
        ));
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get(StationId(1)).await.unwrap().name, "Gangnam");
    }

    #[tokio::test]
    async fn refresh_merges_feed_without_renaming_local_stations() {
        let url = serve_feed(json!({
            "stations": [
                {"id": 1, "name": "Feed Gangnam"},
                {"id": 2, "name": "Yeoksam"}
            ]
        }))
        .await;
        let registry = registry_with_feed(&url);
        let local = registry.register("Local Jeongja").await.unwrap();
        assert_eq!(local.id, StationId(1));

        assert_eq!(registry.refresh().await.unwrap(), 2);
        assert_eq!(registry.get(StationId(1)).await, Some(local));
        assert_eq!(registry.get(StationId(2)).await.unwrap().name, "Yeoksam");
    }

    #[tokio::test]
    async fn fetch_loads_feed() {
        let url = serve_feed(json!({"stations": [{"id": 7, "name": "Pangyo"}]})).await;
        let client = StationClient::new(StationClientConfig::new(url)).unwrap();

        let registry = StationRegistry::fetch(client).await.unwrap();
        assert_eq!(registry.list().await, vec![Station::new(StationId(7), "Pangyo")]);

        let next = registry.register("Jeongja").await.unwrap();
        assert_eq!(next.id, StationId(8));
    }
}
