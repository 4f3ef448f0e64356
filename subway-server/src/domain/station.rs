//! Station identity types.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Opaque station identifier assigned by the station registry.
///
/// The section chain only ever needs identity and equality, so this is a
/// plain integer newtype.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub i64);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A station known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Resolves station identifiers to validated stations.
///
/// Lines use this to check that both ends of a new section exist before
/// the section is built.
pub trait StationLookup {
    /// Resolve a station id, failing with [`DomainError::UnknownStation`].
    fn resolve(&self, id: StationId) -> Result<&Station, DomainError>;
}

/// Error returned when no id above the current maximum is left.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("station id space exhausted")]
pub struct StationIdsExhausted;

/// In-memory id → station map.
///
/// Tracks which stations were registered locally so a feed merge never
/// renames them.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    stations: HashMap<StationId, Station>,
    local: HashSet<StationId>,
}

impl StationDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a station.
    pub fn insert(&mut self, station: Station) {
        self.stations.insert(station.id, station);
    }

    /// Register a local station under the id after the current maximum.
    pub fn register(&mut self, name: impl Into<String>) -> Result<Station, StationIdsExhausted> {
        let max = self.stations.keys().map(|id| id.0).max().unwrap_or(0);
        let next = max.checked_add(1).ok_or(StationIdsExhausted)?;
        let station = Station::new(StationId(next), name);
        self.local.insert(station.id);
        self.insert(station.clone());
        Ok(station)
    }

    /// Merge feed stations, replacing earlier feed entries with the same id.
    ///
    /// Ids already taken by a locally registered station are left alone and
    /// returned so the caller can report the collision.
    pub fn merge_feed(&mut self, stations: impl IntoIterator<Item = Station>) -> Vec<StationId> {
        let mut collisions = Vec::new();
        for station in stations {
            if self.local.contains(&station.id) {
                collisions.push(station.id);
            } else {
                self.insert(station);
            }
        }
        collisions
    }

    /// Returns true if the station was registered locally rather than fed.
    pub fn is_local(&self, id: StationId) -> bool {
        self.local.contains(&id)
    }

    /// Look up a station by id.
    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    /// All stations, ordered by id.
    pub fn stations(&self) -> Vec<Station> {
        let mut all: Vec<Station> = self.stations.values().cloned().collect();
        all.sort_by_key(|s| s.id);
        all
    }

    /// Returns the number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if there are no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationLookup for StationDirectory {
    fn resolve(&self, id: StationId) -> Result<&Station, DomainError> {
        self.get(id).ok_or(DomainError::UnknownStation(id))
    }
}

impl FromIterator<Station> for StationDirectory {
    fn from_iter<I: IntoIterator<Item = Station>>(iter: I) -> Self {
        let mut directory = Self::new();
        for station in iter {
            directory.insert(station);
        }
        directory
    }
}
