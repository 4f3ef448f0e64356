//! In-memory line storage.
//!
//! Lines are stored as flat records, the way a relational store would keep
//! them: one row per line and one row per section, with no ordering
//! guarantee on the section rows. Loading a line rebuilds its section chain
//! and rejects rows that do not form a single path.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::{Distance, DomainError, Line, LineId, Section, Sections, StationId};

/// Errors from line storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No line is stored under this id
    #[error("line {0} does not exist")]
    NotFound(LineId),

    /// Stored rows do not describe a valid line
    #[error("stored line {id} is corrupted: {source}")]
    Corrupted { id: LineId, source: DomainError },
}

/// Stored section row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u32,
}

/// Stored line row with its section rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub sections: Vec<SectionRecord>,
}

impl LineRecord {
    fn from_line(id: LineId, line: &Line) -> Self {
        Self {
            id,
            name: line.name().to_string(),
            color: line.color().to_string(),
            sections: line
                .sections()
                .iter()
                .map(|s| SectionRecord {
                    up_station_id: s.up_station(),
                    down_station_id: s.down_station(),
                    distance: s.distance().get(),
                })
                .collect(),
        }
    }

    fn to_line(&self) -> Result<Line, RepositoryError> {
        let corrupted = |source| RepositoryError::Corrupted {
            id: self.id,
            source,
        };

        let sections = self
            .sections
            .iter()
            .map(|row| {
                let distance = Distance::new(row.distance)
                    .map_err(|_| DomainError::MalformedChain("non-positive distance"))?;
                Section::new(row.up_station_id, row.down_station_id, distance)
                    .map_err(|_| DomainError::MalformedChain("section loops on one station"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupted)?;

        let sections = Sections::restore(sections).map_err(corrupted)?;
        Ok(Line::restore(
            self.id,
            self.name.clone(),
            self.color.clone(),
            sections,
        ))
    }
}

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    lines: BTreeMap<LineId, LineRecord>,
}

/// Shared in-memory line repository.
///
/// Ids are assigned on first save. [`LineRepository::update`] holds the
/// write lock for the whole load-modify-store cycle, so two edits of the
/// same line never interleave.
#[derive(Debug, Clone, Default)]
pub struct LineRepository {
    inner: Arc<RwLock<Store>>,
}

impl LineRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new line, assigning it the next id.
    pub async fn insert(&self, line: Line) -> Line {
        let mut store = self.inner.write().await;
        store.last_id += 1;
        let id = LineId(store.last_id);
        store.lines.insert(id, LineRecord::from_line(id, &line));
        line.with_id(id)
    }

    /// Load a line by id.
    pub async fn find(&self, id: LineId) -> Result<Line, RepositoryError> {
        let store = self.inner.read().await;
        store
            .lines
            .get(&id)
            .ok_or(RepositoryError::NotFound(id))?
            .to_line()
    }

    /// Load every line, ordered by id.
    pub async fn find_all(&self) -> Result<Vec<Line>, RepositoryError> {
        let store = self.inner.read().await;
        store.lines.values().map(LineRecord::to_line).collect()
    }

    /// Apply `f` to a stored line and save the result.
    ///
    /// Nothing is written if `f` fails.
    pub async fn update<F, E>(&self, id: LineId, f: F) -> Result<Line, E>
    where
        F: FnOnce(&mut Line) -> Result<(), E>,
        E: From<RepositoryError>,
    {
        let mut store = self.inner.write().await;
        let mut line = store
            .lines
            .get(&id)
            .ok_or(RepositoryError::NotFound(id))?
            .to_line()?;

        f(&mut line)?;

        store.lines.insert(id, LineRecord::from_line(id, &line));
        Ok(line)
    }

    /// Delete a line and its sections. Returns false if it did not exist.
    pub async fn delete(&self, id: LineId) -> bool {
        let mut store = self.inner.write().await;
        store.lines.remove(&id).is_some()
    }

    /// Returns the number of stored lines.
    pub async fn len(&self) -> usize {
        self.inner.read().await.lines.len()
    }

    /// Returns true if no lines are stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.lines.is_empty()
    }

    /// Store raw rows, replacing any line with the same id.
    pub async fn import(&self, record: LineRecord) {
        let mut store = self.inner.write().await;
        store.last_id = store.last_id.max(record.id.0);
        store.lines.insert(record.id, record);
    }
}
