//! Line use cases.
//!
//! Each operation loads one line, applies a single domain mutation and
//! stores the result. Station ids are resolved against a registry snapshot
//! taken before the line is locked.

use tracing::{debug, info, warn};

use crate::domain::{
    Distance, DomainError, InvalidSection, Line, LineError, LineId, StationId,
};
use crate::stations::StationRegistry;

use super::repository::{LineRepository, RepositoryError};

/// Errors from line operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineServiceError {
    /// No line with this id
    #[error("line {0} does not exist")]
    LineNotFound(LineId),

    /// Section chain or station lookup rejected the change
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Section would connect a station to itself
    #[error(transparent)]
    InvalidSection(#[from] InvalidSection),

    /// Stored line data is corrupted
    #[error("stored line {id} is corrupted: {source}")]
    Corrupted { id: LineId, source: DomainError },
}

impl From<LineError> for LineServiceError {
    fn from(e: LineError) -> Self {
        match e {
            LineError::Domain(e) => LineServiceError::Domain(e),
            LineError::InvalidSection(e) => LineServiceError::InvalidSection(e),
        }
    }
}

impl From<RepositoryError> for LineServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(id) => LineServiceError::LineNotFound(id),
            RepositoryError::Corrupted { id, source } => {
                LineServiceError::Corrupted { id, source }
            }
        }
    }
}

/// Request to create a line together with its first section.
#[derive(Debug, Clone)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub up_station: StationId,
    pub down_station: StationId,
    pub distance: Distance,
}

/// Line management service.
#[derive(Clone, Default)]
pub struct LineService {
    lines: LineRepository,
    stations: StationRegistry,
}

impl LineService {
    /// Create a service over the given storage and station registry.
    pub fn new(lines: LineRepository, stations: StationRegistry) -> Self {
        Self { lines, stations }
    }

    /// The station registry used to resolve section endpoints.
    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    /// Create a line with its first section.
    ///
    /// Nothing is stored if the section is rejected.
    pub async fn create_line(&self, request: NewLine) -> Result<Line, LineServiceError> {
        let mut line = Line::new();
        line.modify(request.name, request.color);
        {
            let stations = self.stations.read().await;
            line.register_section(
                &*stations,
                request.up_station,
                request.down_station,
                request.distance,
            )?;
        }

        let line = self.lines.insert(line).await;
        info!(
            id = ?line.id(),
            name = line.name(),
            "created line"
        );
        Ok(line)
    }

    /// All lines, ordered by id.
    pub async fn find_all_lines(&self) -> Result<Vec<Line>, LineServiceError> {
        self.lines.find_all().await.map_err(|e| {
            warn!(error = %e, "failed to load lines");
            LineServiceError::from(e)
        })
    }

    /// A single line.
    pub async fn find_line(&self, id: LineId) -> Result<Line, LineServiceError> {
        Ok(self.lines.find(id).await?)
    }

    /// Rename and recolour a line.
    pub async fn modify_line(
        &self,
        id: LineId,
        name: String,
        color: String,
    ) -> Result<Line, LineServiceError> {
        let line = self
            .lines
            .update(id, |line| {
                line.modify(name, color);
                Ok::<_, LineServiceError>(())
            })
            .await?;
        debug!(%id, name = line.name(), color = line.color(), "modified line");
        Ok(line)
    }

    /// Delete a line and all of its sections.
    pub async fn delete_line(&self, id: LineId) -> Result<(), LineServiceError> {
        if !self.lines.delete(id).await {
            return Err(LineServiceError::LineNotFound(id));
        }
        info!(%id, "deleted line");
        Ok(())
    }

    /// Append a section at the line's terminal station.
    pub async fn register_section(
        &self,
        id: LineId,
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<Line, LineServiceError> {
        let stations = self.stations.read().await;
        let line = self
            .lines
            .update(id, |line| {
                line.register_section(&*stations, up, down, distance)
                    .map_err(LineServiceError::from)
            })
            .await?;
        debug!(%id, %up, %down, %distance, "registered section");
        Ok(line)
    }

    /// Remove the line's terminal station.
    pub async fn delete_section(
        &self,
        id: LineId,
        station: StationId,
    ) -> Result<Line, LineServiceError> {
        let line = self
            .lines
            .update(id, |line| {
                line.delete_station(station)
                    .map_err(LineServiceError::from)
            })
            .await?;
        debug!(%id, %station, "deleted terminal station");
        Ok(line)
    }
}
