//! Line aggregate.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Distance, DomainError, InvalidSection, Section, Sections, StationId, StationLookup};

/// Identifier assigned to a line when it is first stored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub i64);

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, coloured line and its section chain.
///
/// All topology changes go through the owned [`Sections`]; the line only
/// adds identity and display metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    id: Option<LineId>,
    name: String,
    color: String,
    sections: Sections,
}

impl Line {
    /// Create an unsaved line with no name, colour or sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reassemble a stored line.
    pub fn restore(id: LineId, name: String, color: String, sections: Sections) -> Self {
        Self {
            id: Some(id),
            name,
            color,
            sections,
        }
    }

    /// Attach the id assigned by storage.
    pub(crate) fn with_id(mut self, id: LineId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<LineId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Replace name and colour.
    pub fn modify(&mut self, name: impl Into<String>, color: impl Into<String>) {
        self.name = name.into();
        self.color = color.into();
    }

    /// Register a new section at the terminal station.
    ///
    /// Both stations must be known to `stations`. The first section of a
    /// line fixes its start and terminal stations.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UnknownStation`] if either station cannot be resolved
    /// - any error from [`Sections::add`]
    pub fn register_section<L>(
        &mut self,
        stations: &L,
        up: StationId,
        down: StationId,
        distance: Distance,
    ) -> Result<(), LineError>
    where
        L: StationLookup + ?Sized,
    {
        let up = stations.resolve(up)?.id;
        let down = stations.resolve(down)?.id;
        let section = Section::new(up, down, distance)?;
        self.sections.add(section)?;
        Ok(())
    }

    /// Remove the terminal station (and with it the last section).
    pub fn delete_station(&mut self, station: StationId) -> Result<(), DomainError> {
        self.sections.remove_terminal(station).map(|_| ())
    }

    /// Stations visited by the line, in path order.
    pub fn station_ids(&self) -> Vec<StationId> {
        self.sections.station_ids()
    }

    /// Total length of the line.
    pub fn total_distance(&self) -> u64 {
        self.sections.total_distance()
    }
}

/// Errors from registering a section on a line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    InvalidSection(#[from] InvalidSection),
}
