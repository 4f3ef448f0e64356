//! Section (route segment) types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StationId;

/// Error returned when a distance is not strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid distance: must be greater than zero")]
pub struct InvalidDistance;

/// Distance between the two stations of a section.
///
/// Always greater than zero.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let d = Distance::new(10).unwrap();
/// assert_eq!(d.get(), 10);
///
/// assert!(Distance::new(0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Distance(u32);

impl Distance {
    /// Create a distance, rejecting zero.
    pub fn new(value: u32) -> Result<Self, InvalidDistance> {
        if value == 0 {
            return Err(InvalidDistance);
        }
        Ok(Distance(value))
    }

    /// Returns the distance value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Distance {
    type Error = InvalidDistance;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Distance::new(value)
    }
}

impl From<Distance> for u32 {
    fn from(d: Distance) -> Self {
        d.0
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance({})", self.0)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a section would connect a station to itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid section: up and down station are both {0}")]
pub struct InvalidSection(pub StationId);

/// A directed, distance-weighted edge between two stations.
///
/// Sections are immutable; structural changes to a line replace whole
/// sections rather than editing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    up_station: StationId,
    down_station: StationId,
    distance: Distance,
}

impl Section {
    /// Create a section from `up` to `down`.
    pub fn new(up: StationId, down: StationId, distance: Distance) -> Result<Self, InvalidSection> {
        if up == down {
            return Err(InvalidSection(up));
        }
        Ok(Self {
            up_station: up,
            down_station: down,
            distance,
        })
    }

    pub fn up_station(&self) -> StationId {
        self.up_station
    }

    pub fn down_station(&self) -> StationId {
        self.down_station
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }
}
