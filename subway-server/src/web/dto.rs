//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, LineId, Station, StationDirectory, StationId};

/// Longest accepted line name or colour.
pub const MAX_LABEL_LEN: usize = 20;

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    /// Station name
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
        }
    }
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u32,
}

/// Request to rename a line.
#[derive(Debug, Deserialize)]
pub struct ModifyLineRequest {
    pub name: String,
    pub color: String,
}

/// Request to append a section to a line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u32,
}

/// Query for removing a line's terminal station.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSectionQuery {
    pub station_id: StationId,
}

/// A line in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResponse {
    /// Line id (always present for stored lines)
    pub id: Option<LineId>,

    pub name: String,

    pub color: String,

    /// Total length of all sections
    pub distance: u64,

    /// Stations in travel order
    pub stations: Vec<StationResponse>,
}

impl LineResponse {
    /// Create from a domain line, naming stations from `directory`.
    pub fn from_line(line: &Line, directory: &StationDirectory) -> Self {
        let stations = line
            .station_ids()
            .into_iter()
            .map(|id| StationResponse {
                id,
                name: directory
                    .get(id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            id: line.id(),
            name: line.name().to_string(),
            color: line.color().to_string(),
            distance: line.total_distance(),
            stations,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Check a line name or colour: non-blank and at most [`MAX_LABEL_LEN`] characters.
pub fn validate_label(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be blank"));
    }
    if value.chars().count() > MAX_LABEL_LEN {
        return Err(format!(
            "{field} must be at most {MAX_LABEL_LEN} characters"
        ));
    }
    Ok(())
}
