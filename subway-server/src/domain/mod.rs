//! Domain types for the subway line manager.
//!
//! This module contains the core domain model: stations, sections, the
//! section chain of a line, and the line aggregate itself. All types enforce
//! their invariants at construction or mutation time, and none of them
//! perform I/O.

mod error;
mod line;
mod section;
mod sections;
mod station;

pub use error::DomainError;
pub use line::{Line, LineError, LineId};
pub use section::{Distance, InvalidDistance, InvalidSection, Section};
pub use sections::Sections;
pub use station::{Station, StationDirectory, StationId, StationIdsExhausted, StationLookup};
