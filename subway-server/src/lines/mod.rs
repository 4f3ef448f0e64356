//! Line storage and use cases.
//!
//! The repository plays the persistence role (id assignment, cascading
//! deletion of sections); the service composes it with the station
//! registry to run one domain operation per call.

mod repository;
mod service;

pub use repository::{LineRecord, LineRepository, RepositoryError, SectionRecord};
pub use service::{LineService, LineServiceError, NewLine};
