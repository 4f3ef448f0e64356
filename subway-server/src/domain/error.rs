//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from API/IO errors.

use super::StationId;

/// Domain-level errors for section chain maintenance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// New section does not start at the line's current terminal
    #[error("section must start at terminal station {terminal}, not {up}")]
    DiscontinuousSection { terminal: StationId, up: StationId },

    /// New section's down station is already on the line
    #[error("station {0} is already registered on this line")]
    DuplicateStation(StationId),

    /// Line has a single section left and cannot be shortened
    #[error("a line must keep at least one section")]
    MinimumSections,

    /// Only the terminal station can be removed
    #[error("only terminal station {terminal} can be removed, not {requested}")]
    NotTerminalStation {
        terminal: StationId,
        requested: StationId,
    },

    /// Station id is not known to the station registry
    #[error("station {0} does not exist")]
    UnknownStation(StationId),

    /// Stored sections do not form a single simple path
    #[error("malformed section chain: {0}")]
    MalformedChain(&'static str),
}

impl DomainError {
    /// Returns true if this error signals corrupted data rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, DomainError::MalformedChain(_))
    }
}
