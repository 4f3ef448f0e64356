//! Application state for the web layer.

use std::sync::Arc;

use crate::lines::LineService;
use crate::stations::StationRegistry;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Line use cases
    pub lines: Arc<LineService>,

    /// Station registry (shared with `lines`)
    pub stations: StationRegistry,
}

impl AppState {
    /// Create a new app state.
    pub fn new(lines: LineService) -> Self {
        let stations = lines.stations().clone();
        Self {
            lines: Arc::new(lines),
            stations,
        }
    }
}
