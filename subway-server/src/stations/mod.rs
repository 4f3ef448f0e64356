//! Station registry and upstream feed client.
//!
//! Provides station id → station lookup for line operations. Stations are
//! registered locally or loaded from an optional upstream feed that is
//! refreshed periodically.

mod client;
mod error;
mod registry;

pub use client::{StationClient, StationClientConfig, StationDto};
pub use error::StationError;
pub use registry::StationRegistry;
