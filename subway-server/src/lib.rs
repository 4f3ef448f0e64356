//! Subway line management server.
//!
//! Keeps each line's sections as a single chain of stations that can only
//! grow or shrink at its terminal station, and serves lines and stations
//! over a JSON HTTP API.

pub mod config;
pub mod domain;
pub mod lines;
pub mod stations;
pub mod web;
