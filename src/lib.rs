//! `laborstat` library crate.
//!
//! Acquires construction labor-market series (BLS, FRED, USAspending) for a
//! state and date window, normalizes them into one shape, and substitutes a
//! tagged synthetic series whenever live data is unavailable.
//!
//! The binary (`laborstat`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or touching the network
//! - dashboards and other front-ends can embed [`data::AcquisitionService`] directly

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
