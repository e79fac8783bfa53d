//! Output helpers.
//!
//! - series CSV export (`export`)
//! - series and award JSON export (`json`)

pub mod export;
pub mod json;

pub use export::*;
pub use json::*;
