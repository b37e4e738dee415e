//! ART (antigen rapid test) rules.
//!
//! A test stays valid for a fixed number of days after it was taken. Only
//! the newest test of each employee matters for site access.

mod latest;
mod types;

pub use latest::latest_per_employee;
pub use types::{ArtEntry, ArtError, ArtRecord, NewArt, DEFAULT_VALIDITY_DAYS};
