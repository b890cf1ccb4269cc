//! Player rating aggregation
//!
//! Turns the per-coach rating rows held by the record store into averaged
//! per-dimension scores and a single ability figure per player.

pub mod aggregator;

pub use aggregator::{AbilityProfile, AbilityProfiles, RatingAverages};
