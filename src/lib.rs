//! Kickabout - team selection service for amateur football
//!
//! This crate keeps player records, per-coach ratings and weekly availability
//! in an external record store, and splits the available squad between two
//! opponents according to their declared strengths.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rating;
pub mod service;
pub mod store;
pub mod teams;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{ClubError, Result};
pub use types::*;

// Re-export key components
pub use service::{AppState, ClubService};
pub use store::{InMemoryRecordStore, PostgrestStore, RecordStore};
pub use teams::TeamBalancer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
