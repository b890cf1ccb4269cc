//! Utility functions for the team selection service

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round a value to the given number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Absolute gap between two declared opponent strengths
pub fn strength_gap(strength1: i64, strength2: i64) -> u64 {
    strength1.abs_diff(strength2)
}
