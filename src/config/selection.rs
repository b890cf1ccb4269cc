//! Team selection configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Thresholds that drive the team balancer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Strength gap at or above which the stronger side takes the whole top half
    pub lopsided_gap: u64,
    /// Percentage of the top half team one receives on a one-point gap
    pub top_share_percent: usize,
    /// Percentage of the bottom half team one receives on a one-point gap
    pub bottom_share_percent: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            lopsided_gap: 2,
            top_share_percent: 66,
            bottom_share_percent: 33,
        }
    }
}

impl BalancerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lopsided_gap < 2 {
            return Err(anyhow!(
                "Lopsided strength gap must be at least 2, got {}",
                self.lopsided_gap
            ));
        }
        if self.top_share_percent > 100 || self.bottom_share_percent > 100 {
            return Err(anyhow!("Selection shares must be percentages (0-100)"));
        }
        Ok(())
    }
}
