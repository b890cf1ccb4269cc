//! Team balancing between two declared opponents
//!
//! Players are ranked by ability (ties broken by ascending player id) and
//! split according to how far apart the two declared strengths are:
//! - gap of at least `lopsided_gap`: the stronger side takes the top half
//! - gap of one: team one takes most of the top half and a little of the bottom
//! - no gap: players alternate down the ranking
//!
//! Every ranked player ends up in exactly one roster.

use crate::config::BalancerConfig;
use crate::rating::AbilityProfiles;
use crate::types::Player;
use crate::utils::strength_gap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One of the two opponents in a selection request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    One,
    Two,
}

/// Partitioning policy chosen from the strength gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionStrategy {
    Lopsided { stronger: Side },
    MildSkew,
    Even,
}

impl SelectionStrategy {
    /// Pick the policy for two declared strengths
    pub fn for_strengths(strength1: i64, strength2: i64, config: &BalancerConfig) -> Self {
        let gap = strength_gap(strength1, strength2);

        if gap >= config.lopsided_gap {
            let stronger = if strength1 > strength2 {
                Side::One
            } else {
                Side::Two
            };
            SelectionStrategy::Lopsided { stronger }
        } else if gap > 0 {
            SelectionStrategy::MildSkew
        } else {
            SelectionStrategy::Even
        }
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            SelectionStrategy::Lopsided { .. } => "lopsided",
            SelectionStrategy::MildSkew => "mild_skew",
            SelectionStrategy::Even => "even",
        }
    }
}

impl std::fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A player annotated with their ability score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub player: Player,
    pub ability: f64,
}

/// Orders by ability descending, then player id ascending
fn ranking_order(a: &RankedPlayer, b: &RankedPlayer) -> Ordering {
    b.ability
        .total_cmp(&a.ability)
        .then_with(|| a.player.id.cmp(&b.player.id))
}

/// One side's selected players
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub players: Vec<RankedPlayer>,
}

impl Roster {
    /// Mean ability of the roster, 0 when empty
    pub fn average_ability(&self) -> f64 {
        if self.players.is_empty() {
            return 0.0;
        }
        self.players.iter().map(|p| p.ability).sum::<f64>() / self.players.len() as f64
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Result of a balancing run
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedTeams {
    pub strategy: SelectionStrategy,
    pub team_one: Roster,
    pub team_two: Roster,
}

/// Splits ranked players into two rosters
#[derive(Debug, Clone, Default)]
pub struct TeamBalancer {
    config: BalancerConfig,
}

impl TeamBalancer {
    pub fn new(config: BalancerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    /// Annotate players with their aggregated ability and sort them
    pub fn rank(&self, players: Vec<Player>, profiles: &AbilityProfiles) -> Vec<RankedPlayer> {
        let mut ranked: Vec<RankedPlayer> = players
            .into_iter()
            .map(|player| {
                let ability = profiles.ability(player.id);
                RankedPlayer { player, ability }
            })
            .collect();
        ranked.sort_by(ranking_order);
        ranked
    }

    /// Partition players between the two opponents
    pub fn balance(
        &self,
        mut players: Vec<RankedPlayer>,
        strength1: i64,
        strength2: i64,
    ) -> BalancedTeams {
        players.sort_by(ranking_order);

        let strategy = SelectionStrategy::for_strengths(strength1, strength2, &self.config);
        let half = players.len() / 2;

        let (team_one, team_two) = match strategy {
            SelectionStrategy::Lopsided { stronger } => {
                let rest = players.split_off(half);
                match stronger {
                    Side::One => (players, rest),
                    Side::Two => (rest, players),
                }
            }
            SelectionStrategy::MildSkew => self.skewed_split(players, half),
            SelectionStrategy::Even => {
                let (one, two): (Vec<_>, Vec<_>) = players
                    .into_iter()
                    .enumerate()
                    .partition(|(index, _)| index % 2 == 0);
                (
                    one.into_iter().map(|(_, p)| p).collect(),
                    two.into_iter().map(|(_, p)| p).collect(),
                )
            }
        };

        BalancedTeams {
            strategy,
            team_one: Roster { players: team_one },
            team_two: Roster { players: team_two },
        }
    }

    /// Team one gets the leading share of each half, team two the remainder.
    /// Both shares are counts truncated towards zero.
    fn skewed_split(
        &self,
        mut players: Vec<RankedPlayer>,
        half: usize,
    ) -> (Vec<RankedPlayer>, Vec<RankedPlayer>) {
        let top_to_one = half * self.config.top_share_percent / 100;
        let bottom_to_one = half * self.config.bottom_share_percent / 100;

        let mut bottom = players.split_off(half);
        let top_rest = players.split_off(top_to_one);
        let bottom_rest = bottom.split_off(bottom_to_one);

        let mut team_one = players;
        team_one.extend(bottom);

        let mut team_two = top_rest;
        team_two.extend(bottom_rest);

        (team_one, team_two)
    }
}
