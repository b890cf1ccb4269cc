//! Multi-coach rating aggregation
//!
//! Every coach's latest rating counts once. Each of the five dimensions is
//! averaged first; the ability score is then built from those averages, so it
//! is never an average of per-coach abilities.

use crate::types::{PlayerId, RatingRecord, RatingScores};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-dimension rating averages for one player
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingAverages {
    pub attack_skill: f64,
    pub defense_skill: f64,
    pub passing: f64,
    pub attitude: f64,
    pub teamwork: f64,
}

impl RatingAverages {
    /// Better of attack and defense, plus passing, attitude and teamwork
    pub fn ability(&self) -> f64 {
        self.attack_skill.max(self.defense_skill) + self.passing + self.attitude + self.teamwork
    }

    /// Every dimension rounded to `decimals` places
    pub fn rounded(&self, decimals: i32) -> Self {
        Self {
            attack_skill: round_to(self.attack_skill, decimals),
            defense_skill: round_to(self.defense_skill, decimals),
            passing: round_to(self.passing, decimals),
            attitude: round_to(self.attitude, decimals),
            teamwork: round_to(self.teamwork, decimals),
        }
    }
}

impl From<RatingScores> for RatingAverages {
    fn from(scores: RatingScores) -> Self {
        Self {
            attack_skill: scores.attack_skill as f64,
            defense_skill: scores.defense_skill as f64,
            passing: scores.passing as f64,
            attitude: scores.attitude as f64,
            teamwork: scores.teamwork as f64,
        }
    }
}

/// Aggregated view of a rated player
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityProfile {
    pub player_id: PlayerId,
    pub averages: RatingAverages,
    pub ratings_count: usize,
    pub ability: f64,
}

#[derive(Default)]
struct Totals {
    attack_skill: i64,
    defense_skill: i64,
    passing: i64,
    attitude: i64,
    teamwork: i64,
    count: usize,
}

impl Totals {
    fn add(&mut self, scores: &RatingScores) {
        self.attack_skill += i64::from(scores.attack_skill);
        self.defense_skill += i64::from(scores.defense_skill);
        self.passing += i64::from(scores.passing);
        self.attitude += i64::from(scores.attitude);
        self.teamwork += i64::from(scores.teamwork);
        self.count += 1;
    }

    fn averages(&self) -> RatingAverages {
        let count = self.count.max(1) as f64;
        RatingAverages {
            attack_skill: self.attack_skill as f64 / count,
            defense_skill: self.defense_skill as f64 / count,
            passing: self.passing as f64 / count,
            attitude: self.attitude as f64 / count,
            teamwork: self.teamwork as f64 / count,
        }
    }
}

/// Ability profiles keyed by player id, for players with at least one rating
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilityProfiles {
    profiles: BTreeMap<PlayerId, AbilityProfile>,
}

impl AbilityProfiles {
    /// Group rating rows by player and average each dimension
    pub fn from_ratings(ratings: &[RatingRecord]) -> Self {
        let mut totals: BTreeMap<PlayerId, Totals> = BTreeMap::new();
        for rating in ratings {
            totals.entry(rating.player_id).or_default().add(&rating.scores);
        }

        let profiles = totals
            .into_iter()
            .map(|(player_id, totals)| {
                let averages = totals.averages();
                let profile = AbilityProfile {
                    player_id,
                    averages,
                    ratings_count: totals.count,
                    ability: averages.ability(),
                };
                (player_id, profile)
            })
            .collect();

        Self { profiles }
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&AbilityProfile> {
        self.profiles.get(&player_id)
    }

    /// Ability of a player; unrated players score 0
    pub fn ability(&self, player_id: PlayerId) -> f64 {
        self.get(player_id).map(|profile| profile.ability).unwrap_or(0.0)
    }

    /// Profiles in ascending player id order
    pub fn iter(&self) -> impl Iterator<Item = &AbilityProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
