//! Common types used throughout the team selection service

use serde::{Deserialize, Serialize};

/// Store-assigned player identifier
pub type PlayerId = i64;

/// Outfield position a player registers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Midfielder,
    Forward,
    Defender,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Midfielder => write!(f, "midfielder"),
            Position::Forward => write!(f, "forward"),
            Position::Defender => write!(f, "defender"),
        }
    }
}

/// Preferred kicking foot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Foot {
    Left,
    Right,
    Both,
}

/// Registration payload for a new player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub position: Position,
    pub foot: Foot,
    pub goalkeeper: bool,
}

/// A player as held by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    pub foot: Foot,
    pub goalkeeper: bool,
}

impl Player {
    pub fn from_new(id: PlayerId, new_player: NewPlayer) -> Self {
        Self {
            id,
            name: new_player.name,
            position: new_player.position,
            foot: new_player.foot,
            goalkeeper: new_player.goalkeeper,
        }
    }
}

/// The five scores a coach gives a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScores {
    pub attack_skill: i32,
    pub defense_skill: i32,
    pub passing: i32,
    pub attitude: i32,
    pub teamwork: i32,
}

/// Rating submitted by a coach for a named player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub coach: String,
    #[serde(flatten)]
    pub scores: RatingScores,
}

/// Stored rating row, unique per (player, coach)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub player_id: PlayerId,
    pub coach: String,
    #[serde(flatten)]
    pub scores: RatingScores,
}

/// Whether a rating upsert created a new row or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Stored availability row, at most one per player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub player_id: PlayerId,
    pub available: bool,
}

/// Body of an availability update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub available: bool,
}

/// Request to split the available players between two opponents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSelectionRequest {
    pub opponent_1_name: String,
    pub opponent_2_name: String,
    pub opponent_1_strength: i64,
    pub opponent_2_strength: i64,
}
