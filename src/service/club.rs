//! Club service: one operation per API endpoint
//!
//! Owns the control flow between the record store, the rating aggregator and
//! the team balancer, and translates store failures into [`ClubError`]s.
//! "Nothing to do" outcomes (no available players, no ratings) are returned as
//! informational messages rather than errors.

use crate::config::BalancerConfig;
use crate::error::ClubError;
use crate::metrics::MetricsCollector;
use crate::rating::{AbilityProfiles, RatingAverages};
use crate::store::{RecordStore, StoreError};
use crate::teams::{BalancedTeams, Roster, TeamBalancer};
use crate::types::{
    Availability, AvailabilityUpdate, NewPlayer, Player, Position, RatingRecord,
    RatingSubmission, TeamSelectionRequest, UpsertOutcome,
};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

pub const NO_AVAILABLE_PLAYERS: &str = "Not enough available players";
pub const NO_PLAYER_DATA: &str = "No player data available";
pub const NO_RATINGS: &str = "No ratings available";
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown Player";

/// Plain informational reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAdded {
    pub message: String,
    pub player: Player,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSaved {
    pub message: String,
    pub data: RatingRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySaved {
    pub message: String,
    pub data: Availability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAvailability {
    pub player_name: String,
    pub available: bool,
}

/// Averaged ratings of one rated player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageRating {
    #[serde(flatten)]
    pub averages: RatingAverages,
    pub name: String,
    pub overall_ability: f64,
}

/// Projection of a selected player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub position: Position,
    pub goalkeeper: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSheet {
    pub players: Vec<TeamMember>,
    pub average_ability: f64,
}

impl From<&Roster> for TeamSheet {
    fn from(roster: &Roster) -> Self {
        Self {
            players: roster
                .players
                .iter()
                .map(|ranked| TeamMember {
                    name: ranked.player.name.clone(),
                    position: ranked.player.position,
                    goalkeeper: ranked.player.goalkeeper,
                })
                .collect(),
            average_ability: round_to(roster.average_ability(), 2),
        }
    }
}

/// Team sheets keyed by opponent name, kept in request order
///
/// Serialized as a JSON object whose first key is opponent 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSheets(Vec<(String, TeamSheet)>);

impl TeamSheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, replacing any existing sheet for the same opponent
    pub fn insert(&mut self, name: impl Into<String>, sheet: TeamSheet) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = sheet,
            None => self.0.push((name, sheet)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TeamSheet> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, sheet)| sheet)
    }

    /// Opponent names in request order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TeamSheet)> {
        self.0.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TeamSheets {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, sheet) in &self.0 {
            map.serialize_entry(name, sheet)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TeamSheets {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SheetsVisitor;

        impl<'de> serde::de::Visitor<'de> for SheetsVisitor {
            type Value = TeamSheets;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of opponent names to team sheets")
            }

            fn visit_map<A>(self, mut access: A) -> Result<TeamSheets, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut sheets = TeamSheets::new();
                while let Some((name, sheet)) = access.next_entry::<String, TeamSheet>()? {
                    sheets.insert(name, sheet);
                }
                Ok(sheets)
            }
        }

        deserializer.deserialize_map(SheetsVisitor)
    }
}

/// Both team sheets of a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedTeams {
    pub teams: TeamSheets,
}

/// Either two team sheets or a message explaining why there are none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionOutcome {
    Teams(SelectedTeams),
    Insufficient(MessageResponse),
}

/// Business operations behind the HTTP API
#[derive(Clone)]
pub struct ClubService {
    store: Arc<dyn RecordStore>,
    balancer: TeamBalancer,
    metrics: Arc<MetricsCollector>,
}

impl ClubService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        balancer_config: BalancerConfig,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            store,
            balancer: TeamBalancer::new(balancer_config),
            metrics,
        }
    }

    fn store_error(&self, operation: &str, context: &str, err: StoreError) -> ClubError {
        error!("{} failed: {}", operation, err);
        self.metrics.record_store_error(operation);
        ClubError::store(context, err)
    }

    /// Resolve a player name, failing with NotFound when it does not exist
    async fn lookup_player(
        &self,
        name: &str,
        operation: &str,
        context: &str,
    ) -> Result<Player, ClubError> {
        self.store
            .find_player_by_name(name)
            .await
            .map_err(|e| self.store_error(operation, context, e))?
            .ok_or_else(|| ClubError::PlayerNotFound {
                name: name.to_string(),
            })
    }

    pub async fn list_players(&self) -> Result<Vec<Player>, ClubError> {
        self.store
            .list_players()
            .await
            .map_err(|e| self.store_error("list_players", "Error fetching players", e))
    }

    pub async fn register_player(&self, player: NewPlayer) -> Result<PlayerAdded, ClubError> {
        let player = self
            .store
            .insert_player(player)
            .await
            .map_err(|e| self.store_error("register_player", "Error adding player", e))?;

        info!("Registered player '{}' with id {}", player.name, player.id);
        Ok(PlayerAdded {
            message: "Player added successfully".to_string(),
            player,
        })
    }

    pub async fn submit_rating(
        &self,
        player_name: &str,
        rating: RatingSubmission,
    ) -> Result<RatingSaved, ClubError> {
        const CONTEXT: &str = "Error adding/updating rating";

        let player = self.lookup_player(player_name, "submit_rating", CONTEXT).await?;
        let coach = rating.coach.clone();

        let (outcome, record) = self
            .store
            .upsert_rating(player.id, rating)
            .await
            .map_err(|e| self.store_error("submit_rating", CONTEXT, e))?;

        let verb = match outcome {
            UpsertOutcome::Inserted => "added",
            UpsertOutcome::Updated => "updated",
        };
        info!("Rating {} for '{}' by {}", verb, player_name, coach);

        Ok(RatingSaved {
            message: format!("Rating {} for '{}' by {}", verb, player_name, coach),
            data: record,
        })
    }

    pub async fn set_availability(
        &self,
        player_name: &str,
        update: AvailabilityUpdate,
    ) -> Result<AvailabilitySaved, ClubError> {
        const CONTEXT: &str = "Error updating availability";

        let player = self
            .lookup_player(player_name, "set_availability", CONTEXT)
            .await?;

        let data = self
            .store
            .upsert_availability(Availability {
                player_id: player.id,
                available: update.available,
            })
            .await
            .map_err(|e| self.store_error("set_availability", CONTEXT, e))?;

        info!(
            "Availability for '{}' set to {}",
            player_name, update.available
        );
        Ok(AvailabilitySaved {
            message: format!("Availability updated for {}", player_name),
            data,
        })
    }

    pub async fn get_availability(
        &self,
        player_name: &str,
    ) -> Result<PlayerAvailability, ClubError> {
        const CONTEXT: &str = "Error fetching availability";

        let player = self
            .lookup_player(player_name, "get_availability", CONTEXT)
            .await?;

        let record = self
            .store
            .availability_for(player.id)
            .await
            .map_err(|e| self.store_error("get_availability", CONTEXT, e))?;

        Ok(PlayerAvailability {
            player_name: player_name.to_string(),
            available: record.map(|r| r.available).unwrap_or(false),
        })
    }

    /// Averaged ratings for every rated player, in player id order
    pub async fn average_ratings(&self) -> Result<Vec<AverageRating>, ClubError> {
        const CONTEXT: &str = "Error fetching average ratings";

        let ratings = self
            .store
            .all_ratings()
            .await
            .map_err(|e| self.store_error("average_ratings", CONTEXT, e))?;

        if ratings.is_empty() {
            debug!("No ratings recorded yet");
            return Ok(Vec::new());
        }

        let names: HashMap<_, _> = self
            .store
            .list_players()
            .await
            .map_err(|e| self.store_error("average_ratings", CONTEXT, e))?
            .into_iter()
            .map(|player| (player.id, player.name))
            .collect();

        let profiles = AbilityProfiles::from_ratings(&ratings);
        Ok(profiles
            .iter()
            .map(|profile| AverageRating {
                averages: profile.averages.rounded(1),
                name: names
                    .get(&profile.player_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string()),
                overall_ability: round_to(profile.ability, 2),
            })
            .collect())
    }

    /// Split the available players between the two opponents
    pub async fn select_teams(
        &self,
        request: TeamSelectionRequest,
    ) -> Result<SelectionOutcome, ClubError> {
        if request.opponent_1_name == request.opponent_2_name {
            return Err(ClubError::InvalidRequest {
                reason: "opponent names must differ".to_string(),
            });
        }

        let timer = self.metrics.start_timer();
        let selection_failed = |e: StoreError| {
            self.metrics.record_store_error("select_teams");
            ClubError::SelectionFailed { source: e }
        };

        let available_ids = self
            .store
            .available_player_ids()
            .await
            .map_err(selection_failed)?;
        if available_ids.is_empty() {
            return Ok(self.skip_selection("no_available_players", NO_AVAILABLE_PLAYERS));
        }

        let players = self
            .store
            .players_by_ids(&available_ids)
            .await
            .map_err(selection_failed)?;
        if players.is_empty() {
            return Ok(self.skip_selection("no_player_data", NO_PLAYER_DATA));
        }

        let ratings = self
            .store
            .ratings_for_players(&available_ids)
            .await
            .map_err(selection_failed)?;
        if ratings.is_empty() {
            return Ok(self.skip_selection("no_ratings", NO_RATINGS));
        }

        let profiles = AbilityProfiles::from_ratings(&ratings);
        let ranked = self.balancer.rank(players, &profiles);
        let pool_size = ranked.len();

        let BalancedTeams {
            strategy,
            team_one,
            team_two,
        } = self.balancer.balance(
            ranked,
            request.opponent_1_strength,
            request.opponent_2_strength,
        );

        info!(
            "Selected teams with {} strategy: '{}' gets {} players, '{}' gets {}",
            strategy,
            request.opponent_1_name,
            team_one.len(),
            request.opponent_2_name,
            team_two.len()
        );
        self.metrics
            .record_team_selection(strategy.label(), pool_size, timer.stop());

        let mut teams = TeamSheets::new();
        teams.insert(request.opponent_1_name, TeamSheet::from(&team_one));
        teams.insert(request.opponent_2_name, TeamSheet::from(&team_two));

        Ok(SelectionOutcome::Teams(SelectedTeams { teams }))
    }

    fn skip_selection(&self, reason: &str, message: &str) -> SelectionOutcome {
        info!("Team selection skipped: {}", message);
        self.metrics.record_selection_skipped(reason);
        SelectionOutcome::Insufficient(MessageResponse::new(message))
    }
}
