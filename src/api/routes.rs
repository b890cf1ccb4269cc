//! Request handlers for the team selection API
//!
//! Handlers only extract request data and delegate to [`ClubService`]; all
//! failures come back as [`ClubError`], which renders its own response.
//!
//! [`ClubService`]: crate::service::ClubService

use crate::error::ClubError;
use crate::service::club::{
    AvailabilitySaved, AverageRating, MessageResponse, PlayerAdded, PlayerAvailability,
    RatingSaved, SelectionOutcome,
};
use crate::service::AppState;
use crate::types::{AvailabilityUpdate, NewPlayer, Player, RatingSubmission, TeamSelectionRequest};
use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;
use tracing::debug;

pub const ROOT_MESSAGE: &str = "Football Team API is running!";

// GET / - Liveness message
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(ROOT_MESSAGE))
}

// GET /players - List all players
pub async fn list_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Player>>, ClubError> {
    let players = state.club().list_players().await?;
    debug!("Listing {} players", players.len());
    Ok(Json(players))
}

// POST /players - Register a player
pub async fn add_player(
    State(state): State<Arc<AppState>>,
    Json(player): Json<NewPlayer>,
) -> Result<Json<PlayerAdded>, ClubError> {
    Ok(Json(state.club().register_player(player).await?))
}

// POST /players/{player_name}/ratings - Add or replace a coach's rating
pub async fn rate_player(
    State(state): State<Arc<AppState>>,
    Path(player_name): Path<String>,
    Json(rating): Json<RatingSubmission>,
) -> Result<Json<RatingSaved>, ClubError> {
    Ok(Json(state.club().submit_rating(&player_name, rating).await?))
}

// PUT /players/{player_name}/availability - Set availability
pub async fn set_availability(
    State(state): State<Arc<AppState>>,
    Path(player_name): Path<String>,
    Json(update): Json<AvailabilityUpdate>,
) -> Result<Json<AvailabilitySaved>, ClubError> {
    Ok(Json(
        state.club().set_availability(&player_name, update).await?,
    ))
}

// GET /players/{player_name}/availability - Read availability
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(player_name): Path<String>,
) -> Result<Json<PlayerAvailability>, ClubError> {
    Ok(Json(state.club().get_availability(&player_name).await?))
}

// GET /average_ratings - Averaged ratings per rated player
pub async fn average_ratings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AverageRating>>, ClubError> {
    Ok(Json(state.club().average_ratings().await?))
}

// POST /select_teams - Split available players between two opponents
pub async fn select_teams(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TeamSelectionRequest>,
) -> Result<Json<SelectionOutcome>, ClubError> {
    debug!(
        "Selecting teams for '{}' ({}) vs '{}' ({})",
        request.opponent_1_name,
        request.opponent_1_strength,
        request.opponent_2_name,
        request.opponent_2_strength
    );
    Ok(Json(state.club().select_teams(request).await?))
}
