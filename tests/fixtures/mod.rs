//! Test fixtures and store implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use kickabout::config::{AppConfig, StoreSettings};
use kickabout::service::AppState;
use kickabout::store::{InMemoryRecordStore, RecordStore, StoreError, StoreResult};
use kickabout::types::{
    Availability, Foot, NewPlayer, Player, PlayerId, Position, RatingRecord, RatingScores,
    RatingSubmission, UpsertOutcome,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Configuration pointing at a store that is never contacted
pub fn test_config() -> AppConfig {
    AppConfig::with_store(StoreSettings::new("http://localhost:54321", "test-key"))
}

pub fn test_state(store: Arc<dyn RecordStore>) -> Arc<AppState> {
    Arc::new(AppState::with_store(test_config(), store).expect("Failed to build app state"))
}

pub fn test_app(store: Arc<dyn RecordStore>) -> (Router, Arc<AppState>) {
    let state = test_state(store);
    (kickabout::api::create_router(state.clone()), state)
}

pub fn new_player(name: &str, position: Position) -> NewPlayer {
    NewPlayer {
        name: name.to_string(),
        position,
        foot: Foot::Right,
        goalkeeper: false,
    }
}

pub fn rating(coach: &str, scores: [i32; 5]) -> RatingSubmission {
    RatingSubmission {
        coach: coach.to_string(),
        scores: RatingScores {
            attack_skill: scores[0],
            defense_skill: scores[1],
            passing: scores[2],
            attitude: scores[3],
            teamwork: scores[4],
        },
    }
}

/// A rating whose ability score is exactly `ability`
pub fn rating_with_ability(coach: &str, ability: i32) -> RatingSubmission {
    rating(coach, [ability, 0, 0, 0, 0])
}

/// Register available players rated by a single coach, in the given order
pub async fn seed_squad(
    store: &InMemoryRecordStore,
    squad: &[(&str, i32)],
) -> Vec<Player> {
    let mut players = Vec::new();
    for (name, ability) in squad {
        let player = store
            .insert_player(new_player(name, Position::Midfielder))
            .await
            .expect("Failed to insert player");
        store
            .upsert_availability(Availability {
                player_id: player.id,
                available: true,
            })
            .await
            .expect("Failed to set availability");
        store
            .upsert_rating(player.id, rating_with_ability("Coach", *ability))
            .await
            .expect("Failed to rate player");
        players.push(player);
    }
    players
}

/// Send a request through the router and decode the JSON reply
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Names listed under `teams.<team>.players`
pub fn team_names(reply: &Value, team: &str) -> Vec<String> {
    reply["teams"][team]["players"]
        .as_array()
        .map(|players| {
            players
                .iter()
                .filter_map(|p| p["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Record store whose every call fails
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    fn failure<T>() -> StoreResult<T> {
        Err(StoreError::Unavailable {
            message: "store offline".to_string(),
        })
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn ping(&self) -> StoreResult<()> {
        Self::failure()
    }

    async fn list_players(&self) -> StoreResult<Vec<Player>> {
        Self::failure()
    }

    async fn insert_player(&self, _player: NewPlayer) -> StoreResult<Player> {
        Self::failure()
    }

    async fn find_player_by_name(&self, _name: &str) -> StoreResult<Option<Player>> {
        Self::failure()
    }

    async fn players_by_ids(&self, _ids: &[PlayerId]) -> StoreResult<Vec<Player>> {
        Self::failure()
    }

    async fn upsert_rating(
        &self,
        _player_id: PlayerId,
        _rating: RatingSubmission,
    ) -> StoreResult<(UpsertOutcome, RatingRecord)> {
        Self::failure()
    }

    async fn all_ratings(&self) -> StoreResult<Vec<RatingRecord>> {
        Self::failure()
    }

    async fn ratings_for_players(&self, _ids: &[PlayerId]) -> StoreResult<Vec<RatingRecord>> {
        Self::failure()
    }

    async fn upsert_availability(&self, _availability: Availability) -> StoreResult<Availability> {
        Self::failure()
    }

    async fn availability_for(&self, _player_id: PlayerId) -> StoreResult<Option<Availability>> {
        Self::failure()
    }

    async fn available_player_ids(&self) -> StoreResult<Vec<PlayerId>> {
        Self::failure()
    }
}
