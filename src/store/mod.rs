//! Record store interface and implementations
//!
//! The store is an external tabular datastore holding the `players`,
//! `player_ratings` and `player_availability` collections. The service only
//! ever talks to it through [`RecordStore`], built once at start-up and shared
//! by every request handler.

pub mod memory;
pub mod postgrest;

pub use memory::InMemoryRecordStore;
pub use postgrest::PostgrestStore;

use crate::types::{
    Availability, NewPlayer, Player, PlayerId, RatingRecord, RatingSubmission, UpsertOutcome,
};
use async_trait::async_trait;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures talking to the record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Record store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected record store response: {message}")]
    Decode { message: String },

    #[error("Record store unavailable: {message}")]
    Unavailable { message: String },
}

/// Operations the service needs from the record store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Cheap round-trip used by health checks
    async fn ping(&self) -> StoreResult<()>;

    /// All players, in store order
    async fn list_players(&self) -> StoreResult<Vec<Player>>;

    /// Insert a player and return the stored row with its assigned id
    async fn insert_player(&self, player: NewPlayer) -> StoreResult<Player>;

    /// First player whose name equals `name`
    async fn find_player_by_name(&self, name: &str) -> StoreResult<Option<Player>>;

    /// Players whose id is in `ids`
    async fn players_by_ids(&self, ids: &[PlayerId]) -> StoreResult<Vec<Player>>;

    /// Insert or replace the rating keyed by (player, coach)
    async fn upsert_rating(
        &self,
        player_id: PlayerId,
        rating: RatingSubmission,
    ) -> StoreResult<(UpsertOutcome, RatingRecord)>;

    /// Every rating row in the store
    async fn all_ratings(&self) -> StoreResult<Vec<RatingRecord>>;

    /// Rating rows whose player id is in `ids`
    async fn ratings_for_players(&self, ids: &[PlayerId]) -> StoreResult<Vec<RatingRecord>>;

    /// Insert or replace the availability row keyed by player
    async fn upsert_availability(&self, availability: Availability) -> StoreResult<Availability>;

    /// Availability row for a player, if one was ever written
    async fn availability_for(&self, player_id: PlayerId) -> StoreResult<Option<Availability>>;

    /// Ids of every player currently marked available
    async fn available_player_ids(&self) -> StoreResult<Vec<PlayerId>>;
}
