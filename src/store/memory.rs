//! In-process record store
//!
//! Mirrors the semantics of the remote store (store-assigned ids, per-coach
//! rating upserts, per-player availability upserts) so the service can be
//! exercised without a network.

use crate::store::{RecordStore, StoreError, StoreResult};
use crate::types::{
    Availability, NewPlayer, Player, PlayerId, RatingRecord, RatingSubmission, UpsertOutcome,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    last_player_id: PlayerId,
    players: Vec<Player>,
    ratings: Vec<RatingRecord>,
    availability: BTreeMap<PlayerId, bool>,
}

/// Record store backed by in-memory tables
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::Unavailable {
            message: "Failed to acquire tables read lock".to_string(),
        })
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::Unavailable {
            message: "Failed to acquire tables write lock".to_string(),
        })
    }

    /// Number of rating rows held (for tests and tooling)
    pub fn rating_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.ratings.len())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    async fn list_players(&self) -> StoreResult<Vec<Player>> {
        Ok(self.read()?.players.clone())
    }

    async fn insert_player(&self, player: NewPlayer) -> StoreResult<Player> {
        let mut tables = self.write()?;
        tables.last_player_id += 1;
        let stored = Player::from_new(tables.last_player_id, player);
        tables.players.push(stored.clone());
        Ok(stored)
    }

    async fn find_player_by_name(&self, name: &str) -> StoreResult<Option<Player>> {
        Ok(self
            .read()?
            .players
            .iter()
            .find(|player| player.name == name)
            .cloned())
    }

    async fn players_by_ids(&self, ids: &[PlayerId]) -> StoreResult<Vec<Player>> {
        Ok(self
            .read()?
            .players
            .iter()
            .filter(|player| ids.contains(&player.id))
            .cloned()
            .collect())
    }

    async fn upsert_rating(
        &self,
        player_id: PlayerId,
        rating: RatingSubmission,
    ) -> StoreResult<(UpsertOutcome, RatingRecord)> {
        let mut tables = self.write()?;

        if let Some(existing) = tables
            .ratings
            .iter_mut()
            .find(|record| record.player_id == player_id && record.coach == rating.coach)
        {
            existing.scores = rating.scores;
            return Ok((UpsertOutcome::Updated, existing.clone()));
        }

        let record = RatingRecord {
            player_id,
            coach: rating.coach,
            scores: rating.scores,
        };
        tables.ratings.push(record.clone());
        Ok((UpsertOutcome::Inserted, record))
    }

    async fn all_ratings(&self) -> StoreResult<Vec<RatingRecord>> {
        Ok(self.read()?.ratings.clone())
    }

    async fn ratings_for_players(&self, ids: &[PlayerId]) -> StoreResult<Vec<RatingRecord>> {
        Ok(self
            .read()?
            .ratings
            .iter()
            .filter(|record| ids.contains(&record.player_id))
            .cloned()
            .collect())
    }

    async fn upsert_availability(&self, availability: Availability) -> StoreResult<Availability> {
        self.write()?
            .availability
            .insert(availability.player_id, availability.available);
        Ok(availability)
    }

    async fn availability_for(&self, player_id: PlayerId) -> StoreResult<Option<Availability>> {
        Ok(self
            .read()?
            .availability
            .get(&player_id)
            .map(|available| Availability {
                player_id,
                available: *available,
            }))
    }

    async fn available_player_ids(&self) -> StoreResult<Vec<PlayerId>> {
        Ok(self
            .read()?
            .availability
            .iter()
            .filter(|(_, available)| **available)
            .map(|(player_id, _)| *player_id)
            .collect())
    }
}
