//! Record store client for PostgREST-compatible REST endpoints (Supabase)
//!
//! Tables are addressed as `<url>/rest/v1/<table>`. Filters use the PostgREST
//! operators `eq.` and `in.(..)`, and writes ask for the stored row back with
//! `Prefer: return=representation`.

use crate::config::StoreSettings;
use crate::store::{RecordStore, StoreError, StoreResult};
use crate::types::{
    Availability, NewPlayer, Player, PlayerId, RatingRecord, RatingScores, RatingSubmission,
    UpsertOutcome,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, error};

const PLAYERS: &str = "players";
const RATINGS: &str = "player_ratings";
const AVAILABILITY: &str = "player_availability";

const PLAYER_COLUMNS: &str = "id,name,position,foot,goalkeeper";
const RATING_COLUMNS: &str = "player_id,coach,attack_skill,defense_skill,passing,attitude,teamwork";
const AVAILABILITY_COLUMNS: &str = "player_id,available";

/// `eq.` filter value
pub fn eq_filter(value: impl Display) -> String {
    format!("eq.{}", value)
}

/// `in.(..)` filter value for a set of ids
pub fn in_filter(ids: &[PlayerId]) -> String {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({})", joined)
}

/// Body of a rating update; the key columns are left untouched
#[derive(Serialize)]
struct RatingUpdate<'a> {
    coach: &'a str,
    #[serde(flatten)]
    scores: RatingScores,
}

#[derive(serde::Deserialize)]
struct PlayerIdRow {
    player_id: PlayerId,
}

/// Store client speaking the PostgREST dialect over HTTP
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for PostgrestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PostgrestStore {
    /// Build a client from store settings
    pub fn new(settings: &StoreSettings) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("kickabout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", settings.url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
        })
    }

    /// Full URL of a table endpoint
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn select(&self, table: &str, columns: &str) -> RequestBuilder {
        self.request(Method::GET, table)
            .query(&[("select", columns)])
    }

    /// Send a request and decode the row array it returns
    async fn rows<T: DeserializeOwned>(&self, table: &str, request: RequestBuilder) -> StoreResult<Vec<T>> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Record store call on '{}' failed with {}: {}", table, status, body);
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows = response.json::<Vec<T>>().await.map_err(|e| StoreError::Decode {
            message: format!("{} rows: {}", table, e),
        })?;

        debug!("Record store returned {} row(s) from '{}'", rows.len(), table);
        Ok(rows)
    }

    /// Decode exactly one row from a write that returns its representation
    async fn single_row<T: DeserializeOwned>(&self, table: &str, request: RequestBuilder) -> StoreResult<T> {
        self.rows(table, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode {
                message: format!("write to '{}' returned no rows", table),
            })
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn ping(&self) -> StoreResult<()> {
        let request = self.select(PLAYERS, "id").query(&[("limit", "1")]);
        self.rows::<serde_json::Value>(PLAYERS, request).await.map(|_| ())
    }

    async fn list_players(&self) -> StoreResult<Vec<Player>> {
        self.rows(PLAYERS, self.select(PLAYERS, PLAYER_COLUMNS)).await
    }

    async fn insert_player(&self, player: NewPlayer) -> StoreResult<Player> {
        let request = self
            .request(Method::POST, PLAYERS)
            .header("Prefer", "return=representation")
            .json(&player);
        self.single_row(PLAYERS, request).await
    }

    async fn find_player_by_name(&self, name: &str) -> StoreResult<Option<Player>> {
        let request = self
            .select(PLAYERS, PLAYER_COLUMNS)
            .query(&[("name", eq_filter(name))]);
        Ok(self.rows(PLAYERS, request).await?.into_iter().next())
    }

    async fn players_by_ids(&self, ids: &[PlayerId]) -> StoreResult<Vec<Player>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .select(PLAYERS, PLAYER_COLUMNS)
            .query(&[("id", in_filter(ids))]);
        self.rows(PLAYERS, request).await
    }

    async fn upsert_rating(
        &self,
        player_id: PlayerId,
        rating: RatingSubmission,
    ) -> StoreResult<(UpsertOutcome, RatingRecord)> {
        let key = [
            ("player_id", eq_filter(player_id)),
            ("coach", eq_filter(&rating.coach)),
        ];

        let existing: Vec<PlayerIdRow> = self
            .rows(RATINGS, self.select(RATINGS, "player_id").query(&key))
            .await?;

        if existing.is_empty() {
            let record = RatingRecord {
                player_id,
                coach: rating.coach,
                scores: rating.scores,
            };
            let request = self
                .request(Method::POST, RATINGS)
                .header("Prefer", "return=representation")
                .json(&record);
            let stored = self.single_row(RATINGS, request).await?;
            return Ok((UpsertOutcome::Inserted, stored));
        }

        let request = self
            .request(Method::PATCH, RATINGS)
            .query(&key)
            .header("Prefer", "return=representation")
            .json(&RatingUpdate {
                coach: &rating.coach,
                scores: rating.scores,
            });
        let stored = self.single_row(RATINGS, request).await?;
        Ok((UpsertOutcome::Updated, stored))
    }

    async fn all_ratings(&self) -> StoreResult<Vec<RatingRecord>> {
        self.rows(RATINGS, self.select(RATINGS, RATING_COLUMNS)).await
    }

    async fn ratings_for_players(&self, ids: &[PlayerId]) -> StoreResult<Vec<RatingRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .select(RATINGS, RATING_COLUMNS)
            .query(&[("player_id", in_filter(ids))]);
        self.rows(RATINGS, request).await
    }

    async fn upsert_availability(&self, availability: Availability) -> StoreResult<Availability> {
        let request = self
            .request(Method::POST, AVAILABILITY)
            .query(&[("on_conflict", "player_id")])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&availability);
        self.single_row(AVAILABILITY, request).await
    }

    async fn availability_for(&self, player_id: PlayerId) -> StoreResult<Option<Availability>> {
        let request = self
            .select(AVAILABILITY, AVAILABILITY_COLUMNS)
            .query(&[("player_id", eq_filter(player_id))]);
        Ok(self.rows(AVAILABILITY, request).await?.into_iter().next())
    }

    async fn available_player_ids(&self) -> StoreResult<Vec<PlayerId>> {
        let request = self
            .select(AVAILABILITY, "player_id")
            .query(&[("available", eq_filter(true))]);
        let rows: Vec<PlayerIdRow> = self.rows(AVAILABILITY, request).await?;
        Ok(rows.into_iter().map(|row| row.player_id).collect())
    }
}
