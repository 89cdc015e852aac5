use super::db_structs::{CoupleRecord, EntityStats, MatchRecord, PlayerRecord};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("No {entity} row matched group {group_id}")]
    NotFound { entity: String, group_id: Uuid },

    #[error("Store unavailable: {0}")]
    Unavailable(String)
}

/// The record store the recalculation reads from and writes back to.
///
/// Player rows are owned by the player-management side of the application;
/// `upsert_player_stats` only updates existing rows. Couple rows are created
/// on first sight by the reconciler.
#[allow(async_fn_in_trait)]
pub trait RatingStore {
    async fn list_groups(&self) -> Result<Vec<Uuid>, StoreError>;

    async fn list_matches(&self, group_id: Uuid) -> Result<Vec<MatchRecord>, StoreError>;

    async fn list_players(&self, group_id: Uuid) -> Result<Vec<PlayerRecord>, StoreError>;

    async fn upsert_player_stats(&self, group_id: Uuid, name: &str, stats: &EntityStats) -> Result<(), StoreError>;

    async fn list_couples(&self, group_id: Uuid) -> Result<Vec<CoupleRecord>, StoreError>;

    async fn get_couple(&self, group_id: Uuid, player1: &str, player2: &str)
        -> Result<Option<CoupleRecord>, StoreError>;

    async fn insert_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str,
        stats: &EntityStats
    ) -> Result<(), StoreError>;

    async fn update_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str,
        stats: &EntityStats
    ) -> Result<(), StoreError>;
}
