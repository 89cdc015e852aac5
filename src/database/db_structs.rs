use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A match row as stored. Rosters and sets are kept exactly as they were
/// persisted: either a JSON array or a JSON string holding an encoded array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Insertion-ordered identifier. Breaks ties between matches on the same date.
    pub id: i64,
    pub group_id: Uuid,
    pub match_date: NaiveDate,
    pub team1: Value,
    pub team2: Value,
    pub sets: Value
}

/// A registered player of a group. `name` is the raw stored display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub group_id: Uuid,
    pub name: String,
    pub stats: EntityStats
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoupleRecord {
    pub group_id: Uuid,
    pub player1: String,
    pub player2: String,
    pub stats: EntityStats
}

/// Persisted totals for a player or a couple
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EntityStats {
    pub total_points: i32,
    pub sets_won: i32,
    pub matches_played: i32,
    pub matches_won: i32
}
