use super::{
    db_structs::{CoupleRecord, EntityStats, MatchRecord, PlayerRecord},
    store::{RatingStore, StoreError}
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::Value;
use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard, PoisonError}
};
use uuid::Uuid;

#[derive(Default)]
struct GroupData {
    matches: Vec<MatchRecord>,
    players: Vec<PlayerRecord>,
    couples: Vec<CoupleRecord>
}

#[derive(Default)]
struct MemoryState {
    groups: IndexMap<Uuid, GroupData>,
    next_match_id: i64,
    failing_reads: HashSet<Uuid>,
    failing_writes: HashSet<String>,
    write_count: usize
}

/// A `RatingStore` held in process memory.
///
/// Reads for a group and writes touching a given name can be made to fail,
/// which lets callers observe partial-failure behavior without a database.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_group(&self, group_id: Uuid) {
        self.state().groups.entry(group_id).or_default();
    }

    /// Registers a player with zeroed stats
    pub fn add_player(&self, group_id: Uuid, name: &str) {
        self.add_player_with_stats(group_id, name, EntityStats::default());
    }

    pub fn add_player_with_stats(&self, group_id: Uuid, name: &str, stats: EntityStats) {
        self.state().groups.entry(group_id).or_default().players.push(PlayerRecord {
            group_id,
            name: name.to_string(),
            stats
        });
    }

    pub fn add_couple(&self, group_id: Uuid, player1: &str, player2: &str, stats: EntityStats) {
        self.state().groups.entry(group_id).or_default().couples.push(CoupleRecord {
            group_id,
            player1: player1.to_string(),
            player2: player2.to_string(),
            stats
        });
    }

    /// Stores a match with the next insertion id and returns that id
    pub fn add_match(&self, group_id: Uuid, match_date: NaiveDate, team1: Value, team2: Value, sets: Value) -> i64 {
        let mut state = self.state();
        state.next_match_id += 1;
        let id = state.next_match_id;

        state.groups.entry(group_id).or_default().matches.push(MatchRecord {
            id,
            group_id,
            match_date,
            team1,
            team2,
            sets
        });

        id
    }

    pub fn remove_match(&self, group_id: Uuid, match_id: i64) {
        if let Some(group) = self.state().groups.get_mut(&group_id) {
            group.matches.retain(|m| m.id != match_id);
        }
    }

    pub fn fail_reads_for(&self, group_id: Uuid) {
        self.state().failing_reads.insert(group_id);
    }

    /// Any write naming `name` (as a player or as a couple member) fails
    pub fn fail_writes_for(&self, name: &str) {
        self.state().failing_writes.insert(name.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.failing_reads.clear();
        state.failing_writes.clear();
    }

    pub fn player(&self, group_id: Uuid, name: &str) -> Option<PlayerRecord> {
        self.state()
            .groups
            .get(&group_id)
            .and_then(|g| g.players.iter().find(|p| p.name == name).cloned())
    }

    pub fn players(&self, group_id: Uuid) -> Vec<PlayerRecord> {
        self.state()
            .groups
            .get(&group_id)
            .map(|g| g.players.clone())
            .unwrap_or_default()
    }

    pub fn couples(&self, group_id: Uuid) -> Vec<CoupleRecord> {
        self.state()
            .groups
            .get(&group_id)
            .map(|g| g.couples.clone())
            .unwrap_or_default()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> usize {
        self.state().write_count
    }

    fn check_read(state: &MemoryState, group_id: Uuid) -> Result<(), StoreError> {
        if state.failing_reads.contains(&group_id) {
            return Err(StoreError::Unavailable(format!("reads failing for group {}", group_id)));
        }

        Ok(())
    }

    fn check_write(state: &MemoryState, names: &[&str]) -> Result<(), StoreError> {
        if let Some(name) = names.iter().find(|n| state.failing_writes.contains(**n)) {
            return Err(StoreError::Unavailable(format!("writes failing for '{}'", name)));
        }

        Ok(())
    }
}

impl RatingStore for InMemoryStore {
    async fn list_groups(&self) -> Result<Vec<Uuid>, StoreError> {
        Ok(self.state().groups.keys().copied().collect())
    }

    async fn list_matches(&self, group_id: Uuid) -> Result<Vec<MatchRecord>, StoreError> {
        let state = self.state();
        Self::check_read(&state, group_id)?;

        Ok(state.groups.get(&group_id).map(|g| g.matches.clone()).unwrap_or_default())
    }

    async fn list_players(&self, group_id: Uuid) -> Result<Vec<PlayerRecord>, StoreError> {
        let state = self.state();
        Self::check_read(&state, group_id)?;

        Ok(state.groups.get(&group_id).map(|g| g.players.clone()).unwrap_or_default())
    }

    async fn upsert_player_stats(&self, group_id: Uuid, name: &str, stats: &EntityStats) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check_write(&state, &[name])?;

        let player = state
            .groups
            .get_mut(&group_id)
            .and_then(|g| g.players.iter_mut().find(|p| p.name == name))
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("player '{}'", name),
                group_id
            })?;
        player.stats = *stats;
        state.write_count += 1;

        Ok(())
    }

    async fn list_couples(&self, group_id: Uuid) -> Result<Vec<CoupleRecord>, StoreError> {
        let state = self.state();
        Self::check_read(&state, group_id)?;

        Ok(state.groups.get(&group_id).map(|g| g.couples.clone()).unwrap_or_default())
    }

    async fn get_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str
    ) -> Result<Option<CoupleRecord>, StoreError> {
        let state = self.state();
        Self::check_read(&state, group_id)?;

        Ok(state.groups.get(&group_id).and_then(|g| {
            g.couples
                .iter()
                .find(|c| c.player1 == player1 && c.player2 == player2)
                .cloned()
        }))
    }

    async fn insert_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str,
        stats: &EntityStats
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check_write(&state, &[player1, player2])?;

        state.groups.entry(group_id).or_default().couples.push(CoupleRecord {
            group_id,
            player1: player1.to_string(),
            player2: player2.to_string(),
            stats: *stats
        });
        state.write_count += 1;

        Ok(())
    }

    async fn update_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str,
        stats: &EntityStats
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        Self::check_write(&state, &[player1, player2])?;

        let couple = state
            .groups
            .get_mut(&group_id)
            .and_then(|g| {
                g.couples
                    .iter_mut()
                    .find(|c| c.player1 == player1 && c.player2 == player2)
            })
            .ok_or_else(|| StoreError::NotFound {
                entity: format!("couple '{}' & '{}'", player1, player2),
                group_id
            })?;
        couple.stats = *stats;
        state.write_count += 1;

        Ok(())
    }
}
