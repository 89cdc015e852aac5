use indexmap::IndexMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    database::{
        db_structs::{CoupleRecord, EntityStats, PlayerRecord},
        store::{RatingStore, StoreError}
    },
    model::{
        padel_model::GroupRatings,
        structures::entity_key::{CoupleKey, PlayerKey}
    }
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteTarget {
    Player(String),
    Couple(String, String)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    pub target: WriteTarget,
    pub error: String
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub players_updated: usize,
    pub couples_inserted: usize,
    pub couples_updated: usize,
    pub couples_zeroed: usize,
    /// Players seen in matches but absent from the roster; never persisted
    pub unregistered_players: Vec<String>,
    pub failures: Vec<WriteFailure>
}

impl ReconcileReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes a group's freshly computed ratings back to the store.
///
/// Every write stands alone: a failure is logged and recorded in the report,
/// and the remaining players and couples are still written.
pub struct Reconciler<'a, S: RatingStore> {
    store: &'a S,
    group_id: Uuid,
    // Canonical key -> raw stored name, first registration wins
    names: IndexMap<PlayerKey, String>
}

impl<'a, S: RatingStore> Reconciler<'a, S> {
    pub fn new(store: &'a S, group_id: Uuid, roster: &[PlayerRecord]) -> Reconciler<'a, S> {
        let mut names = IndexMap::new();
        for player in roster {
            names
                .entry(PlayerKey::from_raw(&player.name))
                .or_insert_with(|| player.name.clone());
        }

        Reconciler { store, group_id, names }
    }

    /// The name to persist for a key: the roster's raw name when registered
    pub fn raw_name(&self, key: &PlayerKey) -> String {
        self.names
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.as_str().to_string())
    }

    pub async fn reconcile(
        &self,
        roster: &[PlayerRecord],
        stored_couples: Option<&[CoupleRecord]>,
        ratings: &GroupRatings
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        self.write_players(roster, ratings, &mut report).await;
        self.write_couples(ratings, &mut report).await;

        if let Some(stored) = stored_couples {
            self.zero_idle_couples(stored, ratings, &mut report).await;
        }

        info!(
            group_id = %self.group_id,
            players_updated = report.players_updated,
            couples_inserted = report.couples_inserted,
            couples_updated = report.couples_updated,
            couples_zeroed = report.couples_zeroed,
            failures = report.failures.len(),
            "Ratings written"
        );

        report
    }

    /// Every registered player is written, idle players with all-zero stats.
    async fn write_players(&self, roster: &[PlayerRecord], ratings: &GroupRatings, report: &mut ReconcileReport) {
        for player in roster {
            let stats = ratings.player(&PlayerKey::from_raw(&player.name)).to_entity_stats();

            match self.store.upsert_player_stats(self.group_id, &player.name, &stats).await {
                Ok(()) => report.players_updated += 1,
                Err(e) => self.record_failure(report, WriteTarget::Player(player.name.clone()), e)
            }
        }

        for key in ratings.players.keys().filter(|k| !self.names.contains_key(*k)) {
            warn!(group_id = %self.group_id, player = %key, "Player is not registered in the group, stats not saved");
            report.unregistered_players.push(key.as_str().to_string());
        }
    }

    /// Couples without qualifying matches are not touched here.
    ///
    /// `player1`/`player2` hold raw roster names in canonical (trimmed, lowercased)
    /// order, so "alice" & "Bob" is stored as ("alice", "Bob") even though a
    /// byte-wise sort of the raw names would put "Bob" first.
    async fn write_couples(&self, ratings: &GroupRatings, report: &mut ReconcileReport) {
        for (key, aggregate) in ratings.couples.iter().filter(|(_, a)| a.matches_played > 0) {
            let player1 = self.raw_name(key.first());
            let player2 = self.raw_name(key.second());
            let stats = aggregate.to_entity_stats();

            match self.upsert_couple(&player1, &player2, &stats).await {
                Ok(true) => report.couples_inserted += 1,
                Ok(false) => report.couples_updated += 1,
                Err(e) => self.record_failure(report, WriteTarget::Couple(player1, player2), e)
            }
        }
    }

    /// Returns `true` when a new couple row was inserted
    async fn upsert_couple(&self, player1: &str, player2: &str, stats: &EntityStats) -> Result<bool, StoreError> {
        match self.store.get_couple(self.group_id, player1, player2).await? {
            Some(_) => {
                self.store.update_couple(self.group_id, player1, player2, stats).await?;
                Ok(false)
            }
            None => {
                self.store.insert_couple(self.group_id, player1, player2, stats).await?;
                Ok(true)
            }
        }
    }

    async fn zero_idle_couples(&self, stored: &[CoupleRecord], ratings: &GroupRatings, report: &mut ReconcileReport) {
        let zero = EntityStats::default();

        for couple in stored {
            let active = CoupleKey::new(&PlayerKey::from_raw(&couple.player1), &PlayerKey::from_raw(&couple.player2))
                .map(|k| ratings.couple(&k).matches_played > 0)
                .unwrap_or(false);

            if active || couple.stats == zero {
                continue;
            }

            match self
                .store
                .update_couple(self.group_id, &couple.player1, &couple.player2, &zero)
                .await
            {
                Ok(()) => {
                    debug!(group_id = %self.group_id, player1 = %couple.player1, player2 = %couple.player2, "Idle couple reset");
                    report.couples_zeroed += 1;
                }
                Err(e) => self.record_failure(
                    report,
                    WriteTarget::Couple(couple.player1.clone(), couple.player2.clone()),
                    e
                )
            }
        }
    }

    fn record_failure(&self, report: &mut ReconcileReport, target: WriteTarget, error: StoreError) {
        warn!(group_id = %self.group_id, target = ?target, %error, "Failed to write stats");
        report.failures.push(WriteFailure {
            target,
            error: error.to_string()
        });
    }
}
