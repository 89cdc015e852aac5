use std::{fmt::Display, hash::Hash};

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::trace;

use crate::{database::db_structs::EntityStats, model::point_split::round_points};

/// Totals accumulated over an entity's window. Points stay fractional until
/// they are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AggregateStats {
    pub points: f64,
    pub sets_won: u32,
    pub matches_played: u32,
    pub matches_won: u32
}

impl AggregateStats {
    pub fn to_entity_stats(&self) -> EntityStats {
        EntityStats {
            total_points: saturate_points(round_points(self.points)),
            sets_won: saturate_count(self.sets_won),
            matches_played: saturate_count(self.matches_played),
            matches_won: saturate_count(self.matches_won)
        }
    }
}

// Persisted columns are i32; out of range values clamp instead of wrapping
fn saturate_points(points: i64) -> i32 {
    i32::try_from(points).unwrap_or(if points < 0 { i32::MIN } else { i32::MAX })
}

fn saturate_count(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// What one match is worth to one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchContribution {
    pub match_id: i64,
    pub match_date: NaiveDate,
    pub points: f64,
    pub sets_won: u32,
    pub won: bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// The match was counted as the entity's n-th most recent (1-based)
    Counted(usize),
    /// The entity already holds a full window; the match is ignored for it
    WindowFull
}

#[derive(Debug, Default)]
struct WindowEntry {
    stats: AggregateStats,
    counted: usize,
    // (played, won) per date, over counted matches only
    results_by_date: IndexMap<NaiveDate, (u32, u32)>
}

/// Keeps an independent "most recent N matches" window per entity.
///
/// Matches must be fed newest first. Each entity stops accepting contributions
/// once it has counted `window_size` matches, regardless of what happens to
/// any other entity appearing in the same match.
pub struct WindowTracker<K> {
    window_size: usize,
    entries: IndexMap<K, WindowEntry>
}

impl<K: Hash + Eq + Clone + Display> WindowTracker<K> {
    pub fn new(window_size: usize) -> WindowTracker<K> {
        WindowTracker {
            window_size,
            entries: IndexMap::new()
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Counts the contribution toward `key`'s window if there is still room.
    pub fn record(&mut self, key: &K, contribution: &MatchContribution) -> WindowDecision {
        let window_size = self.window_size;
        let entry = self.entries.entry(key.clone()).or_default();

        let decision = if entry.counted < window_size {
            entry.counted += 1;
            entry.stats.points += contribution.points;
            entry.stats.sets_won += contribution.sets_won;
            entry.stats.matches_played += 1;

            let day = entry.results_by_date.entry(contribution.match_date).or_default();
            day.0 += 1;

            if contribution.won {
                entry.stats.matches_won += 1;
                day.1 += 1;
            }

            WindowDecision::Counted(entry.counted)
        } else {
            WindowDecision::WindowFull
        };

        trace!(
            entity = %key,
            match_id = contribution.match_id,
            decision = ?decision,
            "Window decision"
        );

        decision
    }

    pub fn get(&self, key: &K) -> Option<&AggregateStats> {
        self.entries.get(key).map(|e| &e.stats)
    }

    /// Number of matches counted for `key` so far
    pub fn counted(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, |e| e.counted)
    }

    pub fn is_full(&self, key: &K) -> bool {
        self.counted(key) >= self.window_size
    }

    /// Adds `bonus` once for every date on which the entity won every counted
    /// match. Returns how many bonuses were awarded.
    pub fn apply_daily_sweep_bonus(&mut self, bonus: f64) -> usize {
        let mut awarded = 0;

        for (key, entry) in self.entries.iter_mut() {
            let perfect_days = entry
                .results_by_date
                .values()
                .filter(|(played, won)| *played > 0 && played == won)
                .count();

            if perfect_days > 0 {
                trace!(entity = %key, perfect_days, "Daily sweep bonus");
            }

            entry.stats.points += bonus * perfect_days as f64;
            awarded += perfect_days;
        }

        awarded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the tracker, yielding totals in first-seen order
    pub fn into_totals(self) -> IndexMap<K, AggregateStats> {
        self.entries.into_iter().map(|(k, e)| (k, e.stats)).collect()
    }
}
