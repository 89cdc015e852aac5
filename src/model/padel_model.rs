use std::collections::HashMap;

use indexmap::IndexMap;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    database::db_structs::MatchRecord,
    model::{
        constants::{DAILY_SWEEP_BONUS, DEFAULT_WINDOW_SIZE},
        normalize::{normalize_match, NormalizedMatch},
        point_split::{round_points, split_points},
        scoring::{competitive_multiplier, score_match, MatchScore},
        structures::{
            entity_key::{CoupleKey, PlayerKey},
            match_bonus_policy::MatchBonusPolicy,
            team_side::TeamSide
        },
        window_tracker::{AggregateStats, MatchContribution, WindowTracker}
    }
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Most recent qualifying matches counted per player and per couple
    pub window_size: usize,
    pub match_bonus: MatchBonusPolicy,
    /// Award a bonus for each date on which an entity won every counted match
    pub daily_sweep_bonus: bool,
    /// Reset stored couples that have no qualifying matches
    pub zero_idle_couples: bool
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            match_bonus: MatchBonusPolicy::Flat,
            daily_sweep_bonus: false,
            zero_idle_couples: false
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub normalized: NormalizedMatch,
    pub score: MatchScore
}

/// The outcome of one group recalculation, before anything is persisted
#[derive(Debug, Clone, Default)]
pub struct GroupRatings {
    pub players: IndexMap<PlayerKey, AggregateStats>,
    pub couples: IndexMap<CoupleKey, AggregateStats>,
    pub qualifying_matches: usize,
    pub skipped_matches: usize
}

impl GroupRatings {
    /// Zeroed stats for players without qualifying matches
    pub fn player(&self, key: &PlayerKey) -> AggregateStats {
        self.players.get(key).copied().unwrap_or_default()
    }

    pub fn couple(&self, key: &CoupleKey) -> AggregateStats {
        self.couples.get(key).copied().unwrap_or_default()
    }
}

pub struct PadelModel {
    pub config: ScoringConfig
}

impl PadelModel {
    pub fn new(config: ScoringConfig) -> PadelModel {
        PadelModel { config }
    }

    /// # Group recalculation
    ///
    /// Pure: the same records always produce the same ratings.
    ///
    /// Steps:
    /// 1. Normalize every record, dropping those that do not qualify.
    /// 2. Order the qualifying matches newest first (date, then id).
    /// 3. Score each match under the configured match-bonus policy.
    /// 4. Feed every match to the player and couple windows. Player windows
    ///     receive the split share, couple windows the whole team total.
    pub fn process(&self, records: &[MatchRecord]) -> GroupRatings {
        let mut matches = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            match normalize_match(record) {
                Ok(m) => matches.push(m),
                Err(reason) => {
                    debug!(match_id = record.id, %reason, "Skipping match");
                    skipped += 1;
                }
            }
        }

        order_newest_first(&mut matches);
        let scored = self.score_matches(matches);

        let mut ratings = self.aggregate(&scored);
        ratings.skipped_matches = skipped;
        ratings
    }

    /// Scores matches given newest first, preserving that order.
    pub fn score_matches(&self, matches: Vec<NormalizedMatch>) -> Vec<ScoredMatch> {
        match self.config.match_bonus {
            MatchBonusPolicy::Flat => matches
                .into_iter()
                .map(|m| {
                    let score = score_match(&m.sets, 1.0);
                    ScoredMatch { normalized: m, score }
                })
                .collect(),
            MatchBonusPolicy::CompetitiveBalance => Self::score_with_standings(matches)
        }
    }

    /// Standings must be built oldest first: each match's multiplier depends on
    /// the cumulative player points of every earlier qualifying match.
    fn score_with_standings(matches: Vec<NormalizedMatch>) -> Vec<ScoredMatch> {
        let mut standings: HashMap<PlayerKey, f64> = HashMap::new();
        let mut scored = Vec::with_capacity(matches.len());

        for m in matches.into_iter().rev() {
            let provisional = score_match(&m.sets, 1.0);
            let multiplier = match provisional.winner {
                Some(winner) => {
                    let standing = |side: TeamSide| -> f64 {
                        m.team(side)
                            .members
                            .iter()
                            .map(|k| standings.get(k).copied().unwrap_or(0.0))
                            .sum()
                    };
                    competitive_multiplier(standing(winner), standing(winner.opponent()))
                }
                None => 1.0
            };

            let score = score_match(&m.sets, multiplier);

            for side in TeamSide::iter() {
                let total = round_points(score.points(side));
                for (key, share) in split_points(total, &m.team(side).members) {
                    *standings.entry(key).or_default() += share as f64;
                }
            }

            scored.push(ScoredMatch { normalized: m, score });
        }

        scored.reverse();
        scored
    }

    /// Runs the per-entity windows over matches ordered newest first.
    pub fn aggregate(&self, scored: &[ScoredMatch]) -> GroupRatings {
        let mut players: WindowTracker<PlayerKey> = WindowTracker::new(self.config.window_size);
        let mut couples: WindowTracker<CoupleKey> = WindowTracker::new(self.config.window_size);

        for ScoredMatch { normalized: m, score } in scored {
            debug!(
                match_id = m.id,
                date = %m.match_date,
                sets = %m.sets_line(),
                team1_points = score.team1_points,
                team2_points = score.team2_points,
                winner = ?score.winner,
                "Scored match"
            );

            for side in TeamSide::iter() {
                let team = m.team(side);
                let won = score.won(side);
                let sets_won = score.sets_won(side);

                for (key, share) in split_points(round_points(score.points(side)), &team.members) {
                    players.record(
                        &key,
                        &MatchContribution {
                            match_id: m.id,
                            match_date: m.match_date,
                            points: share as f64,
                            sets_won,
                            won
                        }
                    );
                }

                if let Some(couple) = CoupleKey::new(&team.members[0], &team.members[1]) {
                    couples.record(
                        &couple,
                        &MatchContribution {
                            match_id: m.id,
                            match_date: m.match_date,
                            points: score.points(side),
                            sets_won,
                            won
                        }
                    );
                }
            }
        }

        if self.config.daily_sweep_bonus {
            let player_bonuses = players.apply_daily_sweep_bonus(DAILY_SWEEP_BONUS);
            let couple_bonuses = couples.apply_daily_sweep_bonus(DAILY_SWEEP_BONUS);
            debug!(player_bonuses, couple_bonuses, "Daily sweep bonuses applied");
        }

        GroupRatings {
            players: players.into_totals(),
            couples: couples.into_totals(),
            qualifying_matches: scored.len(),
            skipped_matches: 0
        }
    }
}

/// Date descending, then id descending, so equal dates resolve the same way on every run.
pub fn order_newest_first(matches: &mut [NormalizedMatch]) {
    matches.sort_by(|a, b| b.match_date.cmp(&a.match_date).then_with(|| b.id.cmp(&a.id)));
}
