use crate::model::{
    constants::{
        CLEAN_SWEEP_BONUS, CLEAN_SWEEP_MIN_GAMES, EVEN_WIN_MULTIPLIER, FAVOURITE_WIN_MULTIPLIER, MATCH_WIN_BONUS,
        SET_WIN_BONUS, UNDERDOG_WIN_MULTIPLIER
    },
    normalize::SetScore,
    structures::team_side::TeamSide
};
use std::cmp::Ordering;

/// Points earned by each side of a single decided set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPoints {
    pub winner: u32,
    pub loser: u32
}

/// The scoring table. Both values depend only on how many games the loser took.
pub fn set_points(loser_games: u32) -> SetPoints {
    let (winner, loser) = match loser_games {
        0 => (6, 0),
        1 => (5, 0),
        2 => (4, 1),
        3 => (3, 1),
        4 => (2, 1),
        _ => (1, 3)
    };

    SetPoints { winner, loser }
}

/// Raw per-side totals over a list of sets, before any match-level bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetTally {
    pub team1_points: u32,
    pub team2_points: u32,
    pub team1_sets_won: u32,
    pub team2_sets_won: u32
}

impl SetTally {
    pub fn sets_won(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Team1 => self.team1_sets_won,
            TeamSide::Team2 => self.team2_sets_won
        }
    }
}

/// Sums the table value plus the set-win bonus for each set winner.
/// Tied sets add nothing to either side.
pub fn tally_sets(sets: &[SetScore]) -> SetTally {
    let mut tally = SetTally::default();

    for set in sets {
        let Some(winner) = set.winner() else {
            continue;
        };

        let points = set_points(set.games(winner.opponent()));
        match winner {
            TeamSide::Team1 => {
                tally.team1_points += points.winner + SET_WIN_BONUS;
                tally.team2_points += points.loser;
                tally.team1_sets_won += 1;
            }
            TeamSide::Team2 => {
                tally.team2_points += points.winner + SET_WIN_BONUS;
                tally.team1_points += points.loser;
                tally.team2_sets_won += 1;
            }
        }
    }

    tally
}

/// The side with strictly more sets won. Equal counts have no winner.
pub fn match_winner(tally: &SetTally) -> Option<TeamSide> {
    match tally.team1_sets_won.cmp(&tally.team2_sets_won) {
        Ordering::Greater => Some(TeamSide::Team1),
        Ordering::Less => Some(TeamSide::Team2),
        Ordering::Equal => None
    }
}

/// A side sweeps when it won every set played (ties count as played)
/// and its own games across all sets exceed the sweep threshold.
pub fn is_clean_sweep(side: TeamSide, sets: &[SetScore], tally: &SetTally) -> bool {
    if sets.is_empty() || tally.sets_won(side) as usize != sets.len() {
        return false;
    }

    let games: u64 = sets.iter().map(|s| u64::from(s.games(side))).sum();
    games > u64::from(CLEAN_SWEEP_MIN_GAMES)
}

/// Scales the match-win bonus by the standings both sides carried into the match.
pub fn competitive_multiplier(winner_standing: f64, loser_standing: f64) -> f64 {
    match winner_standing.partial_cmp(&loser_standing) {
        Some(Ordering::Less) => UNDERDOG_WIN_MULTIPLIER,
        Some(Ordering::Greater) => FAVOURITE_WIN_MULTIPLIER,
        _ => EVEN_WIN_MULTIPLIER
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub team1_points: f64,
    pub team2_points: f64,
    pub team1_sets_won: u32,
    pub team2_sets_won: u32,
    pub winner: Option<TeamSide>
}

impl MatchScore {
    pub fn points(&self, side: TeamSide) -> f64 {
        match side {
            TeamSide::Team1 => self.team1_points,
            TeamSide::Team2 => self.team2_points
        }
    }

    pub fn sets_won(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Team1 => self.team1_sets_won,
            TeamSide::Team2 => self.team2_sets_won
        }
    }

    pub fn won(&self, side: TeamSide) -> bool {
        self.winner == Some(side)
    }
}

/// Scores a match from its valid sets.
///
/// Steps:
/// 1. Table points plus the set-win bonus for every decided set.
/// 2. The match winner (more sets won) takes the match-win bonus, scaled by
///     `win_bonus_multiplier` (1.0 under the flat policy).
/// 3. A clean sweep earns its own bonus on top.
pub fn score_match(sets: &[SetScore], win_bonus_multiplier: f64) -> MatchScore {
    let tally = tally_sets(sets);
    let winner = match_winner(&tally);

    let mut team1_points = tally.team1_points as f64;
    let mut team2_points = tally.team2_points as f64;

    match winner {
        Some(TeamSide::Team1) => team1_points += MATCH_WIN_BONUS * win_bonus_multiplier,
        Some(TeamSide::Team2) => team2_points += MATCH_WIN_BONUS * win_bonus_multiplier,
        None => {}
    }

    if is_clean_sweep(TeamSide::Team1, sets, &tally) {
        team1_points += CLEAN_SWEEP_BONUS as f64;
    }
    if is_clean_sweep(TeamSide::Team2, sets, &tally) {
        team2_points += CLEAN_SWEEP_BONUS as f64;
    }

    MatchScore {
        team1_points,
        team2_points,
        team1_sets_won: tally.team1_sets_won,
        team2_sets_won: tally.team2_sets_won,
        winner
    }
}
