use crate::{
    database::db_structs::MatchRecord,
    model::structures::{entity_key::PlayerKey, team_side::TeamSide}
};
use chrono::NaiveDate;
use itertools::Itertools;
use serde_json::Value;
use thiserror::Error;

/// Games won by each side in one set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScore {
    pub games1: u32,
    pub games2: u32
}

impl SetScore {
    pub fn new(games1: u32, games2: u32) -> SetScore {
        SetScore { games1, games2 }
    }

    pub fn games(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Team1 => self.games1,
            TeamSide::Team2 => self.games2
        }
    }

    /// `None` for a tied set
    pub fn winner(&self) -> Option<TeamSide> {
        match self.games1.cmp(&self.games2) {
            std::cmp::Ordering::Greater => Some(TeamSide::Team1),
            std::cmp::Ordering::Less => Some(TeamSide::Team2),
            std::cmp::Ordering::Equal => None
        }
    }
}

/// Two players in roster order. The order matters for point splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub members: [PlayerKey; 2]
}

impl Team {
    pub fn contains(&self, key: &PlayerKey) -> bool {
        self.members.contains(key)
    }
}

/// A match that survived normalization and takes part in aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatch {
    pub id: i64,
    pub match_date: NaiveDate,
    pub team1: Team,
    pub team2: Team,
    pub sets: Vec<SetScore>
}

impl NormalizedMatch {
    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2
        }
    }

    /// Renders the sets as `6-4, 3-6, 7-5`
    pub fn sets_line(&self) -> String {
        self.sets
            .iter()
            .map(|s| format!("{}-{}", s.games1, s.games2))
            .join(", ")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("{0:?} roster is empty")]
    EmptyRoster(TeamSide),

    #[error("{side:?} roster has {size} players, expected 2")]
    RosterSize { side: TeamSide, size: usize },

    #[error("{0:?} roster holds an entry that is not a player name")]
    InvalidRosterEntry(TeamSide),

    #[error("{0:?} roster lists the same player twice")]
    DuplicatePlayer(TeamSide),

    #[error("player '{0}' appears on both sides")]
    PlayerOnBothSides(PlayerKey),

    #[error("no valid sets")]
    NoSets
}

/// Turns a stored match into its canonical shape, or explains why it does not qualify.
pub fn normalize_match(record: &MatchRecord) -> Result<NormalizedMatch, SkipReason> {
    let team1 = normalize_team(&record.team1, TeamSide::Team1)?;
    let team2 = normalize_team(&record.team2, TeamSide::Team2)?;

    if let Some(shared) = team1.members.iter().find(|k| team2.contains(k)) {
        return Err(SkipReason::PlayerOnBothSides(shared.clone()));
    }

    let sets = normalize_sets(&record.sets);
    if sets.is_empty() {
        return Err(SkipReason::NoSets);
    }

    Ok(NormalizedMatch {
        id: record.id,
        match_date: record.match_date,
        team1,
        team2,
        sets
    })
}

/// Accepts a native JSON array or a string holding an encoded one.
/// Anything else, including undecodable text, is treated as empty.
fn decode_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new()
        },
        _ => Vec::new()
    }
}

fn normalize_team(value: &Value, side: TeamSide) -> Result<Team, SkipReason> {
    let entries = decode_list(value);

    if entries.is_empty() {
        return Err(SkipReason::EmptyRoster(side));
    }

    if entries.len() != 2 {
        return Err(SkipReason::RosterSize {
            side,
            size: entries.len()
        });
    }

    let keys = entries
        .iter()
        .map(roster_entry)
        .collect::<Option<Vec<PlayerKey>>>()
        .ok_or(SkipReason::InvalidRosterEntry(side))?;

    let [first, second]: [PlayerKey; 2] = keys.try_into().map_err(|_| SkipReason::InvalidRosterEntry(side))?;

    if first == second {
        return Err(SkipReason::DuplicatePlayer(side));
    }

    Ok(Team {
        members: [first, second]
    })
}

fn roster_entry(value: &Value) -> Option<PlayerKey> {
    let key = match value {
        Value::String(name) => PlayerKey::from_raw(name),
        Value::Number(n) => PlayerKey::from_raw(&n.to_string()),
        _ => return None
    };

    if key.is_empty() {
        return None;
    }

    Some(key)
}

/// Keeps only well-formed sets. Each malformed entry is dropped on its own.
fn normalize_sets(value: &Value) -> Vec<SetScore> {
    decode_list(value).iter().filter_map(set_entry).collect()
}

fn set_entry(value: &Value) -> Option<SetScore> {
    match value {
        Value::Array(pair) if pair.len() == 2 => Some(SetScore::new(games(&pair[0])?, games(&pair[1])?)),
        _ => None
    }
}

fn games(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }

    // Integral floats such as `6.0` are accepted
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        return Some(f as u32);
    }

    None
}
