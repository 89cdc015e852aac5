use crate::database::{db_structs::MatchRecord, memory::InMemoryStore};
use chrono::{Duration, NaiveDate};
use rand::{seq::IndexedRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use uuid::Uuid;

pub fn generate_group_id() -> Uuid {
    Uuid::from_u128(0x5ad3_1000_0000_0000_0000_0000_0000_0001)
}

/// Seeded RNG for reproducible results
pub fn generate_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

pub fn generate_date(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or_else(|_| panic!("Invalid test date '{}'", date))
}

pub fn generate_match_record(id: i64, date: &str, team1: Value, team2: Value, sets: Value) -> MatchRecord {
    MatchRecord {
        id,
        group_id: generate_group_id(),
        match_date: generate_date(date),
        team1,
        team2,
        sets
    }
}

/// `n` matches on consecutive days. "Ana" plays all of them, each time with a
/// different partner (`Partner1`..`PartnerN`) against a different pair of opponents.
/// Ana's side always wins 6-3.
pub fn generate_rotating_matches(n: i64) -> Vec<MatchRecord> {
    let start = generate_date("2024-01-01");

    (1..=n)
        .map(|i| MatchRecord {
            id: i,
            group_id: generate_group_id(),
            match_date: start + Duration::days(i),
            team1: json!(["Ana", format!("Partner{}", i)]),
            team2: json!([format!("Opp{}a", i), format!("Opp{}b", i)]),
            sets: json!([[6, 3]])
        })
        .collect()
}

/// Random two-vs-two matches between `players`, one to three sets each,
/// spread over a few weeks so that several matches share a date.
pub fn generate_matches(n: i64, players: &[String], rng: &mut ChaCha8Rng) -> Vec<MatchRecord> {
    if players.len() < 4 {
        panic!("At least 4 players are needed to generate matches");
    }

    let start = generate_date("2024-01-01");

    (1..=n)
        .map(|id| {
            let picked: Vec<&String> = players.choose_multiple(rng, 4).collect();
            let n_sets = rng.random_range(1..=3);
            let sets: Vec<[u32; 2]> = (0..n_sets).map(|_| random_set(rng)).collect();

            MatchRecord {
                id,
                group_id: generate_group_id(),
                match_date: start + Duration::days(rng.random_range(0..21)),
                team1: json!([picked[0], picked[1]]),
                team2: json!([picked[2], picked[3]]),
                sets: json!(sets)
            }
        })
        .collect()
}

fn random_set(rng: &mut ChaCha8Rng) -> [u32; 2] {
    let loser = rng.random_range(0..=6);
    let winner = if loser >= 5 { 7 } else { 6 };

    if rng.random_bool(0.5) {
        [winner, loser]
    } else {
        [loser, winner]
    }
}

pub fn generate_player_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Player {}", i)).collect()
}

/// A store holding one group with the given roster and matches
pub fn generate_store(players: &[String], matches: &[MatchRecord]) -> InMemoryStore {
    let store = InMemoryStore::new();
    let group_id = generate_group_id();

    store.add_group(group_id);
    for name in players {
        store.add_player(group_id, name);
    }

    for m in matches {
        store.add_match(group_id, m.match_date, m.team1.clone(), m.team2.clone(), m.sets.clone());
    }

    store
}
