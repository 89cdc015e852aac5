use padel_processor::{
    database::{
        db::DbClient,
        db_structs::EntityStats,
        store::{RatingStore, StoreError}
    },
    model::{padel_model::ScoringConfig, recalculation::recalculate_group}
};
use serial_test::serial;

use super::test_helpers::TestDatabase;
use crate::common::init_test_env;

fn stats(total_points: i32, sets_won: i32, matches_played: i32, matches_won: i32) -> EntityStats {
    EntityStats {
        total_points,
        sets_won,
        matches_played,
        matches_won
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_list_players_and_matches() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let group_id = test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let groups = db_client.list_groups().await.unwrap();
    assert_eq!(groups, vec![group_id]);

    let players = db_client.list_players(group_id).await.unwrap();
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bea", "Cris", "Dani", "Eva"]);
    assert!(players.iter().all(|p| p.stats == EntityStats::default()));

    let matches = db_client.list_matches(group_id).await.unwrap();
    assert_eq!(matches.len(), 3);
    // Newest first
    assert!(matches[0].match_date > matches[1].match_date);
    assert!(matches[0].team1.is_null());
    assert!(matches[1].team1.is_string());
    assert!(matches[2].team1.is_array());
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_couple_insert_then_update() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let group_id = test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    assert!(db_client.get_couple(group_id, "Ana", "Bea").await.unwrap().is_none());

    db_client
        .insert_couple(group_id, "Ana", "Bea", &stats(10, 2, 1, 1))
        .await
        .unwrap();
    db_client
        .update_couple(group_id, "Ana", "Bea", &stats(25, 4, 2, 2))
        .await
        .unwrap();

    let couple = db_client.get_couple(group_id, "Ana", "Bea").await.unwrap().unwrap();
    assert_eq!(couple.stats, stats(25, 4, 2, 2));
    assert_eq!(db_client.list_couples(group_id).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_updates_of_missing_rows_fail() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let group_id = test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let player = db_client
        .upsert_player_stats(group_id, "Nobody", &EntityStats::default())
        .await;
    assert!(matches!(player, Err(StoreError::NotFound { .. })));

    let couple = db_client
        .update_couple(group_id, "Ana", "Nobody", &EntityStats::default())
        .await;
    assert!(matches!(couple, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn test_recalculate_group_against_postgres() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let group_id = test_db.seed_test_data().await.expect("Failed to seed test data");

    let db_client = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    let report = recalculate_group(&db_client, group_id, &ScoringConfig::default())
        .await
        .expect("Recalculation should succeed");

    assert_eq!(report.qualifying_matches, 2);
    assert_eq!(report.skipped_matches, 1);
    assert_eq!(report.writes.players_updated, 5);
    assert_eq!(report.writes.couples_inserted, 4);
    assert!(report.writes.is_complete());

    let check_client = test_db.get_client().await.expect("Failed to get client");
    let rows = check_client
        .query(
            "SELECT name, total_points, sets_won, matches_played, matches_won FROM players \
             WHERE group_id = $1 ORDER BY name",
            &[&group_id]
        )
        .await
        .expect("Failed to query");

    let players: Vec<(String, EntityStats)> = rows
        .iter()
        .map(|row| (row.get(0), stats(row.get(1), row.get(2), row.get(3), row.get(4))))
        .collect();

    assert_eq!(
        players,
        vec![
            ("Ana".to_string(), stats(12, 2, 2, 1)),
            ("Bea".to_string(), stats(14, 3, 2, 2)),
            ("Cris".to_string(), stats(5, 1, 2, 1)),
            ("Dani".to_string(), stats(0, 0, 1, 0)),
            ("Eva".to_string(), stats(0, 0, 1, 0))
        ]
    );

    let bea_cris = db_client.get_couple(group_id, "Bea", "Cris").await.unwrap().unwrap();
    assert_eq!(bea_cris.stats, stats(8, 1, 1, 1));

    // Running again updates every couple in place
    let second = recalculate_group(&db_client, group_id, &ScoringConfig::default())
        .await
        .unwrap();
    assert_eq!(second.writes.couples_inserted, 0);
    assert_eq!(second.writes.couples_updated, 4);
    assert_eq!(db_client.list_couples(group_id).await.unwrap().len(), 4);
}
