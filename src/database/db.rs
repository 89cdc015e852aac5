use super::{
    db_structs::{CoupleRecord, EntityStats, MatchRecord, PlayerRecord},
    store::{RatingStore, StoreError}
};
use postgres_types::ToSql;
use std::sync::Arc;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    fn match_from_row(row: &Row) -> Result<MatchRecord, StoreError> {
        Ok(MatchRecord {
            id: row.try_get("id")?,
            group_id: row.try_get("group_id")?,
            match_date: row.try_get("match_date")?,
            // A NULL roster or set column decodes as JSON null and is skipped downstream
            team1: row.try_get::<_, Option<serde_json::Value>>("team1")?.unwrap_or_default(),
            team2: row.try_get::<_, Option<serde_json::Value>>("team2")?.unwrap_or_default(),
            sets: row.try_get::<_, Option<serde_json::Value>>("sets")?.unwrap_or_default()
        })
    }

    fn stats_from_row(row: &Row) -> Result<EntityStats, StoreError> {
        Ok(EntityStats {
            total_points: row.try_get::<_, Option<i32>>("total_points")?.unwrap_or(0),
            sets_won: row.try_get::<_, Option<i32>>("sets_won")?.unwrap_or(0),
            matches_played: row.try_get::<_, Option<i32>>("matches_played")?.unwrap_or(0),
            matches_won: row.try_get::<_, Option<i32>>("matches_won")?.unwrap_or(0)
        })
    }

    fn couple_from_row(row: &Row) -> Result<CoupleRecord, StoreError> {
        Ok(CoupleRecord {
            group_id: row.try_get("group_id")?,
            player1: row.try_get("player1")?,
            player2: row.try_get("player2")?,
            stats: Self::stats_from_row(row)?
        })
    }

    // Access the underlying Client
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }
}

impl RatingStore for DbClient {
    async fn list_groups(&self) -> Result<Vec<Uuid>, StoreError> {
        let rows = self.client.query("SELECT id FROM groups ORDER BY id", &[]).await?;

        rows.iter()
            .map(|row| row.try_get::<_, Uuid>("id").map_err(StoreError::from))
            .collect()
    }

    async fn list_matches(&self, group_id: Uuid) -> Result<Vec<MatchRecord>, StoreError> {
        info!(%group_id, "Fetching matches...");
        let rows = self
            .client
            .query(
                "SELECT id, group_id, match_date, team1, team2, sets FROM matches \
                 WHERE group_id = $1 ORDER BY match_date DESC, id DESC",
                &[&group_id]
            )
            .await?;

        let matches = rows.iter().map(Self::match_from_row).collect::<Result<Vec<_>, _>>()?;

        info!(%group_id, count = matches.len(), "Matches fetched");
        Ok(matches)
    }

    async fn list_players(&self, group_id: Uuid) -> Result<Vec<PlayerRecord>, StoreError> {
        info!(%group_id, "Fetching players...");
        let rows = self
            .client
            .query(
                "SELECT group_id, name, total_points, sets_won, matches_played, matches_won \
                 FROM players WHERE group_id = $1 ORDER BY id",
                &[&group_id]
            )
            .await?;

        let mut players = Vec::with_capacity(rows.len());
        for row in &rows {
            players.push(PlayerRecord {
                group_id: row.try_get("group_id")?,
                name: row.try_get("name")?,
                stats: Self::stats_from_row(row)?
            });
        }

        info!(%group_id, count = players.len(), "Players fetched");
        Ok(players)
    }

    async fn upsert_player_stats(&self, group_id: Uuid, name: &str, stats: &EntityStats) -> Result<(), StoreError> {
        let query = "UPDATE players SET total_points = $1, sets_won = $2, matches_played = $3, matches_won = $4 \
                     WHERE group_id = $5 AND name = $6";
        let values: &[&(dyn ToSql + Sync)] = &[
            &stats.total_points,
            &stats.sets_won,
            &stats.matches_played,
            &stats.matches_won,
            &group_id,
            &name
        ];

        let updated = self.client.execute(query, values).await?;
        if updated == 0 {
            return Err(StoreError::NotFound {
                entity: format!("player '{}'", name),
                group_id
            });
        }

        debug!(%group_id, name, "Player stats updated");
        Ok(())
    }

    async fn list_couples(&self, group_id: Uuid) -> Result<Vec<CoupleRecord>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT group_id, player1, player2, total_points, sets_won, matches_played, matches_won \
                 FROM couples WHERE group_id = $1 ORDER BY player1, player2",
                &[&group_id]
            )
            .await?;

        rows.iter().map(Self::couple_from_row).collect()
    }

    async fn get_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str
    ) -> Result<Option<CoupleRecord>, StoreError> {
        let row = self
            .client
            .query_opt(
                "SELECT group_id, player1, player2, total_points, sets_won, matches_played, matches_won \
                 FROM couples WHERE group_id = $1 AND player1 = $2 AND player2 = $3",
                &[&group_id, &player1, &player2]
            )
            .await?;

        row.as_ref().map(Self::couple_from_row).transpose()
    }

    async fn insert_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str,
        stats: &EntityStats
    ) -> Result<(), StoreError> {
        let query = "INSERT INTO couples (group_id, player1, player2, total_points, sets_won, matches_played, matches_won) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7)";
        let values: &[&(dyn ToSql + Sync)] = &[
            &group_id,
            &player1,
            &player2,
            &stats.total_points,
            &stats.sets_won,
            &stats.matches_played,
            &stats.matches_won
        ];

        self.client.execute(query, values).await?;

        debug!(%group_id, player1, player2, "Couple inserted");
        Ok(())
    }

    async fn update_couple(
        &self,
        group_id: Uuid,
        player1: &str,
        player2: &str,
        stats: &EntityStats
    ) -> Result<(), StoreError> {
        let query = "UPDATE couples SET total_points = $1, sets_won = $2, matches_played = $3, matches_won = $4 \
                     WHERE group_id = $5 AND player1 = $6 AND player2 = $7";
        let values: &[&(dyn ToSql + Sync)] = &[
            &stats.total_points,
            &stats.sets_won,
            &stats.matches_played,
            &stats.matches_won,
            &group_id,
            &player1,
            &player2
        ];

        let updated = self.client.execute(query, values).await?;
        if updated == 0 {
            return Err(StoreError::NotFound {
                entity: format!("couple '{}' & '{}'", player1, player2),
                group_id
            });
        }

        debug!(%group_id, player1, player2, "Couple updated");
        Ok(())
    }
}
