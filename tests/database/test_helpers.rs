use chrono::NaiveDate;
use lazy_static::lazy_static;
use padel_processor::utils::test_utils::generate_group_id;
use serde_json::{json, Value};
use std::sync::Arc;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};
use uuid::Uuid;

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Create a static CLI instance
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        // Start PostgreSQL container
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        let client = connect(&connection_string).await?;

        // Load and execute schema
        let schema = include_str!("schema.sql");
        client.batch_execute(schema).await?;

        Ok(TestDatabase {
            connection_string,
            _container: container
        })
    }

    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        connect(&self.connection_string).await
    }

    /// One group with five registered players and three matches:
    /// - 2024-05-01: Ana & Bea beat Cris & Dani 6-1 6-2
    /// - 2024-05-02: Ana & Eva lose to Bea & Cris 4-6, rosters stored as JSON strings
    /// - 2024-05-03: a match with no team1 roster, which is skipped
    pub async fn seed_test_data(&self) -> Result<Uuid, Box<dyn std::error::Error>> {
        let client = self.get_client().await?;
        let group_id = generate_group_id();

        client
            .execute("INSERT INTO groups (id, name) VALUES ($1, 'Test League')", &[&group_id])
            .await?;

        for name in ["Ana", "Bea", "Cris", "Dani", "Eva"] {
            client
                .execute(
                    "INSERT INTO players (group_id, name) VALUES ($1, $2)",
                    &[&group_id, &name]
                )
                .await?;
        }

        let matches: Vec<(&str, Option<Value>, Value, Value)> = vec![
            (
                "2024-05-01",
                Some(json!(["Ana", "Bea"])),
                json!(["Cris", "Dani"]),
                json!([[6, 1], [6, 2]])
            ),
            (
                "2024-05-02",
                Some(json!("[\"Ana\", \"Eva\"]")),
                json!("[\"Bea\", \"Cris\"]"),
                json!([[4, 6]])
            ),
            ("2024-05-03", None, json!(["Cris", "Dani"]), json!([[6, 0]]))
        ];

        for (date, team1, team2, sets) in matches {
            let match_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
            client
                .execute(
                    "INSERT INTO matches (group_id, match_date, team1, team2, sets) VALUES ($1, $2, $3, $4, $5)",
                    &[&group_id, &match_date, &team1, &team2, &sets]
                )
                .await?;
        }

        Ok(group_id)
    }
}

async fn connect(connection_string: &str) -> Result<Client, Box<dyn std::error::Error>> {
    let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("Database connection error: {}", e);
        }
    });

    Ok(client)
}
