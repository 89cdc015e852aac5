use clap::Parser;
use padel_processor::{
    args::Args,
    database::{db::DbClient, store::RatingStore},
    model::recalculation::recalculate_groups
};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level);

    let client = match DbClient::connect(&args.connection_string).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            error!("Application cannot start without a valid database connection");
            return ExitCode::FAILURE;
        }
    };

    let groups = if args.groups.is_empty() {
        match client.list_groups().await {
            Ok(groups) => groups,
            Err(e) => {
                error!("Failed to list groups: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        args.groups.clone()
    };

    let config = args.scoring_config();
    info!(
        groups = groups.len(),
        window_size = config.window_size,
        match_bonus = %config.match_bonus,
        daily_sweep_bonus = config.daily_sweep_bonus,
        zero_idle_couples = config.zero_idle_couples,
        "Starting recalculation"
    );

    let results = recalculate_groups(&client, &groups, &config).await;

    let mut aborted = 0;
    for (group_id, result) in &results {
        match result {
            Ok(report) if !report.writes.is_complete() => {
                warn!(%group_id, failures = report.writes.failures.len(), "Group recalculated with failed writes");
            }
            Ok(_) => {}
            Err(_) => aborted += 1
        }
    }

    info!(total = results.len(), aborted, "Recalculation complete");

    if aborted > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}
