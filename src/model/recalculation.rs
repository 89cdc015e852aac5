use futures::future::join_all;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    database::store::{RatingStore, StoreError},
    model::{
        padel_model::{PadelModel, ScoringConfig},
        reconciler::{ReconcileReport, Reconciler}
    },
    utils::progress_utils::progress_bar
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecalculationReport {
    pub group_id: Uuid,
    pub qualifying_matches: usize,
    pub skipped_matches: usize,
    pub roster_size: usize,
    pub writes: ReconcileReport
}

/// Recomputes and persists every player and couple total of one group.
///
/// All reads happen before the first write. A failed read aborts the group
/// with nothing written; failed writes are reported and do not stop the rest.
///
/// Callers must not run two recalculations of the same group at once.
pub async fn recalculate_group<S: RatingStore>(
    store: &S,
    group_id: Uuid,
    config: &ScoringConfig
) -> Result<RecalculationReport, StoreError> {
    info!(%group_id, "Recalculating group");

    let matches = store.list_matches(group_id).await?;
    let roster = store.list_players(group_id).await?;
    let stored_couples = if config.zero_idle_couples {
        Some(store.list_couples(group_id).await?)
    } else {
        None
    };

    let ratings = PadelModel::new(*config).process(&matches);
    info!(
        %group_id,
        qualifying = ratings.qualifying_matches,
        skipped = ratings.skipped_matches,
        players = ratings.players.len(),
        couples = ratings.couples.len(),
        "Ratings computed"
    );

    let writes = Reconciler::new(store, group_id, &roster)
        .reconcile(&roster, stored_couples.as_deref(), &ratings)
        .await;

    Ok(RecalculationReport {
        group_id,
        qualifying_matches: ratings.qualifying_matches,
        skipped_matches: ratings.skipped_matches,
        roster_size: roster.len(),
        writes
    })
}

/// Recalculates several groups concurrently. Groups are independent, so one
/// group's failure does not affect the others.
pub async fn recalculate_groups<S: RatingStore>(
    store: &S,
    group_ids: &[Uuid],
    config: &ScoringConfig
) -> Vec<(Uuid, Result<RecalculationReport, StoreError>)> {
    let bar = progress_bar(group_ids.len() as u64, "Recalculating groups".to_string());

    let results = join_all(group_ids.iter().map(|&group_id| {
        let bar = bar.clone();
        async move {
            let result = recalculate_group(store, group_id, config).await;
            if let Err(e) = &result {
                error!(%group_id, error = %e, "Group recalculation aborted");
            }

            bar.inc(1);
            (group_id, result)
        }
    }))
    .await;

    bar.finish();
    results
}
