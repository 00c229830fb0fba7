use crate::{Effect, Msg, ReconciliationStore};

/// Pure update function: applies a message to the store and returns any effects.
pub fn update(mut store: ReconciliationStore, msg: Msg) -> (ReconciliationStore, Vec<Effect>) {
    let effects = match msg {
        Msg::SnapshotReceived { snapshot, now } => store.apply_full_snapshot(snapshot, now),
        Msg::TickReceived(tick) => {
            let job_id = tick.id.clone();
            // Stale ticks are expected after a snapshot already moved the job on.
            if store.apply_progress_tick(tick) {
                vec![Effect::ProgressUpdated { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::ActionIssued {
            job_id,
            action,
            now,
        } => {
            store.record_optimistic(&job_id, action, now);
            Vec::new()
        }
        Msg::ActionFailed { job_id, action } => {
            store.rollback_optimistic(&job_id, action);
            Vec::new()
        }
        Msg::ClearCompletedIssued { now } => {
            let (batch, count) = store.hide_completed(now);
            vec![Effect::CompletedHidden { batch, count }]
        }
        Msg::ClearCompletedFailed { batch } => {
            store.restore_hidden(batch);
            Vec::new()
        }
    };

    (store, effects)
}
