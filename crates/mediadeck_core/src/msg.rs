use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A full `/api/downloads` poll decoded successfully.
    SnapshotReceived {
        snapshot: crate::FullSnapshot,
        now: Instant,
    },
    /// A progress poll carried an update for one job.
    TickReceived(crate::ProgressTick),
    /// User issued a command; show its target status until confirmed.
    ActionIssued {
        job_id: crate::JobId,
        action: crate::JobAction,
        now: Instant,
    },
    /// The backend rejected the command or could not be reached.
    ActionFailed {
        job_id: crate::JobId,
        action: crate::JobAction,
    },
    /// User asked to clear completed jobs; hide them until confirmed.
    ClearCompletedIssued { now: Instant },
    /// The clear-completed command failed; show that batch's jobs again.
    ClearCompletedFailed { batch: crate::ClearBatch },
}
