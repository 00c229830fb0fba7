use crate::{ClearBatch, JobId, JobStatus};

/// Side-channel outcomes of applying a message, for the shell to log or surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A snapshot moved a job along an edge outside the transition graph.
    /// The snapshot was applied regardless.
    StatusAnomaly(StatusAnomaly),
    /// An optimistic transition was never confirmed within the window and
    /// has been dropped in favour of the backend's status.
    OptimisticExpired { job_id: JobId, intended: JobStatus },
    /// A progress tick changed a downloading job.
    ProgressUpdated { job_id: JobId },
    /// A clear-completed hid `count` jobs under `batch`, until confirmed.
    CompletedHidden { batch: ClearBatch, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAnomaly {
    pub job_id: JobId,
    pub from: JobStatus,
    pub to: JobStatus,
}

impl std::fmt::Display for StatusAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "job {} moved {} -> {} outside the expected lifecycle",
            self.job_id, self.from, self.to
        )
    }
}
