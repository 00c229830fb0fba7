/// Lifecycle state of a single download job as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Downloading,
    Paused,
    Completed,
    Failed,
    Canceled,
    /// Status string this client does not recognise.
    Unknown,
}

impl JobStatus {
    /// Parse a wire status. Unrecognised values map to `Unknown`.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" => JobStatus::Pending,
            "downloading" => JobStatus::Downloading,
            "paused" => JobStatus::Paused,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            "canceled" | "cancelled" => JobStatus::Canceled,
            _ => JobStatus::Unknown,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Downloading => "downloading",
            JobStatus::Paused => "paused",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Canceled => "canceled",
            JobStatus::Unknown => "unknown",
        }
    }

    /// Completed and Canceled accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Canceled)
    }

    /// Progress figures stop moving in these states.
    pub fn is_frozen(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Canceled
        )
    }

    /// Whether `self -> next` is an edge of the expected transition graph.
    ///
    /// Staying in the same state is always allowed. `Pending -> Paused`,
    /// `Paused -> Pending` and `Failed -> Pending` are included because the
    /// backend pauses queued jobs and re-queues resumed ones.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Downloading | Canceled | Paused)
                | (Downloading, Paused | Completed | Failed | Canceled)
                | (Paused, Downloading | Canceled | Pending)
                | (Failed, Downloading | Canceled | Pending)
        )
    }

    pub fn display(self) -> StatusDisplay {
        match self {
            JobStatus::Pending => StatusDisplay {
                label: "PENDING",
                icon: "clock",
                tone: Tone::Neutral,
            },
            JobStatus::Downloading => StatusDisplay {
                label: "DOWNLOADING",
                icon: "download",
                tone: Tone::Active,
            },
            JobStatus::Paused => StatusDisplay {
                label: "PAUSED",
                icon: "pause",
                tone: Tone::Warning,
            },
            JobStatus::Completed => StatusDisplay {
                label: "COMPLETED",
                icon: "check",
                tone: Tone::Success,
            },
            JobStatus::Failed => StatusDisplay {
                label: "FAILED",
                icon: "exclamation-triangle",
                tone: Tone::Danger,
            },
            JobStatus::Canceled => StatusDisplay {
                label: "CANCELED",
                icon: "ban",
                tone: Tone::Muted,
            },
            JobStatus::Unknown => StatusDisplay {
                label: "UNKNOWN",
                icon: "question",
                tone: Tone::Neutral,
            },
        }
    }
}

/// Colour family a renderer should use for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Neutral,
    Active,
    Warning,
    Success,
    Danger,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
}

/// State-changing command a user can issue against an existing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobAction {
    Pause,
    Resume,
    Cancel,
}

impl JobAction {
    /// Status shown optimistically until the backend confirms the command.
    pub fn target_status(self) -> JobStatus {
        match self {
            JobAction::Pause => JobStatus::Paused,
            JobAction::Resume => JobStatus::Pending,
            JobAction::Cancel => JobStatus::Canceled,
        }
    }

    /// Actions offered for a job in `status`.
    pub fn available_for(status: JobStatus) -> &'static [JobAction] {
        match status {
            JobStatus::Pending | JobStatus::Downloading => &[JobAction::Pause, JobAction::Cancel],
            JobStatus::Paused | JobStatus::Failed => &[JobAction::Resume, JobAction::Cancel],
            JobStatus::Completed | JobStatus::Canceled | JobStatus::Unknown => {
                &[JobAction::Cancel]
            }
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            JobAction::Pause => "pause",
            JobAction::Resume => "resume",
            JobAction::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl std::fmt::Display for JobAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}
