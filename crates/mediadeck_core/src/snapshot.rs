use crate::{Job, JobId, JobStatus, PlaylistId, QueueStatus};

/// Complete, authoritative enumeration of everything the backend knows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FullSnapshot {
    pub queue_status: QueueStatus,
    /// Jobs in backend order (newest first).
    pub jobs: Vec<Job>,
    pub playlists: Vec<PlaylistRecord>,
}

/// Playlist entry as reported by the backend, before member aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistRecord {
    pub id: PlaylistId,
    pub title: String,
    pub platform: String,
    pub url: Option<String>,
    pub total_videos: Option<u32>,
    pub reported_status: JobStatus,
}

/// Incremental progress for the job the backend is transferring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressTick {
    pub id: JobId,
    pub progress: Option<f64>,
    pub download_speed: Option<f64>,
    pub eta_seconds: Option<u64>,
    pub file_size_bytes: Option<u64>,
    pub downloaded_bytes: Option<u64>,
}
