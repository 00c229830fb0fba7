use std::fmt;

use crate::JobStatus;

/// Opaque backend identifier of a download job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<u64> for JobId {
    fn from(raw: u64) -> Self {
        Self(raw.to_string())
    }
}

/// Backend identifier of a playlist (a UUID in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaylistId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A single media download as last reported by the backend.
///
/// Numeric fields are `None` when the backend has no data yet, which is
/// distinct from a reported zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Job {
    pub id: JobId,
    pub url: String,
    pub title: String,
    pub platform: String,
    pub requested_quality: Option<String>,
    pub status: JobStatus,
    pub progress_percent: Option<f64>,
    pub download_speed: Option<f64>,
    pub eta_seconds: Option<u64>,
    pub file_size_bytes: Option<u64>,
    pub downloaded_bytes: Option<u64>,
    /// Only set while `status` is `Failed`.
    pub error_message: Option<String>,
    pub filename: Option<String>,
    pub playlist_id: Option<PlaylistId>,
    pub playlist_index: Option<u32>,
}

/// Aggregate over the jobs sharing a `playlist_id`.
///
/// `status`, `downloaded_videos` and `progress_percent` are derived from the
/// member jobs; the rest comes straight from the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: PlaylistId,
    pub title: String,
    pub platform: String,
    pub url: Option<String>,
    pub status: JobStatus,
    pub total_videos: u32,
    pub downloaded_videos: u32,
    pub progress_percent: f64,
}

/// Reference to the job the backend worker is transferring right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentDownload {
    pub id: JobId,
    pub title: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueStatus {
    pub queue_size: u32,
    pub current_download: Option<CurrentDownload>,
    pub worker_active: Option<bool>,
}
