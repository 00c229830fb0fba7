use std::fmt;

use mediadeck_core::{JobAction, JobId, JobStatus, StatusAnomaly};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
            HttpMethod::Delete => f.write_str("DELETE"),
        }
    }
}

/// One call against the download backend's HTTP API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    ExtractInfo {
        url: String,
    },
    AddDownload {
        url: String,
        format_id: String,
        quality: String,
    },
    Downloads,
    Progress,
    Pause(JobId),
    Resume(JobId),
    Cancel(JobId),
    ClearCompleted,
}

impl ApiRequest {
    pub fn for_action(action: JobAction, job_id: JobId) -> Self {
        match action {
            JobAction::Pause => ApiRequest::Pause(job_id),
            JobAction::Resume => ApiRequest::Resume(job_id),
            JobAction::Cancel => ApiRequest::Cancel(job_id),
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            ApiRequest::Downloads | ApiRequest::Progress => HttpMethod::Get,
            ApiRequest::Cancel(_) => HttpMethod::Delete,
            ApiRequest::ExtractInfo { .. }
            | ApiRequest::AddDownload { .. }
            | ApiRequest::Pause(_)
            | ApiRequest::Resume(_)
            | ApiRequest::ClearCompleted => HttpMethod::Post,
        }
    }

    /// Path segments below the base URL. Job ids are left unescaped here;
    /// the transport encodes each segment.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            ApiRequest::ExtractInfo { .. } => vec!["api", "extract_info"],
            ApiRequest::AddDownload { .. } => vec!["api", "add_download"],
            ApiRequest::Downloads => vec!["api", "downloads"],
            ApiRequest::Progress => vec!["api", "progress_stream"],
            ApiRequest::Pause(id) => vec!["api", "download", id.as_str(), "pause"],
            ApiRequest::Resume(id) => vec!["api", "download", id.as_str(), "resume"],
            ApiRequest::Cancel(id) => vec!["api", "download", id.as_str(), "cancel"],
            ApiRequest::ClearCompleted => vec!["api", "clear_completed"],
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    pub fn body(&self) -> Option<serde_json::Value> {
        match self {
            ApiRequest::ExtractInfo { url } => Some(json!({ "url": url })),
            ApiRequest::AddDownload {
                url,
                format_id,
                quality,
            } => Some(json!({
                "url": url,
                "format_id": format_id,
                "quality": quality,
            })),
            _ => None,
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Body of a successful command response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Acknowledgement {
    pub message: Option<String>,
    pub download_id: Option<JobId>,
    pub playlist_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollKind {
    FullRefresh,
    Progress,
}

impl fmt::Display for PollKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollKind::FullRefresh => f.write_str("full refresh"),
            PollKind::Progress => f.write_str("progress"),
        }
    }
}

/// A user command, as reported back through session events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze { url: String },
    AddDownload { url: String },
    Job { job_id: JobId, action: JobAction },
    ClearCompleted,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Analyze { url } => write!(f, "analyze {url}"),
            Command::AddDownload { url } => write!(f, "add {url}"),
            Command::Job { job_id, action } => write!(f, "{action} job {job_id}"),
            Command::ClearCompleted => f.write_str("clear completed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SnapshotApplied {
        jobs: usize,
        playlists: usize,
    },
    TickApplied {
        job_id: JobId,
    },
    PollFailed {
        kind: PollKind,
        reason: String,
        retry_penalty_ms: u64,
    },
    Anomaly(StatusAnomaly),
    OptimisticExpired {
        job_id: JobId,
        intended: JobStatus,
    },
    ActionSucceeded {
        command: Command,
        message: Option<String>,
    },
    ActionFailed {
        command: Command,
        reason: String,
    },
}
