//! Mediadeck core: pure reconciliation store and view-model helpers.
mod effect;
mod format;
mod job;
mod media;
mod msg;
mod snapshot;
mod status;
mod store;
mod update;
mod view_model;

pub use effect::{Effect, StatusAnomaly};
pub use format::{format_bytes, format_duration, format_eta, format_speed};
pub use job::{CurrentDownload, Job, JobId, Playlist, PlaylistId, QueueStatus};
pub use media::{FormatOption, MediaInfo, PlaylistInfo, VideoInfo};
pub use msg::Msg;
pub use snapshot::{FullSnapshot, PlaylistRecord, ProgressTick};
pub use status::{JobAction, JobStatus, StatusDisplay, Tone};
pub use store::{ClearBatch, PendingTransition, ReconciliationStore, DEFAULT_OPTIMISTIC_WINDOW};
pub use update::update;
pub use view_model::{CurrentDownloadView, JobRowView, PlaylistView, QueueCounters, QueueView};
