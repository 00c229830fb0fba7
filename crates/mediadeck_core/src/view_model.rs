use crate::format::{format_bytes, format_eta, format_speed};
use crate::{Job, JobAction, JobId, JobStatus, Playlist, PlaylistId, ReconciliationStore, Tone};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueCounters {
    /// Reported by the backend.
    pub queue_size: u32,
    /// Visible jobs whose effective status is Downloading.
    pub active: usize,
    /// Visible jobs whose effective status is Completed.
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueueView {
    pub counters: QueueCounters,
    pub worker_active: Option<bool>,
    pub current: Option<CurrentDownloadView>,
    /// Jobs that do not belong to a known playlist, in backend order.
    pub jobs: Vec<JobRowView>,
    pub playlists: Vec<PlaylistView>,
    pub pending_actions: usize,
    pub snapshots_applied: u64,
}

impl QueueView {
    /// Row for `job_id` whether it is standalone or inside a playlist.
    pub fn find_job(&self, job_id: &JobId) -> Option<&JobRowView> {
        self.jobs
            .iter()
            .chain(self.playlists.iter().flat_map(|playlist| playlist.items.iter()))
            .find(|row| &row.job_id == job_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub title: String,
    /// `platform • quality`
    pub subtitle: String,
    pub status: JobStatus,
    pub status_label: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
    /// Status comes from an unconfirmed user action.
    pub optimistic: bool,
    pub progress_percent: u8,
    pub show_progress: bool,
    pub speed: String,
    pub eta: String,
    pub size: String,
    pub error: Option<String>,
    pub playlist_label: Option<String>,
    pub actions: Vec<JobAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistView {
    pub playlist_id: PlaylistId,
    pub title: String,
    pub subtitle: String,
    pub status: JobStatus,
    pub status_label: &'static str,
    pub tone: Tone,
    pub downloaded_videos: u32,
    pub total_videos: u32,
    pub progress_percent: u8,
    pub summary: String,
    /// Member jobs ordered by playlist index.
    pub items: Vec<JobRowView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentDownloadView {
    pub job_id: JobId,
    pub title: String,
    pub url: String,
    pub progress_percent: u8,
    pub speed: String,
    pub eta: String,
    pub size: String,
}

impl ReconciliationStore {
    /// Render-ready projection of the current state. Deterministic: equal
    /// stores always yield equal views.
    pub fn view(&self) -> QueueView {
        let mut counters = QueueCounters {
            queue_size: self.queue.queue_size,
            ..QueueCounters::default()
        };
        let mut jobs = Vec::new();
        let mut members: Vec<(PlaylistId, Option<u32>, JobRowView)> = Vec::new();

        for job_id in &self.order {
            if self.hidden.contains_key(job_id) {
                continue;
            }
            let Some(job) = self.jobs.get(job_id) else {
                continue;
            };
            let row = self.job_row(job);
            counters.total += 1;
            match row.status {
                JobStatus::Downloading => counters.active += 1,
                JobStatus::Completed => counters.completed += 1,
                _ => {}
            }
            match job
                .playlist_id
                .as_ref()
                .filter(|id| self.playlists.contains_key(*id))
            {
                Some(playlist_id) => members.push((playlist_id.clone(), job.playlist_index, row)),
                None => jobs.push(row),
            }
        }

        let playlists = self
            .playlist_order
            .iter()
            .filter_map(|id| self.playlists.get(id))
            .map(|playlist| playlist_view(playlist, &members))
            .collect();

        QueueView {
            counters,
            worker_active: self.queue.worker_active,
            current: self.current_view(),
            jobs,
            playlists,
            pending_actions: self.pending.len(),
            snapshots_applied: self.snapshots_applied(),
        }
    }

    fn job_row(&self, job: &Job) -> JobRowView {
        let pending = self.pending.get(&job.id);
        let status = pending.map(|p| p.intended).unwrap_or(job.status);
        let display = status.display();
        let subtitle = match job.requested_quality.as_deref() {
            Some(quality) => format!("{} • {}", job.platform, quality),
            None => job.platform.clone(),
        };
        let error = if status == JobStatus::Failed {
            job.error_message.clone()
        } else {
            None
        };

        JobRowView {
            job_id: job.id.clone(),
            title: job.title.clone(),
            subtitle,
            status,
            status_label: display.label,
            icon: display.icon,
            tone: display.tone,
            optimistic: pending.is_some(),
            progress_percent: round_percent(job.progress_percent.unwrap_or(0.0)),
            show_progress: matches!(status, JobStatus::Downloading | JobStatus::Completed),
            speed: format_speed(job.download_speed),
            eta: format_eta(job.eta_seconds),
            size: format_bytes(job.file_size_bytes),
            error,
            playlist_label: job
                .playlist_id
                .as_ref()
                .map(|_| match job.playlist_index {
                    Some(index) => format!("Playlist item {index}"),
                    None => "Playlist item".to_string(),
                }),
            actions: JobAction::available_for(status).to_vec(),
        }
    }

    fn current_view(&self) -> Option<CurrentDownloadView> {
        let current = self.queue.current_download.as_ref()?;
        let job = self.jobs.get(&current.id);
        Some(CurrentDownloadView {
            job_id: current.id.clone(),
            title: current
                .title
                .clone()
                .or_else(|| job.map(|job| job.title.clone()))
                .unwrap_or_default(),
            url: current
                .url
                .clone()
                .or_else(|| job.map(|job| job.url.clone()))
                .unwrap_or_default(),
            progress_percent: round_percent(
                job.and_then(|job| job.progress_percent).unwrap_or(0.0),
            ),
            speed: format_speed(job.and_then(|job| job.download_speed)),
            eta: format_eta(job.and_then(|job| job.eta_seconds)),
            size: format_bytes(job.and_then(|job| job.file_size_bytes)),
        })
    }
}

fn playlist_view(
    playlist: &Playlist,
    members: &[(PlaylistId, Option<u32>, JobRowView)],
) -> PlaylistView {
    let mut items: Vec<(Option<u32>, JobRowView)> = members
        .iter()
        .filter(|(id, _, _)| *id == playlist.id)
        .map(|(_, index, row)| (*index, row.clone()))
        .collect();
    // Stable sort keeps backend order for equal or missing indices.
    items.sort_by_key(|(index, _)| index.unwrap_or(u32::MAX));

    let display = playlist.status.display();
    let percent = round_percent(playlist.progress_percent);
    PlaylistView {
        playlist_id: playlist.id.clone(),
        title: playlist.title.clone(),
        subtitle: format!(
            "{} • {}/{} videos",
            playlist.platform, playlist.downloaded_videos, playlist.total_videos
        ),
        status: playlist.status,
        status_label: display.label,
        tone: display.tone,
        downloaded_videos: playlist.downloaded_videos,
        total_videos: playlist.total_videos,
        progress_percent: percent,
        summary: format!(
            "Progress: {}% ({} of {} videos completed)",
            percent, playlist.downloaded_videos, playlist.total_videos
        ),
        items: items.into_iter().map(|(_, row)| row).collect(),
    }
}

fn round_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}
