use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::{
    Effect, FullSnapshot, Job, JobAction, JobId, JobStatus, Playlist, PlaylistId, PlaylistRecord,
    ProgressTick, QueueStatus, StatusAnomaly,
};

/// How long an unconfirmed optimistic transition may mask backend state.
pub const DEFAULT_OPTIMISTIC_WINDOW: Duration = Duration::from_secs(15);

/// A client-initiated transition the backend has not confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub action: JobAction,
    pub intended: JobStatus,
    pub recorded_at: Instant,
}

/// Identifies the jobs hidden by one clear-completed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClearBatch(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HiddenEntry {
    pub(crate) batch: ClearBatch,
    pub(crate) hidden_at: Instant,
}

/// Current authoritative view of all jobs, playlists and queue counters,
/// plus the overlay of optimistic client-side changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationStore {
    pub(crate) jobs: BTreeMap<JobId, Job>,
    /// Job ids in backend order.
    pub(crate) order: Vec<JobId>,
    pub(crate) playlists: BTreeMap<PlaylistId, Playlist>,
    pub(crate) playlist_order: Vec<PlaylistId>,
    pub(crate) queue: QueueStatus,
    pub(crate) pending: BTreeMap<JobId, PendingTransition>,
    /// Completed jobs hidden by an unconfirmed clear-completed.
    pub(crate) hidden: BTreeMap<JobId, HiddenEntry>,
    next_clear_batch: u64,
    optimistic_window: Duration,
    snapshots_applied: u64,
}

impl Default for ReconciliationStore {
    fn default() -> Self {
        Self::with_optimistic_window(DEFAULT_OPTIMISTIC_WINDOW)
    }
}

impl ReconciliationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_optimistic_window(window: Duration) -> Self {
        Self {
            jobs: BTreeMap::new(),
            order: Vec::new(),
            playlists: BTreeMap::new(),
            playlist_order: Vec::new(),
            queue: QueueStatus::default(),
            pending: BTreeMap::new(),
            hidden: BTreeMap::new(),
            next_clear_batch: 0,
            optimistic_window: window,
            snapshots_applied: 0,
        }
    }

    /// Replace all jobs and playlists with the snapshot's contents.
    ///
    /// Jobs missing from the snapshot are dropped. Pending optimistic
    /// transitions survive only while the snapshot still reports the state
    /// the command moves away from, and never beyond the optimistic window.
    pub fn apply_full_snapshot(&mut self, snapshot: FullSnapshot, now: Instant) -> Vec<Effect> {
        let FullSnapshot {
            queue_status,
            jobs,
            playlists,
        } = snapshot;
        let mut effects = Vec::new();

        let mut next_jobs = BTreeMap::new();
        let mut order = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            if next_jobs.contains_key(&job.id) {
                continue;
            }
            if let Some(prev) = self.jobs.get(&job.id) {
                if let Some(anomaly) = detect_anomaly(prev, &job) {
                    effects.push(Effect::StatusAnomaly(anomaly));
                }
                carry_progress(prev, &mut job);
            }
            order.push(job.id.clone());
            next_jobs.insert(job.id.clone(), job);
        }

        let window = self.optimistic_window;
        self.pending.retain(|job_id, pending| {
            let Some(job) = next_jobs.get(job_id) else {
                return false;
            };
            if job.status == pending.intended {
                return false;
            }
            if now.saturating_duration_since(pending.recorded_at) >= window {
                effects.push(Effect::OptimisticExpired {
                    job_id: job_id.clone(),
                    intended: pending.intended,
                });
                return false;
            }
            job.status.can_transition_to(pending.intended)
        });

        self.hidden.retain(|job_id, entry| {
            let still_completed = next_jobs
                .get(job_id)
                .is_some_and(|job| job.status == JobStatus::Completed);
            still_completed && now.saturating_duration_since(entry.hidden_at) < window
        });

        let (playlists, playlist_order) = derive_playlists(playlists, &next_jobs);
        self.playlists = playlists;
        self.playlist_order = playlist_order;
        self.jobs = next_jobs;
        self.order = order;
        self.queue = queue_status;
        self.snapshots_applied += 1;
        effects
    }

    /// Update the numeric progress fields of a downloading job in place.
    ///
    /// Returns `false` and leaves the store untouched when the job is unknown
    /// or not currently Downloading.
    pub fn apply_progress_tick(&mut self, tick: ProgressTick) -> bool {
        if self.effective_status(&tick.id) != Some(JobStatus::Downloading) {
            return false;
        }
        let Some(job) = self.jobs.get_mut(&tick.id) else {
            return false;
        };

        job.progress_percent = max_progress(job.progress_percent, tick.progress);
        if tick.download_speed.is_some() {
            job.download_speed = tick.download_speed;
        }
        if tick.eta_seconds.is_some() {
            job.eta_seconds = tick.eta_seconds;
        }
        if tick.file_size_bytes.is_some() {
            job.file_size_bytes = tick.file_size_bytes;
        }
        if tick.downloaded_bytes.is_some() {
            job.downloaded_bytes = tick.downloaded_bytes;
        }
        true
    }

    /// Mark a client-initiated transition as pending. Returns `false` for an
    /// unknown job.
    pub fn record_optimistic(&mut self, job_id: &JobId, action: JobAction, now: Instant) -> bool {
        if !self.jobs.contains_key(job_id) {
            return false;
        }
        self.pending.insert(
            job_id.clone(),
            PendingTransition {
                action,
                intended: action.target_status(),
                recorded_at: now,
            },
        );
        true
    }

    /// Drop the pending entry recorded for `action`, if it is still the
    /// latest one for this job.
    pub fn rollback_optimistic(&mut self, job_id: &JobId, action: JobAction) -> bool {
        match self.pending.get(job_id) {
            Some(pending) if pending.action == action => {
                self.pending.remove(job_id);
                true
            }
            _ => false,
        }
    }

    /// Hide every job that is currently Completed and not hidden already.
    /// Returns the batch those jobs belong to and how many there were.
    pub fn hide_completed(&mut self, now: Instant) -> (ClearBatch, usize) {
        self.next_clear_batch += 1;
        let batch = ClearBatch(self.next_clear_batch);
        let completed: Vec<JobId> = self
            .order
            .iter()
            .filter(|id| !self.hidden.contains_key(*id))
            .filter(|id| self.effective_status(id) == Some(JobStatus::Completed))
            .cloned()
            .collect();
        let count = completed.len();
        for job_id in completed {
            self.hidden.insert(
                job_id,
                HiddenEntry {
                    batch,
                    hidden_at: now,
                },
            );
        }
        (batch, count)
    }

    /// Undo one `hide_completed` batch. Jobs hidden by other clears stay
    /// hidden. Returns how many jobs became visible again.
    pub fn restore_hidden(&mut self, batch: ClearBatch) -> usize {
        let before = self.hidden.len();
        self.hidden.retain(|_, entry| entry.batch != batch);
        before - self.hidden.len()
    }

    pub fn contains(&self, job_id: &JobId) -> bool {
        self.jobs.contains_key(job_id)
    }

    pub fn job(&self, job_id: &JobId) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    /// Job ids in backend order, including hidden ones.
    pub fn job_ids(&self) -> impl Iterator<Item = &JobId> + '_ {
        self.order.iter()
    }

    /// Status a renderer should show: the pending optimistic target if any,
    /// otherwise the last reported status.
    pub fn effective_status(&self, job_id: &JobId) -> Option<JobStatus> {
        let job = self.jobs.get(job_id)?;
        Some(
            self.pending
                .get(job_id)
                .map(|pending| pending.intended)
                .unwrap_or(job.status),
        )
    }

    pub fn pending(&self, job_id: &JobId) -> Option<&PendingTransition> {
        self.pending.get(job_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_hidden(&self, job_id: &JobId) -> bool {
        self.hidden.contains_key(job_id)
    }

    pub fn playlist(&self, playlist_id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.get(playlist_id)
    }

    pub fn queue_status(&self) -> &QueueStatus {
        &self.queue
    }

    pub fn snapshots_applied(&self) -> u64 {
        self.snapshots_applied
    }

    pub fn optimistic_window(&self) -> Duration {
        self.optimistic_window
    }
}

/// Sampling only sees some of the intermediate states, so a change is
/// anomalous only when no path in the transition graph explains it.
fn detect_anomaly(prev: &Job, next: &Job) -> Option<StatusAnomaly> {
    let (from, to) = (prev.status, next.status);
    if from == JobStatus::Unknown || to == JobStatus::Unknown || can_reach(from, to) {
        return None;
    }
    Some(StatusAnomaly {
        job_id: next.id.clone(),
        from,
        to,
    })
}

fn can_reach(from: JobStatus, to: JobStatus) -> bool {
    const ALL: [JobStatus; 6] = [
        JobStatus::Pending,
        JobStatus::Downloading,
        JobStatus::Paused,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Canceled,
    ];
    let mut seen = vec![from];
    let mut frontier = vec![from];
    while let Some(current) = frontier.pop() {
        if current == to {
            return true;
        }
        for next in ALL {
            if current.can_transition_to(next) && !seen.contains(&next) {
                seen.push(next);
                frontier.push(next);
            }
        }
    }
    false
}

fn carry_progress(prev: &Job, next: &mut Job) {
    if prev.status == JobStatus::Downloading && next.status == JobStatus::Downloading {
        next.progress_percent = max_progress(prev.progress_percent, next.progress_percent);
    } else if prev.status == next.status && prev.status.is_frozen() {
        next.progress_percent = prev.progress_percent.or(next.progress_percent);
    }
}

fn max_progress(current: Option<f64>, incoming: Option<f64>) -> Option<f64> {
    match (current, incoming) {
        (Some(current), Some(incoming)) => Some(current.max(incoming)),
        (current, incoming) => current.or(incoming),
    }
}

fn derive_playlists(
    records: Vec<PlaylistRecord>,
    jobs: &BTreeMap<JobId, Job>,
) -> (BTreeMap<PlaylistId, Playlist>, Vec<PlaylistId>) {
    let mut playlists = BTreeMap::new();
    let mut order = Vec::with_capacity(records.len());
    for record in records {
        if playlists.contains_key(&record.id) {
            continue;
        }
        let members: Vec<JobStatus> = jobs
            .values()
            .filter(|job| job.playlist_id.as_ref() == Some(&record.id))
            .map(|job| job.status)
            .collect();

        let total_videos = record
            .total_videos
            .unwrap_or(members.len() as u32);
        let completed = members
            .iter()
            .filter(|status| **status == JobStatus::Completed)
            .count() as u32;
        let downloaded_videos = completed.min(total_videos);
        let progress_percent = if total_videos == 0 {
            0.0
        } else {
            f64::from(downloaded_videos) / f64::from(total_videos) * 100.0
        };

        order.push(record.id.clone());
        playlists.insert(
            record.id.clone(),
            Playlist {
                status: playlist_status(&members, record.reported_status),
                id: record.id,
                title: record.title,
                platform: record.platform,
                url: record.url,
                total_videos,
                downloaded_videos,
                progress_percent,
            },
        );
    }
    (playlists, order)
}

fn playlist_status(members: &[JobStatus], reported: JobStatus) -> JobStatus {
    if members.is_empty() {
        return reported;
    }
    if members.iter().all(|status| *status == JobStatus::Completed) {
        return JobStatus::Completed;
    }
    let in_flight = members
        .iter()
        .any(|status| matches!(status, JobStatus::Downloading | JobStatus::Pending));
    if !in_flight && members.contains(&JobStatus::Failed) {
        return JobStatus::Failed;
    }
    if members
        .iter()
        .any(|status| matches!(status, JobStatus::Downloading | JobStatus::Completed))
    {
        JobStatus::Downloading
    } else {
        JobStatus::Pending
    }
}
