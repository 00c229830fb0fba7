#![allow(dead_code)]

use std::sync::Once;

use mediadeck_core::{
    CurrentDownload, FullSnapshot, Job, JobId, JobStatus, PlaylistId, PlaylistRecord,
    ProgressTick, QueueStatus,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mediadeck_logging::initialize_for_tests);
}

pub fn job(id: u64, status: JobStatus) -> Job {
    Job {
        id: JobId::from(id),
        url: format!("https://example.com/watch/{id}"),
        title: format!("Video {id}"),
        platform: "youtube".to_string(),
        requested_quality: Some("720p".to_string()),
        status,
        error_message: (status == JobStatus::Failed).then(|| "network unreachable".to_string()),
        ..Job::default()
    }
}

pub fn playlist_job(id: u64, status: JobStatus, playlist: &str, index: u32) -> Job {
    Job {
        playlist_id: Some(PlaylistId::from(playlist)),
        playlist_index: Some(index),
        ..job(id, status)
    }
}

pub fn playlist(id: &str, total: u32) -> PlaylistRecord {
    PlaylistRecord {
        id: PlaylistId::from(id),
        title: format!("Playlist {id}"),
        platform: "youtube".to_string(),
        url: None,
        total_videos: Some(total),
        reported_status: JobStatus::Pending,
    }
}

pub fn snapshot(jobs: Vec<Job>) -> FullSnapshot {
    FullSnapshot {
        queue_status: QueueStatus {
            queue_size: jobs
                .iter()
                .filter(|job| job.status == JobStatus::Pending)
                .count() as u32,
            current_download: jobs
                .iter()
                .find(|job| job.status == JobStatus::Downloading)
                .map(|job| CurrentDownload {
                    id: job.id.clone(),
                    title: Some(job.title.clone()),
                    url: Some(job.url.clone()),
                }),
            worker_active: Some(true),
        },
        jobs,
        playlists: Vec::new(),
    }
}

pub fn tick(id: u64, progress: f64) -> ProgressTick {
    ProgressTick {
        id: JobId::from(id),
        progress: Some(progress),
        download_speed: Some(1_572_864.0),
        eta_seconds: Some(65),
        file_size_bytes: Some(10_485_760),
        downloaded_bytes: None,
    }
}
