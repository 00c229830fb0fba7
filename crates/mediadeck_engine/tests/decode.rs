mod common;

use common::init_logging;
use mediadeck_core::{JobId, JobStatus, MediaInfo, PlaylistId, ProgressTick};
use mediadeck_engine::{
    decode_ack, decode_full_snapshot, decode_media_info, decode_progress, ApiResponse,
    ClientError, DecodeError, ProgressPoll,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn bytes(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

#[test]
fn full_snapshot_decodes_jobs_playlists_and_queue() {
    init_logging();
    let body = bytes(json!({
        "downloads": [
            {
                "id": 3,
                "url": "https://example.com/a",
                "title": "Clip",
                "platform": "youtube",
                "quality": "1080p",
                "file_size": 2048,
                "downloaded_bytes": 1024,
                "status": "downloading",
                "error_message": "stale text",
                "download_speed": 512.5,
                "eta": 12,
                "playlist_id": "pl-1",
                "playlist_index": 2,
                "progress": 50.0
            },
            {
                "id": "9",
                "title": "Broken",
                "status": "FAILED",
                "error_message": "HTTP Error 403"
            }
        ],
        "playlists": [
            {
                "id": "pl-1",
                "title": "Mix",
                "url": "https://example.com/list",
                "platform": "youtube",
                "total_videos": 4,
                "downloaded_videos": 1,
                "status": "downloading",
                "progress": 25.0
            }
        ],
        "queue_status": {
            "active": true,
            "queue_size": 2,
            "current_download": {"id": 3, "title": "Clip", "url": "https://example.com/a"}
        }
    }));

    let snapshot = decode_full_snapshot(&body).expect("decodes");

    assert_eq!(snapshot.jobs.len(), 2);
    let first = &snapshot.jobs[0];
    assert_eq!(first.id, JobId::from(3));
    assert_eq!(first.status, JobStatus::Downloading);
    assert_eq!(first.progress_percent, Some(50.0));
    assert_eq!(first.download_speed, Some(512.5));
    assert_eq!(first.eta_seconds, Some(12));
    assert_eq!(first.file_size_bytes, Some(2048));
    assert_eq!(first.requested_quality.as_deref(), Some("1080p"));
    assert_eq!(first.playlist_id, Some(PlaylistId::from("pl-1")));
    assert_eq!(first.playlist_index, Some(2));
    assert_eq!(first.error_message, None);

    let second = &snapshot.jobs[1];
    assert_eq!(second.id, JobId::from(9));
    assert_eq!(second.status, JobStatus::Failed);
    assert_eq!(second.error_message.as_deref(), Some("HTTP Error 403"));
    assert_eq!(second.platform, "unknown");
    assert_eq!(second.progress_percent, None);

    assert_eq!(snapshot.playlists.len(), 1);
    assert_eq!(snapshot.playlists[0].total_videos, Some(4));
    assert_eq!(snapshot.playlists[0].reported_status, JobStatus::Downloading);

    assert_eq!(snapshot.queue_status.queue_size, 2);
    assert_eq!(snapshot.queue_status.worker_active, Some(true));
    let current = snapshot.queue_status.current_download.expect("current");
    assert_eq!(current.id, JobId::from(3));
    assert_eq!(current.title.as_deref(), Some("Clip"));
}

#[test]
fn unknown_status_and_missing_numbers_are_tolerated() {
    init_logging();
    let body = bytes(json!({
        "downloads": [
            {"id": 1, "status": "exploded", "eta": null, "file_size": null},
            {"id": 2, "status": "queued"},
            {"id": 3, "status": "cancelled"},
            {"id": 4}
        ],
        "queue_status": {"queue_size": null, "current_download": null}
    }));

    let snapshot = decode_full_snapshot(&body).expect("decodes");
    let statuses: Vec<JobStatus> = snapshot.jobs.iter().map(|job| job.status).collect();
    assert_eq!(
        statuses,
        vec![
            JobStatus::Unknown,
            JobStatus::Pending,
            JobStatus::Canceled,
            JobStatus::Unknown
        ]
    );
    assert_eq!(snapshot.jobs[0].eta_seconds, None);
    assert_eq!(snapshot.jobs[0].file_size_bytes, None);
    assert_eq!(snapshot.queue_status.queue_size, 0);
    assert!(snapshot.queue_status.current_download.is_none());
    assert!(snapshot.playlists.is_empty());
}

#[test]
fn entries_without_usable_id_are_skipped() {
    init_logging();
    let body = bytes(json!({
        "downloads": [
            {"title": "no id", "status": "pending"},
            {"id": "", "status": "pending"},
            {"id": true, "status": "pending"},
            "not an object",
            {"id": 5, "status": "completed"}
        ],
        "playlists": [{"title": "no id"}],
        "queue_status": {"queue_size": 0}
    }));

    let snapshot = decode_full_snapshot(&body).expect("decodes");
    let ids: Vec<&str> = snapshot.jobs.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(ids, vec!["5"]);
    assert!(snapshot.playlists.is_empty());
}

#[test]
fn malformed_top_level_payloads_are_rejected() {
    init_logging();
    assert!(matches!(
        decode_full_snapshot(b"not json"),
        Err(DecodeError::InvalidJson(_))
    ));
    assert_eq!(
        decode_full_snapshot(&bytes(json!([1, 2, 3]))),
        Err(DecodeError::NotAnObject)
    );
    assert_eq!(
        decode_full_snapshot(&bytes(json!({"downloads": []}))),
        Err(DecodeError::MissingField("queue_status"))
    );
    assert_eq!(
        decode_full_snapshot(&bytes(json!({"queue_status": {"queue_size": 0}}))),
        Err(DecodeError::MissingField("downloads"))
    );
    assert!(matches!(
        decode_full_snapshot(&bytes(json!({"downloads": {}, "queue_status": {}}))),
        Err(DecodeError::InvalidField {
            field: "downloads",
            ..
        })
    ));
}

#[test]
fn progress_payload_variants() {
    init_logging();
    assert_eq!(
        decode_progress(&bytes(json!({"heartbeat": true}))),
        Ok(ProgressPoll::Heartbeat)
    );
    assert_eq!(
        decode_progress(&bytes(json!({"error": "database is locked"}))),
        Ok(ProgressPoll::BackendError("database is locked".to_string()))
    );
    assert_eq!(
        decode_progress(&bytes(json!({
            "id": 4,
            "progress": 42.5,
            "downloaded_bytes": 4_456_448,
            "file_size": 10_485_760,
            "download_speed": 1_048_576.0,
            "eta": 6,
            "status": "downloading"
        }))),
        Ok(ProgressPoll::Update(ProgressTick {
            id: JobId::from(4),
            progress: Some(42.5),
            download_speed: Some(1_048_576.0),
            eta_seconds: Some(6),
            file_size_bytes: Some(10_485_760),
            downloaded_bytes: Some(4_456_448),
        }))
    );
    assert_eq!(
        decode_progress(&bytes(json!({"progress": 3.0}))),
        Err(DecodeError::MissingField("id"))
    );
}

#[test]
fn video_media_info_keeps_formats() {
    init_logging();
    let body = bytes(json!({
        "type": "video",
        "title": "Talk",
        "extractor": "youtube",
        "duration": 212.0,
        "view_count": 1234,
        "uploader": "Someone",
        "formats": [
            {"format_id": "22", "ext": "mp4", "height": 720, "quality": "HD (720p)", "filesize": 1_572_864},
            {"format_id": "140", "ext": "m4a", "quality": "Good Audio (128 kbps)"},
            {"ext": "webm"}
        ]
    }));

    let MediaInfo::Video(video) = decode_media_info(&body).expect("decodes") else {
        panic!("expected video");
    };
    assert_eq!(video.title, "Talk");
    assert_eq!(video.view_count, Some(1234));
    assert_eq!(video.duration_seconds, Some(212.0));
    let labels: Vec<String> = video.formats.iter().map(|format| format.label()).collect();
    assert_eq!(
        labels,
        vec!["720p - mp4 (1.5 MB)", "Good Audio (128 kbps) - m4a"]
    );
}

#[test]
fn playlist_media_info_counts_entries() {
    init_logging();
    let body = bytes(json!({
        "type": "playlist",
        "title": "Mix",
        "extractor": "youtube:tab",
        "entries": [{"title": "One"}, {"url": "https://example.com/2"}, null]
    }));

    let info = decode_media_info(&body).expect("decodes");
    assert_eq!(info.title(), "Mix");
    let MediaInfo::Playlist(playlist) = info else {
        panic!("expected playlist");
    };
    assert_eq!(playlist.entry_count(), 2);
    assert_eq!(playlist.entry_titles, vec!["One", "Video 2"]);
}

#[test]
fn ack_and_rejection_bodies() {
    init_logging();
    let ok = ApiResponse {
        status: 200,
        body: bytes(json!({"message": "Video added to download queue", "download_id": 12})),
    };
    let ack = decode_ack(&ok).expect("ack");
    assert_eq!(ack.message.as_deref(), Some("Video added to download queue"));
    assert_eq!(ack.download_id, Some(JobId::from(12)));

    let empty = ApiResponse {
        status: 204,
        body: Vec::new(),
    };
    assert_eq!(decode_ack(&empty).expect("ack").message, None);

    let rejected = ApiResponse {
        status: 500,
        body: bytes(json!({"error": "Download not found"})),
    };
    assert_eq!(
        decode_ack(&rejected),
        Err(ClientError::ActionRejected {
            status: 500,
            message: "Download not found".to_string(),
        })
    );

    let bare = ApiResponse {
        status: 404,
        body: b"<html>missing</html>".to_vec(),
    };
    assert_eq!(
        decode_ack(&bare),
        Err(ClientError::ActionRejected {
            status: 404,
            message: "http status 404".to_string(),
        })
    );
}
