use std::fmt::Write as _;

use mediadeck_core::{format_duration, JobAction, JobRowView, MediaInfo, QueueView};
use mediadeck_engine::{Acknowledgement, SessionEvent};

/// Render the queue as plain text, one job per line.
pub fn render_queue(view: &QueueView) -> String {
    let mut out = String::new();
    let counters = &view.counters;
    let worker = match view.worker_active {
        Some(true) => " | worker running",
        Some(false) => " | worker idle",
        None => "",
    };
    let _ = writeln!(
        out,
        "Queue: {} waiting | {} active | {} completed | {} total{}",
        counters.queue_size, counters.active, counters.completed, counters.total, worker
    );
    if view.pending_actions > 0 {
        let _ = writeln!(out, "Awaiting confirmation: {}", view.pending_actions);
    }

    if let Some(current) = &view.current {
        let _ = writeln!(
            out,
            "Now downloading: {} {}% {} ETA {} ({})",
            current.title, current.progress_percent, current.speed, current.eta, current.size
        );
    }

    if view.jobs.is_empty() && view.playlists.is_empty() {
        out.push_str("\nNo downloads yet.\n");
        return out;
    }

    if !view.jobs.is_empty() {
        out.push('\n');
        for row in &view.jobs {
            render_row(&mut out, row, "");
        }
    }

    for playlist in &view.playlists {
        let _ = writeln!(
            out,
            "\nPlaylist {} [{}] {}",
            playlist.title, playlist.status_label, playlist.subtitle
        );
        let _ = writeln!(out, "  {}", playlist.summary);
        for row in &playlist.items {
            render_row(&mut out, row, "  ");
        }
    }
    out
}

fn render_row(out: &mut String, row: &JobRowView, indent: &str) {
    let marker = if row.optimistic { "*" } else { "" };
    let _ = write!(
        out,
        "{indent}[{}] {}{} {} ({})",
        row.job_id, row.status_label, marker, row.title, row.subtitle
    );
    if let Some(label) = &row.playlist_label {
        let _ = write!(out, " {label}");
    }
    if row.show_progress {
        let _ = write!(
            out,
            " {}% {} ETA {} of {}",
            row.progress_percent, row.speed, row.eta, row.size
        );
    }
    let _ = writeln!(out, " [{}]", action_list(&row.actions));
    if let Some(error) = &row.error {
        let _ = writeln!(out, "{indent}    error: {error}");
    }
}

fn action_list(actions: &[JobAction]) -> String {
    actions
        .iter()
        .map(|action| action.verb())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_media(info: &MediaInfo) -> String {
    let mut out = String::new();
    match info {
        MediaInfo::Video(video) => {
            let _ = writeln!(out, "{} ({})", video.title, video.extractor);
            let _ = writeln!(out, "Duration: {}", format_duration(video.duration_seconds));
            if let Some(uploader) = &video.uploader {
                let _ = writeln!(out, "Uploader: {uploader}");
            }
            if let Some(views) = video.view_count {
                let _ = writeln!(out, "Views: {views}");
            }
            if video.formats.is_empty() {
                out.push_str("No downloadable formats reported.\n");
            } else {
                out.push_str("Formats:\n");
                for format in &video.formats {
                    let _ = writeln!(out, "  {:>8}  {}", format.format_id, format.label());
                }
            }
        }
        MediaInfo::Playlist(playlist) => {
            let _ = writeln!(
                out,
                "Playlist {} ({}): {} videos",
                playlist.title,
                playlist.extractor,
                playlist.entry_count()
            );
            for (index, title) in playlist.entry_titles.iter().enumerate() {
                let _ = writeln!(out, "  {:>3}. {title}", index + 1);
            }
        }
    }
    out
}

pub fn render_ack(ack: &Acknowledgement, fallback: &str) -> String {
    let mut line = ack.message.clone().unwrap_or_else(|| fallback.to_string());
    if let Some(id) = &ack.download_id {
        let _ = write!(line, " (job {id})");
    }
    if let Some(id) = &ack.playlist_id {
        let _ = write!(line, " (playlist {id})");
    }
    line
}

/// One-line notice for events worth showing next to the live view.
pub fn describe_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::PollFailed { kind, reason, .. } => {
            Some(format!("{kind} poll failed: {reason}"))
        }
        SessionEvent::Anomaly(anomaly) => Some(format!("warning: {anomaly}")),
        SessionEvent::OptimisticExpired { job_id, intended } => Some(format!(
            "job {job_id} did not reach {intended}; showing backend status"
        )),
        SessionEvent::ActionSucceeded { command, message } => Some(match message {
            Some(message) => format!("{command}: {message}"),
            None => format!("{command}: done"),
        }),
        SessionEvent::ActionFailed { command, reason } => Some(format!("{command} failed: {reason}")),
        SessionEvent::SnapshotApplied { .. } | SessionEvent::TickApplied { .. } => None,
    }
}
