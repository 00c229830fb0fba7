use mediadeck_core::{
    CurrentDownload, FormatOption, FullSnapshot, Job, JobId, JobStatus, MediaInfo, PlaylistId,
    PlaylistInfo, PlaylistRecord, ProgressTick, QueueStatus, VideoInfo,
};
use mediadeck_logging::deck_warn;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{Acknowledgement, ApiResponse, ClientError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("expected a JSON object at the top level")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` has an unexpected shape: {message}")]
    InvalidField { field: &'static str, message: String },
}

/// Outcome of one progress poll. Heartbeats and backend errors carry no update.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressPoll {
    Update(ProgressTick),
    Heartbeat,
    BackendError(String),
}

#[derive(Deserialize)]
struct WireJob {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    platform: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    quality: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    progress: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    download_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    eta: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    file_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    downloaded_bytes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    error_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    filename: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    playlist_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    playlist_index: Option<f64>,
}

#[derive(Deserialize)]
struct WirePlaylist {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    platform: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    total_videos: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    status: Option<String>,
}

#[derive(Deserialize)]
struct WireQueueStatus {
    #[serde(default, deserialize_with = "lenient_number")]
    queue_size: Option<f64>,
    #[serde(default)]
    active: Option<Value>,
    #[serde(default)]
    current_download: Option<Value>,
}

#[derive(Deserialize)]
struct WireCurrent {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    url: Option<String>,
}

#[derive(Deserialize)]
struct WireTick {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    progress: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    download_speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    eta: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    file_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    downloaded_bytes: Option<f64>,
}

#[derive(Deserialize)]
struct WireMedia {
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    extractor: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    view_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    uploader: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    formats: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    entries: Vec<Value>,
}

#[derive(Deserialize)]
struct WireFormat {
    #[serde(default, deserialize_with = "lenient_id")]
    format_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    ext: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    quality: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    filesize: Option<f64>,
}

#[derive(Deserialize, Default)]
struct WireAck {
    #[serde(default, deserialize_with = "lenient_text")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    download_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    playlist_id: Option<String>,
}

/// Decode the `/api/downloads` payload.
///
/// A payload that is not an object, or lacks `queue_status` or `downloads`,
/// is rejected as a whole so the caller keeps its previous state. Individual
/// entries without a usable id are skipped.
pub fn decode_full_snapshot(body: &[u8]) -> Result<FullSnapshot, DecodeError> {
    let mut root = parse_object(body)?;

    let queue = match root.remove("queue_status") {
        Some(value @ Value::Object(_)) => value,
        Some(Value::Null) | None => return Err(DecodeError::MissingField("queue_status")),
        Some(other) => return Err(invalid("queue_status", &other)),
    };
    let queue: WireQueueStatus = serde_json::from_value(queue).map_err(|err| {
        DecodeError::InvalidField {
            field: "queue_status",
            message: err.to_string(),
        }
    })?;

    let entries = match root.remove("downloads") {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => return Err(DecodeError::MissingField("downloads")),
        Some(other) => return Err(invalid("downloads", &other)),
    };
    let playlist_entries = match root.remove("playlists") {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => return Err(invalid("playlists", &other)),
    };

    let jobs = entries.into_iter().filter_map(decode_job).collect();
    let playlists = playlist_entries
        .into_iter()
        .filter_map(decode_playlist)
        .collect();

    Ok(FullSnapshot {
        queue_status: QueueStatus {
            queue_size: queue.queue_size.and_then(to_u32).unwrap_or(0),
            current_download: queue.current_download.and_then(decode_current),
            worker_active: queue.active.as_ref().and_then(Value::as_bool),
        },
        jobs,
        playlists,
    })
}

/// Decode the `/api/progress_stream` payload.
pub fn decode_progress(body: &[u8]) -> Result<ProgressPoll, DecodeError> {
    let root = parse_object(body)?;

    if let Some(error) = root.get("error") {
        let message = match error {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Ok(ProgressPoll::BackendError(message));
    }
    if root.get("heartbeat").is_some_and(is_truthy) {
        return Ok(ProgressPoll::Heartbeat);
    }

    let tick: WireTick = serde_json::from_value(Value::Object(root)).map_err(|err| {
        DecodeError::InvalidField {
            field: "progress",
            message: err.to_string(),
        }
    })?;
    let id = tick.id.ok_or(DecodeError::MissingField("id"))?;

    Ok(ProgressPoll::Update(ProgressTick {
        id: JobId::new(id),
        progress: tick.progress,
        download_speed: tick.download_speed,
        eta_seconds: tick.eta.and_then(to_u64),
        file_size_bytes: tick.file_size.and_then(to_u64),
        downloaded_bytes: tick.downloaded_bytes.and_then(to_u64),
    }))
}

/// Decode the `/api/extract_info` payload into video or playlist metadata.
pub fn decode_media_info(body: &[u8]) -> Result<MediaInfo, DecodeError> {
    let root = parse_object(body)?;
    let media: WireMedia = serde_json::from_value(Value::Object(root)).map_err(|err| {
        DecodeError::InvalidField {
            field: "media",
            message: err.to_string(),
        }
    })?;
    let extractor = media.extractor.unwrap_or_else(|| "unknown".to_string());

    if media.kind.as_deref() == Some("playlist") {
        let entry_titles = media
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_null())
            .map(|(index, entry)| {
                entry
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Video {}", index + 1))
            })
            .collect();
        return Ok(MediaInfo::Playlist(PlaylistInfo {
            title: media.title.unwrap_or_else(|| "Unknown Playlist".to_string()),
            extractor,
            entry_titles,
        }));
    }

    let formats = media
        .formats
        .into_iter()
        .filter_map(|value| serde_json::from_value::<WireFormat>(value).ok())
        .filter_map(|format| {
            Some(FormatOption {
                format_id: format.format_id?,
                ext: format.ext.unwrap_or_else(|| "unknown".to_string()),
                height: format.height.and_then(to_u32),
                quality: format.quality,
                filesize: format.filesize.and_then(to_u64),
            })
        })
        .collect();

    Ok(MediaInfo::Video(VideoInfo {
        title: media.title.unwrap_or_else(|| "Unknown Video".to_string()),
        extractor,
        duration_seconds: media.duration.filter(|seconds| *seconds >= 0.0),
        view_count: media.view_count.and_then(to_u64),
        uploader: media.uploader,
        formats,
    }))
}

/// Interpret a command response. Non-2xx is a rejection carrying the
/// backend's `error` text; a 2xx body that is not JSON still counts as an ack.
pub fn decode_ack(response: &ApiResponse) -> Result<Acknowledgement, ClientError> {
    if !response.is_success() {
        return Err(rejection(response));
    }
    let Ok(Value::Object(root)) = serde_json::from_slice::<Value>(&response.body) else {
        return Ok(Acknowledgement::default());
    };
    let ack: WireAck = serde_json::from_value(Value::Object(root)).unwrap_or_default();
    Ok(Acknowledgement {
        message: ack.message,
        download_id: ack.download_id.map(JobId::new),
        playlist_id: ack.playlist_id,
    })
}

pub(crate) fn rejection(response: &ApiResponse) -> ClientError {
    let message = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("http status {}", response.status));
    ClientError::ActionRejected {
        status: response.status,
        message,
    }
}

fn decode_job(entry: Value) -> Option<Job> {
    let wire: WireJob = match serde_json::from_value(entry) {
        Ok(wire) => wire,
        Err(err) => {
            deck_warn!("Skipping malformed download entry: {}", err);
            return None;
        }
    };
    let Some(id) = wire.id else {
        deck_warn!("Skipping download entry without an id");
        return None;
    };
    let status = wire
        .status
        .as_deref()
        .map(JobStatus::from_wire)
        .unwrap_or(JobStatus::Unknown);

    Some(Job {
        id: JobId::new(id),
        url: wire.url.unwrap_or_default(),
        title: wire.title.unwrap_or_else(|| "Unknown Video".to_string()),
        platform: wire.platform.unwrap_or_else(|| "unknown".to_string()),
        requested_quality: wire.quality,
        status,
        progress_percent: wire.progress,
        download_speed: wire.download_speed,
        eta_seconds: wire.eta.and_then(to_u64),
        file_size_bytes: wire.file_size.and_then(to_u64),
        downloaded_bytes: wire.downloaded_bytes.and_then(to_u64),
        error_message: wire.error_message.filter(|_| status == JobStatus::Failed),
        filename: wire.filename,
        playlist_id: wire.playlist_id.map(PlaylistId::new),
        playlist_index: wire.playlist_index.and_then(to_u32),
    })
}

fn decode_playlist(entry: Value) -> Option<PlaylistRecord> {
    let wire: WirePlaylist = match serde_json::from_value(entry) {
        Ok(wire) => wire,
        Err(err) => {
            deck_warn!("Skipping malformed playlist entry: {}", err);
            return None;
        }
    };
    let Some(id) = wire.id else {
        deck_warn!("Skipping playlist entry without an id");
        return None;
    };
    Some(PlaylistRecord {
        id: PlaylistId::new(id),
        title: wire.title.unwrap_or_else(|| "Unknown Playlist".to_string()),
        platform: wire.platform.unwrap_or_else(|| "unknown".to_string()),
        url: wire.url,
        total_videos: wire.total_videos.and_then(to_u32),
        reported_status: wire
            .status
            .as_deref()
            .map(JobStatus::from_wire)
            .unwrap_or(JobStatus::Unknown),
    })
}

fn decode_current(value: Value) -> Option<CurrentDownload> {
    if !value.is_object() {
        return None;
    }
    let wire: WireCurrent = serde_json::from_value(value).ok()?;
    Some(CurrentDownload {
        id: JobId::new(wire.id?),
        title: wire.title,
        url: wire.url,
    })
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(root)) => Ok(root),
        Ok(_) => Err(DecodeError::NotAnObject),
        Err(err) => Err(DecodeError::InvalidJson(err.to_string())),
    }
}

fn invalid(field: &'static str, value: &Value) -> DecodeError {
    DecodeError::InvalidField {
        field,
        message: format!("unexpected value {value}"),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Null => false,
        _ => true,
    }
}

fn to_u64(value: f64) -> Option<u64> {
    (value >= 0.0).then(|| value.round() as u64)
}

fn to_u32(value: f64) -> Option<u32> {
    to_u64(value).map(|value| value.min(u64::from(u32::MAX)) as u32)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = value.and_then(|value| match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    });
    Ok(number.filter(|number| number.is_finite()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => match number.as_u64() {
            Some(whole) => Some(whole.to_string()),
            None => number.as_i64().map(|signed| signed.to_string()),
        },
        _ => None,
    }))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items),
        _ => Ok(Vec::new()),
    }
}
