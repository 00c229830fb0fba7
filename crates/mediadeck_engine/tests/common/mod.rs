#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use mediadeck_engine::{ChannelEventSink, ClientConfig, SessionEvent};
use serde_json::{json, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mediadeck_logging::initialize_for_tests);
}

/// Config whose periodic polls never fire during a test: only the initial
/// poll and explicit triggers reach the server.
pub fn quiet_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        full_refresh_interval: Duration::from_secs(3_600),
        progress_interval: Duration::from_secs(3_600),
        backoff_step: Duration::from_millis(5),
        backoff_ceiling: Duration::from_millis(20),
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::with_base_url(base_url)
    }
}

pub fn channel_sink() -> (Arc<ChannelEventSink>, UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelEventSink::new(tx)), rx)
}

pub async fn next_event<F>(rx: &mut UnboundedReceiver<SessionEvent>, mut matches: F) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    let wait = async {
        loop {
            match rx.recv().await {
                Some(event) if matches(&event) => return event,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("timed out waiting for session event")
}

pub async fn wait_for<F>(what: &str, mut condition: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn download(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "url": format!("https://example.com/watch/{id}"),
        "title": format!("Video {id}"),
        "platform": "youtube",
        "quality": "720p",
        "file_size": 10_485_760,
        "downloaded_bytes": 1_048_576,
        "status": status,
        "error_message": null,
        "filename": null,
        "download_speed": 2048.0,
        "eta": 30,
        "playlist_id": null,
        "playlist_index": null,
        "progress": 10.0
    })
}

pub fn downloads_body(downloads: Vec<Value>) -> Value {
    json!({
        "downloads": downloads,
        "playlists": [],
        "queue_status": {
            "active": true,
            "queue_size": 0,
            "current_download": null
        }
    })
}
