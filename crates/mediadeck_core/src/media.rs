use crate::format::format_bytes;

/// Result of analysing a URL before it is queued.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaInfo {
    Video(VideoInfo),
    Playlist(PlaylistInfo),
}

impl MediaInfo {
    pub fn title(&self) -> &str {
        match self {
            MediaInfo::Video(video) => &video.title,
            MediaInfo::Playlist(playlist) => &playlist.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub title: String,
    pub extractor: String,
    pub duration_seconds: Option<f64>,
    pub view_count: Option<u64>,
    pub uploader: Option<String>,
    pub formats: Vec<FormatOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistInfo {
    pub title: String,
    pub extractor: String,
    pub entry_titles: Vec<String>,
}

impl PlaylistInfo {
    pub fn entry_count(&self) -> usize {
        self.entry_titles.len()
    }
}

/// One downloadable rendition offered by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOption {
    pub format_id: String,
    pub ext: String,
    pub height: Option<u32>,
    pub quality: Option<String>,
    pub filesize: Option<u64>,
}

impl FormatOption {
    /// Human label such as `720p - mp4 (1.5 MB)`.
    pub fn label(&self) -> String {
        let quality = match (self.height, self.quality.as_deref()) {
            (Some(height), _) => format!("{height}p"),
            (None, Some(quality)) => quality.to_string(),
            (None, None) => "unknown".to_string(),
        };
        match self.filesize.filter(|size| *size > 0) {
            Some(size) => format!("{quality} - {} ({})", self.ext, format_bytes(Some(size))),
            None => format!("{quality} - {}", self.ext),
        }
    }
}
