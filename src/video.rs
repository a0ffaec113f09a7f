use std::fmt;

use serde::{Deserialize, Serialize};

const THUMBNAIL_HOST: &str = "http://img.youtube.com/vi";

/// YouTube video identifier as extracted from a URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video ID from a YouTube URL.
///
/// Short links (`youtu.be/ID`) use the last path segment; anything else is
/// treated as a long link and uses whatever follows the last `=`. This means
/// `watch?v=ID&ab_channel=X` yields `X`, so callers should trim such URLs down
/// to the `v=` parameter first. Returns `None` only when nothing is left.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    let url = url.trim();
    let separator = if url.contains("youtu.be") { '/' } else { '=' };
    let id = url.rsplit(separator).next().unwrap_or_default();

    if id.is_empty() {
        None
    } else {
        Some(VideoId(id.to_string()))
    }
}

/// Thumbnail resolution tiers served by img.youtube.com
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Max,
    #[default]
    High,
    Medium,
    Standard,
}

impl Quality {
    fn file_stem(self) -> &'static str {
        match self {
            Quality::Max => "maxresdefault",
            Quality::High => "hqdefault",
            Quality::Medium => "mqdefault",
            Quality::Standard => "sddefault",
        }
    }
}

/// Build the thumbnail image URL. The image may not exist for every tier.
pub fn thumbnail_url(video_id: &VideoId, quality: Quality) -> String {
    format!("{THUMBNAIL_HOST}/{video_id}/{}.jpg", quality.file_stem())
}
