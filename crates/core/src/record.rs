use serde::{Deserialize, Serialize};

/// Normalized client-side representation of one analyzed video.
///
/// Built once from a processing or details response and replaced wholesale
/// when a new video is submitted or loaded from history. Display components
/// only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    /// Display duration, `M:SS`.
    pub duration: String,
    /// Markdown-capable summary text, rendered as-is.
    pub summary: String,
    /// Ordered by ascending timestamp; ids unique within the record.
    pub keyframes: Vec<Keyframe>,
    pub transcript: String,
}

impl VideoRecord {
    pub fn keyframe(&self, id: u32) -> Option<&Keyframe> {
        self.keyframes.iter().find(|kf| kf.id == id)
    }
}

/// A representative still extracted at a specific point in the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub id: u32,
    /// Offset into the video, whole seconds.
    pub timestamp: u32,
    pub description: String,
    pub url: Option<String>,
}
