//! Shared API types for the vidsage backend.
//!
//! This crate is the single source of truth for every request/response shape
//! the client consumes. The loosely-shaped processing payloads live in
//! `vidsage-core::payload` and are re-exported here for convenience.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use vidsage_core::payload::{
    DurationValue, RawKeyframe, RawMetadata, RawVideoInfo, TranscriptPayload, TranscriptSegment,
    VideoSummary,
};

/// Fixed retrieval depth for chat answers.
pub const CHAT_TOP_K: u32 = 5;

// ─── Shared Enums ────────────────────────────────────────────────────────────

/// Processing lifecycle of a history entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Only completed entries carry a loadable analysis.
    pub fn is_viewable(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a history entry entered the system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Upload,
    Youtube,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Youtube => "youtube",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Health / Status ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatusResponse {
    pub status: String,
    #[serde(default)]
    pub services: HashMap<String, bool>,
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub subscription_tier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub access_token: String,
    pub refresh_token: String,
}

// ─── Video processing ────────────────────────────────────────────────────────

/// Input for `/video/process` — either a link or a local file, sent as
/// multipart form fields (`youtube_url` / `video_file`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YoutubeUrl(String),
    LocalFile(PathBuf),
}

impl VideoSource {
    /// Interpret a raw input line: anything that looks like a link is a
    /// YouTube URL, everything else a local file path.
    pub fn from_input(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Some(Self::YoutubeUrl(trimmed.to_string()))
        } else {
            Some(Self::LocalFile(PathBuf::from(trimmed)))
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::YoutubeUrl(url) => url.clone(),
            Self::LocalFile(path) => path.display().to_string(),
        }
    }
}

/// Response of `/video/process` and `/video/details/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessVideoResponse {
    pub status: String,
    pub video_id: String,
    #[serde(default)]
    pub keyframes_count: Option<u32>,
    #[serde(default)]
    pub transcript_segments_count: Option<u32>,
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default)]
    pub video_summary: Option<VideoSummary>,
    #[serde(default)]
    pub summary_generated: Option<bool>,
}

// ─── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoHistoryItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub created_at: String,
    pub processing_status: ProcessingStatus,
    pub source_type: SourceType,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoHistoryResponse {
    pub status: String,
    #[serde(default)]
    pub videos: Vec<VideoHistoryItem>,
    #[serde(default)]
    pub total: u32,
    /// Explanatory note, e.g. for anonymous callers.
    #[serde(default)]
    pub message: Option<String>,
}

// ─── Chat ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStartRequest {
    pub video_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStartResponse {
    pub status: String,
    pub session_id: String,
    pub video_id: String,
    #[serde(default)]
    pub keyframes_count: u32,
    #[serde(default)]
    pub transcript_segments_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    pub session_id: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyframe_ids: Option<Vec<u32>>,
    pub top_k: u32,
    pub auto_keyframes: bool,
}

impl ChatMessageRequest {
    /// Build a request with the client's fixed parameters
    /// (`top_k = 5`, `auto_keyframes = false`).
    pub fn new(session_id: String, question: String, keyframe_ids: Option<Vec<u32>>) -> Self {
        Self {
            session_id,
            question,
            keyframe_ids,
            top_k: CHAT_TOP_K,
            auto_keyframes: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTimeRange {
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReferences {
    #[serde(default)]
    pub time_ranges: Vec<ReferenceTimeRange>,
    #[serde(default)]
    pub keyframe_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub status: String,
    pub session_id: String,
    pub answer: String,
    #[serde(default)]
    pub references: Option<ChatReferences>,
    #[serde(default)]
    pub history_length: u32,
}
