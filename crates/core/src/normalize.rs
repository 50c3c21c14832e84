//! Backend payload → view-model normalization.
//!
//! Normalization is total: missing optional fields default, they never fail.
//! Only the surrounding network call can produce an error.

use crate::format::format_duration;
use crate::payload::{DurationValue, RawKeyframe, RawMetadata, TranscriptPayload, VideoSummary};
use crate::record::{Keyframe, VideoRecord};

/// Shown when the backend supplied no summary variant at all.
pub const SUMMARY_PLACEHOLDER: &str = "No summary is available for this video yet.";

const UNTITLED: &str = "Untitled video";

/// Build the fixed `VideoRecord` shape from a processing/details payload.
pub fn normalize_record(
    video_id: &str,
    metadata: Option<&RawMetadata>,
    summary: Option<&VideoSummary>,
) -> VideoRecord {
    let title = metadata
        .and_then(|m| {
            m.video
                .as_ref()
                .and_then(|v| v.title.clone())
                .or_else(|| m.title.clone())
        })
        .unwrap_or_else(|| UNTITLED.to_string());

    let duration = normalize_duration(metadata.and_then(|m| {
        m.video
            .as_ref()
            .and_then(|v| v.duration.as_ref())
            .or(m.duration.as_ref())
    }));

    let keyframes = metadata
        .map(|m| normalize_keyframes(&m.keyframes))
        .unwrap_or_default();

    VideoRecord {
        id: video_id.to_string(),
        title,
        duration,
        summary: select_summary(summary),
        keyframes,
        transcript: normalize_transcript(metadata.and_then(|m| m.transcript.as_ref())),
    }
}

/// Numeric seconds become `M:SS`; display strings pass through unchanged.
pub fn normalize_duration(value: Option<&DurationValue>) -> String {
    match value {
        Some(DurationValue::Seconds(secs)) => format_duration(secs.max(0.0) as u64),
        Some(DurationValue::Text(text)) => text.clone(),
        None => format_duration(0),
    }
}

/// Pick one summary variant by priority: detailed, standard, brief.
pub fn select_summary(summary: Option<&VideoSummary>) -> String {
    summary
        .and_then(|s| {
            s.detailed
                .clone()
                .or_else(|| s.standard.clone())
                .or_else(|| s.brief.clone())
        })
        .unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string())
}

pub fn normalize_transcript(payload: Option<&TranscriptPayload>) -> String {
    match payload {
        Some(TranscriptPayload::Text(text)) => text.clone(),
        Some(TranscriptPayload::Segments { segments }) => segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
        Some(TranscriptPayload::FullText { full_text }) => full_text.clone(),
        Some(TranscriptPayload::Unknown(_)) | None => String::new(),
    }
}

/// Assign stable ids even when the backend omits `frame_id`: the fallback is
/// the 1-based array index.
pub fn normalize_keyframes(raw: &[RawKeyframe]) -> Vec<Keyframe> {
    raw.iter()
        .enumerate()
        .map(|(i, kf)| Keyframe {
            id: kf.frame_id.unwrap_or(i as u32 + 1),
            timestamp: kf.timestamp.unwrap_or(0.0).max(0.0) as u32,
            description: kf
                .scene_description
                .clone()
                .or_else(|| kf.description.clone())
                .unwrap_or_else(|| format!("Keyframe {}", i + 1)),
            url: kf.oss_image_url.clone(),
        })
        .collect()
}
