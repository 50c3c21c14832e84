//! Raw backend payload shapes.
//!
//! The processing endpoints return loosely-shaped JSON: the duration lives
//! either at `metadata.video.duration` or `metadata.duration` and may be a
//! number or a display string, and the transcript appears in three different
//! encodings depending on which pipeline stage produced it. These types
//! deserialize every shape the backend has been observed to emit;
//! `normalize` flattens them into the fixed view models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<DurationValue>,
    #[serde(default)]
    pub video: Option<RawVideoInfo>,
    #[serde(default)]
    pub transcript: Option<TranscriptPayload>,
    #[serde(default)]
    pub keyframes: Vec<RawKeyframe>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<DurationValue>,
}

/// Duration as delivered by the backend: numeric seconds or an
/// already-formatted display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(f64),
    Text(String),
}

/// The three observed transcript encodings, plus a terminal arm so an
/// unrecognized shape is handled explicitly instead of silently probed away.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptPayload {
    Text(String),
    Segments { segments: Vec<TranscriptSegment> },
    FullText { full_text: String },
    Unknown(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
}

/// A keyframe as emitted by the extraction stage. Every field is optional;
/// `normalize_keyframes` fills the gaps deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawKeyframe {
    #[serde(default)]
    pub frame_id: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub scene_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub oss_image_url: Option<String>,
}

/// Summary variants by verbosity. Any combination may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(default)]
    pub detailed: Option<String>,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub brief: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_deserializes_plain_string() {
        let payload: TranscriptPayload = serde_json::from_str(r#""hello world""#).unwrap();
        assert!(matches!(payload, TranscriptPayload::Text(ref t) if t == "hello world"));
    }

    #[test]
    fn transcript_deserializes_segments_object() {
        let payload: TranscriptPayload =
            serde_json::from_str(r#"{"segments": [{"text": "a", "start": 0.0}, {"text": "b"}]}"#)
                .unwrap();
        match payload {
            TranscriptPayload::Segments { segments } => assert_eq!(segments.len(), 2),
            other => panic!("expected segments, got {other:?}"),
        }
    }

    #[test]
    fn transcript_deserializes_full_text_object() {
        let payload: TranscriptPayload =
            serde_json::from_str(r#"{"full_text": "the whole thing"}"#).unwrap();
        assert!(matches!(payload, TranscriptPayload::FullText { ref full_text }
            if full_text == "the whole thing"));
    }

    #[test]
    fn transcript_unrecognized_shape_lands_in_unknown_arm() {
        let payload: TranscriptPayload =
            serde_json::from_str(r#"{"chunks": [1, 2, 3]}"#).unwrap();
        assert!(matches!(payload, TranscriptPayload::Unknown(_)));
    }

    #[test]
    fn duration_deserializes_number_and_string() {
        let secs: DurationValue = serde_json::from_str("323.4").unwrap();
        assert!(matches!(secs, DurationValue::Seconds(v) if (v - 323.4).abs() < 1e-9));

        let text: DurationValue = serde_json::from_str(r#""5:23""#).unwrap();
        assert!(matches!(text, DurationValue::Text(ref t) if t == "5:23"));
    }

    #[test]
    fn metadata_tolerates_missing_fields() {
        let meta: RawMetadata = serde_json::from_str("{}").unwrap();
        assert!(meta.title.is_none());
        assert!(meta.transcript.is_none());
        assert!(meta.keyframes.is_empty());
    }
}
