pub mod chat;
pub mod config;
pub mod format;
pub mod normalize;
pub mod payload;
pub mod record;

pub use chat::{AttachOutcome, ChatMessage, ChatRole, SelectedKeyframeSet, MAX_ATTACHED_KEYFRAMES};
pub use record::{Keyframe, VideoRecord};
