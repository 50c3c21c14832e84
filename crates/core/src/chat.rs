//! Chat message and keyframe-selection types.
//!
//! The per-video session lifecycle lives in the TUI's controller; this
//! module owns the data shapes and the one invariant they enforce: the
//! selection attached to the next outgoing question is bounded and
//! duplicate-free.

use uuid::Uuid;

use crate::record::Keyframe;

/// Hard cap on keyframes attached to a single question.
pub const MAX_ATTACHED_KEYFRAMES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    /// Jump target in whole seconds, taken from the first reference range.
    pub timestamp: Option<u32>,
    /// Keyframe ids the answer referenced. Highlighted only once the
    /// streaming reveal has finished.
    pub related_keyframes: Vec<u32>,
    /// Keyframes the user attached to this question.
    pub attached_keyframes: Vec<Keyframe>,
}

impl ChatMessage {
    pub fn user(content: String, attached_keyframes: Vec<Keyframe>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: ChatRole::User,
            content,
            timestamp: None,
            related_keyframes: Vec::new(),
            attached_keyframes,
        }
    }

    /// Empty assistant message appended on send and filled when the answer
    /// (or an error) arrives.
    pub fn assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: ChatRole::Assistant,
            content: String::new(),
            timestamp: None,
            related_keyframes: Vec::new(),
            attached_keyframes: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.role == ChatRole::Assistant && self.content.is_empty()
    }
}

/// Outcome of trying to attach a keyframe to the pending question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// `first` is set when this attach filled a previously empty selection.
    Added { first: bool },
    AlreadySelected,
    LimitReached,
}

/// Bounded ordered set of keyframes attached to the next question.
#[derive(Debug, Clone, Default)]
pub struct SelectedKeyframeSet {
    frames: Vec<Keyframe>,
}

impl SelectedKeyframeSet {
    pub fn attach(&mut self, frame: Keyframe) -> AttachOutcome {
        if self.frames.iter().any(|kf| kf.id == frame.id) {
            return AttachOutcome::AlreadySelected;
        }
        if self.frames.len() >= MAX_ATTACHED_KEYFRAMES {
            return AttachOutcome::LimitReached;
        }
        let first = self.frames.is_empty();
        self.frames.push(frame);
        AttachOutcome::Added { first }
    }

    pub fn remove_last(&mut self) -> Option<Keyframe> {
        self.frames.pop()
    }

    /// Drain the selection; called when the pending question is sent.
    pub fn take(&mut self) -> Vec<Keyframe> {
        std::mem::take(&mut self.frames)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn ids(&self) -> Vec<u32> {
        self.frames.iter().map(|kf| kf.id).collect()
    }

    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: u32) -> Keyframe {
        Keyframe {
            id,
            timestamp: id * 10,
            description: format!("frame {id}"),
            url: None,
        }
    }

    #[test]
    fn first_attach_is_flagged() {
        let mut set = SelectedKeyframeSet::default();
        assert_eq!(set.attach(frame(1)), AttachOutcome::Added { first: true });
        assert_eq!(set.attach(frame(2)), AttachOutcome::Added { first: false });
    }

    #[test]
    fn duplicate_attach_is_a_noop() {
        let mut set = SelectedKeyframeSet::default();
        set.attach(frame(1));
        assert_eq!(set.attach(frame(1)), AttachOutcome::AlreadySelected);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn selection_never_exceeds_the_cap() {
        let mut set = SelectedKeyframeSet::default();
        for id in 1..=5 {
            assert!(matches!(set.attach(frame(id)), AttachOutcome::Added { .. }));
        }
        assert_eq!(set.attach(frame(6)), AttachOutcome::LimitReached);
        assert_eq!(set.len(), MAX_ATTACHED_KEYFRAMES);
        assert_eq!(set.ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn take_drains_the_selection() {
        let mut set = SelectedKeyframeSet::default();
        set.attach(frame(1));
        set.attach(frame(2));
        let taken = set.take();
        assert_eq!(taken.len(), 2);
        assert!(set.is_empty());
        // A fresh attach counts as first again.
        assert_eq!(set.attach(frame(3)), AttachOutcome::Added { first: true });
    }

    #[test]
    fn placeholder_is_pending_until_filled() {
        let mut msg = ChatMessage::assistant_placeholder();
        assert!(msg.is_pending());
        msg.content = "answer".to_string();
        assert!(!msg.is_pending());

        let user = ChatMessage::user("question".to_string(), Vec::new());
        assert!(!user.is_pending());
    }

    #[test]
    fn message_ids_are_unique() {
        let a = ChatMessage::user("q".to_string(), Vec::new());
        let b = ChatMessage::user("q".to_string(), Vec::new());
        assert_ne!(a.id, b.id);
    }
}
