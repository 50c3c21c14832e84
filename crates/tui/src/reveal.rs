//! Streaming reveal of an already-complete answer.
//!
//! The full text is known when the reveal starts; a cursor advances one
//! character per delay step and the visible prefix is re-rendered each
//! frame. The state is keyed by the owning message id: starting a reveal
//! for a different message resets the cursor, so a stale timer step can
//! never apply across message changes.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RevealState {
    message_id: Option<String>,
    content: String,
    char_cursor: usize,
    byte_cursor: usize,
    char_count: usize,
    last_step: Instant,
    char_delay: Duration,
}

impl RevealState {
    pub fn new(char_delay: Duration) -> Self {
        Self {
            message_id: None,
            content: String::new(),
            char_cursor: 0,
            byte_cursor: 0,
            char_count: 0,
            last_step: Instant::now(),
            char_delay,
        }
    }

    /// Begin revealing `content` for the given message. Restarts from an
    /// empty prefix even if a reveal was already in flight.
    pub fn start(&mut self, message_id: &str, content: &str, now: Instant) {
        self.message_id = Some(message_id.to_string());
        self.content = content.to_string();
        self.char_cursor = 0;
        self.byte_cursor = 0;
        self.char_count = content.chars().count();
        self.last_step = now;
    }

    pub fn clear(&mut self) {
        self.message_id = None;
        self.content.clear();
        self.char_cursor = 0;
        self.byte_cursor = 0;
        self.char_count = 0;
    }

    /// True while the given message is mid-reveal.
    pub fn is_revealing_message(&self, message_id: &str) -> bool {
        self.message_id.as_deref() == Some(message_id) && self.char_cursor < self.char_count
    }

    /// Advance the cursor by however many whole delay steps have elapsed.
    /// Returns true when at least one character became visible.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.message_id.is_none() {
            return false;
        }
        let mut advanced = false;
        while self.char_cursor < self.char_count
            && now.duration_since(self.last_step) >= self.char_delay
        {
            self.last_step += self.char_delay;
            self.char_cursor += 1;
            let step = self.content[self.byte_cursor..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(0);
            self.byte_cursor += step;
            advanced = true;
        }
        advanced
    }

    /// The currently visible prefix, always on a char boundary.
    pub fn visible_prefix(&self) -> &str {
        &self.content[..self.byte_cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(18);

    #[test]
    fn uninterrupted_reveal_produces_n_plus_one_distinct_prefixes() {
        let content = "hello";
        let start = Instant::now();
        let mut reveal = RevealState::new(DELAY);
        reveal.start("msg-1", content, start);

        let mut prefixes = vec![reveal.visible_prefix().to_string()];
        let mut now = start;
        while reveal.is_revealing_message("msg-1") {
            now += DELAY;
            if reveal.tick(now) {
                prefixes.push(reveal.visible_prefix().to_string());
            }
        }

        assert_eq!(prefixes.len(), content.chars().count() + 1);
        assert_eq!(prefixes.first().map(String::as_str), Some(""));
        assert_eq!(prefixes.last().map(String::as_str), Some("hello"));
        for window in prefixes.windows(2) {
            assert_ne!(window[0], window[1]);
        }
    }

    #[test]
    fn content_change_resets_to_an_empty_prefix() {
        let start = Instant::now();
        let mut reveal = RevealState::new(DELAY);
        reveal.start("msg-1", "first answer", start);
        reveal.tick(start + DELAY * 4);
        assert_eq!(reveal.visible_prefix(), "firs");

        // New message supersedes the old one; the pending steps of the old
        // reveal never surface again.
        reveal.start("msg-2", "second", start + DELAY * 4);
        assert_eq!(reveal.visible_prefix(), "");
        assert!(!reveal.is_revealing_message("msg-1"));
        assert!(reveal.is_revealing_message("msg-2"));

        reveal.tick(start + DELAY * 5);
        assert_eq!(reveal.visible_prefix(), "s");
    }

    #[test]
    fn late_tick_catches_up_in_whole_steps() {
        let start = Instant::now();
        let mut reveal = RevealState::new(DELAY);
        reveal.start("msg-1", "abcdef", start);

        assert!(reveal.tick(start + DELAY * 3 + Duration::from_millis(5)));
        assert_eq!(reveal.visible_prefix(), "abc");
    }

    #[test]
    fn cursor_stops_at_content_length() {
        let start = Instant::now();
        let mut reveal = RevealState::new(DELAY);
        reveal.start("msg-1", "ab", start);

        reveal.tick(start + DELAY * 100);
        assert_eq!(reveal.visible_prefix(), "ab");
        assert!(!reveal.is_revealing_message("msg-1"));
        // Further ticks are no-ops.
        assert!(!reveal.tick(start + DELAY * 200));
    }

    #[test]
    fn multibyte_content_advances_on_char_boundaries() {
        let start = Instant::now();
        let mut reveal = RevealState::new(DELAY);
        reveal.start("msg-1", "héllo 视频", start);

        let mut now = start;
        for _ in 0..3 {
            now += DELAY;
            reveal.tick(now);
        }
        assert_eq!(reveal.visible_prefix(), "hél");

        reveal.tick(now + DELAY * 10);
        assert_eq!(reveal.visible_prefix(), "héllo 视频");
    }

    #[test]
    fn clear_stops_the_reveal() {
        let start = Instant::now();
        let mut reveal = RevealState::new(DELAY);
        reveal.start("msg-1", "abc", start);
        reveal.clear();
        assert!(!reveal.is_revealing_message("msg-1"));
        assert!(!reveal.tick(start + DELAY * 5));
        assert_eq!(reveal.visible_prefix(), "");
    }
}
