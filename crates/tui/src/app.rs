use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use vidsage_api::{ProcessVideoResponse, VideoHistoryItem};
use vidsage_core::chat::{AttachOutcome, ChatMessage, SelectedKeyframeSet};
use vidsage_core::config::AppConfig;
use vidsage_core::format::format_timestamp;
use vidsage_core::normalize::normalize_record;
use vidsage_core::record::VideoRecord;

use crate::async_ops::{AsyncCommand, CommandResult};
use crate::config;
use crate::reveal::RevealState;

/// How long answer-referenced keyframes stay highlighted in the gallery.
pub const HIGHLIGHT_PULSE: Duration = Duration::from_secs(3);

/// Seeded into the chat input when the first keyframe is attached.
pub const DEFAULT_KEYFRAME_PROMPT: &str = "Tell me more about the selected keyframes";

pub const SUGGESTED_QUESTIONS: [&str; 3] = [
    "What is this video mainly about?",
    "What are the key steps shown?",
    "What are the most important takeaways?",
];

/// Which screen the user is viewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Main,
    Help,
}

/// Pane focus within the three-pane main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Input,
    History,
    Results,
    Chat,
}

impl Pane {
    const ORDER: [Self; 4] = [Self::Input, Self::History, Self::Results, Self::Chat];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|p| *p == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|p| *p == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsTab {
    Keyframes,
    Summary,
    Transcript,
}

/// Lifecycle of the submitted video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingState {
    Idle,
    Processing,
    Completed,
    Error,
}

/// Per-video chat session lifecycle. `Sending` implies a live session, so a
/// second send cannot start while one is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatSessionState {
    NoSession,
    Initializing { video_id: String },
    Ready { session_id: String },
    Sending { session_id: String },
}

impl ChatSessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn is_sending(&self) -> bool {
        matches!(self, Self::Sending { .. })
    }
}

/// Flash message severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

/// Transient gallery highlight for answer-referenced keyframes.
#[derive(Debug, Clone)]
pub struct HighlightPulse {
    pub ids: Vec<u32>,
    pub started: Instant,
}

/// State for the email/password login form.
#[derive(Default)]
pub struct LoginState {
    pub field_index: usize, // 0=email, 1=password
    pub email: String,
    pub password: String,
    pub signup: bool,
    pub loading: bool,
    pub status: Option<String>,
}

pub struct App {
    pub view: View,
    pub pane: Pane,
    pub config: AppConfig,

    // ── Video submission + record ─────────────────────────────────
    pub url_input: String,
    pub input_editing: bool,
    pub processing: ProcessingState,
    /// Label of whatever is currently being processed.
    pub processing_label: Option<String>,
    pub processing_started: Option<Instant>,
    pub video: Option<VideoRecord>,
    pub current_timestamp: u32,

    // ── Results pane ──────────────────────────────────────────────
    pub results_tab: ResultsTab,
    pub gallery_state: ListState,
    pub summary_scroll: u16,
    pub transcript_scroll: u16,
    pub highlight: Option<HighlightPulse>,

    // ── History panel ─────────────────────────────────────────────
    pub history: Vec<VideoHistoryItem>,
    pub history_state: ListState,
    pub history_loading: bool,
    pub history_error: Option<String>,
    /// Backend-supplied note, e.g. for anonymous callers.
    pub history_notice: Option<String>,

    // ── Chat ──────────────────────────────────────────────────────
    pub chat_state: ChatSessionState,
    pub messages: Vec<ChatMessage>,
    pub selected_keyframes: SelectedKeyframeSet,
    pub chat_input: String,
    /// Scroll offset from the bottom of the message log; 0 follows the tail.
    pub chat_scroll_offset: u16,
    pub reveal: RevealState,
    pending_answer_id: Option<String>,

    // ── Login ─────────────────────────────────────────────────────
    pub login: LoginState,

    // ── Server status ─────────────────────────────────────────────
    pub server_status: ServerStatus,
    pub services: Vec<(String, bool)>,

    // ── Plumbing ──────────────────────────────────────────────────
    pub flash_message: Option<(String, FlashLevel)>,
    pending_commands: VecDeque<AsyncCommand>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let view = if config.server.access_token.is_empty() {
            View::Login
        } else {
            View::Main
        };
        let reveal = RevealState::new(Duration::from_millis(config.chat.reveal_char_delay_ms));
        Self {
            view,
            pane: Pane::Input,
            config,
            url_input: String::new(),
            input_editing: false,
            processing: ProcessingState::Idle,
            processing_label: None,
            processing_started: None,
            video: None,
            current_timestamp: 0,
            results_tab: ResultsTab::Keyframes,
            gallery_state: ListState::default(),
            summary_scroll: 0,
            transcript_scroll: 0,
            highlight: None,
            history: Vec::new(),
            history_state: ListState::default(),
            history_loading: false,
            history_error: None,
            history_notice: None,
            chat_state: ChatSessionState::NoSession,
            messages: Vec::new(),
            selected_keyframes: SelectedKeyframeSet::default(),
            chat_input: String::new(),
            chat_scroll_offset: 0,
            reveal,
            pending_answer_id: None,
            login: LoginState::default(),
            server_status: ServerStatus::default(),
            services: Vec::new(),
            flash_message: None,
            pending_commands: VecDeque::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.config.server.access_token.is_empty()
    }

    // ── Command plumbing ──────────────────────────────────────────────

    pub fn dispatch(&mut self, cmd: AsyncCommand) {
        self.pending_commands.push_back(cmd);
    }

    pub fn next_command(&mut self) -> Option<AsyncCommand> {
        self.pending_commands.pop_front()
    }

    #[cfg(test)]
    fn pending_count(&self) -> usize {
        self.pending_commands.len()
    }

    // ── Timers ────────────────────────────────────────────────────────

    /// Advance the local timer-driven effects. Both are cosmetic and are
    /// superseded safely when their input changes.
    pub fn tick(&mut self, now: Instant) {
        self.reveal.tick(now);
        if let Some(pulse) = &self.highlight {
            if now.duration_since(pulse.started) >= HIGHLIGHT_PULSE {
                self.highlight = None;
            }
        }
    }

    /// Gallery ids currently pulsing.
    pub fn highlighted_ids(&self) -> &[u32] {
        self.highlight.as_ref().map(|p| p.ids.as_slice()).unwrap_or(&[])
    }

    // ── Flash messages ────────────────────────────────────────────────

    pub fn flash_success(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Success));
    }

    pub fn flash_error(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Error));
    }

    pub fn flash_info(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Info));
    }

    // ── Video submission ──────────────────────────────────────────────

    pub fn submit_video(&mut self) {
        if self.processing == ProcessingState::Processing {
            return;
        }
        let Some(source) = vidsage_api::VideoSource::from_input(&self.url_input) else {
            self.flash_error("Enter a YouTube link or a local file path first");
            return;
        };
        self.input_editing = false;
        self.processing = ProcessingState::Processing;
        self.processing_label = Some(source.label());
        self.processing_started = Some(Instant::now());
        self.dispatch(AsyncCommand::ProcessVideo { source });
    }

    /// Install a freshly normalized record: replaces the previous one,
    /// resets every per-video piece of state and kicks off a chat session.
    pub fn set_video_record(&mut self, record: VideoRecord) {
        self.messages.clear();
        self.selected_keyframes.clear();
        self.reveal.clear();
        self.pending_answer_id = None;
        self.highlight = None;
        self.current_timestamp = 0;
        self.chat_input.clear();
        self.chat_scroll_offset = 0;
        self.summary_scroll = 0;
        self.transcript_scroll = 0;
        self.results_tab = ResultsTab::Keyframes;
        self.chat_state = ChatSessionState::NoSession;
        self.gallery_state = ListState::default();
        if !record.keyframes.is_empty() {
            self.gallery_state.select(Some(0));
        }
        self.processing = ProcessingState::Completed;
        self.processing_started = None;
        let video_id = record.id.clone();
        self.video = Some(record);
        self.start_chat_session(video_id);
    }

    // ── History panel ─────────────────────────────────────────────────

    pub fn refresh_history(&mut self) {
        self.history_loading = true;
        self.history_error = None;
        self.dispatch(AsyncCommand::FetchHistory {
            limit: self.config.history.limit,
        });
    }

    /// Load the selected history entry. Only completed entries are
    /// viewable; everything else gets a non-blocking notification.
    pub fn select_history_item(&mut self) {
        if self.processing == ProcessingState::Processing {
            return;
        }
        let Some(item) = self
            .history_state
            .selected()
            .and_then(|i| self.history.get(i))
        else {
            return;
        };
        if !item.processing_status.is_viewable() {
            self.flash_info(format!(
                "\"{}\" is {} — not viewable yet",
                item.title, item.processing_status
            ));
            return;
        }
        self.processing = ProcessingState::Processing;
        self.processing_label = Some(item.title.clone());
        self.processing_started = Some(Instant::now());
        let video_id = item.id.clone();
        self.dispatch(AsyncCommand::FetchVideoDetails { video_id });
    }

    // ── Chat session controller ───────────────────────────────────────

    /// Start a session for the current record. Duplicate calls while one
    /// is already initializing are suppressed.
    pub fn start_chat_session(&mut self, video_id: String) {
        if matches!(self.chat_state, ChatSessionState::Initializing { .. }) {
            return;
        }
        self.chat_state = ChatSessionState::Initializing {
            video_id: video_id.clone(),
        };
        self.dispatch(AsyncCommand::StartChatSession { video_id });
    }

    /// Attach the gallery-selected keyframe to the next outgoing question.
    pub fn attach_selected_keyframe(&mut self) {
        let Some(frame) = self
            .gallery_state
            .selected()
            .and_then(|i| self.video.as_ref().and_then(|v| v.keyframes.get(i)))
            .cloned()
        else {
            return;
        };
        let id = frame.id;
        match self.selected_keyframes.attach(frame) {
            AttachOutcome::Added { first } => {
                if first && self.chat_input.is_empty() {
                    self.chat_input = DEFAULT_KEYFRAME_PROMPT.to_string();
                }
                self.flash_success(format!(
                    "Keyframe #{id} attached ({}/{})",
                    self.selected_keyframes.len(),
                    vidsage_core::MAX_ATTACHED_KEYFRAMES
                ));
            }
            AttachOutcome::AlreadySelected => {
                self.flash_info(format!("Keyframe #{id} is already selected"));
            }
            AttachOutcome::LimitReached => {
                self.flash_error(format!(
                    "Keyframe limit reached ({} max)",
                    vidsage_core::MAX_ATTACHED_KEYFRAMES
                ));
            }
        }
    }

    /// Send the composed question. No-op unless the session is `Ready`,
    /// which also blocks a second send while one is in flight.
    pub fn send_chat_message(&mut self) {
        let text = self.chat_input.trim().to_string();
        if text.is_empty() {
            return;
        }
        let ChatSessionState::Ready { session_id } = self.chat_state.clone() else {
            return;
        };

        let attached = self.selected_keyframes.take();
        let keyframe_ids = if attached.is_empty() {
            None
        } else {
            Some(attached.iter().map(|kf| kf.id).collect::<Vec<_>>())
        };
        if let Some(ids) = &keyframe_ids {
            self.flash_info(format!(
                "{} keyframe{} sent with your question",
                ids.len(),
                if ids.len() == 1 { "" } else { "s" }
            ));
        }

        self.messages.push(ChatMessage::user(text.clone(), attached));
        let placeholder = ChatMessage::assistant_placeholder();
        self.pending_answer_id = Some(placeholder.id.clone());
        self.messages.push(placeholder);

        self.chat_input.clear();
        self.chat_scroll_offset = 0;
        self.chat_state = ChatSessionState::Sending {
            session_id: session_id.clone(),
        };
        self.dispatch(AsyncCommand::SendChatMessage {
            session_id,
            question: text,
            keyframe_ids,
        });
    }

    /// Empty the message log. The session id survives.
    pub fn clear_chat(&mut self) {
        self.messages.clear();
        self.reveal.clear();
        self.pending_answer_id = None;
        self.chat_scroll_offset = 0;
    }

    pub fn jump_to_timestamp(&mut self, seconds: u32) {
        self.current_timestamp = seconds;
        self.flash_info(format!("Jumped to {}", format_timestamp(seconds)));
    }

    /// Jump to the reference timestamp of the most recent answer.
    pub fn jump_to_latest_answer(&mut self) {
        let target = self
            .messages
            .iter()
            .rev()
            .find_map(|msg| msg.timestamp);
        match target {
            Some(seconds) => self.jump_to_timestamp(seconds),
            None => self.flash_info("No answer with a timestamp yet"),
        }
    }

    // ── Command results ───────────────────────────────────────────────

    pub fn apply_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Health(Ok(_)) => {
                self.server_status = ServerStatus::Online;
            }
            CommandResult::Health(Err(_)) => {
                self.server_status = ServerStatus::Offline;
            }

            CommandResult::ServiceStatus(Ok(resp)) => {
                let mut services: Vec<(String, bool)> = resp.services.into_iter().collect();
                services.sort();
                self.services = services;
            }
            CommandResult::ServiceStatus(Err(_)) => {
                self.services.clear();
            }

            CommandResult::Auth(Ok(auth)) => {
                self.login.loading = false;
                self.login.status = None;
                self.config.server.access_token = auth.access_token;
                if let Err(e) = config::save_config(&self.config) {
                    self.flash_error(format!("Config not saved: {e}"));
                } else {
                    self.flash_success(format!("Signed in as {}", auth.user.email));
                }
                self.view = View::Main;
                self.refresh_history();
            }
            CommandResult::Auth(Err(e)) => {
                self.login.loading = false;
                self.login.status = Some(format!("Error: {e}"));
            }

            CommandResult::VideoProcessed(Ok(resp)) => {
                self.apply_video_payload(resp);
                self.flash_success("Video analysis ready");
                self.refresh_history();
            }
            CommandResult::VideoProcessed(Err(e)) => {
                self.processing = ProcessingState::Error;
                self.processing_started = None;
                self.flash_error(format!("Processing failed: {e}"));
            }

            CommandResult::VideoDetails(Ok(resp)) => {
                self.apply_video_payload(resp);
                self.flash_success("Loaded from history");
            }
            CommandResult::VideoDetails(Err(e)) => {
                self.processing = if self.video.is_some() {
                    ProcessingState::Completed
                } else {
                    ProcessingState::Idle
                };
                self.processing_started = None;
                self.flash_error(format!("Could not load video: {e}"));
            }

            CommandResult::ChatStarted { video_id, result } => {
                // Results for a record that is no longer current are stale.
                if self.video.as_ref().map(|v| v.id.as_str()) != Some(video_id.as_str()) {
                    return;
                }
                match result {
                    Ok(resp) => {
                        self.chat_state = ChatSessionState::Ready {
                            session_id: resp.session_id,
                        };
                        self.flash_success("Chat session ready");
                    }
                    Err(e) => {
                        self.chat_state = ChatSessionState::NoSession;
                        self.flash_error(format!("Could not start chat session: {e}"));
                    }
                }
            }

            CommandResult::ChatAnswer(result) => self.apply_chat_answer(result),

            CommandResult::History(Ok(resp)) => {
                self.history_loading = false;
                self.history_error = None;
                self.history_notice = resp.message;
                self.history = resp.videos;
                if self.history.is_empty() {
                    self.history_state.select(None);
                } else if self.history_state.selected().is_none() {
                    self.history_state.select(Some(0));
                }
            }
            CommandResult::History(Err(e)) => {
                self.history_loading = false;
                self.history_error = Some(e);
            }
        }
    }

    fn apply_video_payload(&mut self, resp: ProcessVideoResponse) {
        let record = normalize_record(
            &resp.video_id,
            resp.metadata.as_ref(),
            resp.video_summary.as_ref(),
        );
        self.set_video_record(record);
    }

    fn apply_chat_answer(&mut self, result: Result<vidsage_api::ChatMessageResponse, String>) {
        // A record change mid-flight resets the session; the answer then has
        // no placeholder to land in and is dropped.
        let ChatSessionState::Sending { session_id } = self.chat_state.clone() else {
            return;
        };
        self.chat_state = ChatSessionState::Ready { session_id };

        let Some(placeholder_id) = self.pending_answer_id.take() else {
            return;
        };
        let Some(idx) = self.messages.iter().position(|m| m.id == placeholder_id) else {
            return;
        };

        match result {
            Ok(resp) => {
                let references = resp.references.unwrap_or_default();
                let timestamp = references
                    .time_ranges
                    .first()
                    .map(|range| range.start_time.max(0.0) as u32);
                {
                    let msg = &mut self.messages[idx];
                    msg.content = resp.answer.clone();
                    msg.timestamp = timestamp;
                    msg.related_keyframes = references.keyframe_ids.clone();
                }
                self.reveal
                    .start(&placeholder_id, &resp.answer, Instant::now());
                if !references.keyframe_ids.is_empty() {
                    self.highlight = Some(HighlightPulse {
                        ids: references.keyframe_ids,
                        started: Instant::now(),
                    });
                }
            }
            Err(detail) => {
                // Error text lands in the placeholder; the reveal never runs.
                self.messages[idx].content =
                    format!("Something went wrong answering this question: {detail}");
            }
        }
    }

    // ── Key handling ──────────────────────────────────────────────────

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.view {
            View::Login => {
                self.handle_login_key(key);
                return false;
            }
            View::Help => {
                self.view = View::Main;
                return false;
            }
            View::Main => {}
        }

        match key.code {
            KeyCode::Tab => {
                self.input_editing = false;
                self.pane = self.pane.next();
                return false;
            }
            KeyCode::BackTab => {
                self.input_editing = false;
                self.pane = self.pane.prev();
                return false;
            }
            _ => {}
        }

        if self.input_editing {
            self.handle_input_editing(key);
            return false;
        }
        if self.pane == Pane::Chat {
            self.handle_chat_key(key);
            return false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.view = View::Help,
            _ => match self.pane {
                Pane::Input => self.handle_input_pane_key(key),
                Pane::History => self.handle_history_key(key),
                Pane::Results => self.handle_results_key(key),
                Pane::Chat => {}
            },
        }
        false
    }

    fn handle_input_editing(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input_editing = false,
            KeyCode::Enter => self.submit_video(),
            KeyCode::Backspace => {
                self.url_input.pop();
            }
            KeyCode::Char(c) => self.url_input.push(c),
            _ => {}
        }
    }

    fn handle_input_pane_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('i') | KeyCode::Char('e') => {
                if self.processing != ProcessingState::Processing {
                    self.input_editing = true;
                }
            }
            KeyCode::Enter => self.submit_video(),
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_history_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_history_selection(-1),
            KeyCode::Enter => self.select_history_item(),
            KeyCode::Char('r') => self.refresh_history(),
            _ => {}
        }
    }

    fn move_history_selection(&mut self, delta: i32) {
        if self.history.is_empty() {
            return;
        }
        let current = self.history_state.selected().unwrap_or(0) as i32;
        let max = self.history.len() as i32 - 1;
        let next = (current + delta).clamp(0, max) as usize;
        self.history_state.select(Some(next));
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('1') => self.results_tab = ResultsTab::Keyframes,
            KeyCode::Char('2') => self.results_tab = ResultsTab::Summary,
            KeyCode::Char('3') => self.results_tab = ResultsTab::Transcript,
            KeyCode::Char('j') | KeyCode::Down => match self.results_tab {
                ResultsTab::Keyframes => self.move_gallery_selection(1),
                ResultsTab::Summary => self.summary_scroll = self.summary_scroll.saturating_add(1),
                ResultsTab::Transcript => {
                    self.transcript_scroll = self.transcript_scroll.saturating_add(1)
                }
            },
            KeyCode::Char('k') | KeyCode::Up => match self.results_tab {
                ResultsTab::Keyframes => self.move_gallery_selection(-1),
                ResultsTab::Summary => self.summary_scroll = self.summary_scroll.saturating_sub(1),
                ResultsTab::Transcript => {
                    self.transcript_scroll = self.transcript_scroll.saturating_sub(1)
                }
            },
            KeyCode::Enter => {
                if self.results_tab == ResultsTab::Keyframes {
                    if let Some(ts) = self
                        .gallery_state
                        .selected()
                        .and_then(|i| self.video.as_ref().and_then(|v| v.keyframes.get(i)))
                        .map(|kf| kf.timestamp)
                    {
                        self.jump_to_timestamp(ts);
                    }
                }
            }
            KeyCode::Char('a') => {
                if self.results_tab == ResultsTab::Keyframes {
                    self.attach_selected_keyframe();
                }
            }
            _ => {}
        }
    }

    fn move_gallery_selection(&mut self, delta: i32) {
        let Some(count) = self.video.as_ref().map(|v| v.keyframes.len()) else {
            return;
        };
        if count == 0 {
            return;
        }
        let current = self.gallery_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).clamp(0, count as i32 - 1) as usize;
        self.gallery_state.select(Some(next));
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('l') => self.clear_chat(),
                KeyCode::Char('x') => {
                    if self.selected_keyframes.remove_last().is_some() && self.selected_keyframes.is_empty()
                    {
                        self.flash_info("Keyframe selection cleared");
                    }
                }
                KeyCode::Char('j') => self.jump_to_latest_answer(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.send_chat_message(),
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            KeyCode::Esc => self.chat_input.clear(),
            KeyCode::Up | KeyCode::PageUp => {
                self.chat_scroll_offset = self.chat_scroll_offset.saturating_add(1);
            }
            KeyCode::Down | KeyCode::PageDown => {
                self.chat_scroll_offset = self.chat_scroll_offset.saturating_sub(1);
            }
            KeyCode::Char(c) => {
                // Digits on an empty input pick a suggested question.
                if self.chat_input.is_empty() {
                    if let Some(idx) = c.to_digit(10) {
                        let idx = idx as usize;
                        if (1..=SUGGESTED_QUESTIONS.len()).contains(&idx) {
                            self.chat_input = SUGGESTED_QUESTIONS[idx - 1].to_string();
                            return;
                        }
                    }
                }
                self.chat_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if self.login.loading {
            return;
        }
        match key.code {
            KeyCode::Esc => {
                // Anonymous use is permitted; history falls back to the
                // backend's explanatory message.
                self.view = View::Main;
            }
            KeyCode::Tab | KeyCode::Down => self.login.field_index = (self.login.field_index + 1) % 2,
            KeyCode::BackTab | KeyCode::Up => {
                self.login.field_index = (self.login.field_index + 1) % 2
            }
            KeyCode::F(2) => {
                self.login.signup = !self.login.signup;
                self.login.status = None;
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Backspace => {
                match self.login.field_index {
                    0 => self.login.email.pop(),
                    _ => self.login.password.pop(),
                };
            }
            KeyCode::Char(c) => match self.login.field_index {
                0 => self.login.email.push(c),
                _ => self.login.password.push(c),
            },
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let email = self.login.email.trim().to_string();
        let password = self.login.password.clone();
        if email.is_empty() || password.is_empty() {
            self.login.status = Some("Email and password are required".to_string());
            return;
        }
        self.login.loading = true;
        self.login.status = Some(if self.login.signup {
            "Signing up…".to_string()
        } else {
            "Signing in…".to_string()
        });
        let cmd = if self.login.signup {
            AsyncCommand::SignUp { email, password }
        } else {
            AsyncCommand::SignIn { email, password }
        };
        self.dispatch(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidsage_api::{
        ChatMessageResponse, ChatReferences, ChatStartResponse, ProcessingStatus,
        RawKeyframe, RawMetadata, ReferenceTimeRange, SourceType, VideoHistoryResponse,
        VideoSummary,
    };
    use vidsage_core::chat::ChatRole;

    fn app() -> App {
        App::new(AppConfig::default())
    }

    fn keyframes(n: u32) -> Vec<RawKeyframe> {
        (1..=n)
            .map(|i| RawKeyframe {
                frame_id: Some(i),
                timestamp: Some(f64::from(i) * 10.0),
                scene_description: Some(format!("scene {i}")),
                ..RawKeyframe::default()
            })
            .collect()
    }

    fn process_response(video_id: &str, frames: u32) -> ProcessVideoResponse {
        ProcessVideoResponse {
            status: "success".to_string(),
            video_id: video_id.to_string(),
            keyframes_count: Some(frames),
            transcript_segments_count: None,
            metadata: Some(RawMetadata {
                title: Some("How to learn programming".to_string()),
                keyframes: keyframes(frames),
                ..RawMetadata::default()
            }),
            video_summary: Some(VideoSummary {
                standard: Some("a summary".to_string()),
                ..VideoSummary::default()
            }),
            summary_generated: Some(true),
        }
    }

    fn ready_app(video_id: &str, frames: u32) -> App {
        let mut app = app();
        app.apply_command_result(CommandResult::VideoProcessed(Ok(process_response(
            video_id, frames,
        ))));
        app.apply_command_result(CommandResult::ChatStarted {
            video_id: video_id.to_string(),
            result: Ok(ChatStartResponse {
                status: "success".to_string(),
                session_id: "sess-1".to_string(),
                video_id: video_id.to_string(),
                keyframes_count: frames,
                transcript_segments_count: 0,
            }),
        });
        // Drain the startup dispatches so tests can assert on fresh ones.
        while app.next_command().is_some() {}
        app
    }

    fn answer_with_refs(answer: &str) -> ChatMessageResponse {
        ChatMessageResponse {
            status: "success".to_string(),
            session_id: "sess-1".to_string(),
            answer: answer.to_string(),
            references: Some(ChatReferences {
                time_ranges: vec![ReferenceTimeRange {
                    start_time: 135.0,
                    end_time: 200.0,
                    text: "segment".to_string(),
                }],
                keyframe_ids: vec![2, 3],
            }),
            history_length: 1,
        }
    }

    fn history_item(id: &str, status: ProcessingStatus) -> VideoHistoryItem {
        VideoHistoryItem {
            id: id.to_string(),
            title: format!("video {id}"),
            duration: Some(323.0),
            created_at: "2025-06-01T12:00:00Z".to_string(),
            processing_status: status,
            source_type: SourceType::Youtube,
            thumbnail_url: None,
        }
    }

    // ── Scenario 1: submit → processing → completed ──────────────────

    #[test]
    fn submitting_a_url_processes_and_populates_the_record() {
        let mut app = app();
        assert_eq!(app.processing, ProcessingState::Idle);

        app.url_input = "https://youtu.be/abc".to_string();
        app.submit_video();
        assert_eq!(app.processing, ProcessingState::Processing);
        assert!(matches!(
            app.next_command(),
            Some(AsyncCommand::ProcessVideo { .. })
        ));

        app.apply_command_result(CommandResult::VideoProcessed(Ok(process_response(
            "vid-1", 3,
        ))));
        assert_eq!(app.processing, ProcessingState::Completed);
        let record = app.video.as_ref().unwrap();
        assert_eq!(record.id, "vid-1");
        assert!(!record.keyframes.is_empty());
        // A chat session starts for the new record and history refreshes.
        assert!(matches!(
            app.chat_state,
            ChatSessionState::Initializing { .. }
        ));
        assert!(matches!(
            app.next_command(),
            Some(AsyncCommand::StartChatSession { .. })
        ));
        assert!(matches!(
            app.next_command(),
            Some(AsyncCommand::FetchHistory { .. })
        ));
    }

    #[test]
    fn submit_is_blocked_while_processing() {
        let mut app = app();
        app.url_input = "https://youtu.be/abc".to_string();
        app.submit_video();
        let first = app.pending_count();
        app.submit_video();
        assert_eq!(app.pending_count(), first);
    }

    #[test]
    fn empty_input_is_rejected_before_dispatch() {
        let mut app = app();
        app.url_input = "   ".to_string();
        app.submit_video();
        assert_eq!(app.processing, ProcessingState::Idle);
        assert_eq!(app.pending_count(), 0);
        assert!(matches!(app.flash_message, Some((_, FlashLevel::Error))));
    }

    #[test]
    fn processing_failure_is_recoverable() {
        let mut app = app();
        app.url_input = "https://youtu.be/abc".to_string();
        app.submit_video();
        app.apply_command_result(CommandResult::VideoProcessed(Err("boom".to_string())));
        assert_eq!(app.processing, ProcessingState::Error);
        let (msg, level) = app.flash_message.clone().unwrap();
        assert_eq!(level, FlashLevel::Error);
        assert!(msg.contains("boom"));
        // Re-submission works.
        app.submit_video();
        assert_eq!(app.processing, ProcessingState::Processing);
    }

    // ── Chat session lifecycle ───────────────────────────────────────

    #[test]
    fn session_start_success_reaches_ready() {
        let app = ready_app("vid-1", 3);
        assert_eq!(
            app.chat_state,
            ChatSessionState::Ready {
                session_id: "sess-1".to_string()
            }
        );
    }

    #[test]
    fn session_start_failure_returns_to_no_session() {
        let mut app = app();
        app.apply_command_result(CommandResult::VideoProcessed(Ok(process_response(
            "vid-1", 1,
        ))));
        app.apply_command_result(CommandResult::ChatStarted {
            video_id: "vid-1".to_string(),
            result: Err("backend unavailable".to_string()),
        });
        assert_eq!(app.chat_state, ChatSessionState::NoSession);
        let (msg, level) = app.flash_message.clone().unwrap();
        assert_eq!(level, FlashLevel::Error);
        assert!(msg.contains("backend unavailable"));
    }

    #[test]
    fn stale_session_result_for_a_replaced_record_is_discarded() {
        let mut app = app();
        app.apply_command_result(CommandResult::VideoProcessed(Ok(process_response(
            "vid-2", 1,
        ))));
        app.apply_command_result(CommandResult::ChatStarted {
            video_id: "vid-1".to_string(),
            result: Ok(ChatStartResponse {
                status: "success".to_string(),
                session_id: "stale".to_string(),
                video_id: "vid-1".to_string(),
                keyframes_count: 0,
                transcript_segments_count: 0,
            }),
        });
        assert!(matches!(
            app.chat_state,
            ChatSessionState::Initializing { .. }
        ));
    }

    #[test]
    fn duplicate_session_start_is_suppressed_while_initializing() {
        let mut app = app();
        app.apply_command_result(CommandResult::VideoProcessed(Ok(process_response(
            "vid-1", 1,
        ))));
        while app.next_command().is_some() {}
        app.start_chat_session("vid-1".to_string());
        assert_eq!(app.pending_count(), 0);
    }

    // ── Scenario 3: send with attached keyframes ─────────────────────

    #[test]
    fn sending_with_two_attachments_carries_their_ids_and_clears_the_set() {
        let mut app = ready_app("vid-1", 4);
        app.gallery_state.select(Some(0));
        app.attach_selected_keyframe();
        app.gallery_state.select(Some(2));
        app.attach_selected_keyframe();
        assert_eq!(app.selected_keyframes.len(), 2);

        app.chat_input = "what happens here?".to_string();
        app.send_chat_message();

        let user_msg = &app.messages[app.messages.len() - 2];
        assert_eq!(user_msg.role, ChatRole::User);
        let ids: Vec<u32> = user_msg.attached_keyframes.iter().map(|kf| kf.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(app.selected_keyframes.is_empty());
        assert!(matches!(
            app.next_command(),
            Some(AsyncCommand::SendChatMessage { keyframe_ids: Some(ids), .. }) if ids == vec![1, 3]
        ));
    }

    #[test]
    fn first_attach_seeds_an_empty_input_with_the_default_prompt() {
        let mut app = ready_app("vid-1", 2);
        app.gallery_state.select(Some(0));
        app.attach_selected_keyframe();
        assert_eq!(app.chat_input, DEFAULT_KEYFRAME_PROMPT);

        // A composed question is not clobbered by a later first attach.
        app.selected_keyframes.take();
        app.chat_input = "my own question".to_string();
        app.gallery_state.select(Some(1));
        app.attach_selected_keyframe();
        assert_eq!(app.chat_input, "my own question");
    }

    #[test]
    fn attach_limit_and_duplicates_notify_without_changing_the_set() {
        let mut app = ready_app("vid-1", 6);
        for i in 0..5 {
            app.gallery_state.select(Some(i));
            app.attach_selected_keyframe();
        }
        assert_eq!(app.selected_keyframes.len(), 5);

        app.gallery_state.select(Some(5));
        app.attach_selected_keyframe();
        assert_eq!(app.selected_keyframes.len(), 5);
        let (msg, level) = app.flash_message.clone().unwrap();
        assert_eq!(level, FlashLevel::Error);
        assert!(msg.contains("limit"));

        app.gallery_state.select(Some(0));
        app.attach_selected_keyframe();
        assert_eq!(app.selected_keyframes.len(), 5);
        let (msg, level) = app.flash_message.clone().unwrap();
        assert_eq!(level, FlashLevel::Info);
        assert!(msg.contains("already selected"));
    }

    // ── Single in-flight send ────────────────────────────────────────

    #[test]
    fn send_while_sending_is_a_noop() {
        let mut app = ready_app("vid-1", 1);
        app.chat_input = "first".to_string();
        app.send_chat_message();
        assert!(app.chat_state.is_sending());
        let count = app.messages.len();

        app.chat_input = "second".to_string();
        app.send_chat_message();
        assert_eq!(app.messages.len(), count);
        assert_eq!(app.chat_input, "second");
        assert_eq!(app.pending_count(), 1);
    }

    #[test]
    fn blank_message_is_not_sent() {
        let mut app = ready_app("vid-1", 1);
        app.chat_input = "   ".to_string();
        app.send_chat_message();
        assert!(app.messages.is_empty());
        assert_eq!(app.pending_count(), 0);
    }

    // ── Answer handling ──────────────────────────────────────────────

    #[test]
    fn answer_fills_the_placeholder_and_starts_reveal_and_pulse() {
        let mut app = ready_app("vid-1", 4);
        app.chat_input = "where is the intro?".to_string();
        app.send_chat_message();

        app.apply_command_result(CommandResult::ChatAnswer(Ok(answer_with_refs(
            "At 2:15 the intro begins.",
        ))));

        assert!(app.chat_state.is_ready());
        let answer = app.messages.last().unwrap();
        assert_eq!(answer.content, "At 2:15 the intro begins.");
        assert_eq!(answer.timestamp, Some(135));
        assert_eq!(answer.related_keyframes, vec![2, 3]);
        assert!(app.reveal.is_revealing_message(&answer.id));
        assert_eq!(app.highlighted_ids(), &[2, 3]);
    }

    // ── Scenario 4: backend rejection ────────────────────────────────

    #[test]
    fn rejected_answer_embeds_the_detail_and_never_streams() {
        let mut app = ready_app("vid-1", 1);
        app.chat_input = "why?".to_string();
        app.send_chat_message();

        app.apply_command_result(CommandResult::ChatAnswer(Err("rate limited".to_string())));

        assert!(app.chat_state.is_ready());
        let answer = app.messages.last().unwrap();
        assert!(answer.content.contains("rate limited"));
        assert!(!app.reveal.is_revealing_message(&answer.id));
        assert!(app.highlight.is_none());
        // The interface stays usable: the next send goes through.
        app.chat_input = "retry".to_string();
        app.send_chat_message();
        assert!(app.chat_state.is_sending());
    }

    #[test]
    fn clear_chat_empties_messages_but_keeps_the_session() {
        let mut app = ready_app("vid-1", 1);
        app.chat_input = "hello".to_string();
        app.send_chat_message();
        app.apply_command_result(CommandResult::ChatAnswer(Ok(answer_with_refs("hi"))));

        app.clear_chat();
        assert!(app.messages.is_empty());
        assert_eq!(
            app.chat_state,
            ChatSessionState::Ready {
                session_id: "sess-1".to_string()
            }
        );
    }

    #[test]
    fn new_record_resets_chat_and_selection_state() {
        let mut app = ready_app("vid-1", 3);
        app.gallery_state.select(Some(0));
        app.attach_selected_keyframe();
        app.chat_input = "pending question".to_string();
        app.messages.push(ChatMessage::user("old".to_string(), Vec::new()));

        app.apply_command_result(CommandResult::VideoProcessed(Ok(process_response(
            "vid-2", 2,
        ))));

        assert!(app.messages.is_empty());
        assert!(app.selected_keyframes.is_empty());
        assert!(app.chat_input.is_empty());
        assert!(matches!(
            app.chat_state,
            ChatSessionState::Initializing { ref video_id } if video_id == "vid-2"
        ));
    }

    // ── Scenario 2: history gating ───────────────────────────────────

    #[test]
    fn clicking_an_unfinished_history_item_only_notifies() {
        let mut app = app();
        app.apply_command_result(CommandResult::History(Ok(VideoHistoryResponse {
            status: "success".to_string(),
            videos: vec![history_item("vid-9", ProcessingStatus::Processing)],
            total: 1,
            message: None,
        })));
        app.history_state.select(Some(0));
        app.select_history_item();

        assert_eq!(app.pending_count(), 0);
        assert_eq!(app.processing, ProcessingState::Idle);
        let (msg, level) = app.flash_message.clone().unwrap();
        assert_eq!(level, FlashLevel::Info);
        assert!(msg.contains("not viewable"));
    }

    #[test]
    fn clicking_a_completed_history_item_loads_details() {
        let mut app = app();
        app.apply_command_result(CommandResult::History(Ok(VideoHistoryResponse {
            status: "success".to_string(),
            videos: vec![history_item("vid-9", ProcessingStatus::Completed)],
            total: 1,
            message: None,
        })));
        app.history_state.select(Some(0));
        app.select_history_item();

        assert_eq!(app.processing, ProcessingState::Processing);
        assert!(matches!(
            app.next_command(),
            Some(AsyncCommand::FetchVideoDetails { ref video_id }) if video_id == "vid-9"
        ));
    }

    #[test]
    fn history_failure_is_inline_and_retryable() {
        let mut app = app();
        app.refresh_history();
        app.apply_command_result(CommandResult::History(Err("timeout".to_string())));
        assert_eq!(app.history_error.as_deref(), Some("timeout"));
        assert!(!app.history_loading);

        app.refresh_history();
        assert!(app.history_error.is_none());
        assert!(app.history_loading);
    }

    #[test]
    fn anonymous_history_keeps_the_backend_message() {
        let mut app = app();
        app.apply_command_result(CommandResult::History(Ok(VideoHistoryResponse {
            status: "success".to_string(),
            videos: Vec::new(),
            total: 0,
            message: Some("Sign in to keep your history".to_string()),
        })));
        assert!(app.history.is_empty());
        assert_eq!(
            app.history_notice.as_deref(),
            Some("Sign in to keep your history")
        );
    }

    // ── Timer-driven effects ─────────────────────────────────────────

    #[test]
    fn highlight_pulse_expires_after_its_window() {
        let mut app = ready_app("vid-1", 4);
        app.chat_input = "q".to_string();
        app.send_chat_message();
        app.apply_command_result(CommandResult::ChatAnswer(Ok(answer_with_refs("a"))));
        assert!(!app.highlighted_ids().is_empty());

        app.tick(Instant::now() + Duration::from_secs(4));
        assert!(app.highlighted_ids().is_empty());
    }

    // ── Suggested questions ──────────────────────────────────────────

    #[test]
    fn digit_on_empty_chat_input_picks_a_suggested_question() {
        let mut app = ready_app("vid-1", 1);
        app.view = View::Main;
        app.pane = Pane::Chat;
        app.handle_key(KeyEvent::from(KeyCode::Char('2')));
        assert_eq!(app.chat_input, SUGGESTED_QUESTIONS[1]);

        // With text present the digit is just a character.
        app.chat_input = "top ".to_string();
        app.handle_key(KeyEvent::from(KeyCode::Char('3')));
        assert_eq!(app.chat_input, "top 3");
    }
}
