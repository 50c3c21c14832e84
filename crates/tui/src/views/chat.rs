use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

use vidsage_core::chat::ChatRole;
use vidsage_core::format::format_timestamp;

use crate::app::{App, ChatSessionState, Pane, SUGGESTED_QUESTIONS};
use crate::markdown::render_markdown;
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.pane == Pane::Chat;
    let block = Theme::pane_block(focused).title(" Chat with Video ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let show_suggestions = app.chat_state.is_ready()
        && app.messages.is_empty()
        && app.chat_input.is_empty();
    let show_attachments = !app.selected_keyframes.is_empty();

    let mut constraints = vec![Constraint::Length(1), Constraint::Fill(1)];
    if show_attachments {
        constraints.push(Constraint::Length(1));
    }
    if show_suggestions {
        constraints.push(Constraint::Length(SUGGESTED_QUESTIONS.len() as u16 + 1));
    }
    constraints.push(Constraint::Length(3));
    let chunks = Layout::vertical(constraints).split(inner);

    let mut idx = 0;
    render_status(frame, app, chunks[idx]);
    idx += 1;
    render_messages(frame, app, chunks[idx]);
    idx += 1;
    if show_attachments {
        render_attachments(frame, app, chunks[idx]);
        idx += 1;
    }
    if show_suggestions {
        render_suggestions(frame, chunks[idx]);
        idx += 1;
    }
    render_input(frame, app, chunks[idx]);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (dot_color, label) = match &app.chat_state {
        ChatSessionState::NoSession => (Theme::TEXT_MUTED, "waiting for a video"),
        ChatSessionState::Initializing { .. } => (Theme::ACCENT_YELLOW, "starting session…"),
        ChatSessionState::Ready { .. } => (Theme::ACCENT_GREEN, "session ready"),
        ChatSessionState::Sending { .. } => (Theme::ACCENT_BLUE, "thinking…"),
    };
    let line = Line::from(vec![
        Span::styled("● ", Style::new().fg(dot_color)),
        Span::styled(label, Style::new().fg(Theme::TEXT_SECONDARY)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_messages(frame: &mut Frame, app: &App, area: Rect) {
    if app.messages.is_empty() {
        let hint = match &app.chat_state {
            ChatSessionState::Ready { .. } => "Ask anything about the video content",
            _ => "Process a video to start chatting",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hint,
                Style::new().fg(Theme::TEXT_MUTED),
            )))
            .alignment(Alignment::Center),
            area,
        );
        return;
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    for msg in &app.messages {
        match msg.role {
            ChatRole::User => {
                let mut header = vec![Span::styled(
                    "You",
                    Style::new().fg(Theme::ROLE_USER).bold(),
                )];
                for kf in &msg.attached_keyframes {
                    header.push(Span::styled(
                        format!("  [#{} {}]", kf.id, format_timestamp(kf.timestamp)),
                        Style::new().fg(Theme::ACCENT_YELLOW),
                    ));
                }
                lines.push(Line::from(header));
                for text in msg.content.lines() {
                    lines.push(Line::from(Span::styled(
                        text.to_string(),
                        Style::new().fg(Theme::TEXT_PRIMARY),
                    )));
                }
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "Assistant",
                    Style::new().fg(Theme::ROLE_ASSISTANT).bold(),
                )));
                if msg.is_pending() {
                    lines.push(Line::from(Span::styled(
                        "▌",
                        Style::new().fg(Theme::ACCENT_BLUE),
                    )));
                } else if app.reveal.is_revealing_message(&msg.id) {
                    let mut rendered = render_markdown(app.reveal.visible_prefix());
                    let cursor = Span::styled("▌", Style::new().fg(Theme::ACCENT_BLUE));
                    match rendered.last_mut() {
                        Some(last) => last.spans.push(cursor),
                        None => rendered.push(Line::from(cursor)),
                    }
                    lines.extend(rendered);
                } else {
                    lines.extend(render_markdown(&msg.content));
                    // Reference chips appear only after the reveal finished.
                    let mut chips = Vec::new();
                    if let Some(ts) = msg.timestamp {
                        chips.push(Span::styled(
                            format!("⏱ {}", format_timestamp(ts)),
                            Style::new().fg(Theme::ACCENT_CYAN),
                        ));
                        chips.push(Span::styled(
                            "  Ctrl+J jump",
                            Style::new().fg(Theme::TEXT_HINT),
                        ));
                    }
                    if !msg.related_keyframes.is_empty() {
                        let refs = msg
                            .related_keyframes
                            .iter()
                            .map(|id| format!("#{id}"))
                            .collect::<Vec<_>>()
                            .join(" ");
                        chips.push(Span::styled(
                            format!("  frames: {refs}"),
                            Style::new().fg(Theme::HIGHLIGHT_PULSE),
                        ));
                    }
                    if !chips.is_empty() {
                        lines.push(Line::from(chips));
                    }
                }
            }
        }
        lines.push(Line::raw(""));
    }

    let total = lines.len() as u16;
    let base = total.saturating_sub(area.height);
    let scroll = base.saturating_sub(app.chat_scroll_offset);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

fn render_attachments(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "Attached: ",
        Style::new().fg(Theme::TEXT_SECONDARY),
    )];
    for kf in app.selected_keyframes.frames() {
        spans.push(Span::styled(
            format!("#{} ", kf.id),
            Style::new().fg(Theme::ACCENT_YELLOW),
        ));
    }
    spans.push(Span::styled(
        " Ctrl+X remove",
        Style::new().fg(Theme::TEXT_HINT),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_suggestions(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "Suggested questions:",
        Style::new().fg(Theme::TEXT_SECONDARY),
    ))];
    for (i, question) in SUGGESTED_QUESTIONS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", i + 1), Style::new().fg(Theme::TEXT_KEY)),
            Span::styled(*question, Style::new().fg(Theme::TEXT_MUTED)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.pane == Pane::Chat;
    let block = if focused && app.chat_state.is_ready() {
        Theme::block_accent()
    } else {
        Theme::block_dim()
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = match &app.chat_state {
        ChatSessionState::NoSession => Line::from(Span::styled(
            "process a video to start chatting",
            Style::new().fg(Theme::TEXT_HINT),
        )),
        ChatSessionState::Initializing { .. } => Line::from(Span::styled(
            "starting chat session…",
            Style::new().fg(Theme::TEXT_HINT),
        )),
        ChatSessionState::Sending { .. } => Line::from(Span::styled(
            "waiting for the answer…",
            Style::new().fg(Theme::TEXT_HINT),
        )),
        ChatSessionState::Ready { .. } => {
            if app.chat_input.is_empty() && !focused {
                Line::from(Span::styled(
                    "Type your question…",
                    Style::new().fg(Theme::TEXT_HINT),
                ))
            } else {
                let mut spans = vec![Span::styled(
                    app.chat_input.clone(),
                    Style::new().fg(Theme::TEXT_PRIMARY),
                )];
                if focused {
                    spans.push(Span::styled("_", Style::new().fg(Theme::ACCENT_YELLOW)));
                }
                Line::from(spans)
            }
        }
    };
    frame.render_widget(Paragraph::new(line), inner);
}
