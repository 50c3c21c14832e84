use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{App, FlashLevel, Pane, ProcessingState, ServerStatus, View};
use crate::theme::Theme;
use crate::views::{chat, help, input, login, results};

pub fn render(frame: &mut Frame, app: &mut App) {
    // Login is always full-screen.
    if matches!(app.view, View::Login) {
        login::render(frame, app, frame.area());
        return;
    }

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, app, header_area);

    let [left, center, right] = Layout::horizontal([
        Constraint::Percentage(26),
        Constraint::Fill(1),
        Constraint::Percentage(30),
    ])
    .areas(body_area);

    input::render(frame, app, left);
    results::render(frame, app, center);
    chat::render(frame, app, right);

    render_footer(frame, app, footer_area);

    // Help overlay
    if matches!(app.view, View::Help) {
        help::render(frame, frame.area());
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Left side: app name + processing badge + current video
    let mut left_spans = vec![Span::styled(
        " vidsage ",
        Style::new().fg(Theme::ACCENT_ORANGE).bold(),
    )];

    let (badge, badge_color) = match app.processing {
        ProcessingState::Idle => ("IDLE", Theme::TEXT_MUTED),
        ProcessingState::Processing => ("PROCESSING", Theme::ACCENT_YELLOW),
        ProcessingState::Completed => ("READY", Theme::ACCENT_GREEN),
        ProcessingState::Error => ("ERROR", Theme::ACCENT_RED),
    };
    left_spans.push(Span::styled(
        format!(" {badge} "),
        Style::new().fg(Color::Black).bg(badge_color).bold(),
    ));

    if let Some(video) = &app.video {
        left_spans.push(Span::styled("  ", Style::new()));
        left_spans.push(Span::styled(
            video.title.clone(),
            Style::new().fg(Theme::ACCENT_BLUE),
        ));
        left_spans.push(Span::styled(
            format!("  {}", video.duration),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(left_spans)).alignment(Alignment::Left),
        inner,
    );

    // Right side: backend health + per-service status + auth state
    let mut right_spans = Vec::new();
    match app.server_status {
        ServerStatus::Online => {
            right_spans.push(Span::styled("online ", Style::new().fg(Theme::ACCENT_GREEN)));
        }
        ServerStatus::Offline => {
            right_spans.push(Span::styled("offline ", Style::new().fg(Theme::ACCENT_RED)));
        }
        ServerStatus::Unknown => {}
    }
    if !app.services.is_empty() {
        let up = app.services.iter().filter(|(_, ok)| *ok).count();
        let total = app.services.len();
        let color = if up == total {
            Theme::ACCENT_GREEN
        } else {
            Theme::ACCENT_YELLOW
        };
        right_spans.push(Span::styled(
            format!("{up}/{total} services "),
            Style::new().fg(color),
        ));
    }
    right_spans.push(Span::styled(
        if app.is_authenticated() {
            "signed in "
        } else {
            "anonymous "
        },
        Style::new().fg(Theme::TEXT_SECONDARY),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(right_spans)).alignment(Alignment::Right),
        inner,
    );
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let mut spans = match app.pane {
        Pane::Input => vec![
            Span::styled(" i ", key_style),
            Span::styled("edit  ", desc_style),
            Span::styled("Enter ", key_style),
            Span::styled("analyze  ", desc_style),
            Span::styled("Tab ", key_style),
            Span::styled("pane  ", desc_style),
            Span::styled("? ", key_style),
            Span::styled("help  ", desc_style),
            Span::styled("q ", key_style),
            Span::styled("quit", desc_style),
        ],
        Pane::History => vec![
            Span::styled(" j/k ", key_style),
            Span::styled("navigate  ", desc_style),
            Span::styled("Enter ", key_style),
            Span::styled("open  ", desc_style),
            Span::styled("r ", key_style),
            Span::styled("reload  ", desc_style),
            Span::styled("Tab ", key_style),
            Span::styled("pane  ", desc_style),
            Span::styled("q ", key_style),
            Span::styled("quit", desc_style),
        ],
        Pane::Results => vec![
            Span::styled(" 1-3 ", key_style),
            Span::styled("tab  ", desc_style),
            Span::styled("j/k ", key_style),
            Span::styled("move  ", desc_style),
            Span::styled("Enter ", key_style),
            Span::styled("jump  ", desc_style),
            Span::styled("a ", key_style),
            Span::styled("attach  ", desc_style),
            Span::styled("Tab ", key_style),
            Span::styled("pane  ", desc_style),
            Span::styled("q ", key_style),
            Span::styled("quit", desc_style),
        ],
        Pane::Chat => vec![
            Span::styled(" Enter ", key_style),
            Span::styled("send  ", desc_style),
            Span::styled("C-l ", key_style),
            Span::styled("clear  ", desc_style),
            Span::styled("C-x ", key_style),
            Span::styled("detach  ", desc_style),
            Span::styled("C-j ", key_style),
            Span::styled("jump  ", desc_style),
            Span::styled("Tab ", key_style),
            Span::styled("pane", desc_style),
        ],
    };

    // Append flash message to any pane's footer
    if let Some((msg, level)) = &app.flash_message {
        let color = match level {
            FlashLevel::Success => Theme::ACCENT_GREEN,
            FlashLevel::Error => Theme::ACCENT_RED,
            FlashLevel::Info => Theme::ACCENT_BLUE,
        };
        spans.push(Span::styled("  ", Style::new()));
        spans.push(Span::styled(msg.clone(), Style::new().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
