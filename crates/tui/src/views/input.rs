use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph};

use vidsage_core::format::{format_duration, format_relative_time};

use crate::app::{App, Pane, ProcessingState};
use crate::theme::{status_color, status_tag, Theme};

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let [input_area, history_area] =
        Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).areas(area);
    render_input(frame, app, input_area);
    render_history(frame, app, history_area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::pane_block(app.pane == Pane::Input)
        .title(" Video Input ")
        .padding(Theme::PADDING_COMPACT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();

    let input_line = if app.url_input.is_empty() && !app.input_editing {
        Line::from(Span::styled(
            "https://youtube.com/watch?v=…  or  /path/to/video.mp4",
            Style::new().fg(Theme::TEXT_HINT),
        ))
    } else {
        let mut spans = vec![Span::styled(
            app.url_input.clone(),
            Style::new().fg(Theme::TEXT_PRIMARY),
        )];
        if app.input_editing {
            spans.push(Span::styled("_", Style::new().fg(Theme::ACCENT_YELLOW)));
        }
        Line::from(spans)
    };
    lines.push(input_line);
    lines.push(Line::raw(""));

    let hint = if app.processing == ProcessingState::Processing {
        Line::from(Span::styled(
            "processing — input disabled",
            Style::new().fg(Theme::ACCENT_YELLOW).italic(),
        ))
    } else if app.input_editing {
        Line::from(vec![
            Span::styled("Enter ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("analyze  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
            Span::styled("Esc ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("cancel", Style::new().fg(Theme::TEXT_KEY_DESC)),
        ])
    } else {
        Line::from(vec![
            Span::styled("i ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("edit  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
            Span::styled("Enter ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("analyze", Style::new().fg(Theme::TEXT_KEY_DESC)),
        ])
    };
    lines.push(hint);

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.pane == Pane::History;
    let title = if app.history_loading {
        " History (loading…) "
    } else {
        " History "
    };
    let block = Theme::pane_block(focused).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = &app.history_error {
        let lines = vec![
            Line::from(Span::styled(
                format!("Could not load history: {error}"),
                Style::new().fg(Theme::ACCENT_RED),
            )),
            Line::raw(""),
            Line::from(vec![
                Span::styled("r ", Style::new().fg(Theme::TEXT_KEY)),
                Span::styled("retry", Style::new().fg(Theme::TEXT_KEY_DESC)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: true }), inner);
        return;
    }

    if app.history.is_empty() {
        let notice = app
            .history_notice
            .clone()
            .unwrap_or_else(|| "No videos yet".to_string());
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                notice,
                Style::new().fg(Theme::TEXT_MUTED),
            )))
            .wrap(ratatui::widgets::Wrap { trim: true }),
            inner,
        );
        return;
    }

    let now = Utc::now();
    let items: Vec<ListItem> = app
        .history
        .iter()
        .map(|item| {
            let status = item.processing_status;
            let title_line = Line::from(vec![
                Span::styled(
                    format!("{} ", status_tag(status)),
                    Style::new().fg(status_color(status)),
                ),
                Span::styled(item.title.clone(), Style::new().fg(Theme::TEXT_PRIMARY)),
            ]);
            let mut meta = vec![Span::styled(
                format!("  {} · ", item.source_type),
                Style::new().fg(Theme::TEXT_MUTED),
            )];
            if let Some(duration) = item.duration {
                meta.push(Span::styled(
                    format!("{} · ", format_duration(duration.max(0.0) as u64)),
                    Style::new().fg(Theme::TEXT_MUTED),
                ));
            }
            let age = parse_timestamp(&item.created_at)
                .map(|then| format_relative_time(then, now))
                .unwrap_or_else(|| item.created_at.clone());
            meta.push(Span::styled(age, Style::new().fg(Theme::TEXT_MUTED)));
            ListItem::new(vec![title_line, Line::from(meta)])
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::new()
                .bg(Theme::BORDER_NORMAL)
                .fg(Theme::TEXT_PRIMARY),
        )
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, inner, &mut app.history_state);
}

/// Backend timestamps are RFC 3339 in practice, with a naive fallback for
/// older rows.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;

    #[test]
    fn parses_rfc3339_timestamps() {
        let dt = parse_timestamp("2025-06-01T12:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_748_779_200);
    }

    #[test]
    fn parses_naive_timestamps() {
        assert!(parse_timestamp("2025-06-01T12:00:00.123").is_some());
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
