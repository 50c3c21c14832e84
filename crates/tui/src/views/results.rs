use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph, Wrap};

use vidsage_core::format::{format_timestamp, parse_duration};

use crate::app::{App, Pane, ProcessingState, ResultsTab};
use crate::markdown::render_markdown;
use crate::theme::Theme;

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Cosmetic step list shown while processing: (label, seconds after which
/// the step is presented as done).
const STEPS: [(&str, u64); 4] = [
    ("Downloading video", 3),
    ("Extracting keyframes", 8),
    ("Transcribing audio", 20),
    ("Generating summary", u64::MAX),
];

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Theme::pane_block(app.pane == Pane::Results).title(" Results ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.processing {
        ProcessingState::Idle => render_welcome(frame, inner),
        ProcessingState::Processing => render_processing(frame, app, inner),
        ProcessingState::Error => render_error(frame, inner),
        ProcessingState::Completed => {
            if app.video.is_some() {
                render_completed(frame, app, inner);
            } else {
                render_welcome(frame, inner);
            }
        }
    }
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            "Analyze your videos",
            Style::new().fg(Theme::TEXT_PRIMARY).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Submit a YouTube link or a local file on the left. The backend",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "transcribes it, extracts keyframes and writes a summary — then",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "chat with the video content on the right.",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Tab ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("switch panes  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
            Span::styled("? ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("help", Style::new().fg(Theme::TEXT_KEY_DESC)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_error(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            "Processing failed",
            Style::new().fg(Theme::ACCENT_RED).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "The error is shown in the footer. Adjust the input and submit again.",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_processing(frame: &mut Frame, app: &App, area: Rect) {
    let elapsed = app
        .processing_started
        .map(|t| t.elapsed())
        .unwrap_or_default();
    let spinner = SPINNER[(elapsed.as_millis() / 120) as usize % SPINNER.len()];

    let label = app.processing_label.as_deref().unwrap_or("video");
    let mut lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("{spinner} "), Style::new().fg(Theme::ACCENT_BLUE)),
            Span::styled(
                format!("Processing \"{label}\"…"),
                Style::new().fg(Theme::TEXT_PRIMARY).bold(),
            ),
        ]),
        Line::raw(""),
    ];

    let elapsed_secs = elapsed.as_secs();
    let mut current_found = false;
    for (step, done_after) in STEPS {
        let done = elapsed_secs >= done_after;
        let (icon, style) = if done {
            ("✓", Style::new().fg(Theme::ACCENT_GREEN))
        } else if !current_found {
            current_found = true;
            (spinner, Style::new().fg(Theme::ACCENT_BLUE))
        } else {
            ("·", Style::new().fg(Theme::TEXT_MUTED))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {icon} "), style),
            Span::styled(step, style),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "No timeout is applied — large videos can take a while.",
        Style::new().fg(Theme::TEXT_HINT),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_completed(frame: &mut Frame, app: &mut App, area: Rect) {
    let [timeline_area, tabs_area, content_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    render_timeline(frame, app, timeline_area);
    render_tabs(frame, app, tabs_area);
    match app.results_tab {
        ResultsTab::Keyframes => render_gallery(frame, app, content_area),
        ResultsTab::Summary => render_summary(frame, app, content_area),
        ResultsTab::Transcript => render_transcript(frame, app, content_area),
    }
}

fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let Some(video) = app.video.as_ref() else {
        return;
    };
    let width = area.width as usize;
    if width < 8 {
        return;
    }

    // Fall back to the last keyframe when the duration string is unparseable.
    let total = parse_duration(&video.duration)
        .filter(|t| *t > 0)
        .unwrap_or_else(|| video.keyframes.last().map(|kf| kf.timestamp + 1).unwrap_or(1));
    let position = |seconds: u32| -> usize {
        ((seconds.min(total) as usize) * (width - 1)) / total as usize
    };

    let highlighted = app.highlighted_ids();
    let mut bar: Vec<Span> = (0..width)
        .map(|_| Span::styled("─", Style::new().fg(Theme::TIMELINE_BAR)))
        .collect();
    for kf in &video.keyframes {
        let color = if highlighted.contains(&kf.id) {
            Theme::HIGHLIGHT_PULSE
        } else {
            Theme::TIMELINE_TICK
        };
        bar[position(kf.timestamp)] = Span::styled("●", Style::new().fg(color));
    }

    let cursor = position(app.current_timestamp);
    let mut marker: Vec<Span> = (0..width).map(|_| Span::raw(" ")).collect();
    marker[cursor] = Span::styled("▼", Style::new().fg(Theme::ACCENT_RED));

    let left = "0:00".to_string();
    let mid = format!("at {}", format_timestamp(app.current_timestamp));
    let right = video.duration.clone();
    let pad_total = width.saturating_sub(left.len() + mid.len() + right.len());
    let labels = Line::from(vec![
        Span::styled(left, Style::new().fg(Theme::TEXT_MUTED)),
        Span::raw(" ".repeat(pad_total / 2)),
        Span::styled(mid, Style::new().fg(Theme::TEXT_SECONDARY)),
        Span::raw(" ".repeat(pad_total - pad_total / 2)),
        Span::styled(right, Style::new().fg(Theme::TEXT_MUTED)),
    ]);

    let lines = vec![Line::from(marker), Line::from(bar), labels];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [
        ("1:Keyframes", ResultsTab::Keyframes),
        ("2:Summary", ResultsTab::Summary),
        ("3:Transcript", ResultsTab::Transcript),
    ];
    let mut spans = vec![Span::raw(" ")];
    for (label, tab) in tabs {
        let style = if app.results_tab == tab {
            Style::new().fg(Color::Black).bg(Theme::ACCENT_BLUE).bold()
        } else {
            Style::new().fg(Theme::TEXT_MUTED)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_gallery(frame: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = {
        let Some(video) = app.video.as_ref() else {
            return;
        };
        let highlighted = app.highlighted_ids().to_vec();
        let attached = app.selected_keyframes.ids();
        video
            .keyframes
            .iter()
            .map(|kf| {
                let pulsing = highlighted.contains(&kf.id);
                let title_style = if pulsing {
                    Style::new().fg(Theme::HIGHLIGHT_PULSE).bold()
                } else {
                    Style::new().fg(Theme::TEXT_PRIMARY)
                };
                let mut title = vec![
                    Span::styled(format!("#{:<3}", kf.id), title_style),
                    Span::styled(
                        format!(" {} ", format_timestamp(kf.timestamp)),
                        Style::new().fg(Theme::ACCENT_CYAN),
                    ),
                ];
                if attached.contains(&kf.id) {
                    title.push(Span::styled(
                        " +attached",
                        Style::new().fg(Theme::ACCENT_YELLOW),
                    ));
                }
                if pulsing {
                    title.push(Span::styled(
                        " ◆ referenced",
                        Style::new().fg(Theme::HIGHLIGHT_PULSE),
                    ));
                }
                let description = Line::from(Span::styled(
                    format!("    {}", kf.description),
                    Style::new().fg(Theme::TEXT_CONTENT),
                ));
                ListItem::new(vec![Line::from(title), description])
            })
            .collect()
    };

    let list = List::new(items)
        .highlight_style(
            Style::new()
                .bg(Theme::BORDER_NORMAL)
                .fg(Theme::TEXT_PRIMARY),
        )
        .highlight_symbol("› ");
    frame.render_stateful_widget(list, area, &mut app.gallery_state);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let Some(video) = app.video.as_ref() else {
        return;
    };
    let lines = render_markdown(&video.summary);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.summary_scroll, 0)),
        area,
    );
}

fn render_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let Some(video) = app.video.as_ref() else {
        return;
    };
    let text = if video.transcript.is_empty() {
        Line::from(Span::styled(
            "No transcript available",
            Style::new().fg(Theme::TEXT_MUTED),
        ))
    } else {
        Line::from(Span::styled(
            video.transcript.clone(),
            Style::new().fg(Theme::TEXT_CONTENT),
        ))
    };
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .scroll((app.transcript_scroll, 0)),
        area,
    );
}
