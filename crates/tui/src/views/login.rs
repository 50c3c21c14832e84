use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::App;
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(Clear, area);

    let card_width = 62u16.min(area.width.saturating_sub(4));
    let card_height = 14u16.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(card_width)) / 2;
    let y = (area.height.saturating_sub(card_height)) / 2;
    let card = Rect::new(x, y, card_width, card_height);

    let mode = if app.login.signup { " Sign Up " } else { " Sign In " };
    let block = Theme::block_accent()
        .title(mode)
        .padding(Theme::PADDING_CARD);
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("vidsage ", Style::new().fg(Theme::ACCENT_ORANGE).bold()),
            Span::styled(
                "— sign in to keep your video history",
                Style::new().fg(Theme::TEXT_SECONDARY),
            ),
        ]),
        Line::raw(""),
    ];

    let field = |label: &str, value: String, active: bool| {
        let pointer = if active { "› " } else { "  " };
        let pointer_style = if active {
            Style::new().fg(Theme::ACCENT_BLUE)
        } else {
            Style::new().fg(Theme::TEXT_MUTED)
        };
        let mut spans = vec![
            Span::styled(pointer.to_string(), pointer_style),
            Span::styled(format!("{label:<10}"), Style::new().fg(Theme::TEXT_SECONDARY)),
            Span::styled(value, Style::new().fg(Theme::TEXT_PRIMARY)),
        ];
        if active {
            spans.push(Span::styled("_", Style::new().fg(Theme::ACCENT_YELLOW)));
        }
        Line::from(spans)
    };

    lines.push(field(
        "Email",
        app.login.email.clone(),
        app.login.field_index == 0,
    ));
    lines.push(field(
        "Password",
        "*".repeat(app.login.password.chars().count()),
        app.login.field_index == 1,
    ));
    lines.push(Line::raw(""));

    if let Some(status) = &app.login.status {
        let color = if status.starts_with("Error") {
            Theme::ACCENT_RED
        } else {
            Theme::ACCENT_YELLOW
        };
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::new().fg(color),
        )));
        lines.push(Line::raw(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Enter ", key_style),
        Span::styled("submit  ", desc_style),
        Span::styled("Tab ", key_style),
        Span::styled("field  ", desc_style),
        Span::styled("F2 ", key_style),
        Span::styled(
            if app.login.signup {
                "sign in instead  "
            } else {
                "sign up instead  "
            },
            desc_style,
        ),
        Span::styled("Esc ", key_style),
        Span::styled("skip (anonymous)", desc_style),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
