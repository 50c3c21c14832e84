use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect) {
    let width = 58u16.min(area.width.saturating_sub(4));
    let height = 28u16.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);
    let block = Theme::block_accent()
        .title(" Help ")
        .padding(Theme::PADDING_CARD);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let key = Style::new().fg(Theme::TEXT_KEY);
    let desc = Style::new().fg(Theme::TEXT_KEY_DESC);
    let section = Style::new().fg(Theme::ACCENT_BLUE).bold();

    let row = |k: &str, d: &str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), key),
            Span::styled(d.to_string(), desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Global", section)),
        row("Tab / S-Tab", "cycle pane focus"),
        row("?", "toggle this help"),
        row("q", "quit (outside the chat pane)"),
        Line::raw(""),
        Line::from(Span::styled("Video input & history", section)),
        row("i", "edit the link / file path"),
        row("Enter", "analyze · open history entry"),
        row("j / k", "move in the history list"),
        row("r", "reload history"),
        Line::raw(""),
        Line::from(Span::styled("Results", section)),
        row("1 / 2 / 3", "keyframes · summary · transcript"),
        row("j / k", "move / scroll"),
        row("Enter", "jump the timeline to the keyframe"),
        row("a", "attach keyframe to the next question"),
        Line::raw(""),
        Line::from(Span::styled("Chat", section)),
        row("Enter", "send"),
        row("1-3", "insert a suggested question (empty input)"),
        row("Ctrl+L", "clear chat"),
        row("Ctrl+X", "remove the last attached keyframe"),
        row("Ctrl+J", "jump to the latest answer's timestamp"),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}
