use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};

use vidsage_api::ProcessingStatus;

pub struct Theme;

impl Theme {
    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_DIM: Color = Color::DarkGray;
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_HINT: Color = Color::Rgb(60, 65, 80);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);
    pub const ACCENT_ORANGE: Color = Color::Rgb(217, 119, 80);
    pub const ACCENT_CYAN: Color = Color::Rgb(80, 200, 200);

    // ── Chat role colors ─────────────────────────────────────────────
    pub const ROLE_USER: Color = Color::Rgb(80, 180, 100);
    pub const ROLE_ASSISTANT: Color = Color::Rgb(100, 140, 220);

    // ── Timeline / gallery ───────────────────────────────────────────
    pub const TIMELINE_BAR: Color = Color::Rgb(70, 75, 90);
    pub const TIMELINE_TICK: Color = Color::Rgb(100, 180, 240);
    pub const HIGHLIGHT_PULSE: Color = Color::Rgb(220, 180, 60);

    // ── Markdown / code ──────────────────────────────────────────────
    pub const MD_HEADING: Color = Color::Rgb(100, 180, 240);
    pub const MD_BULLET: Color = Color::Rgb(80, 200, 200);
    pub const MD_QUOTE: Color = Color::Rgb(140, 145, 160);
    pub const MD_LINK: Color = Color::Rgb(100, 180, 240);
    pub const MD_CODE: Color = Color::Rgb(220, 180, 60);
    pub const CODE_KEYWORD: Color = Color::Rgb(180, 140, 220);
    pub const CODE_STRING: Color = Color::Rgb(80, 200, 120);
    pub const CODE_NUMBER: Color = Color::Rgb(217, 119, 80);
    pub const CODE_COMMENT: Color = Color::Rgb(80, 85, 100);
    pub const CODE_TEXT: Color = Color::Rgb(170, 175, 190);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_CARD: Padding = Padding::new(2, 2, 1, 1);
    pub const PADDING_COMPACT: Padding = Padding::new(1, 1, 0, 0);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }

    pub fn block_dim() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_DIM))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }

    /// Focused panes get the accent border.
    pub fn pane_block(focused: bool) -> Block<'static> {
        if focused {
            Self::block_accent()
        } else {
            Self::block()
        }
    }
}

// ── Processing status color / tag ────────────────────────────────────

pub fn status_color(status: ProcessingStatus) -> Color {
    match status {
        ProcessingStatus::Pending => Theme::TEXT_SECONDARY,
        ProcessingStatus::Processing => Theme::ACCENT_YELLOW,
        ProcessingStatus::Completed => Theme::ACCENT_GREEN,
        ProcessingStatus::Failed => Theme::ACCENT_RED,
    }
}

pub fn status_tag(status: ProcessingStatus) -> &'static str {
    match status {
        ProcessingStatus::Pending => "…",
        ProcessingStatus::Processing => "⟳",
        ProcessingStatus::Completed => "●",
        ProcessingStatus::Failed => "✗",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_colors_are_distinct() {
        let colors = [
            status_color(ProcessingStatus::Pending),
            status_color(ProcessingStatus::Processing),
            status_color(ProcessingStatus::Completed),
            status_color(ProcessingStatus::Failed),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn status_tags_map_every_state() {
        assert_eq!(status_tag(ProcessingStatus::Completed), "●");
        assert_eq!(status_tag(ProcessingStatus::Failed), "✗");
    }
}
