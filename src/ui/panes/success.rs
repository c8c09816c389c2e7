//! Confirmation view shown after Submit

use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const HEADING: &str = "Submission Successful!";
pub const MESSAGE: &str = "Thank you for your submission. We have received your submission!";
pub const GO_BACK: &str = "Go Back";

pub fn render_success_view(frame: &mut Frame, area: Rect, palette: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(area);

    let lines = vec![
        Line::from(Span::styled(
            HEADING,
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(MESSAGE),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!(" {} ", GO_BACK),
                Style::default()
                    .bg(palette.primary)
                    .fg(palette.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Enter/b  ·  q quit", Style::default().fg(palette.comment)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border_focused)),
        )
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, rows[1]);
}
