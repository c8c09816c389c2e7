//! Run/Submit button bar with keybindings

use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_action_bar(frame: &mut Frame, area: Rect, submit_enabled: bool, palette: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let button_style = Style::default()
        .bg(palette.primary)
        .fg(palette.primary_fg)
        .add_modifier(Modifier::BOLD);
    let submit_style = if submit_enabled {
        button_style
    } else {
        Style::default().bg(palette.disabled).fg(palette.comment)
    };
    let gap = Style::default().bg(palette.bg);

    let buttons = Paragraph::new(Line::from(vec![
        Span::styled(" Run ", button_style),
        Span::styled(" ", gap),
        Span::styled(" Submit ", submit_style),
    ]))
    .style(gap)
    .alignment(Alignment::Left);
    frame.render_widget(buttons, layout[0]);

    let key_style = Style::default().bg(palette.comment).fg(palette.bg);
    let desc_style = Style::default().bg(palette.bg).fg(palette.fg);
    let sep_style = Style::default().bg(palette.bg).fg(palette.comment);

    let keys = Paragraph::new(Line::from(vec![
        Span::styled(" ^R ", key_style),
        Span::styled(" run ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ^S ", key_style),
        Span::styled(" submit ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ^Q ", key_style),
        Span::styled(" quit ", desc_style),
    ]))
    .style(gap)
    .alignment(Alignment::Right);
    frame.render_widget(keys, layout[1]);
}
