//! Header bar: page title and theme toggle

use crate::playground::state::ThemeMode;
use crate::ui::theme::theme_for;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const TITLE: &str = "Competitive Coding";

pub fn render_header(frame: &mut Frame, area: Rect, mode: ThemeMode) {
    let palette = theme_for(mode);
    let bar_style = Style::default().bg(palette.primary).fg(palette.primary_fg);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", TITLE),
        bar_style.add_modifier(Modifier::BOLD),
    )))
    .style(bar_style)
    .alignment(Alignment::Left);
    frame.render_widget(title, layout[0]);

    let toggle = Paragraph::new(Line::from(vec![
        Span::styled(" ^T ", Style::default().bg(palette.primary_fg).fg(palette.primary)),
        Span::styled(format!(" {} ", mode.toggle_label()), bar_style),
    ]))
    .style(bar_style)
    .alignment(Alignment::Right);
    frame.render_widget(toggle, layout[1]);
}
