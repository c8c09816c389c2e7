//! Problem statement pane

use crate::playground::problem::Problem;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

pub fn render_problem_pane(frame: &mut Frame, area: Rect, problem: &Problem, palette: &Theme) {
    let block = Block::default()
        .title(format!(" {} ", problem.heading))
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_normal))
        .padding(Padding::new(1, 1, 0, 0));

    let lines: Vec<Line> = problem
        .lines()
        .into_iter()
        .map(|line| {
            if line == "Example:" {
                Line::from(Span::styled(line, Style::default().add_modifier(Modifier::BOLD)))
            } else {
                Line::from(line)
            }
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(palette.fg).bg(palette.panel_bg))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
