//! Output panel rendering

use crate::runner::RunOutcome;
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the output of the last Run.
///
/// `scroll_offset` is clamped here so the caller can push it past the end.
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    output: &str,
    last_outcome: Option<RunOutcome>,
    palette: &Theme,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Output ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_normal));

    if last_outcome.is_none() {
        let paragraph = Paragraph::new("(press Ctrl+R to run your code)")
            .block(block)
            .style(Style::default().fg(palette.comment).bg(palette.bg));
        frame.render_widget(paragraph, area);
        return;
    }

    let text_style = match last_outcome {
        Some(RunOutcome::Completed) | None => Style::default().fg(palette.fg),
        Some(RunOutcome::Threw) | Some(RunOutcome::HostError) => Style::default().fg(palette.error),
    };

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = output
        .lines()
        .map(|line| ListItem::new(line.to_string()).style(text_style))
        .collect();

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items)
        .block(block)
        .style(Style::default().bg(palette.bg));
    frame.render_widget(list, area);
}
