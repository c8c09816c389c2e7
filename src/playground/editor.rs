//! Editor host
//!
//! [`EditorHost`] owns the `tui-textarea` widget. It forwards key presses to
//! the widget, reports text changes back to the page, and implements
//! [`EditorHandle`] so Run can read the live text on demand.

use crate::playground::state::{Language, ThemeMode};
use crate::ui::theme::theme_for;
use crossterm::event::KeyEvent;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Padding};
use tui_textarea::TextArea;

/// Read access to the text currently in the editor
pub trait EditorHandle {
    fn current_text(&self) -> String;
}

/// The mounted editor widget
pub struct EditorHost {
    textarea: TextArea<'static>,
    language: Language,
}

impl EditorHost {
    pub fn new(initial_text: &str, language: Language, theme: ThemeMode) -> Self {
        let lines: Vec<String> = initial_text.split('\n').map(str::to_string).collect();
        let mut host = EditorHost {
            textarea: TextArea::new(lines),
            language,
        };
        host.set_theme(theme);
        host
    }

    /// Forward a key to the widget. Returns the new text if the key changed it.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<String> {
        if self.textarea.input(key) {
            Some(self.current_text())
        } else {
            None
        }
    }

    /// Restyle the widget for `theme`
    pub fn set_theme(&mut self, theme: ThemeMode) {
        let palette = theme_for(theme);
        self.textarea.set_block(
            Block::default()
                .title(format!(" Editor ({}) ", self.language.tag()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border_focused))
                .padding(Padding::new(1, 0, 0, 0)),
        );
        self.textarea
            .set_style(Style::default().fg(palette.fg).bg(palette.panel_bg));
        self.textarea
            .set_cursor_line_style(Style::default().bg(palette.current_line_bg));
        self.textarea
            .set_line_number_style(Style::default().fg(palette.line_number));
        self.textarea
            .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    }

    /// The widget, for rendering
    pub fn widget(&self) -> &TextArea<'static> {
        &self.textarea
    }
}

impl EditorHandle for EditorHost {
    fn current_text(&self) -> String {
        self.textarea.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_initial_text_round_trips() {
        let editor = EditorHost::new("line one\nline two\n", Language::JavaScript, ThemeMode::Light);
        assert_eq!(editor.current_text(), "line one\nline two\n");
    }

    #[test]
    fn test_typing_reports_new_text() {
        let mut editor = EditorHost::new("", Language::JavaScript, ThemeMode::Dark);
        assert_eq!(editor.handle_input(key(KeyCode::Char('4'))), Some("4".to_string()));
        assert_eq!(editor.handle_input(key(KeyCode::Char('2'))), Some("42".to_string()));
        assert_eq!(editor.current_text(), "42");
    }

    #[test]
    fn test_cursor_movement_is_not_a_change() {
        let mut editor = EditorHost::new("abc", Language::JavaScript, ThemeMode::Light);
        assert_eq!(editor.handle_input(key(KeyCode::Left)), None);
        assert_eq!(editor.current_text(), "abc");
    }

    #[test]
    fn test_handle_is_usable_as_trait_object() {
        let editor = EditorHost::new("return 1", Language::JavaScript, ThemeMode::Light);
        let handle: &dyn EditorHandle = &editor;
        assert_eq!(handle.current_text(), "return 1");
    }
}
