//! Main TUI application state and logic

use crate::playground::editor::{EditorHandle, EditorHost};
use crate::playground::problem::REVERSE_STRING;
use crate::playground::state::{reduce, Event, Page, PageState, PlaygroundConfig};
use crate::ui::panes;
use crate::ui::theme::theme_for;
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Lines moved by one PageUp/PageDown in the output panel
const OUTPUT_PAGE: usize = 5;

/// The main application state
pub struct App {
    pub state: PageState,
    config: PlaygroundConfig,
    editor: EditorHost,
    pub output_scroll: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: PlaygroundConfig) -> Self {
        let state = PageState::new(&config);
        let editor = EditorHost::new(&state.code, state.language, state.theme);
        App {
            state,
            config,
            editor,
            output_scroll: 0,
            should_quit: false,
        }
    }

    /// The live editor text
    pub fn editor_text(&self) -> String {
        self.editor.current_text()
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let event::Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the current page
    pub fn render(&mut self, frame: &mut Frame) {
        let palette = theme_for(self.state.theme);
        let size = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(palette.bg)), size);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(size);

        panes::render_header(frame, main_chunks[0], self.state.theme);

        if self.state.page == Page::Success {
            panes::render_success_view(frame, main_chunks[1], palette);
            return;
        }

        // Problem on the left, editor/buttons/output on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(main_chunks[1]);

        panes::render_problem_pane(frame, columns[0], &REVERSE_STRING, palette);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(60),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .split(columns[1]);

        frame.render_widget(self.editor.widget(), right_rows[0]);
        panes::render_action_bar(frame, right_rows[1], self.state.submit_enabled, palette);
        panes::render_output_pane(
            frame,
            right_rows[2],
            &self.state.output,
            self.state.last_outcome,
            palette,
            &mut self.output_scroll,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.state.page {
            Page::Editor => self.handle_editor_key(key),
            Page::Success => self.handle_success_key(key),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => {
                let handle: &dyn EditorHandle = &self.editor;
                let run = Event::run_from(Some(handle));
                self.apply(run);
                self.output_scroll = 0;
            }
            KeyCode::Char('s') if ctrl => self.apply(Event::Submit),
            KeyCode::Char('t') if ctrl => {
                self.apply(Event::ToggleTheme);
                self.editor.set_theme(self.state.theme);
            }
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::PageUp => {
                self.output_scroll = self.output_scroll.saturating_sub(OUTPUT_PAGE);
            }
            KeyCode::PageDown => {
                self.output_scroll = self.output_scroll.saturating_add(OUTPUT_PAGE);
            }
            _ => {
                if let Some(text) = self.editor.handle_input(key) {
                    self.apply(Event::Edited(text));
                }
            }
        }
    }

    fn handle_success_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('b') => {
                self.apply(Event::GoBack);
                self.editor = EditorHost::new(&self.state.code, self.state.language, self.state.theme);
                self.output_scroll = 0;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn apply(&mut self, event: Event) {
        let state = std::mem::replace(&mut self.state, PageState::new(&self.config));
        self.state = reduce(state, event, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playground::state::ThemeMode;
    use crate::runner::RunOutcome;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with(code: &str) -> App {
        App::new(PlaygroundConfig {
            initial_code: Some(code.to_string()),
            ..PlaygroundConfig::default()
        })
    }

    #[test]
    fn test_typing_updates_state() {
        let mut app = app_with("");
        assert!(!app.state.submit_enabled);
        for c in "42".chars() {
            app.handle_key_event(press(KeyCode::Char(c)));
        }
        assert_eq!(app.state.code, "42");
        assert!(app.state.submit_enabled);
    }

    #[test]
    fn test_ctrl_r_runs_editor_text() {
        let mut app = app_with("console.log('hi')");
        app.handle_key_event(ctrl('r'));
        assert_eq!(app.state.output, "hi\n");
        assert_eq!(app.state.last_outcome, Some(RunOutcome::Completed));
    }

    #[test]
    fn test_ctrl_t_toggles_theme() {
        let mut app = app_with("");
        app.handle_key_event(ctrl('t'));
        assert_eq!(app.state.theme, ThemeMode::Dark);
        app.handle_key_event(ctrl('t'));
        assert_eq!(app.state.theme, ThemeMode::Light);
    }

    #[test]
    fn test_submit_and_go_back() {
        let mut app = app_with("");
        app.handle_key_event(ctrl('s'));
        assert_eq!(app.state.page, Page::Editor);

        app.handle_key_event(press(KeyCode::Char('x')));
        app.handle_key_event(ctrl('s'));
        assert_eq!(app.state.page, Page::Success);

        // Typing on the success view does nothing
        app.handle_key_event(press(KeyCode::Char('z')));
        assert_eq!(app.state.page, Page::Success);

        app.handle_key_event(press(KeyCode::Enter));
        assert_eq!(app.state.page, Page::Editor);
        assert_eq!(app.state.code, "");
        assert_eq!(app.editor_text(), "");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with("");
        app.handle_key_event(press(KeyCode::Esc));
        assert!(app.should_quit);

        let mut app = app_with("");
        app.handle_key_event(ctrl('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_page_keys_scroll_output() {
        let mut app = app_with("");
        app.handle_key_event(press(KeyCode::PageDown));
        assert_eq!(app.output_scroll, OUTPUT_PAGE);
        app.handle_key_event(press(KeyCode::PageUp));
        app.handle_key_event(press(KeyCode::PageUp));
        assert_eq!(app.output_scroll, 0);
    }
}
