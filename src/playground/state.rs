//! Page state and its transitions
//!
//! The whole playground is one [`PageState`] value. Every user action is an
//! [`Event`], and [`reduce`] maps `(state, event)` to the next state without
//! touching anything else, so each transition can be tested on its own.

use crate::interpreter::Limits;
use crate::playground::editor::EditorHandle;
use crate::runner::{run_code, RunOutcome};

/// Which view is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Editor,
    Success,
}

/// Languages the editor can be set to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    JavaScript,
}

impl Language {
    /// Tag handed to the editor widget
    pub fn tag(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
        }
    }

    /// Initial editor text, also the "nothing entered yet" sentinel
    pub fn placeholder(self) -> String {
        format!("// Write your {} code here", self.tag())
    }
}

/// Light or dark presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Label of the header control: names the mode it switches to
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Light => "Dark Mode",
            ThemeMode::Dark => "Light Mode",
        }
    }
}

/// Everything a fresh editor page starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaygroundConfig {
    pub language: Language,
    pub theme: ThemeMode,
    /// Editor text to start with instead of the placeholder
    pub initial_code: Option<String>,
    pub limits: Limits,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        PlaygroundConfig {
            language: Language::default(),
            theme: ThemeMode::default(),
            initial_code: None,
            limits: Limits::default(),
        }
    }
}

/// The playground's UI state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub page: Page,
    pub language: Language,
    pub code: String,
    /// Output panel text; empty until the first Run
    pub output: String,
    /// How the last Run ended, `None` before any Run
    pub last_outcome: Option<RunOutcome>,
    pub submit_enabled: bool,
    pub theme: ThemeMode,
}

impl PageState {
    pub fn new(config: &PlaygroundConfig) -> Self {
        let code = config
            .initial_code
            .clone()
            .unwrap_or_else(|| config.language.placeholder());
        PageState {
            page: Page::Editor,
            language: config.language,
            submit_enabled: submit_enabled(&code, config.language),
            code,
            output: String::new(),
            last_outcome: None,
            theme: config.theme,
        }
    }
}

/// User actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The editor published new text
    Edited(String),
    /// Run was pressed. Carries the live editor text, or `None` when no
    /// editor handle is available.
    Run(Option<String>),
    ToggleTheme,
    Submit,
    GoBack,
}

impl Event {
    /// Build a Run event by pulling the text through the editor handle
    pub fn run_from(handle: Option<&dyn EditorHandle>) -> Self {
        Event::Run(handle.map(|editor| editor.current_text()))
    }
}

/// Submit is allowed unless the code is empty, whitespace-only or untouched
pub fn submit_enabled(code: &str, language: Language) -> bool {
    !code.trim().is_empty() && code != language.placeholder()
}

/// Apply one event to the state
pub fn reduce(mut state: PageState, event: Event, config: &PlaygroundConfig) -> PageState {
    match event {
        Event::Edited(code) => {
            state.submit_enabled = submit_enabled(&code, state.language);
            state.code = code;
        }
        Event::Run(Some(text)) => {
            let report = run_code(&text, &config.limits);
            state.output = report.output;
            state.last_outcome = Some(report.outcome);
        }
        Event::Run(None) => {
            log::warn!("run requested but the editor is not mounted");
        }
        Event::ToggleTheme => {
            state.theme = state.theme.toggled();
        }
        Event::Submit => {
            if state.page == Page::Editor && state.submit_enabled {
                log::info!("submission accepted ({} bytes)", state.code.len());
                state.page = Page::Success;
            }
        }
        Event::GoBack => {
            if state.page == Page::Success {
                state = PageState::new(config);
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (PageState, PlaygroundConfig) {
        let config = PlaygroundConfig::default();
        (PageState::new(&config), config)
    }

    #[test]
    fn test_initial_state() {
        let (state, _) = fresh();
        assert_eq!(state.page, Page::Editor);
        assert_eq!(state.code, "// Write your javascript code here");
        assert_eq!(state.output, "");
        assert!(!state.submit_enabled);
        assert_eq!(state.theme, ThemeMode::Light);
    }

    #[test]
    fn test_submit_enabled_rule() {
        let js = Language::JavaScript;
        assert!(!submit_enabled("", js));
        assert!(!submit_enabled("  \n\t ", js));
        assert!(!submit_enabled("// Write your javascript code here", js));
        assert!(submit_enabled("// Write your javascript code here ", js));
        assert!(submit_enabled("x", js));
    }

    #[test]
    fn test_edit_updates_code_and_flag() {
        let (state, config) = fresh();
        let state = reduce(state, Event::Edited("return 1".to_string()), &config);
        assert_eq!(state.code, "return 1");
        assert!(state.submit_enabled);

        let state = reduce(state, Event::Edited("   ".to_string()), &config);
        assert!(!state.submit_enabled);
    }

    #[test]
    fn test_run_uses_live_text() {
        let (state, config) = fresh();
        let state = reduce(state, Event::Run(Some("console.log('live')".to_string())), &config);
        assert_eq!(state.output, "live\n");
        assert_eq!(state.last_outcome, Some(RunOutcome::Completed));
        // Running does not rewrite the stored code
        assert_eq!(state.code, "// Write your javascript code here");
    }

    #[test]
    fn test_run_without_editor_is_noop() {
        let (state, config) = fresh();
        let next = reduce(state.clone(), Event::Run(None), &config);
        assert_eq!(next, state);
    }

    #[test]
    fn test_theme_toggle_twice_is_identity() {
        let (state, config) = fresh();
        let state = reduce(state, Event::Run(Some("1 + 1".to_string())), &config);
        let toggled = reduce(state.clone(), Event::ToggleTheme, &config);
        assert_eq!(toggled.theme, ThemeMode::Dark);
        assert_eq!(toggled.output, state.output);
        let back = reduce(toggled, Event::ToggleTheme, &config);
        assert_eq!(back, state);
    }

    #[test]
    fn test_submit_requires_enabled_flag() {
        let (state, config) = fresh();
        let state = reduce(state, Event::Submit, &config);
        assert_eq!(state.page, Page::Editor);

        let state = reduce(state, Event::Edited("return 'x'".to_string()), &config);
        let state = reduce(state, Event::Submit, &config);
        assert_eq!(state.page, Page::Success);
    }

    #[test]
    fn test_go_back_resets_to_fresh_state() {
        let (state, config) = fresh();
        let state = reduce(state, Event::Edited("return 'x'".to_string()), &config);
        let state = reduce(state, Event::ToggleTheme, &config);
        let state = reduce(state, Event::Run(Some("'x'".to_string())), &config);
        let state = reduce(state, Event::Submit, &config);
        let state = reduce(state, Event::GoBack, &config);

        assert_eq!(state, PageState::new(&config));
    }

    #[test]
    fn test_initial_code_from_config() {
        let config = PlaygroundConfig {
            initial_code: Some("console.log(1)".to_string()),
            ..PlaygroundConfig::default()
        };
        let state = PageState::new(&config);
        assert_eq!(state.code, "console.log(1)");
        assert!(state.submit_enabled);
    }
}
