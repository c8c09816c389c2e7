//! The playground page model
//!
//! - [`state`]: [`PageState`](state::PageState), [`Event`](state::Event) and the pure [`reduce`](state::reduce) transition
//! - [`editor`]: the editor widget host and the [`EditorHandle`](editor::EditorHandle) Run reads through
//! - [`problem`]: the fixed problem statement

pub mod editor;
pub mod problem;
pub mod state;

pub use editor::{EditorHandle, EditorHost};
pub use state::{reduce, Event, Language, Page, PageState, PlaygroundConfig, ThemeMode};
