//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: owns the [`PageState`] and the editor widget, runs the key event loop
//! - **[`panes`]**: stateless render functions for the header, problem, output,
//!   button bar and success view
//! - **[`theme`]**: the light and dark palettes
//!
//! The entry point is [`App`]: construct it from a [`PlaygroundConfig`] and call
//! [`App::run`] to start the event loop.
//!
//! [`PageState`]: crate::playground::state::PageState
//! [`PlaygroundConfig`]: crate::playground::state::PlaygroundConfig
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
