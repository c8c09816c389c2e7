//! Stateless render functions for each part of the screen
//!
//! - [`header`]: title bar with the theme toggle
//! - [`problem`]: the problem statement
//! - [`output`]: captured output of the last Run
//! - [`status`]: Run/Submit buttons and keybindings
//! - [`success`]: the confirmation view
//!
//! The editor itself is the `tui-textarea` widget and is rendered directly by
//! the app.

pub mod header;
pub mod output;
pub mod problem;
pub mod status;
pub mod success;

pub use header::render_header;
pub use output::render_output_pane;
pub use problem::render_problem_pane;
pub use status::render_action_bar;
pub use success::render_success_view;
