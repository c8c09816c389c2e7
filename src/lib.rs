//! # Introduction
//!
//! playtty is a terminal coding playground. A problem statement sits beside an
//! editor; "Run" evaluates the editor text in a sandboxed interpreter for a
//! subset of JavaScript and shows what it printed, and "Submit" moves to a
//! confirmation page. The screen is drawn with [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Editor text → Lexer → Parser → AST → Interpreter → Transcript → Output panel
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST.
//! 2. [`interpreter`]: walks the AST under step, call-depth, string and
//!    output limits.
//! 3. [`memory`]: runtime values and lexical scopes.
//! 4. [`console`]: the [`console::OutputSink`] each run writes `console.log`
//!    lines into.
//! 5. [`runner`]: one Run, including result capture and the two error guards.
//! 6. [`playground`]: page state, the pure transition function and the editor host.
//! 7. [`ui`]: ratatui front end; not part of the stable library API.
//! 8. [`config`]: command-line and environment options.
//!
//! ## Supported language subset
//!
//! `let`/`const`/`var`, functions and arrows with closures, `if/else`,
//! `while`, `do-while`, `for`, `for-of`, `for-in`, `break`, `continue`,
//! `return`, `throw`, `try/catch/finally`, arrays, object literals, template
//! literals. Built-ins: `console`, `Math`, `JSON.stringify`, `Object.keys`,
//! `Array.isArray`, `parseInt`, `parseFloat`, the common string and array
//! methods, and the `Error` family.

pub mod config;
pub mod console;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod playground;
pub mod runner;
pub mod ui;
