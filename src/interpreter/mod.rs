//! Sandboxed script execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`](engine::Interpreter), [`Limits`](engine::Limits) and call machinery
//! - [`errors`]: runtime error types
//! - [`builtins`]: the global library (`console`, `Math`, `JSON`, ...)
//! - [`methods`]: string, array and number methods
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Every statement, loop iteration and
//! call consumes one step of the run's budget; exceeding any limit aborts the
//! run with an error scripts cannot catch.
//!
//! # Isolation
//!
//! Each run gets a fresh global scope and writes `console.log` output to the
//! [`OutputSink`](crate::console::OutputSink) it was handed. Nothing outside
//! the interpreter is read or modified.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod jumps;
mod loops;
pub mod methods;
mod ops;
mod statements;

pub use engine::{Interpreter, Limits};
pub use errors::RuntimeError;
