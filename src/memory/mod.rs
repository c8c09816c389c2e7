//! Memory model for the script interpreter
//!
//! This module provides the core runtime data structures:
//! - [`value`]: Runtime value representation and implicit conversions
//! - [`scope`]: Lexical scope chain holding variable bindings
//! - [`registry`]: Weak handles to everything a run allocated
//!
//! Arrays and objects are reference-counted and shared between aliases.
//! Closures keep their defining scope alive, so cycles are common; the
//! interpreter empties everything in its [`registry::Allocations`] when it is
//! dropped, which frees those cycles.

pub mod registry;
pub mod scope;
pub mod value;
