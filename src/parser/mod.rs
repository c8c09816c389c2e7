//! Script source parser
//!
//! This module transforms editor text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parser`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Supported Subset
//!
//! The parser accepts a JavaScript subset sized for short practice programs:
//! - Declarations: `let`, `const`, `var`, function declarations
//! - Statements: `if`, `while`, `do-while`, `for`, `for-of`, `for-in`,
//!   `try/catch/finally`, `throw`, `return`, `break`, `continue`
//! - Expressions: arithmetic, comparison, logical, ternary, assignment,
//!   template literals, arrays, objects, arrow functions, `new` on builtins
//! - Semicolons are optional at line breaks, before `}` and at end of input
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one function per precedence level.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parser;
