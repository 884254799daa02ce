//! # sexpand
//!
//! A reader and a hygienic `syntax-rules` macro expander for a minimal
//! S-expression language.
//!
//! Data flows strictly downward: text → tokens → [`Expr`] trees → compiled
//! macro clauses (at definition time) → matching and template instantiation
//! (at use time) → macro-free [`Expr`] trees handed to an evaluator.
//!
//! ```rust
//! use sexpand::engine;
//!
//! let forms = engine::expand_program("(let ((x 1) (y 0)) x)").unwrap();
//! assert_eq!(forms[0].to_string(), "((lambda (x y) (begin x)) 1 0)");
//! ```

pub use crate::ast::{Atom, ConsCell, Expr};
pub use crate::errors::{ErrorCategory, ErrorKind, SexpandError, SourceContext};
pub use crate::macros::{ExpansionConfig, MacroRegistry};
pub use crate::syntax::{Span, Token};

pub mod ast;
pub mod engine;
pub mod errors;
pub mod macros;
pub mod syntax;

/// Crate-wide result alias.
pub type Result<T, E = SexpandError> = std::result::Result<T, E>;
