//! # Hygienic `syntax-rules` macros
//!
//! This module turns macro definitions into compiled clauses and expands
//! macro uses before evaluation.
//!
//! ## Pipeline
//!
//! - **Definition**: each `(pattern template)` clause is compiled by
//!   [`compiler`]. Pattern variables are renamed to fresh [`gensym`] names;
//!   the template refers to exactly those names. [`ellipsis`] then records
//!   how many `...` each pattern variable sits under.
//! - **Use**: clauses are tried in order by [`matcher`]; the first match is
//!   instantiated by [`instantiate`]; [`expander`] repeats this on the output
//!   until no macro use remains.
//!
//! Expansion is a pure transformation of [`Expr`](crate::Expr) trees: it
//! either yields a macro-free tree or fails with a [`SexpandError`](crate::SexpandError).
//!
//! ```rust
//! use sexpand::{syntax::parse_one, MacroRegistry};
//!
//! let mut registry = MacroRegistry::new();
//! registry
//!     .define_syntax_rules(
//!         "swap-args",
//!         &parse_one("(syntax-rules () ((_ (f a b)) (f b a)))").unwrap(),
//!     )
//!     .unwrap();
//! let expanded = registry.expand(&parse_one("(swap-args (g 0 1))").unwrap()).unwrap();
//! assert_eq!(expanded.to_string(), "(g 1 0)");
//! ```

pub mod compiler;
pub mod ellipsis;
pub mod expander;
pub mod gensym;
pub mod instantiate;
pub mod loader;
pub mod matcher;
pub mod registry;
pub mod std;
pub mod types;

pub use compiler::{compile_clause, SubstitutionTable, ELLIPSIS, UNDERSCORE};
pub use gensym::gensym;
pub use loader::{parse_macros_from_source, try_parse_macro_form, SyntaxRules};
pub use registry::MacroRegistry;
pub use types::{
    Binding, Bindings, Clause, DepthMap, ExpansionConfig, ExpansionStep, MacroDefinition, Pattern,
    PatternItem, Provenance, MAX_MACRO_RECURSION_DEPTH,
};
