//! Core macro types.
//!
//! Patterns, clauses and definitions are built once when a macro is defined
//! and never mutated afterwards. Bindings are built per match attempt and
//! dropped after instantiation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::ast::{Atom, Expr};

/// Default limit on nested expansions, see [`ExpansionConfig::max_depth`].
pub const MAX_MACRO_RECURSION_DEPTH: usize = 128;

/// A compiled pattern or template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    /// `_`: matches anything and binds nothing.
    Underscore,
    /// An atom that must match verbatim. Never renamed, never bound.
    Literal(Atom),
    /// A pattern variable (renamed on the pattern side), or on the template
    /// side a free symbol passed through unchanged.
    Variable(String),
    List(Vec<PatternItem>),
}

/// One element of a [`Pattern::List`]. `repeated` is set when the element
/// was followed by `...` in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternItem {
    pub pattern: Pattern,
    pub repeated: bool,
}

impl PatternItem {
    pub fn single(pattern: Pattern) -> Self {
        Self {
            pattern,
            repeated: false,
        }
    }

    pub fn repeated(pattern: Pattern) -> Self {
        Self {
            pattern,
            repeated: true,
        }
    }
}

impl Pattern {
    /// Names of every variable appearing in this pattern.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Pattern::Variable(name) => {
                names.insert(name);
            }
            Pattern::List(items) => items
                .iter()
                .for_each(|item| item.pattern.collect_variables(names)),
            Pattern::Underscore | Pattern::Literal(_) => {}
        }
    }
}

/// Ellipsis depth of each pattern variable. Variables at depth 0 have no
/// entry.
pub type DepthMap = HashMap<String, usize>;

/// One `(pattern template)` rule of a macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Compiled from the pattern with its keyword position removed; matched
    /// against the argument list of a use.
    pub pattern: Pattern,
    pub template: Pattern,
    pub depths: DepthMap,
    /// Original name of every renamed pattern variable, for diagnostics.
    pub originals: HashMap<String, String>,
}

impl Clause {
    pub fn depth_of(&self, name: &str) -> usize {
        self.depths.get(name).copied().unwrap_or(0)
    }

    /// Name as written by the macro author.
    pub fn original_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.originals.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Whether a macro came from the built-in prelude or from user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    User,
    Core,
}

/// A compiled `syntax-rules` macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub keyword: String,
    pub literals: BTreeSet<String>,
    pub clauses: Vec<Clause>,
    pub provenance: Provenance,
}

/// What a pattern variable matched. Depth-0 variables hold one expression;
/// a variable under `n` ellipses holds `n` levels of sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    One(Expr),
    Many(Vec<Binding>),
}

/// Variable bindings of one successful match. Persistent so per-repetition
/// views share structure with their parent.
pub type Bindings = im::HashMap<String, Binding>;

/// A single macro expansion step, for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionStep {
    pub keyword: String,
    pub provenance: Provenance,
    /// Index of the clause that matched.
    pub clause: usize,
    pub input: Expr,
    pub output: Expr,
}

/// Settings for definition and expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionConfig {
    /// Maximum number of expansions nested along one path before giving up.
    /// Counts nesting of macro uses in expansion output, not only recursion.
    pub max_depth: usize,
    /// Record an [`ExpansionStep`] for every expansion.
    pub trace: bool,
    /// Symbols added to the literal set of every macro defined.
    pub core_literals: Vec<String>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_MACRO_RECURSION_DEPTH,
            trace: false,
            core_literals: ["lambda", "define", "begin"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ExpansionConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_core_literals<I, S>(mut self, literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_literals = literals.into_iter().map(Into::into).collect();
        self
    }
}
