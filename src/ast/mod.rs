//! Symbolic expression data model.
//!
//! An [`Expr`] is one of three cases: an immutable [`Atom`], a [`ConsCell`]
//! pair, or the unique empty list. Proper lists are chains of pairs ending in
//! [`Expr::Empty`]; a chain ending in an atom is an improper list and is
//! reported as such by [`Expr::split_list`].
//!
//! Pairs are shared behind `Arc`, so cloning a tree is cheap and trees can be
//! handed across threads. Every tree is built bottom-up, so cons chains are
//! acyclic by construction.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod list;

pub use list::ListIter;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// An atomic value. Atoms compare by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atom {
    Symbol(String),
    String(String),
    Number(i64),
}

/// A Lisp-style cons cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsCell {
    pub first: Expr,
    pub rest: Expr,
}

/// A symbolic expression.
///
/// # Examples
///
/// ```rust
/// use sexpand::Expr;
/// let list = Expr::list(vec![Expr::symbol("f"), Expr::number(1)]);
/// assert_eq!(list.to_string(), "(f 1)");
/// assert_eq!(Expr::list(vec![]), Expr::Empty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Atom(Atom),
    Pair(Arc<ConsCell>),
    Empty,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Atom(Atom::Symbol(name.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Expr::Atom(Atom::String(text.into()))
    }

    pub fn number(n: i64) -> Self {
        Expr::Atom(Atom::Number(n))
    }

    /// Builds a single pair.
    pub fn cons(first: Expr, rest: Expr) -> Self {
        Expr::Pair(Arc::new(ConsCell { first, rest }))
    }

    /// Builds a proper list, right-folding the items onto [`Expr::Empty`].
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
        I::IntoIter: DoubleEndedIterator,
    {
        Self::list_with_tail(items, Expr::Empty)
    }

    /// Builds a list whose final `rest` is `tail` (improper unless `tail` is a list).
    pub fn list_with_tail<I>(items: I, tail: Expr) -> Self
    where
        I: IntoIterator<Item = Expr>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(tail, |rest, first| Expr::cons(first, rest))
    }

    /// Returns the symbol name if this is a symbol atom.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Atom(Atom::Symbol(name)) => Some(name),
            _ => None,
        }
    }

    pub fn is_symbol(&self, name: &str) -> bool {
        self.as_symbol() == Some(name)
    }

    pub fn as_pair(&self) -> Option<&ConsCell> {
        match self {
            Expr::Pair(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, Expr::Empty)
    }

    /// Head symbol of a list form, e.g. `let` for `(let ...)`.
    pub fn head_symbol(&self) -> Option<&str> {
        self.as_pair().and_then(|cell| cell.first.as_symbol())
    }

    /// Lazily walks the elements of a cons chain. Restartable: each call
    /// starts again from the head.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter::new(self)
    }

    /// Splits a cons chain into its elements and its terminator.
    ///
    /// The terminator is [`Expr::Empty`] for a proper list and the final atom
    /// for an improper one. A non-list value yields no elements and itself as
    /// the terminator.
    pub fn split_list(&self) -> (Vec<&Expr>, &Expr) {
        let mut iter = self.iter();
        let items = iter.by_ref().collect();
        (items, iter.remainder())
    }

    /// Elements of a proper list, or `None` for anything else.
    pub fn to_vec(&self) -> Option<Vec<Expr>> {
        match self.split_list() {
            (items, Expr::Empty) => Some(items.into_iter().cloned().collect()),
            _ => None,
        }
    }

    /// Returns the type name of this expression (for diagnostics).
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Atom(Atom::Symbol(_)) => "Symbol",
            Expr::Atom(Atom::String(_)) => "String",
            Expr::Atom(Atom::Number(_)) => "Number",
            Expr::Pair(_) => "Pair",
            Expr::Empty => "Empty",
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<Atom> for Expr {
    fn from(atom: Atom) -> Self {
        Expr::Atom(atom)
    }
}

impl FromIterator<Expr> for Expr {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        let items: Vec<Expr> = iter.into_iter().collect();
        Expr::list(items)
    }
}

// ============================================================================
// PRINTING
// ============================================================================

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(name) => write!(f, "{}", name),
            Atom::String(text) => write!(f, "\"{}\"", text),
            Atom::Number(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Atom(atom) => write!(f, "{}", atom),
            Expr::Empty => write!(f, "()"),
            Expr::Pair(cell) => Self::fmt_cons_chain(f, cell),
        }
    }
}

impl Expr {
    fn fmt_cons_chain(f: &mut fmt::Formatter<'_>, start_cell: &ConsCell) -> fmt::Result {
        write!(f, "({}", start_cell.first)?;

        let mut current_rest = &start_cell.rest;
        loop {
            match current_rest {
                Expr::Pair(next_cell) => {
                    write!(f, " {}", next_cell.first)?;
                    current_rest = &next_cell.rest;
                }
                Expr::Empty => break,
                // Improper list (dotted pair)
                other => {
                    write!(f, " . {}", other)?;
                    break;
                }
            }
        }
        write!(f, ")")
    }
}
