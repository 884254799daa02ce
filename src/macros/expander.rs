//! Expansion driver.
//!
//! Expands every macro use in a tree until no list in it starts with a
//! registered keyword. An expansion's output is expanded again, so a macro
//! may expand into uses of other macros (or itself). A list whose head only
//! becomes a keyword after its elements are expanded is expanded as well.
//!
//! The depth limit in [`ExpansionConfig`](crate::macros::ExpansionConfig)
//! bounds the number of expansions nested along one path: a use found inside
//! the output of another expansion counts one deeper, whether or not it is
//! recursive. This stops runaway recursion and also caps how deeply macro
//! uses may nest.
//!
//! Quoted data, `(quote ...)`, is left untouched.

use std::sync::Arc;

use crate::ast::Expr;
use crate::errors::{ErrorKind, SexpandError};
use crate::macros::instantiate::instantiate;
use crate::macros::matcher::match_clause;
use crate::macros::registry::MacroRegistry;
use crate::macros::types::{ExpansionStep, MacroDefinition};

const QUOTE: &str = "quote";

// =============================
// Public API for macro expansion
// =============================

impl MacroRegistry {
    /// Expands all macro uses in `expr`.
    ///
    /// # Errors
    /// `NoMatchingClause`, `EllipsisArityMismatch` or `ExpansionDepthExceeded`.
    /// Nothing is returned on failure; expansion is all or nothing.
    pub fn expand(&self, expr: &Expr) -> Result<Expr, SexpandError> {
        Expander::new(self, false).expand(expr, 0)
    }

    /// Like [`MacroRegistry::expand`], also returning every expansion step in
    /// the order performed.
    pub fn expand_traced(&self, expr: &Expr) -> Result<(Expr, Vec<ExpansionStep>), SexpandError> {
        let mut expander = Expander::new(self, true);
        let expanded = expander.expand(expr, 0)?;
        Ok((expanded, expander.trace))
    }

    /// Expands a single use of `definition` once, without expanding the
    /// result. Returns the index of the clause used and the output.
    pub fn expand_once(
        &self,
        definition: &MacroDefinition,
        form: &Expr,
    ) -> Result<(usize, Expr), SexpandError> {
        let no_match = || {
            SexpandError::new(ErrorKind::NoMatchingClause {
                keyword: definition.keyword.clone(),
                form: form.to_string(),
                clauses: definition.clauses.len(),
            })
        };
        let Some(call) = form.as_pair() else {
            return Err(no_match());
        };

        for (index, clause) in definition.clauses.iter().enumerate() {
            if let Some(bindings) = match_clause(clause, &call.rest) {
                let output = instantiate(&definition.keyword, index, clause, &bindings)?;
                return Ok((index, output));
            }
        }

        Err(no_match())
    }
}

// =============================
// Internal expansion helpers
// =============================

struct Expander<'a> {
    registry: &'a MacroRegistry,
    tracing: bool,
    trace: Vec<ExpansionStep>,
}

impl<'a> Expander<'a> {
    fn new(registry: &'a MacroRegistry, force_trace: bool) -> Self {
        Self {
            registry,
            tracing: force_trace || registry.config().trace,
            trace: Vec::new(),
        }
    }

    // `depth` counts the expansions enclosing `expr` on its path from the input.
    fn expand(&mut self, expr: &Expr, depth: usize) -> Result<Expr, SexpandError> {
        if let Some(definition) = self.macro_for(expr) {
            let limit = self.registry.config().max_depth;
            if depth >= limit {
                return Err(SexpandError::new(ErrorKind::ExpansionDepthExceeded {
                    keyword: definition.keyword.clone(),
                    limit,
                })
                .with_help(
                    "the limit counts nested expansions; a recursive macro needs a clause that \
                     stops, deeply nested uses need a larger max_depth",
                ));
            }

            let (clause, output) = self.registry.expand_once(&definition, expr)?;
            self.record(&definition, clause, expr, &output);
            return self.expand(&output, depth + 1);
        }

        match expr {
            Expr::Pair(_) if expr.head_symbol() == Some(QUOTE) => Ok(expr.clone()),
            Expr::Pair(_) => self.expand_elements(expr, depth),
            Expr::Atom(_) | Expr::Empty => Ok(expr.clone()),
        }
    }

    fn macro_for(&self, expr: &Expr) -> Option<Arc<MacroDefinition>> {
        expr.head_symbol()
            .and_then(|keyword| self.registry.lookup(keyword))
            .cloned()
    }

    fn expand_elements(&mut self, list: &Expr, depth: usize) -> Result<Expr, SexpandError> {
        let (elements, tail) = list.split_list();
        let expanded = elements
            .into_iter()
            .map(|element| self.expand(element, depth))
            .collect::<Result<Vec<_>, _>>()?;
        let rebuilt = Expr::list_with_tail(expanded, tail.clone());

        // An operator position may have expanded into a keyword.
        if self.macro_for(&rebuilt).is_some() {
            return self.expand(&rebuilt, depth + 1);
        }
        Ok(rebuilt)
    }

    fn record(&mut self, definition: &MacroDefinition, clause: usize, input: &Expr, output: &Expr) {
        if !self.tracing {
            return;
        }
        self.trace.push(ExpansionStep {
            keyword: definition.keyword.clone(),
            provenance: definition.provenance,
            clause,
            input: input.clone(),
            output: output.clone(),
        });
    }
}
