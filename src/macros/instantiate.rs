//! Template instantiation.
//!
//! Builds a fresh expression from a compiled template and the bindings of a
//! successful match. A template element followed by `...` is emitted once per
//! repetition of the pattern variables that repeat at that level; those
//! variables must all have the same repetition count.

use crate::ast::Expr;
use crate::errors::{ErrorKind, SexpandError};
use crate::macros::compiler::UNDERSCORE;
use crate::macros::types::{Binding, Bindings, Clause, Pattern, PatternItem};

/// Instantiates `clause`'s template. `keyword` and `clause_index` are only
/// used to describe failures.
pub fn instantiate(
    keyword: &str,
    clause_index: usize,
    clause: &Clause,
    bindings: &Bindings,
) -> Result<Expr, SexpandError> {
    Instantiator {
        keyword,
        clause_index,
        clause,
    }
    .build(&clause.template, bindings, 0)
}

struct Instantiator<'a> {
    keyword: &'a str,
    clause_index: usize,
    clause: &'a Clause,
}

impl Instantiator<'_> {
    fn build(&self, template: &Pattern, bindings: &Bindings, level: usize) -> Result<Expr, SexpandError> {
        match template {
            Pattern::Underscore => Ok(Expr::symbol(UNDERSCORE)),
            Pattern::Literal(atom) => Ok(Expr::Atom(atom.clone())),
            Pattern::Variable(name) => match bindings.get(name) {
                Some(Binding::One(expr)) => Ok(expr.clone()),
                Some(Binding::Many(_)) => Err(self.unexpanded_sequence(name)),
                None => Ok(Expr::symbol(name.as_str())),
            },
            Pattern::List(items) => {
                let mut output = Vec::with_capacity(items.len());
                for item in items {
                    if item.repeated {
                        self.build_repeated(item, bindings, level, &mut output)?;
                    } else {
                        output.push(self.build(&item.pattern, bindings, level)?);
                    }
                }
                Ok(Expr::list(output))
            }
        }
    }

    fn build_repeated(
        &self,
        item: &PatternItem,
        bindings: &Bindings,
        level: usize,
        output: &mut Vec<Expr>,
    ) -> Result<(), SexpandError> {
        let mut sequences: Vec<(&str, &Vec<Binding>)> = Vec::new();
        for name in item.pattern.variables() {
            if self.clause.depth_of(name) <= level {
                continue;
            }
            match bindings.get(name) {
                Some(Binding::Many(sequence)) => sequences.push((name, sequence)),
                _ => return Err(self.unexpanded_sequence(name)),
            }
        }

        let Some(count) = sequences.first().map(|(_, sequence)| sequence.len()) else {
            return Err(SexpandError::new(ErrorKind::InvalidMacro {
                keyword: self.keyword.to_string(),
                reason: "template element followed by '...' contains no repeating pattern variable"
                    .to_string(),
            }));
        };

        if sequences.iter().any(|(_, sequence)| sequence.len() != count) {
            let counts = sequences
                .iter()
                .map(|(name, sequence)| (self.clause.original_name(name).to_string(), sequence.len()))
                .collect();
            return Err(SexpandError::new(ErrorKind::EllipsisArityMismatch {
                keyword: self.keyword.to_string(),
                clause: self.clause_index,
                counts,
            })
            .with_help("every pattern variable repeated by one '...' must match the same number of times"));
        }

        for index in 0..count {
            let mut view = bindings.clone();
            for (name, sequence) in &sequences {
                view.insert(name.to_string(), sequence[index].clone());
            }
            output.push(self.build(&item.pattern, &view, level + 1)?);
        }
        Ok(())
    }

    fn unexpanded_sequence(&self, name: &str) -> SexpandError {
        SexpandError::new(ErrorKind::InvalidMacro {
            keyword: self.keyword.to_string(),
            reason: format!(
                "pattern variable '{}' is used with too few ellipses",
                self.clause.original_name(name)
            ),
        })
    }
}
