//! Pattern and template compiler.
//!
//! Compiling the pattern half of a clause renames every pattern variable to
//! a fresh [`gensym`] name and records the renaming in a
//! [`SubstitutionTable`]. The table is frozen before the template half is
//! compiled, and the template resolves each symbol through it: a symbol the
//! pattern bound becomes that binding's fresh name, anything else passes
//! through unrenamed.

use std::collections::{BTreeSet, HashMap};

use crate::ast::{Atom, Expr};
use crate::errors::{ErrorKind, SexpandError};
use crate::macros::ellipsis::resolve_depths;
use crate::macros::gensym::gensym;
use crate::macros::types::{Clause, DepthMap, Pattern, PatternItem};

pub const ELLIPSIS: &str = "...";
pub const UNDERSCORE: &str = "_";

/// Original pattern-variable name → generated name, for one clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    renames: HashMap<String, String>,
}

impl SubstitutionTable {
    pub fn get(&self, original: &str) -> Option<&str> {
        self.renames.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Generated name → original name.
    pub fn reversed(&self) -> HashMap<String, String> {
        self.renames
            .iter()
            .map(|(original, fresh)| (fresh.clone(), original.clone()))
            .collect()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Compiles the pattern half of a clause.
pub fn compile_pattern(
    keyword: &str,
    literals: &BTreeSet<String>,
    expr: &Expr,
) -> Result<(Pattern, SubstitutionTable), SexpandError> {
    let mut compiler = PatternCompiler {
        keyword,
        literals,
        renames: HashMap::new(),
    };
    let pattern = compiler.compile(expr)?;
    Ok((
        pattern,
        SubstitutionTable {
            renames: compiler.renames,
        },
    ))
}

/// Compiles the template half of a clause against the pattern's renamings.
pub fn compile_template(
    keyword: &str,
    literals: &BTreeSet<String>,
    expr: &Expr,
    table: &SubstitutionTable,
) -> Result<Pattern, SexpandError> {
    TemplateCompiler {
        keyword,
        literals,
        table,
    }
    .compile(expr)
}

/// Compiles one `(pattern template)` clause.
///
/// The first element of the pattern stands in the keyword position and is
/// not matched; the rest of the pattern is matched against a use's
/// arguments.
pub fn compile_clause(
    keyword: &str,
    literals: &BTreeSet<String>,
    clause: &Expr,
) -> Result<Clause, SexpandError> {
    let parts = clause
        .to_vec()
        .filter(|parts| parts.len() == 2)
        .ok_or_else(|| invalid(keyword, format!("clause {} is not (pattern template)", clause)))?;
    let (raw_pattern, raw_template) = (&parts[0], &parts[1]);

    let arguments = match raw_pattern.as_pair() {
        Some(cell) => &cell.rest,
        None => {
            return Err(invalid(
                keyword,
                format!(
                    "pattern {} must be a list starting with the keyword position",
                    raw_pattern
                ),
            ))
        }
    };

    let (pattern, table) = compile_pattern(keyword, literals, arguments)?;
    let depths = resolve_depths(&pattern);
    let template = compile_template(keyword, literals, raw_template, &table)?;
    check_template_depths(keyword, &template, &depths, &table)?;

    Ok(Clause {
        pattern,
        template,
        depths,
        originals: table.reversed(),
    })
}

// ============================================================================
// COMPILERS
// ============================================================================

struct PatternCompiler<'a> {
    keyword: &'a str,
    literals: &'a BTreeSet<String>,
    renames: HashMap<String, String>,
}

impl PatternCompiler<'_> {
    fn compile(&mut self, expr: &Expr) -> Result<Pattern, SexpandError> {
        match expr {
            Expr::Atom(Atom::Symbol(name)) => self.compile_symbol(name),
            Expr::Atom(atom) => Ok(Pattern::Literal(atom.clone())),
            Expr::Empty | Expr::Pair(_) => {
                let keyword = self.keyword;
                compile_sequence(keyword, expr, |item| self.compile(item))
            }
        }
    }

    fn compile_symbol(&mut self, name: &str) -> Result<Pattern, SexpandError> {
        if let Some(pattern) = reserved_or_literal(self.keyword, self.literals, name)? {
            return Ok(pattern);
        }
        if self.renames.contains_key(name) {
            return Err(invalid(
                self.keyword,
                format!("pattern variable '{}' appears more than once", name),
            ));
        }
        let fresh = gensym();
        self.renames.insert(name.to_string(), fresh.clone());
        Ok(Pattern::Variable(fresh))
    }
}

struct TemplateCompiler<'a> {
    keyword: &'a str,
    literals: &'a BTreeSet<String>,
    table: &'a SubstitutionTable,
}

impl TemplateCompiler<'_> {
    fn compile(&self, expr: &Expr) -> Result<Pattern, SexpandError> {
        match expr {
            Expr::Atom(Atom::Symbol(name)) => self.compile_symbol(name),
            Expr::Atom(atom) => Ok(Pattern::Literal(atom.clone())),
            Expr::Empty | Expr::Pair(_) => {
                compile_sequence(self.keyword, expr, |item| self.compile(item))
            }
        }
    }

    fn compile_symbol(&self, name: &str) -> Result<Pattern, SexpandError> {
        if let Some(pattern) = reserved_or_literal(self.keyword, self.literals, name)? {
            return Ok(pattern);
        }
        let resolved = self.table.get(name).unwrap_or(name);
        Ok(Pattern::Variable(resolved.to_string()))
    }
}

/// Handles the symbols whose meaning does not depend on the side being
/// compiled: `_`, `...` and members of the literal set.
fn reserved_or_literal(
    keyword: &str,
    literals: &BTreeSet<String>,
    name: &str,
) -> Result<Option<Pattern>, SexpandError> {
    match name {
        UNDERSCORE => Ok(Some(Pattern::Underscore)),
        ELLIPSIS => Err(invalid(keyword, "'...' must follow a list element")),
        _ if literals.contains(name) => Ok(Some(Pattern::Literal(Atom::Symbol(name.into())))),
        _ => Ok(None),
    }
}

/// Compiles the elements of a proper list, marking each element that is
/// immediately followed by `...` as repeated.
fn compile_sequence<F>(keyword: &str, list: &Expr, mut compile_one: F) -> Result<Pattern, SexpandError>
where
    F: FnMut(&Expr) -> Result<Pattern, SexpandError>,
{
    let (elements, tail) = list.split_list();
    if !tail.is_empty_list() {
        return Err(invalid(keyword, format!("improper list {} is not supported", list)));
    }

    let mut items: Vec<PatternItem> = Vec::with_capacity(elements.len());
    let mut last_was_element = false;
    for element in elements {
        if element.is_symbol(ELLIPSIS) {
            match items.last_mut() {
                Some(previous) if last_was_element => previous.repeated = true,
                _ => {
                    return Err(invalid(
                        keyword,
                        format!("misplaced '...' in {}", list),
                    ))
                }
            }
            last_was_element = false;
            continue;
        }
        items.push(PatternItem::single(compile_one(element)?));
        last_was_element = true;
    }
    Ok(Pattern::List(items))
}

// ============================================================================
// TEMPLATE VALIDATION
// ============================================================================

/// Every pattern variable must be used under at least as many ellipses as it
/// was bound under, and every repeated template element must contain a
/// variable that actually repeats at that level.
fn check_template_depths(
    keyword: &str,
    template: &Pattern,
    depths: &DepthMap,
    table: &SubstitutionTable,
) -> Result<(), SexpandError> {
    let originals = table.reversed();
    walk_template(keyword, template, 0, depths, &originals)
}

fn walk_template(
    keyword: &str,
    template: &Pattern,
    level: usize,
    depths: &DepthMap,
    originals: &HashMap<String, String>,
) -> Result<(), SexpandError> {
    match template {
        Pattern::Variable(name) => {
            let depth = depths.get(name).copied().unwrap_or(0);
            if depth > level {
                let original = originals.get(name).map(String::as_str).unwrap_or(name);
                return Err(invalid(
                    keyword,
                    format!(
                        "pattern variable '{}' is bound under {} ellipses but used under {}",
                        original, depth, level
                    ),
                ));
            }
            Ok(())
        }
        Pattern::List(items) => {
            for item in items {
                if item.repeated && !repeats_at(&item.pattern, level, depths) {
                    return Err(invalid(
                        keyword,
                        "template element followed by '...' contains no repeating pattern variable",
                    ));
                }
                let inner_level = level + usize::from(item.repeated);
                walk_template(keyword, &item.pattern, inner_level, depths, originals)?;
            }
            Ok(())
        }
        Pattern::Underscore | Pattern::Literal(_) => Ok(()),
    }
}

fn repeats_at(pattern: &Pattern, level: usize, depths: &DepthMap) -> bool {
    pattern
        .variables()
        .iter()
        .any(|name| depths.get(*name).is_some_and(|depth| *depth > level))
}

fn invalid(keyword: &str, reason: impl Into<String>) -> SexpandError {
    SexpandError::new(ErrorKind::InvalidMacro {
        keyword: keyword.to_string(),
        reason: reason.into(),
    })
}
