//! Whole-program pipeline: source text in, macro-free forms out.
//!
//! Top-level forms are processed in order. A `define-syntax` form installs a
//! macro and produces no output; every other form is fully expanded with the
//! macros defined so far.

use crate::ast::Expr;
use crate::errors::{SexpandError, SourceContext};
use crate::macros::{try_parse_macro_form, ExpansionStep, MacroRegistry};
use crate::syntax;

/// Result of expanding a program.
#[derive(Debug, Clone, Default)]
pub struct ExpandedProgram {
    /// Expanded non-definition forms, in source order.
    pub forms: Vec<Expr>,
    /// Keywords defined by the program, in definition order.
    pub defined: Vec<String>,
    /// Expansion steps, when tracing is enabled in the registry's config.
    pub trace: Vec<ExpansionStep>,
}

/// Expands `source` with a fresh registry holding the prelude macros.
pub fn expand_program(source: &str) -> Result<Vec<Expr>, SexpandError> {
    let mut registry = MacroRegistry::with_prelude()?;
    Ok(expand_source(source, &mut registry)?.forms)
}

/// Expands `source` against `registry`, installing its definitions there.
/// Errors carry the source text for diagnostics.
pub fn expand_source(
    source: &str,
    registry: &mut MacroRegistry,
) -> Result<ExpandedProgram, SexpandError> {
    expand_named_source(SourceContext::anonymous(source), registry)
}

pub fn expand_named_source(
    source: SourceContext,
    registry: &mut MacroRegistry,
) -> Result<ExpandedProgram, SexpandError> {
    syntax::parse(&source.content)
        .and_then(|forms| expand_forms(forms, registry))
        .map_err(|e| e.with_source(&source))
}

/// Expands already-read top-level forms.
pub fn expand_forms(
    forms: Vec<Expr>,
    registry: &mut MacroRegistry,
) -> Result<ExpandedProgram, SexpandError> {
    let mut program = ExpandedProgram::default();

    for form in forms {
        if let Some((keyword, rules)) = try_parse_macro_form(&form)? {
            registry.define(&keyword, &rules.literals, &rules.clauses)?;
            program.defined.push(keyword);
            continue;
        }

        let (expanded, steps) = if registry.config().trace {
            registry.expand_traced(&form)?
        } else {
            (registry.expand(&form)?, Vec::new())
        };
        program.forms.push(expanded);
        program.trace.extend(steps);
    }

    Ok(program)
}
