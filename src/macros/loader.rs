//! Recognises macro definition forms.
//!
//! ```text
//! (define-syntax keyword (syntax-rules (literal ...) (pattern template) ...))
//! ```

use crate::ast::Expr;
use crate::errors::{ErrorKind, SexpandError};
use crate::macros::compiler::{ELLIPSIS, UNDERSCORE};
use crate::syntax;

pub const DEFINE_SYNTAX: &str = "define-syntax";
pub const SYNTAX_RULES: &str = "syntax-rules";

/// The parts of a `syntax-rules` form, not yet compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxRules {
    pub literals: Vec<String>,
    pub clauses: Vec<Expr>,
}

/// Splits `(syntax-rules (literal ...) clause ...)` into its parts.
pub fn parse_syntax_rules(keyword: &str, form: &Expr) -> Result<SyntaxRules, SexpandError> {
    let parts = form
        .to_vec()
        .ok_or_else(|| invalid(keyword, format!("{} is not a syntax-rules form", form)))?;

    let [head, literal_list, clauses @ ..] = parts.as_slice() else {
        return Err(invalid(keyword, "syntax-rules needs a literal list"));
    };
    if !head.is_symbol(SYNTAX_RULES) {
        return Err(invalid(
            keyword,
            format!("expected syntax-rules, found {}", head),
        ));
    }

    Ok(SyntaxRules {
        literals: parse_literals(keyword, literal_list)?,
        clauses: clauses.to_vec(),
    })
}

/// Recognises a `define-syntax` form. Returns `Ok(None)` for any other form.
pub fn try_parse_macro_form(form: &Expr) -> Result<Option<(String, SyntaxRules)>, SexpandError> {
    if form.head_symbol() != Some(DEFINE_SYNTAX) {
        return Ok(None);
    }

    let parts = form.to_vec().unwrap_or_default();
    let [_, name, rules] = parts.as_slice() else {
        return Err(invalid(
            DEFINE_SYNTAX,
            format!("expected (define-syntax keyword (syntax-rules ...)), found {}", form),
        ));
    };
    let Some(keyword) = name.as_symbol() else {
        return Err(invalid(
            DEFINE_SYNTAX,
            format!("macro keyword must be a symbol, found {}", name),
        ));
    };

    let rules = parse_syntax_rules(keyword, rules)?;
    Ok(Some((keyword.to_string(), rules)))
}

/// Parses every `define-syntax` form in `source`, ignoring other forms.
pub fn parse_macros_from_source(source: &str) -> Result<Vec<(String, SyntaxRules)>, SexpandError> {
    let mut macros = Vec::new();
    for form in syntax::parse(source)? {
        if let Some(definition) = try_parse_macro_form(&form)? {
            macros.push(definition);
        }
    }
    Ok(macros)
}

fn parse_literals(keyword: &str, list: &Expr) -> Result<Vec<String>, SexpandError> {
    let items = list
        .to_vec()
        .ok_or_else(|| invalid(keyword, format!("bad literal list {}", list)))?;

    items
        .iter()
        .map(|item| match item.as_symbol() {
            Some(name) if name == ELLIPSIS || name == UNDERSCORE => Err(invalid(
                keyword,
                format!("'{}' is reserved and cannot be a literal", name),
            )),
            Some(name) => Ok(name.to_string()),
            None => Err(invalid(keyword, format!("literal {} is not a symbol", item))),
        })
        .collect()
}

fn invalid(keyword: &str, reason: impl Into<String>) -> SexpandError {
    SexpandError::new(ErrorKind::InvalidMacro {
        keyword: keyword.to_string(),
        reason: reason.into(),
    })
}
