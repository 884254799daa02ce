//! Recursive-descent reader from tokens to symbolic expressions.

use super::{tokenize, Span, Token};
use crate::ast::{Atom, Expr};
use crate::errors::{ErrorKind, SexpandError, SourceContext};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Reads one datum from the front of `tokens`.
///
/// Returns the datum and the tokens that follow it, so several top-level
/// forms can be read from one stream.
///
/// # Errors
/// `EmptyInput` when there are no tokens, `UnexpectedEof` when a list or a
/// quote is left unfinished, `UnexpectedToken` for a `)` with no matching `(`.
pub fn read(tokens: &[Token]) -> Result<(Expr, &[Token]), SexpandError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err(SexpandError::new(ErrorKind::EmptyInput));
    };

    match first.text.as_str() {
        "(" => read_list_tail(first, rest),
        ")" => Err(SexpandError::at(
            ErrorKind::UnexpectedToken {
                found: ")".to_string(),
            },
            first.span,
        )),
        text if text.starts_with('\'') => read_quoted(first, rest),
        text => Ok((read_atom(text), rest)),
    }
}

/// Reads every datum in `tokens`. An empty stream yields no forms.
pub fn read_all(mut tokens: &[Token]) -> Result<Vec<Expr>, SexpandError> {
    let mut forms = Vec::new();
    while !tokens.is_empty() {
        let (form, rest) = read(tokens)?;
        forms.push(form);
        tokens = rest;
    }
    Ok(forms)
}

/// Tokenizes and reads a whole program. Errors carry the source text.
///
/// ```rust
/// use sexpand::syntax::parse;
/// let forms = parse("(a 'b) c").unwrap();
/// assert_eq!(forms.len(), 2);
/// assert_eq!(forms[0].to_string(), "(a (quote b))");
/// ```
pub fn parse(source: &str) -> Result<Vec<Expr>, SexpandError> {
    tokenize(source)
        .and_then(|tokens| read_all(&tokens))
        .map_err(|e| e.with_source(&SourceContext::anonymous(source)))
}

/// Tokenizes and reads exactly one datum.
pub fn parse_one(source: &str) -> Result<Expr, SexpandError> {
    let read_single = |tokens: &[Token]| -> Result<Expr, SexpandError> {
        let (form, rest) = read(tokens)?;
        match rest.first() {
            None => Ok(form),
            Some(extra) => Err(SexpandError::at(
                ErrorKind::UnexpectedToken {
                    found: extra.text.clone(),
                },
                extra.span,
            )),
        }
    };

    tokenize(source)
        .and_then(|tokens| read_single(&tokens))
        .map_err(|e| e.with_source(&SourceContext::anonymous(source)))
}

// ============================================================================
// READER INTERNALS
// ============================================================================

fn read_list_tail<'t>(
    open: &Token,
    mut tokens: &'t [Token],
) -> Result<(Expr, &'t [Token]), SexpandError> {
    let mut items = Vec::new();
    loop {
        match tokens.split_first() {
            None => {
                return Err(SexpandError::at(
                    ErrorKind::UnexpectedEof {
                        expected: "')'".to_string(),
                    },
                    open.span,
                )
                .with_help("this list is never closed"))
            }
            Some((close, rest)) if close.is(")") => return Ok((Expr::list(items), rest)),
            Some(_) => {
                let (item, rest) = read(tokens)?;
                items.push(item);
                tokens = rest;
            }
        }
    }
}

/// `'x` reads as `(quote x)`; a bare `'` quotes the datum that follows it.
fn read_quoted<'t>(
    token: &Token,
    rest: &'t [Token],
) -> Result<(Expr, &'t [Token]), SexpandError> {
    let quoted = token.text.trim_start_matches('\'');
    let depth = token.text.len() - quoted.len();

    let (datum, rest) = if quoted.is_empty() {
        if rest.is_empty() {
            return Err(SexpandError::at(
                ErrorKind::UnexpectedEof {
                    expected: "a datum after quote".to_string(),
                },
                Span::point(token.span.end),
            ));
        }
        read(rest)?
    } else {
        (read_atom(quoted), rest)
    };

    let wrapped = (0..depth).fold(datum, |inner, _| {
        Expr::list(vec![Expr::symbol("quote"), inner])
    });
    Ok((wrapped, rest))
}

fn read_atom(text: &str) -> Expr {
    match text {
        "0" => Expr::number(0),
        "1" => Expr::number(1),
        _ if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') => {
            Expr::Atom(Atom::String(text[1..text.len() - 1].to_string()))
        }
        _ => Expr::symbol(text),
    }
}
