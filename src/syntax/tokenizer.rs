use pest::{iterators::Pair, Parser};
use pest_derive::Parser;

use super::{Span, Token};
use crate::errors::{ErrorKind, SexpandError};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct TokenGrammar;

/// Splits source text into tokens.
///
/// `(` and `)` are always tokens of their own; any other run of
/// non-whitespace characters is a single token. There is no escaping, no
/// comment syntax and no string literal containing spaces.
///
/// ```rust
/// use sexpand::syntax::tokenize;
/// let tokens = tokenize("(f 'x)").unwrap();
/// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, ["(", "f", "'x", ")"]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, SexpandError> {
    let mut pairs = TokenGrammar::parse(Rule::tokens, source).map_err(convert_parse_error)?;

    let Some(program) = pairs.next() else {
        return Ok(Vec::new());
    };

    Ok(program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(to_token)
        .collect())
}

fn to_token(pair: Pair<Rule>) -> Token {
    let span = pair.as_span();
    Token::new(pair.as_str(), Span::new(span.start(), span.end()))
}

fn convert_parse_error(error: pest::error::Error<Rule>) -> SexpandError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span::point(pos),
        pest::error::InputLocation::Span((start, end)) => Span::new(start, end),
    };
    let found = error.line().trim().to_string();
    SexpandError::at(ErrorKind::UnexpectedToken { found }, span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn parens_split_from_adjacent_text() {
        assert_eq!(texts("(a(b)c)"), ["(", "a", "(", "b", ")", "c", ")"]);
    }

    #[test]
    fn empty_and_blank_input_yield_no_tokens() {
        assert!(texts("").is_empty());
        assert!(texts("  \n\t ").is_empty());
    }

    #[test]
    fn spans_point_into_source() {
        let tokens = tokenize("  (foo)").unwrap();
        assert_eq!(tokens[1].text, "foo");
        assert_eq!(tokens[1].span, Span::new(3, 6));
    }

    #[test]
    fn quote_and_ellipsis_stay_attached() {
        assert_eq!(texts("'x ... ;no-comments"), ["'x", "...", ";no-comments"]);
    }
}
