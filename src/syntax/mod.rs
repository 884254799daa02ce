//! Source text to symbolic expressions.
//!
//! Reading happens in two stages: [`tokenize`] splits text into [`Token`]s
//! (parentheses and whitespace-delimited runs, nothing else), and the reader
//! folds tokens into [`Expr`](crate::Expr) trees by recursive descent.

use serde::{Deserialize, Serialize};

mod reader;
mod tokenizer;

pub use reader::{parse, parse_one, read, read_all};
pub use tokenizer::tokenize;

/// Byte range in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }
}

/// One token with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}
