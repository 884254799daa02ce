//! Error handling for reading, macro definition and expansion.
//!
//! Every failure is a [`SexpandError`]: an [`ErrorKind`] saying what went
//! wrong, an optional [`Span`] saying where, and an optional source attached
//! after the fact so `miette` can render the offending text.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::syntax::Span;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Named source text used to render diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Source for text that did not come from a file.
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self::from_file("<input>", content)
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// All error kinds. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Syntax errors - malformed token streams
    #[error("syntax error: expected {expected}, but input ended")]
    UnexpectedEof { expected: String },
    #[error("syntax error: unexpected token '{found}'")]
    UnexpectedToken { found: String },
    #[error("syntax error: empty input")]
    EmptyInput,

    // Definition errors - malformed syntax-rules
    #[error("invalid macro '{keyword}': {reason}")]
    InvalidMacro { keyword: String, reason: String },

    // Expansion errors - failures at a macro use
    #[error("no clause of macro '{keyword}' matches {form} ({clauses} clauses tried)")]
    NoMatchingClause {
        keyword: String,
        form: String,
        clauses: usize,
    },
    #[error(
        "ellipsis arity mismatch in clause {clause} of macro '{keyword}': {}",
        describe_counts(.counts)
    )]
    EllipsisArityMismatch {
        keyword: String,
        clause: usize,
        counts: Vec<(String, usize)>,
    },
    #[error("expansion of macro '{keyword}' exceeded the limit of {limit} nested expansions")]
    ExpansionDepthExceeded { keyword: String, limit: usize },
}

fn describe_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("'{}' repeats {} times", name, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Definition,
    Expansion,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Definition => "definition",
            ErrorCategory::Expansion => "expansion",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedEof { .. } | Self::UnexpectedToken { .. } | Self::EmptyInput => {
                ErrorCategory::Syntax
            }
            Self::InvalidMacro { .. } => ErrorCategory::Definition,
            Self::NoMatchingClause { .. }
            | Self::EllipsisArityMismatch { .. }
            | Self::ExpansionDepthExceeded { .. } => ErrorCategory::Expansion,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedEof { .. } => "unexpected_eof",
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::EmptyInput => "empty_input",
            Self::InvalidMacro { .. } => "invalid_macro",
            Self::NoMatchingClause { .. } => "no_matching_clause",
            Self::EllipsisArityMismatch { .. } => "ellipsis_arity_mismatch",
            Self::ExpansionDepthExceeded { .. } => "expansion_depth_exceeded",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UnexpectedEof { .. } => "input ends here",
            Self::UnexpectedToken { .. } => "unexpected token",
            Self::EmptyInput => "nothing to read",
            Self::InvalidMacro { .. } => "invalid macro",
            Self::NoMatchingClause { .. } => "no clause matches this use",
            Self::EllipsisArityMismatch { .. } => "ellipsis arity mismatch",
            Self::ExpansionDepthExceeded { .. } => "expansion depth exceeded",
        }
    }
}

/// The single error type of the crate.
#[derive(Debug, Clone)]
pub struct SexpandError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
    pub source: Option<Arc<NamedSource<String>>>,
    pub help: Option<String>,
}

impl SexpandError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            span: None,
            source: None,
            help: None,
        }
    }

    pub fn at(kind: ErrorKind, span: Span) -> Self {
        Self {
            span: Some(span),
            ..Self::new(kind)
        }
    }

    /// Attaches the source text once it is known to the caller.
    pub fn with_source(mut self, source: &SourceContext) -> Self {
        self.source = Some(source.to_named_source());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn error_code(&self) -> String {
        format!("sexpand::{}::{}", self.category(), self.kind.code_suffix())
    }
}

impl From<ErrorKind> for SexpandError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl std::error::Error for SexpandError {}

impl fmt::Display for SexpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for SexpandError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error_code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            to_source_span(span),
        );
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source
            .as_deref()
            .map(|source| source as &dyn miette::SourceCode)
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Converts a crate [`Span`] to a miette `SourceSpan`.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Prints an error with full miette diagnostics.
pub fn print_error(error: SexpandError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
