//! Built-in macros installed by [`MacroRegistry::with_prelude`].

use once_cell::sync::Lazy;

use crate::errors::SexpandError;
use crate::macros::loader::{parse_macros_from_source, SyntaxRules};
use crate::macros::registry::MacroRegistry;
use crate::macros::types::Provenance;

/// `let` as a lambda application.
pub const PRELUDE: &str = "
(define-syntax let
  (syntax-rules ()
    ((_ ((var exp) ...) body1 body2 ...)
     ((lambda (var ...) (begin body1 body2 ...)) exp ...))))
";

// Read once per process; compiled per registry since compilation depends on
// the registry's configuration.
static PRELUDE_FORMS: Lazy<Result<Vec<(String, SyntaxRules)>, SexpandError>> =
    Lazy::new(|| parse_macros_from_source(PRELUDE));

/// Installs the prelude macros as [`Provenance::Core`].
pub fn register_std_macros(registry: &mut MacroRegistry) -> Result<(), SexpandError> {
    let forms = PRELUDE_FORMS.as_ref().map_err(Clone::clone)?;
    for (keyword, rules) in forms {
        registry.define_as(keyword, &rules.literals, &rules.clauses, Provenance::Core)?;
    }
    Ok(())
}
