//! Macro registry: keyword → compiled definition.
//!
//! Definitions are stored in a persistent map, so cloning a registry is
//! cheap and gives an independent snapshot. Expansion only reads the
//! registry; once all definitions are in place a shared `&MacroRegistry` can
//! expand on many threads at once.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::ast::Expr;
use crate::errors::{ErrorKind, SexpandError};
use crate::macros::compiler::{compile_clause, ELLIPSIS, UNDERSCORE};
use crate::macros::loader::parse_syntax_rules;
use crate::macros::std::register_std_macros;
use crate::macros::types::{ExpansionConfig, MacroDefinition, Provenance};

#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: im::HashMap<String, Arc<MacroDefinition>>,
    config: ExpansionConfig,
}

impl MacroRegistry {
    /// Creates a new, empty macro registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExpansionConfig) -> Self {
        Self {
            macros: im::HashMap::new(),
            config,
        }
    }

    /// Creates a registry holding the built-in macros.
    pub fn with_prelude() -> Result<Self, SexpandError> {
        Self::with_config(ExpansionConfig::default()).and_prelude()
    }

    /// Adds the built-in macros to this registry.
    pub fn and_prelude(mut self) -> Result<Self, SexpandError> {
        register_std_macros(&mut self)?;
        Ok(self)
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExpansionConfig) {
        self.config = config;
    }

    /// Compiles and installs a user macro.
    ///
    /// Any earlier definition of `keyword` is replaced and returned.
    ///
    /// # Errors
    /// `InvalidMacro` when a literal or a clause is malformed. The registry is
    /// left unchanged in that case.
    pub fn define(
        &mut self,
        keyword: &str,
        literals: &[String],
        clauses: &[Expr],
    ) -> Result<Option<Arc<MacroDefinition>>, SexpandError> {
        self.define_as(keyword, literals, clauses, Provenance::User)
    }

    pub fn define_as(
        &mut self,
        keyword: &str,
        literals: &[String],
        clauses: &[Expr],
        provenance: Provenance,
    ) -> Result<Option<Arc<MacroDefinition>>, SexpandError> {
        let definition = self.compile(keyword, literals, clauses, provenance)?;
        Ok(self.macros.insert(keyword.to_string(), Arc::new(definition)))
    }

    /// Installs a macro from a raw `(syntax-rules (literal ...) clause ...)`
    /// expression.
    pub fn define_syntax_rules(
        &mut self,
        keyword: &str,
        form: &Expr,
    ) -> Result<Option<Arc<MacroDefinition>>, SexpandError> {
        let rules = parse_syntax_rules(keyword, form)?;
        self.define(keyword, &rules.literals, &rules.clauses)
    }

    pub fn lookup(&self, keyword: &str) -> Option<&Arc<MacroDefinition>> {
        self.macros.get(keyword)
    }

    /// Removes a macro, returning its definition if it existed.
    pub fn unregister(&mut self, keyword: &str) -> Option<Arc<MacroDefinition>> {
        self.macros.remove(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.macros.contains_key(keyword)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.macros.keys()
    }

    fn compile(
        &self,
        keyword: &str,
        literals: &[String],
        clauses: &[Expr],
        provenance: Provenance,
    ) -> Result<MacroDefinition, SexpandError> {
        let mut literal_set: BTreeSet<String> = self.config.core_literals.iter().cloned().collect();
        literal_set.insert(keyword.to_string());
        for literal in literals {
            if literal == ELLIPSIS || literal == UNDERSCORE {
                return Err(SexpandError::new(ErrorKind::InvalidMacro {
                    keyword: keyword.to_string(),
                    reason: format!("'{}' is reserved and cannot be a literal", literal),
                }));
            }
            literal_set.insert(literal.clone());
        }

        let clauses = clauses
            .iter()
            .enumerate()
            .map(|(index, clause)| {
                compile_clause(keyword, &literal_set, clause)
                    .map_err(|e| e.with_help(format!("in clause {} of '{}'", index, keyword)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MacroDefinition {
            keyword: keyword.to_string(),
            literals: literal_set,
            clauses,
            provenance,
        })
    }
}
