// tests/engine_tests.rs

use sexpand::engine::{expand_forms, expand_named_source, expand_program, expand_source};
use sexpand::macros::Provenance;
use sexpand::syntax::{parse, parse_one};
use sexpand::{ErrorKind, ExpansionConfig, MacroRegistry, SourceContext};

fn printed(forms: &[sexpand::Expr]) -> Vec<String> {
    forms.iter().map(ToString::to_string).collect()
}

#[test]
fn test_expand_program_with_prelude() {
    let forms = expand_program("(let ((x 1) (y 0)) x)").unwrap();
    assert_eq!(printed(&forms), vec!["((lambda (x y) (begin x)) 1 0)"]);
}

#[test]
fn test_definitions_apply_to_later_forms() {
    let source = r#"
        (define-syntax unless
          (syntax-rules ()
            ((_ c body ...) (if c 0 (begin body ...)))))
        (unless ready (log "waiting") (retry))
        (define x (unless 1 x))
    "#;
    let forms = expand_program(source).unwrap();
    assert_eq!(
        printed(&forms),
        vec![
            "(if ready 0 (begin (log \"waiting\") (retry)))",
            "(define x (if 1 0 (begin x)))",
        ]
    );
}

#[test]
fn test_use_before_definition_is_left_alone() {
    let source = "
        (twice a)
        (define-syntax twice (syntax-rules () ((_ e) (begin e e))))
        (twice b)
    ";
    let forms = expand_program(source).unwrap();
    assert_eq!(printed(&forms), vec!["(twice a)", "(begin b b)"]);
}

#[test]
fn test_program_definitions_are_reported_and_kept() {
    let mut registry = MacroRegistry::with_prelude().unwrap();
    let program = expand_source(
        "(define-syntax first (syntax-rules () ((_ a b ...) a)))
         (define-syntax second (syntax-rules () ((_ a b c ...) b)))",
        &mut registry,
    )
    .unwrap();

    assert!(program.forms.is_empty());
    assert_eq!(program.defined, vec!["first", "second"]);
    assert!(registry.contains("first"));
    let mut names: Vec<_> = registry.names().cloned().collect();
    names.sort();
    assert_eq!(names, vec!["first", "let", "second"]);
    assert_eq!(
        registry.lookup("second").unwrap().provenance,
        Provenance::User
    );

    let expanded = registry.expand(&parse_one("(second p q r)").unwrap()).unwrap();
    assert_eq!(expanded.to_string(), "q");
}

#[test]
fn test_user_definition_may_replace_prelude_macro() {
    let forms = expand_program(
        "(define-syntax let (syntax-rules () ((_ body) (scope body))))
         (let 0)",
    )
    .unwrap();
    assert_eq!(printed(&forms), vec!["(scope 0)"]);
}

#[test]
fn test_trace_follows_config() {
    let config = ExpansionConfig::default().with_trace(true);
    let mut registry = MacroRegistry::with_config(config).and_prelude().unwrap();
    let program = expand_source("(let ((x 1)) (let () x))", &mut registry).unwrap();

    assert_eq!(program.trace.len(), 2);
    assert!(program.trace.iter().all(|step| step.keyword == "let"));
    assert!(program
        .trace
        .iter()
        .all(|step| step.provenance == Provenance::Core));

    let mut quiet = MacroRegistry::with_prelude().unwrap();
    let program = expand_source("(let ((x 1)) x)", &mut quiet).unwrap();
    assert!(program.trace.is_empty());
}

#[test]
fn test_core_literals_are_configurable() {
    let config = ExpansionConfig::default().with_core_literals(["fn"]);
    let mut registry = MacroRegistry::with_config(config);
    expand_source(
        "(define-syntax wrap (syntax-rules () ((_ fn x) (fn x))))",
        &mut registry,
    )
    .unwrap();

    let expanded = registry.expand(&parse_one("(wrap fn 0)").unwrap()).unwrap();
    assert_eq!(expanded.to_string(), "(fn 0)");
    assert!(registry
        .expand(&parse_one("(wrap g 0)").unwrap())
        .is_err());
}

#[test]
fn test_expand_forms_without_source() {
    let forms = parse("(define-syntax k (syntax-rules () ((_) 1))) (k)").unwrap();
    let mut registry = MacroRegistry::new();
    let program = expand_forms(forms, &mut registry).unwrap();
    assert_eq!(printed(&program.forms), vec!["1"]);
}

#[test]
fn test_errors_carry_named_source() {
    use miette::Diagnostic;

    let mut registry = MacroRegistry::with_prelude().unwrap();
    let err = expand_named_source(
        SourceContext::from_file("broken.scm", "(let x)"),
        &mut registry,
    )
    .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::NoMatchingClause { .. }));
    assert_eq!(err.error_code(), "sexpand::expansion::no_matching_clause");
    assert!(err.source_code().is_some());
}

#[test]
fn test_malformed_define_syntax() {
    let err = expand_program("(define-syntax (m) (syntax-rules ()))").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidMacro { .. }));

    let err = expand_program("(define-syntax m)").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidMacro { .. }));
}

#[test]
fn test_syntax_errors_stop_the_program() {
    let err = expand_program("(let ((x 1)) x").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnexpectedEof { .. }));
}

#[test]
fn test_diagnostic_renders() {
    let err = expand_program("(f))").unwrap_err();
    let rendered = format!("{:?}", miette::Report::new(err.clone()));
    assert!(rendered.contains("sexpand::syntax::unexpected_token"));
    sexpand::errors::print_error(err);
}
