//! Matching a compiled pattern against the arguments of a macro use.

use crate::ast::Expr;
use crate::macros::types::{Binding, Bindings, Clause, Pattern, PatternItem};

/// Matches a clause's pattern against a use's argument list (keyword
/// already stripped). Returns the bindings on success.
pub fn match_clause(clause: &Clause, arguments: &Expr) -> Option<Bindings> {
    match_pattern(&clause.pattern, arguments)
}

/// Matches `pattern` against `input`.
///
/// Depth-0 variables bind to [`Binding::One`]; a variable under a repeated
/// item binds to [`Binding::Many`] with one entry per repetition.
pub fn match_pattern(pattern: &Pattern, input: &Expr) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    match_into(pattern, input, &mut bindings).then_some(bindings)
}

fn match_into(pattern: &Pattern, input: &Expr, bindings: &mut Bindings) -> bool {
    match pattern {
        Pattern::Underscore => true,
        Pattern::Literal(atom) => matches!(input, Expr::Atom(found) if found == atom),
        Pattern::Variable(name) => {
            bindings.insert(name.clone(), Binding::One(input.clone()));
            true
        }
        Pattern::List(items) => match_list(items, input, bindings),
    }
}

fn match_list(items: &[PatternItem], input: &Expr, bindings: &mut Bindings) -> bool {
    let (elements, tail) = input.split_list();
    if !tail.is_empty_list() {
        return false;
    }

    let mut pos = 0;
    for (index, item) in items.iter().enumerate() {
        if !item.repeated {
            let Some(element) = elements.get(pos) else {
                return false;
            };
            if !match_into(&item.pattern, element, bindings) {
                return false;
            }
            pos += 1;
            continue;
        }

        // Leave room for every fixed item after this one.
        let fixed_after = items[index + 1..].iter().filter(|i| !i.repeated).count();
        let available = elements.len().saturating_sub(pos + fixed_after);

        let mut repetitions = Vec::new();
        while repetitions.len() < available {
            let mut repetition = Bindings::new();
            if !match_into(&item.pattern, elements[pos], &mut repetition) {
                break;
            }
            repetitions.push(repetition);
            pos += 1;
        }

        if !bind_repetitions(&item.pattern, &repetitions, bindings) {
            return false;
        }
    }

    pos == elements.len()
}

/// Collects each variable of a repeated item into one sequence, in order.
fn bind_repetitions(pattern: &Pattern, repetitions: &[Bindings], bindings: &mut Bindings) -> bool {
    for name in pattern.variables() {
        let sequence: Option<Vec<Binding>> = repetitions
            .iter()
            .map(|repetition| repetition.get(name).cloned())
            .collect();
        let Some(sequence) = sequence else {
            return false;
        };
        bindings.insert(name.to_string(), Binding::Many(sequence));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::compiler::compile_pattern;
    use crate::syntax::parse_one;
    use std::collections::BTreeSet;

    /// Matches `pattern_src` against `input_src` and reports bindings by
    /// original variable name.
    fn run(pattern_src: &str, input_src: &str) -> Option<Vec<(String, Binding)>> {
        let literals: BTreeSet<String> = ["else".to_string()].into_iter().collect();
        let (pattern, table) =
            compile_pattern("m", &literals, &parse_one(pattern_src).unwrap()).unwrap();
        let originals = table.reversed();
        let bindings = match_pattern(&pattern, &parse_one(input_src).unwrap())?;
        let mut named: Vec<(String, Binding)> = bindings
            .into_iter()
            .map(|(fresh, binding)| (originals[&fresh].clone(), binding))
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));
        Some(named)
    }

    fn one(source: &str) -> Binding {
        Binding::One(parse_one(source).unwrap())
    }

    #[test]
    fn variables_bind_positionally() {
        let named = run("(a b)", "(1 (x y))").unwrap();
        assert_eq!(named, [("a".to_string(), one("1")), ("b".to_string(), one("(x y)"))]);
    }

    #[test]
    fn arity_mismatch_fails() {
        assert!(run("(a b)", "(1)").is_none());
        assert!(run("(a b)", "(1 0 1)").is_none());
        assert!(run("()", "(x)").is_none());
        assert!(run("()", "()").is_some());
    }

    #[test]
    fn literals_must_match_verbatim() {
        assert!(run("(else a)", "(else 1)").is_some());
        assert!(run("(else a)", "(other 1)").is_none());
        assert!(run("(0 a)", "(0 x)").is_some());
        assert!(run("(0 a)", "(1 x)").is_none());
    }

    #[test]
    fn underscore_binds_nothing() {
        assert_eq!(run("(_ a)", "(x y)").unwrap(), [("a".to_string(), one("y"))]);
    }

    #[test]
    fn ellipsis_leaves_room_for_fixed_tail() {
        let named = run("(a ... b c)", "(1 2 3 4)").unwrap();
        assert_eq!(
            named,
            [
                ("a".to_string(), Binding::Many(vec![one("1"), one("2")])),
                ("b".to_string(), one("3")),
                ("c".to_string(), one("4")),
            ]
        );
    }

    #[test]
    fn ellipsis_matches_zero_repetitions() {
        let named = run("((x y) ...)", "()").unwrap();
        assert_eq!(
            named,
            [
                ("x".to_string(), Binding::Many(vec![])),
                ("y".to_string(), Binding::Many(vec![])),
            ]
        );
    }

    #[test]
    fn nested_ellipsis_builds_nested_sequences() {
        let named = run("((a b ...) ...)", "((1 x y) (0))").unwrap();
        assert_eq!(
            named,
            [
                ("a".to_string(), Binding::Many(vec![one("1"), one("0")])),
                (
                    "b".to_string(),
                    Binding::Many(vec![
                        Binding::Many(vec![one("x"), one("y")]),
                        Binding::Many(vec![]),
                    ])
                ),
            ]
        );
    }

    #[test]
    fn repeated_item_that_cannot_match_fails_the_list() {
        assert!(run("((a b) ...)", "((1 0) x)").is_none());
    }

    #[test]
    fn too_short_for_fixed_tail_fails() {
        assert!(run("(a ... b c)", "(1)").is_none());
    }

    #[test]
    fn list_pattern_rejects_atoms_and_improper_lists() {
        let (pattern, _) =
            compile_pattern("m", &BTreeSet::new(), &parse_one("(a)").unwrap()).unwrap();
        assert!(match_pattern(&pattern, &Expr::symbol("x")).is_none());
        let improper = Expr::list_with_tail(vec![Expr::symbol("x")], Expr::symbol("y"));
        assert!(match_pattern(&pattern, &improper).is_none());
    }
}
