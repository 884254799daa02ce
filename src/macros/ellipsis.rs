//! Ellipsis depth resolution.
//!
//! The depth of a pattern variable is the number of `...` it sits under.
//! Depth 0 variables match one expression and get no entry in the map.

use crate::macros::types::{DepthMap, Pattern};

/// Computes the depth of every repeated pattern variable.
pub fn resolve_depths(pattern: &Pattern) -> DepthMap {
    let mut depths = DepthMap::new();
    walk(pattern, false, 0, &mut depths);
    depths
}

fn walk(pattern: &Pattern, repeated: bool, depth: usize, depths: &mut DepthMap) {
    let own = usize::from(repeated);
    match pattern {
        Pattern::Variable(name) => {
            if repeated || depth > 0 {
                depths.insert(name.clone(), depth + own);
            }
        }
        Pattern::List(items) => {
            for item in items {
                walk(&item.pattern, item.repeated, depth + own, depths);
            }
        }
        Pattern::Underscore | Pattern::Literal(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::compiler::compile_pattern;
    use crate::syntax::parse_one;
    use std::collections::BTreeSet;

    fn depths_by_original(source: &str) -> Vec<(String, usize)> {
        let expr = parse_one(source).unwrap();
        let (pattern, table) = compile_pattern("m", &BTreeSet::new(), &expr).unwrap();
        let depths = resolve_depths(&pattern);
        let originals = table.reversed();
        let mut named: Vec<(String, usize)> = depths
            .into_iter()
            .map(|(fresh, depth)| (originals[&fresh].clone(), depth))
            .collect();
        named.sort();
        named
    }

    #[test]
    fn nested_ellipses_accumulate() {
        assert_eq!(depths_by_original("(a (b ...) ...)"), [("b".to_string(), 2)]);
    }

    #[test]
    fn variables_inside_repeated_list_share_its_depth() {
        assert_eq!(
            depths_by_original("(((var exp) ...) body1 body2 ...)"),
            [
                ("body2".to_string(), 1),
                ("exp".to_string(), 1),
                ("var".to_string(), 1),
            ]
        );
    }

    #[test]
    fn unrepeated_variables_have_no_entry() {
        assert!(depths_by_original("(a (b c))").is_empty());
    }
}
