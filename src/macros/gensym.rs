//! Fresh identifier generation.
//!
//! Generated names contain a space, which the tokenizer never puts inside a
//! token, so they cannot collide with any symbol read from source.

use std::sync::atomic::{AtomicU64, Ordering};

pub const GENSYM_PREFIX: &str = "#<gensym ";

static SYMBOL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a name distinct from every previous result in this process.
pub fn gensym() -> String {
    let n = SYMBOL_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}{}>", GENSYM_PREFIX, n)
}

pub fn is_gensym(name: &str) -> bool {
    name.starts_with(GENSYM_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_pairwise_distinct() {
        let names: HashSet<String> = (0..1000).map(|_| gensym()).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn distinct_across_threads() {
        let names: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| (0..250).map(|_| gensym()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_default())
                .collect()
        });
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn generated_names_never_tokenize_as_one_symbol() {
        let name = gensym();
        assert!(is_gensym(&name));
        let tokens = crate::syntax::tokenize(&name).unwrap();
        assert!(tokens.len() > 1);
    }
}
