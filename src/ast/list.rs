use super::Expr;

/// An iterator over a cons chain.
///
/// Created by [`Expr::iter`]. It yields the `first` of each pair and stops at
/// the first value that is not a pair. For a proper list that value is
/// [`Expr::Empty`]; for an improper list it is the trailing atom, available
/// through [`ListIter::remainder`] once iteration is done.
pub struct ListIter<'a> {
    current: &'a Expr,
}

impl<'a> ListIter<'a> {
    pub fn new(value: &'a Expr) -> Self {
        ListIter { current: value }
    }

    /// The part of the chain not yet consumed.
    pub fn remainder(&self) -> &'a Expr {
        self.current
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Expr::Pair(cell) => {
                self.current = &cell.rest;
                Some(&cell.first)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proper_list_ends_at_empty() {
        let list = Expr::list(vec![Expr::symbol("a"), Expr::symbol("b")]);
        let (items, tail) = list.split_list();
        assert_eq!(items.len(), 2);
        assert_eq!(tail, &Expr::Empty);
    }

    #[test]
    fn improper_list_reports_trailing_atom() {
        let list = Expr::list_with_tail(vec![Expr::symbol("a")], Expr::symbol("b"));
        let (items, tail) = list.split_list();
        assert_eq!(items, vec![&Expr::symbol("a")]);
        assert_eq!(tail, &Expr::symbol("b"));
        assert_eq!(list.to_vec(), None);
        assert_eq!(list.to_string(), "(a . b)");
    }

    #[test]
    fn iteration_is_restartable() {
        let list = Expr::list(vec![Expr::number(0), Expr::number(1)]);
        assert_eq!(list.iter().count(), 2);
        assert_eq!(list.iter().count(), 2);
    }
}
