use crate::{NodeId, NodeKind, Tree};
use std::fmt;
use std::sync::Arc;

/// Boolean test over a node in a tree.
pub type NodePredicate = Arc<dyn Fn(&Tree, NodeId) -> bool + Send + Sync>;

/// A kind tag or an arbitrary predicate, tested uniformly through
/// [`Matcher::matches`].
#[derive(Clone)]
pub enum Matcher {
    Kind(NodeKind),
    Predicate(NodePredicate),
}

impl Matcher {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Tree, NodeId) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(f))
    }

    /// Matches nodes of any of the given kinds.
    pub fn any_of(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        let kinds: Vec<NodeKind> = kinds.into_iter().collect();
        Matcher::predicate(move |tree, id| tree.kind(id).is_some_and(|k| kinds.contains(&k)))
    }

    pub fn matches(&self, tree: &Tree, id: NodeId) -> bool {
        match self {
            Matcher::Kind(kind) => tree.kind(id) == Some(*kind),
            Matcher::Predicate(f) => f(tree, id),
        }
    }
}

impl From<NodeKind> for Matcher {
    fn from(kind: NodeKind) -> Self {
        Matcher::Kind(kind)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARA: NodeKind = NodeKind::container("paragraph");
    const CHAR: NodeKind = NodeKind::atomic("char");

    #[test]
    fn test_kind_and_predicate_are_interchangeable() {
        let mut tree = Tree::new();
        let p = tree.create(PARA);
        let c = tree.create(CHAR);

        let by_kind: Matcher = PARA.into();
        let by_fn = Matcher::predicate(|tree, id| tree.kind(id) == Some(PARA));

        assert!(by_kind.matches(&tree, p));
        assert!(by_fn.matches(&tree, p));
        assert!(!by_kind.matches(&tree, c));
        assert!(!by_fn.matches(&tree, c));
    }

    #[test]
    fn test_any_of() {
        let mut tree = Tree::new();
        let p = tree.create(PARA);
        let c = tree.create(CHAR);
        let m = tree.create_marker();

        let matcher = Matcher::any_of([PARA, CHAR]);
        assert!(matcher.matches(&tree, p));
        assert!(matcher.matches(&tree, c));
        assert!(!matcher.matches(&tree, m));
    }
}
