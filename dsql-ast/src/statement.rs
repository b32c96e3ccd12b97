use core::fmt;

use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// A statement mapping: clause-name to clause-value.
///
/// The order entries are inserted in is irrelevant to rendering — the
/// active clause ordering decides render order — but `Statement` keeps
/// insertion order anyway (an [`indexmap::IndexMap`] rather than a
/// hash map) so that `Debug` output and iteration over "unrecognized
/// clause" errors are reproducible from one run to the next.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statement(IndexMap<String, Node>);

impl Statement {
    /// Creates an empty statement.
    pub fn new() -> Self {
        Statement(IndexMap::new())
    }

    /// Builder-style clause insertion: `Statement::new().clause("select",
    /// ...).clause("from", ...)`.
    pub fn clause(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Inserts or replaces a clause value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.0.insert(name.into(), value.into())
    }

    /// Looks up a clause's value by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.0.get(name)
    }

    /// Removes and returns a clause's value by name.
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.0.shift_remove(name)
    }

    /// True if the given clause name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of clauses present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no clauses are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates clause name/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates clause names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Node)> for Statement {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Statement(iter.into_iter().collect())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", k, v)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_insertion_order() {
        let stmt = Statement::new()
            .clause("select", Node::from(vec![Node::ident("*")]))
            .clause("from", Node::from(vec![Node::ident("t")]));
        let names: Vec<_> = stmt.keys().collect();
        assert_eq!(names, vec!["select", "from"]);
    }

    #[test]
    fn remove_drops_a_clause() {
        let mut stmt = Statement::new().clause("where", Node::Bool(true));
        assert!(stmt.contains("where"));
        stmt.remove("where");
        assert!(!stmt.contains("where"));
    }
}
