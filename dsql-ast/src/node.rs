use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{name::Name, statement::Statement};

/// A node in the declarative SQL tree: a leaf (name, literal, or nested
/// statement) or an ordered sequence.
///
/// `Node` is deliberately shape-generic rather than a fixed SQL grammar:
/// clause renderers in `dsql` decide, per clause, whether a sequence is a
/// column list, a list of row tuples, a `[target, condition]` pair, and so
/// on. This mirrors the source system, where the same vector-of-things
/// shape is reused across many clauses with clause-specific meaning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// SQL `NULL`.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// A numeric literal, kept as its canonical source text so that
    /// formatting never round-trips through a float.
    Number(String),
    /// A string literal.
    Str(String),
    /// A symbolic name: identifier, named-parameter reference, function
    /// shorthand, or inline keyword token.
    Name(Name),
    /// An ordered sequence `[op, arg, ...]`, or, absent a symbolic head, a
    /// tuple of expressions.
    List(Vec<Node>),
    /// A nested statement mapping, used either as a top-level statement
    /// or, in expression position, as a subquery.
    Map(Statement),
}

impl Node {
    /// A plain identifier, e.g. `Node::ident("users.id")`.
    pub fn ident(raw: impl Into<String>) -> Self {
        Node::Name(Name::ident(raw))
    }

    /// A named-parameter reference, e.g. `Node::named("limit")` renders
    /// the same as writing `?limit` in the tree.
    pub fn named(name: impl AsRef<str>) -> Self {
        Node::Name(Name::named(name))
    }

    /// A function-call shorthand, e.g. `Node::function("lower.name")`.
    pub fn function(dotted: impl AsRef<str>) -> Self {
        Node::Name(Name::function(dotted))
    }

    /// An inline keyword token, e.g. `Node::keyword_token("from")`.
    pub fn keyword_token(word: impl AsRef<str>) -> Self {
        Node::Name(Name::keyword_token(word))
    }

    /// An expression application `[head, args...]`.
    pub fn call(head: impl Into<String>, args: impl IntoIterator<Item = Node>) -> Self {
        let mut list = Vec::with_capacity(1);
        list.push(Node::ident(head.into()));
        list.extend(args);
        Node::List(list)
    }

    /// True if this node is `Node::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Borrows the node as a sequence, if it is one.
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the node as a statement mapping, if it is one.
    pub fn as_map(&self) -> Option<&Statement> {
        match self {
            Node::Map(stmt) => Some(stmt),
            _ => None,
        }
    }

    /// Borrows the node as a symbolic name, if it is one.
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Node::Name(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    /// Renders the node's *literal* text only (no dialect context, no
    /// parameterization). This is a debugging aid, not the SQL renderer —
    /// full rendering lives in `dsql::expr::format_expr`, which needs a
    /// `Context` to resolve quoting, dialect and named parameters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("NULL"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Number(n) => f.write_str(n),
            Node::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Node::Name(n) => write!(f, "{}", n),
            Node::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Node::Map(stmt) => write!(f, "{{{} clauses}}", stmt.len()),
        }
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::Number(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Str(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Str(value)
    }
}

impl From<Name> for Node {
    fn from(value: Name) -> Self {
        Node::Name(value)
    }
}

impl From<Statement> for Node {
    fn from(value: Statement) -> Self {
        Node::Map(value)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Node::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Node::Null,
        }
    }
}
