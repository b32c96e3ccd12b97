#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// A host-language value bound into a `format` call's `params` map, or
/// produced by lowering a literal leaf [`Node`] into a parameter.
///
/// The [`ParamValue::Collection`] variant exists for exactly one purpose:
/// a named parameter (or a `[:lift ...]`-wrapped expression) that resolves
/// to a collection is encoded as a *single* placeholder up front; `IN`
/// rendering later detects that single placeholder's value is a
/// collection and unpacks it into one placeholder per element. A literal
/// sequence written directly in the tree (`[1, 2, 3, 4]`) never takes this
/// path — it renders through the ordinary tuple rule instead, because each
/// element is its own `Node` leaf with its own placeholder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamValue {
    /// SQL `NULL`.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A numeric value, kept as canonical text.
    Number(String),
    /// A string value.
    Str(String),
    /// A collection of values, bound as one parameter until unpacked.
    Collection(Vec<ParamValue>),
}

impl ParamValue {
    /// Lowers a literal leaf node into a parameter value. Returns `None`
    /// for `Node::Name` and `Node::Map`, which have no meaning as a bound
    /// parameter.
    pub fn from_leaf(node: &Node) -> Option<ParamValue> {
        match node {
            Node::Null => Some(ParamValue::Null),
            Node::Bool(b) => Some(ParamValue::Bool(*b)),
            Node::Number(n) => Some(ParamValue::Number(n.clone())),
            Node::Str(s) => Some(ParamValue::Str(s.clone())),
            Node::List(items) => {
                let values: Option<Vec<_>> = items.iter().map(ParamValue::from_leaf).collect();
                values.map(ParamValue::Collection)
            }
            Node::Name(_) | Node::Map(_) => None,
        }
    }

    /// True if this value is a collection, i.e. eligible for `IN`
    /// unpacking.
    pub fn is_collection(&self) -> bool {
        matches!(self, ParamValue::Collection(_))
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Number(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        ParamValue::Collection(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => ParamValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_lowering_handles_scalars() {
        assert_eq!(ParamValue::from_leaf(&Node::Null), Some(ParamValue::Null));
        assert_eq!(
            ParamValue::from_leaf(&Node::from(1i64)),
            Some(ParamValue::Number("1".into()))
        );
    }

    #[test]
    fn leaf_lowering_rejects_names_and_maps() {
        assert_eq!(ParamValue::from_leaf(&Node::ident("x")), None);
    }

    #[test]
    fn leaf_lowering_recurses_into_lists() {
        let node = Node::from(vec![Node::from(1i64), Node::from(2i64)]);
        assert_eq!(
            ParamValue::from_leaf(&node),
            Some(ParamValue::Collection(vec![
                ParamValue::Number("1".into()),
                ParamValue::Number("2".into()),
            ]))
        );
    }

    #[test]
    fn collection_from_vec_of_i64() {
        let v: ParamValue = vec![1i64, 2, 3].into();
        assert!(v.is_collection());
    }
}
