use std::collections::HashMap;

pub use dsql_ast::ParamValue;

/// A parameter carrier occupying one placeholder position.
///
/// Three shapes:
/// - [`Param::Value`] — a value known at format time. If it turns out to
///   be a [`ParamValue::Collection`] (e.g. resolved from a named
///   parameter bound to a host list), the final unwrap pass unpacks it
///   into one placeholder per element.
/// - [`Param::Lifted`] — also known at format time, but produced by the
///   `lift` special form, which explicitly opts out of collection
///   unpacking: it always occupies exactly one placeholder.
/// - [`Param::Named`] — a deferred reference, resolved against the
///   `params` binding map during the final unwrap pass; missing a
///   binding is a `missing-param` error.
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    /// A value known at format time, eligible for `IN` unpacking.
    Value(ParamValue),
    /// A value known at format time, produced by `lift`; never unpacked.
    Lifted(ParamValue),
    /// A named-parameter reference, resolved at unwrap time.
    Named(String),
}

impl Param {
    /// True if this carrier, once resolved, should be unpacked by the
    /// final pass when its value is a collection.
    pub fn is_unpackable(&self) -> bool {
        !matches!(self, Param::Lifted(_))
    }
}

impl From<ParamValue> for Param {
    fn from(value: ParamValue) -> Self {
        Param::Value(value)
    }
}

/// The `params` binding map passed to a `format` call, used to resolve
/// `?name` references.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(HashMap<String, ParamValue>);

impl Params {
    /// An empty binding map.
    pub fn new() -> Self {
        Params(HashMap::new())
    }

    /// Binds a name to a value, builder-style.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Inserts or replaces a binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up a binding by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }
}

impl FromIterator<(String, ParamValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}
