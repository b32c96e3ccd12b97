//! # dsql-ast
//!
//! dsql-ast is the tagged-sum data model that the dsql formatter recurses
//! over: a generic tree built from mappings, ordered sequences, symbolic
//! names and scalar leaves, matching the declarative shape a caller
//! constructs by hand (or via a thin DSL layer outside this crate).
//!
//! It carries no formatting behavior — quoting, dialects, operator
//! precedence and clause ordering all live in `dsql-core` and `dsql`,
//! which borrow from the types defined here.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod name;
mod node;
mod param;
mod statement;

pub use self::{
    name::{Name, NameKind},
    node::Node,
    param::ParamValue,
    statement::Statement,
};
