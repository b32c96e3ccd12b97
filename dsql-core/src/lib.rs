//! # dsql-core
//!
//! dsql-core carries everything about the dsql formatter that isn't the
//! data model (`dsql-ast`) and isn't the recursive rendering logic
//! (`dsql`): dialects, the mutable extension registries, the per-call
//! context, the parameter carrier, and the error type.

#![deny(missing_docs)]
#![deny(unused_imports)]

mod context;
mod dialect;
mod error;
mod fragment;
mod param;
/// The mutable clause/special-syntax/operator registries and the
/// built-in base clause order.
pub mod registry;
/// The final unwrap pass: named-parameter resolution, `IN`-collection
/// expansion, and numbered-placeholder renumbering.
pub mod unwrap;

pub use self::{
    context::{Context, Quoting},
    dialect::Dialect,
    error::{Error, ErrorKind},
    fragment::Fragment,
    param::{Param, Params},
    registry::{ClauseRenderer, OpRegistry, Registries, SpecialSyntaxRenderer},
};

pub use dsql_ast::{Name, NameKind, Node, ParamValue, Statement};
