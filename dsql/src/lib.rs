//! # dsql
//!
//! dsql is a data-driven SQL generator: it turns a declarative tree built
//! from mappings, ordered sequences and symbolic names into a pair of
//! (SQL string with placeholder markers, ordered parameter list). It
//! never executes SQL and never parses SQL text — the caller feeds the
//! generated string and parameters to any database driver.
//!
//! Start at [`format`] for a statement mapping (the common case),
//! [`format_expr`] for a standalone expression, or [`format_expr_list`]
//! for a sequence of expressions a caller wants to join itself. Extend
//! the formatter with [`register_clause`], [`register_fn`] and
//! [`register_op`]; change the process-wide default dialect with
//! [`set_dialect`].

#![deny(missing_docs)]
#![deny(unused_imports)]

mod api;
mod clause;
mod engine;
mod expr;
mod ident;
mod special;
mod statement;
mod value;

pub use dsql_ast as ast;
pub use dsql_core as core;

pub use api::{
    format, format_dsl, format_expr, format_expr_list, register_clause, register_fn,
    register_fn_alias, register_op, set_dialect, sql_kw, Opts,
};
pub use dsql_ast::{Name, NameKind, Node, ParamValue, Statement};
pub use dsql_core::{Dialect, Error, ErrorKind, Fragment, Param, Params};
