//! The public entry points: `format`, `format_dsl`, `format_expr`,
//! `format_expr_list`, `sql_kw`, and the `set_dialect!`/`register_*!`
//! extension functions.
//!
//! Everything here is a thin shell around [`crate::statement`] and
//! [`crate::expr`]: it resolves the per-call [`Context`] from an [`Opts`]
//! value against the process-wide registries, renders, and — for the
//! `format*` functions that return owned `(String, Vec<ParamValue>)`
//! rather than a raw [`Fragment`] — runs the final unwrap pass that
//! resolves named parameters and renumbers placeholders.

use dsql_core::{
    unwrap::resolve_and_number, Context, Dialect, Error, Fragment, Node, ParamValue, Params,
    Quoting, Statement,
};

use crate::{engine, expr, ident, statement};

/// A sentinel byte that can never appear in rendered SQL text (the value
/// encoder never emits a raw control character), used by
/// [`format_expr_list`] to recover per-expression boundaries after a
/// single joint pass through the unwrap machinery.
const JOIN_SENTINEL: &str = "\u{0}";

/// Per-call formatting options.
///
/// Builder-style: start from [`Opts::new`] and chain setters.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// The dialect tag for this call (`"ansi"`, `"mysql"`, ...). `None`
    /// uses the process-wide default dialect (initially `ansi`).
    pub dialect: Option<String>,
    /// The tri-state quoting override. `None` resolves the default
    /// quoting policy for the selected dialect.
    pub quoted: Option<bool>,
    /// Literalize values instead of parameterizing them.
    pub inline: bool,
    /// Render placeholders as `$1`, `$2`, ... instead of `?`.
    pub numbered: bool,
    /// The named-parameter binding map for this call.
    pub params: Params,
    /// Separate clauses with newlines and wrap the statement in them.
    pub pretty: bool,
}

impl Opts {
    /// The default options: `ansi`-or-global-default dialect, unusual-only
    /// quoting, no inlining, positional `?` placeholders, no bindings, not
    /// pretty-printed.
    pub fn new() -> Self {
        Opts::default()
    }

    /// Sets the dialect tag for this call.
    pub fn dialect(mut self, tag: impl Into<String>) -> Self {
        self.dialect = Some(tag.into());
        self
    }

    /// Sets the tri-state quoting override.
    pub fn quoted(mut self, quoted: bool) -> Self {
        self.quoted = Some(quoted);
        self
    }

    /// Sets whether values are literalized rather than parameterized.
    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Sets whether placeholders are numbered.
    pub fn numbered(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }

    /// Sets the named-parameter binding map.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets whether the rendered SQL is pretty-printed.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Resolves an [`Opts`] value and a registries snapshot into a per-call
/// [`Context`]. `dialect_selected` is true when a dialect was chosen,
/// either explicitly for this call or earlier for the whole process via
/// [`set_dialect`]; quoting defaults to "always" whenever a dialect has
/// been selected, and to "unusual identifiers only" otherwise.
fn build_context<'a>(
    opts: &'a Opts,
    registries: &'a dsql_core::Registries,
) -> Result<Context<'a>, Error> {
    let dialect = match &opts.dialect {
        Some(tag) => Dialect::from_tag(tag).ok_or_else(|| Error::unknown_dialect(tag))?,
        None => registries.default_dialect(),
    };
    let dialect_selected = opts.dialect.is_some() || registries.default_dialect() != Dialect::default();
    Ok(Context {
        dialect,
        quoting: Quoting::resolve(opts.quoted, dialect_selected),
        inline: opts.inline,
        numbered: opts.numbered,
        pretty: opts.pretty,
        params: &opts.params,
        registries,
    })
}

/// Formats a statement mapping into a SQL string and its parameter list,
/// running the final unwrap pass (named-parameter resolution, `IN`
/// collection expansion, numbered-placeholder renumbering).
pub fn format(data: &Statement, opts: &Opts) -> Result<(String, Vec<ParamValue>), Error> {
    engine::with_registries(|registries| {
        let ctx = build_context(opts, registries)?;
        let fragment = statement::format_statement(data, &ctx, false)?;
        resolve_and_number(&fragment, &opts.params, opts.numbered)
    })
}

/// Formats a statement mapping without running the unwrap pass: the
/// returned [`Fragment`] may still carry deferred named-parameter
/// carriers, useful for a caller composing this statement's rendering
/// into a larger one before a single final unwrap.
pub fn format_dsl(data: &Statement, opts: &Opts) -> Result<Fragment, Error> {
    engine::with_registries(|registries| {
        let ctx = build_context(opts, registries)?;
        statement::format_statement(data, &ctx, false)
    })
}

/// Formats a standalone expression into a SQL string and its parameter
/// list, running the same unwrap pass as [`format`].
pub fn format_expr(data: &Node, opts: &Opts) -> Result<(String, Vec<ParamValue>), Error> {
    engine::with_registries(|registries| {
        let ctx = build_context(opts, registries)?;
        let fragment = expr::format_expr(data, &ctx, false)?;
        resolve_and_number(&fragment, &opts.params, opts.numbered)
    })
}

/// Formats a sequence of expressions independently, returning one
/// rendered fragment string per expression alongside their combined
/// parameter list, for a caller who wants to join the fragments
/// themselves (e.g. with a separator other than `, `).
///
/// Unwrap runs once, jointly, over all expressions rather than once per
/// expression: that is what makes numbered-placeholder mode number
/// consistently across the whole list instead of restarting at `$1`
/// for every element.
pub fn format_expr_list(exprs: &[Node], opts: &Opts) -> Result<(Vec<String>, Vec<ParamValue>), Error> {
    engine::with_registries(|registries| {
        let ctx = build_context(opts, registries)?;
        let fragments = expr::format_expr_list(exprs, &ctx)?;
        let joined = Fragment::join(fragments, JOIN_SENTINEL);
        let (sql, values) = resolve_and_number(&joined, &opts.params, opts.numbered)?;
        let parts = sql.split(JOIN_SENTINEL).map(str::to_string).collect();
        Ok((parts, values))
    })
}

/// Upper-cases a keyword-like name, turning `-` into a space (e.g.
/// `sql_kw("nulls-last")` is `"NULLS LAST"`).
pub fn sql_kw(name: &str) -> String {
    ident::sql_kw(name)
}

/// Sets the process-wide default dialect.
/// Idempotent: calling this twice with the same tag leaves subsequent
/// formatting behavior unchanged.
pub fn set_dialect(tag: &str) -> Result<(), Error> {
    let dialect = Dialect::from_tag(tag).ok_or_else(|| Error::unknown_dialect(tag))?;
    engine::set_dialect(dialect);
    Ok(())
}

pub use engine::{register_clause, register_fn, register_fn_alias, register_op};

#[cfg(test)]
mod tests {
    use super::*;
    use dsql_ast::Node;

    fn select_star_from_t_where_id_eq_1() -> Statement {
        Statement::new()
            .clause("select", Node::from(vec![Node::ident("*")]))
            .clause("from", Node::from(vec![Node::ident("table")]))
            .clause(
                "where",
                Node::List(vec![Node::ident("="), Node::ident("id"), Node::from(1i64)]),
            )
    }

    #[test]
    fn basic_select_with_a_parameter() {
        let (sql, params) = format(&select_star_from_t_where_id_eq_1(), &Opts::new()).unwrap();
        assert_eq!(sql, "SELECT * FROM table WHERE id = ?");
        assert_eq!(params, vec![ParamValue::Number("1".into())]);
    }

    #[test]
    fn unknown_dialect_tag_errors() {
        let err = format(&select_star_from_t_where_id_eq_1(), &Opts::new().dialect("dbase"))
            .unwrap_err();
        assert_eq!(err.kind, dsql_core::ErrorKind::UnknownDialect);
    }

    #[test]
    fn in_with_a_collection_parameter() {
        let stmt = Statement::new()
            .clause("select", Node::from(vec![Node::ident("*")]))
            .clause("from", Node::from(vec![Node::ident("table")]))
            .clause(
                "where",
                Node::List(vec![
                    Node::ident("in"),
                    Node::ident("id"),
                    Node::from(vec![1i64, 2, 3, 4]),
                ]),
            );
        let (sql, params) = format(&stmt, &Opts::new()).unwrap();
        assert_eq!(sql, "SELECT * FROM table WHERE id IN (?, ?, ?, ?)");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn named_parameter_in_numbered_mode() {
        let stmt = Statement::new()
            .clause("select", Node::from(vec![Node::ident("*")]))
            .clause("from", Node::from(vec![Node::ident("table")]))
            .clause(
                "where",
                Node::List(vec![Node::ident("="), Node::ident("a"), Node::named("x")]),
            );
        let params = Params::new().bind("x", 42i64);
        let (sql, values) = format(&stmt, &Opts::new().numbered(true).params(params)).unwrap();
        assert_eq!(sql, "SELECT * FROM table WHERE a = $1");
        assert_eq!(values, vec![ParamValue::Number("42".into())]);
    }

    #[test]
    fn missing_named_param_is_a_format_error() {
        let stmt = Statement::new().clause(
            "where",
            Node::List(vec![Node::ident("="), Node::ident("a"), Node::named("missing")]),
        );
        let err = format(&stmt, &Opts::new()).unwrap_err();
        assert_eq!(err.kind, dsql_core::ErrorKind::MissingParam);
    }

    #[test]
    fn format_expr_list_numbers_consistently_across_expressions() {
        let exprs = vec![
            Node::List(vec![Node::ident("="), Node::ident("a"), Node::from(1i64)]),
            Node::List(vec![Node::ident("="), Node::ident("b"), Node::from(2i64)]),
        ];
        let (parts, values) = format_expr_list(&exprs, &Opts::new().numbered(true)).unwrap();
        assert_eq!(parts, vec!["a = $1".to_string(), "b = $2".to_string()]);
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn sql_kw_is_reachable_from_the_crate_root() {
        assert_eq!(sql_kw("nulls-last"), "NULLS LAST");
    }
}
