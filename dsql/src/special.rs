//! The built-in special-syntax forms: `inline`, `param`, `lift`, `nest`,
//! `not`, `cast`, `between`, `case`, `interval`, `array`, `composite`,
//! `raw`, `over`, plus `distinct` and `exists` as function-position
//! shorthands for predicates that would otherwise need a full clause.

use std::sync::Arc;

use dsql_core::{Context, Error, Fragment, Node, NameKind, ParamValue, Param, Registries, SpecialSyntaxRenderer};

use crate::{expr, ident, value};

/// Registers every built-in special-syntax form into a fresh
/// [`Registries`].
pub fn register_defaults(registries: &mut Registries) {
    register(registries, "inline", render_inline);
    register(registries, "param", render_param);
    register(registries, "lift", render_lift);
    register(registries, "nest", render_nest);
    register(registries, "not", render_not);
    register(registries, "cast", render_cast);
    register(registries, "between", render_between);
    register(registries, "case", render_case);
    register(registries, "interval", render_interval);
    register(registries, "array", render_array);
    register(registries, "composite", render_composite);
    register(registries, "raw", render_raw);
    register(registries, "over", render_over);
    register(registries, "distinct", render_distinct);
    register(registries, "exists", render_exists);
}

fn register(
    registries: &mut Registries,
    name: &str,
    f: fn(&str, &[Node], &Context, bool) -> Result<Fragment, Error>,
) {
    let renderer: SpecialSyntaxRenderer = Arc::new(f);
    registries.register_special_syntax(name, renderer);
}

fn require_arity(name: &str, args: &[Node], n: usize) -> Result<(), Error> {
    if args.len() != n {
        return Err(Error::bad_shape(format!(
            "`{}` requires exactly {} argument(s), got {}",
            name,
            n,
            args.len()
        )));
    }
    Ok(())
}

fn wrap_if_nested(mut fragment: Fragment, nested: bool) -> Fragment {
    if nested {
        fragment.sql = format!("({})", fragment.sql);
    }
    fragment
}

/// `[inline x]`: literalizes `x` per the value encoder's inline table,
/// regardless of the call's own `inline` option.
fn render_inline(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    let mut inline_ctx = *ctx;
    inline_ctx.inline = true;
    expr::format_expr(&args[0], &inline_ctx, false)
}

/// `[param name]`: equivalent to writing `?name` directly — a deferred
/// reference resolved against the call's `params` map.
fn render_param(name: &str, args: &[Node], _ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    let binding = args[0]
        .as_name()
        .filter(|n| n.kind() == NameKind::Ident)
        .map(|n| n.as_str())
        .ok_or_else(|| Error::bad_shape("`param` requires a plain name naming the binding"))?;
    Ok(Fragment::placeholder("?", Param::Named(binding.to_string())))
}

/// `[lift x]`: lowers the literal `x` into a single parameter that the
/// final unwrap pass never unpacks, even if it turns out to be a
/// collection.
fn render_lift(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    let value = ParamValue::from_leaf(&args[0])
        .ok_or_else(|| Error::bad_shape("`lift` requires a literal leaf value"))?;
    if ctx.inline {
        Ok(Fragment::text(value::inline_literal(&value)))
    } else {
        Ok(Fragment::placeholder("?", Param::Lifted(value)))
    }
}

/// `[nest e]`: renders `e` as if an ancestor demanded parenthesization.
fn render_nest(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    expr::format_expr(&args[0], ctx, true)
}

/// `[not e]`: `NOT e`.
fn render_not(name: &str, args: &[Node], ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    let mut inner = expr::format_expr(&args[0], ctx, true)?;
    inner.sql = format!("NOT {}", inner.sql);
    Ok(wrap_if_nested(inner, nested))
}

/// `[cast e type]`: `CAST(e AS TYPE)`.
fn render_cast(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 2)?;
    let mut out = expr::format_expr(&args[0], ctx, false)?;
    let type_text = match &args[1] {
        Node::Name(n) => ident::sql_kw(n.as_str()),
        Node::Str(s) => s.clone(),
        other => {
            return Err(Error::bad_shape(format!(
                "cast type must be a name or string, got {other:?}"
            )))
        }
    };
    out.sql = format!("CAST({} AS {})", out.sql, type_text);
    Ok(out)
}

/// `[between x a b]`: `x BETWEEN a AND b`.
fn render_between(name: &str, args: &[Node], ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 3)?;
    let mut out = expr::format_expr(&args[0], ctx, true)?;
    out.sql.push_str(" BETWEEN ");
    out.push(expr::format_expr(&args[1], ctx, true)?);
    out.sql.push_str(" AND ");
    out.push(expr::format_expr(&args[2], ctx, true)?);
    Ok(wrap_if_nested(out, nested))
}

/// `[case c1 v1 c2 v2 ... else d]`: a `WHEN`/`THEN` chain, with a
/// trailing `else` pair (literally the keyword name `else`) becoming
/// the final `ELSE`.
fn render_case(_name: &str, args: &[Node], ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    if args.len() % 2 != 0 {
        return Err(Error::bad_shape(format!(
            "`case` requires condition/value pairs (with an optional trailing `else` pair), got {} args",
            args.len()
        )));
    }
    let mut out = Fragment::text("CASE".to_string());
    let mut i = 0;
    while i + 1 < args.len() {
        let cond = &args[i];
        let branch_value = &args[i + 1];
        if matches!(cond, Node::Name(n) if n.as_str() == "else") {
            out.sql.push_str(" ELSE ");
            out.push(expr::format_expr(branch_value, ctx, false)?);
            i += 2;
            continue;
        }
        out.sql.push_str(" WHEN ");
        out.push(expr::format_expr(cond, ctx, false)?);
        out.sql.push_str(" THEN ");
        out.push(expr::format_expr(branch_value, ctx, false)?);
        i += 2;
    }
    out.sql.push_str(" END");
    Ok(wrap_if_nested(out, nested))
}

/// `[interval n units]`: `INTERVAL n UNITS`.
fn render_interval(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 2)?;
    let mut out = expr::format_expr(&args[0], ctx, false)?;
    let units = args[1]
        .as_name()
        .ok_or_else(|| Error::bad_shape("interval units must be a keyword name"))?;
    out.sql = format!("INTERVAL {} {}", out.sql, ident::sql_kw(units.as_str()));
    Ok(out)
}

/// `[array [e1 ...]]`: `ARRAY[e1, ...]`.
fn render_array(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    let items = args[0]
        .as_list()
        .ok_or_else(|| Error::bad_shape("`array` requires a single sequence argument"))?;
    let mut out = Fragment::text("ARRAY[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.push(expr::format_expr(item, ctx, false)?);
    }
    out.sql.push(']');
    Ok(out)
}

/// `[composite e1 ...]`: `(e1, ...)`, a tuple-valued row constructor.
fn render_composite(_name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    let mut out = Fragment::text("(");
    for (i, item) in args.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.push(expr::format_expr(item, ctx, false)?);
    }
    out.sql.push(')');
    Ok(out)
}

/// `[raw s]`: emits `s` verbatim when it's a string; when it's a
/// sequence, recursively formats and concatenates its elements with no
/// separator, so the caller can splice arbitrary text between ordinary
/// sub-expressions.
fn render_raw(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    match &args[0] {
        Node::Str(s) => Ok(Fragment::text(s.clone())),
        Node::List(items) => {
            let mut out = Fragment::empty();
            for item in items {
                out.push(expr::format_expr(item, ctx, false)?);
            }
            Ok(out)
        }
        other => expr::format_expr(other, ctx, false),
    }
}

/// `[over [expr window alias?] ...]`: one or more window-function
/// applications, `expr OVER window [AS alias]`, comma-joined. `window`
/// is either a bare name referencing a `WINDOW`-clause definition, or a
/// nested mapping of `partition-by`/`order-by` rendered inline in
/// parens.
fn render_over(_name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    let mut out = Fragment::empty();
    for (i, entry) in args.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        let items = entry
            .as_list()
            .ok_or_else(|| Error::bad_shape("`over` entry must be [expr, window, alias?]"))?;
        if items.len() < 2 || items.len() > 3 {
            return Err(Error::bad_shape("`over` entry must have 2 or 3 elements"));
        }
        out.push(expr::format_expr(&items[0], ctx, false)?);
        out.sql.push_str(" OVER ");
        out.push(expr::format_expr(&items[1], ctx, true)?);
        if let Some(alias) = items.get(2) {
            out.sql.push_str(" AS ");
            out.sql.push_str(&ident::format_entity(alias, ctx, true)?);
        }
    }
    Ok(out)
}

/// `[distinct e]`: `DISTINCT e`.
fn render_distinct(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    let mut out = expr::format_expr(&args[0], ctx, false)?;
    out.sql = format!("DISTINCT {}", out.sql);
    Ok(out)
}

/// `[exists {subquery}]`: `EXISTS (subquery)`.
fn render_exists(name: &str, args: &[Node], ctx: &Context, _nested: bool) -> Result<Fragment, Error> {
    require_arity(name, args, 1)?;
    let inner = expr::format_expr(&args[0], ctx, true)?;
    Ok(Fragment {
        sql: format!("EXISTS {}", inner.sql),
        params: inner.params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsql_core::{Dialect, Params, Quoting};

    fn ctx<'a>(regs: &'a Registries, params: &'a Params) -> Context<'a> {
        Context {
            dialect: Dialect::Ansi,
            quoting: Quoting::UnusualOnly,
            inline: false,
            numbered: false,
            pretty: false,
            params,
            registries: regs,
        }
    }

    #[test]
    fn inline_forces_literal_rendering_regardless_of_call_mode() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let f = render_inline("inline", &[Node::from(42i64)], &c, false).unwrap();
        assert_eq!(f.sql, "42");
        assert!(f.params.is_empty());
    }

    #[test]
    fn param_emits_named_placeholder() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let f = render_param("param", &[Node::ident("limit")], &c, false).unwrap();
        assert_eq!(f.sql, "?");
        assert!(matches!(&f.params[0], Param::Named(n) if n == "limit"));
    }

    #[test]
    fn lift_never_unpacks_even_when_given_a_collection() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let list = Node::List(vec![Node::from(1i64), Node::from(2i64)]);
        let f = render_lift("lift", &[list], &c, false).unwrap();
        assert_eq!(f.sql, "?");
        assert!(matches!(&f.params[0], Param::Lifted(_)));
    }

    #[test]
    fn not_wraps_in_parens_when_nested() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let f = render_not("not", &[Node::Bool(true)], &c, true).unwrap();
        assert_eq!(f.sql, "(NOT ?)");
    }

    #[test]
    fn between_renders_with_and_keyword() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let args = vec![Node::ident("age"), Node::from(18i64), Node::from(65i64)];
        let f = render_between("between", &args, &c, false).unwrap();
        assert_eq!(f.sql, "age BETWEEN ? AND ?");
    }

    #[test]
    fn case_with_else_branch() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let args = vec![
            Node::List(vec![Node::ident("="), Node::ident("a"), Node::from(1i64)]),
            Node::from(1i64),
            Node::ident("else"),
            Node::from(0i64),
        ];
        let f = render_case("case", &args, &c, false).unwrap();
        assert_eq!(f.sql, "CASE WHEN a = ? THEN ? ELSE ? END");
    }

    #[test]
    fn case_with_a_dangling_condition_is_rejected() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let args = vec![
            Node::List(vec![Node::ident("="), Node::ident("a"), Node::from(1i64)]),
            Node::from(1i64),
            Node::ident("b"),
        ];
        let err = render_case("case", &args, &c, false).unwrap_err();
        assert_eq!(err.kind, dsql_core::ErrorKind::BadShape);
    }

    #[test]
    fn array_renders_bracket_syntax() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let seq = Node::List(vec![Node::from(1i64), Node::from(2i64)]);
        let f = render_array("array", &[seq], &c, false).unwrap();
        assert_eq!(f.sql, "ARRAY[?, ?]");
    }

    #[test]
    fn exists_wraps_subquery_in_parens() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let stmt = dsql_core::Statement::new()
            .clause("select", Node::List(vec![Node::ident("*")]))
            .clause("from", Node::List(vec![Node::ident("t")]));
        let f = render_exists("exists", &[Node::Map(stmt)], &c, false).unwrap();
        assert_eq!(f.sql, "EXISTS (SELECT * FROM t)");
    }
}
