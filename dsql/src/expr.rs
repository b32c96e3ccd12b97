//! Recursively renders expression trees: identifiers, literals, nested
//! statements, infix operator applications, `IN`, named parameters,
//! function calls, and dispatch to special syntax.

use dsql_core::{Context, Error, Fragment, Name, NameKind, Node, Param};

use crate::{ident, statement, value};

/// Renders a single expression node. `nested` means an ancestor demands
/// parenthesization around the result if it is itself a compound
/// expression (an infix application or an `IN`).
pub fn format_expr(node: &Node, ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    match node {
        Node::Null => Ok(value::encode_null(ctx)),
        Node::Bool(b) => Ok(value::encode_bool(*b, ctx)),
        Node::Number(text) => Ok(value::encode_number(text, ctx)),
        Node::Str(text) => Ok(value::encode_str(text, ctx)),
        Node::Name(name) => format_name(name, ctx),
        Node::Map(stmt) => statement::format_statement(stmt, ctx, true),
        Node::List(items) => format_list(node, items, ctx, nested),
    }
}

/// Renders a sequence of expressions independently, for callers that
/// join the results themselves (the public `format_expr_list` API).
pub fn format_expr_list(nodes: &[Node], ctx: &Context) -> Result<Vec<Fragment>, Error> {
    nodes.iter().map(|n| format_expr(n, ctx, false)).collect()
}

fn format_name(name: &Name, ctx: &Context) -> Result<Fragment, Error> {
    match name.kind() {
        NameKind::Named => {
            let binding = name.named_ref().expect("Named kind always has a binding name");
            Ok(Fragment::placeholder("?", Param::Named(binding.to_string())))
        }
        NameKind::Function => {
            let (head, args) = name.function_parts().expect("Function kind always splits");
            let sql = format!("{}({})", ident::sql_kw(head), args.join(", "));
            Ok(Fragment::text(sql))
        }
        NameKind::KeywordToken => {
            let words = name.keyword_words().expect("KeywordToken kind always has words");
            let sql = words.iter().map(|w| ident::sql_kw(w)).collect::<Vec<_>>().join(" ");
            Ok(Fragment::text(sql))
        }
        NameKind::Ident => {
            let as_node = Node::Name(name.clone());
            Ok(Fragment::text(ident::format_entity(&as_node, ctx, false)?))
        }
    }
}

fn format_list(whole: &Node, items: &[Node], ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    let head_name = match items.first() {
        Some(Node::Name(n)) if n.kind() == NameKind::Ident => Some(n),
        _ => None,
    };

    let head_name = match head_name {
        Some(n) => n,
        None => return format_tuple(items, ctx),
    };

    let args = &items[1..];
    let canon = ctx.registries.ops().canonicalize(head_name.as_str()).to_string();

    if ctx.registries.ops().is_infix(&canon) {
        return format_infix(&canon, args, ctx, nested);
    }
    if canon == "in" || canon == "not-in" {
        return format_in(canon == "not-in", args, ctx, nested);
    }
    if let Some(renderer) = ctx.registries.special_syntax(&canon) {
        return renderer(&canon, args, ctx, nested);
    }
    format_call(whole, head_name, args, ctx)
}

fn format_tuple(items: &[Node], ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text("(");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.push(format_expr(item, ctx, false)?);
    }
    out.sql.push(')');
    Ok(out)
}

fn format_infix(canon: &str, args: &[Node], ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    let keyword = ident::sql_kw(canon);
    if ctx.registries.ops().is_variadic(canon) {
        let ignore_nil = ctx.registries.ops().ignores_nil(canon);
        let mut operands = Vec::with_capacity(args.len());
        for arg in args {
            if ignore_nil && matches!(arg, Node::Null) {
                continue;
            }
            operands.push(format_expr(arg, ctx, true)?);
        }
        let mut out = Fragment::empty();
        for (i, operand) in operands.into_iter().enumerate() {
            if i > 0 {
                out.sql.push(' ');
                out.sql.push_str(&keyword);
                out.sql.push(' ');
            }
            out.push(operand);
        }
        return Ok(wrap_if_nested(out, nested));
    }

    if args.len() != 2 {
        return Err(Error::bad_shape(format!(
            "operator `{}` requires exactly two operands, got {}",
            canon,
            args.len()
        )));
    }
    let (lhs, rhs) = (&args[0], &args[1]);
    if (canon == "=" || canon == "<>") && (matches!(lhs, Node::Null) || matches!(rhs, Node::Null)) {
        let (operand, is_null_rhs) = if matches!(rhs, Node::Null) {
            (lhs, true)
        } else {
            (rhs, false)
        };
        let _ = is_null_rhs;
        let mut out = format_expr(operand, ctx, true)?;
        out.sql.push_str(if canon == "=" { " IS NULL" } else { " IS NOT NULL" });
        return Ok(wrap_if_nested(out, nested));
    }

    let mut out = format_expr(lhs, ctx, true)?;
    out.sql.push(' ');
    out.sql.push_str(&keyword);
    out.sql.push(' ');
    out.push(format_expr(rhs, ctx, true)?);
    Ok(wrap_if_nested(out, nested))
}

fn wrap_if_nested(mut fragment: Fragment, nested: bool) -> Fragment {
    if nested {
        fragment.sql = format!("({})", fragment.sql);
    }
    fragment
}

fn format_in(is_not: bool, args: &[Node], ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    if args.len() != 2 {
        return Err(Error::bad_shape(format!(
            "`in` requires exactly two operands, got {}",
            args.len()
        )));
    }
    let mut out = format_expr(&args[0], ctx, true)?;
    out.sql.push_str(if is_not { " NOT IN " } else { " IN " });
    out.push(format_expr(&args[1], ctx, true)?);
    Ok(wrap_if_nested(out, nested))
}

fn format_call(whole: &Node, head: &Name, args: &[Node], ctx: &Context) -> Result<Fragment, Error> {
    let _ = whole;
    let head_node = Node::Name(head.clone());
    let head_sql = ident::format_entity(&head_node, ctx, false)?;

    if args.len() == 1 {
        if let Node::Map(stmt) = &args[0] {
            let sub = statement::format_statement(stmt, ctx, true)?;
            return Ok(Fragment {
                sql: format!("{} {}", head_sql, sub.sql),
                params: sub.params,
            });
        }
    }

    let (args_sql, args_params) = render_call_args(args, ctx)?;
    Ok(Fragment {
        sql: format!("{}({})", head_sql, args_sql),
        params: args_params,
    })
}

/// Renders a function's argument list, honoring inline `!WORD` keyword
/// tokens: a keyword token contributes no argument of its own but
/// supplies the separator text used before the *next* real argument,
/// e.g. `[substring col !from 3 !for 4]` renders `SUBSTRING(col FROM 3
/// FOR 4)`.
fn render_call_args(args: &[Node], ctx: &Context) -> Result<(String, Vec<Param>), Error> {
    let mut sql = String::new();
    let mut params = Vec::new();
    let mut pending_sep: Option<String> = None;

    for arg in args {
        if let Node::Name(name) = arg {
            if name.kind() == NameKind::KeywordToken {
                let words = name.keyword_words().expect("KeywordToken kind always has words");
                let text = words.iter().map(|w| ident::sql_kw(w)).collect::<Vec<_>>().join(" ");
                pending_sep = Some(format!(" {} ", text));
                continue;
            }
        }
        match pending_sep.take() {
            Some(sep) => {
                if sql.is_empty() {
                    sql.push_str(sep.trim_start());
                } else {
                    sql.push_str(&sep);
                }
            }
            None if !sql.is_empty() => sql.push_str(", "),
            None => {}
        }
        let frag = format_expr(arg, ctx, false)?;
        sql.push_str(&frag.sql);
        params.extend(frag.params);
    }
    Ok((sql, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsql_core::{Dialect, Params, Quoting, Registries};

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
    fn equality_with_null_becomes_is_null() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![Node::ident("="), Node::ident("id"), Node::Null]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "id IS NULL");
        assert!(f.params.is_empty());
    }

    #[test]
    fn inequality_with_null_becomes_is_not_null() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![Node::ident("<>"), Node::ident("id"), Node::Null]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "id IS NOT NULL");
    }

    #[test]
    fn literal_list_renders_as_a_parenthesized_tuple() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![1i64.into(), 2i64.into(), 3i64.into(), 4i64.into()]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "(?, ?, ?, ?)");
        assert_eq!(f.params.len(), 4);
    }

    #[test]
    fn in_with_a_literal_collection() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![
            Node::ident("in"),
            Node::ident("id"),
            Node::List(vec![1i64.into(), 2i64.into(), 3i64.into(), 4i64.into()]),
        ]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "id IN (?, ?, ?, ?)");
        assert_eq!(f.params.len(), 4);
    }

    #[test]
    fn in_with_an_empty_collection_renders_an_empty_parenthesized_list() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![Node::ident("in"), Node::ident("id"), Node::List(vec![])]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "id IN ()");
        assert!(f.params.is_empty());
    }

    #[test]
    fn not_in_renders_the_negated_keyword() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![
            Node::ident("not-in"),
            Node::ident("id"),
            Node::List(vec![1i64.into(), 2i64.into()]),
        ]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "id NOT IN (?, ?)");
    }

    #[test]
    fn variadic_and_drops_null_operands_and_joins_with_keyword() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![
            Node::ident("and"),
            Node::List(vec![Node::ident("="), Node::ident("a"), 1i64.into()]),
            Node::Null,
            Node::List(vec![Node::ident("="), Node::ident("b"), 2i64.into()]),
        ]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "(a = ?) AND (b = ?)");
    }

    #[test]
    fn named_parameter_reference_emits_a_deferred_carrier() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::named("x");
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "?");
        assert!(matches!(&f.params[0], Param::Named(n) if n == "x"));
    }

    #[test]
    fn function_shorthand_renders_uppercase_unquoted_args() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::function("f.a.b");
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "F(a, b)");
    }

    #[test]
    fn function_call_with_keyword_tokens_renders_substring_from_for() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let node = Node::List(vec![
            Node::ident("substring"),
            Node::ident("col"),
            Node::keyword_token("from"),
            3i64.into(),
            Node::keyword_token("for"),
            4i64.into(),
        ]);
        let f = format_expr(&node, &c, true).unwrap();
        assert_eq!(f.sql, "substring(col FROM ? FOR ?)");
    }

    #[test]
    fn single_mapping_argument_skips_the_outer_parens() {
        let regs = Registries::default();
        let params = Params::new();
        let c = ctx(&regs, &params);
        let stmt = dsql_core::Statement::new()
            .clause("select", Node::List(vec![Node::ident("*")]))
            .clause("from", Node::List(vec![Node::ident("t")]));
        let node = Node::List(vec![Node::ident("json-agg"), Node::Map(stmt)]);
        let f = format_expr(&node, &c, false).unwrap();
        assert_eq!(f.sql, "json_agg (SELECT * FROM t)");
    }
}
