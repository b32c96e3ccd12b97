//! Encodes a leaf value as either a parameter placeholder or an inlined
//! SQL literal.

use dsql_core::{Context, Fragment, Name, Param, ParamValue};

use crate::ident::sql_kw;

fn next_placeholder(ctx: &Context) -> &'static str {
    let _ = ctx;
    "?"
}

/// Encodes a null.
pub fn encode_null(ctx: &Context) -> Fragment {
    if ctx.inline {
        Fragment::text("NULL")
    } else {
        Fragment::placeholder(next_placeholder(ctx), Param::Value(ParamValue::Null))
    }
}

/// Encodes a boolean.
pub fn encode_bool(value: bool, ctx: &Context) -> Fragment {
    if ctx.inline {
        Fragment::text(if value { "TRUE" } else { "FALSE" })
    } else {
        Fragment::placeholder(next_placeholder(ctx), Param::Value(ParamValue::Bool(value)))
    }
}

/// Encodes a number, keeping its canonical decimal text in either mode.
pub fn encode_number(text: &str, ctx: &Context) -> Fragment {
    if ctx.inline {
        Fragment::text(text)
    } else {
        Fragment::placeholder(
            next_placeholder(ctx),
            Param::Value(ParamValue::Number(text.to_string())),
        )
    }
}

/// Encodes a string, single-quoting and doubling embedded quotes when
/// inlined.
pub fn encode_str(value: &str, ctx: &Context) -> Fragment {
    if ctx.inline {
        Fragment::text(format!("'{}'", value.replace('\'', "''")))
    } else {
        Fragment::placeholder(
            next_placeholder(ctx),
            Param::Value(ParamValue::Str(value.to_string())),
        )
    }
}

/// Literalizes an already-resolved [`ParamValue`] the same way an inline
/// leaf would render, for special forms (`lift`) that need inline text
/// without going through a fresh `Node`.
pub fn inline_literal(value: &ParamValue) -> String {
    match value {
        ParamValue::Null => "NULL".to_string(),
        ParamValue::Bool(b) => if *b { "TRUE".to_string() } else { "FALSE".to_string() },
        ParamValue::Number(n) => n.clone(),
        ParamValue::Str(s) => format!("'{}'", s.replace('\'', "''")),
        ParamValue::Collection(items) => format!(
            "({})",
            items.iter().map(inline_literal).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// Encodes a symbolic name used as a literal SQL keyword token (the
/// `inline`-mode rendering of a bare name outside identifier position,
/// e.g. a direction keyword or unit word): upper-cased with `-` turned
/// into a space, matching [`sql_kw`].
pub fn encode_keyword(name: &Name) -> String {
    sql_kw(name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsql_core::{Dialect, Params, Quoting, Registries};

    fn make<'a>(regs: &'a Registries, params: &'a Params, inline: bool) -> Context<'a> {
        Context {
            dialect: Dialect::Ansi,
            quoting: Quoting::UnusualOnly,
            inline,
            numbered: false,
            pretty: false,
            params,
            registries: regs,
        }
    }

    #[test]
    fn inline_string_doubles_embedded_quotes() {
        let regs = Registries::default();
        let params = Params::new();
        let ctx = make(&regs, &params, true);
        assert_eq!(encode_str("it's", &ctx).sql, "'it''s'");
    }

    #[test]
    fn non_inline_values_carry_one_parameter_each() {
        let regs = Registries::default();
        let params = Params::new();
        let ctx = make(&regs, &params, false);
        let f = encode_number("42", &ctx);
        assert_eq!(f.sql, "?");
        assert_eq!(f.params.len(), 1);
    }

    #[test]
    fn inline_bool_renders_upper_case_keyword() {
        let regs = Registries::default();
        let params = Params::new();
        let ctx = make(&regs, &params, true);
        assert_eq!(encode_bool(true, &ctx).sql, "TRUE");
        assert_eq!(encode_bool(false, &ctx).sql, "FALSE");
    }
}
