//! Renders a whole statement mapping by walking the active clause
//! order and dispatching each present clause to its registered
//! renderer.

use dsql_core::{Context, Error, Fragment, Statement};

/// Renders `stmt`'s clauses in the context's active order, joining them
/// with a space (or a newline, under `pretty`). `nested` wraps the
/// whole result in parentheses, for a statement used as a subquery in
/// expression position.
pub fn format_statement(stmt: &Statement, ctx: &Context, nested: bool) -> Result<Fragment, Error> {
    for key in stmt.keys() {
        if ctx.registries.clause_renderer(key).is_none() {
            return Err(Error::unknown_clause(key));
        }
    }

    let order = ctx.clause_order();
    let mut parts = Vec::new();
    for name in &order {
        if let Some(value) = stmt.get(name) {
            let renderer = ctx
                .registries
                .clause_renderer(name)
                .expect("every clause in the active order has a registered renderer or was rejected above");
            parts.push(renderer(name, value, ctx)?);
        }
    }

    let sep = if ctx.pretty { "\n" } else { " " };
    let mut out = Fragment::join(parts, sep);
    if nested {
        out.sql = format!("({})", out.sql);
    }
    Ok(out)
}
