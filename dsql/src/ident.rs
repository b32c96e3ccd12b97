//! Converts symbolic names into quoted, qualified SQL identifiers.

use dsql_core::{Context, Error, Fragment, Name, Node};

/// Upper-cases an ASCII identifier using a locale-independent mapping
/// (never the platform default, which can turn a lone `i` into `İ`
/// under a Turkish locale) and turns every `-` into a space, so
/// `sql_kw("on-conflict")` reads `ON CONFLICT` and `sql_kw("nulls-last")`
/// reads `NULLS LAST`.
pub fn sql_kw(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '-' => ' ',
            'a'..='z' => (c as u8 - b'a' + b'A') as char,
            other => other,
        })
        .collect()
}

fn quote_component(local: &str, ctx: &Context) -> String {
    if local == "*" {
        return local.to_string();
    }
    if ctx.quoting.should_quote(local) {
        let (open, close) = ctx.dialect.quote_chars();
        format!("{open}{local}{close}")
    } else {
        local.replace('-', "_")
    }
}

/// A raw string is treated verbatim, quoted when quoting is enabled and
/// emitted as-is otherwise — unlike a symbolic name's local/qualifier
/// components, it never gets the `-` to `_` substitution, since that
/// step only applies to the symbolic-name path.
fn quote_raw(raw: &str, ctx: &Context) -> String {
    if raw == "*" {
        return raw.to_string();
    }
    if ctx.quoting.should_quote(raw) {
        let (open, close) = ctx.dialect.quote_chars();
        format!("{open}{raw}{close}")
    } else {
        raw.to_string()
    }
}

/// Renders a single symbolic name (or raw string) as a qualified,
/// quoted SQL identifier. `drop_ns` suppresses the namespace qualifier
/// even when the name carries one.
pub fn format_entity(node: &Node, ctx: &Context, drop_ns: bool) -> Result<String, Error> {
    match node {
        Node::Str(raw) => Ok(quote_raw(raw, ctx)),
        Node::Name(name) => format_name(name, ctx, drop_ns),
        other => Err(Error::bad_shape(format!(
            "expected an identifier, got {other:?}"
        ))),
    }
}

fn format_name(name: &Name, ctx: &Context, drop_ns: bool) -> Result<String, Error> {
    let (qualifier, local) = name.qualifier_and_local();
    let local = quote_component(local, ctx);
    match qualifier {
        Some(q) if !drop_ns => {
            let q = quote_component(q, ctx);
            Ok(format!("{q}.{local}"))
        }
        _ => Ok(local),
    }
}

/// Renders a select-list / from-list / window-list element: either a
/// bare entity, or a two-element `[entity, alias]` pair emitting
/// `entity AS alias` (or `entity alias` under a dialect that suppresses
/// `AS`). `render_entity` renders the (possibly non-identifier, e.g.
/// subquery) entity position, and may itself carry parameters; callers
/// pass in the expression formatter so this module doesn't need to
/// depend on it directly.
pub fn format_entity_alias(
    node: &Node,
    ctx: &Context,
    render_entity: impl Fn(&Node, &Context) -> Result<Fragment, Error>,
) -> Result<Fragment, Error> {
    match node {
        Node::List(items) if items.len() == 2 => {
            let mut entity = render_entity(&items[0], ctx)?;
            let alias = format_entity(&items[1], ctx, true)?;
            if ctx.dialect.emits_as_keyword() {
                entity.sql = format!("{} AS {}", entity.sql, alias);
            } else {
                entity.sql = format!("{} {}", entity.sql, alias);
            }
            Ok(entity)
        }
        Node::Map(_) => Err(Error::bad_shape(
            "a subquery used without an alias needs an explicit [subquery, alias] pair",
        )),
        other => render_entity(other, ctx),
    }
}
