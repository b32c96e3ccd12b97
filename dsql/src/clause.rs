//! The built-in clause renderer set: one renderer per clause name in
//! [`dsql_core::registry::BASE_CLAUSE_ORDER`].

use std::sync::Arc;

use dsql_core::{ClauseRenderer, Context, Error, Fragment, Node, Registries};

use crate::{expr, ident, statement};

/// Registers every built-in clause renderer into a fresh [`Registries`].
pub fn register_defaults(registries: &mut Registries) {
    let entity_list: &[&str] = &["delete", "from", "window", "cross-join", "returning"];
    for &name in entity_list {
        register(registries, name, render_entity_list);
    }

    register(registries, "select", render_select_list);
    register(registries, "select-distinct", render_select_list);
    register(registries, "select-distinct-on", render_select_distinct_on);
    register(registries, "insert-into", render_insert_into);
    register(registries, "update", render_update);
    register(registries, "set", render_set);
    register(registries, "values", render_values);

    for &name in &[
        "join", "left-join", "right-join", "inner-join", "outer-join", "full-join",
    ] {
        register(registries, name, render_join);
    }

    register(registries, "where", render_expr_clause);
    register(registries, "having", render_expr_clause);
    register(registries, "limit", render_expr_clause);
    register(registries, "offset", render_expr_clause);

    register(registries, "group-by", render_expr_list_clause);
    register(registries, "partition-by", render_expr_list_clause);
    register(registries, "order-by", render_order_by);

    register(registries, "for", render_for);

    for &name in &["union", "union-all", "intersect", "except", "except-all"] {
        register(registries, name, render_set_op);
    }

    register(registries, "with", render_with);
    register(registries, "with-recursive", render_with);

    register(registries, "on-conflict", render_on_conflict);
    register(registries, "do-update-set", render_do_update_set);

    register(registries, "create-table", render_simple_keyword_entity);
    register(registries, "drop-table", render_drop_table);
    register(registries, "rename-table", render_rename_table);
    register(registries, "alter-table", render_alter_table);
    register(registries, "create-view", render_create_view);
    register(registries, "with-columns", render_with_columns);

    register(registries, "facet", render_expr_list_clause);
    register(registries, "since", render_expr_clause);
    register(registries, "until", render_expr_clause);
    register(registries, "compare-with", render_expr_clause);
    register(registries, "timeseries", render_timeseries);
}

fn register(registries: &mut Registries, name: &str, f: fn(&str, &Node, &Context) -> Result<Fragment, Error>) {
    let renderer: ClauseRenderer = Arc::new(f);
    registries
        .register_clause(name, renderer, None)
        .expect("registering a built-in clause name never fails");
}

fn as_list<'a>(node: &'a Node, ctx_name: &str) -> Result<&'a [Node], Error> {
    node.as_list()
        .ok_or_else(|| Error::bad_shape(format!("`{}` requires a sequence value", ctx_name)))
}

/// Renders a comma-separated list of entities (bare, or `[entity,
/// alias]` pairs), reusing [`ident::format_entity_alias`] with
/// [`expr::format_expr`] as the entity renderer.
fn render_joined_entities(items: &[Node], ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::empty();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.push(ident::format_entity_alias(item, ctx, |n, c| {
            expr::format_expr(n, c, false)
        })?);
    }
    Ok(out)
}

/// `delete`, `from`, `window`, `cross-join`, `returning`: a keyword
/// followed by a comma-separated entity list.
fn render_entity_list(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    out.push(render_joined_entities(items, ctx)?);
    Ok(out)
}

/// Renders one `select`/`select-distinct` entry, disambiguating the two
/// shapes a two-element `Node::List` entry can take: `[:a :b]` is an
/// alias pair (`a AS b`), while a one-element `[[:a :b]]` wraps an
/// entity that is itself a list — most commonly an unaliased function
/// call (`A(b)`) — so it's unwrapped to its sole element and rendered
/// with no alias, rather than being misread as a two-element pair one
/// list-nesting level up.
fn render_select_entity(item: &Node, ctx: &Context) -> Result<Fragment, Error> {
    if let Some([inner]) = item.as_list() {
        return expr::format_expr(inner, ctx, false);
    }
    ident::format_entity_alias(item, ctx, |n, c| expr::format_expr(n, c, false))
}

fn render_joined_select_entities(items: &[Node], ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::empty();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.push(render_select_entity(item, ctx)?);
    }
    Ok(out)
}

/// `select`, `select-distinct`: a keyword followed by a comma-separated
/// entity list, using [`render_select_entity`]'s one-element-list
/// unwrap rather than the plain entity-list handling.
fn render_select_list(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    out.push(render_joined_select_entities(items, ctx)?);
    Ok(out)
}

/// `select-distinct-on`: value is `[[col, ...], entity, ...]` — a
/// leading column sublist, then the normal select entity list.
fn render_select_distinct_on(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let (cols, rest) = items
        .split_first()
        .ok_or_else(|| Error::bad_shape("select-distinct-on requires a leading column list"))?;
    let cols = as_list(cols, "select-distinct-on")?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push_str(" (");
    out.push(render_joined_entities(cols, ctx)?);
    out.sql.push_str(") ");
    out.push(render_joined_select_entities(rest, ctx)?);
    Ok(out)
}

/// `insert-into`: the value is one of four shapes —
/// - `table` — bare target, no column list
/// - `[table, [col, ...]]` — target with an explicit column list
/// - `[table, {subquery}]` — target populated from a `SELECT`
/// - `[[table, [col, ...]], {subquery}]` — both at once
fn render_insert_into(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');

    let (target, subquery) = match value.as_list() {
        Some([first, second]) if second.as_map().is_some() => (first, Some(second)),
        _ => (value, None),
    };

    let (table, columns) = match target.as_list() {
        Some([table, cols]) if cols.as_list().is_some() => (table, Some(cols.as_list().unwrap())),
        _ => (target, None),
    };

    out.sql.push_str(&ident::format_entity(table, ctx, false)?);
    if let Some(cols) = columns {
        out.sql.push_str(" (");
        out.push(render_joined_entities(cols, ctx)?);
        out.sql.push(')');
    }
    if let Some(sub) = subquery {
        out.sql.push(' ');
        out.push(expr::format_expr(sub, ctx, false)?);
    }
    Ok(out)
}

/// `update`: a single table entity, optionally aliased.
fn render_update(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    out.push(ident::format_entity_alias(value, ctx, |n, c| {
        expr::format_expr(n, c, false)
    })?);
    Ok(out)
}

/// `set`: a mapping from column to expression, `a = 1, b = 2`.
fn render_set(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let stmt = value
        .as_map()
        .ok_or_else(|| Error::bad_shape("`set` requires a mapping from column to expression"))?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    for (i, (col, expr_node)) in stmt.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.sql.push_str(&ident::format_entity(&Node::ident(col), ctx, false)?);
        out.sql.push_str(" = ");
        out.push(expr::format_expr(expr_node, ctx, false)?);
    }
    Ok(out)
}

/// `values`: either a sequence of row tuples (padded to the widest row
/// with `NULL`), or a sequence of row mappings (columns are the union
/// of every row's keys in first-seen order; a row missing a key gets
/// `NULL` in that position). Either way, renders the leading `(cols)`
/// list (for the mapping shape only — tuple rows carry no column names)
/// followed by the `VALUES (...), (...)` body.
fn render_values(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let rows = as_list(value, name)?;

    if rows.iter().all(|r| r.as_map().is_some()) && !rows.is_empty() {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            let stmt = row.as_map().unwrap();
            for key in stmt.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }
        let mut out = Fragment::text("(");
        out.push(render_joined_entities(
            &columns.iter().map(|c| Node::ident(c.clone())).collect::<Vec<_>>(),
            ctx,
        )?);
        out.sql.push_str(") ");
        out.sql.push_str(&ident::sql_kw(name));
        out.sql.push(' ');
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                out.sql.push_str(", ");
            }
            let stmt = row.as_map().unwrap();
            out.sql.push('(');
            for (j, col) in columns.iter().enumerate() {
                if j > 0 {
                    out.sql.push_str(", ");
                }
                match stmt.get(col) {
                    Some(v) => out.push(expr::format_expr(v, ctx, false)?),
                    None => out.push(expr::format_expr(&Node::Null, ctx, false)?),
                }
            }
            out.sql.push(')');
        }
        return Ok(out);
    }

    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');

    let row_lists: Vec<&[Node]> = rows
        .iter()
        .map(|r| as_list(r, name))
        .collect::<Result<_, _>>()?;
    let width = row_lists.iter().map(|r| r.len()).max().unwrap_or(0);
    for (i, row) in row_lists.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.sql.push('(');
        for j in 0..width {
            if j > 0 {
                out.sql.push_str(", ");
            }
            match row.get(j) {
                Some(v) => out.push(expr::format_expr(v, ctx, false)?),
                None => out.push(expr::format_expr(&Node::Null, ctx, false)?),
            }
        }
        out.sql.push(')');
    }
    Ok(out)
}

/// `join`/`left-join`/`right-join`/`inner-join`/`outer-join`/
/// `full-join`: a sequence of `[target, condition]` pairs, where
/// `condition` is `nil` (no condition), `[using, col, ...]`, or a plain
/// expression rendered after `ON`.
fn render_join(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let pairs = as_list(value, name)?;
    let keyword = ident::sql_kw(if name == "join" { "inner-join" } else { name });
    let mut out = Fragment::empty();
    for (i, pair) in pairs.iter().enumerate() {
        if i > 0 {
            out.sql.push(' ');
        }
        let items = as_list(pair, name)?;
        let (target, condition) = match items {
            [t, c] => (t, c),
            _ => return Err(Error::bad_shape("join entry requires exactly [target, condition]")),
        };
        out.sql.push_str(&keyword);
        out.sql.push(' ');
        out.push(ident::format_entity_alias(target, ctx, |n, c| {
            expr::format_expr(n, c, false)
        })?);
        match condition {
            Node::Null => {}
            Node::List(cond_items) => {
                let is_using = matches!(
                    cond_items.first(),
                    Some(Node::Name(n)) if n.as_str() == "using"
                );
                if is_using {
                    out.sql.push_str(" USING (");
                    out.push(render_joined_entities(&cond_items[1..], ctx)?);
                    out.sql.push(')');
                } else {
                    out.sql.push_str(" ON ");
                    out.push(expr::format_expr(condition, ctx, false)?);
                }
            }
            other => {
                out.sql.push_str(" ON ");
                out.push(expr::format_expr(other, ctx, false)?);
            }
        }
    }
    Ok(out)
}

/// `where`/`having`/`limit`/`offset`: a keyword followed by a single
/// expression.
fn render_expr_clause(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    out.push(expr::format_expr(value, ctx, false)?);
    Ok(out)
}

/// `group-by`/`partition-by`: a keyword followed by a comma-separated
/// expression list.
fn render_expr_list_clause(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.push(expr::format_expr(item, ctx, false)?);
    }
    Ok(out)
}

/// `order-by`: a sequence of either bare expressions (implicit
/// ascending) or `[expr, direction]` pairs, where `direction` is a
/// keyword name such as `desc` or `nulls-last`.
fn render_order_by(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        match item.as_list() {
            Some([expr_node, dir]) => {
                out.push(expr::format_expr(expr_node, ctx, false)?);
                let dir_name = dir
                    .as_name()
                    .ok_or_else(|| Error::bad_shape("order-by direction must be a keyword name"))?;
                out.sql.push(' ');
                out.sql.push_str(&ident::sql_kw(dir_name.as_str()));
            }
            _ => out.push(expr::format_expr(item, ctx, false)?),
        }
    }
    Ok(out)
}

/// `timeseries` (NRQL): a bare keyword (`TIMESERIES`) when the value
/// carries no bucket width, or `TIMESERIES expr` when it does.
fn render_timeseries(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let keyword = ident::sql_kw(name);
    match value {
        Node::Null | Node::Bool(true) => Ok(Fragment::text(keyword)),
        other => {
            let mut out = Fragment::text(keyword);
            out.sql.push(' ');
            out.push(expr::format_expr(other, ctx, false)?);
            Ok(out)
        }
    }
}

/// `for`: a lock-strength keyword, optionally followed by an `OF`
/// table list and a trailing qualifier (`nowait`, `skip-locked`, ...).
/// Value is either a bare keyword name, or `[strength, tables, qualifier?]`.
fn render_for(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    match value {
        Node::Name(strength) => out.sql.push_str(&ident::sql_kw(strength.as_str())),
        Node::List(items) => {
            let strength = items
                .first()
                .and_then(Node::as_name)
                .ok_or_else(|| Error::bad_shape("`for` requires a lock-strength keyword"))?;
            out.sql.push_str(&ident::sql_kw(strength.as_str()));
            if let Some(tables) = items.get(1).and_then(Node::as_list) {
                if !tables.is_empty() {
                    out.sql.push_str(" OF ");
                    out.push(render_joined_entities(tables, ctx)?);
                }
            }
            if let Some(qualifier) = items.get(2).and_then(Node::as_name) {
                out.sql.push(' ');
                out.sql.push_str(&ident::sql_kw(qualifier.as_str()));
            }
        }
        other => {
            return Err(Error::bad_shape(format!(
                "`for` requires a keyword name or [strength, tables, qualifier?], got {other:?}"
            )))
        }
    }
    Ok(out)
}

/// `union`/`union-all`/`intersect`/`except`/`except-all`: a sequence of
/// subqueries joined by the set-operator keyword.
fn render_set_op(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let keyword = ident::sql_kw(name);
    let mut out = Fragment::empty();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push(' ');
            out.sql.push_str(&keyword);
            out.sql.push(' ');
        }
        out.push(expr::format_expr(item, ctx, false)?);
    }
    Ok(out)
}

/// `with`/`with-recursive`: a sequence of `[alias, subquery]` pairs.
fn render_with(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let pairs = as_list(value, name)?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    for (i, pair) in pairs.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        let items = as_list(pair, name)?;
        let [alias, subquery] = items else {
            return Err(Error::bad_shape("with entry requires exactly [alias, subquery]"));
        };
        out.sql.push_str(&ident::format_entity(alias, ctx, false)?);
        out.sql.push_str(" AS ");
        out.push(expr::format_expr(subquery, ctx, true)?);
    }
    Ok(out)
}

fn conflict_target(node: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let owned;
    let cols: &[Node] = match node.as_list() {
        Some(items) => items,
        None => {
            owned = [node.clone()];
            &owned
        }
    };
    let mut out = Fragment::text("(");
    out.push(render_joined_entities(cols, ctx)?);
    out.sql.push(')');
    Ok(out)
}

/// `on-conflict`: a column name, a sequence of columns, a mapping
/// carrying just a `where` key (a predicate arbiter with no explicit
/// column list), or `[columns, {where: expr}]`.
fn render_on_conflict(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text(ident::sql_kw(name));
    match value {
        Node::Map(stmt) => {
            let where_expr = stmt
                .get("where")
                .ok_or_else(|| Error::bad_shape("on-conflict mapping requires a `where` key"))?;
            out.sql.push_str(" WHERE ");
            out.push(expr::format_expr(where_expr, ctx, false)?);
        }
        Node::List(items) if items.len() == 2 && items[1].as_map().is_some() => {
            out.sql.push(' ');
            out.push(conflict_target(&items[0], ctx)?);
            let stmt = items[1].as_map().unwrap();
            if let Some(where_expr) = stmt.get("where") {
                out.sql.push_str(" WHERE ");
                out.push(expr::format_expr(where_expr, ctx, false)?);
            }
        }
        other => {
            out.sql.push(' ');
            out.push(conflict_target(other, ctx)?);
        }
    }
    Ok(out)
}

/// `do-update-set`: a plain column-to-expression mapping, or
/// `{fields: [col, ...], where: expr?}` shorthand for `col =
/// EXCLUDED.col` over every listed field.
fn render_do_update_set(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let stmt = value
        .as_map()
        .ok_or_else(|| Error::bad_shape("do-update-set requires a mapping"))?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');

    if let Some(fields) = stmt.get("fields").and_then(Node::as_list) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.sql.push_str(", ");
            }
            let col = ident::format_entity(field, ctx, false)?;
            out.sql.push_str(&col);
            out.sql.push_str(" = EXCLUDED.");
            out.sql.push_str(&col);
        }
        if let Some(where_expr) = stmt.get("where") {
            out.sql.push_str(" WHERE ");
            out.push(expr::format_expr(where_expr, ctx, false)?);
        }
        return Ok(out);
    }

    for (i, (col, expr_node)) in stmt.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.sql.push_str(&ident::format_entity(&Node::ident(col), ctx, false)?);
        out.sql.push_str(" = ");
        out.push(expr::format_expr(expr_node, ctx, false)?);
    }
    Ok(out)
}

/// `create-table`: a bare table entity.
fn render_simple_keyword_entity(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    out.sql.push_str(&ident::format_entity(value, ctx, false)?);
    Ok(out)
}

/// `drop-table`: a single table, or a sequence of tables.
fn render_drop_table(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    match value.as_list() {
        Some(items) => out.push(render_joined_entities(items, ctx)?),
        None => out.sql.push_str(&ident::format_entity(value, ctx, false)?),
    }
    Ok(out)
}

/// `rename-table`: `[old, new]`.
fn render_rename_table(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let [old, new] = items else {
        return Err(Error::bad_shape("rename-table requires exactly [old, new]"));
    };
    Ok(Fragment::text(format!(
        "{} {} TO {}",
        ident::sql_kw(name),
        ident::format_entity(old, ctx, false)?,
        ident::format_entity(new, ctx, false)?
    )))
}

/// `create-view`: `[view, {subquery}]`. The subquery renders without
/// its own wrapping parens (`CREATE VIEW v AS SELECT ...`, not `AS
/// (SELECT ...)`).
fn render_create_view(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let [view, subquery] = items else {
        return Err(Error::bad_shape("create-view requires exactly [view, subquery]"));
    };
    let stmt = subquery
        .as_map()
        .ok_or_else(|| Error::bad_shape("create-view's second element must be a statement mapping"))?;
    let mut out = Fragment::text(ident::sql_kw(name));
    out.sql.push(' ');
    out.sql.push_str(&ident::format_entity(view, ctx, false)?);
    out.sql.push_str(" AS ");
    out.push(statement::format_statement(stmt, ctx, false)?);
    Ok(out)
}

/// Renders one column definition: a name followed by type/constraint
/// tokens. A column definition can never carry a lifted parameter — a
/// `?` placeholder has nowhere to bind in `CREATE TABLE`/`ALTER TABLE`
/// DDL — so any token that renders down to more than bare text is
/// rejected as `column-op-not-simple` rather than silently dropping its
/// parameter out of the statement's parameter list.
fn render_column_def(node: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(node, "with-columns entry")?;
    let (name_node, rest) = items
        .split_first()
        .ok_or_else(|| Error::bad_shape("column definition requires a name"))?;
    let column_name = ident::format_entity(name_node, ctx, false)?;
    let mut out = Fragment::text(column_name.clone());
    for token in rest {
        out.sql.push(' ');
        match token {
            Node::Name(n) => out.sql.push_str(&ident::sql_kw(n.as_str())),
            Node::Number(n) => out.sql.push_str(n),
            other => {
                let frag = expr::format_expr(other, ctx, false)?;
                if !frag.params.is_empty() {
                    return Err(Error::column_op_not_simple(&column_name));
                }
                out.sql.push_str(&frag.sql);
            }
        }
    }
    Ok(out)
}

/// `with-columns`: a sequence of column definitions, each an identifier
/// followed by type/constraint tokens, rendered uppercase.
fn render_with_columns(_name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, "with-columns")?;
    let mut out = Fragment::text("(");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(", ");
        }
        out.push(render_column_def(item, ctx)?);
    }
    out.sql.push(')');
    Ok(out)
}

fn render_alter_op(op: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    match op {
        "add-column" => {
            let mut f = Fragment::text("ADD COLUMN ");
            f.push(render_column_def(value, ctx)?);
            Ok(f)
        }
        "drop-column" => Ok(Fragment::text(format!(
            "DROP COLUMN {}",
            ident::format_entity(value, ctx, false)?
        ))),
        "modify-column" => {
            let mut f = Fragment::text("MODIFY COLUMN ");
            f.push(render_column_def(value, ctx)?);
            Ok(f)
        }
        "rename-column" => {
            let items = as_list(value, "rename-column")?;
            let [old, new] = items else {
                return Err(Error::bad_shape("rename-column requires exactly [old, new]"));
            };
            Ok(Fragment::text(format!(
                "RENAME COLUMN {} TO {}",
                ident::format_entity(old, ctx, false)?,
                ident::format_entity(new, ctx, false)?
            )))
        }
        "add-index" => {
            let cols = as_list(value, "add-index")?;
            let mut f = Fragment::text("ADD INDEX (");
            f.push(render_joined_entities(cols, ctx)?);
            f.sql.push(')');
            Ok(f)
        }
        "drop-index" => Ok(Fragment::text(format!(
            "DROP INDEX {}",
            ident::format_entity(value, ctx, false)?
        ))),
        other => Err(Error::bad_shape(format!(
            "unrecognized alter-table operation: {other}"
        ))),
    }
}

/// `alter-table`: `[table, {add-column: ..., drop-column: ..., ...}]` —
/// a table entity paired with a mapping of sub-operations, each
/// comma-joined after the table name.
fn render_alter_table(name: &str, value: &Node, ctx: &Context) -> Result<Fragment, Error> {
    let items = as_list(value, name)?;
    let [table, ops] = items else {
        return Err(Error::bad_shape("alter-table requires exactly [table, operations]"));
    };
    let ops = ops
        .as_map()
        .ok_or_else(|| Error::bad_shape("alter-table operations must be a mapping"))?;
    let mut out = Fragment::text(format!(
        "{} {}",
        ident::sql_kw(name),
        ident::format_entity(table, ctx, false)?
    ));
    for (i, (op, op_value)) in ops.iter().enumerate() {
        out.sql.push_str(if i == 0 { " " } else { ", " });
        out.push(render_alter_op(op, op_value, ctx)?);
    }
    Ok(out)
}
