use dsql_ast::ParamValue;

use crate::{
    error::Error,
    fragment::Fragment,
    param::{Param, Params},
};

/// Resolves every parameter carrier left behind in a rendered fragment
/// against the call's `params` binding map, expands any resulting
/// collection value sitting in an unpackable position into one
/// placeholder per element, and finally renumbers the placeholders
/// (`$1`, `$2`, ...) when the caller asked for numbered output.
///
/// This runs once, after the whole statement (or expression) has been
/// rendered to a single [`Fragment`] — not inline during recursive
/// rendering. By the time it runs, every literal `?` in `fragment.sql`
/// is guaranteed to be a genuine placeholder (inline mode never emits a
/// bare `?` in rendered text), so the expansion can work purely on the
/// already-rendered string and its parallel parameter list; it runs
/// before renumbering because the position of every later placeholder
/// shifts once a collection has been spliced in.
pub fn resolve_and_number(
    fragment: &Fragment,
    params: &Params,
    numbered: bool,
) -> Result<(String, Vec<ParamValue>), Error> {
    let resolved = resolve(&fragment.params, params)?;
    let (sql, values) = expand_collections(&fragment.sql, resolved);
    let sql = if numbered { number(&sql) } else { sql };
    Ok((sql, values))
}

fn resolve(carriers: &[Param], params: &Params) -> Result<Vec<(ParamValue, bool)>, Error> {
    let mut out = Vec::with_capacity(carriers.len());
    for carrier in carriers {
        let (value, unpackable) = match carrier {
            Param::Value(v) => (v.clone(), true),
            Param::Lifted(v) => (v.clone(), false),
            Param::Named(name) => {
                let value = params
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::missing_param(name))?;
                (value, true)
            }
        };
        out.push((value, unpackable));
    }
    Ok(out)
}

fn expand_collections(sql: &str, resolved: Vec<(ParamValue, bool)>) -> (String, Vec<ParamValue>) {
    let mut out_sql = String::with_capacity(sql.len());
    let mut out_values = Vec::with_capacity(resolved.len());
    let mut resolved = resolved.into_iter();

    for ch in sql.chars() {
        if ch == '?' {
            match resolved.next() {
                Some((ParamValue::Collection(items), true)) => {
                    out_sql.push('(');
                    for (i, item) in items.into_iter().enumerate() {
                        if i > 0 {
                            out_sql.push_str(", ");
                        }
                        out_sql.push('?');
                        out_values.push(item);
                    }
                    out_sql.push(')');
                }
                Some((value, _)) => {
                    out_sql.push('?');
                    out_values.push(value);
                }
                None => out_sql.push('?'),
            }
        } else {
            out_sql.push(ch);
        }
    }
    (out_sql, out_values)
}

fn number(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut n = 0usize;
    for ch in sql.chars() {
        if ch == '?' {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_collection_param_unpacks_into_its_own_placeholders() {
        let mut fragment = Fragment::text("id in ?");
        fragment.params.push(Param::Named("ids".into()));
        let params = Params::new().bind(
            "ids",
            ParamValue::Collection(vec![
                ParamValue::Number("1".into()),
                ParamValue::Number("2".into()),
                ParamValue::Number("3".into()),
            ]),
        );
        let (sql, values) = resolve_and_number(&fragment, &params, false).unwrap();
        assert_eq!(sql, "id in (?, ?, ?)");
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn lifted_collection_never_unpacks() {
        let mut fragment = Fragment::text("data = ?");
        fragment
            .params
            .push(Param::Lifted(ParamValue::Collection(vec![ParamValue::Number("1".into())])));
        let (sql, values) = resolve_and_number(&fragment, &Params::new(), false).unwrap();
        assert_eq!(sql, "data = ?");
        assert_eq!(values.len(), 1);
        assert!(matches!(&values[0], ParamValue::Collection(_)));
    }

    #[test]
    fn missing_named_param_errors() {
        let mut fragment = Fragment::text("x = ?");
        fragment.params.push(Param::Named("missing".into()));
        let err = resolve_and_number(&fragment, &Params::new(), false).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::MissingParam);
    }

    #[test]
    fn numbered_mode_renumbers_after_expansion() {
        let mut fragment = Fragment::text("a = ? and b in ?");
        fragment.params.push(Param::Value(ParamValue::Number("1".into())));
        fragment.params.push(Param::Named("bs".into()));
        let params = Params::new().bind(
            "bs",
            ParamValue::Collection(vec![ParamValue::Number("2".into()), ParamValue::Number("3".into())]),
        );
        let (sql, values) = resolve_and_number(&fragment, &params, true).unwrap();
        assert_eq!(sql, "a = $1 and b in ($2, $3)");
        assert_eq!(values.len(), 3);
    }
}
