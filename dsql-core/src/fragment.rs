use crate::param::Param;

/// The result of rendering a clause, expression, or special-syntax form:
/// a SQL-text fragment paired with the parameters it lifted out, in
/// left-to-right textual order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragment {
    /// The rendered SQL text.
    pub sql: String,
    /// Parameters lifted out of the fragment, left to right.
    pub params: Vec<Param>,
}

impl Fragment {
    /// An empty fragment.
    pub fn empty() -> Self {
        Fragment::default()
    }

    /// A fragment with no parameters.
    pub fn text(sql: impl Into<String>) -> Self {
        Fragment {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// A fragment carrying exactly one placeholder and its parameter.
    pub fn placeholder(placeholder: &str, param: Param) -> Self {
        Fragment {
            sql: placeholder.to_string(),
            params: vec![param],
        }
    }

    /// Appends another fragment's text and parameters in place.
    pub fn push(&mut self, other: Fragment) {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params);
    }

    /// Joins a sequence of fragments with a separator, concatenating
    /// parameters in order.
    pub fn join(fragments: impl IntoIterator<Item = Fragment>, sep: &str) -> Fragment {
        let mut out = Fragment::empty();
        for (i, f) in fragments.into_iter().enumerate() {
            if i > 0 {
                out.sql.push_str(sep);
            }
            out.push(f);
        }
        out
    }
}

impl From<String> for Fragment {
    fn from(sql: String) -> Self {
        Fragment::text(sql)
    }
}

impl From<&str> for Fragment {
    fn from(sql: &str) -> Self {
        Fragment::text(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_concatenates_params_in_order() {
        let a = Fragment::placeholder("?", Param::Value(dsql_ast::ParamValue::Number("1".into())));
        let b = Fragment::placeholder("?", Param::Value(dsql_ast::ParamValue::Number("2".into())));
        let joined = Fragment::join(vec![a, b], ", ");
        assert_eq!(joined.sql, "?, ?");
        assert_eq!(joined.params.len(), 2);
    }
}
