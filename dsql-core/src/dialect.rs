use core::fmt;

/// A named SQL dialect: the quote character it uses for delimited
/// identifiers, whether it emits the `AS` keyword in aliases, and how it
/// reorders clauses relative to the base ordering.
///
/// The formatter never needs to recognize an open-ended keyword set for
/// parsing, only to quote identifiers and reorder clauses for rendering,
/// so a dialect here is a closed, fixed table rather than a
/// configurable trait.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Dialect {
    /// ANSI SQL. The default dialect.
    #[default]
    Ansi,
    /// Microsoft SQL Server.
    SqlServer,
    /// MySQL / MariaDB.
    MySql,
    /// Oracle.
    Oracle,
    /// New Relic Query Language.
    Nrql,
}

impl Dialect {
    /// Parses a dialect tag as accepted by `opts.dialect`. Returns `None`
    /// for an unrecognized tag (the caller turns that into
    /// `ErrorKind::UnknownDialect`).
    pub fn from_tag(tag: &str) -> Option<Dialect> {
        Some(match tag {
            "ansi" => Dialect::Ansi,
            "sqlserver" => Dialect::SqlServer,
            "mysql" => Dialect::MySql,
            "oracle" => Dialect::Oracle,
            "nrql" => Dialect::Nrql,
            _ => return None,
        })
    }

    /// The dialect's tag, as accepted by `from_tag`.
    pub fn tag(self) -> &'static str {
        match self {
            Dialect::Ansi => "ansi",
            Dialect::SqlServer => "sqlserver",
            Dialect::MySql => "mysql",
            Dialect::Oracle => "oracle",
            Dialect::Nrql => "nrql",
        }
    }

    /// The open/close quote characters this dialect wraps a delimited
    /// identifier component in.
    pub fn quote_chars(self) -> (char, char) {
        match self {
            Dialect::Ansi | Dialect::Oracle => ('"', '"'),
            Dialect::SqlServer => ('[', ']'),
            Dialect::MySql => ('`', '`'),
            Dialect::Nrql => ('`', '`'),
        }
    }

    /// Whether this dialect emits the `AS` keyword between an aliased
    /// entity and its alias. NRQL aliases with a bare space.
    pub fn emits_as_keyword(self) -> bool {
        !matches!(self, Dialect::Nrql)
    }

    /// Rewrites the base clause order into this dialect's clause order.
    ///
    /// `MySQL` moves `set` to sit between `update` and `where` (matching
    /// `UPDATE t SET a = 1 WHERE ...` rather than the ANSI-ish internal
    /// base order, which groups all `DML` body clauses before `WHERE`);
    /// `NRQL` replaces the relational clause set outright with its own.
    pub fn reorder(self, base: &[String]) -> Vec<String> {
        match self {
            Dialect::MySql => move_before(base, "set", "where"),
            Dialect::Nrql => nrql_order(),
            _ => base.to_vec(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn move_before(base: &[String], name: &str, before: &str) -> Vec<String> {
    let mut order: Vec<String> = base.iter().filter(|c| c.as_str() != name).cloned().collect();
    if let Some(pos) = order.iter().position(|c| c == before) {
        order.insert(pos, name.to_string());
    } else {
        order.push(name.to_string());
    }
    order
}

fn nrql_order() -> Vec<String> {
    [
        "select", "from", "where", "facet", "limit", "since", "until", "compare-with",
        "timeseries",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_tag() {
        for d in [
            Dialect::Ansi,
            Dialect::SqlServer,
            Dialect::MySql,
            Dialect::Oracle,
            Dialect::Nrql,
        ] {
            assert_eq!(Dialect::from_tag(d.tag()), Some(d));
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(Dialect::from_tag("dbase"), None);
    }

    #[test]
    fn mysql_moves_set_before_where() {
        let base = vec![
            "update".to_string(),
            "set".to_string(),
            "where".to_string(),
        ];
        let reordered = Dialect::MySql.reorder(&base);
        let set_pos = reordered.iter().position(|c| c == "set").unwrap();
        let where_pos = reordered.iter().position(|c| c == "where").unwrap();
        assert!(set_pos < where_pos);
    }

    #[test]
    fn idempotent_reorder() {
        let base = vec!["select".to_string(), "from".to_string()];
        let once = Dialect::MySql.reorder(&base);
        let twice = Dialect::MySql.reorder(&once);
        assert_eq!(once, twice);
    }
}
