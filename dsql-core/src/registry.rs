use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dsql_ast::Node;

use crate::{context::Context, dialect::Dialect, error::Error, fragment::Fragment};

/// A clause renderer: given the clause name (for `sql_kw`-style keyword
/// rendering) and its value, produces a rendered fragment.
pub type ClauseRenderer =
    Arc<dyn Fn(&str, &Node, &Context) -> Result<Fragment, Error> + Send + Sync>;

/// A special-syntax renderer: given the form's name and its argument
/// nodes (the tail of the `[name, arg, ...]` sequence), produces a
/// rendered fragment. Receives `nested` so it can honor ancestor
/// parenthesization when it wraps an infix-like expression.
pub type SpecialSyntaxRenderer =
    Arc<dyn Fn(&str, &[Node], &Context, bool) -> Result<Fragment, Error> + Send + Sync>;

/// The built-in set of the names every new clause registration is
/// measured against for the `before` anchor, in the base (pre-dialect)
/// order. This is the "legal SQL order" a statement's clauses render in
/// absent any dialect-specific rewrite.
pub const BASE_CLAUSE_ORDER: &[&str] = &[
    "with",
    "with-recursive",
    "union",
    "union-all",
    "intersect",
    "except",
    "except-all",
    "select",
    "select-distinct",
    "select-distinct-on",
    "insert-into",
    "update",
    "delete",
    "set",
    "from",
    "join",
    "left-join",
    "right-join",
    "inner-join",
    "outer-join",
    "full-join",
    "cross-join",
    "where",
    "group-by",
    "having",
    "window",
    "partition-by",
    "order-by",
    "limit",
    "offset",
    "for",
    "values",
    "on-conflict",
    "do-update-set",
    "returning",
    "create-table",
    "create-view",
    "drop-table",
    "rename-table",
    "alter-table",
    "with-columns",
];

/// Operator registration data: which names are recognized as infix
/// operators, which of those are variadic, which ignore `nil` operands,
/// and the alias table that canonicalizes legacy spellings.
#[derive(Clone, Debug)]
pub struct OpRegistry {
    infix_ops: HashSet<String>,
    variadic_ops: HashSet<String>,
    nil_ignoring_ops: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl Default for OpRegistry {
    fn default() -> Self {
        let mut reg = OpRegistry {
            infix_ops: HashSet::new(),
            variadic_ops: HashSet::new(),
            nil_ignoring_ops: HashSet::new(),
            aliases: HashMap::new(),
        };
        for &op in &[
            "=", "<>", "<", ">", "<=", ">=", "+", "-", "*", "/", "%", "||", "and", "or", "like",
            "not-like", "ilike", "not-ilike", "regexp", "&", "|", "<<", ">>",
        ] {
            reg.infix_ops.insert(op.to_string());
        }
        for &op in &["and", "or", "+", "*", "||", "&", "|"] {
            reg.variadic_ops.insert(op.to_string());
        }
        for &op in &["and", "or"] {
            reg.nil_ignoring_ops.insert(op.to_string());
        }
        for (alias, canon) in [
            ("is", "="),
            ("!=", "<>"),
            ("not=", "<>"),
            ("regex", "regexp"),
        ] {
            reg.aliases.insert(alias.to_string(), canon.to_string());
        }
        reg
    }
}

impl OpRegistry {
    /// Canonicalizes an operator name through the alias table.
    pub fn canonicalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// True if the (already canonicalized) name is a recognized infix
    /// operator.
    pub fn is_infix(&self, name: &str) -> bool {
        self.infix_ops.contains(name)
    }

    /// True if the operator accepts more than two operands.
    pub fn is_variadic(&self, name: &str) -> bool {
        self.variadic_ops.contains(name)
    }

    /// True if the operator drops `null` operands before rendering.
    pub fn ignores_nil(&self, name: &str) -> bool {
        self.nil_ignoring_ops.contains(name)
    }

    /// Registers a new infix operator.
    pub fn register(&mut self, name: impl Into<String>, variadic: bool, ignore_nil: bool) {
        let name = name.into();
        if variadic {
            self.variadic_ops.insert(name.clone());
        }
        if ignore_nil {
            self.nil_ignoring_ops.insert(name.clone());
        }
        self.infix_ops.insert(name);
    }
}

/// The three mutable extension registries plus the clause ordering
/// lists.
#[derive(Clone)]
pub struct Registries {
    clauses: HashMap<String, ClauseRenderer>,
    special_syntax: HashMap<String, SpecialSyntaxRenderer>,
    ops: OpRegistry,
    base_clause_order: Vec<String>,
    current_clause_order: Vec<String>,
    dialect: Dialect,
}

impl Default for Registries {
    fn default() -> Self {
        let base: Vec<String> = BASE_CLAUSE_ORDER.iter().map(|s| s.to_string()).collect();
        let current = Dialect::default().reorder(&base);
        Registries {
            clauses: HashMap::new(),
            special_syntax: HashMap::new(),
            ops: OpRegistry::default(),
            base_clause_order: base,
            current_clause_order: current,
            dialect: Dialect::default(),
        }
    }
}

impl Registries {
    /// The operator registry.
    pub fn ops(&self) -> &OpRegistry {
        &self.ops
    }

    /// Mutable access to the operator registry.
    pub fn ops_mut(&mut self) -> &mut OpRegistry {
        &mut self.ops
    }

    /// Looks up a clause's renderer.
    pub fn clause_renderer(&self, name: &str) -> Option<&ClauseRenderer> {
        self.clauses.get(name)
    }

    /// Looks up a special-syntax form's renderer.
    pub fn special_syntax(&self, name: &str) -> Option<&SpecialSyntaxRenderer> {
        self.special_syntax.get(name)
    }

    /// The clause order active for the currently-selected default
    /// dialect (i.e. absent a per-call dialect override).
    pub fn current_clause_order(&self) -> &[String] {
        &self.current_clause_order
    }

    /// Recomputes the clause order for an explicit per-call dialect,
    /// without mutating the registry's own default-dialect order.
    pub fn clause_order_for(&self, dialect: Dialect) -> Vec<String> {
        dialect.reorder(&self.base_clause_order)
    }

    /// Sets the process-wide default dialect, recomputing
    /// `current_clause_order`. Applying the same dialect twice is a
    /// no-op the second time.
    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
        self.current_clause_order = dialect.reorder(&self.base_clause_order);
    }

    /// The process-wide default dialect.
    pub fn default_dialect(&self) -> Dialect {
        self.dialect
    }

    /// Registers a clause renderer, inserting its name into the base (and
    /// current) clause order before `before_clause`, or at the end when
    /// `before_clause` is `None`. Re-registering an existing clause name
    /// replaces its renderer without moving it in the order.
    pub fn register_clause(
        &mut self,
        name: impl Into<String>,
        renderer: ClauseRenderer,
        before_clause: Option<&str>,
    ) -> Result<(), Error> {
        let name = name.into();
        let already_known = self.base_clause_order.iter().any(|c| c == &name);
        self.clauses.insert(name.clone(), renderer);
        if !already_known {
            match before_clause {
                Some(anchor) => {
                    let pos = self
                        .base_clause_order
                        .iter()
                        .position(|c| c == anchor)
                        .ok_or_else(|| {
                            Error::bad_registration(format!(
                                "register_clause: unknown `before` anchor clause `{}`",
                                anchor
                            ))
                        })?;
                    self.base_clause_order.insert(pos, name);
                }
                None => self.base_clause_order.push(name),
            }
            self.current_clause_order = self.dialect.reorder(&self.base_clause_order);
        }
        Ok(())
    }

    /// Registers a special-syntax renderer under `name`.
    pub fn register_special_syntax(&mut self, name: impl Into<String>, renderer: SpecialSyntaxRenderer) {
        self.special_syntax.insert(name.into(), renderer);
    }

    /// Registers `name` as an alias of an already-registered special
    /// syntax form `existing`.
    pub fn register_special_syntax_alias(
        &mut self,
        name: impl Into<String>,
        existing: &str,
    ) -> Result<(), Error> {
        let renderer = self
            .special_syntax
            .get(existing)
            .cloned()
            .ok_or_else(|| {
                Error::bad_registration(format!(
                    "register_fn: unknown renderer to alias: `{}`",
                    existing
                ))
            })?;
        self.special_syntax.insert(name.into(), renderer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ops_recognize_common_aliases() {
        let ops = OpRegistry::default();
        assert_eq!(ops.canonicalize("is"), "=");
        assert_eq!(ops.canonicalize("!="), "<>");
        assert_eq!(ops.canonicalize("not="), "<>");
        assert_eq!(ops.canonicalize("regex"), "regexp");
    }

    #[test]
    fn variadic_and_nil_ignoring_flags() {
        let ops = OpRegistry::default();
        assert!(ops.is_variadic("and"));
        assert!(ops.ignores_nil("and"));
        assert!(!ops.is_variadic("="));
    }

    #[test]
    fn register_clause_before_anchor_inserts_in_order() {
        let mut reg = Registries::default();
        let renderer: ClauseRenderer = Arc::new(|_, _, _| Ok(Fragment::empty()));
        reg.register_clause("top-n", renderer, Some("from")).unwrap();
        let pos_top_n = reg.current_clause_order().iter().position(|c| c == "top-n");
        let pos_from = reg.current_clause_order().iter().position(|c| c == "from");
        assert!(pos_top_n.unwrap() < pos_from.unwrap());
    }

    #[test]
    fn register_clause_unknown_anchor_errors() {
        let mut reg = Registries::default();
        let renderer: ClauseRenderer = Arc::new(|_, _, _| Ok(Fragment::empty()));
        let err = reg.register_clause("top-n", renderer, Some("nope")).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::BadRegistration);
    }

    #[test]
    fn registering_builtin_clauses_after_the_fact_does_not_move_them() {
        let mut reg = Registries::default();
        let before = reg.current_clause_order().to_vec();
        let renderer: ClauseRenderer = Arc::new(|_, _, _| Ok(Fragment::empty()));
        reg.register_clause("select", renderer, None).unwrap();
        assert_eq!(reg.current_clause_order(), before.as_slice());
    }
}
