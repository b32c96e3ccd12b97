use crate::{dialect::Dialect, param::Params, registry::Registries};

/// When identifiers get quoted: resolved from the caller's tri-state
/// `quoted: true | false | null` option and whether a dialect was
/// explicitly selected for this call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Quoting {
    /// Quote every identifier, reserved word or not.
    Always,
    /// Never quote, even a reserved word or identifier with unusual
    /// characters.
    Never,
    /// Quote only identifiers that aren't a plain run of alphanumerics
    /// and underscores (the default when no dialect was explicitly
    /// requested for this call).
    UnusualOnly,
}

impl Quoting {
    /// Resolves the caller's `quoted` option (`None` meaning "not set")
    /// against whether a dialect was explicitly chosen for this call.
    /// An explicit dialect selection defaults quoting to `Always`;
    /// absent both, only unusual identifiers are quoted.
    pub fn resolve(explicit: Option<bool>, dialect_selected: bool) -> Quoting {
        match explicit {
            Some(true) => Quoting::Always,
            Some(false) => Quoting::Never,
            None if dialect_selected => Quoting::Always,
            None => Quoting::UnusualOnly,
        }
    }

    /// Whether a single dot-separated identifier component should be
    /// quoted, given its raw (unquoted) text.
    pub fn should_quote(self, local: &str) -> bool {
        match self {
            Quoting::Always => true,
            Quoting::Never => false,
            Quoting::UnusualOnly => !is_plain_identifier(local),
        }
    }
}

fn is_plain_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().next().map_or(false, |b| b.is_ascii_alphabetic() || b == b'_')
        && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// The state captured once at the top of a `format` call and threaded
/// down through every recursive call: a small bundle of per-call
/// settings scoped to one format invocation, created fresh for each
/// top-level call and never mutated mid-call.
///
/// `nested` (whether the current expression sits inside a parenthesized
/// ancestor) is deliberately not a field here: it changes on every
/// recursive step, so it is threaded as an ordinary function argument
/// instead of being part of the fixed per-call bundle.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    /// The dialect active for this call.
    pub dialect: Dialect,
    /// The resolved quoting policy for this call.
    pub quoting: Quoting,
    /// Whether parameter values are inlined into the SQL text rather
    /// than lifted into the parameter list.
    pub inline: bool,
    /// Whether placeholders are numbered (`$1`, `$2`, ...) rather than
    /// positional (`?`).
    pub numbered: bool,
    /// Whether the rendered SQL is broken across lines for readability.
    pub pretty: bool,
    /// The named-parameter binding map for this call.
    pub params: &'a Params,
    /// The clause, special-syntax and operator registries active for
    /// this call.
    pub registries: &'a Registries,
}

impl<'a> Context<'a> {
    /// The clause order this call should render clauses in: the
    /// registries' order for `self.dialect` when it differs from the
    /// registries' own default dialect, otherwise the registries'
    /// already-cached current order.
    pub fn clause_order(&self) -> Vec<String> {
        if self.dialect == self.registries.default_dialect() {
            self.registries.current_clause_order().to_vec()
        } else {
            self.registries.clause_order_for(self.dialect)
        }
    }
}
