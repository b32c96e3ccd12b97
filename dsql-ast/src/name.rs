use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A symbolic name appearing in the declarative tree: an identifier, a
/// named-parameter reference (`?foo`), a function-call shorthand
/// (`%f.a.b`), or an inline-keyword token (`!from`).
///
/// `Name` stores the raw text verbatim, sigil included; callers who just
/// want a plain identifier construct one with [`Name::ident`] and never
/// see a sigil.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Name(String);

/// The prefix-determined interpretation of a [`Name`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NameKind {
    /// A plain identifier, optionally namespace-qualified.
    Ident,
    /// `?name` — a named-parameter reference, resolved against the
    /// format call's `params` binding.
    Named,
    /// `%f.a.b` — a terse function-call-with-column-name shorthand.
    Function,
    /// `!WORD` — an inline SQL keyword token inside a function-call
    /// argument list.
    KeywordToken,
}

impl Name {
    /// Creates a plain identifier name.
    pub fn ident(raw: impl Into<String>) -> Self {
        Name(raw.into())
    }

    /// Creates a named-parameter reference `?name`.
    pub fn named(name: impl AsRef<str>) -> Self {
        Name(alloc_prefixed('?', name.as_ref()))
    }

    /// Creates a function-call shorthand `%f.a.b`.
    pub fn function(dotted: impl AsRef<str>) -> Self {
        Name(alloc_prefixed('%', dotted.as_ref()))
    }

    /// Creates an inline keyword token `!WORD`.
    pub fn keyword_token(word: impl AsRef<str>) -> Self {
        Name(alloc_prefixed('!', word.as_ref()))
    }

    /// Creates a `Name` from its already-prefixed raw text, verbatim.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Name(raw.into())
    }

    /// The raw text of the name, sigil included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix-determined interpretation of this name.
    pub fn kind(&self) -> NameKind {
        match self.0.as_bytes().first() {
            Some(b'?') => NameKind::Named,
            Some(b'%') => NameKind::Function,
            Some(b'!') => NameKind::KeywordToken,
            _ => NameKind::Ident,
        }
    }

    /// If this is a `?name` reference, the binding name (sigil stripped).
    pub fn named_ref(&self) -> Option<&str> {
        match self.kind() {
            NameKind::Named => Some(&self.0[1..]),
            _ => None,
        }
    }

    /// If this is a `%f.a.b` shorthand, the function name and the dotted
    /// argument identifiers that follow it.
    pub fn function_parts(&self) -> Option<(&str, Vec<&str>)> {
        match self.kind() {
            NameKind::Function => {
                let mut parts = self.0[1..].split('.');
                let head = parts.next().unwrap_or_default();
                Some((head, parts.collect()))
            }
            _ => None,
        }
    }

    /// If this is a `!WORD` (or `!word-word`) inline keyword token, the
    /// dash-joined words it expands to, e.g. `!both-from` -> `["both",
    /// "from"]`.
    pub fn keyword_words(&self) -> Option<Vec<&str>> {
        match self.kind() {
            NameKind::KeywordToken => Some(self.0[1..].split('-').collect()),
            _ => None,
        }
    }

    /// Splits a plain identifier into its optional namespace qualifier
    /// and local name: qualifier is the part before the first `/`, or
    /// before the first `.` when there is no `/`.
    pub fn qualifier_and_local(&self) -> (Option<&str>, &str) {
        let raw = self.0.as_str();
        if let Some(idx) = raw.find('/') {
            (Some(&raw[..idx]), &raw[idx + 1..])
        } else if let Some(idx) = raw.find('.') {
            (Some(&raw[..idx]), &raw[idx + 1..])
        } else {
            (None, raw)
        }
    }

    /// True when the local component of this identifier is the unquoted
    /// star `*`.
    pub fn is_star(&self) -> bool {
        self.qualifier_and_local().1 == "*"
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name(value.to_string())
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name(value)
    }
}

fn alloc_prefixed(sigil: char, rest: &str) -> String {
    let mut s = String::with_capacity(rest.len() + 1);
    s.push(sigil);
    s.push_str(rest);
    s
}
