use std::collections::BTreeMap;
use std::fmt;

/// The six error kinds a `format` call can surface, per the formatter's
/// error surface table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// A statement mapping contains a clause name not in the registry.
    UnknownClause,
    /// The `dialect` option is not in the built-in dialect table.
    UnknownDialect,
    /// A named parameter was referenced but not supplied in `params`.
    MissingParam,
    /// A value had a shape the renderer couldn't make sense of (wrong
    /// arity, wrong node kind, unrecognized clause-value shape).
    BadShape,
    /// `register_*!` was invoked with something that isn't a renderer, or
    /// with an unknown `before` reference clause.
    BadRegistration,
    /// A DDL column element rendered to more than one fragment, which
    /// would have silently lifted parameters out of a position that
    /// can't carry them.
    ColumnOpNotSimple,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::UnknownClause => "unknown-clause",
            ErrorKind::UnknownDialect => "unknown-dialect",
            ErrorKind::MissingParam => "missing-param",
            ErrorKind::BadShape => "bad-shape",
            ErrorKind::BadRegistration => "bad-registration",
            ErrorKind::ColumnOpNotSimple => "column-op-not-simple",
        })
    }
}

/// A formatter error: a kind, a human-readable message, and a context map
/// of extra structured data (the clause name, the offending key, and so
/// on) reported back to the caller.
///
/// The context map is a `BTreeMap` rather than a hash map so `Display`
/// output is deterministic across runs — formatting itself is
/// deterministic, and the error path should be no different.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    /// The error kind.
    pub kind: ErrorKind,
    /// A human-readable message.
    pub message: String,
    /// Extra structured context, e.g. `{"clause": "select"}`.
    pub context: BTreeMap<String, String>,
}

impl Error {
    /// Creates an error with no extra context.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Attaches a context entry, builder-style.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// An `unknown-clause` error for the given clause name.
    pub fn unknown_clause(name: &str) -> Self {
        Error::new(
            ErrorKind::UnknownClause,
            format!("unrecognized clause: {}", name),
        )
        .with_context("clause", name)
    }

    /// An `unknown-dialect` error for the given dialect tag.
    pub fn unknown_dialect(tag: &str) -> Self {
        Error::new(
            ErrorKind::UnknownDialect,
            format!("unrecognized dialect: {}", tag),
        )
        .with_context("dialect", tag)
    }

    /// A `missing-param` error for the given parameter name.
    pub fn missing_param(name: &str) -> Self {
        Error::new(
            ErrorKind::MissingParam,
            format!("missing binding for named parameter: {}", name),
        )
        .with_context("param", name)
    }

    /// A `bad-shape` error with a free-form description.
    pub fn bad_shape(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::BadShape, message)
    }

    /// A `bad-registration` error with a free-form description.
    pub fn bad_registration(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::BadRegistration, message)
    }

    /// A `column-op-not-simple` error for the given column name.
    pub fn column_op_not_simple(column: &str) -> Self {
        Error::new(
            ErrorKind::ColumnOpNotSimple,
            format!(
                "column element for `{}` rendered to more than one fragment",
                column
            ),
        )
        .with_context("column", column)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if !self.context.is_empty() {
            write!(f, " (")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}={}", k, v)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
