//! The process-wide default registries: a single `RwLock`-guarded
//! [`Registries`], lazily populated with the built-in clause and
//! special-syntax renderers on first use. Many readers format
//! concurrently; `register_*!` and `set_dialect!` take a brief write
//! lock.

use std::sync::{OnceLock, RwLock};

use dsql_core::{ClauseRenderer, Dialect, Error, Registries, SpecialSyntaxRenderer};

static REGISTRIES: OnceLock<RwLock<Registries>> = OnceLock::new();

fn global() -> &'static RwLock<Registries> {
    REGISTRIES.get_or_init(|| {
        let mut registries = Registries::default();
        crate::clause::register_defaults(&mut registries);
        crate::special::register_defaults(&mut registries);
        RwLock::new(registries)
    })
}

/// Runs `f` with a read lock on the process-wide registries.
pub fn with_registries<T>(f: impl FnOnce(&Registries) -> T) -> T {
    let guard = global().read().expect("dsql registries lock poisoned");
    f(&guard)
}

/// Sets the process-wide default dialect. Idempotent: applying the
/// same dialect twice leaves the clause order unchanged.
pub fn set_dialect(dialect: Dialect) {
    let mut guard = global().write().expect("dsql registries lock poisoned");
    guard.set_dialect(dialect);
}

/// Registers a clause renderer under `name`, inserted before
/// `before_clause` in the base ordering (or appended, if `None`).
pub fn register_clause(
    name: impl Into<String>,
    renderer: ClauseRenderer,
    before_clause: Option<&str>,
) -> Result<(), Error> {
    let mut guard = global().write().expect("dsql registries lock poisoned");
    guard.register_clause(name, renderer, before_clause)
}

/// Registers a special-syntax (function-position) renderer under `name`.
pub fn register_fn(name: impl Into<String>, renderer: SpecialSyntaxRenderer) {
    let mut guard = global().write().expect("dsql registries lock poisoned");
    guard.register_special_syntax(name, renderer);
}

/// Registers `name` as an alias of an already-registered special-syntax
/// form.
pub fn register_fn_alias(name: impl Into<String>, existing: &str) -> Result<(), Error> {
    let mut guard = global().write().expect("dsql registries lock poisoned");
    guard.register_special_syntax_alias(name, existing)
}

/// Registers a new infix operator.
pub fn register_op(name: impl Into<String>, variadic: bool, ignore_nil: bool) {
    let mut guard = global().write().expect("dsql registries lock poisoned");
    guard.ops_mut().register(name, variadic, ignore_nil);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registries_carry_the_built_in_select_clause() {
        with_registries(|regs| {
            assert!(regs.clause_renderer("select").is_some());
            assert!(regs.special_syntax("between").is_some());
        });
    }
}
