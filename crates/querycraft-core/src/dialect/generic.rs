//! Generic SQL dialect.

use super::Dialect;

/// ANSI-flavoured rendering: single-quoted strings and identifiers limited
/// to `[A-Za-z0-9_.]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}
