//! Parameter names for bound values.

/// Produces `p0`, `p1`, ... for the parameters of one batch.
///
/// Names are part of the generated SQL text, so the generator is used from a
/// single command-building pass and is not shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNameGenerator {
    prefix: String,
    next: usize,
}

impl Default for ParameterNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterNameGenerator {
    /// Create a generator using the `p` prefix.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("p")
    }

    /// Create a generator using a custom prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Returns the next name in sequence.
    pub fn generate_next(&mut self) -> String {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        name
    }

    /// Restart the sequence for a new batch.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}
