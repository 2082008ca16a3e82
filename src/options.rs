//! Configuration for building and batching commands.

/// Options controlling how a save operation is cut into batches.
///
/// # Example
///
/// ```
/// use modification_commands::BatchOptions;
///
/// let options = BatchOptions::default().with_max_batch_size(100);
/// assert_eq!(options.max_batch_size, 100);
/// assert_eq!(options.parameter_prefix, "p");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchOptions {
    /// Maximum number of commands sent in one batch. Zero is treated as one.
    pub max_batch_size: usize,
    /// Prefix of generated parameter names.
    pub parameter_prefix: String,
}

impl BatchOptions {
    /// Default maximum number of commands per batch.
    pub const DEFAULT_MAX_BATCH_SIZE: usize = 42;

    /// Set the maximum batch size.
    #[must_use]
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Set the parameter name prefix.
    #[must_use]
    pub fn with_parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_prefix = prefix.into();
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_batch_size: Self::DEFAULT_MAX_BATCH_SIZE,
            parameter_prefix: "p".to_owned(),
        }
    }
}
