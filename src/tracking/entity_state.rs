//! Entity states as reported by the change tracker.

use core::fmt;

/// The pending mutation of a tracked entity.
///
/// Declaration order is the rank used when ordering commands: within one
/// table, inserts sort before updates and updates before deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityState {
    /// The entity will be inserted.
    Added,
    /// Some properties of the entity will be updated.
    Modified,
    /// The entity will be deleted.
    Deleted,
    /// The entity is tracked and matches the store.
    Unchanged,
    /// The entity is not tracked.
    Detached,
}

impl EntityState {
    /// Whether a modification command can be built for this state.
    #[inline]
    #[must_use]
    pub fn has_statement(self) -> bool {
        matches!(self, Self::Added | Self::Modified | Self::Deleted)
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Added => "Added",
            Self::Modified => "Modified",
            Self::Deleted => "Deleted",
            Self::Unchanged => "Unchanged",
            Self::Detached => "Detached",
        })
    }
}
