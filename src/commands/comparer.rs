//! Submodule defining the total order used to sort commands before batching.

use core::cmp::Ordering;

use super::ModificationCommand;

/// Orders commands by schema, then table, then entity state.
///
/// Commands for the same table and state end up adjacent, which is what lets
/// batching group statements without a second sort. Commands equal on all
/// three keys compare equal; sorting with [`sort`](Self::sort) is stable, so
/// they keep their relative order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModificationCommandComparer;

impl ModificationCommandComparer {
    /// Compare two commands. A missing command sorts before any command.
    #[must_use]
    pub fn compare(
        self,
        x: Option<&ModificationCommand<'_>>,
        y: Option<&ModificationCommand<'_>>,
    ) -> Ordering {
        match (x, y) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => self.compare_commands(x, y),
        }
    }

    /// Compare two commands.
    #[must_use]
    pub fn compare_commands(
        self,
        x: &ModificationCommand<'_>,
        y: &ModificationCommand<'_>,
    ) -> Ordering {
        if core::ptr::eq(x, y) {
            return Ordering::Equal;
        }
        x.schema()
            .cmp(&y.schema())
            .then_with(|| x.table_name().cmp(y.table_name()))
            .then_with(|| x.entity_state().cmp(&y.entity_state()))
    }

    /// Sort commands in place, keeping the relative order of equal commands.
    pub fn sort(self, commands: &mut [ModificationCommand<'_>]) {
        commands.sort_by(|x, y| self.compare_commands(x, y));
    }
}
