//! Cutting sorted commands into batches.

use super::ModificationCommand;
use crate::{BatchOptions, EntityState, TableId};

/// Consecutive commands for one table and state, sent together.
#[derive(Debug)]
pub struct CommandBatch<'e> {
    commands: Vec<ModificationCommand<'e>>,
}

impl<'e> CommandBatch<'e> {
    /// The table every command in the batch targets.
    #[must_use]
    pub fn table_id(&self) -> Option<&TableId> {
        self.commands.first().map(ModificationCommand::table_id)
    }

    /// The state shared by every command in the batch.
    #[must_use]
    pub fn entity_state(&self) -> Option<EntityState> {
        self.commands.first().map(ModificationCommand::entity_state)
    }

    /// Returns the number of commands.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if the batch holds no command.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The commands in execution order.
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[ModificationCommand<'e>] {
        &self.commands
    }

    /// Mutable access, needed to compute column modifications.
    #[inline]
    pub fn commands_mut(&mut self) -> &mut [ModificationCommand<'e>] {
        &mut self.commands
    }

    /// Consumes self and returns the commands.
    #[inline]
    #[must_use]
    pub fn into_commands(self) -> Vec<ModificationCommand<'e>> {
        self.commands
    }

    fn accepts(&self, command: &ModificationCommand<'_>, max_batch_size: usize) -> bool {
        self.commands.len() < max_batch_size
            && self.table_id() == Some(command.table_id())
            && self.entity_state() == Some(command.entity_state())
    }
}

/// Cut commands, already sorted, into batches.
///
/// A batch never mixes tables or states and never holds more than
/// `options.max_batch_size` commands.
#[must_use]
pub fn batch_commands<'e>(
    commands: Vec<ModificationCommand<'e>>,
    options: &BatchOptions,
) -> Vec<CommandBatch<'e>> {
    let max_batch_size = options.max_batch_size.max(1);
    let mut batches: Vec<CommandBatch<'e>> = Vec::new();

    for command in commands {
        match batches.last_mut() {
            Some(batch) if batch.accepts(&command, max_batch_size) => batch.commands.push(command),
            _ => batches.push(CommandBatch {
                commands: vec![command],
            }),
        }
    }

    tracing::debug!(batches = batches.len(), max_batch_size, "cut command batches");
    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_type_mapping;

    fn command(table: &str) -> ModificationCommand<'static> {
        ModificationCommand::new(table, None, String::new, default_type_mapping).unwrap()
    }

    #[test]
    fn test_batches_split_by_table_and_size() {
        let commands = vec![command("A"), command("A"), command("A"), command("B")];
        let options = BatchOptions::default().with_max_batch_size(2);
        let batches = batch_commands(commands, &options);

        let sizes: Vec<usize> = batches.iter().map(CommandBatch::len).collect();
        assert_eq!(sizes, [2, 1, 1]);
        assert_eq!(batches[2].table_id().map(TableId::table), Some("B"));
    }

    #[test]
    fn test_zero_batch_size_means_one() {
        let commands = vec![command("A"), command("A")];
        let options = BatchOptions::default().with_max_batch_size(0);
        assert_eq!(batch_commands(commands, &options).len(), 2);
    }

    #[test]
    fn test_no_commands_no_batches() {
        assert!(batch_commands(Vec::new(), &BatchOptions::default()).is_empty());
    }
}
