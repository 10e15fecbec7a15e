//! Transactions: batches of per-entity operations applied atomically.

use super::{entity::PlayerChanges, error::PlayerError, value_object::PlayerId};

/// A single operation of a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum TxOperation {
    /// Merge `changes` into the player, creating it if absent
    Update {
        id: PlayerId,
        changes: PlayerChanges,
    },
    /// Add `by` to the stored click counter of an existing player
    Increment { id: PlayerId, by: u64 },
}

/// Non-empty, ordered list of operations
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    operations: Vec<TxOperation>,
}

impl Transaction {
    /// Create a new transaction
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::EmptyTransaction` if `operations` is empty
    pub fn new(operations: Vec<TxOperation>) -> Result<Self, PlayerError> {
        if operations.is_empty() {
            return Err(PlayerError::EmptyTransaction);
        }
        Ok(Self { operations })
    }

    pub fn operations(&self) -> &[TxOperation] {
        &self.operations
    }
}
