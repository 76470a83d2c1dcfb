//! Error types for the ordkv engine.

use crate::transaction::TransactionStatus;
use crate::types::CollectionId;
use ordkv_storage::Key;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ordkv engine operations.
///
/// Looking up an absent key is not an error: reads return
/// `Option::None` so callers distinguish "absent" from "failed"
/// structurally.
#[derive(Debug, Error)]
pub enum Error {
    /// A concurrent committer modified a key this transaction read or
    /// wrote after its snapshot was taken.
    ///
    /// Nothing was applied; retry the whole transaction from a fresh
    /// snapshot.
    #[error("transaction conflict on key {key} in {collection}")]
    TransactionConflict {
        /// The collection where the conflict was detected.
        collection: CollectionId,
        /// The conflicting key.
        key: Key,
    },

    /// Commit or discard was invoked on a transaction that already
    /// reached a terminal state.
    #[error("transaction is already {state}")]
    TransactionFinished {
        /// The terminal state the transaction is in.
        state: TransactionStatus,
    },

    /// The database was closed; all collection handles and open
    /// transactions are invalid.
    #[error("database is closed")]
    DatabaseClosed,

    /// A batch operation received key and value sequences of different
    /// lengths. Rejected before any mutation is applied.
    #[error("batch length mismatch: {keys} keys, {values} values")]
    BatchLengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// The registry refused to create another collection.
    #[error("collection limit reached: at most {limit} collections")]
    CollectionLimit {
        /// The configured limit, including the main collection.
        limit: usize,
    },

    /// Operation not permitted with the given arguments or state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl Error {
    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true if this error is a commit-time conflict.
    ///
    /// Conflicts are the one recoverable failure: the caller may retry
    /// the whole transaction from a fresh snapshot.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::TransactionConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_display_names_key_and_collection() {
        let err = Error::TransactionConflict {
            collection: CollectionId::new(2),
            key: 40,
        };
        assert_eq!(format!("{err}"), "transaction conflict on key 40 in col:2");
        assert!(err.is_conflict());
    }

    #[test]
    fn batch_mismatch_display() {
        let err = Error::BatchLengthMismatch { keys: 3, values: 2 };
        assert_eq!(format!("{err}"), "batch length mismatch: 3 keys, 2 values");
        assert!(!err.is_conflict());
    }

    #[test]
    fn finished_display_includes_state() {
        let err = Error::TransactionFinished {
            state: TransactionStatus::Committed,
        };
        assert_eq!(format!("{err}"), "transaction is already committed");
    }
}
