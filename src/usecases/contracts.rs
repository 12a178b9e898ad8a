use chrono::{DateTime, Utc};

use crate::domain::{catalog::CanonicalName, counts::ProductCounts};

/// The store failed to commit a mutation; nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterStoreError {
    /// Another writer could not be excluded.
    LockUnavailable,
    /// The new state could not be written.
    WriteFailed,
}

/// Persistent per-conversation order counts.
///
/// Mutating calls run their load-mutate-save sequence under store-wide
/// mutual exclusion. Reads never fail: unreadable state is treated as empty.
pub trait CounterStore: Send + Sync {
    /// Adds one order for `product` and returns the new count.
    fn increment(
        &self,
        conversation_id: &str,
        product: &CanonicalName,
    ) -> Result<u64, CounterStoreError>;

    /// Removes the conversation's counts and returns them, or `None` when
    /// there is nothing non-zero to clear (in which case nothing is written).
    fn snapshot_and_clear(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ProductCounts>, CounterStoreError>;

    fn stats_for(&self, conversation_id: &str) -> ProductCounts;
}

impl<T: CounterStore + ?Sized> CounterStore for std::sync::Arc<T> {
    fn increment(
        &self,
        conversation_id: &str,
        product: &CanonicalName,
    ) -> Result<u64, CounterStoreError> {
        (**self).increment(conversation_id, product)
    }

    fn snapshot_and_clear(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ProductCounts>, CounterStoreError> {
        (**self).snapshot_and_clear(conversation_id)
    }

    fn stats_for(&self, conversation_id: &str) -> ProductCounts {
        (**self).stats_for(conversation_id)
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
