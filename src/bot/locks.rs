use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per sender, so turns from the same sender run one at a time
#[derive(Debug, Default)]
pub struct SenderLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SenderLocks {
    /// Registry size above which idle entries are dropped
    const PRUNE_ABOVE: usize = 1024;

    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `sender`'s state
    pub async fn acquire(&self, sender: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            if locks.len() > Self::PRUNE_ABOVE {
                // Only the registry holds an idle lock
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            Arc::clone(locks.entry(sender.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
