// ============================
// crates/backend-lib/src/timeout.rs
// ============================
//! Timeout scheduler: cancelable delayed actions bound to an invitation's
//! lifetime. A timer does not run a callback in place — it sends a message
//! back into the coordinator's queue so the fire is linearized with every
//! other event. Aborting the sleep task is best-effort; the binding guard
//! is the epoch carried in the fire message, which the consumer must
//! acknowledge before acting.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct Armed {
    epoch: u64,
    task: JoinHandle<()>,
}

pub struct TimeoutScheduler<K, M> {
    fire_tx: mpsc::UnboundedSender<M>,
    pending: HashMap<K, Armed>,
    next_epoch: u64,
}

impl<K, M> TimeoutScheduler<K, M>
where
    K: Eq + Hash + Clone + Send + 'static,
    M: Send + 'static,
{
    pub fn new(fire_tx: mpsc::UnboundedSender<M>) -> Self {
        Self {
            fire_tx,
            pending: HashMap::new(),
            next_epoch: 0,
        }
    }

    /// Schedule a fire message after `delay`. Rearming a key first cancels
    /// any existing timer for it, so two live timers can never exist for
    /// one key. Returns the epoch stamped into the message.
    pub fn arm(&mut self, key: K, delay: Duration, make_msg: impl FnOnce(u64) -> M) -> u64 {
        self.cancel(&key);

        self.next_epoch += 1;
        let epoch = self.next_epoch;
        let msg = make_msg(epoch);
        let tx = self.fire_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(msg);
        });

        self.pending.insert(key, Armed { epoch, task });
        epoch
    }

    /// Cancel a pending timer. Cancelling an absent, already-fired or
    /// already-cancelled key is a safe no-op.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(armed) => {
                armed.task.abort();
                true
            },
            None => false,
        }
    }

    /// Called by the consumer when a fire message arrives. Returns true and
    /// retires the timer only if the fire is the currently armed one; a
    /// stale fire (cancelled or superseded after the sleep completed but
    /// before the message was consumed) returns false and must be ignored.
    pub fn acknowledge(&mut self, key: &K, epoch: u64) -> bool {
        match self.pending.get(key) {
            Some(armed) if armed.epoch == epoch => {
                self.pending.remove(key);
                true
            },
            _ => false,
        }
    }

    pub fn is_armed(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    pub fn armed_count(&self) -> usize {
        self.pending.len()
    }
}
