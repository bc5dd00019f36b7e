//! The cart change notifier.
//!
//! A process-wide, payload-free broadcast: every cart mutation fires one
//! [`CartChanged`] event, and each subscriber re-reads the cart store to
//! learn the new state. Independent UI surfaces (header badge, cart panel)
//! stay consistent without knowing about each other. Delivery is in-process
//! and best-effort only: nothing survives a restart, and a subscriber that
//! lags past the channel capacity misses events (it re-reads on the next
//! one, so a missed event costs at most one stale redraw).

use tokio::sync::broadcast;

/// Capacity of the broadcast channel. Cart mutations are keyed to user
/// interactions, so a small buffer is plenty.
const CHANNEL_CAPACITY: usize = 16;

/// The (empty) event fired after every cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChanged;

/// Broadcast fanout for cart mutations.
///
/// The notifier does not know who, or how many, are listening; a send with
/// no subscribers is fine.
#[derive(Debug, Clone)]
pub struct CartNotifier {
    sender: broadcast::Sender<CartChanged>,
}

impl CartNotifier {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to cart changes. Dropping the subscription unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        CartSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Fire a change event. Best-effort: an error (no live subscribers) is
    /// deliberately ignored.
    pub fn notify(&self) {
        let _ = self.sender.send(CartChanged);
    }
}

impl Default for CartNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to cart changes, scoped to the UI surface that holds
/// it: subscribe on mount, drop on teardown.
#[derive(Debug)]
pub struct CartSubscription {
    receiver: broadcast::Receiver<CartChanged>,
}

impl CartSubscription {
    /// Wait for the next change event.
    ///
    /// Returns `None` once the notifier (and thus the cart store) has been
    /// dropped. A lagged subscriber skips ahead rather than erroring; the
    /// event content is empty either way.
    pub async fn changed(&mut self) -> Option<CartChanged> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking poll for a pending change event.
    pub fn try_changed(&mut self) -> Option<CartChanged> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
