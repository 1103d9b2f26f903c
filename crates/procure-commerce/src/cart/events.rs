//! Change notification for cart subscribers.

use std::fmt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::cart::CartSnapshot;

/// Something subscribers are told about.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// A mutation committed; carries the resulting snapshot.
    Changed(CartSnapshot),
    /// Writing the committed cart to storage failed.
    PersistenceFailed { reason: String },
}

/// Callback invoked for every [`CartEvent`].
pub type Listener = Arc<dyn Fn(&CartEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Events waiting to be delivered, oldest first.
#[derive(Default)]
struct Outbox {
    pending: VecDeque<CartEvent>,
    /// Set while some caller is draining `pending`.
    delivering: bool,
}

/// Set of live listeners plus the queue that orders their events.
#[derive(Default, Clone)]
pub(crate) struct ListenerRegistry {
    inner: Arc<Mutex<Listeners>>,
    outbox: Arc<Mutex<Outbox>>,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(&self, listener: Listener) -> Subscription {
        let mut listeners = lock(&self.inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Queue `events` for delivery.
    ///
    /// Called while the store lock is held, so the queue order is the
    /// commit order.
    pub(crate) fn enqueue(&self, events: Vec<CartEvent>) {
        if events.is_empty() {
            return;
        }
        lock(&self.outbox).pending.extend(events);
    }

    /// Deliver queued events in order to every listener registered at the
    /// time each event is taken off the queue.
    ///
    /// Must be called without holding any store lock. Only one caller
    /// drains at a time: a listener that mutates the store, or a second
    /// thread committing meanwhile, only enqueues and returns, and the
    /// active drainer delivers its events after the current one.
    pub(crate) fn deliver(&self) {
        {
            let mut outbox = lock(&self.outbox);
            if outbox.delivering || outbox.pending.is_empty() {
                return;
            }
            outbox.delivering = true;
        }
        let _draining = DrainGuard(&self.outbox);

        loop {
            let event = {
                let mut outbox = lock(&self.outbox);
                match outbox.pending.pop_front() {
                    Some(event) => event,
                    None => {
                        outbox.delivering = false;
                        return;
                    }
                }
            };
            let listeners: Vec<Listener> = lock(&self.inner)
                .entries
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in &listeners {
                listener(&event);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }
}

/// Releases the drain if a listener panics mid-delivery.
struct DrainGuard<'a>(&'a Mutex<Outbox>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            lock(self.0).delivering = false;
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle for a registered listener.
///
/// The listener stays registered until the handle is dropped or
/// [`unsubscribe`](Subscription::unsubscribe) is called.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Remove the listener.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            lock(&inner).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn lock<T>(inner: &Mutex<T>) -> MutexGuard<'_, T> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Listener {
        let counter = Arc::clone(counter);
        Arc::new(move |_event: &CartEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn failure() -> CartEvent {
        CartEvent::PersistenceFailed {
            reason: "quota".to_string(),
        }
    }

    #[test]
    fn test_emit_reaches_all_listeners() {
        let registry = ListenerRegistry::default();
        let counter = Arc::new(AtomicUsize::new(0));
        let _a = registry.subscribe(counting(&counter));
        let _b = registry.subscribe(counting(&counter));

        registry.enqueue(vec![failure(), failure()]);
        registry.deliver();
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let registry = ListenerRegistry::default();
        let counter = Arc::new(AtomicUsize::new(0));
        let kept = registry.subscribe(counting(&counter));
        let dropped = registry.subscribe(counting(&counter));
        assert_eq!(registry.len(), 2);

        drop(dropped);
        kept.unsubscribe();
        assert_eq!(registry.len(), 0);

        registry.enqueue(vec![failure()]);
        registry.deliver();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_nested_events_wait_their_turn() {
        let registry = ListenerRegistry::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        // First listener publishes a follow-up event while the first one is
        // still being delivered.
        let nested = registry.clone();
        let _publisher = registry.subscribe(Arc::new(move |event: &CartEvent| {
            if matches!(event, CartEvent::PersistenceFailed { reason } if reason == "first") {
                nested.enqueue(vec![CartEvent::PersistenceFailed {
                    reason: "second".to_string(),
                }]);
                nested.deliver();
            }
        }));
        let sink = Arc::clone(&seen);
        let _recorder = registry.subscribe(Arc::new(move |event: &CartEvent| {
            if let CartEvent::PersistenceFailed { reason } = event {
                lock(&sink).push(reason.clone());
            }
        }));

        registry.enqueue(vec![CartEvent::PersistenceFailed {
            reason: "first".to_string(),
        }]);
        registry.deliver();

        assert_eq!(*lock(&seen), vec!["first".to_string(), "second".to_string()]);
        assert!(lock(&registry.outbox).pending.is_empty());
        assert!(!lock(&registry.outbox).delivering);
    }

    #[test]
    fn test_subscription_outlives_registry() {
        let registry = ListenerRegistry::default();
        let subscription = registry.subscribe(Arc::new(|_: &CartEvent| {}));
        let weak = subscription.registry.clone();
        drop(registry);
        assert_eq!(weak.strong_count(), 0);
        // Dropping after the registry is gone is a no-op.
        drop(subscription);
    }
}
