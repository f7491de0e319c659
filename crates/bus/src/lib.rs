// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! junction-bus: the in-process event bus (§4.1). Publishers enqueue into
//! a bounded per-subscriber mailbox and return; each subscription owns a
//! dedicated worker task that drains its mailbox and invokes the handler.

mod error;
mod mailbox;
mod pattern;

pub use error::BusError;
pub use mailbox::{Mailbox, DEFAULT_CAPACITY};
pub use pattern::Matcher;

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;

use junction_core::{BusOverflowError, Event, Filter};

/// How long a subscription's overflow flag stays pending before the
/// coalesced `bus:overflow` notice is flushed (mirrors the debounce shape
/// of `junction-registry`'s config-save scheduling).
const OVERFLOW_DEBOUNCE: Duration = Duration::from_millis(50);

/// Opaque handle returned by `subscribe`/`subscribe_filtered`, passed to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// An async event handler invoked on the subscription's worker task.
pub type Handler = Arc<dyn Fn(Event) -> BoxFuture + Send + Sync>;

/// Runs between `publish` and fan-out, letting a registered transformer
/// enrich or rewrite an event before subscribers see it (§9 design note —
/// e.g. camera-metadata enrichment). No concrete transformer ships here;
/// the seam just needs to exist and hold.
pub trait EventTransformer: Send + Sync {
    fn transform(&self, event: Event) -> Event;
}

struct Subscription {
    matcher: Matcher,
    mailbox: Arc<mailbox::Mailbox>,
    worker: JoinHandle<()>,
    /// Set while a coalesced overflow flush is scheduled for this
    /// subscription, so a burst of drops schedules exactly one flush.
    overflow_pending: Arc<AtomicBool>,
    /// The most recently dropped event's type, reported by the flush.
    last_dropped_type: Arc<Mutex<String>>,
}

struct BusState {
    subscriptions: RwLock<HashMap<SubscriptionToken, Subscription>>,
    transformers: RwLock<Vec<Arc<dyn EventTransformer>>>,
    history: RwLock<VecDeque<Event>>,
    history_cap: usize,
    next_token: AtomicU64,
}

/// The event bus. Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct EventBus {
    state: Arc<BusState>,
}

/// Wraps a plain async fn/closure as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |event| Box::pin(f(event)) as BoxFuture)
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_capacity(1000)
    }

    pub fn with_history_capacity(cap: usize) -> Self {
        Self {
            state: Arc::new(BusState {
                subscriptions: RwLock::new(HashMap::new()),
                transformers: RwLock::new(Vec::new()),
                history: RwLock::new(VecDeque::with_capacity(cap.min(1024))),
                history_cap: cap,
                next_token: AtomicU64::new(1),
            }),
        }
    }

    /// Registers a transformer that runs, in registration order, on every
    /// event between `publish` and fan-out/history (§9).
    pub fn register_transformer(&self, transformer: Arc<dyn EventTransformer>) {
        self.state.transformers.write().push(transformer);
    }

    /// Validates, fills in `id`/`timestamp`/derived fields (already done by
    /// `Event::new`, so this mainly guards hand-built events), runs
    /// registered transformers, appends to history, and fans out to
    /// matching subscribers (§4.1).
    pub fn publish(&self, event: Event) -> Result<(), BusError> {
        if event.event_type.is_empty() {
            return Err(BusError::MissingEventType);
        }
        let event = self.apply_transformers(event);
        self.publish_internal(event, false);
        Ok(())
    }

    fn apply_transformers(&self, event: Event) -> Event {
        self.state.transformers.read().iter().fold(event, |event, t| t.transform(event))
    }

    fn publish_internal(&self, event: Event, is_overflow_notice: bool) {
        {
            let mut history = self.state.history.write();
            if history.len() >= self.state.history_cap {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        let subscriptions = self.state.subscriptions.read();
        for subscription in subscriptions.values() {
            if !subscription.matcher.matches(&event) {
                continue;
            }
            let dropped = subscription.mailbox.push(event.clone());
            if dropped && !is_overflow_notice {
                *subscription.last_dropped_type.lock() = event.event_type.clone();
                self.schedule_overflow_notice(subscription);
            }
        }
    }

    /// Schedules a coalesced `bus:overflow` flush for one subscription's
    /// mailbox (§4.1 scenario 5: a burst of drops surfaces as one notice
    /// carrying the drop count, not one notice per drop). A burst of drops
    /// within the debounce window only ever schedules the first flush;
    /// later drops just add to the mailbox's running counter, which the
    /// flush reads and resets when it fires.
    fn schedule_overflow_notice(&self, subscription: &Subscription) {
        if subscription.overflow_pending.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            return;
        }
        let bus = self.clone();
        let mailbox = subscription.mailbox.clone();
        let pending = subscription.overflow_pending.clone();
        let last_dropped_type = subscription.last_dropped_type.clone();
        tokio::spawn(async move {
            tokio::time::sleep(OVERFLOW_DEBOUNCE).await;
            let dropped = mailbox.take_dropped();
            pending.store(false, Ordering::SeqCst);
            if dropped == 0 {
                return;
            }
            let err = BusOverflowError { event_type: last_dropped_type.lock().clone(), dropped };
            tracing::warn!(%err, "bus subscriber mailbox overflowed");
            // Delivered best-effort and never re-triggers another overflow
            // notice even if it is itself dropped (`is_overflow_notice: true`).
            let notice = Event::new("bus:overflow", junction_core::SYSTEM_SOURCE)
                .with_data(serde_json::json!({ "eventType": err.event_type, "dropped": err.dropped }));
            bus.publish_internal(notice, true);
        });
    }

    /// `pattern` is a literal type, a namespace prefix (`"camera:*"`), or `*`.
    pub fn subscribe(&self, pattern: &str, handler: Handler) -> SubscriptionToken {
        self.register(Matcher::from_pattern(pattern), handler, DEFAULT_CAPACITY)
    }

    pub fn subscribe_filtered(&self, filter: Filter, handler: Handler) -> SubscriptionToken {
        self.register(Matcher::Filter(filter), handler, DEFAULT_CAPACITY)
    }

    fn register(&self, matcher: Matcher, handler: Handler, capacity: usize) -> SubscriptionToken {
        let token = SubscriptionToken(self.state.next_token.fetch_add(1, Ordering::Relaxed));
        let mailbox = Arc::new(mailbox::Mailbox::new(capacity));
        let worker_mailbox = mailbox.clone();
        let worker = tokio::spawn(async move {
            loop {
                let event = worker_mailbox.recv().await;
                handler(event).await;
            }
        });
        self.state.subscriptions.write().insert(
            token,
            Subscription {
                matcher,
                mailbox,
                worker,
                overflow_pending: Arc::new(AtomicBool::new(false)),
                last_dropped_type: Arc::new(Mutex::new(String::new())),
            },
        );
        token
    }

    /// Aborts the subscription's worker task and drops its mailbox.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> Result<(), BusError> {
        let removed = self.state.subscriptions.write().remove(&token);
        match removed {
            Some(subscription) => {
                subscription.worker.abort();
                Ok(())
            }
            None => Err(BusError::UnknownSubscription),
        }
    }

    /// Scans the ring buffer, newest first, applying an optional filter,
    /// `limit`, and `offset` (§4.1).
    pub fn history(&self, filter: Option<&Filter>, limit: usize, offset: usize) -> Vec<Event> {
        let history = self.state.history.read();
        history
            .iter()
            .rev()
            .filter(|event| filter.map_or(true, |f| f.matches(event)))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.subscriptions.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BusState {
    fn drop(&mut self) {
        for subscription in self.subscriptions.get_mut().values() {
            subscription.worker.abort();
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
