// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A bounded per-subscriber queue (§4.1's "back-pressure"): on overflow the
//! oldest unprocessed event is dropped and the drop is counted.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use junction_core::Event;

/// Default mailbox capacity (§4.1).
pub const DEFAULT_CAPACITY: usize = 1024;

pub struct Mailbox {
    queue: Mutex<VecDeque<Event>>,
    notify: Notify,
    capacity: usize,
    dropped: AtomicU64,
}

impl Mailbox {
    pub fn new(capacity: usize) -> Self {
        Self { queue: Mutex::new(VecDeque::with_capacity(capacity.min(64))), notify: Notify::new(), capacity, dropped: AtomicU64::new(0) }
    }

    /// Push an event, dropping the oldest queued event if at capacity.
    /// Returns `true` if an event was dropped to make room.
    pub fn push(&self, event: Event) -> bool {
        let mut queue = self.queue.lock();
        let overflowed = if queue.len() >= self.capacity {
            queue.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        };
        queue.push_back(event);
        drop(queue);
        self.notify.notify_one();
        overflowed
    }

    /// Wait for and pop the next event.
    pub async fn recv(&self) -> Event {
        loop {
            // Register interest before checking the queue so a `push` that
            // races between the check and the await is not missed.
            let notified = self.notify.notified();
            if let Some(event) = self.queue.lock().pop_front() {
                return event;
            }
            notified.await;
        }
    }

    /// Returns the number of events dropped since the last call and
    /// resets the counter to zero, so a debounced flush can report one
    /// coalesced count instead of one notice per drop.
    pub fn take_dropped(&self) -> u64 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}

#[cfg(test)]
#[path = "mailbox_tests.rs"]
mod tests;
