//! # Relay: hand-off of dispatch notifications to async subscribers.
//!
//! [`Relay`] is a [`Listener`] on [`EventDispatched`] that forwards every notification
//! to multiple [`Subscribe`] implementations without blocking the dispatching thread.
//!
//! ## Architecture
//! ```text
//! dispatch(event) ──► EventDispatched ──► Relay::forward
//!                                              │
//!     ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!     │    (bounded)         └──────► panic → error! (worker keeps going)
//!     ├──► [queue 2] ──► worker 2 ──► subscriber2.on_event()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► subscriberN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-subscriber ordering**: subscriber A may process event N while B processes N+5
//! - **Filtering**: [`Subscribe::accepts`] runs before queueing; rejected events cost no slot
//! - **Overflow**: event dropped for that subscriber only (warn)
//! - **Non-blocking**: `forward()` returns immediately (uses `try_send`)
//! - **Isolation**: slow/panicking subscriber doesn't affect others
//! - **Per-subscriber FIFO**: each subscriber sees events in order
//!
//! Workers are tokio tasks: [`Relay::new`] must be called from within a tokio runtime.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if subscriber uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{sync::mpsc, task::JoinHandle};

use super::Subscribe;
use crate::error::panic_message;
use crate::events::EventDispatched;
use crate::listeners::{Handlers, Listener};
use crate::policies::Priority;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    sub: Arc<dyn Subscribe>,
    sender: mpsc::Sender<Arc<EventDispatched>>,
}

/// Fan-out bridge from the synchronous bus to async subscribers.
pub struct Relay {
    channels: Mutex<Vec<SubscriberChannel>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Relay {
    /// Creates a relay and spawns one worker task per subscriber.
    ///
    /// ### Per-subscriber setup
    /// - Bounded mpsc queue (capacity from [`Subscribe::queue_capacity`], minimum 1)
    /// - Dedicated worker task (runs until the queue is closed)
    /// - Panic isolation via `catch_unwind`
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let (tx, mut rx) = mpsc::channel::<Arc<EventDispatched>>(cap);
            let worker_sub = Arc::clone(&sub);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = worker_sub.on_event(&ev);
                    if let Err(payload) = AssertUnwindSafe(fut).catch_unwind().await {
                        tracing::error!(
                            subscriber = worker_sub.name(),
                            info = %panic_message(&*payload),
                            "subscriber panicked"
                        );
                    }
                }
            });
            channels.push(SubscriberChannel { sub, sender: tx });
            workers.push(handle);
        }

        Self {
            channels: Mutex::new(channels),
            workers: Mutex::new(workers),
        }
    }

    /// Number of subscribers still attached.
    pub fn subscriber_count(&self) -> usize {
        self.channels.lock().len()
    }

    /// Queues `event` for every subscriber that [accepts](Subscribe::accepts) it.
    ///
    /// - Uses `try_send` (non-blocking)
    /// - On queue full: drops the event for that subscriber and warns
    /// - On queue closed (worker gone): drops the event and warns
    pub fn forward(&self, event: &EventDispatched) {
        let channels = self.channels.lock();
        let mut shared: Option<Arc<EventDispatched>> = None;

        for channel in channels.iter() {
            if !channel.sub.accepts(event) {
                continue;
            }
            let ev = shared.get_or_insert_with(|| Arc::new(event.clone()));
            match channel.sender.try_send(Arc::clone(ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        subscriber = channel.sub.name(),
                        seq = event.seq,
                        "subscriber queue full, event dropped"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::warn!(
                        subscriber = channel.sub.name(),
                        seq = event.seq,
                        "subscriber closed, event dropped"
                    );
                }
            }
        }
    }

    /// Gracefully shuts down all subscriber workers.
    ///
    /// 1. Drops all channel senders (workers drain their queue, then see it closed)
    /// 2. Awaits all worker tasks to finish
    ///
    /// Notifications forwarded afterwards are discarded.
    pub async fn shutdown(&self) {
        drop(std::mem::take(&mut *self.channels.lock()));

        let workers = std::mem::take(&mut *self.workers.lock());
        for h in workers {
            let _ = h.await;
        }
    }
}

impl Listener for Relay {
    fn name(&self) -> &str {
        "Relay"
    }

    fn handlers(self: Arc<Self>, handlers: &mut Handlers) {
        handlers
            .on::<EventDispatched>("on_dispatched")
            .priority(Priority::Monitor)
            .invoke(move |d| {
                self.forward(d);
                Ok(())
            });
    }
}
