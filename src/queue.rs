//! Bounded blocking order queue.
//!
//! Customers (producers) call [`OrderQueue::submit`], cooks (consumers) call
//! [`OrderQueue::take`] until it returns `None`. The queue knows how many
//! orders will ever be submitted, so it can tell "empty for now" apart from
//! "empty for good":
//!
//! - `submit` waits on `space_available` while the queue is full and wakes a
//!   single cook per order.
//! - `take` waits on `item_available` while the queue is empty *and* fewer
//!   than `expected_total` orders have been accepted. When it wakes up to an
//!   empty queue, production is over and every other cook is woken too.
//! - [`OrderQueue::close_production`] is the supervisor's broadcast once all
//!   customers are joined. The last `submit` only wakes one cook, so cooks
//!   parked before it may otherwise sleep forever.
//! - [`OrderQueue::close`] is the teardown check: every expected order was
//!   produced and consumed, and nothing is left behind.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, trace, warn};

use crate::error::QueueError;

// =============================================================================
// Work items
// =============================================================================

/// A payload together with the sequence number the queue assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem<T> {
    sequence_number: u64,
    payload: T,
}

impl<T> WorkItem<T> {
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

// =============================================================================
// Snapshot of the queue counters
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub capacity: usize,
    pub expected_total: u64,
    pub current_size: usize,
    /// Orders ever accepted by `submit`.
    pub submitted: u64,
    /// Orders ever handed out by `take`.
    pub handled: u64,
    pub waiting_producers: usize,
    pub waiting_consumers: usize,
    pub production_closed: bool,
}

impl QueueStats {
    /// Every expected order was produced and consumed and none is queued.
    pub fn is_drained(&self) -> bool {
        self.handled == self.expected_total && self.current_size == 0
    }

    /// `take` no longer blocks: all orders were accepted and none is queued.
    pub fn is_exhausted(&self) -> bool {
        self.submitted >= self.expected_total && self.current_size == 0
    }
}

// =============================================================================
// The queue
// =============================================================================

struct QueueState<T> {
    items: VecDeque<WorkItem<T>>,
    next_sequence_number: u64,
    items_handled: u64,
    waiting_producers: usize,
    waiting_consumers: usize,
    production_closed: bool,
}

pub struct OrderQueue<T> {
    state: Mutex<QueueState<T>>,
    space_available: Condvar,
    item_available: Condvar,
    max_size: usize,
    expected_total: u64,
}

impl<T> OrderQueue<T> {
    /// Opens an empty queue holding at most `max_size` orders, for a run in
    /// which exactly `expected_total` orders will be submitted.
    ///
    /// Room for all `max_size` orders is allocated here, up front, so a full
    /// queue never allocates under the lock. A huge capacity costs that much
    /// memory even if few orders are ever queued at once.
    ///
    /// # Errors
    ///
    /// [`QueueError::ZeroCapacity`] for a zero `max_size`, and
    /// [`QueueError::Resource`] when the buffer cannot be allocated.
    pub fn open(max_size: usize, expected_total: u64) -> Result<Self, QueueError> {
        if max_size == 0 {
            return Err(QueueError::ZeroCapacity);
        }

        let mut items = VecDeque::new();
        items
            .try_reserve(max_size)
            .map_err(|err| QueueError::Resource {
                capacity: max_size,
                reason: err.to_string(),
            })?;

        info!(capacity = max_size, expected_total, "order queue opened");

        Ok(Self {
            state: Mutex::new(QueueState {
                items,
                next_sequence_number: 0,
                items_handled: 0,
                waiting_producers: 0,
                waiting_consumers: 0,
                production_closed: false,
            }),
            space_available: Condvar::new(),
            item_available: Condvar::new(),
            max_size,
            expected_total,
        })
    }

    // Every mutation of the state finishes before anything that can panic,
    // so a poisoned lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `payload` to the back of the queue, blocking while it is full.
    ///
    /// Returns the sequence number assigned to the order.
    pub fn submit(&self, payload: T) -> u64 {
        let mut state = self.lock();

        while state.items.len() >= self.max_size {
            state.waiting_producers += 1;
            state = self
                .space_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.waiting_producers -= 1;
        }

        let sequence_number = state.next_sequence_number;
        if sequence_number >= self.expected_total {
            warn!(
                sequence_number,
                expected_total = self.expected_total,
                "order submitted beyond the expected total"
            );
        }
        state.next_sequence_number += 1;
        state.items.push_back(WorkItem {
            sequence_number,
            payload,
        });

        // One new order can keep at most one cook busy.
        self.item_available.notify_one();

        debug!(sequence_number, queued = state.items.len(), "order submitted");
        sequence_number
    }

    /// Removes the order at the front of the queue.
    ///
    /// Blocks while the queue is empty and more orders are still expected.
    /// Returns `None` once every expected order has been submitted and the
    /// queue is drained; from then on it never blocks again.
    pub fn take(&self) -> Option<WorkItem<T>> {
        let mut state = self.lock();

        while state.items.is_empty() && state.next_sequence_number < self.expected_total {
            state.waiting_consumers += 1;
            state = self
                .item_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.waiting_consumers -= 1;
        }

        let Some(item) = state.items.pop_front() else {
            // Production is over. Pass it on to every cook still parked.
            self.item_available.notify_all();
            trace!("no more orders");
            return None;
        };
        state.items_handled += 1;

        self.space_available.notify_one();

        debug!(
            sequence_number = item.sequence_number,
            queued = state.items.len(),
            "order taken"
        );
        Some(item)
    }

    /// Wakes every cook waiting for an order so it re-checks whether
    /// production has ended.
    ///
    /// Call once no more `submit` calls will happen, before joining cooks.
    pub fn close_production(&self) {
        let mut state = self.lock();
        state.production_closed = true;

        if state.next_sequence_number < self.expected_total {
            warn!(
                submitted = state.next_sequence_number,
                expected_total = self.expected_total,
                "production closed before every expected order was submitted"
            );
        }

        self.item_available.notify_all();
        info!(
            submitted = state.next_sequence_number,
            waiting_consumers = state.waiting_consumers,
            "production closed"
        );
    }

    /// Tears the queue down and returns its final counters.
    ///
    /// # Panics
    ///
    /// Panics when orders were lost or duplicated: fewer or more orders were
    /// taken than expected, or orders are still queued.
    pub fn close(self) -> QueueStats {
        let stats = self.stats();

        assert_eq!(
            stats.handled, stats.expected_total,
            "order queue closed after handling {} of {} expected orders",
            stats.handled, stats.expected_total
        );
        assert_eq!(
            stats.current_size, 0,
            "order queue closed with {} orders still queued",
            stats.current_size
        );

        info!(handled = stats.handled, "order queue closed");
        stats
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.lock();
        QueueStats {
            capacity: self.max_size,
            expected_total: self.expected_total,
            current_size: state.items.len(),
            submitted: state.next_sequence_number,
            handled: state.items_handled,
            waiting_producers: state.waiting_producers,
            waiting_consumers: state.waiting_consumers,
            production_closed: state.production_closed,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    pub fn expected_total(&self) -> u64 {
        self.expected_total
    }
}

// =============================================================================
// Tests
// =============================================================================
