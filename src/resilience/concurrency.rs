//! Concurrency gate.
//!
//! # Responsibilities
//! - Bound the number of in-flight calls
//! - Queue excess callers and admit them in arrival order
//! - Release slots on every exit path via an RAII guard
//!
//! # Design Decisions
//! - A released slot is handed directly to the oldest waiter, so the active
//!   count never dips below the max while callers are queued
//! - A waiter cancelled after being handed a slot gives it back on drop

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::observability::metrics;

#[derive(Debug)]
struct GateState {
    active: usize,
    queue: VecDeque<oneshot::Sender<()>>,
}

impl GateState {
    /// Waiters whose receiver is still alive.
    fn queued(&self) -> usize {
        self.queue.iter().filter(|tx| !tx.is_closed()).count()
    }
}

/// Limits concurrent calls to `max`, queuing the rest FIFO.
#[derive(Debug)]
pub struct ConcurrencyGate {
    max: usize,
    state: Mutex<GateState>,
}

/// Occupancy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    pub active: usize,
    pub queued: usize,
}

impl ConcurrencyGate {
    pub fn new(max: usize) -> Arc<Self> {
        Arc::new(Self {
            max: max.max(1),
            state: Mutex::new(GateState {
                active: 0,
                queue: VecDeque::new(),
            }),
        })
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn status(&self) -> GateStatus {
        let state = self.lock();
        GateStatus {
            active: state.active,
            queued: state.queued(),
        }
    }

    /// Wait for a slot. The slot is held until the returned guard drops.
    pub async fn acquire(self: &Arc<Self>) -> SlotGuard {
        let rx = {
            let mut state = self.lock();
            if state.active < self.max {
                state.active += 1;
                metrics::record_slots(state.active, state.queued());
                return SlotGuard { gate: self.clone() };
            }
            // Drop senders left behind by cancelled waiters.
            state.queue.retain(|tx| !tx.is_closed());
            let (tx, rx) = oneshot::channel();
            state.queue.push_back(tx);
            tracing::debug!(queued = state.queue.len(), max = self.max, "Concurrency limit reached, queuing");
            metrics::record_slots(state.active, state.queued());
            rx
        };

        let mut waiter = Waiter {
            gate: self.clone(),
            rx: Some(rx),
        };
        if let Some(rx) = waiter.rx.as_mut() {
            // The sender only disappears together with the gate, which we hold.
            let _ = rx.await;
        }
        waiter.rx = None;
        SlotGuard { gate: self.clone() }
    }

    /// Try to take a slot without waiting.
    pub fn try_acquire(self: &Arc<Self>) -> Option<SlotGuard> {
        let mut state = self.lock();
        if state.active < self.max {
            state.active += 1;
            metrics::record_slots(state.active, state.queued());
            Some(SlotGuard { gate: self.clone() })
        } else {
            None
        }
    }

    fn release(&self) {
        let mut state = self.lock();
        // Hand the slot to the oldest waiter still listening; active stays the same.
        while let Some(tx) = state.queue.pop_front() {
            if tx.send(()).is_ok() {
                metrics::record_slots(state.active, state.queued());
                return;
            }
        }
        state.active = state.active.saturating_sub(1);
        metrics::record_slots(state.active, state.queued());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().expect("concurrency gate mutex poisoned")
    }
}

/// A RAII guard that releases its slot on drop.
#[derive(Debug)]
pub struct SlotGuard {
    gate: Arc<ConcurrencyGate>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.gate.release();
    }
}

struct Waiter {
    gate: Arc<ConcurrencyGate>,
    rx: Option<oneshot::Receiver<()>>,
}

impl Drop for Waiter {
    fn drop(&mut self) {
        if let Some(mut rx) = self.rx.take() {
            rx.close();
            if rx.try_recv().is_ok() {
                // Cancelled after being admitted.
                self.gate.release();
            }
        }
    }
}
