// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run log fan-out with backlog replay.
//!
//! A broker starts open and moves to closed exactly once. Every watcher sees
//! the backlog in record order followed by live items, then end-of-stream
//! when the broker closes. Late watchers on a closed broker get the backlog
//! and end-of-stream straight away.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use studio_core::{LogItem, LogSink};
use tokio::sync::mpsc;

#[derive(Debug, Default)]
struct BrokerState {
    backlog: Vec<LogItem>,
    watchers: HashMap<u64, mpsc::UnboundedSender<LogItem>>,
    next_watcher: u64,
    closed: bool,
}

/// Broadcasts one run's log lines to any number of watchers.
#[derive(Debug, Default)]
pub struct LogBroker {
    state: Mutex<BrokerState>,
}

impl LogBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to the backlog and deliver it to every watcher.
    /// Ignored once the broker is closed.
    pub fn record(&self, mut item: LogItem) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        if item.insert_id.is_empty() {
            item.insert_id = state.backlog.len().to_string();
        }
        // Unbounded sends never block, so delivering under the lock is safe.
        // A failed send means the receiver is gone.
        state.watchers.retain(|_, tx| tx.send(item.clone()).is_ok());
        state.backlog.push(item);
    }

    /// Subscribe to this broker.
    ///
    /// The backlog is queued into the new watcher under the same lock that
    /// `record` takes, so no item is lost or duplicated at the boundary.
    pub fn new_watcher(self: &Arc<Self>) -> LogWatcher {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        for item in &state.backlog {
            // rx is alive in this scope
            let _ = tx.send(item.clone());
        }
        let id = state.next_watcher;
        state.next_watcher += 1;
        if !state.closed {
            state.watchers.insert(id, tx);
        }
        LogWatcher { id, broker: Arc::clone(self), rx, closed: false }
    }

    /// Close the broker; every registered watcher sees end-of-stream after
    /// draining what it was already sent. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.watchers.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Currently registered watchers
    pub fn watcher_count(&self) -> usize {
        self.state.lock().watchers.len()
    }

    /// Copy of everything recorded so far
    pub fn backlog(&self) -> Vec<LogItem> {
        self.state.lock().backlog.clone()
    }

    fn unregister(&self, id: u64) {
        self.state.lock().watchers.remove(&id);
    }
}

impl LogSink for LogBroker {
    fn record(&self, item: LogItem) {
        LogBroker::record(self, item);
    }
}

/// A subscription to a [`LogBroker`].
///
/// Dropping the watcher unregisters it.
#[derive(Debug)]
pub struct LogWatcher {
    id: u64,
    broker: Arc<LogBroker>,
    rx: mpsc::UnboundedReceiver<LogItem>,
    closed: bool,
}

impl LogWatcher {
    /// Next item, or `None` at end-of-stream.
    pub async fn next(&mut self) -> Option<LogItem> {
        self.rx.recv().await
    }

    /// The receiving end of this watcher's channel
    pub fn logs(&mut self) -> &mut mpsc::UnboundedReceiver<LogItem> {
        &mut self.rx
    }

    /// Unregister from the broker and stop receiving. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.broker.unregister(self.id);
        self.rx.close();
    }
}

impl Drop for LogWatcher {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
