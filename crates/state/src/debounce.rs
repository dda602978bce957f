// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trailing-edge debounce with optional leading edge and max-wait ceiling.
//!
//! Each [`Debouncer`] owns one background task. Triggers arrive over a
//! channel and the task alone holds the timers, so there is no shared timer
//! state. Payloads collected between invocations are handed to the callback
//! together.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Timing options for a [`Debouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOpts {
    /// Quiet period after the last trigger before the callback fires
    pub delay: Duration,
    /// Fire immediately on the first trigger of a burst
    pub leading: bool,
    /// Longest a burst may defer the callback
    pub max_wait: Option<Duration>,
}

impl DebounceOpts {
    /// Trailing edge only, no ceiling
    pub fn trailing(delay: Duration) -> Self {
        Self { delay, leading: false, max_wait: None }
    }

    /// Trailing edge with `max_wait = 5 * delay`
    pub fn with_default_max_wait(delay: Duration) -> Self {
        Self { delay, leading: false, max_wait: Some(delay * 5) }
    }

    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }
}

impl Default for DebounceOpts {
    fn default() -> Self {
        Self::with_default_max_wait(Duration::from_secs(1))
    }
}

/// Handle for triggering a debounced callback. Clones share one schedule.
///
/// The background task ends, flushing anything pending, once every clone has
/// been dropped.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the scheduling task on the current tokio runtime.
    pub fn spawn<F, Fut>(opts: DebounceOpts, callback: F) -> Self
    where
        F: Fn(Vec<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(opts, rx, callback));
        Self { tx }
    }

    /// Schedule (or reschedule) the callback with `payload`.
    ///
    /// Returns false if the scheduling task is gone.
    pub fn trigger(&self, payload: T) -> bool {
        self.tx.send(payload).is_ok()
    }
}

async fn run<T, F, Fut>(opts: DebounceOpts, mut rx: mpsc::UnboundedReceiver<T>, callback: F)
where
    F: Fn(Vec<T>) -> Fut,
    Fut: Future<Output = ()>,
{
    // Idle: wait for the first trigger of a burst
    while let Some(first) = rx.recv().await {
        let started = Instant::now();
        let mut pending = vec![first];
        if opts.leading {
            callback(std::mem::take(&mut pending)).await;
        }
        let mut last = started;
        let mut burst_start = started;

        // Scheduled: collect triggers until the trailing or max-wait deadline
        loop {
            let trailing_at = last + opts.delay;
            let deadline = match opts.max_wait {
                Some(max_wait) => trailing_at.min(burst_start + max_wait),
                None => trailing_at,
            };
            tokio::select! {
                biased;
                next = rx.recv() => match next {
                    Some(payload) => {
                        pending.push(payload);
                        last = Instant::now();
                    }
                    None => {
                        if !pending.is_empty() {
                            callback(pending).await;
                        }
                        return;
                    }
                },
                _ = sleep_until(deadline) => {
                    let hit_max_wait = deadline < trailing_at;
                    if !pending.is_empty() {
                        callback(std::mem::take(&mut pending)).await;
                    }
                    if hit_max_wait {
                        // Still busy: start a new max-wait window
                        burst_start = Instant::now();
                        continue;
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;
